//! Email template lookups.

use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::{BasicFolder, impl_timestamped};
use crate::error::Result;
use crate::params::{Page, Params};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub folder: Option<BasicFolder>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
}

impl_timestamped!(EmailTemplate);

pub async fn get_email_template_by_id(
    client: &MarketoClient,
    id: i64,
) -> Result<Option<EmailTemplate>> {
    let response = client
        .get_asset(&format!("/emailTemplate/{id}.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    response.single_valid_result()
}

pub async fn get_email_template_by_name(
    client: &MarketoClient,
    name: &str,
) -> Result<Option<EmailTemplate>> {
    let params = Params::new().push("name", name);
    let response = client.get_asset("/emailTemplate/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}

pub async fn browse_email_templates(
    client: &MarketoClient,
    page: &Page,
) -> Result<Vec<EmailTemplate>> {
    let params = Params::new().page(page);
    let response = client.get_asset("/emailTemplates.json", &params).await?;
    response.check_is_success()?;
    response.results()
}
