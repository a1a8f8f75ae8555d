//! Smart campaign lookups.

use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::impl_timestamped;
use crate::error::Result;
use crate::params::Params;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartCampaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// `Inactive`, `Single Run`, `Recurring Run`, `Active`, etc.
    #[serde(default)]
    pub status: Option<String>,
    /// `batch`, `default` (requestable) or `trigger`.
    #[serde(rename = "type", default)]
    pub campaign_type: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_requestable: bool,
    #[serde(default)]
    pub is_communication_limit_enabled: bool,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub qualification_rule_type: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub smart_list_id: Option<i64>,
    #[serde(default)]
    pub flow_id: Option<i64>,
    #[serde(default)]
    pub computed_url: Option<String>,
}

impl_timestamped!(SmartCampaign);

/// Batch schedule of a smart campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurrence {
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,
    /// `Daily`, `Weekly` or `Monthly`.
    #[serde(default)]
    pub interval_type: Option<String>,
    #[serde(default)]
    pub interval: Option<i64>,
    #[serde(default)]
    pub weekday_only: Option<bool>,
    #[serde(default)]
    pub weekday_mask: Vec<String>,
    #[serde(default)]
    pub day_of_month: Option<i64>,
    #[serde(default)]
    pub day_of_week: Option<String>,
    #[serde(default)]
    pub week_of_month: Option<i64>,
}

pub async fn get_smart_campaign_by_id(
    client: &MarketoClient,
    id: i64,
) -> Result<Option<SmartCampaign>> {
    let response = client
        .get_asset(&format!("/smartCampaign/{id}.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    response.single_valid_result()
}

pub async fn get_smart_campaign_by_name(
    client: &MarketoClient,
    name: &str,
) -> Result<Option<SmartCampaign>> {
    let params = Params::new().push("name", name);
    let response = client.get_asset("/smartCampaign/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}
