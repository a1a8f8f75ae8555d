//! Program channel lookups.
//!
//! A channel defines the program type it applies to and the ordered
//! progression statuses a member moves through.

use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::impl_timestamped;
use crate::error::Result;
use crate::params::{Page, Params};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub applicable_program_type: Option<String>,
    #[serde(default)]
    pub progression_statuses: Vec<ChannelProgression>,
}

impl_timestamped!(Channel);

impl Channel {
    /// Progression statuses marked as success.
    pub fn success_statuses(&self) -> impl Iterator<Item = &ChannelProgression> {
        self.progression_statuses
            .iter()
            .filter(|status| status.success == Some(true))
    }
}

/// One step of a channel's progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelProgression {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub step: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub success: Option<bool>,
}

pub async fn browse_channels(client: &MarketoClient, page: &Page) -> Result<Vec<Channel>> {
    let params = Params::new().page(page);
    let response = client.get_asset("/channels.json", &params).await?;
    response.check_is_success()?;
    response.results()
}

/// Channels matching `name`. Marketo answers this endpoint with a list.
pub async fn get_channels_by_name(
    client: &MarketoClient,
    name: &str,
    page: &Page,
) -> Result<Vec<Channel>> {
    let params = Params::new().push("name", name).page(page);
    let response = client.get_asset("/channel/byName.json", &params).await?;
    response.check_is_success()?;
    response.results()
}
