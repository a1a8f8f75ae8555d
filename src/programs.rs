//! Program lookup and management for the asset API.
//!
//! Covers the "Programs" endpoint family:
//!
//! - lookups: [`get_program_by_id`], [`get_program_by_name`],
//!   [`browse_programs`], [`get_programs_by_tag`]
//! - mutations: [`create_program`], [`update_program`], [`clone_program`],
//!   [`delete_program`]
//! - email-program scheduling: [`approve_program`], [`unapprove_program`]
//!
//! Costs and tags travel as JSON arrays inside a single form parameter.
//!
//! Reference: <https://developer.adobe.com/marketo-apis/api/asset/#tag/Programs>

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::{BasicFolder, Cost, FolderId, Tag, TagIdentity, impl_timestamped};
use crate::error::{MarketoError, Result};
use crate::params::{Page, Params};
use crate::response::IdResult;

// ── Response types ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
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
    /// `program`, `event`, `webinar`, `nurture` (engagement) or `Email`.
    #[serde(rename = "type", default)]
    pub program_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub folder: Option<BasicFolder>,
    /// `on`/`off` for engagement programs, `locked`/`unlocked` for email
    /// programs, empty otherwise.
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub costs: Vec<Cost>,
}

impl_timestamped!(Program);

// ── Request types ──────────────────────────────────────────────────────

/// Filters for [`browse_programs`].
///
/// `earliest_updated_at` / `latest_updated_at` bound the window in which a
/// program was created or last updated.
#[derive(Debug, Clone, Default)]
pub struct ProgramFilter {
    pub status: Option<String>,
    pub page: Page,
    pub earliest_updated_at: Option<DateTime<Utc>>,
    pub latest_updated_at: Option<DateTime<Utc>>,
}

impl ProgramFilter {
    fn to_params(&self) -> Params {
        Params::new()
            .push_opt("status", self.status.as_deref())
            .page(&self.page)
            .push_opt("earliestUpdatedAt", self.earliest_updated_at.map(rfc3339))
            .push_opt("latestUpdatedAt", self.latest_updated_at.map(rfc3339))
    }
}

fn rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// Fields for [`create_program`].
#[derive(Debug, Clone)]
pub struct NewProgram {
    pub folder: FolderId,
    pub name: String,
    pub program_type: String,
    pub channel: String,
    pub description: Option<String>,
    pub costs: Option<Vec<Cost>>,
    pub tags: Option<Vec<Tag>>,
}

impl NewProgram {
    pub fn new(folder: FolderId, name: &str, program_type: &str, channel: &str) -> Self {
        NewProgram {
            folder,
            name: name.to_string(),
            program_type: program_type.to_string(),
            channel: channel.to_string(),
            description: None,
            costs: None,
            tags: None,
        }
    }

    fn to_params(&self) -> Result<Params> {
        let params = Params::new()
            .push_json("folder", &self.folder)?
            .push("name", &self.name)
            .push("type", &self.program_type)
            .push("channel", &self.channel)
            .push_opt("description", self.description.as_deref());
        push_costs_and_tags(params, self.costs.as_deref(), self.tags.as_deref())
    }
}

/// Fields for [`update_program`]. At least one must be set.
///
/// Costs are appended by default. Set `costs_destructive_update` to replace
/// them instead; with no `costs` that clears every cost.
#[derive(Debug, Clone, Default)]
pub struct ProgramUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub costs: Option<Vec<Cost>>,
    pub costs_destructive_update: Option<bool>,
    pub tags: Option<Vec<Tag>>,
}

impl ProgramUpdate {
    fn to_params(&self) -> Result<Params> {
        let params = Params::new()
            .push_opt("name", self.name.as_deref())
            .push_opt("description", self.description.as_deref())
            .push_opt("costsDestructiveUpdate", self.costs_destructive_update);
        push_costs_and_tags(params, self.costs.as_deref(), self.tags.as_deref())
    }
}

fn push_costs_and_tags(
    mut params: Params,
    costs: Option<&[Cost]>,
    tags: Option<&[Tag]>,
) -> Result<Params> {
    if let Some(costs) = costs {
        params = params.push_json("costs", costs)?;
    }
    if let Some(tags) = tags {
        let identities: Vec<TagIdentity<'_>> = tags.iter().map(Tag::identity).collect();
        params = params.push_json("tags", &identities)?;
    }
    Ok(params)
}

// ── Endpoint functions ─────────────────────────────────────────────────

pub async fn get_program_by_id(client: &MarketoClient, id: i64) -> Result<Option<Program>> {
    let response = client
        .get_asset(&format!("/program/{id}.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    response.single_valid_result()
}

/// Retrieves a program by exact name. Tags and costs are only populated
/// when requested.
pub async fn get_program_by_name(
    client: &MarketoClient,
    name: &str,
    include_tags: bool,
    include_costs: bool,
) -> Result<Option<Program>> {
    let params = Params::new()
        .push("name", name)
        .push_opt("includeTags", include_tags.then_some(true))
        .push_opt("includeCosts", include_costs.then_some(true));
    let response = client.get_asset("/program/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}

pub async fn browse_programs(
    client: &MarketoClient,
    filter: &ProgramFilter,
) -> Result<Vec<Program>> {
    let response = client.get_asset("/programs.json", &filter.to_params()).await?;
    response.check_is_success()?;
    response.results()
}

/// Lists programs carrying the given tag type and value.
pub async fn get_programs_by_tag(
    client: &MarketoClient,
    tag: &Tag,
    page: &Page,
) -> Result<Vec<Program>> {
    let params = Params::new()
        .push("tagType", &tag.tag_type)
        .push_opt("tagValue", tag.tag_value.as_deref())
        .page(page);
    let response = client.get_asset("/program/byTag.json", &params).await?;
    response.check_is_success()?;
    response.results()
}

pub async fn create_program(client: &MarketoClient, program: &NewProgram) -> Result<Program> {
    let response = client
        .post_asset("/programs.json", &program.to_params()?)
        .await?;
    response.check_is_success()?;
    response.first_result()
}

/// Updates a program. Fails with [`MarketoError::InvalidArgument`] before
/// sending anything when `update` carries no fields.
pub async fn update_program(
    client: &MarketoClient,
    id: i64,
    update: &ProgramUpdate,
) -> Result<Program> {
    let params = update.to_params()?;
    if params.is_empty() {
        return Err(MarketoError::InvalidArgument(
            "missing fields to update".to_string(),
        ));
    }
    let response = client
        .post_asset(&format!("/program/{id}.json"), &params)
        .await?;
    response.check_is_success()?;
    response.first_result()
}

/// Approves an email program so it runs between its start and end dates.
pub async fn approve_program(client: &MarketoClient, id: i64) -> Result<i64> {
    post_for_id(client, &format!("/program/{id}/approve.json")).await
}

pub async fn unapprove_program(client: &MarketoClient, id: i64) -> Result<i64> {
    post_for_id(client, &format!("/program/{id}/unapprove.json")).await
}

pub async fn delete_program(client: &MarketoClient, id: i64) -> Result<i64> {
    post_for_id(client, &format!("/program/{id}/delete.json")).await
}

/// Clones a program into `folder` under a new, globally unique `name`.
pub async fn clone_program(
    client: &MarketoClient,
    id: i64,
    folder: &FolderId,
    name: &str,
    description: Option<&str>,
) -> Result<Program> {
    let params = Params::new()
        .push_json("folder", folder)?
        .push("name", name)
        .push_opt("description", description);
    let response = client
        .post_asset(&format!("/program/{id}/clone.json"), &params)
        .await?;
    response.check_is_success()?;
    response.first_result()
}

async fn post_for_id(client: &MarketoClient, uri: &str) -> Result<i64> {
    let response = client.post_asset(uri, &Params::new()).await?;
    response.check_is_success()?;
    Ok(response.first_result::<IdResult>()?.id)
}
