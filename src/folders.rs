//! Folder lookup and management for the asset API.
//!
//! - [`get_folder_by_id`] / [`get_folder_by_name`]: single-folder lookups.
//! - [`browse_folders`]: children of a root folder.
//! - [`create_folder`], [`update_folder`], [`delete_folder`]: mutations.
//!
//! Lookups return `None` (or an empty list) when Marketo answers with a
//! successful envelope but no result. Mutations require a result and fail
//! with [`MarketoError::InvalidResult`](crate::error::MarketoError::InvalidResult)
//! otherwise.

use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::{FolderId, impl_timestamped};
use crate::error::Result;
use crate::params::Params;
use crate::response::IdResult;

/// A folder (or a program acting as a folder) as returned by the asset API.
///
/// Reference: <https://developer.adobe.com/marketo-apis/api/asset/#tag/Folders>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
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
    pub folder_id: FolderId,
    /// `Folder`, `Email`, `Landing Page`, `Marketing Program`, etc.
    #[serde(default)]
    pub folder_type: Option<String>,
    /// `None` for top-level folders.
    #[serde(default)]
    pub parent: Option<FolderId>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub is_archive: bool,
    #[serde(default)]
    pub is_system: bool,
    #[serde(default)]
    pub access_zone_id: Option<i64>,
    #[serde(default)]
    pub workspace: Option<String>,
}

impl_timestamped!(Folder);

/// Optional fields for [`update_folder`]. Empty strings are treated as
/// "leave unchanged".
#[derive(Debug, Clone, Default)]
pub struct FolderUpdate {
    /// `Folder` or `Program`; defaults to `Folder`.
    pub folder_type: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_archive: Option<bool>,
}

impl FolderUpdate {
    fn to_params(&self) -> Params {
        Params::new()
            .push("type", self.folder_type.as_deref().unwrap_or("Folder"))
            .push_opt("name", non_empty(self.name.as_deref()))
            .push_opt("description", non_empty(self.description.as_deref()))
            .push_opt("isArchive", self.is_archive)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Retrieves a folder by numeric id.
pub async fn get_folder_by_id(client: &MarketoClient, id: i64) -> Result<Option<Folder>> {
    let response = client
        .get_asset(&format!("/folder/{id}.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    response.single_valid_result()
}

/// Retrieves a folder by exact name, optionally scoped to a parent folder.
pub async fn get_folder_by_name(
    client: &MarketoClient,
    name: &str,
    root: Option<&FolderId>,
) -> Result<Option<Folder>> {
    let mut params = Params::new().push("name", name);
    if let Some(root) = root {
        params = params.push_json("root", root)?;
    }
    let response = client.get_asset("/folder/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}

/// Lists the folders under `root`.
pub async fn browse_folders(client: &MarketoClient, root: &FolderId) -> Result<Vec<Folder>> {
    let params = Params::new().push_json("root", root)?;
    let response = client.get_asset("/folders.json", &params).await?;
    response.check_is_success()?;
    response.results()
}

/// Creates a folder named `name` under `parent`.
pub async fn create_folder(
    client: &MarketoClient,
    name: &str,
    parent: &FolderId,
    description: Option<&str>,
) -> Result<Folder> {
    let params = Params::new()
        .push_json("parent", parent)?
        .push("name", name)
        .push_opt("description", non_empty(description));
    let response = client.post_asset("/folders.json", &params).await?;
    response.check_is_success()?;
    response.first_result()
}

/// Updates a folder's name, description or archive flag.
pub async fn update_folder(
    client: &MarketoClient,
    id: i64,
    update: &FolderUpdate,
) -> Result<Folder> {
    let response = client
        .post_asset(&format!("/folder/{id}.json"), &update.to_params())
        .await?;
    response.check_is_success()?;
    response.first_result()
}

/// Deletes a folder and returns its id.
pub async fn delete_folder(client: &MarketoClient, id: i64) -> Result<i64> {
    let response = client
        .post_asset(&format!("/folder/{id}/delete.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    Ok(response.first_result::<IdResult>()?.id)
}
