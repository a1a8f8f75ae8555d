//! Email asset lookups.

use serde::{Deserialize, Serialize};

use crate::client::MarketoClient;
use crate::entity::{BasicFolder, FolderId, TypeValue, impl_timestamped};
use crate::error::Result;
use crate::params::{Page, Params};

/// An email asset.
///
/// Reference: <https://developer.adobe.com/marketo-apis/api/asset/#tag/Emails>
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Email {
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
    pub subject: Option<TypeValue>,
    #[serde(default)]
    pub from_name: Option<TypeValue>,
    #[serde(default)]
    pub from_email: Option<TypeValue>,
    #[serde(default)]
    pub reply_email: Option<TypeValue>,
    #[serde(default)]
    pub folder: Option<BasicFolder>,
    #[serde(default)]
    pub operational: bool,
    #[serde(default)]
    pub text_only: bool,
    #[serde(default, rename = "publishToMSI")]
    pub publish_to_msi: bool,
    #[serde(default)]
    pub web_view: bool,
    /// `draft` or `approved`.
    #[serde(default)]
    pub status: Option<String>,
    /// Id of the email template the email was built from.
    #[serde(default)]
    pub template: Option<i64>,
    #[serde(default)]
    pub workspace: Option<String>,
    /// Email editor version (1 or 2).
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub auto_copy_to_text: bool,
    #[serde(default)]
    pub cc_fields: Vec<CcField>,
    #[serde(default)]
    pub pre_header: Option<String>,
}

impl_timestamped!(Email);

/// A lead/company field usable as an email CC address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CcField {
    pub attribute_id: String,
    pub object_name: String,
    pub display_name: String,
    #[serde(default)]
    pub api_name: Option<String>,
}

/// Filters for [`browse_emails`].
#[derive(Debug, Clone, Default)]
pub struct EmailFilter {
    /// `draft` or `approved`.
    pub status: Option<String>,
    pub folder: Option<FolderId>,
    pub page: Page,
}

impl EmailFilter {
    fn to_params(&self) -> Result<Params> {
        let status = self.status.as_deref().filter(|s| !s.is_empty());
        let mut params = Params::new().push_opt("status", status);
        if let Some(folder) = &self.folder {
            params = params.push_json("folder", folder)?;
        }
        Ok(params.page(&self.page))
    }
}

pub async fn get_email_by_id(client: &MarketoClient, id: i64) -> Result<Option<Email>> {
    let response = client
        .get_asset(&format!("/email/{id}.json"), &Params::new())
        .await?;
    response.check_is_success()?;
    response.single_valid_result()
}

/// Retrieves an email by exact name, optionally restricted to a folder.
pub async fn get_email_by_name(
    client: &MarketoClient,
    name: &str,
    folder: Option<&FolderId>,
) -> Result<Option<Email>> {
    let mut params = Params::new().push("name", name);
    if let Some(folder) = folder {
        params = params.push_json("folder", folder)?;
    }
    let response = client.get_asset("/email/byName.json", &params).await?;
    response.check_is_success()?;
    response.single_valid_result()
}

pub async fn browse_emails(client: &MarketoClient, filter: &EmailFilter) -> Result<Vec<Email>> {
    let response = client.get_asset("/emails.json", &filter.to_params()?).await?;
    response.check_is_success()?;
    response.results()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::FolderType;

    #[test]
    fn email_deserializes_vendor_payload() {
        let json = r#"{
            "id": 1356,
            "name": "Welcome",
            "description": "",
            "createdAt": "2016-03-21T19:06:37Z+0000",
            "updatedAt": "2016-03-21T19:06:37Z+0000",
            "url": "https://app-abm.marketo.com/#EM1356A1",
            "subject": {"type": "Text", "value": "Welcome aboard"},
            "fromName": {"type": "Text", "value": "Acme"},
            "fromEmail": {"type": "Text", "value": "hello@acme.com"},
            "replyEmail": {"type": "Text", "value": "support@acme.com"},
            "folder": {"type": "Program", "value": 1044, "folderName": "Onboarding"},
            "operational": false,
            "textOnly": false,
            "publishToMSI": true,
            "webView": false,
            "status": "approved",
            "template": 1061,
            "workspace": "Default",
            "isOpenTrackingDisabled": false,
            "version": 2,
            "autoCopyToText": true,
            "ccFields": [
                {"attributeId": "167", "objectName": "lead", "displayName": "Lead Owner Email Address", "apiName": "leadOwnerEmail"}
            ],
            "preHeader": "Thanks for joining"
        }"#;
        let email: Email = serde_json::from_str(json).unwrap();
        assert_eq!(email.id, 1356);
        assert_eq!(email.subject.unwrap().value.as_deref(), Some("Welcome aboard"));
        assert_eq!(email.folder.unwrap().folder_type, FolderType::Program);
        assert!(email.publish_to_msi);
        assert!(email.auto_copy_to_text);
        assert_eq!(email.template, Some(1061));
        assert_eq!(email.cc_fields.len(), 1);
        assert_eq!(email.cc_fields[0].api_name.as_deref(), Some("leadOwnerEmail"));
        assert_eq!(email.pre_header.as_deref(), Some("Thanks for joining"));
    }

    #[test]
    fn publish_to_msi_serializes_with_vendor_casing() {
        let email: Email = serde_json::from_str(r#"{"id": 1, "name": "x", "publishToMSI": true}"#).unwrap();
        let value = serde_json::to_value(&email).unwrap();
        assert_eq!(value["publishToMSI"], true);
    }

    #[test]
    fn empty_filter_sends_nothing() {
        assert!(EmailFilter::default().to_params().unwrap().is_empty());
    }

    #[test]
    fn filter_encodes_folder_as_json() {
        let filter = EmailFilter {
            status: Some("approved".to_string()),
            folder: Some(FolderId::folder(42)),
            page: Page::new(50, 100),
        };
        let params = filter.to_params().unwrap();
        assert_eq!(params.get("status"), Some("approved"));
        assert_eq!(params.get("folder"), Some(r#"{"id":42,"type":"Folder"}"#));
        assert_eq!(params.get("maxReturn"), Some("50"));
        assert_eq!(params.get("offset"), Some("100"));
    }
}
