//! Value types shared across asset families.
//!
//! These are the small JSON shapes Marketo embeds inside larger assets
//! (folder references, typed values, tags, costs) plus timestamp parsing.
//! Unknown fields are ignored everywhere so that new API fields never break
//! deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a folder or program acting as a folder:
/// `{"id": 12, "type": "Folder"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderId {
    pub id: i64,
    #[serde(rename = "type")]
    pub folder_type: FolderType,
}

impl FolderId {
    pub fn folder(id: i64) -> Self {
        FolderId {
            id,
            folder_type: FolderType::Folder,
        }
    }

    pub fn program(id: i64) -> Self {
        FolderId {
            id,
            folder_type: FolderType::Program,
        }
    }
}

/// Kind of container a [`FolderId`] points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FolderType {
    Folder,
    Program,
}

impl FolderType {
    pub fn as_str(self) -> &'static str {
        match self {
            FolderType::Folder => "Folder",
            FolderType::Program => "Program",
        }
    }
}

/// Folder reference as embedded in emails, templates and programs:
/// `{"type": "Folder", "value": 12, "folderName": "Assets"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicFolder {
    #[serde(rename = "type")]
    pub folder_type: FolderType,
    pub value: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
}

impl BasicFolder {
    pub fn folder_id(&self) -> FolderId {
        FolderId {
            id: self.value,
            folder_type: self.folder_type,
        }
    }
}

/// A `{"type": ..., "value": ...}` pair, used for email subject and sender
/// fields (`type` is `Text` or `DynamicContent`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeValue {
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// A program tag, or a tag type when returned by the tag-type endpoints.
///
/// As a program tag it carries `tagType` + `tagValue`. Tag types carry
/// `required`, `applicableProgramTypes` and `allowableValues` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub tag_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicable_program_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowable_values: Option<String>,
}

impl Tag {
    pub fn new(tag_type: &str, tag_value: &str) -> Self {
        Tag {
            tag_type: tag_type.to_string(),
            tag_value: Some(tag_value.to_string()),
            required: None,
            applicable_program_types: None,
            allowable_values: None,
        }
    }

    /// The `{tagType, tagValue}` identity sent when tagging a program.
    pub fn identity(&self) -> TagIdentity<'_> {
        TagIdentity {
            tag_type: &self.tag_type,
            tag_value: self.tag_value.as_deref(),
        }
    }

    /// `allowableValues` split on commas.
    pub fn allowable_value_list(&self) -> Vec<&str> {
        split_list(self.allowable_values.as_deref())
    }

    /// `applicableProgramTypes` split on commas.
    pub fn applicable_program_type_list(&self) -> Vec<&str> {
        split_list(self.applicable_program_types.as_deref())
    }
}

fn split_list(raw: Option<&str>) -> Vec<&str> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagIdentity<'a> {
    pub tag_type: &'a str,
    pub tag_value: Option<&'a str>,
}

/// A program period cost: `{"startDate": "2024-01-01", "cost": 500, "note": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    pub start_date: String,
    pub cost: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Cost {
    pub fn new(start_date: &str, cost: i64, note: Option<&str>) -> Self {
        Cost {
            start_date: start_date.to_string(),
            cost,
            note: note.map(str::to_string),
        }
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.start_date).or_else(|| {
            chrono::NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .map(|dt| dt.and_utc())
        })
    }
}

/// Parses a Marketo timestamp.
///
/// Accepts RFC 3339 and the asset API's `2016-09-09T22:00:49Z+0000` form,
/// where a numeric offset trails the `Z`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some((base, _offset)) = raw.split_once("Z+").or_else(|| raw.split_once("Z-")) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&format!("{base}Z")) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Accessors for the `createdAt` / `updatedAt` strings every asset carries.
pub trait Timestamped {
    fn created_at_raw(&self) -> Option<&str>;
    fn updated_at_raw(&self) -> Option<&str>;

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at_raw().and_then(parse_timestamp)
    }

    fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at_raw().and_then(parse_timestamp)
    }
}

/// Implements [`Timestamped`] for structs with `created_at` / `updated_at`
/// fields of type `Option<String>`.
macro_rules! impl_timestamped {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::entity::Timestamped for $ty {
                fn created_at_raw(&self) -> Option<&str> {
                    self.created_at.as_deref()
                }

                fn updated_at_raw(&self) -> Option<&str> {
                    self.updated_at.as_deref()
                }
            }
        )+
    };
}

pub(crate) use impl_timestamped;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn folder_id_serializes_compactly() {
        let json = serde_json::to_string(&FolderId::folder(12)).unwrap();
        assert_eq!(json, r#"{"id":12,"type":"Folder"}"#);
        let json = serde_json::to_string(&FolderId::program(1001)).unwrap();
        assert_eq!(json, r#"{"id":1001,"type":"Program"}"#);
    }

    #[test]
    fn basic_folder_converts_to_folder_id() {
        let folder: BasicFolder =
            serde_json::from_value(json!({"type": "Program", "value": 1044, "folderName": "Webinar"}))
                .unwrap();
        assert_eq!(folder.folder_name.as_deref(), Some("Webinar"));
        assert_eq!(folder.folder_id(), FolderId::program(1044));
    }

    #[test]
    fn tag_identity_has_only_type_and_value() {
        let tag = Tag::new("Region", "EMEA");
        let json = serde_json::to_string(&tag.identity()).unwrap();
        assert_eq!(json, r#"{"tagType":"Region","tagValue":"EMEA"}"#);
    }

    #[test]
    fn tag_type_lists_split_on_commas() {
        let tag: Tag = serde_json::from_value(json!({
            "tagType": "Region",
            "required": true,
            "applicableProgramTypes": "Program,Event, Webinar",
            "allowableValues": "EMEA,APAC,NA"
        }))
        .unwrap();
        assert_eq!(tag.required, Some(true));
        assert!(tag.tag_value.is_none());
        assert_eq!(tag.applicable_program_type_list(), vec!["Program", "Event", "Webinar"]);
        assert_eq!(tag.allowable_value_list(), vec!["EMEA", "APAC", "NA"]);
    }

    #[test]
    fn cost_round_trips_vendor_shape() {
        let cost = Cost::new("2024-03-01", 500, Some("Booth"));
        let value = serde_json::to_value(&cost).unwrap();
        assert_eq!(value, json!({"startDate": "2024-03-01", "cost": 500, "note": "Booth"}));
        let start = cost.start_date().unwrap();
        assert_eq!((start.year(), start.month(), start.day()), (2024, 3, 1));
    }

    #[test]
    fn cost_without_note_omits_it() {
        let value = serde_json::to_value(Cost::new("2024-03-01", 10, None)).unwrap();
        assert!(value.get("note").is_none());
    }

    #[test]
    fn parses_rfc3339_timestamps() {
        let dt = parse_timestamp("2016-09-09T22:00:49Z").unwrap();
        assert_eq!(dt.hour(), 22);
        let dt = parse_timestamp("2016-09-09T22:00:49+02:00").unwrap();
        assert_eq!(dt.hour(), 20);
    }

    #[test]
    fn parses_vendor_trailing_offset_timestamps() {
        let dt = parse_timestamp("2016-09-09T22:00:49Z+0000").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2016, 9, 9));
        assert_eq!(dt.second(), 49);
    }

    #[test]
    fn parses_compact_offset_timestamps() {
        let dt = parse_timestamp("2016-09-09T22:00:49+0000").unwrap();
        assert_eq!(dt.minute(), 0);
    }

    #[test]
    fn garbage_timestamp_is_none() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
