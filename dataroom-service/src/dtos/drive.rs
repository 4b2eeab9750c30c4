use crate::dtos::FileResponse;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

/// File metadata as returned by Drive v3 `files.list`.
///
/// Only the fields requested through the `fields` selector are present.
/// See https://developers.google.com/drive/api/reference/rest/v3/files#File
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    /// Drive reports sizes as decimal strings; Google-native documents have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriveFileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveListParams {
    pub page_token: Option<String>,
    pub query: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportRequest {
    #[validate(length(min = 1, message = "file_id is required"))]
    pub file_id: String,
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Accepts a number, a numeric string (as Drive reports it) or null.
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub success: bool,
    pub file: FileResponse,
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SizeField {
        Number(i64),
        Text(String),
    }

    match Option::<SizeField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(SizeField::Number(n)) => Ok(Some(n)),
        Some(SizeField::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(SizeField::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid size: {}", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: serde_json::Value) -> ImportRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn size_accepts_number_string_and_null() {
        let base = serde_json::json!({"file_id": "abc", "name": "a.pdf", "mime_type": "application/pdf"});

        let mut numeric = base.clone();
        numeric["size"] = serde_json::json!(1024);
        assert_eq!(parse(numeric).size, Some(1024));

        let mut text = base.clone();
        text["size"] = serde_json::json!("2048");
        assert_eq!(parse(text).size, Some(2048));

        let mut null = base.clone();
        null["size"] = serde_json::Value::Null;
        assert_eq!(parse(null).size, None);

        assert_eq!(parse(base).size, None);
    }

    #[test]
    fn size_rejects_garbage() {
        let body = serde_json::json!({"file_id": "abc", "name": "a", "size": "lots"});
        assert!(serde_json::from_value::<ImportRequest>(body).is_err());
    }

    #[test]
    fn empty_file_id_fails_validation() {
        let request = parse(serde_json::json!({"file_id": "", "name": "a"}));
        assert!(request.validate().is_err());
    }

    #[test]
    fn drive_list_omits_missing_page_token() {
        let list = DriveFileList {
            files: vec![],
            next_page_token: None,
        };
        let json = serde_json::to_value(&list).unwrap();
        assert!(json.get("nextPageToken").is_none());
    }
}
