//! Request types for the HTTP API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Request to ingest a local directory
#[derive(Debug, Clone, Deserialize)]
pub struct IngestLocalRequest {
    /// Directory to walk
    pub input_dir: String,
    /// Tag applied to every chunk (defaults to "Local")
    #[serde(default)]
    pub storage_type: Option<String>,
}

/// Request to ingest a cloud drive folder
#[derive(Debug, Clone, Deserialize)]
pub struct IngestDriveRequest {
    /// Drive folder id
    pub folder_id: String,
    /// OAuth bearer token for the drive API
    pub access_token: String,
    /// Tag applied to every chunk (defaults to "GoogleDrive")
    #[serde(default)]
    pub storage_type: Option<String>,
}

/// Request to ingest an object-storage bucket
#[derive(Debug, Clone, Deserialize)]
pub struct IngestBucketRequest {
    /// Bucket name
    pub bucket: String,
    /// Optional folder prefix within the bucket
    #[serde(default)]
    pub prefix: Option<String>,
    /// Tag applied to every chunk (defaults to "BucketStorage")
    #[serde(default)]
    pub storage_type: Option<String>,
}

/// Question against the indexed corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Natural-language question
    pub question: String,
    /// Shorthand filter on the `storage_type` attribute
    #[serde(default)]
    pub storage_type: Option<String>,
    /// Full attribute filter; wins over `storage_type` when both are set
    #[serde(default)]
    pub filter: Option<HashMap<String, serde_json::Value>>,
}

impl QueryRequest {
    /// Resolve the caller's filter intent, if any
    pub fn caller_filter(&self) -> Option<HashMap<String, serde_json::Value>> {
        if let Some(filter) = &self.filter {
            return Some(filter.clone());
        }
        self.storage_type.as_ref().map(|storage_type| {
            let mut filter = HashMap::new();
            filter.insert(
                "storage_type".to_string(),
                serde_json::Value::String(storage_type.clone()),
            );
            filter
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_filter_from_storage_type() {
        let request = QueryRequest {
            question: "q".into(),
            storage_type: Some("Local".into()),
            filter: None,
        };
        let filter = request.caller_filter().unwrap();
        assert_eq!(filter["storage_type"], serde_json::json!("Local"));
    }

    #[test]
    fn explicit_filter_wins_over_storage_type() {
        let mut explicit = HashMap::new();
        explicit.insert("tenant_id".to_string(), serde_json::json!("acme"));
        let request = QueryRequest {
            question: "q".into(),
            storage_type: Some("Local".into()),
            filter: Some(explicit),
        };
        let filter = request.caller_filter().unwrap();
        assert!(filter.contains_key("tenant_id"));
        assert!(!filter.contains_key("storage_type"));
    }

    #[test]
    fn no_filter_when_nothing_supplied() {
        let request = QueryRequest {
            question: "q".into(),
            storage_type: None,
            filter: None,
        };
        assert!(request.caller_filter().is_none());
    }
}
