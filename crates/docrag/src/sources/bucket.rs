//! Object-storage bucket source
//!
//! Speaks the Supabase Storage REST shape: object listing under
//! `storage/v1/object/list/{bucket}` and direct downloads under
//! `storage/v1/object/{bucket}/{path}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::SourceKind;

use super::{DocumentSource, SourceFile};

/// Object-storage bucket source
pub struct BucketSource {
    client: Client,
    base_url: String,
    service_key: String,
    bucket: String,
    prefix: Option<String>,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: usize,
}

#[derive(Deserialize)]
struct ObjectEntry {
    name: String,
    /// Folders are listed with a null id; files always carry one
    id: Option<String>,
}

impl BucketSource {
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
        prefix: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
            prefix,
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    fn object_path(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}/{}", prefix.trim_end_matches('/'), name),
            None => name.to_string(),
        }
    }
}

#[async_trait]
impl DocumentSource for BucketSource {
    async fn list(&self) -> Result<Vec<SourceFile>> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, self.bucket);
        let body = ListRequest {
            prefix: self.prefix.as_deref().unwrap_or(""),
            limit: 1000,
        };

        let response = self
            .authed(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::source(format!("bucket list failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::source(format!(
                "bucket list failed: HTTP {}",
                response.status()
            )));
        }

        let entries: Vec<ObjectEntry> = response
            .json()
            .await
            .map_err(|e| Error::source(format!("bad bucket response: {}", e)))?;

        Ok(entries
            .into_iter()
            .filter(|e| e.id.is_some())
            .map(|e| SourceFile {
                path: self.object_path(&e.name),
                name: e.name,
            })
            .collect())
    }

    async fn fetch(&self, file: &SourceFile) -> Result<Vec<u8>> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, file.path
        );

        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::source(format!("bucket download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::source(format!(
                "bucket download of '{}' failed: HTTP {}",
                file.name,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Bucket
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_joins_prefix() {
        let source = BucketSource::new(
            "https://example.test",
            "key",
            "docs",
            Some("reports/".to_string()),
        );
        assert_eq!(source.object_path("q3.pdf"), "reports/q3.pdf");

        let bare = BucketSource::new("https://example.test", "key", "docs", None);
        assert_eq!(bare.object_path("q3.pdf"), "q3.pdf");
    }
}
