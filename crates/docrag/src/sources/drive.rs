//! Cloud drive source (Google Drive v3 REST)
//!
//! Lists and downloads files from a drive folder using a caller-supplied
//! bearer token; the OAuth flow that produced the token is out of scope.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::types::SourceKind;

use super::{DocumentSource, SourceFile};

/// Extensions the ingestion pipeline accepts, used to build the mime query
const SUPPORTED_EXTENSIONS: [&str; 5] = ["pdf", "docx", "pptx", "xlsx", "txt"];

/// Drive folder source
pub struct DriveSource {
    client: Client,
    api_base: String,
    access_token: String,
    folder_id: String,
}

#[derive(Deserialize)]
struct FileList {
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
    #[serde(default)]
    files: Vec<FileEntry>,
}

#[derive(Deserialize)]
struct FileEntry {
    id: String,
    name: String,
}

impl DriveSource {
    pub fn new(
        api_base: impl Into<String>,
        access_token: impl Into<String>,
        folder_id: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
            folder_id: folder_id.into(),
        }
    }

    /// Build the drive query: folder scope, not trashed, supported mime types
    fn list_query(&self) -> String {
        let mime_types: Vec<String> = SUPPORTED_EXTENSIONS
            .iter()
            .filter_map(|ext| mime_guess::from_ext(ext).first())
            .map(|mime| format!("mimeType='{}'", mime.essence_str()))
            .collect();

        format!(
            "'{}' in parents and trashed=false and ({})",
            self.folder_id,
            mime_types.join(" or ")
        )
    }
}

#[async_trait]
impl DocumentSource for DriveSource {
    async fn list(&self) -> Result<Vec<SourceFile>> {
        let url = format!("{}/files", self.api_base);
        let query = self.list_query();

        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[
                    ("q", query.as_str()),
                    ("spaces", "drive"),
                    ("fields", "nextPageToken, files(id, name, mimeType)"),
                ]);

            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| Error::source(format!("drive list failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Error::source(format!(
                    "drive list failed: HTTP {}",
                    response.status()
                )));
            }

            let page: FileList = response
                .json()
                .await
                .map_err(|e| Error::source(format!("bad drive response: {}", e)))?;

            files.extend(page.files.into_iter().map(|f| SourceFile {
                path: f.id,
                name: f.name,
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(files)
    }

    async fn fetch(&self, file: &SourceFile) -> Result<Vec<u8>> {
        let url = format!("{}/files/{}", self.api_base, file.path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(|e| Error::source(format!("drive download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::source(format!(
                "drive download of '{}' failed: HTTP {}",
                file.name,
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Drive
    }
}
