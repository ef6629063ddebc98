//! Supabase-compatible REST store backend
//!
//! Talks to a PostgREST endpoint: inserts go to the records table, and
//! nearest-neighbor queries go through an RPC function that matches on
//! embedding similarity and a metadata containment filter.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::types::{ScoredRecord, StoredRecord};

use super::backend::StoreBackend;

/// REST client for a Supabase-style vector table
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
    query_fn: String,
}

#[derive(Serialize)]
struct MatchRequest<'a> {
    query_embedding: &'a [f32],
    match_count: usize,
    filter: &'a HashMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct MatchRow {
    content: String,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
    similarity: f32,
}

impl SupabaseStore {
    /// Create a store client from configuration
    pub fn new(config: &StoreConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(Error::Config("store.base_url is required".into()));
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            service_key: config.service_key.clone(),
            table: config.table.clone(),
            query_fn: config.query_fn.clone(),
        })
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }
}

#[async_trait]
impl StoreBackend for SupabaseStore {
    async fn insert(&self, record: &StoredRecord) -> Result<()> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);

        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| Error::Insert(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Insert(format!("HTTP {} - {}", status, body)));
        }

        Ok(())
    }

    async fn query_nearest(
        &self,
        vector: &[f32],
        filter: &HashMap<String, serde_json::Value>,
        k: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, self.query_fn);

        let request = MatchRequest {
            query_embedding: vector,
            match_count: k,
            filter,
        };

        let response = self
            .authed(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Store(format!("query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("HTTP {} - {}", status, body)));
        }

        let rows: Vec<MatchRow> = response
            .json()
            .await
            .map_err(|e| Error::Store(format!("bad response: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| ScoredRecord {
                content: row.content,
                metadata: row.metadata,
                score: row.similarity,
            })
            .collect())
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
