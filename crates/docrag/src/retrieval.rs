//! Retrieval-answer orchestration

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::metadata::MetadataEnricher;
use crate::providers::LlmProvider;
use crate::store::VectorStoreGateway;
use crate::types::{AnswerResponse, SourceRef};

/// Answer returned when retrieval finds nothing or the request fails
pub const FALLBACK_ANSWER: &str = "I don't have enough information to answer that question.";

/// Orchestrates one question: filter resolution, retrieval, generation
pub struct AnswerEngine {
    gateway: Arc<VectorStoreGateway>,
    llm: Arc<dyn LlmProvider>,
    enricher: MetadataEnricher,
    top_k: usize,
}

impl AnswerEngine {
    pub fn new(gateway: Arc<VectorStoreGateway>, llm: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self {
            gateway,
            llm,
            enricher: MetadataEnricher::new(),
            top_k,
        }
    }

    /// Answer a question, constrained to chunks matching the filter
    ///
    /// Always returns a structured response. Failures in retrieval or
    /// generation degrade to the fallback answer with the error flag set;
    /// they are never propagated to the caller.
    pub async fn ask(
        &self,
        question: &str,
        caller_filter: Option<&HashMap<String, serde_json::Value>>,
    ) -> AnswerResponse {
        match self.try_answer(question, caller_filter).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Query failed: {}", e);
                AnswerResponse::failed(FALLBACK_ANSWER)
            }
        }
    }

    async fn try_answer(
        &self,
        question: &str,
        caller_filter: Option<&HashMap<String, serde_json::Value>>,
    ) -> Result<AnswerResponse> {
        let filter = self.enricher.resolve_filter(caller_filter);

        let results = self
            .gateway
            .similarity_search(question, &filter, self.top_k)
            .await?;

        if results.is_empty() {
            // Nothing to ground an answer on; skip the generation call
            tracing::info!("No chunks matched the query filter");
            return Ok(AnswerResponse::fallback(FALLBACK_ANSWER));
        }

        let context = PromptBuilder::build_context(&results);
        let answer = self.llm.generate(question, &context).await?;

        let sources = results
            .iter()
            .map(|r| SourceRef::from_chunk(&r.chunk))
            .collect();

        Ok(AnswerResponse::answered(answer, sources))
    }
}
