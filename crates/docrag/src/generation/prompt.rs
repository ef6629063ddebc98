//! Prompt templates for grounded answer generation

use crate::store::ScoredChunk;

/// Prompt builder for retrieval-augmented queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the context block from retrieved chunks
    pub fn build_context(results: &[ScoredChunk]) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let source = result
                .chunk
                .metadata
                .get("source")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");

            context.push_str(&format!(
                "[{}] {}\n\n{}\n\n---\n\n",
                i + 1,
                source,
                result.chunk.text
            ));
        }

        context
    }

    /// Build the full answer prompt
    ///
    /// The instructions forbid fabricating an answer when the context is
    /// insufficient.
    pub fn build_rag_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say that you don't know. Don't try to
make up an answer, and do not use knowledge from outside the context.

Context:
{context}

Question: {question}

Answer:"#,
            context = context,
            question = question
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn context_numbers_sources_in_order() {
        let mut chunk = Chunk::new(Uuid::new_v4(), "first passage".to_string(), 0, 1);
        chunk
            .metadata
            .insert("source".to_string(), json!("/docs/a.txt"));
        let results = vec![ScoredChunk { chunk, score: 0.9 }];

        let context = PromptBuilder::build_context(&results);
        assert!(context.starts_with("[1] /docs/a.txt"));
        assert!(context.contains("first passage"));
    }

    #[test]
    fn prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_rag_prompt("What is the budget?", "ctx");
        assert!(prompt.contains("Question: What is the budget?"));
        assert!(prompt.contains("ctx"));
        assert!(prompt.contains("don't know"));
    }
}
