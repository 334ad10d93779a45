use crate::context::build_context;
use crate::error::Result;
use crate::generative::{GenerationRequest, GenerativeClient};
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::record::{record_to_query, ApplicationRecord};
use std::time::Duration;
use tmep_embedding::Embedder;
use tmep_index::{retrieve, VectorIndex};
use tmep_risk::apply_risk_engine;

/// Fixed user-safe text returned when the generative call exceeds the
/// wall-clock budget. Raw timing detail stays in the logs.
pub const TIMEOUT_MESSAGE: &str = "LLM request timed out. Please retry.";

/// Fixed user-safe text returned when the generative call fails. Provider
/// error detail stays in the logs, never in the response body.
pub const GENERATION_ERROR_MESSAGE: &str = "Error generating analysis. Please review logs.";

/// Tunables for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Number of evidence chunks requested from the index
    pub top_k: usize,

    /// Hard wall-clock budget for the generative call
    pub timeout: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Run the full query-time pipeline for one application record.
///
/// Record text, retrieval, context assembly, and prompting are all
/// deterministic; only the generative call is not. The generative step runs
/// under [`AnalysisOptions::timeout`] and degrades to fixed messages on
/// timeout or failure rather than erroring out, since by that point the
/// retrieval work has already succeeded. A no-evidence retrieval outcome
/// propagates as [`crate::RagError::NoEvidence`] for the caller to render.
pub async fn generate_assessment(
    index: &dyn VectorIndex,
    embedder: &Embedder,
    client: &dyn GenerativeClient,
    record: &ApplicationRecord,
    doc_version: &str,
    options: &AnalysisOptions,
) -> Result<String> {
    let query = record_to_query(record);
    let retrieved = retrieve(index, embedder, &query, doc_version, options.top_k).await?;
    log::info!(
        "retrieved {} chunk(s) for doc_version {doc_version}",
        retrieved.len()
    );

    let context = build_context(&retrieved);
    let request = GenerationRequest::new(SYSTEM_PROMPT, build_user_prompt(&context, &query));

    let generated = match tokio::time::timeout(options.timeout, client.complete(&request)).await {
        Err(_elapsed) => {
            log::error!(
                "generative call exceeded {}s budget",
                options.timeout.as_secs()
            );
            return Ok(TIMEOUT_MESSAGE.to_string());
        }
        Ok(Err(err)) => {
            log::error!("generative call failed: {err}");
            return Ok(GENERATION_ERROR_MESSAGE.to_string());
        }
        Ok(Ok(text)) => text,
    };

    let citations: Vec<String> = retrieved.iter().map(|r| r.section_id.clone()).collect();
    Ok(apply_risk_engine(&generated, Some(&citations)))
}
