pub mod evidence;
pub mod llm;
pub mod normalize;
pub use kblog_types as types;
pub mod validate;

use crate::config::Config;
use crate::error::GenerateError;
use crate::prompt;
use evidence::SearchClient;
use llm::CompletionClient;
use reqwest::Client;
use tracing::Instrument;
use types::GenerationResult;
use uuid::Uuid;

/// Where a request currently is. Any stage can end in a terminal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Validating,
    Fetching,
    Assembling,
    Generating,
    Normalizing,
}

/// Keyword → search → prompt → completion → post. One pass, no retries.
#[derive(Clone)]
pub struct Generator {
    search: SearchClient,
    llm: CompletionClient,
    max_keyword_chars: usize,
}

impl Generator {
    pub fn new(http: Client, cfg: &Config) -> Self {
        Self {
            search: SearchClient::new(http.clone(), cfg.search.clone()),
            llm: CompletionClient::new(http, cfg.generation.clone()),
            max_keyword_chars: cfg.input.max_keyword_chars,
        }
    }

    pub async fn run(&self, raw_keyword: &str) -> Result<GenerationResult, GenerateError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("generate", %request_id);
        async move {
            let result = self.run_stages(raw_keyword).await;
            match &result {
                Ok(_) => tracing::info!("generation finished"),
                Err((stage, e)) => tracing::warn!(?stage, kind = e.kind(), error = %e, "generation failed"),
            }
            result.map_err(|(_, e)| e)
        }
        .instrument(span)
        .await
    }

    async fn run_stages(&self, raw_keyword: &str) -> Result<GenerationResult, (Stage, GenerateError)> {
        tracing::debug!(stage = ?Stage::Validating);
        let topic = validate::validate_keyword(raw_keyword, self.max_keyword_chars)
            .map_err(|e| (Stage::Validating, e.into()))?;
        if !self.llm.has_credential() {
            return Err((Stage::Validating, GenerateError::MissingCredential));
        }

        tracing::debug!(stage = ?Stage::Fetching, %topic);
        let evidence = self.search.fetch(topic).await;
        tracing::info!(results = evidence.result_count(), evidence_chars = evidence.as_text().chars().count(), "evidence ready");

        tracing::debug!(stage = ?Stage::Assembling);
        let conversation = prompt::assemble(topic, &evidence);

        tracing::debug!(stage = ?Stage::Generating, model = self.llm.model());
        let raw = self.llm.complete(conversation).await.map_err(|e| (Stage::Generating, e))?;

        tracing::debug!(stage = ?Stage::Normalizing, completion_chars = raw.chars().count());
        normalize::normalize(&raw).map_err(|e| (Stage::Normalizing, e.into()))
    }
}
