use crate::config::Config;
use crate::generate::Generator;
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub version: &'static str,
    pub config: Arc<Config>,
    pub generator: Generator,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<SharedState> {
        // one pooled client for both providers
        let http = reqwest::Client::builder()
            .user_agent(concat!("kblog-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        let generator = Generator::new(http, &config);
        if config.search.api_key.is_none() {
            tracing::warn!("BRAVE_API_KEY not set; posts will be generated without search evidence");
        }
        if config.generation.api_key.is_none() {
            tracing::warn!("OPENAI_API_KEY not set; /api/generate will fail until it is configured");
        }
        Ok(Arc::new(AppState {
            version: env!("CARGO_PKG_VERSION"),
            config: Arc::new(config),
            generator,
        }))
    }
}
