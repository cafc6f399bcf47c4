use anyhow::Context;
use kblog_types::GenerationResult;
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

/// How the server answered a generate call.
#[derive(Debug)]
pub enum ServerReply {
    Post(GenerationResult),
    Rejected { status: u16, message: String },
}

#[derive(Clone)]
pub struct GenerateClient {
    http: Client,
    base: String,
}

impl GenerateClient {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("kblog-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building http client")?;
        Ok(Self { http, base: base.trim_end_matches('/').to_string() })
    }

    /// Transport failures are errors; HTTP failures come back as `Rejected`.
    pub async fn generate(&self, keyword: &str) -> anyhow::Result<ServerReply> {
        #[derive(Deserialize)]
        struct ErrorBody { error: Option<String> }

        let resp = self.http
            .post(format!("{}/api/generate", self.base))
            .json(&serde_json::json!({ "keyword": keyword }))
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let txt = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&txt)
                .ok()
                .and_then(|b| b.error)
                .unwrap_or_else(|| "오류가 발생했습니다.".to_string());
            return Ok(ServerReply::Rejected { status: status.as_u16(), message });
        }
        let post: GenerationResult = resp.json().await.context("decoding generated post")?;
        Ok(ServerReply::Post(post))
    }
}
