use crate::client::{GenerateClient, ServerReply};
use kblog_types::GenerationResult;
use kblog_usage::{Clock, UsageGate, UsageStore};

pub const NETWORK_ERROR: &str = "네트워크 오류가 발생했습니다. 인터넷 연결을 확인해주세요.";
const EMPTY_KEYWORD: &str = "키워드를 입력해주세요.";

#[derive(Debug)]
pub enum Outcome {
    Generated { post: GenerationResult, remaining: u32 },
    /// Refused locally; no request was sent.
    Blocked(String),
    Failed(String),
}

pub fn limit_message(limit: u32) -> String {
    format!("오늘의 무료 사용 횟수({}회)를 모두 사용했습니다. 내일 다시 이용해주세요.", limit)
}

/// One generate attempt. A use is recorded only when the server returns a post.
pub async fn generate_once<C: Clock, S: UsageStore>(
    gate: &UsageGate<C, S>,
    client: &GenerateClient,
    keyword: &str,
) -> Outcome {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Outcome::Blocked(EMPTY_KEYWORD.to_string());
    }
    if !gate.can_use() {
        return Outcome::Blocked(limit_message(gate.limit()));
    }
    match client.generate(keyword).await {
        Ok(ServerReply::Post(post)) => {
            if let Err(e) = gate.increment() {
                tracing::warn!(error = %e, "failed to record usage");
            }
            Outcome::Generated { post, remaining: gate.remaining() }
        }
        Ok(ServerReply::Rejected { status, message }) => {
            tracing::debug!(status, %message, "server rejected generate request");
            Outcome::Failed(message)
        }
        Err(e) => {
            tracing::debug!(error = %e, "generate request failed");
            Outcome::Failed(NETWORK_ERROR.to_string())
        }
    }
}
