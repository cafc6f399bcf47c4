use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("keyword is empty")]
    Empty,
    #[error("keyword is {len} characters; limit is {max}")]
    TooLong { len: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("provider rejected the credential: {0}")]
    InvalidCredential(String),
    #[error("provider quota or rate limit exceeded: {0}")]
    QuotaExceeded(String),
    #[error("provider returned no completion text")]
    EmptyCompletion,
    #[error("provider call failed: {0}")]
    Provider(String),
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("completion is not JSON: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("completion does not match the post schema: {0}")]
    Schema(String),
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("generation credential is not configured")]
    MissingCredential,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl GenerateError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Validation(_) => "validation",
            GenerateError::MissingCredential => "configuration",
            GenerateError::Generation(GenerationError::InvalidCredential(_)) => "provider_auth",
            GenerateError::Generation(GenerationError::QuotaExceeded(_)) => "provider_quota",
            GenerateError::Generation(GenerationError::EmptyCompletion) => "empty_completion",
            GenerateError::Generation(GenerationError::Provider(_)) => "provider",
            GenerateError::Parse(_) => "parse",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GenerateError::Validation(_) => StatusCode::BAD_REQUEST,
            GenerateError::Generation(GenerationError::InvalidCredential(_)) => StatusCode::UNAUTHORIZED,
            GenerateError::Generation(GenerationError::QuotaExceeded(_)) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the end user.
    pub fn user_message(&self) -> String {
        let msg = match self {
            GenerateError::Validation(ValidationError::Empty) => "키워드를 입력해주세요.",
            GenerateError::Validation(ValidationError::TooLong { max, .. }) => return format!("키워드는 {}자 이내로 입력해주세요.", max),
            GenerateError::MissingCredential => "API 키가 설정되지 않았습니다. 관리자에게 문의하세요.",
            GenerateError::Generation(GenerationError::InvalidCredential(_)) => "API 키가 유효하지 않습니다.",
            GenerateError::Generation(GenerationError::QuotaExceeded(_)) => "API 사용 한도를 초과했습니다. 잠시 후 다시 시도해주세요.",
            GenerateError::Generation(GenerationError::EmptyCompletion) => "AI 응답을 생성하지 못했습니다. 다시 시도해주세요.",
            GenerateError::Generation(GenerationError::Provider(_)) => "서버 오류가 발생했습니다. 잠시 후 다시 시도해주세요.",
            GenerateError::Parse(_) => "AI 응답 파싱에 실패했습니다. 다시 시도해주세요.",
        };
        msg.to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        (self.status(), Json(ApiError { error: self.user_message() })).into_response()
    }
}
