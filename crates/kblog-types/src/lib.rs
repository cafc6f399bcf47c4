//! Wire types shared by the generation service and its clients.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role { System, User }

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// The instruction/request pair sent to the model. Built once, consumed by the generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    system: ChatMessage,
    user: ChatMessage,
}

impl Conversation {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: ChatMessage { role: Role::System, content: system.into() },
            user: ChatMessage { role: Role::User, content: user.into() },
        }
    }

    pub fn system(&self) -> &ChatMessage { &self.system }
    pub fn user(&self) -> &ChatMessage { &self.user }

    pub fn into_messages(self) -> [ChatMessage; 2] { [self.system, self.user] }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoAnalysis {
    pub keyword_density: String,
    pub title_optimization: String,
    pub content_length: String,
    pub readability: String,
    pub cta_presence: String,
}

/// A finished blog post as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub titles: Vec<String>,
    /// Markdown with `##` subheadings and `[이미지]` markers.
    pub body: String,
    pub tags: Vec<String>,
    pub seo_score: i64,
    pub seo_analysis: SeoAnalysis,
}

impl GenerationResult {
    pub const TITLE_COUNT: usize = 3;
    pub const TAG_COUNT: usize = 10;

    /// Title, body and hashtags in the layout a blog editor accepts on paste.
    pub fn compose_post(&self, title_index: usize) -> String {
        let title = self.titles.get(title_index).or_else(|| self.titles.first()).map(String::as_str).unwrap_or_default();
        let tags = self.tags.iter().map(|t| format!("#{}", t)).collect::<Vec<_>>().join(" ");
        format!("{}\n\n{}\n\n{}", title, self.body, tags)
    }
}
