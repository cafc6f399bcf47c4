use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/kblog.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            allowed_origins: vec!["http://localhost:3000".into(), "http://127.0.0.1:3000".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Upper bound on the trimmed keyword, counted in characters.
    pub max_keyword_chars: usize,
}

impl Default for InputConfig {
    fn default() -> Self { Self { max_keyword_chars: 100 } }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub base_url: String,
    /// Brave subscription token. Usually supplied through BRAVE_API_KEY.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub count: usize,
    pub search_lang: String,
    pub country: String,
    pub extra_snippets: bool,
    /// Appended to the query after the current year.
    pub recency_marker: String,
    pub timeout_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.search.brave.com/res/v1/web/search".into(),
            api_key: None,
            count: 10,
            search_lang: "ko".into(),
            country: "KR".into(),
            extra_snippets: true,
            recency_marker: "최신".into(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended.
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 4000,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub input: InputConfig,
    pub search: SearchConfig,
    pub generation: GenerationConfig,
}

impl Config {
    /// Reads `KBLOG_CONFIG` (or `config/kblog.toml`) and applies env overrides.
    /// A missing default file yields built-in defaults; a missing explicit path is an error.
    pub fn load() -> anyhow::Result<(Self, PathBuf)> {
        let explicit = env::var("KBLOG_CONFIG").ok().map(PathBuf::from);
        let cfg_path = explicit.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        let mut cfg = match fs::read_to_string(&cfg_path) {
            Ok(text) => Self::from_toml(&text).with_context(|| format!("parsing {}", cfg_path.display()))?,
            Err(e) if explicit.is_none() && e.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(e) => return Err(e).with_context(|| format!("reading {}", cfg_path.display())),
        };
        cfg.apply_env(|k| env::var(k).ok());
        Ok((cfg, cfg_path))
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Env overrides: KBLOG_BIND, BRAVE_API_KEY, BRAVE_BASE_URL, OPENAI_API_KEY, OPENAI_MODEL, OPENAI_BASE_URL.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        if let Some(bind) = non_empty("KBLOG_BIND") { self.server.bind = bind; }
        if let Some(key) = non_empty("BRAVE_API_KEY") { self.search.api_key = Some(key); }
        if let Some(url) = non_empty("BRAVE_BASE_URL") { self.search.base_url = url; }
        if let Some(key) = non_empty("OPENAI_API_KEY") { self.generation.api_key = Some(key); }
        if let Some(model) = non_empty("OPENAI_MODEL") { self.generation.model = model; }
        if let Some(url) = non_empty("OPENAI_BASE_URL") { self.generation.base_url = url; }
    }
}
