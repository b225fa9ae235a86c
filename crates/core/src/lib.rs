pub mod advisory;
pub mod domain;
pub mod error;
pub mod llm;
pub mod search;

pub mod config {
    use anyhow::Context;

    pub const DEFAULT_LLM_BASE_URL: &str = "https://api.aimlapi.com/v1";
    pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";
    pub const DEFAULT_SEARCH_URL: &str = "https://serpapi.com/search.json";
    pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub llm_api_key: Option<String>,
        pub llm_base_url: String,
        pub llm_model: String,
        pub search_api_key: Option<String>,
        pub search_url: String,
        pub allowed_origins: Vec<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                llm_api_key: non_empty_var("AIMLAPI_KEY"),
                llm_base_url: non_empty_var("AIMLAPI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                llm_model: non_empty_var("LLM_MODEL")
                    .unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                search_api_key: non_empty_var("SERPAPI_KEY"),
                search_url: non_empty_var("SERPAPI_URL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_URL.to_string()),
                allowed_origins: parse_origins(non_empty_var("ALLOWED_ORIGINS").as_deref()),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_llm_api_key(&self) -> anyhow::Result<&str> {
            self.llm_api_key
                .as_deref()
                .context("AIMLAPI_KEY is required")
        }

        pub fn require_search_api_key(&self) -> anyhow::Result<&str> {
            self.search_api_key
                .as_deref()
                .context("SERPAPI_KEY is required")
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Splits a comma-separated origin list; falls back to the local frontend origin.
    pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
        let origins: Vec<String> = raw
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
        } else {
            origins
        }
    }

}
