use thiserror::Error;

pub const ANALYSIS_FAILED: &str = "AI analysis failed or returned invalid JSON";

/// Failure taxonomy shared by the completion and search clients.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// The upstream could not be reached (DNS, refused connection, timeout).
    #[error("{service} request failed: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream answered with a non-success status or an error payload.
    #[error("{service} HTTP {status}: {body}")]
    Upstream {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The upstream answered 2xx but the body does not have the expected shape.
    #[error("{service} returned a malformed response: {detail}")]
    MalformedUpstream {
        service: &'static str,
        detail: String,
    },

    /// Model output that has no safe default.
    #[error("{0}")]
    Domain(String),
}

impl AdvisoryError {
    pub fn transport(service: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { service, source }
    }

    pub fn malformed(service: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedUpstream {
            service,
            detail: detail.into(),
        }
    }
}

pub type Result<T, E = AdvisoryError> = std::result::Result<T, E>;
