use thiserror::Error;

pub type Result<T> = std::result::Result<T, SynthError>;

#[derive(Debug, Error)]
pub enum SynthError {
    /// The page could not be fetched (network failure, retries exhausted,
    /// unreadable file). Nothing is generated.
    #[error("could not fetch {url}: {reason}")]
    Upstream { url: String, reason: String },

    /// The page was fetched but contained nothing interactive.
    #[error("no testable elements found on {url} (the page may be client-side rendered or blocking crawlers)")]
    NoTestableElements { url: String },

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("I/O error ({context}): {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Contradictory or missing page input (e.g. `--page-url` with `--url`).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SynthError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        SynthError::Io {
            context: context.into(),
            source,
        }
    }

    /// True for failures that happened before any markup was available.
    pub fn is_upstream(&self) -> bool {
        matches!(self, SynthError::Upstream { .. } | SynthError::InvalidUrl(_))
    }
}
