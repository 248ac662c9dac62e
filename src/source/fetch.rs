use std::path::PathBuf;
use std::time::Duration;

use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::extractor::ExtractOptions;
use crate::enrich::backend::Enricher;
use crate::error::{Result, SynthError};
use crate::source::capture::PageCapture;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Where page markup comes from.
pub trait PageSource {
    fn fetch(&self, url: &str) -> Result<String>;
}

// ============================================================================
// HTTP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts; only timeouts are retried.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

pub struct HttpSource {
    pub config: FetchConfig,
}

impl HttpSource {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new(FetchConfig::default())
    }
}

impl PageSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<String> {
        let upstream = |reason: String| SynthError::Upstream {
            url: url.to_string(),
            reason,
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| upstream(e.to_string()))?;

        let attempts = self.config.max_attempts.max(1);
        for attempt in 1..=attempts {
            debug!(url, attempt, "fetching page");
            let result = client
                .get(url)
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text());

            match result {
                Ok(body) => return Ok(body),
                Err(e) if e.is_timeout() => {
                    warn!(url, attempt, attempts, "page load timed out");
                }
                Err(e) => return Err(upstream(e.to_string())),
            }
        }

        Err(upstream(format!("page load timeout after {} attempts", attempts)))
    }
}

// ============================================================================
// Local file
// ============================================================================

/// Reads markup saved to disk; the requested URL is only used for error
/// messages.
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PageSource for FileSource {
    fn fetch(&self, url: &str) -> Result<String> {
        std::fs::read_to_string(&self.path).map_err(|e| SynthError::Upstream {
            url: url.to_string(),
            reason: format!("{}: {}", self.path.display(), e),
        })
    }
}

// ============================================================================
// Capture
// ============================================================================

/// Prefix `https://` when no http(s) scheme is given, then check the result
/// parses as a URL with a host.
pub fn normalize_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(SynthError::InvalidUrl(input.to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    match url::Url::parse(&with_scheme) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(parsed.to_string()),
        _ => Err(SynthError::InvalidUrl(input.to_string())),
    }
}

/// Fetch `url` from `source` and build its capture. The parsed document is
/// returned too, since selector validation needs it.
pub fn capture_page(
    source: &dyn PageSource,
    url: &str,
    options: &ExtractOptions,
    enricher: &dyn Enricher,
) -> Result<(PageCapture, Html)> {
    let markup = source.fetch(url)?;
    let document = Html::parse_document(&markup);
    let capture = PageCapture::from_document(url, &document, options, enricher);
    Ok((capture, document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adds_missing_scheme() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com/");
        assert_eq!(normalize_url(" http://example.com/a ").unwrap(), "http://example.com/a");
        assert!(normalize_url("").is_err());
        assert!(normalize_url("https://").is_err());
    }

    /// Accepts connections and holds them open without ever answering.
    fn silent_server() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let mut held = Vec::new();
            for stream in listener.incoming().flatten() {
                held.push(stream);
            }
        });
        format!("http://{}/", addr)
    }

    #[test]
    fn timeouts_are_retried_until_the_budget_runs_out() {
        let url = silent_server();
        let source = HttpSource::new(FetchConfig {
            timeout_secs: 1,
            max_attempts: 2,
        });

        let err = source.fetch(&url).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("after 2 attempts"), "{}", err);
    }

    #[test]
    fn zero_attempts_still_tries_once() {
        let url = silent_server();
        let source = HttpSource::new(FetchConfig {
            timeout_secs: 1,
            max_attempts: 0,
        });

        let err = source.fetch(&url).unwrap_err();
        assert!(err.to_string().contains("after 1 attempts"), "{}", err);
    }

    #[test]
    fn missing_file_is_upstream() {
        let source = FileSource::new("/nonexistent/page.html");
        let err = source.fetch("https://example.com/").unwrap_err();
        assert!(err.is_upstream());
    }
}
