use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::source::capture::PageCapture;
use crate::synth::fixture::{FIXTURE_FILENAME, Fixture};
use crate::synth::page_object::{LoginSelectors, generate_page_object, page_class};
use crate::synth::script::{SectionKind, generate_script, plan_sections};
use crate::synth::resolve_all;

pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;

// ============================================================================
// Options
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisOptions {
    /// Route intercepted as `@networkUpdate`; chosen from the page when unset.
    #[serde(default)]
    pub network_route: Option<String>,

    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,

    #[serde(default = "default_page_load_timeout")]
    pub page_load_timeout_ms: u64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            network_route: None,
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
            page_load_timeout_ms: DEFAULT_PAGE_LOAD_TIMEOUT_MS,
        }
    }
}

fn default_command_timeout() -> u64 {
    DEFAULT_COMMAND_TIMEOUT_MS
}

fn default_page_load_timeout() -> u64 {
    DEFAULT_PAGE_LOAD_TIMEOUT_MS
}

// ============================================================================
// Bundle
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleSummary {
    pub page_url: String,
    pub page_title: String,
    pub element_count: usize,
    pub page_object_filename: String,
    pub fixture_filename: String,
    pub script_filename: String,
    pub sections: Vec<SectionKind>,
    /// SHA-1 of the captured markup.
    pub document_sha1: String,
}

/// Everything generated for one page. Persisting it is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub page_object: String,
    pub fixture: Fixture,
    pub script: String,
    pub summary: BundleSummary,
}

impl ArtifactBundle {
    /// Resolve selectors, plan sections and render all three artifacts.
    pub fn assemble(capture: &PageCapture, document: &Html, options: &SynthesisOptions) -> Self {
        let resolved = resolve_all(&capture.elements, document);
        let sections = plan_sections(&resolved);
        let kinds: Vec<SectionKind> = sections.iter().map(|s| s.kind()).collect();
        debug!(url = %capture.url, sections = ?kinds, "planned test sections");

        let login = LoginSelectors::from_elements(&resolved);
        let page_object = generate_page_object(&capture.url, &capture.title, &login);
        let script = generate_script(&capture.url, &capture.title, &resolved, &sections, options);

        let summary = BundleSummary {
            page_url: capture.url.clone(),
            page_title: capture.title.clone(),
            element_count: capture.elements.len(),
            page_object_filename: page_object_filename(&capture.title),
            fixture_filename: FIXTURE_FILENAME.to_string(),
            script_filename: script_filename(&capture.url),
            sections: kinds,
            document_sha1: capture.document_sha1.clone(),
        };

        Self {
            page_object,
            fixture: Fixture::default(),
            script,
            summary,
        }
    }
}

// ============================================================================
// Filenames
// ============================================================================

/// `<Class>.js`; the class name is already filename-safe and must match the
/// script's `require` exactly.
pub fn page_object_filename(title: &str) -> String {
    format!("{}.js", page_class(title))
}

/// `cypress_test_<host>.js`, dots in the host replaced by underscores.
pub fn script_filename(url: &str) -> String {
    let host = url::Url::parse(url)
        .ok()
        .and_then(|u| {
            let host = u.host_str()?.to_string();
            Some(match u.port() {
                Some(port) => format!("{}_{}", host, port),
                None => host,
            })
        })
        .unwrap_or_else(|| "local".to_string());

    sanitize_filename(&format!("cypress_test_{}.js", host.replace('.', "_")))
}

/// Reduce a name to `[A-Za-z0-9._-]`, whitespace becoming `_`, with no
/// leading dots so it can't escape or hide in the output directory.
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']);
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_filename_from_host() {
        assert_eq!(script_filename("https://www.example.com/login"), "cypress_test_www_example_com.js");
        assert_eq!(script_filename("http://localhost:8000/"), "cypress_test_localhost_8000.js");
        assert_eq!(script_filename("not a url"), "cypress_test_local.js");
    }

    #[test]
    fn sanitizes_names() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("My Page.js"), "My_Page.js");
        assert_eq!(sanitize_filename("///"), "unnamed");
        assert_eq!(page_object_filename("Sign In"), "SignInPage.js");
        assert_eq!(page_object_filename("404 Not Found"), "_404NotFoundPage.js");
        assert_eq!(page_object_filename("Café Connexion"), "CaféConnexionPage.js");
    }
}
