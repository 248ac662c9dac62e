use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::descriptor::ElementDescriptor;
use crate::enrich::model::Enrichment;

pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "qwen2.5:1.5b";

/// Optional suggestion service consulted once per element.
///
/// Implementations must not fail: anything that goes wrong degrades to an
/// empty [`Enrichment`].
pub trait Enricher {
    fn suggest(&self, element: &ElementDescriptor, page_context: &str) -> Enrichment;
}

/// Default enricher: no service configured.
pub struct NoEnrichment;

impl Enricher for NoEnrichment {
    fn suggest(&self, _element: &ElementDescriptor, _page_context: &str) -> Enrichment {
        Enrichment::default()
    }
}

// ============================================================================
// Mock Enricher (for testing without a model server)
// ============================================================================

/// Replies with the same canned text for every element.
pub struct MockEnricher {
    pub reply: String,
}

impl MockEnricher {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

impl Enricher for MockEnricher {
    fn suggest(&self, _element: &ElementDescriptor, _page_context: &str) -> Enrichment {
        Enrichment::from_json_lenient(&self.reply)
    }
}

// ============================================================================
// Ollama Enricher
// ============================================================================

pub struct OllamaEnricher {
    pub endpoint: String,
    pub model: String,
}

impl Default for OllamaEnricher {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
    format: &'static str,
}

#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

impl OllamaEnricher {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            model: model.to_string(),
        }
    }

    pub fn build_prompt(element: &ElementDescriptor, page_context: &str) -> String {
        let element_json = serde_json::to_string(element).unwrap_or_default();

        format!(
r#"Given this web element and page context, suggest Cypress test strategies.

ELEMENT: {}
PAGE CONTEXT: {}

Suggest:
1. Best selectors to use
2. Recommended assertions
3. Edge cases to test
4. Performance considerations

Respond with ONLY a JSON object with these keys, each an array of strings:
{{"selectors":[],"assertions":[],"edge_cases":[],"performance":[]}}"#,
            element_json,
            if page_context.is_empty() { "(none)" } else { page_context }
        )
    }

    fn request(&self, prompt: String) -> Result<String, reqwest::Error> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
            format: "json",
        };

        let client = reqwest::blocking::Client::new();
        let response: OllamaResponse = client
            .post(&self.endpoint)
            .json(&request)
            .send()?
            .error_for_status()?
            .json()?;
        Ok(response.response)
    }
}

impl Enricher for OllamaEnricher {
    fn suggest(&self, element: &ElementDescriptor, page_context: &str) -> Enrichment {
        match self.request(Self::build_prompt(element, page_context)) {
            Ok(reply) => {
                let enrichment = Enrichment::from_json_lenient(&reply);
                if enrichment.is_empty() {
                    debug!(tag = %element.tag, "enrichment reply had no usable suggestions");
                }
                enrichment
            }
            Err(e) => {
                warn!(endpoint = %self.endpoint, error = %e, "enrichment request failed");
                Enrichment::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_element_and_context() {
        let element = ElementDescriptor::new("input", "/html/body/input").with_name("email");
        let prompt = OllamaEnricher::build_prompt(&element, "Login - sign in to continue");
        assert!(prompt.contains(r#""name":"email""#));
        assert!(prompt.contains("PAGE CONTEXT: Login - sign in to continue"));
    }

    #[test]
    fn unreachable_server_degrades_to_empty() {
        let enricher = OllamaEnricher::new("http://127.0.0.1:9/api/generate", "none");
        let element = ElementDescriptor::new("button", "/html/body/button");
        assert!(enricher.suggest(&element, "").is_empty());
    }
}
