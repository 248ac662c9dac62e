use scraper::Html;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dom::descriptor::ElementDescriptor;
use crate::dom::extractor::{ExtractOptions, extract_elements, page_description, page_title};
use crate::dom::text::text_fingerprint;
use crate::enrich::backend::Enricher;

/// What the crawler hands to synthesis: page metadata plus the element
/// inventory, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageCapture {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub elements: Vec<ElementDescriptor>,
    #[serde(default)]
    pub document_sha1: String,
}

impl PageCapture {
    pub fn from_html(url: &str, markup: &str, options: &ExtractOptions, enricher: &dyn Enricher) -> Self {
        Self::from_document(url, &Html::parse_document(markup), options, enricher)
    }

    /// Extract the inventory of an already parsed document and consult the
    /// enricher once per element.
    pub fn from_document(url: &str, document: &Html, options: &ExtractOptions, enricher: &dyn Enricher) -> Self {
        let title = page_title(document);
        let description = page_description(document);
        let context = page_context(&title, &description);

        let elements: Vec<ElementDescriptor> = extract_elements(document, options)
            .into_iter()
            .map(|element| {
                let enrichment = enricher.suggest(&element, &context);
                element.with_enrichment(enrichment)
            })
            .collect();

        info!(url, title = %title, elements = elements.len(), "captured page");

        Self {
            url: url.to_string(),
            title,
            description,
            elements,
            document_sha1: text_fingerprint(&document.html()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Page summary handed to the enricher with every element.
pub fn page_context(title: &str, description: &str) -> String {
    format!("Page: {}, Description: {}", title, description)
}
