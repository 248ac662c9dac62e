use scraper::Html;
use tracing::info;

use crate::{
    dom::extractor::ExtractOptions,
    enrich::backend::Enricher,
    error::{Result, SynthError},
    source::{capture::PageCapture, fetch::{PageSource, capture_page}},
    synth::bundle::{ArtifactBundle, SynthesisOptions},
};

pub mod cli;
pub mod dom;
pub mod enrich;
pub mod error;
pub mod selector;
pub mod source;
pub mod synth;

/// Turn a captured page into its page object, fixture and test script.
///
/// `document` must be the document `capture` was extracted from; selectors
/// are validated against it. Fails only when the inventory is empty.
pub fn generate_bundle(
    capture: &PageCapture,
    document: &Html,
    options: &SynthesisOptions,
) -> Result<ArtifactBundle> {
    if capture.is_empty() {
        return Err(SynthError::NoTestableElements {
            url: capture.url.clone(),
        });
    }

    let bundle = ArtifactBundle::assemble(capture, document, options);
    info!(
        url = %capture.url,
        elements = bundle.summary.element_count,
        sections = bundle.summary.sections.len(),
        "generated test bundle"
    );
    Ok(bundle)
}

/// Fetch, extract and synthesize in one go.
pub fn capture_and_generate(
    source: &dyn PageSource,
    url: &str,
    extract: &ExtractOptions,
    enricher: &dyn Enricher,
    options: &SynthesisOptions,
) -> Result<ArtifactBundle> {
    let (capture, document) = capture_page(source, url, extract, enricher)?;
    generate_bundle(&capture, &document, options)
}
