use std::path::{Path, PathBuf};

use scraper::Html;
use serde::Serialize;
use tracing::{debug, info};

use crate::capture_and_generate;
use crate::cli::config::{AppConfig, OllamaSettings, PageInput};
use crate::enrich::backend::{Enricher, NoEnrichment, OllamaEnricher};
use crate::error::{Result, SynthError};
use crate::selector::SelectorKind;
use crate::source::capture::PageCapture;
use crate::source::fetch::{FileSource, HttpSource, PageSource, capture_page, normalize_url};
use crate::synth::bundle::{ArtifactBundle, BundleSummary};
use crate::synth::script::SectionKind;
use crate::synth::{ResolvedElement, resolve_all};

// ============================================================================
// generate subcommand
// ============================================================================

/// Capture the page, synthesize the bundle and write it to `output_dir`.
pub fn cmd_generate(
    input: &PageInput,
    output_dir: &str,
    enricher_name: &str,
    config: &AppConfig,
    ollama: &OllamaSettings,
) -> Result<BundleSummary> {
    let enricher = build_enricher(enricher_name, ollama);
    let (source, url) = page_source(input, config)?;
    let bundle = capture_and_generate(
        source.as_ref(),
        &url,
        &config.extract,
        enricher.as_ref(),
        &config.synthesis,
    )?;

    let written = write_bundle(&bundle, Path::new(output_dir))?;
    for path in &written {
        info!(path = %path.display(), "wrote artifact");
    }

    Ok(bundle.summary)
}

/// Write the page object, fixture and script into `dir`, creating it if
/// needed. Returns the written paths in that order.
pub fn write_bundle(bundle: &ArtifactBundle, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .map_err(|e| SynthError::io(format!("creating {}", dir.display()), e))?;

    let summary = &bundle.summary;
    let files = [
        (&summary.page_object_filename, bundle.page_object.clone()),
        (&summary.fixture_filename, bundle.fixture.to_json()?),
        (&summary.script_filename, bundle.script.clone()),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .map_err(|e| SynthError::io(format!("writing {}", path.display()), e))?;
        written.push(path);
    }
    Ok(written)
}

// ============================================================================
// inspect subcommand
// ============================================================================

/// One inventory row as printed by `inspect`.
#[derive(Debug, Serialize)]
pub struct InspectRow {
    pub tag: String,
    pub path: String,
    pub selector: String,
    pub kind: SelectorKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_selector: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl From<&ResolvedElement<'_>> for InspectRow {
    fn from(element: &ResolvedElement<'_>) -> Self {
        Self {
            tag: element.descriptor.tag.clone(),
            path: element.descriptor.path.clone(),
            selector: element.selector.selector.clone(),
            kind: element.selector.kind,
            binding_selector: element.binding.as_ref().map(|b| b.selector.clone()),
            label: element.descriptor.label.clone(),
            text: element.descriptor.text.clone(),
        }
    }
}

pub fn cmd_inspect(input: &PageInput, config: &AppConfig) -> Result<Vec<InspectRow>> {
    let (source, url) = page_source(input, config)?;
    let (capture, document) = capture_page(source.as_ref(), &url, &config.extract, &NoEnrichment)?;
    Ok(inspect_rows(&capture, &document))
}

pub fn inspect_rows(capture: &PageCapture, document: &Html) -> Vec<InspectRow> {
    resolve_all(&capture.elements, document)
        .iter()
        .map(InspectRow::from)
        .collect()
}

// ============================================================================
// sections subcommand
// ============================================================================

pub fn cmd_sections() -> String {
    SectionKind::ALL
        .iter()
        .map(|kind| format!("{:<16} {}\n", kind.id(), kind.description()))
        .collect()
}

// ============================================================================
// Helpers
// ============================================================================

/// Build the enricher named on the command line or in config.
pub fn build_enricher(name: &str, ollama: &OllamaSettings) -> Box<dyn Enricher> {
    match name {
        "ollama" => Box::new(OllamaEnricher::new(&ollama.endpoint, &ollama.model)),
        _ => Box::new(NoEnrichment),
    }
}

/// The source to read and the URL to record for it. `--page-url` only
/// describes a saved file, so it is rejected alongside `--url`.
pub fn page_source(input: &PageInput, config: &AppConfig) -> Result<(Box<dyn PageSource>, String)> {
    match (&input.url, &input.file) {
        (Some(_), Some(_)) => Err(SynthError::InvalidInput(
            "--url and --file are mutually exclusive".to_string(),
        )),
        (Some(_), None) if input.page_url.is_some() => Err(SynthError::InvalidInput(
            "--page-url only applies to --file".to_string(),
        )),
        (Some(url), None) => {
            let url = normalize_url(url)?;
            let source: Box<dyn PageSource> = Box::new(HttpSource::new(config.fetch.clone()));
            Ok((source, url))
        }
        (None, Some(path)) => {
            let url = file_page_url(path, input.page_url.as_deref())?;
            debug!(file = %path.display(), url = %url, "reading saved page");
            let source: Box<dyn PageSource> = Box::new(FileSource::new(path));
            Ok((source, url))
        }
        (None, None) => Err(SynthError::InvalidInput(
            "either --url or --file is required".to_string(),
        )),
    }
}

/// URL recorded for a saved page: `--page-url` when given, else the
/// file's own `file://` URL.
pub fn file_page_url(path: &Path, page_url: Option<&str>) -> Result<String> {
    if let Some(url) = page_url {
        return normalize_url(url);
    }

    let absolute = std::fs::canonicalize(path).map_err(|e| SynthError::Upstream {
        url: path.display().to_string(),
        reason: e.to_string(),
    })?;
    url::Url::from_file_path(&absolute)
        .map(|u| u.to_string())
        .map_err(|_| SynthError::InvalidUrl(absolute.display().to_string()))
}
