use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::dom::extractor::ExtractOptions;
use crate::enrich::backend::{DEFAULT_OLLAMA_ENDPOINT, DEFAULT_OLLAMA_MODEL};
use crate::source::fetch::FetchConfig;
use crate::synth::bundle::SynthesisOptions;

pub const DEFAULT_CONFIG_PATH: &str = "cypress-synth.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "cypress-synth",
    version,
    about = "Generate Cypress test suites from a page's markup"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Ollama API endpoint
    #[arg(long, global = true)]
    pub ollama_endpoint: Option<String>,

    /// Ollama model name
    #[arg(long, global = true)]
    pub ollama_model: Option<String>,

    /// Path to config file (default: cypress-synth.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

/// Where the page comes from: a live URL or saved markup.
#[derive(Args, Debug, Clone)]
pub struct PageInput {
    /// Page URL to fetch (https:// is assumed when no scheme is given)
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub url: Option<String>,

    /// Saved HTML file to read instead of fetching
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// URL the saved file was captured from (used by visit() and the smoke test)
    #[arg(long, requires = "file", conflicts_with = "url")]
    pub page_url: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture a page and write its page object, fixture and test script
    Generate {
        #[command(flatten)]
        input: PageInput,

        /// Output directory for the generated files
        #[arg(short, long)]
        output_dir: Option<String>,

        /// Enrichment backend: none or ollama
        #[arg(long)]
        enricher: Option<String>,
    },

    /// Print the element inventory with resolved selectors
    Inspect {
        #[command(flatten)]
        input: PageInput,
    },

    /// List the test sections a script can contain
    Sections,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `cypress-synth.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub extract: ExtractOptions,
    #[serde(default)]
    pub synthesis: SynthesisOptions,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_enricher")]
    pub enricher: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            enricher: default_enricher(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OllamaConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

// Serde default helpers
fn default_output_dir() -> String { "generated_scripts".to_string() }
fn default_enricher() -> String { "none".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            warn!(path = config_path, error = %e, "ignoring malformed config file");
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Resolved settings (CLI > config > defaults)
// ============================================================================

/// Ollama endpoint and model after applying CLI flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaSettings {
    pub endpoint: String,
    pub model: String,
}

pub fn resolve_ollama(cli: &Cli, config: &AppConfig) -> OllamaSettings {
    OllamaSettings {
        endpoint: cli
            .ollama_endpoint
            .clone()
            .or_else(|| config.ollama.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_ENDPOINT.to_string()),
        model: cli
            .ollama_model
            .clone()
            .or_else(|| config.ollama.model.clone())
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
    }
}
