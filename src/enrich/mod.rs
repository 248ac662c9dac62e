//! Optional per-element suggestions from an external model service.

pub mod backend;
pub mod model;

pub use backend::{Enricher, MockEnricher, NoEnrichment, OllamaEnricher};
pub use model::Enrichment;
