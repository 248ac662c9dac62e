//! Test-suite synthesis: page object, fixture data and the Cypress script.

pub mod bundle;
pub mod fixture;
pub mod page_object;
pub mod script;
pub mod values;
pub mod writer;

use scraper::Html;

use crate::dom::descriptor::ElementDescriptor;
use crate::selector::{SelectorResult, resolve, resolve_binding};

pub use bundle::{ArtifactBundle, BundleSummary, SynthesisOptions};
pub use fixture::Fixture;
pub use script::{Section, SectionKind};

/// A descriptor together with the selectors computed for it.
#[derive(Debug, Clone)]
pub struct ResolvedElement<'a> {
    pub descriptor: &'a ElementDescriptor,
    pub selector: SelectorResult,
    /// Selector through the model binding, when the element has one.
    pub binding: Option<SelectorResult>,
}

impl<'a> ResolvedElement<'a> {
    pub fn resolve(descriptor: &'a ElementDescriptor, document: &Html) -> Self {
        Self {
            descriptor,
            selector: resolve(descriptor, document),
            binding: resolve_binding(descriptor, document),
        }
    }

    /// Selector used when filling the element: the binding selector for
    /// bound fields, the resolved selector otherwise.
    pub fn field_selector(&self) -> &str {
        self.binding
            .as_ref()
            .map_or(self.selector.selector.as_str(), |b| b.selector.as_str())
    }
}

pub fn resolve_all<'a>(elements: &'a [ElementDescriptor], document: &Html) -> Vec<ResolvedElement<'a>> {
    elements
        .iter()
        .map(|descriptor| ResolvedElement::resolve(descriptor, document))
        .collect()
}
