//! Selector resolution: picks the most stable locator for a descriptor and
//! checks it against the source document.

pub mod escape;
pub mod query;
pub mod resolver;

pub use resolver::{SELECTOR_RULES, SelectorKind, SelectorResult, model_selector, resolve, resolve_binding};
