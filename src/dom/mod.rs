//! Element inventory: walks a parsed document and produces one
//! [`ElementDescriptor`] per interactive or test-instrumented node.

pub mod descriptor;
pub mod extractor;
pub mod text;

pub use descriptor::{ElementDescriptor, SelectOption};
pub use extractor::{ExtractOptions, extract_elements, page_description, page_title, structural_path};
