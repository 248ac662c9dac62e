use std::collections::{BTreeMap, HashSet};

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::descriptor::{ElementDescriptor, INTERACTIVE_TAGS, SelectOption, TEST_ATTRIBUTES};
use crate::dom::text::{TEXT_CAP, collapse_whitespace, stripped_text, visible_text};

// ============================================================================
// Candidate groups
// ============================================================================

/// Attribute-based candidates, scanned after the interactive tags. Nodes
/// whose tag is already in `INTERACTIVE_TAGS` are skipped here.
pub const ATTRIBUTE_SELECTORS: [&str; 11] = [
    r#"[role="button"]"#,
    r#"[role="checkbox"]"#,
    r#"[role="radio"]"#,
    r#"[role="tab"]"#,
    r#"[role="menuitem"]"#,
    r#"[role="switch"]"#,
    "[data-testid]",
    "[data-cy]",
    "[data-test]",
    "[data-automation-id]",
    "[aria-label]",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractOptions {
    /// Attribute-name prefixes that mark framework binding attributes.
    #[serde(default = "default_binding_prefixes")]
    pub binding_prefixes: Vec<String>,

    /// Maximum characters kept from visible text.
    #[serde(default = "default_text_cap")]
    pub text_cap: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            binding_prefixes: default_binding_prefixes(),
            text_cap: TEXT_CAP,
        }
    }
}

fn default_binding_prefixes() -> Vec<String> {
    vec!["wire:".to_string()]
}

fn default_text_cap() -> usize {
    TEXT_CAP
}

// ============================================================================
// Extraction
// ============================================================================

/// Build descriptors for every interactive or test-instrumented node.
///
/// Order: interactive tags first (tag by tag, document order within each),
/// then attribute-selected nodes in `ATTRIBUTE_SELECTORS` order. A node
/// appears at most once.
pub fn extract_elements(document: &Html, options: &ExtractOptions) -> Vec<ElementDescriptor> {
    let mut elements = Vec::new();

    for tag in INTERACTIVE_TAGS {
        let Some(selector) = parse_selector(tag) else {
            continue;
        };
        let before = elements.len();
        for element in document.select(&selector) {
            elements.push(describe(element, document, options));
        }
        debug!(tag, count = elements.len() - before, "extracted interactive tag");
    }

    let mut seen = HashSet::new();
    for css in ATTRIBUTE_SELECTORS {
        let Some(selector) = parse_selector(css) else {
            continue;
        };
        for element in document.select(&selector) {
            if INTERACTIVE_TAGS.contains(&element.value().name()) {
                continue;
            }
            if !seen.insert(element.id()) {
                continue;
            }
            elements.push(describe(element, document, options));
        }
    }
    debug!(
        attribute_selected = seen.len(),
        total = elements.len(),
        "element inventory complete"
    );

    elements
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!(css, error = ?e, "skipping unparseable candidate selector");
            None
        }
    }
}

/// Build the descriptor for one node.
pub fn describe(element: ElementRef<'_>, document: &Html, options: &ExtractOptions) -> ElementDescriptor {
    let el = element.value();
    let tag = el.name().to_string();
    let attr = |key: &str| el.attr(key).unwrap_or("").to_string();

    let classes = el
        .attr("class")
        .map(|c| c.split_whitespace().map(String::from).collect())
        .unwrap_or_default();

    let text = if matches!(tag.as_str(), "input" | "textarea" | "select") {
        String::new()
    } else {
        visible_text(&element.text().collect::<String>(), options.text_cap)
    };

    let test_attributes = TEST_ATTRIBUTES
        .iter()
        .filter_map(|key| el.attr(key).map(|v| (key.to_string(), v.to_string())))
        .collect();

    let bindings: BTreeMap<String, String> = el
        .attrs()
        .filter(|(name, _)| {
            options
                .binding_prefixes
                .iter()
                .any(|prefix| name.starts_with(prefix.as_str()))
        })
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    let options_list = if tag == "select" {
        select_options(element)
    } else {
        Vec::new()
    };

    ElementDescriptor {
        id: attr("id"),
        classes,
        input_type: attr("type"),
        name: attr("name"),
        placeholder: attr("placeholder"),
        value: attr("value"),
        href: attr("href"),
        role: attr("role"),
        aria_label: attr("aria-label"),
        test_attributes,
        text,
        label: resolve_label(element, document),
        options: options_list,
        path: structural_path(element),
        required: el.attr("required").is_some(),
        bindings,
        form_owner: form_owner(element, document),
        enrichment: Default::default(),
        tag,
    }
}

fn select_options(element: ElementRef<'_>) -> Vec<SelectOption> {
    let Some(selector) = parse_selector("option") else {
        return Vec::new();
    };
    element
        .select(&selector)
        .map(|opt| SelectOption {
            text: stripped_text(opt.text()),
            value: opt.value().attr("value").unwrap_or("").to_string(),
        })
        .collect()
}

// ============================================================================
// Label resolution
// ============================================================================

/// Label text for a control: `label[for=id]` wins over an enclosing
/// `<label>`. Unresolved labels are the empty string.
pub fn resolve_label(element: ElementRef<'_>, document: &Html) -> String {
    let id = element.value().attr("id").unwrap_or("");

    if !id.is_empty() {
        if let Some(selector) = parse_selector("label[for]") {
            let by_for = document
                .select(&selector)
                .find(|label| label.value().attr("for") == Some(id));
            if let Some(label) = by_for {
                let text = stripped_text(label.text());
                if !text.is_empty() {
                    return text;
                }
            }
        }
    }

    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "label")
        .map(|label| stripped_text(label.text()))
        .unwrap_or_default()
}

// ============================================================================
// Structural path
// ============================================================================

/// Root-to-node path of tag names, e.g. `/html/body/div[3]`.
///
/// A segment carries a 1-based index only when its parent has more than one
/// child element with the same tag.
pub fn structural_path(element: ElementRef<'_>) -> String {
    let mut segments = Vec::new();
    let mut current = element;

    loop {
        let name = current.value().name();
        let parent = current.parent().and_then(ElementRef::wrap);

        let segment = match parent {
            Some(parent) => {
                let same_tag: Vec<ElementRef<'_>> = parent
                    .children()
                    .filter_map(ElementRef::wrap)
                    .filter(|sibling| sibling.value().name() == name)
                    .collect();
                if same_tag.len() > 1 {
                    let index = same_tag
                        .iter()
                        .position(|sibling| sibling.id() == current.id())
                        .map_or(1, |i| i + 1);
                    format!("{}[{}]", name, index)
                } else {
                    name.to_string()
                }
            }
            None => name.to_string(),
        };
        segments.push(segment);

        match parent {
            Some(parent) => current = parent,
            None => break,
        }
    }

    segments.reverse();
    format!("/{}", segments.join("/"))
}

/// The form an element belongs to: an explicit `form="id"` attribute, else
/// the nearest `<form>` ancestor. Forms themselves have no owner.
fn form_owner(element: ElementRef<'_>, document: &Html) -> Option<String> {
    if element.value().name() == "form" {
        return None;
    }

    if let Some(form_id) = element.value().attr("form").filter(|f| !f.is_empty()) {
        let selector = parse_selector("form[id]")?;
        return document
            .select(&selector)
            .find(|form| form.value().attr("id") == Some(form_id))
            .map(structural_path);
    }

    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "form")
        .map(structural_path)
}

// ============================================================================
// Page metadata
// ============================================================================

/// Document title, whitespace collapsed; `"Unknown Page"` when missing.
pub fn page_title(document: &Html) -> String {
    parse_selector("title")
        .and_then(|selector| document.select(&selector).next())
        .map(|title| collapse_whitespace(title.text().collect::<String>().trim()))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "Unknown Page".to_string())
}

/// Content of `<meta name="description">`, or empty.
pub fn page_description(document: &Html) -> String {
    parse_selector(r#"meta[name="description"]"#)
        .and_then(|selector| document.select(&selector).next())
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or("")
        .to_string()
}
