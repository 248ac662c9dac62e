use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dom::descriptor::ElementDescriptor;
use crate::selector::escape::{attr_selector, identifier};
use crate::selector::query::{FIRST, VISIBLE};

// ============================================================================
// Result model
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorKind {
    /// Attribute selector that matched exactly one node.
    ValidatedUnique,
    /// Attribute selector that matched several nodes; `:first` appended.
    Disambiguated,
    /// The validation parser rejected the selector (or it matched nothing);
    /// passed through as built.
    Unvalidated,
    /// No usable attribute; the structural path is used.
    FallbackStructural,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorResult {
    pub selector: String,
    pub kind: SelectorKind,
    /// Matches of the selector (without Cypress qualifiers) at generation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_count: Option<usize>,
}

// ============================================================================
// Priority rules
// ============================================================================

/// One entry of the selector priority table.
pub struct SelectorRule {
    pub name: &'static str,
    pub fragment: fn(&ElementDescriptor) -> Option<String>,
}

/// Attribute rules, highest priority first. The first two that apply are
/// combined into the compound selector.
pub const SELECTOR_RULES: [SelectorRule; 8] = [
    SelectorRule { name: "data-testid", fragment: by_testid },
    SelectorRule { name: "data-cy", fragment: by_cy },
    SelectorRule { name: "data-test", fragment: by_test },
    SelectorRule { name: "data-automation-id", fragment: by_automation_id },
    SelectorRule { name: "model-binding", fragment: by_model_binding },
    SelectorRule { name: "id", fragment: by_id },
    SelectorRule { name: "name", fragment: by_name },
    SelectorRule { name: "aria-label", fragment: by_aria_label },
];

fn test_attr(d: &ElementDescriptor, key: &str) -> Option<String> {
    d.test_attribute(key).map(|v| attr_selector(key, v))
}

fn by_testid(d: &ElementDescriptor) -> Option<String> {
    test_attr(d, "data-testid")
}

fn by_cy(d: &ElementDescriptor) -> Option<String> {
    test_attr(d, "data-cy")
}

fn by_test(d: &ElementDescriptor) -> Option<String> {
    test_attr(d, "data-test")
}

fn by_automation_id(d: &ElementDescriptor) -> Option<String> {
    test_attr(d, "data-automation-id")
}

fn by_model_binding(d: &ElementDescriptor) -> Option<String> {
    model_selector(d)
}

fn by_id(d: &ElementDescriptor) -> Option<String> {
    d.attribute("id").map(|id| format!("#{}", identifier(id)))
}

fn by_name(d: &ElementDescriptor) -> Option<String> {
    d.attribute("name").map(|v| attr_selector("name", v))
}

fn by_aria_label(d: &ElementDescriptor) -> Option<String> {
    d.attribute("aria-label").map(|v| attr_selector("aria-label", v))
}

/// Selector fragment for the element's model binding, e.g.
/// `[wire\:model="email"]`.
pub fn model_selector(d: &ElementDescriptor) -> Option<String> {
    d.model_binding().map(|(key, value)| attr_selector(key, value))
}

/// Every rule that applies to the descriptor, in priority order.
pub fn applicable_rules(d: &ElementDescriptor) -> Vec<(&'static str, String)> {
    SELECTOR_RULES
        .iter()
        .filter_map(|rule| (rule.fragment)(d).map(|f| (rule.name, f)))
        .collect()
}

// ============================================================================
// Resolution
// ============================================================================

/// Compute the selector for one descriptor.
///
/// `document` is the page the descriptor was extracted from; it is only
/// re-queried to check uniqueness.
pub fn resolve(descriptor: &ElementDescriptor, document: &Html) -> SelectorResult {
    let visible = wants_visible(descriptor);

    let fragments: Vec<String> = applicable_rules(descriptor)
        .into_iter()
        .take(2)
        .map(|(_, fragment)| fragment)
        .collect();

    if !fragments.is_empty() {
        let base = format!("{}{}", descriptor.tag, fragments.concat());
        return validate(&base, visible, document);
    }

    if let Some(placeholder) = descriptor.attribute("placeholder") {
        let base = attr_selector("placeholder", placeholder);
        return validate(&base, visible, document);
    }

    SelectorResult {
        selector: descriptor.path.clone(),
        kind: SelectorKind::FallbackStructural,
        match_count: None,
    }
}

/// Selector through the element's model binding, validated like the
/// attribute chain. `None` when the element has no model binding.
pub fn resolve_binding(descriptor: &ElementDescriptor, document: &Html) -> Option<SelectorResult> {
    let fragment = model_selector(descriptor)?;
    let base = format!("{}{}", descriptor.tag, fragment);
    Some(validate(&base, wants_visible(descriptor), document))
}

/// Hidden inputs never satisfy `:visible`, so they don't get the qualifier.
fn wants_visible(descriptor: &ElementDescriptor) -> bool {
    descriptor.is_interactive() && !descriptor.is_hidden_input()
}

fn validate(base: &str, visible: bool, document: &Html) -> SelectorResult {
    let mut selector = base.to_string();
    if visible {
        selector.push_str(VISIBLE);
    }

    let parsed = match Selector::parse(base) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(selector = base, error = ?e, "selector not validated");
            return SelectorResult {
                selector,
                kind: SelectorKind::Unvalidated,
                match_count: None,
            };
        }
    };

    let count = document.select(&parsed).count();
    let kind = match count {
        0 => {
            warn!(selector = base, "selector matched nothing in its own document");
            SelectorKind::Unvalidated
        }
        1 => SelectorKind::ValidatedUnique,
        _ => {
            selector.push_str(FIRST);
            SelectorKind::Disambiguated
        }
    };

    SelectorResult {
        selector,
        kind,
        match_count: Some(count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Html {
        Html::parse_document(&format!("<html><body>{}</body></html>", body))
    }

    #[test]
    fn rule_table_order() {
        let names: Vec<_> = SELECTOR_RULES.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            [
                "data-testid",
                "data-cy",
                "data-test",
                "data-automation-id",
                "model-binding",
                "id",
                "name",
                "aria-label"
            ]
        );
    }

    #[test]
    fn combines_two_highest_rules() {
        let d = ElementDescriptor::new("input", "/html/body/input")
            .with_id("email")
            .with_name("email")
            .with_test_attribute("data-cy", "email-field");
        let result = resolve(&d, &doc(r#"<input id="email" name="email" data-cy="email-field">"#));
        assert_eq!(result.selector, r#"input[data-cy="email-field"]#email:visible"#);
        assert_eq!(result.kind, SelectorKind::ValidatedUnique);
    }

    #[test]
    fn duplicates_get_first_match_qualifier() {
        let d = ElementDescriptor::new("button", "/html/body/button[1]").with_name("go");
        let result = resolve(&d, &doc(r#"<button name="go"></button><button name="go"></button>"#));
        assert_eq!(result.selector, r#"button[name="go"]:visible:first"#);
        assert_eq!(result.kind, SelectorKind::Disambiguated);
        assert_eq!(result.match_count, Some(2));
    }

    #[test]
    fn links_are_not_qualified_visible() {
        let d = ElementDescriptor::new("a", "/html/body/a").with_aria_label("Home");
        let result = resolve(&d, &doc(r#"<a aria-label="Home" href="/"></a>"#));
        assert_eq!(result.selector, r#"a[aria-label="Home"]"#);
    }

    #[test]
    fn binding_selector_escapes_attribute_name() {
        let d = ElementDescriptor::new("input", "/html/body/input")
            .with_id("e")
            .with_binding("wire:model.live", "email");
        let document = doc(r#"<input id="e" wire:model.live="email">"#);
        let result = resolve_binding(&d, &document).unwrap();
        assert_eq!(result.selector, r#"input[wire\:model\.live="email"]:visible"#);
        assert_eq!(result.kind, SelectorKind::ValidatedUnique);

        let unbound = ElementDescriptor::new("input", "/html/body/input").with_id("e");
        assert!(resolve_binding(&unbound, &document).is_none());
    }

    #[test]
    fn placeholder_then_path() {
        let with_placeholder =
            ElementDescriptor::new("input", "/html/body/input").with_placeholder(r#"Say "hi""#);
        let result = resolve(&with_placeholder, &doc(r#"<input placeholder='Say "hi"'>"#));
        assert_eq!(result.selector, r#"[placeholder="Say \"hi\""]:visible"#);
        assert_eq!(result.kind, SelectorKind::ValidatedUnique);

        let bare = ElementDescriptor::new("input", "/html/body/input");
        let result = resolve(&bare, &doc("<input>"));
        assert_eq!(result.selector, "/html/body/input");
        assert_eq!(result.kind, SelectorKind::FallbackStructural);
    }
}
