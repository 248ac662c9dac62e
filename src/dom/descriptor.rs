use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enrich::model::Enrichment;

/// Tags that are interactive by structure alone.
pub const INTERACTIVE_TAGS: [&str; 6] = ["input", "button", "a", "form", "select", "textarea"];

/// Test-instrumentation attributes captured on every descriptor, highest
/// selector priority first.
pub const TEST_ATTRIBUTES: [&str; 4] = ["data-testid", "data-cy", "data-test", "data-automation-id"];

/// One `<option>` of a choice control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub text: String,
    pub value: String,
}

/// Facts extracted for one interactive or test-instrumented DOM node.
///
/// String fields use the empty string for "attribute absent". Everything is
/// derived from the node and its ancestor/sibling context at extraction
/// time; a descriptor is not modified after the extractor returns it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default, rename = "type")]
    pub input_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub href: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "aria-label")]
    pub aria_label: String,
    /// Test attribute name → value, only for attributes present on the node.
    #[serde(default)]
    pub test_attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub options: Vec<SelectOption>,
    /// Root-to-node locator, e.g. `/html/body/div[3]`.
    pub path: String,
    #[serde(default)]
    pub required: bool,
    /// Framework binding attributes (e.g. `wire:model`), verbatim.
    #[serde(default)]
    pub bindings: BTreeMap<String, String>,
    /// Structural path of the form this element belongs to.
    #[serde(default)]
    pub form_owner: Option<String>,
    #[serde(default)]
    pub enrichment: Enrichment,
}

impl ElementDescriptor {
    pub fn new(tag: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = input_type.into();
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = label.into();
        self
    }

    pub fn with_test_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.test_attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_binding(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.bindings.insert(key.into(), value.into());
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn with_option(mut self, text: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            text: text.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_enrichment(mut self, enrichment: Enrichment) -> Self {
        self.enrichment = enrichment;
        self
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn is_form(&self) -> bool {
        self.is_tag("form")
    }

    pub fn is_input(&self) -> bool {
        self.is_tag("input")
    }

    /// Buttons in the inventory: `<button>`, `role="button"`, and
    /// `<input type="submit">`.
    pub fn is_button(&self) -> bool {
        self.is_tag("button")
            || self.role == "button"
            || (self.is_input() && self.input_type.eq_ignore_ascii_case("submit"))
    }

    pub fn is_submit(&self) -> bool {
        self.is_button() && self.input_type.to_lowercase().contains("submit")
    }

    /// Structurally interactive tag, or a role that behaves like a control.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self.tag.as_str(),
            "input" | "button" | "form" | "select" | "textarea"
        ) || matches!(self.role.as_str(), "button" | "checkbox" | "radio")
    }

    pub fn is_hidden_input(&self) -> bool {
        self.is_input() && self.input_type.eq_ignore_ascii_case("hidden")
    }

    pub fn is_select(&self) -> bool {
        self.is_tag("select")
    }

    /// Value a test should pick from a `<select>`: the first option with a
    /// non-empty value, else the first option's text.
    pub fn preferred_option(&self) -> Option<&str> {
        self.options
            .iter()
            .find(|o| !o.value.is_empty())
            .map(|o| o.value.as_str())
            .or_else(|| self.options.first().map(|o| o.text.as_str()).filter(|t| !t.is_empty()))
    }

    /// Checkbox or radio control (native or ARIA).
    pub fn is_choice(&self) -> bool {
        let t = self.input_type.to_lowercase();
        (self.is_input() && (t == "checkbox" || t == "radio"))
            || matches!(self.role.as_str(), "checkbox" | "radio" | "switch")
    }

    /// Accepts typed text (inputs other than choice controls, textareas).
    pub fn is_text_like(&self) -> bool {
        (self.is_input() && !self.is_choice()) || self.is_tag("textarea")
    }

    pub fn test_attribute(&self, key: &str) -> Option<&str> {
        self.test_attributes
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Look up an attribute by its HTML name; empty values count as absent.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        let value = match key {
            "id" => self.id.as_str(),
            "type" => self.input_type.as_str(),
            "name" => self.name.as_str(),
            "placeholder" => self.placeholder.as_str(),
            "value" => self.value.as_str(),
            "href" => self.href.as_str(),
            "role" => self.role.as_str(),
            "aria-label" => self.aria_label.as_str(),
            _ => {
                return self
                    .test_attribute(key)
                    .or_else(|| self.bindings.get(key).map(String::as_str))
                    .filter(|v| !v.is_empty());
            }
        };
        Some(value).filter(|v| !v.is_empty())
    }

    /// The model binding (`<prefix>model` or `<prefix>model.<modifier>`), if any.
    pub fn model_binding(&self) -> Option<(&str, &str)> {
        self.bindings
            .iter()
            .find(|(k, v)| is_model_binding(k) && !v.is_empty())
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Email field by declared type or by name.
    pub fn is_email_field(&self) -> bool {
        self.input_type.eq_ignore_ascii_case("email") || self.name.to_lowercase().contains("email")
    }
}

/// Binding keys that carry two-way model state, e.g. `wire:model.live`.
pub fn is_model_binding(key: &str) -> bool {
    match key.split_once(':') {
        Some((_, rest)) => rest == "model" || rest.starts_with("model."),
        None => false,
    }
}
