use crate::synth::ResolvedElement;
use crate::synth::writer::{ScriptWriter, js_str};

const GENERIC_EMAIL: &str = r#"[type="email"]:first"#;
const GENERIC_PASSWORD: &str = r#"[type="password"]:first"#;
const GENERIC_SUBMIT: &str = r#"[type="submit"]:first"#;

/// JavaScript class name stem for a page title: letters (any script), ASCII
/// digits, `_` and `$` are kept, everything else is dropped.
pub fn class_name_from_title(title: &str) -> String {
    let mut name: String = title
        .chars()
        .filter(|c| c.is_alphabetic() || c.is_ascii_digit() || *c == '_' || *c == '$')
        .collect();

    if name.is_empty() {
        name.push_str("Unknown");
    }
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// `<Name>Page`, the exported class.
pub fn page_class(title: &str) -> String {
    format!("{}Page", class_name_from_title(title))
}

// ============================================================================
// Login selectors
// ============================================================================

/// Selectors the page object's `login()` action drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSelectors {
    pub email: String,
    pub password: String,
    pub submit: String,
}

impl Default for LoginSelectors {
    fn default() -> Self {
        Self {
            email: GENERIC_EMAIL.to_string(),
            password: GENERIC_PASSWORD.to_string(),
            submit: GENERIC_SUBMIT.to_string(),
        }
    }
}

impl LoginSelectors {
    /// Use the page's own email, password and submit controls where they
    /// exist; generic type selectors otherwise.
    pub fn from_elements(elements: &[ResolvedElement<'_>]) -> Self {
        let mut selectors = Self::default();

        if let Some(email) = elements
            .iter()
            .find(|e| e.descriptor.is_input() && e.descriptor.is_email_field())
        {
            selectors.email = email.field_selector().to_string();
        }
        if let Some(password) = elements.iter().find(|e| {
            e.descriptor.is_input() && e.descriptor.input_type.eq_ignore_ascii_case("password")
        }) {
            selectors.password = password.field_selector().to_string();
        }
        if let Some(submit) = elements.iter().find(|e| e.descriptor.is_submit()) {
            selectors.submit = submit.selector.selector.clone();
        }

        selectors
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the page object module for one page.
pub fn generate_page_object(url: &str, title: &str, login: &LoginSelectors) -> String {
    let class = page_class(title);
    let mut w = ScriptWriter::new();

    w.comment(&format!("Page Object for {}", title));
    w.comment("Encapsulates selectors and actions for maintainability");
    w.blank();

    w.open(&format!("class {} {{", class));

    w.open("visit() {");
    w.line(&format!("cy.visit({});", js_str(url)));
    w.close("}");
    w.blank();

    w.comment("Structural paths are XPath (cypress-xpath); everything else is CSS");
    w.open("get(selector) {");
    w.line("return selector.startsWith('/') ? cy.xpath(selector) : cy.get(selector);");
    w.close("}");
    w.blank();

    w.open("type(selector, value) {");
    w.line("this.get(selector).clear().type(value);");
    w.close("}");
    w.blank();

    w.open("select(selector, valueOrText) {");
    w.line("this.get(selector).select(valueOrText);");
    w.close("}");
    w.blank();

    w.open("check(selector) {");
    w.line("this.get(selector).check({ force: true });");
    w.close("}");
    w.blank();

    w.open("click(selector) {");
    w.line("this.get(selector).click();");
    w.close("}");
    w.blank();

    w.open("login(email, password) {");
    w.line(&format!("this.type({}, email);", js_str(&login.email)));
    w.line(&format!("this.type({}, password);", js_str(&login.password)));
    w.line(&format!("this.click({});", js_str(&login.submit)));
    w.close("}");

    w.close("}");
    w.blank();
    w.line(&format!("module.exports = {};", class));

    w.finish()
}
