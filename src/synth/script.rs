use serde::{Deserialize, Serialize};

use crate::synth::ResolvedElement;
use crate::synth::bundle::SynthesisOptions;
use crate::synth::fixture::FIXTURE_FILENAME;
use crate::synth::page_object::page_class;
use crate::synth::values::value_for;
use crate::synth::writer::{ScriptWriter, js_str};

/// Intercept route when the page carries Livewire bindings.
pub const LIVEWIRE_ROUTE: &str = "**/_livewire**";

/// Intercept route for pages without bindings: any POST.
pub const ANY_ROUTE: &str = "**";

pub const NETWORK_ALIAS: &str = "networkUpdate";

/// Input types that are never filled by the interaction test.
const SKIPPED_INPUT_TYPES: [&str; 6] = ["submit", "button", "hidden", "reset", "image", "file"];

// ============================================================================
// Section catalog
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Smoke,
    Interaction,
    Authentication,
    Validation,
    StateBinding,
}

impl SectionKind {
    /// Every kind, in emission order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Smoke,
        SectionKind::Interaction,
        SectionKind::Authentication,
        SectionKind::Validation,
        SectionKind::StateBinding,
    ];

    pub fn id(self) -> &'static str {
        match self {
            SectionKind::Smoke => "smoke",
            SectionKind::Interaction => "interaction",
            SectionKind::Authentication => "authentication",
            SectionKind::Validation => "validation",
            SectionKind::StateBinding => "state_binding",
        }
    }

    /// `describe` block title.
    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Smoke => "Smoke Tests",
            SectionKind::Interaction => "Interaction Tests",
            SectionKind::Authentication => "Authentication Tests",
            SectionKind::Validation => "Validation Tests",
            SectionKind::StateBinding => "State Binding Tests",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SectionKind::Smoke => "Page loads, has a title and a visible body (always emitted)",
            SectionKind::Interaction => {
                "Fills the first form with synthesized values and submits it (needs a form)"
            }
            SectionKind::Authentication => {
                "Valid and invalid login attempts with fixture credentials (needs an email field in a form)"
            }
            SectionKind::Validation => {
                "Empties a required field, submits and expects it to be invalid (needs a required field)"
            }
            SectionKind::StateBinding => {
                "Drives a bound element and checks its state after the update request (needs a binding attribute)"
            }
        }
    }
}

// ============================================================================
// Planning
// ============================================================================

/// One planned `describe` block, with the elements it drives.
#[derive(Debug, Clone)]
pub enum Section<'s> {
    Smoke,
    Interaction(InteractionPlan<'s>),
    Authentication,
    Validation(ValidationPlan<'s>),
    StateBinding(&'s ResolvedElement<'s>),
}

impl Section<'_> {
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Smoke => SectionKind::Smoke,
            Section::Interaction(_) => SectionKind::Interaction,
            Section::Authentication => SectionKind::Authentication,
            Section::Validation(_) => SectionKind::Validation,
            Section::StateBinding(_) => SectionKind::StateBinding,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InteractionPlan<'s> {
    pub form: &'s ResolvedElement<'s>,
    /// Inputs with no owning form, filled before entering the form.
    pub unassociated: Vec<&'s ResolvedElement<'s>>,
    /// Inputs owned by `form`, filled inside it.
    pub owned: Vec<&'s ResolvedElement<'s>>,
    pub submit: Option<&'s ResolvedElement<'s>>,
}

#[derive(Debug, Clone)]
pub struct ValidationPlan<'s> {
    pub field: &'s ResolvedElement<'s>,
    /// The field's own form, else the first form on the page.
    pub form: Option<&'s ResolvedElement<'s>>,
}

/// Decide which sections the page gets. Order is fixed; the smoke section
/// is always first and every other section depends only on its own facts.
pub fn plan_sections<'s>(elements: &'s [ResolvedElement<'s>]) -> Vec<Section<'s>> {
    let mut sections = vec![Section::Smoke];

    let forms: Vec<&ResolvedElement<'_>> = elements.iter().filter(|e| e.descriptor.is_form()).collect();

    if let Some(form) = forms.first().copied() {
        sections.push(Section::Interaction(plan_interaction(form, elements)));
    }

    let has_login_field = elements.iter().any(|e| {
        e.descriptor.is_input() && e.descriptor.form_owner.is_some() && e.descriptor.is_email_field()
    });
    if has_login_field {
        sections.push(Section::Authentication);
    }

    if let Some(field) = elements.iter().find(|e| e.descriptor.required) {
        let own_form = field
            .descriptor
            .form_owner
            .as_deref()
            .and_then(|owner| forms.iter().copied().find(|f| f.descriptor.path == owner));
        sections.push(Section::Validation(ValidationPlan {
            field,
            form: own_form.or_else(|| forms.first().copied()),
        }));
    }

    let bound = elements
        .iter()
        .find(|e| e.binding.is_some())
        .or_else(|| elements.iter().find(|e| e.descriptor.has_bindings()));
    if let Some(target) = bound {
        sections.push(Section::StateBinding(target));
    }

    sections
}

fn plan_interaction<'s>(form: &'s ResolvedElement<'s>, elements: &'s [ResolvedElement<'s>]) -> InteractionPlan<'s> {
    let mut unassociated = Vec::new();
    let mut owned = Vec::new();

    for element in elements.iter().filter(|e| is_fillable(e)) {
        match element.descriptor.form_owner.as_deref() {
            None => unassociated.push(element),
            Some(owner) if owner == form.descriptor.path => owned.push(element),
            Some(_) => {}
        }
    }

    InteractionPlan {
        form,
        unassociated,
        owned,
        submit: elements.iter().find(|e| e.descriptor.is_submit()),
    }
}

fn is_fillable(element: &ResolvedElement<'_>) -> bool {
    let d = element.descriptor;
    d.is_input()
        && !SKIPPED_INPUT_TYPES
            .iter()
            .any(|t| d.input_type.eq_ignore_ascii_case(t))
        && !d.name.starts_with('_')
}

// ============================================================================
// Rendering
// ============================================================================

/// Intercept route: config override, else Livewire's endpoint when any
/// binding is present, else every POST.
pub fn network_route(elements: &[ResolvedElement<'_>], options: &SynthesisOptions) -> String {
    if let Some(route) = options.network_route.as_deref().filter(|r| !r.is_empty()) {
        return route.to_string();
    }
    if elements.iter().any(|e| e.descriptor.has_bindings()) {
        LIVEWIRE_ROUTE.to_string()
    } else {
        ANY_ROUTE.to_string()
    }
}

/// Render the test script for a page.
pub fn generate_script(
    url: &str,
    title: &str,
    elements: &[ResolvedElement<'_>],
    sections: &[Section<'_>],
    options: &SynthesisOptions,
) -> String {
    let class = page_class(title);
    let domain = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    let kinds: Vec<&str> = sections.iter().map(|s| s.kind().id()).collect();

    let mut w = ScriptWriter::new();
    w.comment(&format!("{} Test Suite for {}", title, domain));
    w.comment(&format!("Generated from: {}", url));
    w.comment(&format!("Sections: {}", kinds.join(", ")));
    w.comment("Requires: npm install --save-dev cypress cypress-xpath");
    w.blank();
    w.line(&format!("const {} = require({});", class, js_str(&format!("./{}", class))));
    w.blank();
    w.line(&format!(
        "Cypress.config('defaultCommandTimeout', {});",
        options.command_timeout_ms
    ));
    w.line(&format!("Cypress.config('pageLoadTimeout', {});", options.page_load_timeout_ms));
    w.blank();

    w.open(&format!(
        "describe({}, () => {{",
        js_str(&format!("{} - Automated Test Suite", title))
    ));
    w.line(&format!("const page = new {}();", class));
    w.blank();

    w.open("beforeEach(() => {");
    w.line(&format!(
        "cy.intercept('POST', {}).as('{}');",
        js_str(&network_route(elements, options)),
        NETWORK_ALIAS
    ));
    w.line(&format!("cy.fixture('{}').as('testData');", FIXTURE_FILENAME));
    w.line("page.visit();");
    w.line("cy.document().its('readyState').should('eq', 'complete');");
    w.line("cy.get('body').should('be.visible');");
    w.close("});");

    for section in sections {
        w.blank();
        w.open(&format!("describe({}, () => {{", js_str(section.kind().title())));
        match section {
            Section::Smoke => render_smoke(&mut w, url),
            Section::Interaction(plan) => render_interaction(&mut w, plan),
            Section::Authentication => render_authentication(&mut w),
            Section::Validation(plan) => render_validation(&mut w, plan),
            Section::StateBinding(target) => render_state_binding(&mut w, target),
        }
        w.close("});");
    }

    w.close("});");
    w.finish()
}

fn wait_for_update() -> String {
    format!("cy.wait('@{}');", NETWORK_ALIAS)
}

fn render_smoke(w: &mut ScriptWriter, url: &str) {
    w.open("it('loads the page successfully', () => {");
    w.open("cy.on('uncaught:exception', (err) => {");
    w.line("Cypress.log({ name: 'uncaught', message: err.message });");
    w.line("return false;");
    w.close("});");
    w.line(&format!("cy.url().should('eq', {});", js_str(url)));
    w.line("cy.title().should('not.be.empty');");
    w.line("page.get('body').should('be.visible');");
    w.close("});");
}

fn fill_field(w: &mut ScriptWriter, field: &ResolvedElement<'_>) {
    let selector = js_str(field.field_selector());
    if field.descriptor.is_choice() {
        w.line(&format!(
            "page.get({}).check({{ force: true }}).should('be.checked');",
            selector
        ));
        return;
    }

    let value = js_str(value_for(field.descriptor));
    w.line(&format!("page.get({})", selector));
    w.line("  .clear()");
    w.line(&format!("  .type({}, {{ delay: 50 }})", value));
    w.line(&format!("  .should('have.value', {});", value));
}

fn render_interaction(w: &mut ScriptWriter, plan: &InteractionPlan<'_>) {
    w.open("it('fills and submits the form', () => {");

    for field in &plan.unassociated {
        fill_field(w, field);
    }

    let submit_inside = plan
        .submit
        .is_some_and(|s| s.descriptor.form_owner.as_deref() == Some(plan.form.descriptor.path.as_str()));

    w.open(&format!(
        "page.get({}).should('exist').within(() => {{",
        js_str(&plan.form.selector.selector)
    ));
    for field in &plan.owned {
        fill_field(w, field);
    }
    if let Some(submit) = plan.submit.filter(|_| submit_inside) {
        w.line(&format!("page.click({});", js_str(&submit.selector.selector)));
    }
    w.close("});");

    if let Some(submit) = plan.submit {
        if !submit_inside {
            w.line(&format!("page.click({});", js_str(&submit.selector.selector)));
        }
        w.line(&format!(
            "cy.wait('@{}').its('response.statusCode').should('eq', 200);",
            NETWORK_ALIAS
        ));
        w.line("cy.get('body').should('contain', 'success'); // Adjust to the page's confirmation");
    }

    w.close("});");
}

fn render_authentication(w: &mut ScriptWriter) {
    w.open("it('logs in with valid credentials', function () {");
    w.line("page.login(this.testData.users[0].email, this.testData.users[0].password);");
    w.line(&wait_for_update());
    w.line("cy.url().should('include', '/dashboard'); // Adjust to the post-login route");
    w.line("cy.contains(this.testData.users[0].email);");
    w.close("});");
    w.blank();
    w.open("it('rejects invalid credentials', function () {");
    w.line("page.login(this.testData.users[1].email, this.testData.users[1].password);");
    w.line(&wait_for_update());
    w.line("cy.contains('Invalid credentials'); // Adjust to the page's error message");
    w.close("});");
}

fn render_validation(w: &mut ScriptWriter, plan: &ValidationPlan<'_>) {
    let field = plan.field;
    let selector = js_str(field.field_selector());
    let d = field.descriptor;

    w.open("it('flags an empty required field', () => {");
    if d.is_input() && d.input_type.eq_ignore_ascii_case("checkbox") {
        w.line(&format!("page.get({}).uncheck({{ force: true }});", selector));
    } else if d.is_text_like() {
        w.line(&format!("page.get({}).clear();", selector));
    }
    if let Some(form) = plan.form {
        w.line(&format!("page.get({}).submit();", js_str(&form.selector.selector)));
    }
    w.line(&format!("page.get({}).should('match', ':invalid');", selector));
    w.close("});");
}

fn render_state_binding(w: &mut ScriptWriter, target: &ResolvedElement<'_>) {
    let d = target.descriptor;

    match &target.binding {
        Some(binding) => {
            let selector = js_str(&binding.selector);
            w.open("it('keeps bound state after an update', () => {");
            if d.is_choice() {
                w.line(&format!("page.get({}).check({{ force: true }});", selector));
                w.line(&wait_for_update());
                w.line(&format!("page.get({}).should('be.checked');", selector));
            } else if d.is_text_like() {
                let value = js_str(value_for(d));
                w.line(&format!("page.get({}).clear().type({}, {{ delay: 50 }});", selector, value));
                w.line(&wait_for_update());
                w.line(&format!("page.get({}).should('have.value', {});", selector, value));
            } else if let Some(option) = d.preferred_option().filter(|_| d.is_select()) {
                let option = js_str(option);
                w.line(&format!("page.select({}, {});", selector, option));
                w.line(&wait_for_update());
                w.line(&format!("page.get({}).should('have.value', {});", selector, option));
            } else {
                w.line(&format!("page.click({});", selector));
                w.line(&wait_for_update());
                w.line(&format!("page.get({}).should('exist');", selector));
            }
            w.close("});");
        }
        None => {
            let selector = js_str(&target.selector.selector);
            w.open("it('triggers a bound action', () => {");
            w.line(&format!("page.click({});", selector));
            w.line(&wait_for_update());
            w.line(&format!("page.get({}).should('exist');", selector));
            w.close("});");
        }
    }
}
