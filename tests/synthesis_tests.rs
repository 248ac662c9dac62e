use cypress_synth::error::SynthError;
use cypress_synth::generate_bundle;
use cypress_synth::synth::bundle::SynthesisOptions;
use cypress_synth::synth::page_object::{LoginSelectors, generate_page_object};
use cypress_synth::synth::script::{SectionKind, plan_sections};
use cypress_synth::synth::values::{DEFAULT_VALUE, EMAIL_VALUE, PASSWORD_VALUE, synthesize_value};
use cypress_synth::synth::resolve_all;
use pretty_assertions::assert_eq;

mod common;
use crate::common::pages::{
    BOUND_SELECT_PAGE, EMPTY_PAGE, LOGIN_PAGE, LOGIN_URL, NO_SUBMIT_PAGE, SETTINGS_PAGE, capture, with_required,
};

fn sections_of(url: &str, markup: &str) -> Vec<SectionKind> {
    let (capture, document) = capture(url, markup);
    let resolved = resolve_all(&capture.elements, &document);
    plan_sections(&resolved).iter().map(|s| s.kind()).collect()
}

fn script_of(url: &str, markup: &str) -> String {
    let (capture, document) = capture(url, markup);
    generate_bundle(&capture, &document, &SynthesisOptions::default())
        .unwrap()
        .script
}

fn count_tests(script: &str) -> usize {
    script
        .lines()
        .filter(|line| line.trim_start().starts_with("it('"))
        .count()
}

fn assert_balanced(script: &str) {
    for (open, close) in [('{', '}'), ('(', ')'), ('[', ']')] {
        assert_eq!(
            script.matches(open).count(),
            script.matches(close).count(),
            "unbalanced {}{} in:\n{}",
            open,
            close,
            script
        );
    }
}

// ============================================================================
// Value generation
// ============================================================================

#[test]
fn value_generation_is_pure() {
    let inputs = [
        ("email", "", "text"),
        ("", "Your password", ""),
        ("qty", "", "number"),
        ("comment", "Say something", "text"),
    ];
    for (name, placeholder, input_type) in inputs {
        let first = synthesize_value(name, placeholder, input_type);
        for _ in 0..3 {
            assert_eq!(synthesize_value(name, placeholder, input_type), first);
        }
        assert!(!first.is_empty());
    }
    assert_eq!(synthesize_value("comment", "Say something", "text"), DEFAULT_VALUE);
}

// ============================================================================
// Login end-to-end scenario
// ============================================================================

#[test]
fn login_page_sections() {
    assert_eq!(
        sections_of(LOGIN_URL, LOGIN_PAGE),
        vec![SectionKind::Smoke, SectionKind::Interaction, SectionKind::Authentication]
    );
}

#[test]
fn login_page_interaction_types_into_resolved_fields() {
    let script = script_of(LOGIN_URL, LOGIN_PAGE);

    let email_fill = format!(
        "page.get('input[data-testid=\"login-email\"]#email:visible')\n          .clear()\n          .type('{}', {{ delay: 50 }})",
        EMAIL_VALUE
    );
    assert!(script.contains(&email_fill), "missing email fill in:\n{}", script);

    let password_fill = format!(
        "page.get('input#password[name=\"password\"]:visible')\n          .clear()\n          .type('{}', {{ delay: 50 }})",
        PASSWORD_VALUE
    );
    assert!(script.contains(&password_fill), "missing password fill in:\n{}", script);

    assert!(script.contains("page.get('form#login:visible').should('exist').within(() => {"));
    assert!(script.contains("page.click('/html/body/form/button');"));
    assert!(script.contains("cy.wait('@networkUpdate').its('response.statusCode').should('eq', 200);"));
}

#[test]
fn login_page_has_exactly_two_auth_tests() {
    let script = script_of(LOGIN_URL, LOGIN_PAGE);
    let auth = script
        .split("describe('Authentication Tests', () => {")
        .nth(1)
        .expect("authentication section present");

    assert_eq!(count_tests(auth), 2);
    assert!(auth.contains("this.testData.users[0].email, this.testData.users[0].password"));
    assert!(auth.contains("this.testData.users[1].email, this.testData.users[1].password"));
    assert!(auth.contains("cy.contains('Invalid credentials');"));

    assert!(!script.contains("Validation Tests"));
    assert!(!script.contains("State Binding Tests"));
    assert_eq!(count_tests(&script), 4);
}

#[test]
fn login_page_scaffolding() {
    let script = script_of(LOGIN_URL, LOGIN_PAGE);

    assert!(script.starts_with("// Sign In Test Suite for app.example.com\n"));
    assert!(script.contains("const SignInPage = require('./SignInPage');"));
    assert!(script.contains("Cypress.config('defaultCommandTimeout', 10000);"));
    assert!(script.contains("Cypress.config('pageLoadTimeout', 30000);"));
    assert!(script.contains("describe('Sign In - Automated Test Suite', () => {"));
    assert!(script.contains("cy.intercept('POST', '**').as('networkUpdate');"));
    assert!(script.contains("cy.fixture('test_data.json').as('testData');"));
    assert!(script.contains("cy.document().its('readyState').should('eq', 'complete');"));
    assert!(script.contains("cy.url().should('eq', 'https://app.example.com/login');"));
    assert_balanced(&script);
}

#[test]
fn login_page_object_uses_resolved_selectors() {
    let (capture, document) = capture(LOGIN_URL, LOGIN_PAGE);
    let bundle = generate_bundle(&capture, &document, &SynthesisOptions::default()).unwrap();

    let expected_login = r#"  login(email, password) {
    this.type('input[data-testid="login-email"]#email:visible', email);
    this.type('input#password[name="password"]:visible', password);
    this.click('/html/body/form/button');
  }"#;
    assert!(
        bundle.page_object.contains(expected_login),
        "login action not found in:\n{}",
        bundle.page_object
    );
    assert_eq!(bundle.summary.page_object_filename, "SignInPage.js");
    assert_eq!(bundle.summary.script_filename, "cypress_test_app_example_com.js");
    assert_eq!(bundle.summary.fixture_filename, "test_data.json");
    assert_eq!(bundle.summary.element_count, 4);
    assert_eq!(bundle.fixture.users[0].email, EMAIL_VALUE);
    assert_balanced(&bundle.page_object);
}

#[test]
fn accented_title_keeps_its_letters() {
    let markup = "<html><head><title>Café Connexion</title></head><body><button>Go</button></body></html>";
    let (capture, document) = capture("https://cafe.example.fr/", markup);
    let bundle = generate_bundle(&capture, &document, &SynthesisOptions::default()).unwrap();

    assert_eq!(bundle.summary.page_object_filename, "CaféConnexionPage.js");
    assert!(bundle.script.contains("const CaféConnexionPage = require('./CaféConnexionPage');"));
    assert!(bundle.page_object.contains("class CaféConnexionPage {"));
}

#[test]
fn generic_login_without_fields() {
    let source = generate_page_object("https://x.test/", "Landing", &LoginSelectors::default());
    assert!(source.contains(r#"this.type('[type="password"]:first', password);"#));
    assert!(source.contains(r#"this.click('[type="submit"]:first');"#));
}

// ============================================================================
// Section planning
// ============================================================================

#[test]
fn adding_a_required_field_only_adds_validation() {
    let before = sections_of(LOGIN_URL, LOGIN_PAGE);
    let after = sections_of(LOGIN_URL, &with_required(LOGIN_PAGE, r#"name="password""#));

    assert!(!before.contains(&SectionKind::Validation));
    assert!(after.contains(&SectionKind::Validation));
    for kind in &before {
        assert!(after.contains(kind), "{:?} disappeared", kind);
    }
    assert_eq!(after.len(), before.len() + 1);
}

#[test]
fn validation_section_clears_and_expects_invalid() {
    let script = script_of(LOGIN_URL, &with_required(LOGIN_PAGE, r#"name="password""#));
    let validation = script
        .split("describe('Validation Tests', () => {")
        .nth(1)
        .unwrap();

    assert!(validation.contains("page.get('input#password[name=\"password\"]:visible').clear();"));
    assert!(validation.contains("page.get('form#login:visible').submit();"));
    assert!(validation.contains("page.get('input#password[name=\"password\"]:visible').should('match', ':invalid');"));
}

#[test]
fn settings_page_sections_and_binding() {
    assert_eq!(
        sections_of("https://app.example.com/settings", SETTINGS_PAGE),
        vec![
            SectionKind::Smoke,
            SectionKind::Interaction,
            SectionKind::Validation,
            SectionKind::StateBinding,
        ]
    );

    let script = script_of("https://app.example.com/settings", SETTINGS_PAGE);
    assert!(script.contains("cy.intercept('POST', '**/_livewire**').as('networkUpdate');"));

    let state = script.split("describe('State Binding Tests', () => {").nth(1).unwrap();
    assert!(state.contains(&format!(
        r#"page.get('input[wire\\:model\\.live="name"]:visible').clear().type('{}', {{ delay: 50 }});"#,
        DEFAULT_VALUE
    )));
    assert!(state.contains("cy.wait('@networkUpdate');"));
    assert_balanced(&script);
}

#[test]
fn bound_select_picks_an_option_and_checks_it() {
    let url = "https://app.example.com/region";
    assert_eq!(sections_of(url, BOUND_SELECT_PAGE), vec![SectionKind::Smoke, SectionKind::StateBinding]);

    let script = script_of(url, BOUND_SELECT_PAGE);
    let state = script.split("describe('State Binding Tests', () => {").nth(1).unwrap();
    assert!(state.contains(r#"page.select('select[wire\\:model="country"]:visible', 'nz');"#), "{}", state);
    assert!(state.contains(r#"page.get('select[wire\\:model="country"]:visible').should('have.value', 'nz');"#));
    assert!(!state.contains("should('exist')"));
    assert_balanced(&script);
}

#[test]
fn settings_interaction_fills_loose_fields_before_the_form() {
    let script = script_of("https://app.example.com/settings", SETTINGS_PAGE);
    let interaction = script
        .split("describe('Interaction Tests', () => {")
        .nth(1)
        .unwrap()
        .split("describe('Validation Tests'")
        .next()
        .unwrap();

    let search = interaction.find(r#"input[name="search"]:visible"#).unwrap();
    let within = interaction.find(".within(() => {").unwrap();
    let checkbox = interaction
        .find(r#"page.get('input#newsletter[name="newsletter"]:visible').check({ force: true }).should('be.checked');"#)
        .unwrap();

    assert!(search < within);
    assert!(within < checkbox);
    assert!(!interaction.contains("_token"));
    assert!(interaction.contains("page.click('/html/body/form/button');"));
}

#[test]
fn form_without_submit_stays_balanced() {
    let script = script_of("https://news.example.org/", NO_SUBMIT_PAGE);
    assert_balanced(&script);
    assert!(script.contains("describe('Interaction Tests', () => {"));
    assert!(!script.contains("its('response.statusCode')"));
    assert!(!script.contains("Authentication Tests"));
}

#[test]
fn network_route_override() {
    let (capture, document) = capture(LOGIN_URL, LOGIN_PAGE);
    let options = SynthesisOptions {
        network_route: Some("**/api/session".to_string()),
        ..SynthesisOptions::default()
    };
    let bundle = generate_bundle(&capture, &document, &options).unwrap();
    assert!(bundle.script.contains("cy.intercept('POST', '**/api/session').as('networkUpdate');"));
}

// ============================================================================
// Pipeline errors
// ============================================================================

#[test]
fn empty_inventory_is_an_error() {
    let (capture, document) = capture("https://static.example.com/", EMPTY_PAGE);
    let err = generate_bundle(&capture, &document, &SynthesisOptions::default()).unwrap_err();
    assert!(matches!(err, SynthError::NoTestableElements { .. }));
    assert!(!err.is_upstream());
}

#[test]
fn generation_is_deterministic() {
    let first = script_of("https://app.example.com/settings", SETTINGS_PAGE);
    let second = script_of("https://app.example.com/settings", SETTINGS_PAGE);
    assert_eq!(first, second);
}
