use cypress_synth::dom::extractor::ExtractOptions;
use cypress_synth::enrich::backend::NoEnrichment;
use cypress_synth::source::capture::PageCapture;
use scraper::Html;

pub const LOGIN_URL: &str = "https://app.example.com/login";

/// One form: test-id email field, password field, submit button.
pub const LOGIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Sign In</title></head>
<body>
  <form id="login" action="/login" method="post">
    <label for="email">Email address</label>
    <input type="email" id="email" name="email" data-testid="login-email">
    <input type="password" id="password" name="password">
    <button type="submit">Log in</button>
  </form>
</body>
</html>"#;

/// Livewire-bound profile form plus assorted instrumented nodes.
pub const SETTINGS_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Account   Settings</title>
  <meta name="description" content="Manage your account">
</head>
<body>
  <nav>
    <a href="/">Home</a>
    <a href="/about" aria-label="About us">About</a>
  </nav>
  <div role="tab">Profile</div>
  <div role="tab" data-cy="tab-security">Security</div>
  <form id="profile" wire:submit="save">
    <label>Display name <input name="display_name" wire:model.live="name" required></label>
    <input type="checkbox" name="newsletter" id="newsletter">
    <select name="country">
      <option value="nz">New Zealand</option>
      <option>Other</option>
    </select>
    <input type="hidden" name="_token" value="abc">
    <button type="submit" class="btn primary">Save</button>
  </form>
  <input name="search" placeholder="Search &quot;everything&quot;">
  <button name="go">Go</button>
  <button name="go">Go</button>
  <span data-testid="status">Ready</span>
  <input id="1st" name="first">
  <div wire:click="refresh" role="button">Refresh</div>
</body>
</html>"#;

/// A form with a text field and no submit control.
pub const NO_SUBMIT_PAGE: &str = r#"<html><head><title>Newsletter</title></head>
<body><form><input name="nickname"></form></body></html>"#;

/// A bound dropdown outside any form, led by a placeholder option.
pub const BOUND_SELECT_PAGE: &str = r#"<html><head><title>Region</title></head>
<body><select wire:model="country">
  <option value="">Choose a country</option>
  <option value="nz">New Zealand</option>
</select></body></html>"#;

/// Static page with nothing interactive.
pub const EMPTY_PAGE: &str = "<html><head><title>Nothing</title></head><body><p>Hello</p></body></html>";

pub fn capture(url: &str, markup: &str) -> (PageCapture, Html) {
    let document = Html::parse_document(markup);
    let capture = PageCapture::from_document(url, &document, &ExtractOptions::default(), &NoEnrichment);
    (capture, document)
}

/// Markup with `required` added to the element carrying `marker`.
pub fn with_required(markup: &str, marker: &str) -> String {
    markup.replacen(marker, &format!("{} required", marker), 1)
}
