/// Maximum number of characters kept from an element's visible text.
pub const TEXT_CAP: usize = 50;

/// Collapse every run of whitespace into a single space.
///
/// Leading and trailing whitespace collapses to a single space as well; call
/// sites that need a trimmed result trim first.
pub fn collapse_whitespace(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_space = false;

    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out
}

/// Normalize an element's visible text: trim, cap at `cap` characters with
/// an ellipsis marker, then collapse whitespace.
pub fn visible_text(raw: &str, cap: usize) -> String {
    let trimmed = raw.trim();

    let capped = if trimmed.chars().count() > cap {
        let head: String = trimmed.chars().take(cap).collect();
        format!("{}...", head.trim())
    } else {
        trimmed.to_string()
    };

    collapse_whitespace(&capped)
}

/// Join text fragments the way label text is read: every fragment trimmed,
/// empty fragments dropped, no separator, whitespace collapsed.
pub fn stripped_text<'a>(fragments: impl Iterator<Item = &'a str>) -> String {
    let joined: String = fragments
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    collapse_whitespace(&joined)
}

/// Stable fingerprint of a captured document.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}
