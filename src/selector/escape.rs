/// Escape a value for use inside a double-quoted CSS attribute selector.
pub fn attr_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '\n' => out.push_str("\\a "),
            _ => out.push(c),
        }
    }
    out
}

/// `[name="value"]` with the name and value escaped.
pub fn attr_selector(name: &str, value: &str) -> String {
    format!("[{}=\"{}\"]", identifier(name), attr_value(value))
}

/// Escape a CSS identifier (`#id`, attribute names like `wire:model`).
///
/// Follows the CSSOM `CSS.escape` rules for the characters that matter in
/// practice: a leading digit is hex-escaped, anything outside
/// `[A-Za-z0-9_-]` and non-ASCII is backslash-escaped.
pub fn identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());

    for (i, c) in ident.chars().enumerate() {
        let leading_digit = i == 0 && c.is_ascii_digit();
        let second_digit_after_dash =
            i == 1 && c.is_ascii_digit() && ident.starts_with('-');

        if leading_digit || second_digit_after_dash {
            out.push_str(&format!("\\{:x} ", c as u32));
        } else if c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
            out.push(c);
        } else {
            out.push('\\');
            out.push(c);
        }
    }

    if out == "-" {
        return "\\-".to_string();
    }

    out
}
