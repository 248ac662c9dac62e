//! Small line-oriented writer for generated JavaScript.

/// Single-quoted JavaScript string literal.
pub fn js_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Text safe to place after `//` on a single line.
pub fn comment_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Indentation-aware source builder. `open` and `close` keep block
/// structure balanced; the rendered text ends with a newline.
#[derive(Debug, Default)]
pub struct ScriptWriter {
    out: String,
    depth: usize,
}

impl ScriptWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            self.out.push('\n');
            return self;
        }
        for _ in 0..self.depth {
            self.out.push_str("  ");
        }
        self.out.push_str(text);
        self.out.push('\n');
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.line("")
    }

    pub fn comment(&mut self, text: &str) -> &mut Self {
        self.line(&format!("// {}", comment_text(text)))
    }

    /// Write `header` and indent what follows.
    pub fn open(&mut self, header: &str) -> &mut Self {
        self.line(header);
        self.depth += 1;
        self
    }

    /// Dedent and write `footer`.
    pub fn close(&mut self, footer: &str) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(footer)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_string_literals() {
        assert_eq!(js_str("plain"), "'plain'");
        assert_eq!(js_str(r#"input[name="a"]"#), r#"'input[name="a"]'"#);
        assert_eq!(js_str("it's"), r"'it\'s'");
        assert_eq!(js_str(r"wire\:model"), r"'wire\\:model'");
    }

    #[test]
    fn blocks_indent_and_balance() {
        let mut w = ScriptWriter::new();
        w.open("describe('x', () => {");
        w.line("cy.log('a');");
        w.close("});");
        assert_eq!(w.depth(), 0);
        assert_eq!(w.finish(), "describe('x', () => {\n  cy.log('a');\n});\n");
    }
}
