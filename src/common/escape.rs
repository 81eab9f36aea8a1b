//! JavaScript string escaping
//!
//! Output is valid inside a quoted JS string literal that is itself embedded
//! in an HTML `<script>` element.

/// Quote character delimiting a JS string literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Double,
    Single,
    Backtick,
}

impl Quote {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '"' => Some(Self::Double),
            '\'' => Some(Self::Single),
            '`' => Some(Self::Backtick),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
            Self::Backtick => '`',
        }
    }
}

/// Append `value` to `out`, escaped for the inside of a `quote`-delimited literal
pub fn escape_into(out: &mut String, value: &str, quote: Quote) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\'' if quote == Quote::Single => out.push_str("\\'"),
            '`' if quote == Quote::Backtick => out.push_str("\\`"),
            // `${` would start an interpolation inside a template literal
            '$' if quote == Quote::Backtick => out.push_str("\\u0024"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
}

/// Double-quoted JS/JSON string literal for `value`
pub fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    escape_into(&mut out, value, Quote::Double);
    out.push('"');
    out
}
