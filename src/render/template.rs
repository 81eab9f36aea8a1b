//! Template parsing and value substitution
//!
//! A template is literal JavaScript with `{{.Name}}` placeholders. Parsing
//! splits it into text and placeholder segments and records, for each
//! placeholder, whether it sits inside a string literal of the surrounding
//! code. That context decides how a value is written out:
//!
//! - `isJuju: {{.isJuju}}` becomes `isJuju: true`
//! - `baseAppURL: "{{.baseAppURL}}"` becomes `baseAppURL: "/dashboard/"`
//! - `baseAppURL: {{.baseAppURL}}` also becomes `baseAppURL: "/dashboard/"`

use tracing::debug;

use crate::common::escape::Quote;
use crate::config::ValueMap;
use crate::error::{Location, MissingValueError, RenderError, SyntaxReason, TemplateSyntaxError};

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Lexical position of a placeholder in the surrounding JavaScript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    /// Plain code or a line comment: the value is written as a JS literal
    Expression,
    /// Inside `/* */`: a JS literal that cannot close the comment
    BlockComment,
    /// Inside a quoted string: only the escaped contents are written
    String(Quote),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    pub context: Context,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Placeholder(Placeholder),
}

/// Scanner state over the literal text between placeholders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lex {
    Code,
    Str { quote: Quote, escaped: bool },
    LineComment,
    BlockComment,
}

impl Lex {
    fn context(self) -> Context {
        match self {
            Lex::Str { quote, .. } => Context::String(quote),
            Lex::BlockComment => Context::BlockComment,
            Lex::Code | Lex::LineComment => Context::Expression,
        }
    }

    /// Advance over `c`, returning the new state and how many bytes were consumed
    fn step(self, c: char, next: Option<u8>) -> (Lex, usize) {
        let len = c.len_utf8();
        match self {
            Lex::Code => match c {
                '/' if next == Some(b'/') => (Lex::LineComment, 2),
                '/' if next == Some(b'*') => (Lex::BlockComment, 2),
                c => match Quote::from_char(c) {
                    Some(quote) => (Lex::Str { quote, escaped: false }, len),
                    None => (Lex::Code, len),
                },
            },
            Lex::Str { quote, escaped: true } => (Lex::Str { quote, escaped: false }, len),
            Lex::Str { quote, escaped: false } => match c {
                '\\' => (Lex::Str { quote, escaped: true }, len),
                c if c == quote.as_char() => (Lex::Code, len),
                // An unterminated single-line literal ends at the newline
                '\n' if quote != Quote::Backtick => (Lex::Code, len),
                _ => (self, len),
            },
            Lex::LineComment => match c {
                '\n' => (Lex::Code, len),
                _ => (self, len),
            },
            Lex::BlockComment => match c {
                '*' if next == Some(b'/') => (Lex::Code, 2),
                _ => (self, len),
            },
        }
    }
}

/// A parsed template, immutable and shareable across threads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
    source_len: usize,
}

impl Template {
    pub fn parse(text: &str) -> Result<Self, TemplateSyntaxError> {
        let bytes = text.as_bytes();
        let mut segments = Vec::new();
        let mut lex = Lex::Code;
        let mut text_start = 0;
        let mut i = 0;

        while i < text.len() {
            if text[i..].starts_with(OPEN) {
                if text_start < i {
                    segments.push(Segment::Text(text[text_start..i].to_string()));
                }
                let (token_len, name) = parse_placeholder(text, i)?;
                segments.push(Segment::Placeholder(Placeholder {
                    name,
                    context: lex.context(),
                    location: Location::of_offset(text, i),
                }));
                if let Lex::Str { quote, .. } = lex {
                    lex = Lex::Str { quote, escaped: false };
                }
                i += token_len;
                text_start = i;
                continue;
            }

            let Some(c) = text[i..].chars().next() else {
                break;
            };
            let (next_lex, consumed) = lex.step(c, bytes.get(i + c.len_utf8()).copied());
            lex = next_lex;
            i += consumed;
        }

        if text_start < text.len() {
            segments.push(Segment::Text(text[text_start..].to_string()));
        }

        let template = Self {
            segments,
            source_len: text.len(),
        };
        debug!(
            placeholders = template.placeholders().count(),
            "Parsed template"
        );
        Ok(template)
    }

    /// Placeholders in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &Placeholder> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            Segment::Text(_) => None,
        })
    }

    /// Substitute every placeholder; fails on the first one without a value
    pub fn render(&self, values: &ValueMap) -> Result<String, RenderError> {
        let mut out = String::with_capacity(self.source_len);
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(placeholder) => {
                    let value = values.get(&placeholder.name).ok_or_else(|| MissingValueError {
                        name: placeholder.name.clone(),
                        location: placeholder.location,
                    })?;
                    match placeholder.context {
                        Context::Expression => out.push_str(&value.to_js_literal()),
                        Context::BlockComment => {
                            out.push_str(&value.to_js_literal().replace("*/", "*\\/"));
                        }
                        Context::String(quote) => value.write_string_contents(&mut out, quote),
                    }
                }
            }
        }
        Ok(out)
    }
}

/// Parse the placeholder starting at `start`, returning its byte length and name
fn parse_placeholder(text: &str, start: usize) -> Result<(usize, String), TemplateSyntaxError> {
    let syntax_error = |reason| TemplateSyntaxError {
        reason,
        location: Location::of_offset(text, start),
    };

    let body_start = start + OPEN.len();
    let close = text[body_start..]
        .find(CLOSE)
        .ok_or_else(|| syntax_error(SyntaxReason::Unterminated))?;
    let body = &text[body_start..body_start + close];

    // A placeholder never spans lines or contains another opening brace pair
    if body.contains('\n') || body.contains(OPEN) {
        return Err(syntax_error(SyntaxReason::Unterminated));
    }

    let body = body.trim_matches(|c| c == ' ' || c == '\t');
    if body.is_empty() {
        return Err(syntax_error(SyntaxReason::Empty));
    }
    let name = body
        .strip_prefix('.')
        .ok_or_else(|| syntax_error(SyntaxReason::MissingDot(body.to_string())))?;
    if !is_identifier(name) {
        return Err(syntax_error(SyntaxReason::InvalidName(name.to_string())));
    }

    Ok((OPEN.len() + close + CLOSE.len(), name.to_string()))
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
