//! Error types for template rendering and configuration handling
//!
//! Library code returns these typed errors; `main` wraps them in `anyhow`
//! with file and step context.

use thiserror::Error;

/// Position of a token inside a template (1-based line and column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Compute the line/column of a byte offset in `text`
    pub fn of_offset(text: &str, offset: usize) -> Self {
        let before = &text[..offset.min(text.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A placeholder referenced by the template has no supplied value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value supplied for placeholder `{name}` at {location}")]
pub struct MissingValueError {
    pub name: String,
    pub location: Location,
}

/// A placeholder token in the template is malformed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("template syntax error at {location}: {reason}")]
pub struct TemplateSyntaxError {
    pub reason: SyntaxReason,
    pub location: Location,
}

/// What exactly was wrong with a placeholder token
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxReason {
    #[error("unterminated placeholder, expected `}}}}`")]
    Unterminated,

    #[error("empty placeholder")]
    Empty,

    #[error("placeholder `{0}` must start with `.`")]
    MissingDot(String),

    #[error("invalid placeholder name `{0}`")]
    InvalidName(String),
}

/// Rendering failure; no partial output is produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error(transparent)]
    MissingValue(#[from] MissingValueError),

    #[error(transparent)]
    Syntax(#[from] TemplateSyntaxError),
}

/// Problems converting external input into configuration values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("unsupported value type for `{key}`: expected string, boolean or null, found {found}")]
    UnsupportedType { key: String, found: &'static str },

    #[error("override `{0}` must have the form KEY=VALUE")]
    MalformedOverride(String),

    #[error("values file must contain a JSON object")]
    NotAnObject,
}

/// Problems with the configuration document itself
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{key}` expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid configuration: {}", .0.join("; "))]
    Invalid(Vec<String>),
}
