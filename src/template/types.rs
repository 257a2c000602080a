use thiserror::Error;

use crate::formatter::Formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Literal,
    Property,
}

/// A parsed unit of the output template.
///
/// For literals `value` is the unescaped text; for properties it is the variable
/// name including the `$` sigil. Only property tokens carry formatters.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub formatters: Vec<Formatter>,
}

impl Token {
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            kind: TokenKind::Literal,
            value: value.into(),
            formatters: Vec::new(),
        }
    }

    pub fn property(name: impl Into<String>, formatters: Vec<Formatter>) -> Self {
        Self {
            kind: TokenKind::Property,
            value: name.into(),
            formatters,
        }
    }

    pub fn is_property(&self) -> bool {
        self.kind == TokenKind::Property
    }
}

/// Counts of property references in a parsed template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TemplateStats {
    pub properties: usize,
    pub custom_properties: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown formatter type {kind} at position {position}")]
    UnknownFormatter { kind: char, position: usize },

    #[error("Invalid padding formatter at position {position}: {reason}")]
    InvalidPadding { position: usize, reason: String },

    #[error("Invalid slice formatter at position {position}: {reason}")]
    InvalidSlice { position: usize, reason: String },

    #[error("Invalid replace pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Replace formatter starting at position {position} is missing its closing '/'")]
    UnterminatedReplace { position: usize },

    #[error("Formatter list starting at position {position} is missing its closing ']'")]
    UnterminatedFormatter { position: usize },

    #[error("Empty formatter list at position {position}")]
    EmptyFormatterList { position: usize },

    #[error("Unexpected character '{found}' at position {position}, expected ',' or ']'")]
    UnexpectedCharacter { found: char, position: usize },
}
