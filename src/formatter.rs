//! Value transformers attached to property references in the output template.
//!
//! A property written as `$title[/\./ /,>:8]` carries two formatters, applied left
//! to right: the output of one is the input of the next.

use regex::Regex;

/// Per-file context handed to formatters while a name is being generated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamerState {
    /// Zero-based position of the file in the batch
    pub index: usize,
    /// Original file name, including the extension
    pub file_name: String,
    /// Extension with its leading dot, empty when the file has none
    pub extension: String,
}

impl RenamerState {
    pub fn new(index: usize, file_name: &str) -> Self {
        let (_, extension) = split_extension(file_name);
        Self {
            index,
            file_name: file_name.to_string(),
            extension: extension.to_string(),
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        split_extension(&self.file_name).0
    }
}

/// Split a file name into stem and extension (with the dot).
///
/// A leading dot does not start an extension: `.bashrc` has no extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(0) | None => (file_name, ""),
        Some(idx) => file_name.split_at(idx),
    }
}

/// A single formatting directive
#[derive(Debug, Clone)]
pub enum Formatter {
    /// `%<char><len>`: left-pad with `pad_char` up to `length` characters
    Padding { pad_char: char, length: usize },
    /// `>start:end`: character range, either bound optional
    Slice {
        start: Option<usize>,
        end: Option<usize>,
    },
    /// `/find/replace/`: replace every match of `pattern`
    Replace { pattern: Regex, replacement: String },
}

impl Formatter {
    pub fn padding(pad_char: char, length: usize) -> Self {
        Formatter::Padding { pad_char, length }
    }

    pub fn slice(start: Option<usize>, end: Option<usize>) -> Self {
        Formatter::Slice { start, end }
    }

    pub fn replace(find: &str, replacement: &str) -> Result<Self, regex::Error> {
        Ok(Formatter::Replace {
            pattern: Regex::new(find)?,
            replacement: replacement.to_string(),
        })
    }

    /// Short name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Formatter::Padding { .. } => "padding",
            Formatter::Slice { .. } => "slice",
            Formatter::Replace { .. } => "replace",
        }
    }

    /// Transform a value. Lengths and indices count characters, not bytes.
    pub fn format(&self, value: &str, _state: &RenamerState) -> String {
        match self {
            Formatter::Padding { pad_char, length } => pad(value, *pad_char, *length),
            Formatter::Slice { start, end } => slice(value, *start, *end),
            Formatter::Replace {
                pattern,
                replacement,
            } => pattern
                .replace_all(value, replacement.as_str())
                .into_owned(),
        }
    }
}

impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                Formatter::Padding { pad_char, length },
                Formatter::Padding {
                    pad_char: other_char,
                    length: other_length,
                },
            ) => pad_char == other_char && length == other_length,
            (
                Formatter::Slice { start, end },
                Formatter::Slice {
                    start: other_start,
                    end: other_end,
                },
            ) => start == other_start && end == other_end,
            (
                Formatter::Replace {
                    pattern,
                    replacement,
                },
                Formatter::Replace {
                    pattern: other_pattern,
                    replacement: other_replacement,
                },
            ) => pattern.as_str() == other_pattern.as_str() && replacement == other_replacement,
            _ => false,
        }
    }
}

/// Run a value through a formatter pipeline
pub fn apply_pipeline(formatters: &[Formatter], value: &str, state: &RenamerState) -> String {
    formatters
        .iter()
        .fold(value.to_string(), |acc, f| f.format(&acc, state))
}

fn pad(value: &str, pad_char: char, length: usize) -> String {
    let current = value.chars().count();
    if current >= length {
        return value.to_string();
    }

    let mut padded: String = std::iter::repeat(pad_char).take(length - current).collect();
    padded.push_str(value);
    padded
}

fn slice(value: &str, start: Option<usize>, end: Option<usize>) -> String {
    let len = value.chars().count();
    let start = start.unwrap_or(0);
    let end = match end {
        Some(e) if e > 0 && e < len => e,
        _ => len,
    };

    if start >= end {
        return String::new();
    }

    value.chars().skip(start).take(end - start).collect()
}
