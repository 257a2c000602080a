//! Named extraction rules and the variables they produce for each file.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

use crate::formatter::RenamerState;

/// Variable name (with `$`) to value, for a single file
pub type VariableMap = HashMap<String, String>;

/// Built-in variables computed from the batch position and file name
pub const RESERVED_NAMES: [&str; 3] = ["$cnt", "$ext", "$fname"];

static PROPERTY_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N}]+$").unwrap());

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertyError {
    #[error("Invalid property definition {0}. Property definitions must contain a name and a matcher: name=regex")]
    InvalidSyntax(String),

    #[error("Invalid property name '{0}': names may only contain letters and digits")]
    InvalidName(String),

    #[error("The property name {0} is reserved")]
    ReservedName(String),

    #[error("Invalid matcher for property {name}: {message}")]
    InvalidRegex { name: String, message: String },
}

/// A user-declared extraction rule, immutable once built
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub pattern: Regex,
}

impl Property {
    pub fn new(name: &str, pattern: &str) -> Result<Self, PropertyError> {
        if !PROPERTY_NAME_REGEX.is_match(name) {
            return Err(PropertyError::InvalidName(name.to_string()));
        }

        let variable = format!("${}", name);
        if is_reserved_name(&variable) {
            return Err(PropertyError::ReservedName(name.to_string()));
        }

        let pattern = Regex::new(pattern).map_err(|e| PropertyError::InvalidRegex {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            name: name.to_string(),
            pattern,
        })
    }

    /// Name as referenced from a template, i.e. with the `$` sigil
    pub fn variable(&self) -> String {
        format!("${}", self.name)
    }
}

/// Parse a `name=regex` declaration. Only the first `=` separates name from
/// pattern, so patterns may contain `=` themselves.
pub fn parse_property(declaration: &str) -> Result<Property, PropertyError> {
    let (name, pattern) = declaration
        .split_once('=')
        .ok_or_else(|| PropertyError::InvalidSyntax(declaration.to_string()))?;

    if pattern.is_empty() {
        return Err(PropertyError::InvalidSyntax(declaration.to_string()));
    }

    Property::new(name, pattern)
}

pub fn is_reserved_name(variable: &str) -> bool {
    RESERVED_NAMES.contains(&variable)
}

/// Values of the intrinsic variables for the given file
pub fn intrinsic_values(state: &RenamerState) -> [(&'static str, String); 3] {
    [
        ("$cnt", (state.index + 1).to_string()),
        ("$ext", state.extension.clone()),
        ("$fname", state.stem().to_string()),
    ]
}

/// Run every property against a file name.
///
/// When the pattern has capture groups the last group of the leftmost match is
/// used, otherwise the whole leftmost match. A property that does not match is
/// bound to an empty string.
pub fn extract_values(file_name: &str, properties: &[Property]) -> VariableMap {
    let mut values = VariableMap::with_capacity(properties.len() + RESERVED_NAMES.len());

    for prop in properties {
        let mut matches = prop.pattern.captures_iter(file_name);

        let value = match matches.next() {
            Some(captures) => {
                if matches.next().is_some() {
                    info!(
                        property = %prop.name,
                        file = %file_name,
                        "Matcher {} matches multiple parts, only the leftmost is used",
                        prop.pattern.as_str()
                    );
                }
                let group = captures.len() - 1;
                captures
                    .get(group)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            }
            None => {
                info!(
                    property = %prop.name,
                    file = %file_name,
                    "Matcher {} does not match",
                    prop.pattern.as_str()
                );
                String::new()
            }
        };

        debug!(property = %prop.name, value = %value, "Extracted value");
        values.insert(prop.variable(), value);
    }

    values
}

/// Extract user properties and merge the intrinsic variables over them
pub fn build_variables(state: &RenamerState, properties: &[Property]) -> VariableMap {
    let mut values = extract_values(&state.file_name, properties);
    for (name, value) in intrinsic_values(state) {
        values.insert(name.to_string(), value);
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLE_GROUP: &str = r"\ \-\ ([A-Za-z0-9\ ]+)\ \-";

    #[test]
    fn test_parse_property() {
        let prop = parse_property(r"title=\ \- ([A-Za-z0-9\ ]+)\ \-").unwrap();
        assert_eq!(prop.name, "title");
        assert_eq!(prop.pattern.as_str(), r"\ \- ([A-Za-z0-9\ ]+)\ \-");
        assert_eq!(prop.variable(), "$title");
    }

    #[test]
    fn test_parse_property_pattern_with_equals() {
        let prop = parse_property("tag=key=(\\w+)").unwrap();
        assert_eq!(prop.name, "tag");
        assert_eq!(prop.pattern.as_str(), "key=(\\w+)");
    }

    #[test]
    fn test_parse_property_missing_separator() {
        let result = parse_property("title");
        assert!(matches!(result, Err(PropertyError::InvalidSyntax(_))));
    }

    #[test]
    fn test_parse_property_empty_pattern() {
        let result = parse_property("title=");
        assert!(matches!(result, Err(PropertyError::InvalidSyntax(_))));
    }

    #[test]
    fn test_parse_property_invalid_name() {
        assert!(matches!(
            parse_property("$title=abc"),
            Err(PropertyError::InvalidName(_))
        ));
        assert!(matches!(
            parse_property("=abc"),
            Err(PropertyError::InvalidName(_))
        ));
    }

    #[test]
    fn test_parse_property_reserved() {
        for name in ["cnt", "ext", "fname"] {
            let result = parse_property(&format!("{}=abc", name));
            assert!(matches!(result, Err(PropertyError::ReservedName(_))));
        }
    }

    #[test]
    fn test_parse_property_invalid_regex() {
        let result = parse_property("title=(unclosed");
        assert!(matches!(result, Err(PropertyError::InvalidRegex { .. })));
    }

    #[test]
    fn test_extract_group() {
        let prop = Property::new("title", TITLE_GROUP).unwrap();
        let values = extract_values("wedding - chapel first - video01", &[prop]);
        assert_eq!(values["$title"], "chapel first");
    }

    #[test]
    fn test_extract_whole_match() {
        let prop = Property::new("title", r"\ \-\ [A-Za-z0-9\ ]+\ \-").unwrap();
        let values = extract_values("wedding - chapel first - video01", &[prop]);
        assert_eq!(values["$title"], " - chapel first -");
    }

    #[test]
    fn test_extract_last_group() {
        let prop = Property::new("episode", r"(S\d+)E(\d+)").unwrap();
        let values = extract_values("show.S01E07.mkv", &[prop]);
        assert_eq!(values["$episode"], "07");
    }

    #[test]
    fn test_extract_no_match_binds_empty() {
        let prop = Property::new("title", TITLE_GROUP).unwrap();
        let values = extract_values("wedding_chapel first - video01", &[prop]);
        assert_eq!(values.get("$title").map(String::as_str), Some(""));
    }

    #[test]
    fn test_extract_leftmost_of_many() {
        let prop = Property::new("num", r"\d+").unwrap();
        let values = extract_values("a12b34c56", &[prop]);
        assert_eq!(values["$num"], "12");
    }

    #[test]
    fn test_extract_unmatched_optional_group() {
        let prop = Property::new("part", r"video(\d+)?").unwrap();
        let values = extract_values("video.mkv", &[prop]);
        assert_eq!(values["$part"], "");
    }

    #[test]
    fn test_intrinsic_values() {
        let state = RenamerState::new(4, "Wedding - Home.mkv");
        let values = build_variables(&state, &[]);
        assert_eq!(values["$cnt"], "5");
        assert_eq!(values["$ext"], ".mkv");
        assert_eq!(values["$fname"], "Wedding - Home");
    }

    #[test]
    fn test_is_reserved_name() {
        assert!(is_reserved_name("$cnt"));
        assert!(is_reserved_name("$fname"));
        assert!(!is_reserved_name("cnt"));
        assert!(!is_reserved_name("$title"));
    }
}
