mod types;

pub use types::*;

use tracing::trace;

use crate::formatter::Formatter;
use crate::property::is_reserved_name;

/// Longest padding a formatter may request, the usual file name length limit
pub const MAX_PADDING_LENGTH: usize = 255;

/// Parse an output template such as `fileName [divx] - episode $cnt[%03]$ext`
/// into a stream of literal and property tokens.
///
/// An empty template yields an empty stream.
pub fn parse_template(template: &str) -> Result<Vec<Token>, TemplateError> {
    TemplateParser::new(template).parse()
}

/// Count property references, separating user-declared ones from intrinsics
pub fn template_stats(tokens: &[Token]) -> TemplateStats {
    tokens
        .iter()
        .filter(|t| t.is_property())
        .fold(TemplateStats::default(), |mut stats, t| {
            stats.properties += 1;
            if !is_reserved_name(&t.value) {
                stats.custom_properties += 1;
            }
            stats
        })
}

struct TemplateParser {
    chars: Vec<char>,
    pos: usize,
}

impl TemplateParser {
    fn new(template: &str) -> Self {
        Self {
            chars: template.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn take_digits(&mut self) -> String {
        let mut digits = String::new();
        while let Some(c) = self.peek().filter(char::is_ascii_digit) {
            digits.push(c);
            self.pos += 1;
        }
        digits
    }

    fn parse(mut self) -> Result<Vec<Token>, TemplateError> {
        let mut tokens = Vec::new();
        while let Some(c) = self.peek() {
            let token = if c == '$' {
                self.parse_property()?
            } else {
                self.parse_literal()
            };
            trace!(kind = ?token.kind, value = %token.value, "Parsed token");
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn parse_literal(&mut self) -> Token {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c == '$' {
                break;
            }
            self.pos += 1;
            if c == '\\' {
                // A trailing backslash has nothing to escape and stays as is
                value.push(self.next_char().unwrap_or('\\'));
            } else {
                value.push(c);
            }
        }
        Token::literal(value)
    }

    fn parse_property(&mut self) -> Result<Token, TemplateError> {
        let mut name = String::new();
        if let Some(sigil) = self.next_char() {
            name.push(sigil);
        }
        while let Some(c) = self.peek().filter(|c| c.is_alphanumeric()) {
            name.push(c);
            self.pos += 1;
        }

        let formatters = if self.peek() == Some('[') {
            self.parse_formatters()?
        } else {
            Vec::new()
        };

        Ok(Token::property(name, formatters))
    }

    fn parse_formatters(&mut self) -> Result<Vec<Formatter>, TemplateError> {
        let open = self.pos;
        self.pos += 1;

        if self.peek() == Some(']') {
            return Err(TemplateError::EmptyFormatterList { position: open });
        }

        let mut formatters = Vec::new();
        loop {
            let formatter = self.parse_formatter(open)?;
            trace!(kind = formatter.kind(), position = self.pos, "Parsed formatter");
            formatters.push(formatter);
            match self.next_char() {
                Some(',') => continue,
                Some(']') => break,
                Some(found) => {
                    return Err(TemplateError::UnexpectedCharacter {
                        found,
                        position: self.pos - 1,
                    })
                }
                None => return Err(TemplateError::UnterminatedFormatter { position: open }),
            }
        }
        Ok(formatters)
    }

    fn parse_formatter(&mut self, open: usize) -> Result<Formatter, TemplateError> {
        let position = self.pos;
        match self.next_char() {
            Some('%') => self.parse_padding(position),
            Some('>') => self.parse_slice(position),
            Some('/') => self.parse_replace(position),
            Some(kind) => Err(TemplateError::UnknownFormatter { kind, position }),
            None => Err(TemplateError::UnterminatedFormatter { position: open }),
        }
    }

    fn parse_padding(&mut self, position: usize) -> Result<Formatter, TemplateError> {
        let pad_char = self.next_char().ok_or_else(|| TemplateError::InvalidPadding {
            position,
            reason: "missing padding character".to_string(),
        })?;

        let digits = self.take_digits();
        if digits.is_empty() {
            return Err(TemplateError::InvalidPadding {
                position,
                reason: "missing target length".to_string(),
            });
        }

        let length: usize = digits.parse().map_err(|e| TemplateError::InvalidPadding {
            position,
            reason: format!("invalid length {}: {}", digits, e),
        })?;
        if length > MAX_PADDING_LENGTH {
            return Err(TemplateError::InvalidPadding {
                position,
                reason: format!(
                    "length {} exceeds the maximum of {}",
                    length, MAX_PADDING_LENGTH
                ),
            });
        }

        Ok(Formatter::padding(pad_char, length))
    }

    fn parse_slice(&mut self, position: usize) -> Result<Formatter, TemplateError> {
        let start = self.parse_slice_bound(position)?;
        if self.next_char() != Some(':') {
            return Err(TemplateError::InvalidSlice {
                position,
                reason: "expected ':' between start and end".to_string(),
            });
        }
        let end = self.parse_slice_bound(position)?;

        Ok(Formatter::slice(start, end))
    }

    fn parse_slice_bound(&mut self, position: usize) -> Result<Option<usize>, TemplateError> {
        let digits = self.take_digits();
        if digits.is_empty() {
            return Ok(None);
        }
        digits
            .parse()
            .map(Some)
            .map_err(|e| TemplateError::InvalidSlice {
                position,
                reason: format!("invalid bound {}: {}", digits, e),
            })
    }

    fn parse_replace(&mut self, position: usize) -> Result<Formatter, TemplateError> {
        let find = self.read_delimited(position)?;
        let replacement = self.read_delimited(position)?;

        Formatter::replace(&find, &replacement).map_err(|e| TemplateError::InvalidRegex {
            pattern: find.clone(),
            message: e.to_string(),
        })
    }

    /// Read up to the next unescaped `/`. `\/` yields a literal slash; any other
    /// backslash is kept so regex escapes such as `\.` survive.
    fn read_delimited(&mut self, position: usize) -> Result<String, TemplateError> {
        let mut value = String::new();
        loop {
            match self.next_char() {
                Some('/') => return Ok(value),
                Some('\\') if self.peek() == Some('/') => {
                    self.pos += 1;
                    value.push('/');
                }
                Some(c) => value.push(c),
                None => return Err(TemplateError::UnterminatedReplace { position }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: &str) -> Token {
        Token::literal(value)
    }

    fn prop(name: &str) -> Token {
        Token::property(name, Vec::new())
    }

    #[test]
    fn test_empty_template() {
        assert!(parse_template("").unwrap().is_empty());
    }

    #[test]
    fn test_single_literal() {
        let tokens = parse_template("one literal string").unwrap();
        assert_eq!(tokens, vec![literal("one literal string")]);
    }

    #[test]
    fn test_literal_and_property() {
        let tokens = parse_template("literal-$second").unwrap();
        assert_eq!(tokens, vec![literal("literal-"), prop("$second")]);
    }

    #[test]
    fn test_property_with_padding() {
        let tokens = parse_template("literal_$cnt[%03] - ext.mkv").unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0], literal("literal_"));
        assert_eq!(
            tokens[1],
            Token::property("$cnt", vec![Formatter::padding('0', 3)])
        );
        assert_eq!(tokens[2], literal(" - ext.mkv"));
    }

    #[test]
    fn test_brackets_in_literal() {
        let tokens = parse_template("fileName [divx] - episode $cnt[%03].$ext").unwrap();

        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0], literal("fileName [divx] - episode "));
        assert_eq!(tokens[1].value, "$cnt");
        assert_eq!(tokens[2], literal("."));
        assert_eq!(tokens[3], prop("$ext"));
    }

    #[test]
    fn test_escaped_bracket_after_property() {
        let tokens = parse_template(r"t - $title\[2020]").unwrap();
        assert_eq!(
            tokens,
            vec![literal("t - "), prop("$title"), literal("[2020]")]
        );
    }

    #[test]
    fn test_escaped_dollar() {
        let tokens = parse_template(r"price \$5 - $title").unwrap();
        assert_eq!(tokens, vec![literal("price $5 - "), prop("$title")]);
    }

    #[test]
    fn test_escaped_backslash_and_trailing_backslash() {
        let tokens = parse_template(r"a\\b\").unwrap();
        assert_eq!(tokens, vec![literal(r"a\b\")]);
    }

    #[test]
    fn test_utf8_literal() {
        let tokens = parse_template("Title ½ - $cnt").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], literal("Title ½ - "));
    }

    #[test]
    fn test_unicode_property_name() {
        let tokens = parse_template("$título.mkv").unwrap();
        assert_eq!(tokens, vec![prop("$título"), literal(".mkv")]);
    }

    #[test]
    fn test_adjacent_properties() {
        let tokens = parse_template("$fname$ext").unwrap();
        assert_eq!(tokens, vec![prop("$fname"), prop("$ext")]);
    }

    #[test]
    fn test_slice_parser() {
        let tokens = parse_template("$title[>:10]").unwrap();
        assert_eq!(tokens[0].formatters, vec![Formatter::slice(None, Some(10))]);

        let tokens = parse_template("$title[>3:]").unwrap();
        assert_eq!(tokens[0].formatters, vec![Formatter::slice(Some(3), None)]);

        let tokens = parse_template("$title[>3:10]").unwrap();
        assert_eq!(
            tokens[0].formatters,
            vec![Formatter::slice(Some(3), Some(10))]
        );
    }

    #[test]
    fn test_replace_parser() {
        let tokens = parse_template(r"$title[/\./ /]").unwrap();
        assert_eq!(
            tokens[0].formatters,
            vec![Formatter::replace(r"\.", " ").unwrap()]
        );
    }

    #[test]
    fn test_replace_escaped_delimiter() {
        let tokens = parse_template(r"$title[/a\/b/c\/d/]").unwrap();
        assert_eq!(
            tokens[0].formatters,
            vec![Formatter::replace("a/b", "c/d").unwrap()]
        );
    }

    #[test]
    fn test_multiple_formatters() {
        let tokens = parse_template(r"test - $title[/\./ /,>:8].avi").unwrap();

        assert_eq!(tokens.len(), 3);
        assert_eq!(
            tokens[1].formatters,
            vec![
                Formatter::replace(r"\.", " ").unwrap(),
                Formatter::slice(None, Some(8)),
            ]
        );
        assert_eq!(tokens[2], literal(".avi"));
    }

    #[test]
    fn test_unknown_formatter() {
        let err = parse_template("$cnt[+10]").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownFormatter {
                kind: '+',
                position: 5
            }
        );
        assert!(err.to_string().starts_with("Unknown formatter type +"));
    }

    #[test]
    fn test_invalid_regex() {
        let err = parse_template("$title[/(oops/x/]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidRegex { .. }));
    }

    #[test]
    fn test_padding_without_length() {
        let err = parse_template("$cnt[%0]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPadding { .. }));
    }

    #[test]
    fn test_padding_length_is_capped() {
        let tokens = parse_template("$cnt[%0255]").unwrap();
        assert_eq!(tokens[0].formatters, vec![Formatter::padding('0', 255)]);

        let err = parse_template("$cnt[%0256]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPadding { .. }));

        let err = parse_template("$cnt[%0999999999999]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPadding { position: 5, .. }));

        // overflows usize
        let err = parse_template("$cnt[%099999999999999999999999]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidPadding { .. }));
    }

    #[test]
    fn test_slice_without_colon() {
        let err = parse_template("$title[>3]").unwrap_err();
        assert!(matches!(err, TemplateError::InvalidSlice { .. }));
    }

    #[test]
    fn test_unterminated_formatter() {
        let err = parse_template("$cnt[%03").unwrap_err();
        assert_eq!(err, TemplateError::UnterminatedFormatter { position: 4 });
    }

    #[test]
    fn test_unterminated_replace() {
        let err = parse_template("$title[/a/b").unwrap_err();
        assert!(matches!(err, TemplateError::UnterminatedReplace { .. }));
    }

    #[test]
    fn test_empty_formatter_list() {
        let err = parse_template("$title[]").unwrap_err();
        assert_eq!(err, TemplateError::EmptyFormatterList { position: 6 });
    }

    #[test]
    fn test_garbage_after_formatter() {
        let err = parse_template("$cnt[%03x]").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnexpectedCharacter {
                found: 'x',
                position: 8
            }
        );
    }

    #[test]
    fn test_template_stats() {
        let tokens = parse_template("$title - $cnt[%02] - $episode$ext").unwrap();
        let stats = template_stats(&tokens);
        assert_eq!(stats.properties, 4);
        assert_eq!(stats.custom_properties, 2);
    }
}
