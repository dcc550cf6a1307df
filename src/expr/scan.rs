//! Lexical gate in front of the expression parser.
//!
//! Every character, identifier and call in the source is checked against the
//! allow-list before the text reaches meval. Anything that is not plain
//! arithmetic over the two declared variables is rejected here with the
//! offending fragment.

use super::ParseError;
use super::allow_list::{CONSTANTS, function_names, is_constant, is_function};
use crate::suggest::closest_name;

/// Longest fragment quoted back in an error message.
const FRAGMENT_LEN: usize = 24;

/// Normalized source text plus, for every byte of it, the byte offset in the
/// user's input it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Normalized {
    pub(super) text: String,
    origins: Vec<usize>,
    input_len: usize,
}

impl Normalized {
    /// Maps a byte offset in `text` back to the user's input.
    pub(super) fn origin(&self, offset: usize) -> usize {
        self.origins.get(offset).copied().unwrap_or(self.input_len)
    }

    fn push(&mut self, ch: char, origin: usize) {
        self.text.push(ch);
        self.origins.extend(std::iter::repeat_n(origin, ch.len_utf8()));
    }
}

/// Trims the source and rewrites accepted aliases: `**` for `^`, `π` for
/// `pi` and a leading-dot literal such as `.5` for `0.5`.
pub(super) fn normalize(source: &str) -> Normalized {
    let start = source.len() - source.trim_start().len();
    let trimmed = source.trim();
    let mut out = Normalized {
        text: String::with_capacity(trimmed.len()),
        origins: Vec::with_capacity(trimmed.len()),
        input_len: source.len(),
    };

    let mut chars = trimmed.char_indices().peekable();
    let mut previous: Option<char> = None;
    while let Some((offset, ch)) = chars.next() {
        let origin = start + offset;
        let next = chars.peek().map(|(_, next)| *next);
        match ch {
            '*' if next == Some('*') => {
                chars.next();
                out.push('^', origin);
            }
            'π' => {
                out.push('p', origin);
                out.push('i', origin);
            }
            '.' if next.is_some_and(|c| c.is_ascii_digit()) && !previous.is_some_and(is_word_char) => {
                out.push('0', origin);
                out.push('.', origin);
            }
            _ => out.push(ch, origin),
        }
        previous = Some(ch);
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[derive(Debug)]
struct OpenParen {
    offset: usize,
    function: Option<String>,
    commas: usize,
    has_content: bool,
}

/// Validates normalized source for variables `first` and `second`. Reported
/// offsets refer to the user's input.
pub(super) fn validate(
    normalized: &Normalized,
    first: &str,
    second: &str,
    max_depth: usize,
) -> Result<(), ParseError> {
    let source = normalized.text.as_str();
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let mut open: Vec<OpenParen> = Vec::new();
    let mut pending_call: Option<String> = None;
    let mut index = 0;

    while index < chars.len() {
        let (offset, ch) = chars[index];

        if ch.is_whitespace() {
            index += 1;
            continue;
        }

        if ch != ')' {
            if let Some(top) = open.last_mut() {
                top.has_content = true;
            }
        }

        match ch {
            c if c.is_ascii_digit() => {
                index = scan_number(&chars, index);
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut end = index;
                while end < chars.len() && (chars[end].1.is_ascii_alphanumeric() || chars[end].1 == '_') {
                    end += 1;
                }
                let end_offset = chars.get(end).map_or(source.len(), |(o, _)| *o);
                let name = &source[offset..end_offset];

                if next_non_whitespace(&chars, end) == Some('(') {
                    if !is_function(name) {
                        return Err(ParseError::UnknownFunction {
                            name: name.to_owned(),
                            suggestion: closest_name(name, function_names()).map(str::to_owned),
                        });
                    }
                    pending_call = Some(name.to_owned());
                } else if name != first && name != second && !is_constant(name) {
                    if is_function(name) {
                        return Err(ParseError::MissingCall {
                            name: name.to_owned(),
                        });
                    }
                    let known = [first, second]
                        .into_iter()
                        .chain(CONSTANTS.iter().map(|(constant, _)| *constant));
                    return Err(ParseError::UnknownIdentifier {
                        name: name.to_owned(),
                        suggestion: closest_name(name, known).map(str::to_owned),
                    });
                }
                index = end;
            }
            '(' => {
                if open.len() >= max_depth {
                    return Err(ParseError::TooDeep {
                        limit: max_depth,
                        fragment: fragment_at(source, offset),
                    });
                }
                open.push(OpenParen {
                    offset,
                    function: pending_call.take(),
                    commas: 0,
                    has_content: false,
                });
                index += 1;
            }
            ')' => {
                let Some(paren) = open.pop() else {
                    return Err(ParseError::Syntax {
                        fragment: fragment_at(source, offset),
                        reason: "unmatched closing parenthesis".to_owned(),
                    });
                };
                if let Some(name) = paren.function {
                    let found = if paren.has_content { paren.commas + 1 } else { 0 };
                    if found != 1 {
                        return Err(ParseError::Arity { name, found });
                    }
                } else if !paren.has_content {
                    return Err(ParseError::Syntax {
                        fragment: fragment_at(source, paren.offset),
                        reason: "empty parentheses".to_owned(),
                    });
                }
                index += 1;
            }
            ',' => {
                match open.last_mut() {
                    Some(paren) if paren.function.is_some() => paren.commas += 1,
                    _ => {
                        return Err(ParseError::Syntax {
                            fragment: fragment_at(source, offset),
                            reason: "comma outside a function call".to_owned(),
                        });
                    }
                }
                index += 1;
            }
            '+' | '-' | '*' | '/' | '^' => {
                index += 1;
            }
            other => {
                return Err(ParseError::DisallowedCharacter {
                    fragment: other.to_string(),
                    offset: normalized.origin(offset),
                });
            }
        }
    }

    if let Some(paren) = open.last() {
        return Err(ParseError::Syntax {
            fragment: fragment_at(source, paren.offset),
            reason: "unclosed parenthesis".to_owned(),
        });
    }

    Ok(())
}

/// Consumes a numeric literal (`12`, `0.5`, `3.`, `1e-3`) starting at `index`.
fn scan_number(chars: &[(usize, char)], mut index: usize) -> usize {
    while index < chars.len() && chars[index].1.is_ascii_digit() {
        index += 1;
    }
    if index < chars.len() && chars[index].1 == '.' {
        index += 1;
        while index < chars.len() && chars[index].1.is_ascii_digit() {
            index += 1;
        }
    }
    if index < chars.len() && matches!(chars[index].1, 'e' | 'E') {
        let mut exponent = index + 1;
        if exponent < chars.len() && matches!(chars[exponent].1, '+' | '-') {
            exponent += 1;
        }
        if exponent < chars.len() && chars[exponent].1.is_ascii_digit() {
            index = exponent;
            while index < chars.len() && chars[index].1.is_ascii_digit() {
                index += 1;
            }
        }
    }
    index
}

fn next_non_whitespace(chars: &[(usize, char)], index: usize) -> Option<char> {
    chars[index..]
        .iter()
        .map(|(_, c)| *c)
        .find(|c| !c.is_whitespace())
}

pub(super) fn fragment_at(source: &str, offset: usize) -> String {
    source
        .get(offset..)
        .unwrap_or_default()
        .chars()
        .take(FRAGMENT_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> Result<(), ParseError> {
        validate(&normalize(source), "u", "v", 8)
    }

    #[test]
    fn normalizes_python_power_and_pi_symbol() {
        assert_eq!(normalize("  x**2 + π ").text, "x^2 + pi");
    }

    #[test]
    fn expands_leading_dot_literals() {
        assert_eq!(normalize(".5 - (.25*u)").text, "0.5 - (0.25*u)");
        assert_eq!(normalize("1.5 + 3.").text, "1.5 + 3.");
        assert_eq!(normalize("u.5").text, "u.5");
    }

    #[test]
    fn offsets_point_into_the_input() {
        let err = check("  u;v").unwrap_err();
        assert!(matches!(err, ParseError::DisallowedCharacter { offset: 3, .. }));

        let err = check("u**2 + π + .5 ; v").unwrap_err();
        assert!(matches!(err, ParseError::DisallowedCharacter { offset: 15, .. }));
    }

    #[test]
    fn rejects_dot_after_identifier() {
        let err = check("u.5").unwrap_err();
        assert!(matches!(err, ParseError::DisallowedCharacter { offset: 1, .. }));
    }

    #[test]
    fn accepts_plain_arithmetic() {
        check("(1 + 0.5*cos(v))*cos(u)").expect("valid");
        check("-u^2 + 1e-3*v - .5").expect("valid");
        check("sqrt(abs(sin(u) * e)) / pi").expect("valid");
    }

    #[test]
    fn rejects_attribute_access() {
        let err = check("u.real").unwrap_err();
        assert!(matches!(err, ParseError::DisallowedCharacter { ref fragment, offset: 1 } if fragment == "."));
    }

    #[test]
    fn rejects_multi_argument_calls() {
        let err = check("atan(u, v)").unwrap_err();
        assert!(matches!(err, ParseError::Arity { ref name, found: 2 } if name == "atan"));

        let err = check("sin()").unwrap_err();
        assert!(matches!(err, ParseError::Arity { found: 0, .. }));
    }

    #[test]
    fn rejects_bare_function_name() {
        let err = check("sin + 1").unwrap_err();
        assert!(matches!(err, ParseError::MissingCall { ref name } if name == "sin"));
    }

    #[test]
    fn reports_unbalanced_parentheses() {
        assert!(matches!(check("(u + v"), Err(ParseError::Syntax { .. })));
        assert!(matches!(check("u + v)"), Err(ParseError::Syntax { .. })));
        assert!(matches!(check("u, v"), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn enforces_nesting_limit() {
        let deep = format!("{}u{}", "(".repeat(9), ")".repeat(9));
        assert!(matches!(check(&deep), Err(ParseError::TooDeep { limit: 8, .. })));

        let shallow = format!("{}u{}", "(".repeat(8), ")".repeat(8));
        check(&shallow).expect("within limit");
    }
}
