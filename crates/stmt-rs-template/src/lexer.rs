//! Template lexer (tokenizer).
//!
//! Converts raw statement text into a stream of [`Token`]s: literal text,
//! variable references (`{{name}}`, `{{{name}}}`), and section open/close tags
//! (`{{#name}}`, `{{^name}}`, `{{/name}}`). Section nesting is checked by the
//! [`parser`](crate::parser), not here.

use once_cell::sync::Lazy;
use regex::Regex;

use stmt_rs_core::error::SyntaxError;

/// Valid bind names: a letter or underscore followed by letters, digits,
/// `_`, `.`, `:` or `-`.
static BIND_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.:\-]*$").expect("valid regex"));

const OPEN: &str = "{{";
const CLOSE: &str = "}}";
const RAW_OPEN: &str = "{{{";
const RAW_CLOSE: &str = "}}}";

/// A token produced by the template lexer.
///
/// Tag tokens carry the byte offset of their opening delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A literal text segment.
    Text(String),
    /// A variable reference. `escaped` is false for triple-brace tags.
    Variable {
        /// The bind name.
        name: String,
        /// Whether the substitution is escaped.
        escaped: bool,
        /// Byte offset of the tag.
        offset: usize,
    },
    /// `{{#name}}` or, when `inverted`, `{{^name}}`.
    SectionOpen {
        /// The bind name.
        name: String,
        /// Whether this is an inverted section.
        inverted: bool,
        /// Byte offset of the tag.
        offset: usize,
    },
    /// `{{/name}}`.
    SectionClose {
        /// The bind name.
        name: String,
        /// Byte offset of the tag.
        offset: usize,
    },
}

/// Tokenizes statement template source into a sequence of [`Token`]s.
///
/// Text containing no `{{` is literal, including stray `}}`. Whitespace just
/// inside the delimiters is ignored.
///
/// # Errors
///
/// Returns a [`SyntaxError`] for an unterminated tag, a partial directive, or
/// tag content that is not a recognised form.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(found) = source[pos..].find(OPEN) {
        let offset = pos + found;
        if offset > pos {
            tokens.push(Token::Text(source[pos..offset].to_string()));
        }

        let rest = &source[offset..];
        let (token, consumed) = if rest.starts_with(RAW_OPEN) {
            lex_raw_variable(rest, offset)?
        } else {
            lex_tag(rest, offset)?
        };
        tokens.push(token);
        pos = offset + consumed;
    }

    if pos < source.len() {
        tokens.push(Token::Text(source[pos..].to_string()));
    }

    Ok(tokens)
}

/// Lexes `{{{name}}}`. Returns the token and the number of bytes consumed.
fn lex_raw_variable(rest: &str, offset: usize) -> Result<(Token, usize), SyntaxError> {
    let inner_start = RAW_OPEN.len();
    let end = rest[inner_start..]
        .find(RAW_CLOSE)
        .ok_or(SyntaxError::UnclosedTag {
            expected: RAW_CLOSE,
            offset,
        })?;
    let content = &rest[inner_start..inner_start + end];
    let name = bind_name(content, content, offset)?;

    Ok((
        Token::Variable {
            name,
            escaped: false,
            offset,
        },
        inner_start + end + RAW_CLOSE.len(),
    ))
}

/// Lexes any double-brace tag. Returns the token and the number of bytes consumed.
fn lex_tag(rest: &str, offset: usize) -> Result<(Token, usize), SyntaxError> {
    let inner_start = OPEN.len();
    let end = rest[inner_start..]
        .find(CLOSE)
        .ok_or(SyntaxError::UnclosedTag {
            expected: CLOSE,
            offset,
        })?;
    let content = &rest[inner_start..inner_start + end];
    let consumed = inner_start + end + CLOSE.len();

    let trimmed = content.trim();
    let mut chars = trimmed.chars();
    let token = match chars.next() {
        Some('#') => Token::SectionOpen {
            name: bind_name(chars.as_str(), content, offset)?,
            inverted: false,
            offset,
        },
        Some('^') => Token::SectionOpen {
            name: bind_name(chars.as_str(), content, offset)?,
            inverted: true,
            offset,
        },
        Some('/') => Token::SectionClose {
            name: bind_name(chars.as_str(), content, offset)?,
            offset,
        },
        Some('>') => {
            return Err(SyntaxError::PartialNotSupported {
                name: chars.as_str().trim().to_string(),
                offset,
            })
        }
        _ => Token::Variable {
            name: bind_name(trimmed, content, offset)?,
            escaped: true,
            offset,
        },
    };

    Ok((token, consumed))
}

/// Validates a bind name, reporting the whole tag content on failure.
fn bind_name(candidate: &str, content: &str, offset: usize) -> Result<String, SyntaxError> {
    let name = candidate.trim();
    if BIND_NAME.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(SyntaxError::InvalidTag {
            content: content.to_string(),
            offset,
        })
    }
}
