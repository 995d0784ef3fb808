//! Escaping for `{{name}}` substitutions.
//!
//! Quote and ampersand characters are replaced by angle-bracket tokens so that
//! substituted text cannot terminate a string literal in the surrounding
//! statement. `<` and `>` are passed through unchanged: the replacement tokens
//! themselves use angle brackets and must never be escaped a second time.

use std::borrow::Cow;

/// Replacement for `"`.
pub const DQUOTE: &str = "<DQUOTE>";
/// Replacement for `'`.
pub const SQUOTE: &str = "<SQUOTE>";
/// Replacement for `&`.
pub const AMP: &str = "<AMP>";

/// Escapes a formatted value for an escaped substitution.
///
/// Single left-to-right pass; returns the input unchanged (borrowed) when it
/// contains nothing to escape.
///
/// # Examples
///
/// ```
/// use stmt_rs_template::escape::escape_statement;
///
/// assert_eq!(escape_statement(r#"a "b" & 'c' <d>"#), "a <DQUOTE>b<DQUOTE> <AMP> <SQUOTE>c<SQUOTE> <d>");
/// ```
pub fn escape_statement(s: &str) -> Cow<'_, str> {
    let Some(first) = s.find(['"', '\'', '&']) else {
        return Cow::Borrowed(s);
    };

    let mut out = String::with_capacity(s.len() + 16);
    out.push_str(&s[..first]);
    for ch in s[first..].chars() {
        match ch {
            '"' => out.push_str(DQUOTE),
            '\'' => out.push_str(SQUOTE),
            '&' => out.push_str(AMP),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
