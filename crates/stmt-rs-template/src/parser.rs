//! Template parser.
//!
//! Converts a stream of lexer [`Token`]s into a [`Template`] tree. Sections
//! are matched with a stack of open tags in a single left-to-right pass; the
//! first structural violation aborts the parse.

use std::fmt;

use stmt_rs_core::error::SyntaxError;

use crate::lexer::{self, Token};

/// A node in the parsed template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Verbatim passthrough text.
    Literal(String),
    /// A substitution point.
    Variable {
        /// The bind name.
        name: String,
        /// `true` for `{{name}}`, `false` for `{{{name}}}`.
        escaped: bool,
    },
    /// A conditionally rendered region.
    Section {
        /// The bind whose truthiness gates the body.
        name: String,
        /// `true` for `{{^name}}`: render when the bind is falsy.
        inverted: bool,
        /// The nested template.
        body: Template,
    },
}

/// A parsed statement template.
///
/// Immutable once built and free of interior state, so a single template can
/// be rendered any number of times, from any number of threads.
///
/// # Examples
///
/// ```
/// use stmt_rs_template::parser::Template;
///
/// let template = Template::parse("WHERE 1=1 {{#id}}AND id = {{id}}{{/id}}").unwrap();
/// assert_eq!(template.nodes().len(), 2);
/// assert!(Template::parse("{{#id}} never closed").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    /// Parses raw template text.
    ///
    /// # Errors
    ///
    /// Returns the first [`SyntaxError`] encountered. No partially parsed
    /// template is ever returned.
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let result = lexer::tokenize(source).and_then(|tokens| parse(&tokens));
        if let Err(ref e) = result {
            tracing::debug!(error = %e, "template rejected");
        }
        result
    }

    /// Builds a template directly from nodes.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// The top-level nodes, in order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns `true` if the template contains no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if the template contains no tags at all.
    pub fn is_literal(&self) -> bool {
        self.nodes.iter().all(|n| matches!(n, Node::Literal(_)))
    }

    /// Lists the distinct bind names referenced anywhere in the template, in
    /// order of first occurrence.
    pub fn bind_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names(&self.nodes, &mut names);
        names
    }

    /// Re-serializes the tree as template source.
    ///
    /// Tags are written in their canonical compact form (`{{name}}`,
    /// `{{#name}}`), so whitespace inside the original tags is not preserved.
    /// Parsing the result yields an equal template.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

fn collect_names<'a>(nodes: &'a [Node], names: &mut Vec<&'a str>) {
    for node in nodes {
        match node {
            Node::Literal(_) => {}
            Node::Variable { name, .. } => push_unique(names, name),
            Node::Section { name, body, .. } => {
                push_unique(names, name);
                collect_names(&body.nodes, names);
            }
        }
    }
}

fn push_unique<'a>(names: &mut Vec<&'a str>, name: &'a str) {
    if !names.contains(&name) {
        names.push(name);
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            match node {
                Node::Literal(text) => f.write_str(text)?,
                Node::Variable {
                    name,
                    escaped: true,
                } => write!(f, "{{{{{name}}}}}")?,
                Node::Variable {
                    name,
                    escaped: false,
                } => write!(f, "{{{{{{{name}}}}}}}")?,
                Node::Section {
                    name,
                    inverted,
                    body,
                } => {
                    let sigil = if *inverted { '^' } else { '#' };
                    write!(f, "{{{{{sigil}{name}}}}}{body}{{{{/{name}}}}}")?;
                }
            }
        }
        Ok(())
    }
}

/// A section that has been opened but not yet closed.
struct OpenSection {
    name: String,
    inverted: bool,
    offset: usize,
    /// Nodes of the enclosing level, set aside while the body is built.
    parent: Vec<Node>,
}

/// Parses a list of tokens into a [`Template`].
///
/// # Errors
///
/// Returns `UnmatchedCloseTag` for a close with no open section or a name
/// mismatch, and `UnmatchedOpenTag` for sections left open at end of input.
pub fn parse(tokens: &[Token]) -> Result<Template, SyntaxError> {
    let mut stack: Vec<OpenSection> = Vec::new();
    let mut current: Vec<Node> = Vec::new();

    for token in tokens {
        match token {
            Token::Text(text) => push_literal(&mut current, text),
            Token::Variable { name, escaped, .. } => current.push(Node::Variable {
                name: name.clone(),
                escaped: *escaped,
            }),
            Token::SectionOpen {
                name,
                inverted,
                offset,
            } => stack.push(OpenSection {
                name: name.clone(),
                inverted: *inverted,
                offset: *offset,
                parent: std::mem::take(&mut current),
            }),
            Token::SectionClose { name, offset } => {
                let Some(open) = stack.pop() else {
                    return Err(SyntaxError::UnmatchedCloseTag {
                        name: name.clone(),
                        expected: None,
                        offset: *offset,
                    });
                };
                if open.name != *name {
                    return Err(SyntaxError::UnmatchedCloseTag {
                        name: name.clone(),
                        expected: Some(open.name),
                        offset: *offset,
                    });
                }
                let body = Template::from_nodes(std::mem::replace(&mut current, open.parent));
                current.push(Node::Section {
                    name: open.name,
                    inverted: open.inverted,
                    body,
                });
            }
        }
    }

    if let Some(open) = stack.pop() {
        return Err(SyntaxError::UnmatchedOpenTag {
            name: open.name,
            offset: open.offset,
        });
    }

    Ok(Template::from_nodes(current))
}

/// Appends text, coalescing with a preceding literal.
fn push_literal(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Literal(prev)) = nodes.last_mut() {
        prev.push_str(text);
    } else {
        nodes.push(Node::Literal(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(s: &str) -> Node {
        Node::Literal(s.to_string())
    }

    fn var(name: &str, escaped: bool) -> Node {
        Node::Variable {
            name: name.to_string(),
            escaped,
        }
    }

    fn section(name: &str, inverted: bool, body: Vec<Node>) -> Node {
        Node::Section {
            name: name.to_string(),
            inverted,
            body: Template::from_nodes(body),
        }
    }

    #[test]
    fn test_parse_text_only() {
        let template = Template::parse("SELECT * FROM t").unwrap();
        assert_eq!(template.nodes(), &[lit("SELECT * FROM t")]);
        assert!(template.is_literal());
    }

    #[test]
    fn test_parse_empty() {
        let template = Template::parse("").unwrap();
        assert!(template.is_empty());
        assert!(template.is_literal());
    }

    #[test]
    fn test_parse_section_with_variable() {
        let template = Template::parse("SELECT {{#string}}{{string}}{{/string}} FROM table").unwrap();
        assert_eq!(
            template.nodes(),
            &[
                lit("SELECT "),
                section("string", false, vec![var("string", true)]),
                lit(" FROM table"),
            ]
        );
        assert!(!template.is_literal());
    }

    #[test]
    fn test_parse_inverted_and_raw() {
        let template = Template::parse("{{^a}}{{{a}}}{{/a}}").unwrap();
        assert_eq!(
            template.nodes(),
            &[section("a", true, vec![var("a", false)])]
        );
    }

    #[test]
    fn test_parse_nested_sections() {
        let template = Template::parse("{{#a}}x{{#b}}y{{/b}}z{{/a}}").unwrap();
        assert_eq!(
            template.nodes(),
            &[section(
                "a",
                false,
                vec![lit("x"), section("b", false, vec![lit("y")]), lit("z")]
            )]
        );
    }

    #[test]
    fn test_parse_same_name_nested() {
        let template = Template::parse("{{#a}}{{^a}}n{{/a}}{{/a}}").unwrap();
        assert_eq!(
            template.nodes(),
            &[section("a", false, vec![section("a", true, vec![lit("n")])])]
        );
    }

    #[test]
    fn test_unmatched_open_tag() {
        let err = Template::parse("SELECT {{#string}}string FROM table").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnmatchedOpenTag {
                name: "string".to_string(),
                offset: 7,
            }
        );
    }

    #[test]
    fn test_unmatched_open_reports_innermost() {
        let err = Template::parse("{{#a}}{{#b}}{{/b}}{{#c}}").unwrap_err();
        assert!(matches!(err, SyntaxError::UnmatchedOpenTag { ref name, .. } if name == "c"));
    }

    #[test]
    fn test_unmatched_close_tag() {
        let err = Template::parse("SELECT string{{/string}} FROM table").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnmatchedCloseTag {
                name: "string".to_string(),
                expected: None,
                offset: 13,
            }
        );
    }

    #[test]
    fn test_mismatched_close_tag() {
        let err = Template::parse("{{#a}}{{#b}}{{/a}}{{/b}}").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::UnmatchedCloseTag {
                name: "a".to_string(),
                expected: Some("b".to_string()),
                offset: 12,
            }
        );
    }

    #[test]
    fn test_close_after_sibling_closed() {
        assert!(Template::parse("{{#a}}{{/a}}{{/a}}").is_err());
    }

    #[test]
    fn test_lexer_errors_propagate() {
        assert!(matches!(
            Template::parse("SELECT {{string FROM table"),
            Err(SyntaxError::UnclosedTag { .. })
        ));
        assert!(matches!(
            Template::parse("{{#a}}{{> inc}}{{/a}}"),
            Err(SyntaxError::PartialNotSupported { .. })
        ));
    }

    #[test]
    fn test_literals_coalesced() {
        let tokens = vec![Token::Text("a".to_string()), Token::Text("b".to_string())];
        let template = parse(&tokens).unwrap();
        assert_eq!(template.nodes(), &[lit("ab")]);
    }

    #[test]
    fn test_to_source_canonical() {
        let template = Template::parse("A {{ x }} {{{ y }}} {{# s }}{{^ t }}B{{/ t }}{{/ s }}").unwrap();
        assert_eq!(
            template.to_source(),
            "A {{x}} {{{y}}} {{#s}}{{^t}}B{{/t}}{{/s}}"
        );
    }

    #[test]
    fn test_to_source_reparses_equal() {
        let source = "SELECT {{#a}}x {{a}} {{{b}}}{{^c}}none{{/c}}{{/a}} FROM t }} {";
        let template = Template::parse(source).unwrap();
        let reparsed = Template::parse(&template.to_source()).unwrap();
        assert_eq!(reparsed, template);
    }

    #[test]
    fn test_bind_names_first_occurrence_order() {
        let template = Template::parse("{{#b}}{{a}}{{b}}{{/b}}{{{c}}}{{^a}}{{/a}}").unwrap();
        assert_eq!(template.bind_names(), vec!["b", "a", "c"]);
    }
}
