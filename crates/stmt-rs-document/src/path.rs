//! Slash-path expressions over JSON documents.
//!
//! A small selection language:
//!
//! ```text
//! expression := path ('|' path)*
//! path       := '.' | ['./' | '/'] step ('/' step)*
//! step       := (name | '*' | '.') ['[' position ']']
//! ```
//!
//! JSON arrays stand for repeated elements: stepping into a key whose value is
//! an array selects every element, in order. Positions are 1-based and apply
//! per parent node, so `LIST/ITEM[2]` is the second `ITEM` of each `LIST`.

use serde_json::Value as Json;
use thiserror::Error;

/// A malformed path expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid path expression '{expression}' at offset {offset}: {message}")]
pub struct PathSyntaxError {
    /// The full expression text.
    pub expression: String,
    /// Byte offset of the problem.
    pub offset: usize,
    /// What was wrong.
    pub message: String,
}

/// What a single step selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTest {
    /// The node itself (`.`).
    SelfNode,
    /// Children with the given key.
    Name(String),
    /// All children (`*`).
    Wildcard,
}

/// One `/`-separated step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The node test.
    pub test: StepTest,
    /// Optional 1-based position predicate.
    pub position: Option<usize>,
}

/// A compiled path expression: the union of one or more paths.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use stmt_rs_document::path::PathExpression;
///
/// let doc = json!({"LIST": {"ITEM": ["a", "b"]}, "OTHER": "c"});
/// let expr = PathExpression::parse("./LIST/ITEM[2] | ./OTHER").unwrap();
/// let nodes = expr.select(&doc);
/// assert_eq!(nodes, vec![&json!("b"), &json!("c")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    paths: Vec<Vec<Step>>,
}

impl PathExpression {
    /// Parses an expression.
    ///
    /// # Errors
    ///
    /// Returns a [`PathSyntaxError`] for empty paths or steps, unbalanced or
    /// non-numeric predicates, position `0`, or `..` steps.
    pub fn parse(expression: &str) -> Result<Self, PathSyntaxError> {
        let mut paths = Vec::new();
        let mut start = 0;
        for part in expression.split('|') {
            paths.push(parse_path(expression, part, start)?);
            start += part.len() + 1;
        }
        Ok(Self { paths })
    }

    /// Returns `true` if every path is just `.`.
    pub fn is_self(&self) -> bool {
        self.paths
            .iter()
            .all(|steps| steps.iter().all(|s| s.test == StepTest::SelfNode && s.position.is_none()))
    }

    /// Selects the matching nodes under `context`.
    ///
    /// Results of a union are concatenated in operand order.
    pub fn select<'a>(&self, context: &'a Json) -> Vec<&'a Json> {
        let mut selected = Vec::new();
        for steps in &self.paths {
            let mut nodes = vec![context];
            for step in steps {
                nodes = apply_step(&nodes, step);
            }
            selected.extend(nodes);
        }
        selected
    }
}

fn parse_path(expression: &str, part: &str, base: usize) -> Result<Vec<Step>, PathSyntaxError> {
    let error = |offset: usize, message: &str| PathSyntaxError {
        expression: expression.to_string(),
        offset: base + offset,
        message: message.to_string(),
    };

    let leading = part.len() - part.trim_start().len();
    let trimmed = part.trim();
    if trimmed.is_empty() {
        return Err(error(leading, "empty path"));
    }

    let (body, mut offset) = if let Some(rest) = trimmed.strip_prefix("./") {
        (rest, leading + 2)
    } else if let Some(rest) = trimmed.strip_prefix('/') {
        (rest, leading + 1)
    } else {
        (trimmed, leading)
    };

    let mut steps = Vec::new();
    for raw in body.split('/') {
        steps.push(parse_step(raw, offset, &error)?);
        offset += raw.len() + 1;
    }
    Ok(steps)
}

fn parse_step(
    raw: &str,
    offset: usize,
    error: &impl Fn(usize, &str) -> PathSyntaxError,
) -> Result<Step, PathSyntaxError> {
    let (test_text, position) = match raw.find('[') {
        Some(open) => {
            let Some(inner) = raw[open + 1..].strip_suffix(']') else {
                return Err(error(offset + open, "unterminated predicate"));
            };
            let position = inner
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| error(offset + open + 1, "position must be a positive integer"))?;
            (&raw[..open], Some(position))
        }
        None => (raw, None),
    };

    let test = match test_text.trim() {
        "" => return Err(error(offset, "empty step")),
        "." => StepTest::SelfNode,
        ".." => return Err(error(offset, "parent steps are not supported")),
        "*" => StepTest::Wildcard,
        name if name.contains([']', '*']) || name.chars().any(char::is_whitespace) => {
            return Err(error(offset, "invalid step name"));
        }
        name => StepTest::Name(name.to_string()),
    };

    Ok(Step { test, position })
}

fn apply_step<'a>(nodes: &[&'a Json], step: &Step) -> Vec<&'a Json> {
    let mut out = Vec::new();
    for node in nodes {
        let mut matched = Vec::new();
        match &step.test {
            StepTest::SelfNode => matched.push(*node),
            StepTest::Name(name) => children(node, Some(name), &mut matched),
            StepTest::Wildcard => children(node, None, &mut matched),
        }
        match step.position {
            Some(p) => out.extend(matched.get(p - 1).copied()),
            None => out.extend(matched),
        }
    }
    out
}

/// Collects the child elements of `node`, optionally only those under `name`.
fn children<'a>(node: &'a Json, name: Option<&str>, out: &mut Vec<&'a Json>) {
    match node {
        Json::Object(map) => match name {
            Some(name) => {
                if let Some(value) = map.get(name) {
                    push_element(value, out);
                }
            }
            None => {
                for value in map.values() {
                    push_element(value, out);
                }
            }
        },
        Json::Array(items) => {
            for item in items {
                children(item, name, out);
            }
        }
        _ => {}
    }
}

/// Arrays hold repeated elements; anything else is a single element.
fn push_element<'a>(value: &'a Json, out: &mut Vec<&'a Json>) {
    match value {
        Json::Array(items) => out.extend(items.iter()),
        other => out.push(other),
    }
}
