// src/format/mod.rs
//! Output formatter — a closed-grammar template engine
//!
//! Renders a caller-supplied format string against the three values a
//! derivation produces. The syntax is the familiar `{{ … }}` action form:
//!
//! ```text
//! {{ printf "%s:%s" (b64enc .Salt) (b64enc .Key) }}
//! {{ b64enc (printf "%s%s%s" (bin 4 .Iterations) .Salt .Key) }}
//! {{- .Iterations | printf "%08d" -}}
//! ```
//!
//! Only the fields `.Iterations`, `.Salt`, `.Key` and the functions `bin`,
//! `b64enc`, `printf` exist. Everything is resolved at parse time against
//! fixed tables; there is no reflection and no user-defined function.

mod exec;
mod funcs;
mod lexer;
mod parser;

use std::fmt;

use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

pub use funcs::{b64enc, bin};

use exec::Value;
use parser::{Field, Pipeline};

/// Failure to parse or execute a format template
///
/// Messages describe the template, never the secret values bound into it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template: format:{line}: {message}")]
    Parse { line: usize, message: String },

    #[error("template: format:{line}: executing: {message}")]
    Exec { line: usize, message: String },

    #[error("template: rendered output is not valid UTF-8")]
    NotUtf8,
}

impl TemplateError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        TemplateError::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Read-only view of one derivation, as seen by a template
#[derive(Clone, Copy)]
pub struct FormatContext<'a> {
    iterations: i64,
    salt: &'a [u8],
    key: &'a [u8],
}

impl<'a> FormatContext<'a> {
    pub fn new(iterations: i64, salt: &'a [u8], key: &'a [u8]) -> Self {
        Self {
            iterations,
            salt,
            key,
        }
    }

    fn field(&self, field: Field) -> Value<'a> {
        match field {
            Field::Iterations => Value::Int(self.iterations),
            Field::Salt => Value::bytes(self.salt),
            Field::Key => Value::bytes(self.key),
        }
    }
}

impl fmt::Debug for FormatContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatContext")
            .field("iterations", &self.iterations)
            .field("salt", &"[REDACTED]")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug)]
enum Node {
    Text(String),
    Action { line: usize, pipeline: Pipeline },
}

/// A parsed format template, reusable across renders
#[derive(Debug)]
pub struct Template {
    nodes: Vec<Node>,
}

impl Template {
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let nodes = lexer::lex(source)?
            .into_iter()
            .map(|item| match item {
                lexer::Item::Text(text) => Ok(Node::Text(text)),
                lexer::Item::Action { line, tokens } => Ok(Node::Action {
                    line,
                    pipeline: parser::parse_action(tokens, line)?,
                }),
            })
            .collect::<Result<Vec<_>, TemplateError>>()?;
        Ok(Self { nodes })
    }

    pub fn render(&self, ctx: &FormatContext<'_>) -> Result<String, TemplateError> {
        let mut out = Zeroizing::new(Vec::new());
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.extend_from_slice(text.as_bytes()),
                Node::Action { line, pipeline } => {
                    let value = exec::eval(pipeline, ctx).map_err(|message| {
                        TemplateError::Exec {
                            line: *line,
                            message,
                        }
                    })?;
                    value.print(&mut out);
                }
            }
        }
        String::from_utf8(std::mem::take(&mut *out)).map_err(|err| {
            err.into_bytes().zeroize();
            TemplateError::NotUtf8
        })
    }
}

/// Parse `template` and render it against `ctx` in one step
pub fn render(template: &str, ctx: &FormatContext<'_>) -> Result<String, TemplateError> {
    Template::parse(template)?.render(ctx)
}
