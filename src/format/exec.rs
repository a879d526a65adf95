// src/format/exec.rs
//! Evaluates parsed pipelines against a `FormatContext`

use std::borrow::Cow;
use std::io::Write;

use zeroize::Zeroize;

use super::funcs;
use super::parser::{Arg, Command, Pipeline};
use super::FormatContext;

/// A runtime template value
///
/// Salt and key borrow from the context; only function results allocate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Value<'a> {
    Int(i64),
    /// Raw binary: `.Salt`, `.Key`, `bin` output
    Bytes(Cow<'a, [u8]>),
    /// Text: literals, `printf` and `b64enc` output
    Text(Cow<'a, [u8]>),
}

impl<'a> Value<'a> {
    pub(crate) fn bytes(data: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(data))
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Bytes(_) => "[]byte",
            Value::Text(_) => "string",
        }
    }

    /// Default printing: ints in decimal, text raw, bytes as `[1 2 3]`
    pub(crate) fn print(&self, out: &mut Vec<u8>) {
        match self {
            Value::Int(n) => {
                let _ = write!(out, "{n}");
            }
            Value::Text(text) => out.extend_from_slice(text),
            Value::Bytes(bytes) => {
                out.push(b'[');
                for (idx, byte) in bytes.iter().enumerate() {
                    if idx > 0 {
                        out.push(b' ');
                    }
                    let _ = write!(out, "{byte}");
                }
                out.push(b']');
            }
        }
    }
}

// b64enc and printf results may carry key material
impl Drop for Value<'_> {
    fn drop(&mut self) {
        if let Value::Bytes(Cow::Owned(data)) | Value::Text(Cow::Owned(data)) = self {
            data.zeroize();
        }
    }
}

pub(crate) fn eval<'a>(pipeline: &Pipeline, ctx: &FormatContext<'a>) -> Result<Value<'a>, String> {
    let mut piped: Option<Value<'a>> = None;

    for command in &pipeline.commands {
        let value = match command {
            Command::Value(arg) => arg_value(arg, ctx)?,
            Command::Call { func, args } => {
                let mut values = args
                    .iter()
                    .map(|arg| arg_value(arg, ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                values.extend(piped.take());
                funcs::call(*func, values)?
            }
        };
        piped = Some(value);
    }

    piped.ok_or_else(|| "missing value for command".to_string())
}

fn arg_value<'a>(arg: &Arg, ctx: &FormatContext<'a>) -> Result<Value<'a>, String> {
    Ok(match arg {
        Arg::Field(field) => ctx.field(*field),
        Arg::Text(text) => Value::Text(Cow::Owned(text.clone())),
        Arg::Int(n) => Value::Int(*n),
        Arg::Sub(inner) => eval(inner, ctx)?,
    })
}
