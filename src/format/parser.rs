// src/format/parser.rs
//! Builds pipelines out of action tokens
//!
//! Grammar:
//!
//! ```text
//! pipeline := command ( "|" command )*
//! command  := IDENT operand*          # function call
//!           | operand                 # single value
//! operand  := FIELD | STRING | INT | IDENT | "(" pipeline ")"
//! ```

use std::iter::Peekable;
use std::vec::IntoIter;

use super::funcs::Func;
use crate::consts::MAX_PAREN_DEPTH;
use super::lexer::Token;
use super::TemplateError;

/// The only fields a template can read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Iterations,
    Salt,
    Key,
}

impl Field {
    fn lookup(name: &str) -> Option<Self> {
        match name {
            "Iterations" => Some(Field::Iterations),
            "Salt" => Some(Field::Salt),
            "Key" => Some(Field::Key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Arg {
    Field(Field),
    Text(Vec<u8>),
    Int(i64),
    Sub(Pipeline),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Call { func: Func, args: Vec<Arg> },
    Value(Arg),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Pipeline {
    pub(crate) commands: Vec<Command>,
}

enum Operand {
    Ident(String),
    Arg(Arg),
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    line: usize,
    depth: usize,
}

pub(crate) fn parse_action(tokens: Vec<Token>, line: usize) -> Result<Pipeline, TemplateError> {
    let mut parser = Parser {
        tokens: tokens.into_iter().peekable(),
        line,
        depth: 0,
    };
    let pipeline = parser.pipeline()?;
    match parser.tokens.next() {
        None => Ok(pipeline),
        Some(Token::RParen) => Err(parser.error("unexpected right paren")),
        Some(other) => Err(parser.error(format!("unexpected {other:?} in operand"))),
    }
}

impl Parser {
    fn error(&self, message: impl Into<String>) -> TemplateError {
        TemplateError::parse(self.line, message)
    }

    fn at_command_end(&mut self) -> bool {
        matches!(
            self.tokens.peek(),
            None | Some(Token::Pipe) | Some(Token::RParen)
        )
    }

    fn pipeline(&mut self) -> Result<Pipeline, TemplateError> {
        let mut commands = vec![self.command()?];
        while self.tokens.next_if_eq(&Token::Pipe).is_some() {
            let command = self.command()?;
            if let Command::Value(_) = command {
                return Err(self.error(format!(
                    "non executable command in pipeline stage {}",
                    commands.len() + 1
                )));
            }
            commands.push(command);
        }
        Ok(Pipeline { commands })
    }

    fn command(&mut self) -> Result<Command, TemplateError> {
        if self.at_command_end() {
            return Err(self.error("missing value for command"));
        }

        let head = self.operand()?;
        let mut args = Vec::new();
        while !self.at_command_end() {
            let arg = match self.operand()? {
                // A function named as an argument is invoked with no arguments
                Operand::Ident(name) => Arg::Sub(Pipeline {
                    commands: vec![Command::Call {
                        func: self.func(&name)?,
                        args: Vec::new(),
                    }],
                }),
                Operand::Arg(arg) => arg,
            };
            args.push(arg);
        }

        match head {
            Operand::Ident(name) => Ok(Command::Call {
                func: self.func(&name)?,
                args,
            }),
            Operand::Arg(value) if args.is_empty() => Ok(Command::Value(value)),
            Operand::Arg(_) => Err(self.error("can't give argument to non-function")),
        }
    }

    fn operand(&mut self) -> Result<Operand, TemplateError> {
        let Some(token) = self.tokens.next() else {
            return Err(self.error("missing value for command"));
        };
        let arg = match token {
            Token::Ident(name) => return Ok(Operand::Ident(name)),
            Token::Field(name) => Arg::Field(
                Field::lookup(&name)
                    .ok_or_else(|| self.error(format!("can't evaluate field {name}")))?,
            ),
            Token::Str(bytes) => Arg::Text(bytes),
            Token::Int(n) => Arg::Int(n),
            Token::LParen => {
                // evaluation recurses once per level, so the bound holds there too
                if self.depth == MAX_PAREN_DEPTH {
                    return Err(self.error("max nesting depth exceeded"));
                }
                self.depth += 1;
                let inner = self.pipeline()?;
                self.depth -= 1;
                if self.tokens.next_if_eq(&Token::RParen).is_none() {
                    return Err(self.error("unclosed left paren"));
                }
                Arg::Sub(inner)
            }
            Token::RParen => return Err(self.error("unexpected right paren")),
            Token::Pipe => return Err(self.error("missing value for command")),
        };
        Ok(Operand::Arg(arg))
    }

    fn func(&self, name: &str) -> Result<Func, TemplateError> {
        Func::lookup(name).ok_or_else(|| self.error(format!("function {name:?} not defined")))
    }
}
