// src/format/lexer.rs
//! Splits a template into literal text and tokenized `{{ … }}` actions
//!
//! Trim markers (`{{- ` / ` -}}`) and comments (`{{/* … */}}`) are resolved
//! here, so later stages only ever see text and token streams.

use super::TemplateError;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";
const RIGHT_TRIM: &str = "-}}";
const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `.Name`
    Field(String),
    /// Bare identifier — a function name
    Ident(String),
    /// Interpreted or raw string literal, already unescaped
    Str(Vec<u8>),
    Int(i64),
    LParen,
    RParen,
    Pipe,
}

#[derive(Debug)]
pub(crate) enum Item {
    Text(String),
    Action { line: usize, tokens: Vec<Token> },
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn is_ident_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

fn line_at(src: &str, offset: usize) -> usize {
    src[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

fn skip_spaces(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && is_space(bytes[i]) {
        i += 1;
    }
    i
}

pub(crate) fn lex(src: &str) -> Result<Vec<Item>, TemplateError> {
    let mut items = Vec::new();
    let mut pos = 0;
    let mut trim_next = false;

    while pos < src.len() {
        let Some(rel) = src[pos..].find(LEFT_DELIM) else {
            push_text(&mut items, &src[pos..], trim_next);
            break;
        };
        let open = pos + rel;
        push_text(&mut items, &src[pos..open], trim_next);

        let line = line_at(src, open);
        let bytes = src.as_bytes();
        let mut cursor = open + LEFT_DELIM.len();

        // "{{-" only trims when followed by a space; "{{-3}}" is a number
        if bytes.get(cursor) == Some(&b'-') && bytes.get(cursor + 1).is_some_and(|&b| is_space(b))
        {
            trim_trailing_text(&mut items);
            cursor += 1;
        }

        let body = skip_spaces(bytes, cursor);
        if src[body..].starts_with(COMMENT_OPEN) {
            let (end, trim) = close_comment(src, body, line)?;
            pos = end;
            trim_next = trim;
            continue;
        }

        let (tokens, end, trim) = tokenize(src, cursor, line)?;
        items.push(Item::Action { line, tokens });
        pos = end;
        trim_next = trim;
    }

    Ok(items)
}

fn push_text(items: &mut Vec<Item>, text: &str, trim_leading: bool) {
    let text = if trim_leading {
        text.trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8))
    } else {
        text
    };
    if !text.is_empty() {
        items.push(Item::Text(text.to_owned()));
    }
}

fn trim_trailing_text(items: &mut Vec<Item>) {
    if let Some(Item::Text(text)) = items.last_mut() {
        let kept = text
            .trim_end_matches(|c: char| c.is_ascii() && is_space(c as u8))
            .len();
        text.truncate(kept);
        if text.is_empty() {
            items.pop();
        }
    }
}

/// Returns the offset just past the closing delimiter and whether it trims.
fn close_comment(src: &str, start: usize, line: usize) -> Result<(usize, bool), TemplateError> {
    let body = start + COMMENT_OPEN.len();
    let Some(rel) = src[body..].find(COMMENT_CLOSE) else {
        return Err(TemplateError::parse(line, "unclosed comment"));
    };
    let after = body + rel + COMMENT_CLOSE.len();
    let bytes = src.as_bytes();
    let next = skip_spaces(bytes, after);

    if src[after..].starts_with(RIGHT_DELIM) {
        Ok((after + RIGHT_DELIM.len(), false))
    } else if next > after && src[next..].starts_with(RIGHT_TRIM) {
        Ok((next + RIGHT_TRIM.len(), true))
    } else {
        Err(TemplateError::parse(line, "comment ends before closing delimiter"))
    }
}

/// Tokenizes one action body starting at `start`.
///
/// Returns the tokens, the offset just past `}}`, and whether a right trim
/// marker was present.
fn tokenize(
    src: &str,
    start: usize,
    line: usize,
) -> Result<(Vec<Token>, usize, bool), TemplateError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut i = start;

    loop {
        let Some(&b) = bytes.get(i) else {
            return Err(TemplateError::parse(line, "unclosed action"));
        };

        match b {
            b'}' if src[i..].starts_with(RIGHT_DELIM) => {
                return Ok((tokens, i + RIGHT_DELIM.len(), false));
            }
            _ if is_space(b) => {
                let next = skip_spaces(bytes, i);
                if src[next..].starts_with(RIGHT_TRIM) {
                    return Ok((tokens, next + RIGHT_TRIM.len(), true));
                }
                i = next;
            }
            b'(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            b')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            b'|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            b'"' => {
                let (value, end) = quoted(src, i + 1, line)?;
                tokens.push(Token::Str(value));
                i = end;
            }
            b'`' => {
                let body = i + 1;
                let Some(rel) = src[body..].find('`') else {
                    return Err(TemplateError::parse(line, "unterminated raw quoted string"));
                };
                tokens.push(Token::Str(src.as_bytes()[body..body + rel].to_vec()));
                i = body + rel + 1;
            }
            b'.' => {
                let name_start = i + 1;
                let mut end = name_start;
                while end < bytes.len() && is_ident_byte(bytes[end]) {
                    end += 1;
                }
                if end == name_start {
                    return Err(TemplateError::parse(
                        line,
                        "bare \".\" is not supported; use .Iterations, .Salt or .Key",
                    ));
                }
                if bytes.get(end) == Some(&b'.') {
                    return Err(TemplateError::parse(
                        line,
                        format!("chained field access after .{}", &src[name_start..end]),
                    ));
                }
                tokens.push(Token::Field(src[name_start..end].to_owned()));
                i = end;
            }
            b'-' | b'+' | b'0'..=b'9' => {
                let (value, end) = number(src, i, line)?;
                tokens.push(Token::Int(value));
                i = end;
            }
            _ if b == b'_' || b.is_ascii_alphabetic() => {
                let mut end = i;
                while end < bytes.len() && is_ident_byte(bytes[end]) {
                    end += 1;
                }
                tokens.push(Token::Ident(src[i..end].to_owned()));
                i = end;
            }
            _ => {
                let c = src[i..].chars().next().unwrap_or('\u{FFFD}');
                return Err(TemplateError::parse(
                    line,
                    format!("unexpected {c:?} in command"),
                ));
            }
        }
    }
}

fn number(src: &str, start: usize, line: usize) -> Result<(i64, usize), TemplateError> {
    let bytes = src.as_bytes();
    let mut i = start;
    let negative = match bytes[i] {
        b'-' => {
            i += 1;
            true
        }
        b'+' => {
            i += 1;
            false
        }
        _ => false,
    };

    let (radix, digits_start) = if src[i..].starts_with("0x") || src[i..].starts_with("0X") {
        (16, i + 2)
    } else {
        (10, i)
    };
    let mut end = digits_start;
    while end < bytes.len() && (bytes[end] as char).is_digit(radix) {
        end += 1;
    }

    let followed_by_delim = bytes
        .get(end)
        .map_or(true, |&b| is_space(b) || matches!(b, b')' | b'|' | b'}'));
    if end == digits_start || !followed_by_delim {
        let mut bad = end.max(start + 1);
        while bad < bytes.len()
            && !is_space(bytes[bad])
            && !matches!(bytes[bad], b')' | b'|' | b'}')
        {
            bad += 1;
        }
        return Err(TemplateError::parse(
            line,
            format!("bad number syntax: {:?}", &src[start..bad]),
        ));
    }

    let magnitude = u64::from_str_radix(&src[digits_start..end], radix)
        .map_err(|_| TemplateError::parse(line, "integer literal overflows int64"))?;
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
    .ok_or_else(|| TemplateError::parse(line, "integer literal overflows int64"))?;

    Ok((value, end))
}

/// Unescapes a `"…"` literal whose body starts at `start`.
fn quoted(src: &str, start: usize, line: usize) -> Result<(Vec<u8>, usize), TemplateError> {
    let unterminated = || TemplateError::parse(line, "unterminated quoted string");
    let mut out = Vec::new();
    let mut chars = src[start..].char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            '"' => return Ok((out, start + offset + 1)),
            '\n' => return Err(unterminated()),
            '\\' => {
                let (_, esc) = chars.next().ok_or_else(unterminated)?;
                match esc {
                    'n' => out.push(b'\n'),
                    't' => out.push(b'\t'),
                    'r' => out.push(b'\r'),
                    'a' => out.push(0x07),
                    'b' => out.push(0x08),
                    'f' => out.push(0x0c),
                    'v' => out.push(0x0b),
                    '\\' | '"' | '\'' => out.push(esc as u8),
                    'x' => {
                        let hex = take_hex(&mut chars, 2).ok_or_else(unterminated)?;
                        let byte = u8::from_str_radix(&hex, 16).map_err(|_| {
                            TemplateError::parse(line, format!("invalid escape \\x{hex}"))
                        })?;
                        out.push(byte);
                    }
                    'u' => {
                        let hex = take_hex(&mut chars, 4).ok_or_else(unterminated)?;
                        let c = u32::from_str_radix(&hex, 16)
                            .ok()
                            .and_then(char::from_u32)
                            .ok_or_else(|| {
                                TemplateError::parse(line, format!("invalid escape \\u{hex}"))
                            })?;
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    other => {
                        return Err(TemplateError::parse(
                            line,
                            format!("unknown escape sequence \\{other}"),
                        ))
                    }
                }
            }
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }

    Err(unterminated())
}

fn take_hex(chars: &mut std::str::CharIndices<'_>, n: usize) -> Option<String> {
    let hex: String = chars.by_ref().take(n).map(|(_, c)| c).collect();
    (hex.len() == n).then_some(hex)
}
