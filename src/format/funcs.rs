// src/format/funcs.rs
//! The fixed function table: `bin`, `b64enc`, `printf`

use std::borrow::Cow;
use std::io::Write;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::Zeroizing;

use super::exec::Value;
use crate::consts::MAX_BIN_WIDTH;

/// Upper bound on a `printf` field width
const MAX_PRINTF_WIDTH: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Func {
    Bin,
    B64Enc,
    Printf,
}

impl Func {
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        match name {
            "bin" => Some(Func::Bin),
            "b64enc" => Some(Func::B64Enc),
            "printf" => Some(Func::Printf),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Func::Bin => "bin",
            Func::B64Enc => "b64enc",
            Func::Printf => "printf",
        }
    }
}

/// Low-order `width` bytes of `value` as a big-endian 64-bit integer.
///
/// Negative values use their two's-complement bit pattern. Returns `None`
/// when `width` exceeds 8.
pub fn bin(width: usize, value: i64) -> Option<Vec<u8>> {
    let be = (value as u64).to_be_bytes();
    let start = be.len().checked_sub(width)?;
    Some(be[start..].to_vec())
}

/// Standard base64 with padding
pub fn b64enc(data: &[u8]) -> String {
    STANDARD.encode(data)
}

pub(crate) fn call<'a>(func: Func, args: Vec<Value<'a>>) -> Result<Value<'a>, String> {
    let arity_ok = match func {
        Func::Bin => args.len() == 2,
        Func::B64Enc => args.len() == 1,
        Func::Printf => !args.is_empty(),
    };
    if !arity_ok {
        let want = match func {
            Func::Bin => "2",
            Func::B64Enc => "1",
            Func::Printf => "at least 1",
        };
        return Err(format!(
            "wrong number of args for {}: want {want} got {}",
            func.name(),
            args.len()
        ));
    }

    let outcome = match func {
        Func::Bin => call_bin(&args[0], &args[1]),
        Func::B64Enc => call_b64enc(&args[0]),
        Func::Printf => printf(args),
    };
    outcome.map_err(|msg| format!("error calling {}: {msg}", func.name()))
}

fn expect_int(value: &Value<'_>) -> Result<i64, String> {
    match value {
        Value::Int(n) => Ok(*n),
        other => Err(format!(
            "wrong type for value; expected int; got {}",
            other.kind()
        )),
    }
}

fn call_bin<'a>(width: &Value<'_>, value: &Value<'_>) -> Result<Value<'a>, String> {
    let width = expect_int(width)?;
    let value = expect_int(value)?;
    usize::try_from(width)
        .ok()
        .and_then(|w| bin(w, value))
        .map(|bytes| Value::Bytes(Cow::Owned(bytes)))
        .ok_or_else(|| format!("width {width} out of range 0..={MAX_BIN_WIDTH}"))
}

fn call_b64enc<'a>(value: &Value<'_>) -> Result<Value<'a>, String> {
    match value {
        Value::Bytes(data) | Value::Text(data) => {
            Ok(Value::Text(Cow::Owned(b64enc(data).into_bytes())))
        }
        other => Err(format!(
            "wrong type for value; expected []byte; got {}",
            other.kind()
        )),
    }
}

fn printf<'a>(args: Vec<Value<'_>>) -> Result<Value<'a>, String> {
    let mut args = args.into_iter();
    let head = args.next();
    let format: &[u8] = match &head {
        Some(Value::Text(format)) => &**format,
        Some(other) => {
            return Err(format!(
                "wrong type for format; expected string; got {}",
                other.kind()
            ))
        }
        None => return Err("missing format".into()),
    };

    let mut out = Zeroizing::new(Vec::new());
    let mut i = 0;
    while i < format.len() {
        let b = format[i];
        i += 1;
        if b != b'%' {
            out.push(b);
            continue;
        }

        let mut left = false;
        let mut zero = false;
        while let Some(&flag) = format.get(i) {
            match flag {
                b'-' => left = true,
                b'0' => zero = true,
                _ => break,
            }
            i += 1;
        }

        let mut width = 0usize;
        while let Some(&d) = format.get(i).filter(|d| d.is_ascii_digit()) {
            width = width.saturating_mul(10).saturating_add(usize::from(d - b'0'));
            i += 1;
        }
        if width > MAX_PRINTF_WIDTH {
            return Err(format!("width {width} exceeds {MAX_PRINTF_WIDTH}"));
        }

        let Some(&verb) = format.get(i) else {
            return Err("incomplete verb at end of format".into());
        };
        i += 1;
        if verb == b'%' {
            out.push(b'%');
            continue;
        }

        let arg = args
            .next()
            .ok_or_else(|| format!("missing argument for %{}", verb as char))?;
        let rendered = render_verb(verb, &arg)?;
        pad(&mut out, &rendered, width, left, zero);
    }

    let extra = args.count();
    if extra > 0 {
        return Err(format!("{extra} unused argument(s)"));
    }
    Ok(Value::Text(Cow::Owned(std::mem::take(&mut *out))))
}

fn render_verb(verb: u8, arg: &Value<'_>) -> Result<Zeroizing<Vec<u8>>, String> {
    let mismatch = || format!("%{} does not accept {}", verb as char, arg.kind());
    let mut rendered = Zeroizing::new(Vec::new());
    match (verb, arg) {
        (b'v', value) => value.print(&mut rendered),
        (b's', Value::Bytes(data) | Value::Text(data)) => rendered.extend_from_slice(data),
        (b'd', Value::Int(_) | Value::Bytes(_)) => arg.print(&mut rendered),
        (b'q', Value::Bytes(data) | Value::Text(data)) => quote_bytes(data, &mut rendered),
        (b'q', Value::Int(n)) => {
            let c = u32::try_from(*n)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            rendered.push(b'\'');
            quote_char(c, '\'', &mut rendered);
            rendered.push(b'\'');
        }
        (b'x', Value::Bytes(data) | Value::Text(data)) => {
            rendered.extend_from_slice(Zeroizing::new(hex::encode(data)).as_bytes())
        }
        (b'X', Value::Bytes(data) | Value::Text(data)) => {
            rendered.extend_from_slice(Zeroizing::new(hex::encode_upper(data)).as_bytes())
        }
        (b'x' | b'X', Value::Int(n)) => {
            let sign = if *n < 0 { "-" } else { "" };
            let magnitude = n.unsigned_abs();
            let _ = if verb == b'x' {
                write!(rendered, "{sign}{magnitude:x}")
            } else {
                write!(rendered, "{sign}{magnitude:X}")
            };
        }
        (b's' | b'd', _) => return Err(mismatch()),
        _ => return Err(format!("unsupported verb %{}", verb as char)),
    }
    Ok(rendered)
}

/// Double-quoted, escaped form of `data`; bytes that are not UTF-8 become `\xHH`
fn quote_bytes(data: &[u8], out: &mut Vec<u8>) {
    out.push(b'"');
    let mut rest = data;
    while !rest.is_empty() {
        let (valid, bad) = match std::str::from_utf8(rest) {
            Ok(valid) => (valid, 0),
            Err(err) => {
                let valid = std::str::from_utf8(&rest[..err.valid_up_to()]).unwrap_or_default();
                let bad = err
                    .error_len()
                    .unwrap_or(rest.len() - err.valid_up_to());
                (valid, bad)
            }
        };
        for c in valid.chars() {
            quote_char(c, '"', out);
        }
        for byte in &rest[valid.len()..valid.len() + bad] {
            let _ = write!(out, "\\x{byte:02x}");
        }
        rest = &rest[valid.len() + bad..];
    }
    out.push(b'"');
}

fn quote_char(c: char, quote: char, out: &mut Vec<u8>) {
    let escaped = match c {
        '\x07' => "\\a",
        '\x08' => "\\b",
        '\x0c' => "\\f",
        '\n' => "\\n",
        '\r' => "\\r",
        '\t' => "\\t",
        '\x0b' => "\\v",
        '\\' => "\\\\",
        _ if c == quote => {
            out.push(b'\\');
            out.push(c as u8);
            return;
        }
        _ if c.is_ascii_control() => {
            let _ = write!(out, "\\x{:02x}", c as u32);
            return;
        }
        _ if c.is_control() => {
            let _ = write!(out, "\\u{:04x}", c as u32);
            return;
        }
        _ => {
            let mut buf = [0u8; 4];
            out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            return;
        }
    };
    out.extend_from_slice(escaped.as_bytes());
}

fn pad(out: &mut Vec<u8>, rendered: &[u8], width: usize, left: bool, zero: bool) {
    let fill = width.saturating_sub(rendered.len());
    if fill == 0 {
        out.extend_from_slice(rendered);
    } else if left {
        out.extend_from_slice(rendered);
        out.resize(out.len() + fill, b' ');
    } else if zero {
        // keep a leading sign ahead of the zeros
        let (sign, digits) = match rendered.split_first() {
            Some((b'-', rest)) => (&rendered[..1], rest),
            _ => (&rendered[..0], rendered),
        };
        out.extend_from_slice(sign);
        out.resize(out.len() + fill, b'0');
        out.extend_from_slice(digits);
    } else {
        out.resize(out.len() + fill, b' ');
        out.extend_from_slice(rendered);
    }
}
