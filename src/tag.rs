//! The `name:"value"` tag grammar used for directives and field metadata.
//!
//! A tag is a whitespace separated list of `name:"value"` pairs, where `value`
//! is a double-quoted string that may contain backslash escapes:
//!
//! ```text
//! envPrefix:"APP" order:"cmd,env"
//! env:"BIND_ADDR" cmd:"bind-addr" desc:"address to \"bind\" to"
//! ```
//!
//! Scanning is best-effort. The first malformed pair stops the scan and the
//! pairs read up to that point are returned, without an error.

use indexmap::IndexMap;

use crate::macros::trace;

/// Parsed tag pairs, in the order they were written.
pub type Params = IndexMap<String, String>;

/// Parse a tag into its `name -> value` pairs.
///
/// A name that appears twice keeps its last value. A value whose escapes
/// cannot be decoded is kept as the empty string.
pub fn parse_tag(tag: &str) -> Params {
    let mut pairs = Params::new();
    let mut rest = tag;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        // Scan to the colon. A space or a quote first is a syntax error. An
        // empty name is accepted.
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() && bytes[i] != b' ' && bytes[i] != b':' && bytes[i] != b'"' {
            i += 1;
        }
        if i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
            trace!(remainder = rest, "tag: stopping at malformed name");
            break;
        }
        let name = &rest[..i];
        rest = &rest[i + 1..];

        // Scan the quoted value, skipping escaped characters.
        let bytes = rest.as_bytes();
        let mut j = 1;
        while j < bytes.len() && bytes[j] != b'"' {
            if bytes[j] == b'\\' {
                j += 1;
            }
            j += 1;
        }
        if j >= bytes.len() {
            trace!(remainder = rest, "tag: stopping at unterminated value");
            break;
        }
        let quoted = &rest[1..j];
        rest = &rest[j + 1..];

        let value = unquote(quoted).unwrap_or_default();
        pairs.insert(name.to_string(), value);
    }

    pairs
}

/// Decode the escapes of a double-quoted value (without its quotes).
fn unquote(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {}
            '\n' | '"' => return None,
            c => {
                out.push(c);
                continue;
            }
        }

        let escaped = match chars.next()? {
            'a' => '\u{07}',
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{0B}',
            '\\' => '\\',
            '"' => '"',
            'x' => hex_char(&mut chars, 2)?,
            'u' => hex_char(&mut chars, 4)?,
            'U' => hex_char(&mut chars, 8)?,
            _ => return None,
        };
        out.push(escaped);
    }

    Some(out)
}

fn hex_char(chars: &mut core::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut code = 0u32;
    for _ in 0..digits {
        code = code * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(code)
}

/// Split a directive key of the shape `<lowercase><Capitalized>`.
///
/// Returns the source name and the lower-cased parameter name, so `envPrefix`
/// becomes `("env", "prefix")`. The leftmost match wins, mirroring an
/// unanchored `([a-z]+)([A-Z][a-z]+)` search.
pub fn split_param_key(key: &str) -> Option<(String, String)> {
    let bytes = key.as_bytes();
    let mut start = 0;

    while start < bytes.len() {
        if !bytes[start].is_ascii_lowercase() {
            start += 1;
            continue;
        }

        let mut upper = start;
        while upper < bytes.len() && bytes[upper].is_ascii_lowercase() {
            upper += 1;
        }

        let capitalized = upper + 1 < bytes.len()
            && bytes[upper].is_ascii_uppercase()
            && bytes[upper + 1].is_ascii_lowercase();
        if capitalized {
            let mut end = upper + 1;
            while end < bytes.len() && bytes[end].is_ascii_lowercase() {
                end += 1;
            }
            return Some((
                key[start..upper].to_string(),
                key[upper..end].to_ascii_lowercase(),
            ));
        }

        // Every start inside this lowercase run ends at the same place.
        start = upper + 1;
    }

    None
}
