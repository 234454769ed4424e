//! Plist codec
//!
//! Reader and writer for the compact plist dialect of the save sections.
//!
//! ## Value Tags
//! - `<s>`: string (`<s />` is the empty string)
//! - `<i>`: integer
//! - `<r>`: real
//! - `<t />` / `<f />`: booleans
//! - `<d>`: nested dict (`<dict>` accepted too)
//!
//! Sequences have no tag of their own; they are written as a pseudo-array
//! dict (`_isArr` marker plus `k_0`, `k_1`, ...). Null values are skipped.
//!
//! Dicts nested deeper than [`MAX_DEPTH`] (root included) are rejected.

use serde_json::{Number, Value};

use super::{Codec, Mapping};
use crate::error::{Result, SaveError};
use crate::keys::{ARRAY_MARKER, ARRAY_PREFIX};

const XML_PROLOG: &str = r#"<?xml version="1.0"?>"#;
const PLIST_OPEN: &str = r#"<plist version="1.0" gjver="2.0">"#;
const PLIST_CLOSE: &str = "</plist>";

/// Deepest dict nesting the reader accepts
pub const MAX_DEPTH: usize = 256;

/// Codec for the plist dialect used by both save sections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlistCodec;

impl Codec for PlistCodec {
    fn decode(&self, bytes: &[u8]) -> Result<Mapping> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| SaveError::Decode(format!("invalid UTF-8: {}", e)))?;
        Reader::new(text).document()
    }

    fn encode(&self, map: &Mapping) -> String {
        let mut out = String::with_capacity(64 + map.len() * 32);
        out.push_str(XML_PROLOG);
        out.push_str(PLIST_OPEN);
        write_dict(&mut out, "dict", map);
        out.push_str(PLIST_CLOSE);
        out
    }
}

// =============================================================================
// Writer
// =============================================================================

fn write_dict(out: &mut String, tag: &str, map: &Mapping) {
    if map.is_empty() {
        out.push('<');
        out.push_str(tag);
        out.push_str(" />");
        return;
    }

    out.push('<');
    out.push_str(tag);
    out.push('>');
    for (key, value) in map {
        write_entry(out, key, value);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_entry(out: &mut String, key: &str, value: &Value) {
    if value.is_null() {
        return;
    }
    out.push_str("<k>");
    escape_into(out, key);
    out.push_str("</k>");
    write_value(out, value);
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(true) => out.push_str("<t />"),
        Value::Bool(false) => out.push_str("<f />"),
        Value::Number(n) => {
            let tag = if n.is_f64() { "r" } else { "i" };
            out.push('<');
            out.push_str(tag);
            out.push('>');
            out.push_str(&n.to_string());
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Value::String(s) => {
            out.push_str("<s>");
            escape_into(out, s);
            out.push_str("</s>");
        }
        Value::Object(map) => write_dict(out, "d", map),
        Value::Array(items) => {
            out.push_str("<d>");
            write_entry(out, ARRAY_MARKER, &Value::Bool(true));
            for (index, item) in items.iter().enumerate() {
                write_entry(out, &format!("{}{}", ARRAY_PREFIX, index), item);
            }
            out.push_str("</d>");
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

// =============================================================================
// Reader
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct Tag<'a> {
    name: &'a str,
    kind: TagKind,
}

/// Cursor over the document text
struct Reader<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0, depth: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn error(&self, message: impl Into<String>) -> SaveError {
        SaveError::Decode(format!("{} at byte {}", message.into(), self.pos))
    }

    /// Skip whitespace, a leading BOM, and NUL padding
    fn skip_ws(&mut self) {
        let rest = self.rest();
        let trimmed =
            rest.trim_start_matches(|c: char| c.is_whitespace() || c == '\u{feff}' || c == '\0');
        self.pos += rest.len() - trimmed.len();
    }

    /// Parse a whole document: optional declaration, `<plist>`, root dict
    fn document(mut self) -> Result<Mapping> {
        self.skip_ws();
        if self.rest().starts_with("<?") {
            let end = self
                .rest()
                .find("?>")
                .ok_or_else(|| self.error("unterminated XML declaration"))?;
            self.pos += end + 2;
            self.skip_ws();
        }

        let plist = self.tag()?;
        if plist.name != "plist" || plist.kind != TagKind::Open {
            return Err(self.error(format!("expected <plist>, found <{}>", plist.name)));
        }

        self.skip_ws();
        let root = self.tag()?;
        let map = match (root.name, root.kind) {
            ("dict" | "d", TagKind::Open) => self.dict_body()?,
            ("dict" | "d", TagKind::Empty) => Mapping::new(),
            (name, _) => {
                return Err(self.error(format!("expected root <dict>, found <{}>", name)));
            }
        };

        self.skip_ws();
        self.close("plist")?;
        self.skip_ws();
        if !self.rest().is_empty() {
            return Err(self.error("trailing data after </plist>"));
        }

        Ok(map)
    }

    fn tag(&mut self) -> Result<Tag<'a>> {
        let rest = self.rest();
        if !rest.starts_with('<') {
            return Err(self.error("expected a tag"));
        }
        let end = rest.find('>').ok_or_else(|| self.error("unterminated tag"))?;
        let inner = &rest[1..end];
        self.pos += end + 1;

        let (inner, closing) = match inner.strip_prefix('/') {
            Some(stripped) => (stripped, true),
            None => (inner, false),
        };
        let (inner, empty) = match inner.strip_suffix('/') {
            Some(stripped) => (stripped, true),
            None => (inner, false),
        };
        let name = inner.split_whitespace().next().unwrap_or("");

        if name.is_empty() || (closing && empty) {
            return Err(self.error(format!("malformed tag <{}>", inner)));
        }

        let kind = if closing {
            TagKind::Close
        } else if empty {
            TagKind::Empty
        } else {
            TagKind::Open
        };
        Ok(Tag { name, kind })
    }

    fn close(&mut self, name: &str) -> Result<()> {
        let tag = self.tag()?;
        if tag.kind != TagKind::Close || tag.name != name {
            return Err(self.error(format!("expected </{}>, found <{}>", name, tag.name)));
        }
        Ok(())
    }

    fn text(&mut self) -> Result<String> {
        let rest = self.rest();
        let end = rest.find('<').ok_or_else(|| self.error("unterminated text"))?;
        self.pos += end;
        unescape(&rest[..end]).ok_or_else(|| self.error("invalid entity reference"))
    }

    /// Parse `<k>..</k><value>` pairs up to the closing dict tag
    fn dict_body(&mut self) -> Result<Mapping> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!("nesting too deep (limit {})", MAX_DEPTH)));
        }
        self.depth += 1;
        let map = self.dict_entries();
        self.depth -= 1;
        map
    }

    fn dict_entries(&mut self) -> Result<Mapping> {
        let mut map = Mapping::new();
        loop {
            self.skip_ws();
            let tag = self.tag()?;
            match (tag.name, tag.kind) {
                ("dict" | "d", TagKind::Close) => return Ok(map),
                ("k", TagKind::Open) => {
                    let key = self.text()?;
                    self.close("k")?;
                    self.skip_ws();
                    let value = self.value()?;
                    map.insert(key, value);
                }
                (name, _) => {
                    return Err(self.error(format!("expected <k>, found <{}>", name)));
                }
            }
        }
    }

    fn value(&mut self) -> Result<Value> {
        let tag = self.tag()?;
        let value = match (tag.name, tag.kind) {
            ("s", TagKind::Open) => {
                let text = self.text()?;
                self.close("s")?;
                Value::String(text)
            }
            ("s", TagKind::Empty) => Value::String(String::new()),
            ("i", TagKind::Open) => {
                let raw = self.text()?;
                self.close("i")?;
                let number = parse_integer(raw.trim())
                    .ok_or_else(|| self.error(format!("invalid integer {:?}", raw)))?;
                Value::Number(number)
            }
            ("r", TagKind::Open) => {
                let raw = self.text()?;
                self.close("r")?;
                let number = parse_real(raw.trim())
                    .ok_or_else(|| self.error(format!("invalid real {:?}", raw)))?;
                Value::Number(number)
            }
            ("t", TagKind::Empty) => Value::Bool(true),
            ("t", TagKind::Open) => {
                self.close("t")?;
                Value::Bool(true)
            }
            ("f", TagKind::Empty) => Value::Bool(false),
            ("f", TagKind::Open) => {
                self.close("f")?;
                Value::Bool(false)
            }
            ("d" | "dict", TagKind::Open) => Value::Object(self.dict_body()?),
            ("d" | "dict", TagKind::Empty) => Value::Object(Mapping::new()),
            (name, _) => {
                return Err(self.error(format!("unexpected value tag <{}>", name)));
            }
        };
        Ok(value)
    }
}

fn parse_integer(raw: &str) -> Option<Number> {
    raw.parse::<i64>()
        .map(Number::from)
        .or_else(|_| raw.parse::<u64>().map(Number::from))
        .ok()
}

fn parse_real(raw: &str) -> Option<Number> {
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Resolve the five XML entities and numeric character references
fn unescape(raw: &str) -> Option<String> {
    if !raw.contains('&') {
        return Some(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find(';')?;
        let entity = &after[..end];
        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = match entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                {
                    Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                    None => entity.strip_prefix('#')?.parse::<u32>().ok()?,
                };
                char::from_u32(code)?
            }
        };
        out.push(decoded);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Some(out)
}
