//! PDF object serialization.
//!
//! Serializes [`Object`] values to their byte representation according to
//! PDF specification ISO 32000-1:2008 Section 7.3.

use crate::object::{Dictionary, Object};
use std::io::{self, Write};

/// Format a number for PDF output: integers without a fraction, reals with
/// at most 4 decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let formatted = format!("{:.4}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Serializer for PDF objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectSerializer;

impl ObjectSerializer {
    /// Create a serializer. Output is compact: single spaces between tokens.
    pub fn new() -> Self {
        Self
    }

    /// Serialize an object to bytes.
    pub fn serialize(&self, obj: &Object) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_object(&mut buf, obj)?;
        Ok(buf)
    }

    /// Serialize an object to a string (for tests and debugging).
    pub fn serialize_to_string(&self, obj: &Object) -> io::Result<String> {
        Ok(String::from_utf8_lossy(&self.serialize(obj)?).into_owned())
    }

    /// Write an indirect object definition: `{id} 0 obj\n{object}\nendobj\n`.
    pub fn write_indirect<W: Write>(&self, w: &mut W, id: u32, obj: &Object) -> io::Result<()> {
        writeln!(w, "{} 0 obj", id)?;
        self.write_object(w, obj)?;
        write!(w, "\nendobj\n")
    }

    /// Write an object.
    pub fn write_object<W: Write>(&self, w: &mut W, obj: &Object) -> io::Result<()> {
        match obj {
            Object::Null => write!(w, "null"),
            Object::Boolean(b) => write!(w, "{}", b),
            Object::Integer(i) => write!(w, "{}", i),
            Object::Real(r) => write!(w, "{}", format_number(*r)),
            Object::String(s) => write_string(w, s),
            Object::Name(n) => write_name(w, n),
            Object::Array(arr) => self.write_array(w, arr),
            Object::Dictionary(dict) => self.write_dictionary(w, dict),
            Object::Stream { dict, data } => self.write_stream(w, dict, data),
            Object::Reference(r) => write!(w, "{}", r),
        }
    }

    fn write_array<W: Write>(&self, w: &mut W, arr: &[Object]) -> io::Result<()> {
        write!(w, "[")?;
        for (i, obj) in arr.iter().enumerate() {
            if i > 0 {
                write!(w, " ")?;
            }
            self.write_object(w, obj)?;
        }
        write!(w, "]")
    }

    fn write_dictionary<W: Write>(&self, w: &mut W, dict: &Dictionary) -> io::Result<()> {
        write!(w, "<<")?;

        // Sort keys for deterministic output
        let mut keys: Vec<_> = dict.keys().collect();
        keys.sort();

        for key in keys {
            write!(w, " ")?;
            write_name(w, key)?;
            write!(w, " ")?;
            self.write_object(w, &dict[key])?;
        }

        if !dict.is_empty() {
            write!(w, " ")?;
        }
        write!(w, ">>")
    }

    fn write_stream<W: Write>(&self, w: &mut W, dict: &Dictionary, data: &[u8]) -> io::Result<()> {
        let mut dict = dict.clone();
        dict.insert("Length".to_string(), Object::Integer(data.len() as i64));

        self.write_dictionary(w, &dict)?;
        write!(w, "\nstream\n")?;
        w.write_all(data)?;
        write!(w, "\nendstream")
    }
}

/// Literal `(...)` for printable ASCII, hex `<...>` otherwise.
fn write_string<W: Write>(w: &mut W, data: &[u8]) -> io::Result<()> {
    let is_printable = data.iter().all(|&b| (0x20..=0x7E).contains(&b));

    if is_printable {
        write!(w, "(")?;
        w.write_all(&escape_literal(data))?;
        write!(w, ")")
    } else {
        write!(w, "<")?;
        for byte in data {
            write!(w, "{:02X}", byte)?;
        }
        write!(w, ">")
    }
}

/// Escape `(`, `)` and `\` for a literal string.
pub fn escape_literal(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &byte in data {
        if matches!(byte, b'(' | b')' | b'\\') {
            out.push(b'\\');
        }
        out.push(byte);
    }
    out
}

/// Names start with `/` and escape delimiters and non-regular bytes as `#xx`.
fn write_name<W: Write>(w: &mut W, name: &str) -> io::Result<()> {
    write!(w, "/")?;
    for byte in name.bytes() {
        let regular = (0x21..=0x7E).contains(&byte)
            && !matches!(byte, b'#' | b'/' | b'%' | b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'{' | b'}');
        if regular {
            w.write_all(&[byte])?;
        } else {
            write!(w, "#{:02X}", byte)?;
        }
    }
    Ok(())
}
