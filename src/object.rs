//! PDF object model used when assembling label documents.

use std::collections::HashMap;

/// Dictionary entries, serialized in key order.
pub type Dictionary = HashMap<String, Object>;

/// PDF object representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    /// Null object
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integer value
    Integer(i64),
    /// Real (floating-point) value
    Real(f64),
    /// String (byte array)
    String(Vec<u8>),
    /// Name (without the leading /)
    Name(String),
    /// Array of objects
    Array(Vec<Object>),
    /// Dictionary (key-value pairs)
    Dictionary(Dictionary),
    /// Stream (dictionary + data)
    Stream {
        /// Stream dictionary
        dict: Dictionary,
        /// Stream data
        data: bytes::Bytes,
    },
    /// Indirect object reference
    Reference(ObjectRef),
}

/// Reference to an indirect object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef {
    /// Object number
    pub id: u32,
    /// Generation number
    pub gen: u16,
}

impl ObjectRef {
    /// Create a new object reference.
    pub fn new(id: u32, gen: u16) -> Self {
        Self { id, gen }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.id, self.gen)
    }
}

impl Object {
    /// Name object.
    pub fn name(s: &str) -> Self {
        Object::Name(s.to_string())
    }

    /// Literal string object from text.
    pub fn text(s: &str) -> Self {
        Object::String(s.as_bytes().to_vec())
    }

    /// Reference to object `id`, generation 0.
    pub fn reference(id: u32) -> Self {
        Object::Reference(ObjectRef::new(id, 0))
    }

    /// Dictionary from `(key, value)` pairs.
    pub fn dict(entries: Vec<(&str, Object)>) -> Self {
        Object::Dictionary(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    /// Stream with the given extra dictionary entries.
    pub fn stream(entries: Vec<(&str, Object)>, data: Vec<u8>) -> Self {
        Object::Stream {
            dict: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            data: bytes::Bytes::from(data),
        }
    }

    /// Rectangle `[llx lly urx ury]` from origin and size.
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Object::Array(vec![
            Object::Real(x),
            Object::Real(y),
            Object::Real(x + width),
            Object::Real(y + height),
        ])
    }

    /// Try to cast to integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Object::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to cast to name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Object::Name(s) => Some(s),
            _ => None,
        }
    }

    /// Try to cast to dictionary. Works for both Dictionary and Stream objects.
    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Object::Dictionary(d) => Some(d),
            Object::Stream { dict, .. } => Some(dict),
            _ => None,
        }
    }

    /// Try to cast to array.
    pub fn as_array(&self) -> Option<&[Object]> {
        match self {
            Object::Array(arr) => Some(arr),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(Object::name("Font").as_name(), Some("Font"));
        assert_eq!(Object::text("Hi"), Object::String(b"Hi".to_vec()));
        assert_eq!(Object::reference(7), Object::Reference(ObjectRef::new(7, 0)));
    }

    #[test]
    fn test_dict_and_stream_access() {
        let dict = Object::dict(vec![("Type", Object::name("Page"))]);
        assert_eq!(dict.as_dict().unwrap()["Type"].as_name(), Some("Page"));

        let stream = Object::stream(vec![("Length1", Object::Integer(3))], b"abc".to_vec());
        assert_eq!(stream.as_dict().unwrap()["Length1"].as_integer(), Some(3));
        assert!(stream.as_array().is_none());
    }

    #[test]
    fn test_rect() {
        let rect = Object::rect(0.0, 0.0, 162.0, 90.0);
        let values: Vec<_> = rect.as_array().unwrap().to_vec();
        assert_eq!(values[2], Object::Real(162.0));
        assert_eq!(values[3], Object::Real(90.0));
    }

    #[test]
    fn test_object_ref_display() {
        assert_eq!(ObjectRef::new(10, 0).to_string(), "10 0 R");
    }
}
