//! The scalar value set - the primitives a field can store.
//!
//! The store is string-native, so every scalar has a canonical string form:
//! `Display` round-trip forms for numbers, `true`/`false` for booleans, raw
//! UTF-8 for text, and standard base64 for blobs.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// The closed set of storable primitive types.
///
/// Anything outside this set has no storage mapping and must be declared
/// `Opaque` in its shape, which rejects the shape at classification time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScalarType {
    Bool,
    Int,
    Uint,
    Float,
    Text,
    Blob,
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::Bool => "bool",
            ScalarType::Int => "int",
            ScalarType::Uint => "uint",
            ScalarType::Float => "float",
            ScalarType::Text => "text",
            ScalarType::Blob => "blob",
        };
        write!(f, "{}", name)
    }
}

/// A stored value failed to parse as its declared scalar type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("value '{value}' is not a valid {expected}")]
pub struct ScalarParseError {
    pub expected: ScalarType,
    pub value: String,
}

/// One primitive value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl Scalar {
    /// The type this value belongs to.
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Scalar::Bool(_) => ScalarType::Bool,
            Scalar::Int(_) => ScalarType::Int,
            Scalar::Uint(_) => ScalarType::Uint,
            Scalar::Float(_) => ScalarType::Float,
            Scalar::Text(_) => ScalarType::Text,
            Scalar::Blob(_) => ScalarType::Blob,
        }
    }

    /// Canonical string form for the store.
    ///
    /// Numeric `Display` in Rust prints the shortest representation that
    /// parses back to the same value, so `parse` inverts this exactly.
    pub fn to_store_string(&self) -> String {
        match self {
            Scalar::Bool(b) => b.to_string(),
            Scalar::Int(i) => i.to_string(),
            Scalar::Uint(u) => u.to_string(),
            Scalar::Float(x) => x.to_string(),
            Scalar::Text(s) => s.clone(),
            Scalar::Blob(b) => STANDARD.encode(b),
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Scalar::Uint(u) => Some(*u),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<String> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_blob(self) -> Option<Vec<u8>> {
        match self {
            Scalar::Blob(b) => Some(b),
            _ => None,
        }
    }
}

impl ScalarType {
    /// The zero value of this type, used when a stored field is absent.
    pub fn zero(&self) -> Scalar {
        match self {
            ScalarType::Bool => Scalar::Bool(false),
            ScalarType::Int => Scalar::Int(0),
            ScalarType::Uint => Scalar::Uint(0),
            ScalarType::Float => Scalar::Float(0.0),
            ScalarType::Text => Scalar::Text(String::new()),
            ScalarType::Blob => Scalar::Blob(Vec::new()),
        }
    }

    /// Parse a stored string back into a value of this type.
    pub fn parse(&self, s: &str) -> Result<Scalar, ScalarParseError> {
        let mismatch = || ScalarParseError {
            expected: *self,
            value: s.to_string(),
        };
        match self {
            ScalarType::Bool => s.parse().map(Scalar::Bool).map_err(|_| mismatch()),
            ScalarType::Int => s.parse().map(Scalar::Int).map_err(|_| mismatch()),
            ScalarType::Uint => s.parse().map(Scalar::Uint).map_err(|_| mismatch()),
            ScalarType::Float => s.parse().map(Scalar::Float).map_err(|_| mismatch()),
            ScalarType::Text => Ok(Scalar::Text(s.to_string())),
            ScalarType::Blob => STANDARD.decode(s).map(Scalar::Blob).map_err(|_| mismatch()),
        }
    }
}

// Conversion from common types

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::Int(v as i64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar::Uint(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Text(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Text(v.to_string())
    }
}

impl From<Vec<u8>> for Scalar {
    fn from(v: Vec<u8>) -> Self {
        Scalar::Blob(v)
    }
}
