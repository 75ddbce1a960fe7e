//! The Model trait and the dynamic field representation.
//!
//! A record type declares its shape once and converts between itself and a
//! [`FieldMap`] - a dynamic, plan-shaped view of its field values. The
//! engine only ever sees the map, so no runtime type inspection is needed.

use std::collections::BTreeMap;

use modelkv_schema::{Scalar, Shape};

use crate::Error;

/// The dynamic value of one field, matching its storage kind.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Scalar(Scalar),
    OptionalScalar(Option<Scalar>),
    Sequence(Vec<Scalar>),
    Set(Vec<Scalar>),
    Embedded(FieldMap),
    OptionalEmbedded(Option<FieldMap>),
}

/// Field name to value. Always an independent copy; the engine never shares
/// mutable state between a record and its store representation.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// A storable record type.
///
/// Implementations declare the shape and convert field values both ways.
/// The identity field is handled separately from the map: it is assigned by
/// the engine on first save and immutable afterwards.
///
/// # Example
///
/// ```rust
/// use modelkv_engine::{FieldMap, FieldMapExt, FieldValue, Model};
/// use modelkv_schema::{Scalar, ScalarType, Shape};
///
/// #[derive(Default)]
/// struct Person {
///     id: String,
///     name: String,
/// }
///
/// impl Model for Person {
///     fn shape() -> Shape {
///         Shape::builder("person")
///             .scalar("Name", ScalarType::Text)
///             .build()
///     }
///
///     fn id(&self) -> &str {
///         &self.id
///     }
///
///     fn set_id(&mut self, id: String) {
///         self.id = id;
///     }
///
///     fn encode_fields(&self) -> FieldMap {
///         let mut fields = FieldMap::new();
///         fields.insert("Name".into(), FieldValue::Scalar(self.name.clone().into()));
///         fields
///     }
///
///     fn decode_fields(mut fields: FieldMap) -> Result<Self, modelkv_engine::Error> {
///         Ok(Person {
///             id: String::new(),
///             name: fields.take_scalar("Name")?.into_text().unwrap_or_default(),
///         })
///     }
/// }
/// ```
pub trait Model: Sized {
    /// The declared structural description of this type.
    fn shape() -> Shape;

    /// The record's identity; empty until first save.
    fn id(&self) -> &str;

    /// Assign the identity. Called once by the engine; implementations just
    /// store the string.
    fn set_id(&mut self, id: String);

    /// Copy the record's field values into a map matching the shape.
    fn encode_fields(&self) -> FieldMap;

    /// Build a record from decoded field values. The identity is set by the
    /// engine afterwards.
    fn decode_fields(fields: FieldMap) -> Result<Self, Error>;
}

/// Take-style accessors for `decode_fields` implementations.
///
/// Each helper removes the named entry and errors with
/// [`Error::PlanMismatch`] when the entry is missing or holds a different
/// variant than the shape declared.
pub trait FieldMapExt {
    fn take_scalar(&mut self, name: &str) -> Result<Scalar, Error>;
    fn take_optional_scalar(&mut self, name: &str) -> Result<Option<Scalar>, Error>;
    fn take_sequence(&mut self, name: &str) -> Result<Vec<Scalar>, Error>;
    fn take_set(&mut self, name: &str) -> Result<Vec<Scalar>, Error>;
    fn take_embedded(&mut self, name: &str) -> Result<FieldMap, Error>;
    fn take_optional_embedded(&mut self, name: &str) -> Result<Option<FieldMap>, Error>;
}

fn mismatch(name: &str) -> Error {
    Error::PlanMismatch {
        field: name.to_string(),
    }
}

impl FieldMapExt for FieldMap {
    fn take_scalar(&mut self, name: &str) -> Result<Scalar, Error> {
        match self.remove(name) {
            Some(FieldValue::Scalar(s)) => Ok(s),
            _ => Err(mismatch(name)),
        }
    }

    fn take_optional_scalar(&mut self, name: &str) -> Result<Option<Scalar>, Error> {
        match self.remove(name) {
            Some(FieldValue::OptionalScalar(s)) => Ok(s),
            _ => Err(mismatch(name)),
        }
    }

    fn take_sequence(&mut self, name: &str) -> Result<Vec<Scalar>, Error> {
        match self.remove(name) {
            Some(FieldValue::Sequence(items)) => Ok(items),
            _ => Err(mismatch(name)),
        }
    }

    fn take_set(&mut self, name: &str) -> Result<Vec<Scalar>, Error> {
        match self.remove(name) {
            Some(FieldValue::Set(members)) => Ok(members),
            _ => Err(mismatch(name)),
        }
    }

    fn take_embedded(&mut self, name: &str) -> Result<FieldMap, Error> {
        match self.remove(name) {
            Some(FieldValue::Embedded(map)) => Ok(map),
            _ => Err(mismatch(name)),
        }
    }

    fn take_optional_embedded(&mut self, name: &str) -> Result<Option<FieldMap>, Error> {
        match self.remove(name) {
            Some(FieldValue::OptionalEmbedded(map)) => Ok(map),
            _ => Err(mismatch(name)),
        }
    }
}
