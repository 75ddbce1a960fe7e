//! modelkv schema layer.
//!
//! This layer gives meaning to a record type without reflection:
//! - `Scalar` / `ScalarType`: the closed set of storable primitives
//! - `Shape`: a declared structural description of a record type
//! - `FieldPlan`: the per-field storage-kind plan classified from a shape
//! - key naming: the `shape:id` / `shape:id:field` namespace
//!
//! Shapes are declared once per record type through [`Shape::builder`] and
//! classified into plans by [`plan_for`], which caches the result for the
//! process lifetime.

mod error;
mod key;
mod plan;
mod scalar;
mod shape;

pub use error::SchemaError;
pub use key::{root_key, sub_key, ID_FIELD};
pub use plan::{classify, plan_for, FieldPlan, PlannedField, StorageKind};
pub use scalar::{Scalar, ScalarParseError, ScalarType};
pub use shape::{FieldDef, FieldType, Shape, ShapeBuilder};
