//! modelkv engine: the typed layer.
//!
//! Record types implement [`Model`] (a declared shape plus field
//! conversion); the engine does the rest:
//! - [`encode`]: record fields + plan -> store write operations
//! - [`decode`]: raw store values + plan -> fresh record fields
//! - identity management: one opaque id per record, assigned on first save
//! - [`loose_equals`]: structural comparison tolerant of set ordering
//! - [`ModelStore`]: save / scan / find / delete against a pooled store
//!
//! The engine is stateless per call except for the schema layer's plan
//! cache; all I/O goes through one pooled connection per operation.

mod compare;
mod decode;
mod encode;
mod error;
mod identity;
mod model;
mod store;

pub use compare::loose_equals;
pub use decode::{decode, RawRecord};
pub use encode::{encode, WriteOp};
pub use error::Error;
pub use identity::{ensure_id, new_id, validate_id};
pub use model::{FieldMap, FieldMapExt, FieldValue, Model};
pub use store::ModelStore;

// The schema vocabulary is part of this crate's public surface.
pub use modelkv_schema::{
    root_key, sub_key, FieldPlan, Scalar, ScalarType, SchemaError, Shape, StorageKind, ID_FIELD,
};
