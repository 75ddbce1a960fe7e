//! Engine errors.
//!
//! Classification and identity errors surface before any I/O; store errors
//! pass through from the connection layer unmodified. Nothing is retried
//! and nothing is swallowed.

use modelkv_kv_store::KvError;
use modelkv_schema::{ScalarType, SchemaError};

/// Errors returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The shape could not be classified (unsupported field, cycle,
    /// name collision). Fails before any store operation.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A stored value could not be parsed as the declared field type.
    /// The record is not returned on this path.
    #[error("field '{field}': stored value '{value}' is not a valid {expected}")]
    TypeMismatch {
        field: String,
        expected: ScalarType,
        value: String,
    },

    /// Missing or malformed identity on an operation requiring one.
    /// Fails before any store operation.
    #[error("identity error: {message}")]
    Identity { message: String },

    /// No record under the given root key.
    #[error("no record at key '{key}'")]
    NotFound { key: String },

    /// A record's field map disagrees with its classified plan. This is a
    /// bug in the record type's `Model` implementation.
    #[error("field '{field}' does not match its storage plan")]
    PlanMismatch { field: String },

    /// Store-layer error, passed through from the connection collaborator.
    #[error("store error: {0}")]
    Kv(#[from] KvError),
}
