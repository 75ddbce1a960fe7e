//! Identity management.
//!
//! Every record gets one opaque string identifier that namespaces its keys.
//! Ids are UUIDv4 in simple form, so collisions across the process lifetime
//! are vanishingly unlikely.

use uuid::Uuid;

use crate::Model;

/// Generate a fresh opaque identifier.
pub fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Assign an identity if the record has none, and return it.
///
/// Idempotent: a record that already carries an id keeps it.
pub fn ensure_id<M: Model>(model: &mut M) -> String {
    if model.id().is_empty() {
        let id = new_id();
        model.set_id(id.clone());
        id
    } else {
        model.id().to_string()
    }
}

/// Check an identifier before it reaches the store.
///
/// Empty ids carry no namespace; `:` and whitespace would corrupt the
/// `shape:id:field` key scheme.
pub fn validate_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(':') && !id.chars().any(char::is_whitespace)
}
