//! Key naming - the record namespace in the store.
//!
//! A record owns the root key `<shapeName>:<id>` (a hash holding its scalar
//! fields and the reserved `Id` field) and one sub-key
//! `<shapeName>:<id>:<fieldName>` per sequence or set field. Sub-keys are
//! deterministic functions of root + field name only.

/// Reserved hash field holding the record's identity.
///
/// Written on every save so the root key exists even for records whose only
/// declared fields are lists or sets. Shapes may not declare a field with
/// this name.
pub const ID_FIELD: &str = "Id";

/// The primary namespace key for a record.
pub fn root_key(shape_name: &str, id: &str) -> String {
    format!("{}:{}", shape_name, id)
}

/// The key for a non-scalar field, derived from the root key.
pub fn sub_key(root: &str, field_name: &str) -> String {
    format!("{}:{}", root, field_name)
}
