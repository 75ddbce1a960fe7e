//! Classification errors.
//!
//! All of these surface before any store I/O happens: a shape that cannot be
//! represented is rejected whole, never partially planned.

/// Errors produced while classifying a shape into a field plan.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A field's declared type has no storage mapping.
    #[error("shape '{shape}' field '{field}': type '{type_name}' has no storage mapping")]
    UnsupportedField {
        shape: &'static str,
        field: &'static str,
        type_name: &'static str,
    },

    /// The embedding graph contains a cycle.
    #[error("shape '{shape}' embeds itself (cycle through '{through}')")]
    CyclicShape {
        shape: &'static str,
        through: &'static str,
    },

    /// Two flattened fields would share a storage name, or a field uses the
    /// reserved identity name.
    #[error("shape '{shape}': flattened field name '{field}' collides")]
    FieldCollision { shape: &'static str, field: String },
}
