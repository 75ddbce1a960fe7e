//! Shape descriptions - the static structure of a record type.
//!
//! A shape is declared once per record type through the builder API. Nothing
//! here inspects Rust types at runtime; the declaration is the single source
//! of truth the classifier works from.

use crate::ScalarType;

/// The declared type of one field.
#[derive(Clone, Debug)]
pub enum FieldType {
    /// A single primitive value.
    Scalar(ScalarType),
    /// A nullable primitive; absence is a valid state.
    OptionalScalar(ScalarType),
    /// An ordered sequence of primitives.
    Sequence(ScalarType),
    /// An unordered collection of primitives.
    Set(ScalarType),
    /// A nested shape stored by value, flattened into the parent.
    ///
    /// The shape is referenced through a function pointer so declarations
    /// stay `'static` and the classifier can walk the embedding graph.
    Embedded(fn() -> Shape),
    /// A nested shape that may be absent.
    OptionalEmbedded(fn() -> Shape),
    /// A declared field whose static type has no storage mapping
    /// (function values, channels, maps with non-primitive values, ...).
    /// Classification of the whole shape fails when one is present.
    Opaque { type_name: &'static str },
}

/// One declared field: a name and its type.
#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: &'static str,
    pub ty: FieldType,
}

/// The static structural description of a record type.
#[derive(Clone, Debug)]
pub struct Shape {
    pub name: &'static str,
    pub fields: Vec<FieldDef>,
}

impl Shape {
    /// Start declaring a shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use modelkv_schema::{ScalarType, Shape};
    ///
    /// let shape = Shape::builder("person")
    ///     .scalar("Name", ScalarType::Text)
    ///     .scalar("Age", ScalarType::Int)
    ///     .sequence("Tags", ScalarType::Text)
    ///     .build();
    /// assert_eq!(shape.fields.len(), 3);
    /// ```
    pub fn builder(name: &'static str) -> ShapeBuilder {
        ShapeBuilder {
            name,
            fields: Vec::new(),
        }
    }
}

/// Builder for [`Shape`].
pub struct ShapeBuilder {
    name: &'static str,
    fields: Vec<FieldDef>,
}

impl ShapeBuilder {
    fn field(mut self, name: &'static str, ty: FieldType) -> Self {
        self.fields.push(FieldDef { name, ty });
        self
    }

    pub fn scalar(self, name: &'static str, ty: ScalarType) -> Self {
        self.field(name, FieldType::Scalar(ty))
    }

    pub fn optional_scalar(self, name: &'static str, ty: ScalarType) -> Self {
        self.field(name, FieldType::OptionalScalar(ty))
    }

    pub fn sequence(self, name: &'static str, ty: ScalarType) -> Self {
        self.field(name, FieldType::Sequence(ty))
    }

    pub fn set(self, name: &'static str, ty: ScalarType) -> Self {
        self.field(name, FieldType::Set(ty))
    }

    pub fn embedded(self, name: &'static str, shape: fn() -> Shape) -> Self {
        self.field(name, FieldType::Embedded(shape))
    }

    pub fn optional_embedded(self, name: &'static str, shape: fn() -> Shape) -> Self {
        self.field(name, FieldType::OptionalEmbedded(shape))
    }

    pub fn opaque(self, name: &'static str, type_name: &'static str) -> Self {
        self.field(name, FieldType::Opaque { type_name })
    }

    pub fn build(self) -> Shape {
        Shape {
            name: self.name,
            fields: self.fields,
        }
    }
}
