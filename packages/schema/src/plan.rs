//! The type classifier - shape in, field plan out.
//!
//! Classification is a pure function of the shape: every field maps to a
//! storage kind, embedded shapes are recursed into (cycles rejected), and
//! the flattened field namespace is checked for collisions. A shape with any
//! unmappable field is rejected whole; partial plans are never produced.
//!
//! Plans are cached for the process lifetime. The cache is read-mostly:
//! an immutable `Arc<FieldPlan>` is published once per shape name, and a
//! concurrent race to classify the same shape resolves to the first insert.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;

use crate::{FieldType, ScalarType, SchemaError, Shape, ID_FIELD};

/// How one field is represented in the store.
#[derive(Clone, Debug, PartialEq)]
pub enum StorageKind {
    /// One named value in the root hash.
    Scalar(ScalarType),
    /// Stored as a scalar when present, omitted when absent.
    OptionalScalar(ScalarType),
    /// A list at the field's sub-key; insertion order preserved.
    OrderedSequence(ScalarType),
    /// A set at the field's sub-key; no order guarantees.
    UnorderedSet(ScalarType),
    /// A nested plan whose fields flatten into the parent's namespace.
    EmbeddedRecord(FieldPlan),
    /// A nested plan that may be entirely absent from storage.
    OptionalEmbeddedRecord(FieldPlan),
}

/// One planned field: storage name and kind.
#[derive(Clone, Debug, PartialEq)]
pub struct PlannedField {
    pub name: &'static str,
    pub kind: StorageKind,
}

/// The per-shape storage plan.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldPlan {
    pub shape_name: &'static str,
    pub fields: Vec<PlannedField>,
}

impl FieldPlan {
    /// Every flattened storage name this plan touches: hash field names and
    /// sub-key field names share one namespace under the root key.
    pub fn leaf_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_leaf_names(&mut names);
        names
    }

    fn collect_leaf_names(&self, out: &mut Vec<&'static str>) {
        for field in &self.fields {
            match &field.kind {
                StorageKind::EmbeddedRecord(sub) | StorageKind::OptionalEmbeddedRecord(sub) => {
                    sub.collect_leaf_names(out);
                }
                _ => out.push(field.name),
            }
        }
    }

    /// Names of every ordered-sequence field, including flattened embedded
    /// ones. Each owns a list sub-key.
    pub fn sequence_field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_collection_names(&mut names, true, false);
        names
    }

    /// Names of every unordered-set field. Each owns a set sub-key.
    pub fn set_field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_collection_names(&mut names, false, true);
        names
    }

    /// Names of every field that owns a sub-key.
    pub fn collection_field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        self.collect_collection_names(&mut names, true, true);
        names
    }

    fn collect_collection_names(
        &self,
        out: &mut Vec<&'static str>,
        sequences: bool,
        sets: bool,
    ) {
        for field in &self.fields {
            match &field.kind {
                StorageKind::OrderedSequence(_) if sequences => out.push(field.name),
                StorageKind::UnorderedSet(_) if sets => out.push(field.name),
                StorageKind::EmbeddedRecord(sub) | StorageKind::OptionalEmbeddedRecord(sub) => {
                    sub.collect_collection_names(out, sequences, sets);
                }
                _ => {}
            }
        }
    }
}

/// Classify a shape into its field plan.
///
/// Pure and side-effect free; see [`plan_for`] for the cached entry point.
pub fn classify(shape: &Shape) -> Result<FieldPlan, SchemaError> {
    let mut stack = vec![shape.name];
    let plan = classify_nested(shape, &mut stack)?;

    // Flattening collision check: embedded field names land in the parent's
    // namespace, and `Id` is reserved for the identity.
    let mut seen = HashSet::new();
    for name in plan.leaf_names() {
        if name == ID_FIELD || !seen.insert(name) {
            return Err(SchemaError::FieldCollision {
                shape: shape.name,
                field: name.to_string(),
            });
        }
    }

    Ok(plan)
}

fn classify_nested(
    shape: &Shape,
    stack: &mut Vec<&'static str>,
) -> Result<FieldPlan, SchemaError> {
    let mut fields = Vec::with_capacity(shape.fields.len());

    for field in &shape.fields {
        let kind = match &field.ty {
            FieldType::Scalar(ty) => StorageKind::Scalar(*ty),
            FieldType::OptionalScalar(ty) => StorageKind::OptionalScalar(*ty),
            FieldType::Sequence(ty) => StorageKind::OrderedSequence(*ty),
            FieldType::Set(ty) => StorageKind::UnorderedSet(*ty),
            FieldType::Embedded(shape_fn) => {
                StorageKind::EmbeddedRecord(classify_embedded(shape_fn, stack)?)
            }
            FieldType::OptionalEmbedded(shape_fn) => {
                StorageKind::OptionalEmbeddedRecord(classify_embedded(shape_fn, stack)?)
            }
            FieldType::Opaque { type_name } => {
                return Err(SchemaError::UnsupportedField {
                    shape: shape.name,
                    field: field.name,
                    type_name: *type_name,
                });
            }
        };
        fields.push(PlannedField {
            name: field.name,
            kind,
        });
    }

    Ok(FieldPlan {
        shape_name: shape.name,
        fields,
    })
}

fn classify_embedded(
    shape_fn: &fn() -> Shape,
    stack: &mut Vec<&'static str>,
) -> Result<FieldPlan, SchemaError> {
    let child = shape_fn();
    if stack.contains(&child.name) {
        return Err(SchemaError::CyclicShape {
            shape: stack[0],
            through: child.name,
        });
    }
    stack.push(child.name);
    let plan = classify_nested(&child, stack);
    stack.pop();
    plan
}

lazy_static! {
    static ref PLAN_CACHE: RwLock<HashMap<&'static str, Arc<FieldPlan>>> =
        RwLock::new(HashMap::new());
}

/// Classify a shape, consulting the process-wide plan cache first.
///
/// The cache is keyed by shape name; hits are O(1) lookups. Errors are not
/// cached, so a rejected shape is re-examined on every call.
pub fn plan_for(shape: &Shape) -> Result<Arc<FieldPlan>, SchemaError> {
    {
        let cache = PLAN_CACHE.read().expect("plan cache poisoned");
        if let Some(plan) = cache.get(shape.name) {
            return Ok(Arc::clone(plan));
        }
    }

    let plan = Arc::new(classify(shape)?);
    let mut cache = PLAN_CACHE.write().expect("plan cache poisoned");
    // First insert wins when two threads raced on the same shape.
    Ok(Arc::clone(cache.entry(shape.name).or_insert(plan)))
}
