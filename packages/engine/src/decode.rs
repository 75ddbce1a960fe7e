//! The decoder - raw store values + plan -> fresh record fields.
//!
//! Decoding starts from nothing and populates a new field map per the plan.
//! Absence is meaningful, never an error: a missing hash field decodes to
//! the type's zero value, a missing sub-key to an empty collection, and an
//! optional embedded record with no stored fields stays absent.

use std::collections::BTreeMap;

use modelkv_schema::{FieldPlan, ScalarType, StorageKind};

use crate::{Error, FieldMap, FieldValue};

/// Raw values retrieved for one record, keyed by field name.
///
/// The store layer reads the root hash and each collection sub-key; this
/// type is what crosses into the decoder. Sub-key contents are indexed by
/// field name because the sub-key itself is a deterministic function of
/// root + field name.
#[derive(Clone, Debug, Default)]
pub struct RawRecord {
    pub hash: BTreeMap<String, String>,
    pub lists: BTreeMap<String, Vec<String>>,
    pub sets: BTreeMap<String, Vec<String>>,
}

impl RawRecord {
    fn contains_field(&self, name: &str) -> bool {
        self.hash.contains_key(name)
            || self.lists.contains_key(name)
            || self.sets.contains_key(name)
    }
}

/// Decode raw values into a fresh field map per the plan.
///
/// Fails with [`Error::TypeMismatch`] when a stored value does not parse as
/// the declared type; no partially populated map is returned on that path.
pub fn decode(plan: &FieldPlan, raw: &RawRecord) -> Result<FieldMap, Error> {
    let mut fields = FieldMap::new();

    for planned in &plan.fields {
        let value = match &planned.kind {
            StorageKind::Scalar(ty) => match raw.hash.get(planned.name) {
                Some(stored) => FieldValue::Scalar(parse_scalar(planned.name, *ty, stored)?),
                None => FieldValue::Scalar(ty.zero()),
            },
            StorageKind::OptionalScalar(ty) => match raw.hash.get(planned.name) {
                Some(stored) => {
                    FieldValue::OptionalScalar(Some(parse_scalar(planned.name, *ty, stored)?))
                }
                None => FieldValue::OptionalScalar(None),
            },
            StorageKind::OrderedSequence(ty) => {
                let stored = raw.lists.get(planned.name);
                FieldValue::Sequence(parse_all(planned.name, *ty, stored)?)
            }
            StorageKind::UnorderedSet(ty) => {
                let stored = raw.sets.get(planned.name);
                FieldValue::Set(parse_all(planned.name, *ty, stored)?)
            }
            StorageKind::EmbeddedRecord(sub) => FieldValue::Embedded(decode(sub, raw)?),
            // Presence is inferred from stored fields, so an optional
            // embedded record whose fields were all absent or empty wrote
            // nothing and reads back as `None`, not `Some(zeroed)`.
            StorageKind::OptionalEmbeddedRecord(sub) => {
                if sub.leaf_names().iter().any(|name| raw.contains_field(name)) {
                    FieldValue::OptionalEmbedded(Some(decode(sub, raw)?))
                } else {
                    FieldValue::OptionalEmbedded(None)
                }
            }
        };
        fields.insert(planned.name.to_string(), value);
    }

    Ok(fields)
}

fn parse_scalar(
    field: &str,
    ty: ScalarType,
    stored: &str,
) -> Result<modelkv_schema::Scalar, Error> {
    ty.parse(stored).map_err(|e| Error::TypeMismatch {
        field: field.to_string(),
        expected: e.expected,
        value: e.value,
    })
}

fn parse_all(
    field: &str,
    ty: ScalarType,
    stored: Option<&Vec<String>>,
) -> Result<Vec<modelkv_schema::Scalar>, Error> {
    match stored {
        None => Ok(Vec::new()),
        Some(items) => items
            .iter()
            .map(|item| parse_scalar(field, ty, item))
            .collect(),
    }
}
