//! The encoder - record fields + plan -> store write operations.
//!
//! Encoding walks the plan, not the map, so every declared field is visited
//! exactly once and nothing outside the plan leaks into the store. The root
//! hash always carries the reserved `Id` field, which keeps the root key
//! present even for records whose only fields are lists or sets.

use modelkv_schema::{root_key, sub_key, FieldPlan, ScalarType, StorageKind, ID_FIELD};

use crate::{Error, FieldMap, FieldValue};

/// One store write operation, in application order.
#[derive(Clone, Debug, PartialEq)]
pub enum WriteOp {
    /// Set named fields in the hash at `key`.
    SetHashFields {
        key: String,
        fields: Vec<(String, String)>,
    },
    /// Append items to the list at `key`, in order.
    PushList { key: String, items: Vec<String> },
    /// Add members to the set at `key`.
    AddSetMembers { key: String, members: Vec<String> },
}

/// Encode a record's fields into write operations.
///
/// Absent optional fields and empty sequences/sets emit nothing; the decoder
/// reads their absence back as empty/none. Never mutates its inputs. The
/// only failure mode after successful classification is a field map that
/// disagrees with the plan, which is a `Model` implementation bug.
pub fn encode(plan: &FieldPlan, id: &str, fields: &FieldMap) -> Result<Vec<WriteOp>, Error> {
    let root = root_key(plan.shape_name, id);
    let mut hash_fields = vec![(ID_FIELD.to_string(), id.to_string())];
    let mut collection_ops = Vec::new();

    encode_into(plan, &root, fields, &mut hash_fields, &mut collection_ops)?;

    let mut ops = Vec::with_capacity(collection_ops.len() + 1);
    ops.push(WriteOp::SetHashFields {
        key: root,
        fields: hash_fields,
    });
    ops.extend(collection_ops);
    Ok(ops)
}

fn encode_into(
    plan: &FieldPlan,
    root: &str,
    fields: &FieldMap,
    hash_fields: &mut Vec<(String, String)>,
    ops: &mut Vec<WriteOp>,
) -> Result<(), Error> {
    for planned in &plan.fields {
        let value = fields.get(planned.name);
        match (&planned.kind, value) {
            (StorageKind::Scalar(ty), Some(FieldValue::Scalar(s))) => {
                hash_fields.push((planned.name.to_string(), scalar_string(planned.name, *ty, s)?));
            }
            (StorageKind::OptionalScalar(ty), Some(FieldValue::OptionalScalar(opt))) => {
                if let Some(s) = opt {
                    hash_fields
                        .push((planned.name.to_string(), scalar_string(planned.name, *ty, s)?));
                }
            }
            (StorageKind::OrderedSequence(ty), Some(FieldValue::Sequence(items))) => {
                if !items.is_empty() {
                    ops.push(WriteOp::PushList {
                        key: sub_key(root, planned.name),
                        items: scalar_strings(planned.name, *ty, items)?,
                    });
                }
            }
            (StorageKind::UnorderedSet(ty), Some(FieldValue::Set(members))) => {
                if !members.is_empty() {
                    ops.push(WriteOp::AddSetMembers {
                        key: sub_key(root, planned.name),
                        members: scalar_strings(planned.name, *ty, members)?,
                    });
                }
            }
            (StorageKind::EmbeddedRecord(sub), Some(FieldValue::Embedded(map))) => {
                encode_into(sub, root, map, hash_fields, ops)?;
            }
            (StorageKind::OptionalEmbeddedRecord(sub), Some(FieldValue::OptionalEmbedded(opt))) => {
                if let Some(map) = opt {
                    encode_into(sub, root, map, hash_fields, ops)?;
                }
            }
            _ => {
                return Err(Error::PlanMismatch {
                    field: planned.name.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn scalar_string(
    field: &str,
    expected: ScalarType,
    value: &modelkv_schema::Scalar,
) -> Result<String, Error> {
    if value.scalar_type() != expected {
        return Err(Error::PlanMismatch {
            field: field.to_string(),
        });
    }
    Ok(value.to_store_string())
}

fn scalar_strings(
    field: &str,
    expected: ScalarType,
    values: &[modelkv_schema::Scalar],
) -> Result<Vec<String>, Error> {
    values
        .iter()
        .map(|v| scalar_string(field, expected, v))
        .collect()
}
