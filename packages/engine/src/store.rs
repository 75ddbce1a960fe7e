//! Public store operations: save, scan, find, delete.
//!
//! Every operation classifies through the cached plan, validates identity
//! before any I/O, then acquires exactly one pooled connection. The guard
//! returns the connection on every exit path. There is no engine-level
//! transaction: a multi-key save interrupted mid-way leaves partial state,
//! and the underlying store error is surfaced as-is.

use modelkv_kv_store::{Conn, Pool};
use modelkv_schema::{plan_for, root_key, sub_key, FieldPlan, ID_FIELD};

use crate::{decode, encode, ensure_id, validate_id, Error, Model, RawRecord, WriteOp};

/// The engine's handle on a backing store.
pub struct ModelStore {
    pool: Pool,
}

impl ModelStore {
    pub fn new(pool: Pool) -> Self {
        ModelStore { pool }
    }

    /// Save a record, assigning an identity on first save.
    ///
    /// The root key and every sequence/set sub-key are cleared before
    /// rewriting, so a re-save overwrites rather than appends, and hash
    /// fields of optionals that went absent do not survive. The following
    /// root-hash write restores `Id` along with the current fields.
    pub fn save<M: Model>(&self, model: &mut M) -> Result<(), Error> {
        let plan = plan_for(&M::shape())?;
        let id = ensure_id(model);
        if !validate_id(&id) {
            return Err(Error::Identity {
                message: format!("malformed id '{}'", id),
            });
        }

        let ops = encode(&plan, &id, &model.encode_fields())?;
        let root = root_key(plan.shape_name, &id);

        let mut conn = self.pool.get()?;
        let mut stale = vec![root.clone()];
        stale.extend(
            plan.collection_field_names()
                .iter()
                .map(|name| sub_key(&root, name)),
        );
        conn.delete(&stale)?;

        let op_count = ops.len();
        for op in ops {
            match op {
                WriteOp::SetHashFields { key, fields } => conn.hash_set(&key, &fields)?,
                WriteOp::PushList { key, items } => conn.list_push(&key, &items)?,
                WriteOp::AddSetMembers { key, members } => conn.set_add(&key, &members)?,
            }
        }

        log::debug!("saved {} ({} write ops)", root, op_count);
        Ok(())
    }

    /// Save several records of one type. Each record is saved individually;
    /// an error stops at the failing record.
    pub fn save_all<'a, M: Model + 'a>(
        &self,
        models: impl IntoIterator<Item = &'a mut M>,
    ) -> Result<(), Error> {
        for model in models {
            self.save(model)?;
        }
        Ok(())
    }

    /// Load the record with `id` into a fresh instance.
    pub fn find_by_id<M: Model>(&self, id: &str) -> Result<M, Error> {
        if !validate_id(id) {
            return Err(Error::Identity {
                message: format!("malformed id '{}'", id),
            });
        }

        let plan = plan_for(&M::shape())?;
        let raw = self.read_raw(&plan, id)?;
        let fields = decode(&plan, &raw)?;
        let mut model = M::decode_fields(fields)?;

        let stored_id = raw
            .hash
            .get(ID_FIELD)
            .cloned()
            .unwrap_or_else(|| id.to_string());
        model.set_id(stored_id);

        log::debug!("loaded {}", root_key(plan.shape_name, id));
        Ok(model)
    }

    /// Load the record with `id` into an existing instance, replacing its
    /// contents.
    pub fn scan_by_id<M: Model>(&self, id: &str, out: &mut M) -> Result<(), Error> {
        *out = self.find_by_id(id)?;
        Ok(())
    }

    /// Remove a record's root key and every sub-key its plan names.
    pub fn delete_by_id<M: Model>(&self, id: &str) -> Result<(), Error> {
        if !validate_id(id) {
            return Err(Error::Identity {
                message: format!("malformed id '{}'", id),
            });
        }

        let plan = plan_for(&M::shape())?;
        let root = root_key(plan.shape_name, id);

        let mut keys = vec![root.clone()];
        keys.extend(
            plan.collection_field_names()
                .iter()
                .map(|name| sub_key(&root, name)),
        );

        let mut conn = self.pool.get()?;
        conn.delete(&keys)?;

        log::debug!("deleted {} ({} keys)", root, keys.len());
        Ok(())
    }

    /// Remove a saved record.
    pub fn delete<M: Model>(&self, model: &M) -> Result<(), Error> {
        self.delete_by_id::<M>(model.id())
    }

    /// Read the root hash and every collection sub-key for one record.
    ///
    /// Absent sub-keys are left out of the raw record entirely, which is how
    /// the decoder distinguishes "absent" from "present but empty".
    fn read_raw(&self, plan: &FieldPlan, id: &str) -> Result<RawRecord, Error> {
        let root = root_key(plan.shape_name, id);
        let mut conn = self.pool.get()?;

        let Some(hash) = conn.hash_get_all(&root)? else {
            return Err(Error::NotFound { key: root });
        };

        let mut raw = RawRecord {
            hash,
            ..Default::default()
        };
        for name in plan.sequence_field_names() {
            let items = conn.list_range(&sub_key(&root, name))?;
            if !items.is_empty() {
                raw.lists.insert(name.to_string(), items);
            }
        }
        for name in plan.set_field_names() {
            let members = conn.set_members(&sub_key(&root, name))?;
            if !members.is_empty() {
                raw.sets.insert(name.to_string(), members);
            }
        }
        Ok(raw)
    }
}
