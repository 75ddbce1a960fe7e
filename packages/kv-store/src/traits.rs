//! The connection trait for the low-level store layer.

use std::collections::BTreeMap;

use crate::KvError;

/// A single connection to the backing store.
///
/// Keys are flat strings; values cross this boundary as strings. Each key
/// holds at most one entry, and an entry is a hash (named string fields),
/// a list (ordered strings), or a set (unordered unique strings). An
/// operation against a key holding a different entry type fails with
/// [`KvError::WrongType`].
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Conn>`.
pub trait Conn: Send {
    /// Set named fields in the hash at `key`, creating the hash if absent.
    fn hash_set(&mut self, key: &str, fields: &[(String, String)]) -> Result<(), KvError>;

    /// Read one named field from the hash at `key`.
    ///
    /// Returns `Ok(None)` if the key or the field does not exist.
    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, KvError>;

    /// Read every field of the hash at `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist (not an error condition).
    fn hash_get_all(&mut self, key: &str) -> Result<Option<BTreeMap<String, String>>, KvError>;

    /// Append items to the tail of the list at `key`, in order, creating the
    /// list if absent.
    fn list_push(&mut self, key: &str, items: &[String]) -> Result<(), KvError>;

    /// Read the full list at `key`, head to tail.
    ///
    /// An absent key reads as an empty list.
    fn list_range(&mut self, key: &str) -> Result<Vec<String>, KvError>;

    /// Add members to the set at `key`, creating the set if absent.
    /// Duplicate members are collapsed by the store.
    fn set_add(&mut self, key: &str, members: &[String]) -> Result<(), KvError>;

    /// Read every member of the set at `key`, in unspecified order.
    ///
    /// An absent key reads as an empty set.
    fn set_members(&mut self, key: &str) -> Result<Vec<String>, KvError>;

    /// Remove the entries at `keys`. Missing keys are ignored.
    fn delete(&mut self, keys: &[String]) -> Result<(), KvError>;

    /// Check whether `key` holds an entry of any type.
    fn exists(&mut self, key: &str) -> Result<bool, KvError>;
}

// Blanket implementations for references and boxes

impl<T: Conn + ?Sized> Conn for &mut T {
    fn hash_set(&mut self, key: &str, fields: &[(String, String)]) -> Result<(), KvError> {
        (**self).hash_set(key, fields)
    }

    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        (**self).hash_get(key, field)
    }

    fn hash_get_all(&mut self, key: &str) -> Result<Option<BTreeMap<String, String>>, KvError> {
        (**self).hash_get_all(key)
    }

    fn list_push(&mut self, key: &str, items: &[String]) -> Result<(), KvError> {
        (**self).list_push(key, items)
    }

    fn list_range(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        (**self).list_range(key)
    }

    fn set_add(&mut self, key: &str, members: &[String]) -> Result<(), KvError> {
        (**self).set_add(key, members)
    }

    fn set_members(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        (**self).set_members(key)
    }

    fn delete(&mut self, keys: &[String]) -> Result<(), KvError> {
        (**self).delete(keys)
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        (**self).exists(key)
    }
}

impl<T: Conn + ?Sized> Conn for Box<T> {
    fn hash_set(&mut self, key: &str, fields: &[(String, String)]) -> Result<(), KvError> {
        self.as_mut().hash_set(key, fields)
    }

    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        self.as_mut().hash_get(key, field)
    }

    fn hash_get_all(&mut self, key: &str) -> Result<Option<BTreeMap<String, String>>, KvError> {
        self.as_mut().hash_get_all(key)
    }

    fn list_push(&mut self, key: &str, items: &[String]) -> Result<(), KvError> {
        self.as_mut().list_push(key, items)
    }

    fn list_range(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        self.as_mut().list_range(key)
    }

    fn set_add(&mut self, key: &str, members: &[String]) -> Result<(), KvError> {
        self.as_mut().set_add(key, members)
    }

    fn set_members(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        self.as_mut().set_members(key)
    }

    fn delete(&mut self, keys: &[String]) -> Result<(), KvError> {
        self.as_mut().delete(keys)
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        self.as_mut().exists(key)
    }
}
