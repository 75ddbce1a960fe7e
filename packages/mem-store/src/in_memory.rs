//! In-memory store with per-key typed entries.
//!
//! Mirrors the semantics the engine expects from the real store: each key
//! holds a hash, a list, or a set, and an operation against the wrong entry
//! type fails rather than silently converting.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use modelkv_kv_store::{Conn, KvError, Pool};

/// One typed entry in the dataset.
#[derive(Clone, Debug)]
enum Entry {
    Hash(BTreeMap<String, String>),
    List(Vec<String>),
    Set(BTreeSet<String>),
}

impl Entry {
    fn kind(&self) -> &'static str {
        match self {
            Entry::Hash(_) => "hash",
            Entry::List(_) => "list",
            Entry::Set(_) => "set",
        }
    }
}

/// A shared in-memory dataset.
///
/// All connections handed out by [`MemStore::conn`] (or through
/// [`MemStore::pool`]) view the same data, the way pooled connections to one
/// server would.
///
/// # Example
///
/// ```rust
/// use modelkv_mem_store::MemStore;
/// use modelkv_kv_store::Conn;
///
/// let store = MemStore::new();
/// let mut conn = store.conn();
///
/// conn.hash_set("person:1", &[("Name".to_string(), "Alice".to_string())]).unwrap();
/// assert_eq!(conn.hash_get("person:1", "Name").unwrap(), Some("Alice".to_string()));
/// ```
#[derive(Clone, Default)]
pub struct MemStore {
    data: Arc<Mutex<HashMap<String, Entry>>>,
}

impl MemStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a connection to this store.
    pub fn conn(&self) -> MemConn {
        MemConn {
            data: Arc::clone(&self.data),
        }
    }

    /// Build a connection pool backed by this store.
    pub fn pool(&self, capacity: usize) -> Pool {
        let store = self.clone();
        Pool::new(
            Box::new(move || Ok(Box::new(store.conn()) as Box<dyn Conn>)),
            capacity,
        )
    }

    /// Drop every entry. Test helper.
    pub fn clear(&self) {
        self.data.lock().expect("store lock poisoned").clear();
    }

    /// Number of keys currently held.
    pub fn key_count(&self) -> usize {
        self.data.lock().expect("store lock poisoned").len()
    }
}

/// A connection handle onto a [`MemStore`] dataset.
pub struct MemConn {
    data: Arc<Mutex<HashMap<String, Entry>>>,
}

impl Conn for MemConn {
    fn hash_set(&mut self, key: &str, fields: &[(String, String)]) -> Result<(), KvError> {
        let mut data = self.data.lock().expect("store lock poisoned");
        let entry = data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Hash(BTreeMap::new()));
        match entry {
            Entry::Hash(hash) => {
                for (name, value) in fields {
                    hash.insert(name.clone(), value.clone());
                }
                Ok(())
            }
            other => {
                log::debug!("hash_set against {} entry at '{}'", other.kind(), key);
                Err(KvError::WrongType {
                    key: key.to_string(),
                })
            }
        }
    }

    fn hash_get(&mut self, key: &str, field: &str) -> Result<Option<String>, KvError> {
        let data = self.data.lock().expect("store lock poisoned");
        match data.get(key) {
            None => Ok(None),
            Some(Entry::Hash(hash)) => Ok(hash.get(field).cloned()),
            Some(_) => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn hash_get_all(&mut self, key: &str) -> Result<Option<BTreeMap<String, String>>, KvError> {
        let data = self.data.lock().expect("store lock poisoned");
        match data.get(key) {
            None => Ok(None),
            Some(Entry::Hash(hash)) => Ok(Some(hash.clone())),
            Some(_) => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn list_push(&mut self, key: &str, items: &[String]) -> Result<(), KvError> {
        let mut data = self.data.lock().expect("store lock poisoned");
        let entry = data
            .entry(key.to_string())
            .or_insert_with(|| Entry::List(Vec::new()));
        match entry {
            Entry::List(list) => {
                list.extend(items.iter().cloned());
                Ok(())
            }
            _ => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn list_range(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        let data = self.data.lock().expect("store lock poisoned");
        match data.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::List(list)) => Ok(list.clone()),
            Some(_) => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn set_add(&mut self, key: &str, members: &[String]) -> Result<(), KvError> {
        let mut data = self.data.lock().expect("store lock poisoned");
        let entry = data
            .entry(key.to_string())
            .or_insert_with(|| Entry::Set(BTreeSet::new()));
        match entry {
            Entry::Set(set) => {
                set.extend(members.iter().cloned());
                Ok(())
            }
            _ => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn set_members(&mut self, key: &str) -> Result<Vec<String>, KvError> {
        let data = self.data.lock().expect("store lock poisoned");
        match data.get(key) {
            None => Ok(Vec::new()),
            Some(Entry::Set(set)) => Ok(set.iter().cloned().collect()),
            Some(_) => Err(KvError::WrongType {
                key: key.to_string(),
            }),
        }
    }

    fn delete(&mut self, keys: &[String]) -> Result<(), KvError> {
        let mut data = self.data.lock().expect("store lock poisoned");
        for key in keys {
            data.remove(key);
        }
        Ok(())
    }

    fn exists(&mut self, key: &str) -> Result<bool, KvError> {
        let data = self.data.lock().expect("store lock poisoned");
        Ok(data.contains_key(key))
    }
}
