//! Low-level modelkv store layer.
//!
//! This layer knows nothing about shapes or plans. It speaks the store's
//! native vocabulary:
//! - `Conn`: hash/list/set operations on flat string keys
//! - `KvError`: transport and store-type errors
//! - `Pool`: scoped connection acquisition with guaranteed release
//!
//! Use this layer to implement a backing store (see `modelkv-mem-store` for
//! the in-memory one) or to hand connections to the engine.

mod error;
mod pool;
mod traits;

pub use error::KvError;
pub use pool::{ConnFactory, Pool, PooledConn};
pub use traits::Conn;
