//! A small connection pool with scoped acquisition.
//!
//! Every engine operation acquires exactly one connection and must release
//! it on every exit path. The pool hands out a [`PooledConn`] guard whose
//! `Drop` impl returns the connection to the idle list, so release is
//! guaranteed even when the operation errors early.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

use crate::{Conn, KvError};

/// Produces new connections when the idle list is empty.
pub type ConnFactory = Box<dyn Fn() -> Result<Box<dyn Conn>, KvError> + Send + Sync>;

struct PoolInner {
    idle: Mutex<Vec<Box<dyn Conn>>>,
    factory: ConnFactory,
    /// Upper bound on connections this pool will ever hand out at once.
    capacity: usize,
    outstanding: Mutex<usize>,
}

/// A bounded pool of store connections.
///
/// Cloning the pool is cheap; clones share the same idle list.
#[derive(Clone)]
pub struct Pool {
    inner: Arc<PoolInner>,
}

impl Pool {
    /// Create a pool that builds connections with `factory`, handing out at
    /// most `capacity` at a time.
    pub fn new(factory: ConnFactory, capacity: usize) -> Self {
        Pool {
            inner: Arc::new(PoolInner {
                idle: Mutex::new(Vec::new()),
                factory,
                capacity,
                outstanding: Mutex::new(0),
            }),
        }
    }

    /// Acquire a connection, reusing an idle one when available.
    ///
    /// Fails with [`KvError::PoolExhausted`] once `capacity` connections are
    /// already checked out.
    pub fn get(&self) -> Result<PooledConn, KvError> {
        {
            let mut outstanding = self.inner.outstanding.lock().expect("pool lock poisoned");
            if *outstanding >= self.inner.capacity {
                return Err(KvError::PoolExhausted);
            }
            *outstanding += 1;
        }

        let reused = self.inner.idle.lock().expect("pool lock poisoned").pop();
        let conn = match reused {
            Some(conn) => conn,
            None => match (self.inner.factory)() {
                Ok(conn) => conn,
                Err(e) => {
                    *self.inner.outstanding.lock().expect("pool lock poisoned") -= 1;
                    return Err(e);
                }
            },
        };

        log::trace!("pool: connection acquired");
        Ok(PooledConn {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        })
    }

    /// Number of idle connections currently held.
    pub fn idle_count(&self) -> usize {
        self.inner.idle.lock().expect("pool lock poisoned").len()
    }
}

/// A pooled connection. Derefs to `dyn Conn`; returns to the pool on drop.
pub struct PooledConn {
    conn: Option<Box<dyn Conn>>,
    pool: Arc<PoolInner>,
}

impl Deref for PooledConn {
    type Target = dyn Conn;

    fn deref(&self) -> &Self::Target {
        self.conn.as_ref().expect("connection already returned").as_ref()
    }
}

impl DerefMut for PooledConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.conn.as_mut().expect("connection already returned").as_mut()
    }
}

impl Drop for PooledConn {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.idle.lock().expect("pool lock poisoned").push(conn);
            *self.pool.outstanding.lock().expect("pool lock poisoned") -= 1;
            log::trace!("pool: connection released");
        }
    }
}
