// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::Mutex;
use redis::Client;
use redis::aio::ConnectionManager;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tripwire_store::Error;

/// The number of connections a pool holds unless configured otherwise.
pub const DEFAULT_MAX_CONNECTIONS: usize = 25;

struct PoolInner {
    client: Client,
    permits: Arc<Semaphore>,
    idle: Mutex<Vec<ConnectionManager>>,
    max_connections: usize,
}

/// A bounded pool of Redis connections.
///
/// At most `max_connections` connections are checked out at once; further callers wait
/// until one is returned. Connections are opened lazily on first demand and reused after
/// that. Each pooled connection reconnects on its own if the server drops it.
///
/// Clones share the same pool.
///
/// # Examples
///
/// ```no_run
/// use tripwire_redis::RedisPool;
///
/// # async fn example() -> Result<(), tripwire_store::Error> {
/// let pool = RedisPool::open("redis://127.0.0.1/", 8)?;
/// let mut conn = pool.get().await?;
/// let _: () = redis::cmd("PING").query_async(&mut *conn).await.map_err(tripwire_store::Error::unavailable)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RedisPool {
    inner: Arc<PoolInner>,
}

impl Debug for RedisPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisPool")
            .field("max_connections", &self.inner.max_connections)
            .field("idle_connections", &self.idle_connections())
            .finish_non_exhaustive()
    }
}

impl RedisPool {
    /// Creates a pool for the server at `url`.
    ///
    /// No connection is opened until the first checkout. A `max_connections` of zero is
    /// raised to one.
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`][tripwire_store::ErrorKind::Unavailable] error if `url` is not
    /// a valid Redis connection string.
    pub fn open(url: &str, max_connections: usize) -> Result<Self, Error> {
        let client = Client::open(url).map_err(Error::unavailable)?;
        Ok(Self::new(client, max_connections))
    }

    /// Creates a pool that opens its connections from `client`.
    #[must_use]
    pub fn new(client: Client, max_connections: usize) -> Self {
        let max_connections = max_connections.max(1);
        Self {
            inner: Arc::new(PoolInner {
                client,
                permits: Arc::new(Semaphore::new(max_connections)),
                idle: Mutex::new(Vec::with_capacity(max_connections)),
                max_connections,
            }),
        }
    }

    /// Returns the largest number of connections that can be checked out at once.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.inner.max_connections
    }

    /// Returns the number of opened connections currently waiting in the pool.
    #[must_use]
    pub fn idle_connections(&self) -> usize {
        self.inner.idle.lock().len()
    }

    /// Checks out a connection, waiting for one to become free if the pool is exhausted.
    ///
    /// The connection goes back to the pool when the returned guard is dropped.
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`][tripwire_store::ErrorKind::Unavailable] error if a new
    /// connection has to be opened and the server cannot be reached.
    pub async fn get(&self) -> Result<PooledConnection, Error> {
        let permit = Arc::clone(&self.inner.permits)
            .acquire_owned()
            .await
            .map_err(Error::unavailable)?;

        let idle = self.inner.idle.lock().pop();
        let conn = match idle {
            Some(conn) => conn,
            None => self.connect().await?,
        };

        Ok(PooledConnection {
            conn,
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    async fn connect(&self) -> Result<ConnectionManager, Error> {
        let conn = ConnectionManager::new(self.inner.client.clone())
            .await
            .map_err(Error::unavailable)?;

        #[cfg(feature = "logs")]
        tracing::event!(
            name: "tripwire.redis.connected",
            tracing::Level::DEBUG,
            pool.max_connections = self.inner.max_connections,
            pool.available = self.inner.permits.available_permits(),
        );

        Ok(conn)
    }
}

/// A connection checked out of a [`RedisPool`].
///
/// Dereferences to [`ConnectionManager`], so it can be passed wherever Redis expects an
/// async connection. Dropping it returns the connection to the pool.
pub struct PooledConnection {
    conn: ConnectionManager,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl Debug for PooledConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledConnection").finish_non_exhaustive()
    }
}

impl Deref for PooledConnection {
    type Target = ConnectionManager;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        // The permit field drops after this body runs, so the connection is idle before
        // the next waiter is admitted.
        self.pool.idle.lock().push(self.conn.clone());
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use tripwire_store::ErrorKind;

    use super::*;

    static_assertions::assert_impl_all!(RedisPool: Send, Sync, Clone, Debug);
    static_assertions::assert_impl_all!(PooledConnection: Send, Sync, Debug);

    #[test]
    fn open_rejects_malformed_url() {
        let error = RedisPool::open("not a redis url", 4).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Unavailable);
    }

    #[test]
    fn open_is_lazy() {
        let pool = RedisPool::open("redis://127.0.0.1:1/", 4).unwrap();
        assert_eq!(pool.max_connections(), 4);
        assert_eq!(pool.idle_connections(), 0);
    }

    #[test]
    fn zero_max_connections_is_raised_to_one() {
        let pool = RedisPool::open("redis://127.0.0.1/", 0).unwrap();
        assert_eq!(pool.max_connections(), 1);
    }
}
