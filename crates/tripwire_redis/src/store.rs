// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use redis::AsyncCommands;
use tripwire_store::{CounterKey, CounterStore, Error};

use crate::config::RedisStoreConfig;
use crate::pool::RedisPool;

/// A counter store backed by Redis.
///
/// Each operation checks a connection out of the [`RedisPool`] for the duration of that one
/// operation. Clones share the pool.
///
/// # Examples
///
/// ```no_run
/// use tripwire_redis::{RedisPool, RedisStore};
///
/// # fn example() -> Result<(), tripwire_store::Error> {
/// // 25 connections
/// let store = RedisStore::open("redis://127.0.0.1/")?;
///
/// // Explicit pool size
/// let store = RedisStore::new(RedisPool::open("redis://127.0.0.1/", 4)?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RedisStore {
    pool: RedisPool,
}

impl RedisStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Creates a store for the server at `url` with a pool of
    /// [`DEFAULT_MAX_CONNECTIONS`][crate::DEFAULT_MAX_CONNECTIONS] connections.
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`][tripwire_store::ErrorKind::Unavailable] error if `url` is not
    /// a valid Redis connection string.
    pub fn open(url: &str) -> Result<Self, Error> {
        Self::from_config(&RedisStoreConfig::new(url))
    }

    /// Creates a store from a [`RedisStoreConfig`].
    ///
    /// # Errors
    ///
    /// Returns an [`Unavailable`][tripwire_store::ErrorKind::Unavailable] error if the configured
    /// URL is not a valid Redis connection string.
    pub fn from_config(config: &RedisStoreConfig) -> Result<Self, Error> {
        RedisPool::open(&config.url, config.max_connections).map(Self::new)
    }

    /// Returns the pool this store draws connections from.
    #[must_use]
    pub fn pool(&self) -> &RedisPool {
        &self.pool
    }
}

/// Longest `EXPIRE` issued. Redis rejects expiry times whose millisecond deadline overflows.
const MAX_EXPIRE_SECONDS: u64 = 100 * 365 * 24 * 60 * 60;

/// Converts a time-to-live into whole seconds for `EXPIRE`, rounding up and never below one.
fn ttl_seconds(ttl: Duration) -> i64 {
    let secs = ttl.as_secs().saturating_add(u64::from(ttl.subsec_nanos() > 0));
    i64::try_from(secs.clamp(1, MAX_EXPIRE_SECONDS)).unwrap_or(i64::MAX)
}

impl CounterStore for RedisStore {
    async fn increment(&self, key: &CounterKey) -> Result<u64, Error> {
        let mut conn = self.pool.get().await?;
        conn.incr(key.as_str(), 1_u64).await.map_err(Error::unavailable)
    }

    async fn get(&self, key: &CounterKey) -> Result<u64, Error> {
        let mut conn = self.pool.get().await?;
        let value: Option<u64> = conn.get(key.as_str()).await.map_err(Error::unavailable)?;
        Ok(value.unwrap_or_default())
    }

    async fn expire(&self, key: &CounterKey, ttl: Duration) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let _: bool = conn.expire(key.as_str(), ttl_seconds(ttl)).await.map_err(Error::unavailable)?;
        Ok(())
    }

    async fn delete(&self, key: &CounterKey) -> Result<(), Error> {
        let mut conn = self.pool.get().await?;
        let _: u64 = conn.del(key.as_str()).await.map_err(Error::unavailable)?;
        Ok(())
    }

    async fn increment_and_expire(&self, key: &CounterKey, expire: &[CounterKey], ttl: Duration) -> Result<u64, Error> {
        let seconds = ttl_seconds(ttl);
        let mut pipe = redis::pipe();
        pipe.atomic().incr(key.as_str(), 1_u64);
        for expiring in expire {
            pipe.expire(expiring.as_str(), seconds).ignore();
        }

        let mut conn = self.pool.get().await?;
        let (value,): (u64,) = pipe.query_async(&mut *conn).await.map_err(Error::unavailable)?;
        Ok(value)
    }

    async fn delete_all(&self, keys: &[CounterKey]) -> Result<(), Error> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for key in keys {
            pipe.del(key.as_str()).ignore();
        }

        let mut conn = self.pool.get().await?;
        let (): () = pipe.query_async(&mut *conn).await.map_err(Error::unavailable)?;
        Ok(())
    }
}
