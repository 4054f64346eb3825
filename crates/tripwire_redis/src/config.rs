// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::pool::DEFAULT_MAX_CONNECTIONS;

/// Connection settings for a [`RedisStore`][crate::RedisStore].
///
/// With the `serde` feature enabled the config can be loaded from any serde format;
/// `max_connections` may be omitted.
///
/// ```
/// use tripwire_redis::RedisStoreConfig;
///
/// let config = RedisStoreConfig::new("redis://cache:6379/").with_max_connections(10);
/// assert_eq!(config.max_connections, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub struct RedisStoreConfig {
    /// The Redis connection string, such as `redis://127.0.0.1:6379/0`.
    pub url: String,

    /// The largest number of connections held by the pool.
    #[cfg_attr(feature = "serde", serde(default = "default_max_connections"))]
    pub max_connections: usize,
}

#[cfg(feature = "serde")]
fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

impl RedisStoreConfig {
    /// Creates a config for `url` with the default pool size.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }
}
