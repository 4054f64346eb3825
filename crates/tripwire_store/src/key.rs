// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt::Display;

/// Names a single counter in a [`CounterStore`][crate::CounterStore].
///
/// Keys are cheap to clone when created from static strings. Guards derive their keys with
/// [`CounterKey::namespaced`], producing `<namespace>:<identifier>:<suffix>`.
///
/// # Examples
///
/// ```
/// use tripwire_store::CounterKey;
///
/// let key = CounterKey::namespaced("tripwire", "payments", "checked");
/// assert_eq!(key.as_str(), "tripwire:payments:checked");
///
/// let key = CounterKey::from("static-key");
/// assert_eq!(key.to_string(), "static-key");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CounterKey(Cow<'static, str>);

impl CounterKey {
    /// Builds a key of the form `<namespace>:<identifier>:<suffix>`.
    #[must_use]
    pub fn namespaced(namespace: &str, identifier: &str, suffix: &str) -> Self {
        Self(Cow::Owned(format!("{namespace}:{identifier}:{suffix}")))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CounterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CounterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for CounterKey {
    fn from(value: &'static str) -> Self {
        Self(Cow::Borrowed(value))
    }
}

impl From<String> for CounterKey {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<CounterKey> for Cow<'static, str> {
    fn from(value: CounterKey) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaced_joins_with_colons() {
        let key = CounterKey::namespaced("ns", "id", "failed");
        assert_eq!(key.as_str(), "ns:id:failed");
        assert_eq!(key.to_string(), "ns:id:failed");
    }

    #[test]
    fn static_and_owned_keys_compare_equal() {
        assert_eq!(CounterKey::from("a:b"), CounterKey::from("a:b".to_string()));
    }

    #[test]
    fn into_cow_returns_inner_value() {
        let cow: Cow<'static, str> = CounterKey::from("x").into();
        assert_eq!(cow, "x");
    }
}
