//! Cart store configuration.

use market_storage::cache_key;
use serde::{Deserialize, Serialize};

/// Namespace for every key the storefront writes.
pub const STORAGE_NAMESPACE: &str = "@GoMarketplace";

/// The key the cart snapshot lives under unless configured otherwise.
pub fn default_storage_key() -> String {
    cache_key!(STORAGE_NAMESPACE, "products")
}

/// What to do when the persisted snapshot can't be read or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptSnapshotPolicy {
    /// Report the failure and stop persisting, leaving the stored blob as is.
    #[default]
    Fail,
    /// Log a warning and start from an empty cart. The next save overwrites
    /// the bad snapshot.
    Discard,
}

impl std::fmt::Display for CorruptSnapshotPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::Discard => write!(f, "discard"),
        }
    }
}

/// Configuration for a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Storage key holding the serialized cart.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Hydration failure handling.
    #[serde(default)]
    pub on_corrupt_snapshot: CorruptSnapshotPolicy,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            on_corrupt_snapshot: CorruptSnapshotPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Create a config with the default key and policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different storage key.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Set the hydration failure policy.
    pub fn with_corrupt_snapshot_policy(mut self, policy: CorruptSnapshotPolicy) -> Self {
        self.on_corrupt_snapshot = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_key() {
        assert_eq!(CartConfig::default().storage_key, "@GoMarketplace:products");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CartConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.on_corrupt_snapshot, CorruptSnapshotPolicy::Fail);
    }

    #[test]
    fn test_policy_parses_lowercase() {
        let config: CartConfig =
            serde_json::from_str(r#"{"on_corrupt_snapshot": "discard"}"#).unwrap();
        assert_eq!(config.on_corrupt_snapshot, CorruptSnapshotPolicy::Discard);
    }

    #[test]
    fn test_builders() {
        let config = CartConfig::new()
            .with_storage_key("test:cart")
            .with_corrupt_snapshot_policy(CorruptSnapshotPolicy::Discard);

        assert_eq!(config.storage_key, "test:cart");
        assert_eq!(config.on_corrupt_snapshot.to_string(), "discard");
    }
}
