//! The adapter contract between a flag library and its storage backend.
//!
//! A flag library evaluates features; a [`FeatureStore`] persists them. The
//! library only ever talks to the trait, so a local store, a remote store,
//! or a cached wrapper around either can be swapped in without changes to the
//! evaluation code.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;

use crate::{Feature, FeatureSnapshot, Gate, StoreError, Thing};

/// Storage operations a flag library requires from a backend.
///
/// Mutating operations return `Ok(false)` when the backend declined the
/// change and reserve `Err` for conditions the caller cannot interpret
/// (invalid gate keys, transport failures, malformed responses).
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Human-readable name of the backend, for logs.
    fn name(&self) -> &str;

    /// Returns the keys of every known feature.
    async fn features(&self) -> Result<BTreeSet<String>, StoreError>;

    /// Registers `feature`. Returns `true` if the backend accepted it.
    async fn add(&self, feature: &Feature) -> Result<bool, StoreError>;

    /// Removes `feature` and all of its gate values.
    async fn remove(&self, feature: &Feature) -> Result<bool, StoreError>;

    /// Clears every gate value of `feature` without removing it.
    async fn clear(&self, feature: &Feature) -> Result<bool, StoreError>;

    /// Returns the value of every gate of `feature`.
    ///
    /// A feature the backend does not know yields the default snapshot.
    async fn get(&self, feature: &Feature) -> Result<FeatureSnapshot, StoreError>;

    /// Returns snapshots for several features at once, keyed by feature key.
    ///
    /// Backends without a batch endpoint may return an empty map.
    async fn get_multi(
        &self,
        features: &[Feature],
    ) -> Result<BTreeMap<String, FeatureSnapshot>, StoreError>;

    /// Enables `gate` of `feature` for `thing`.
    async fn enable(&self, feature: &Feature, gate: &Gate, thing: &Thing)
        -> Result<bool, StoreError>;

    /// Disables `gate` of `feature` for `thing`.
    async fn disable(
        &self,
        feature: &Feature,
        gate: &Gate,
        thing: &Thing,
    ) -> Result<bool, StoreError>;
}
