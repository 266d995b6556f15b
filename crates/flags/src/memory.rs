//! [`MemoryStore`]: an in-process [`FeatureStore`] for tests and local use.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{Feature, FeatureSnapshot, FeatureStore, Gate, GateKey, GateValue, StoreError, Thing};

/// In-process [`FeatureStore`].
///
/// Holds every feature in memory behind a shared lock; clones share state.
/// Enabling a gate of an unknown feature registers the feature.
#[derive(Clone, Default)]
pub struct MemoryStore {
    features: Arc<RwLock<BTreeMap<String, FeatureSnapshot>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn insert_member(
    snapshot: &mut FeatureSnapshot,
    key: GateKey,
    member: String,
) -> Result<(), StoreError> {
    if let GateValue::Set(mut members) = snapshot.value(key) {
        members.insert(member);
        snapshot.set(key, GateValue::Set(members))?;
    }
    Ok(())
}

fn remove_member(
    snapshot: &mut FeatureSnapshot,
    key: GateKey,
    member: &str,
) -> Result<(), StoreError> {
    if let GateValue::Set(mut members) = snapshot.value(key) {
        members.remove(member);
        snapshot.set(key, GateValue::Set(members))?;
    }
    Ok(())
}

#[async_trait]
impl FeatureStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn features(&self) -> Result<BTreeSet<String>, StoreError> {
        Ok(self.features.read().await.keys().cloned().collect())
    }

    async fn add(&self, feature: &Feature) -> Result<bool, StoreError> {
        self.features
            .write()
            .await
            .entry(feature.key().to_string())
            .or_default();
        Ok(true)
    }

    async fn remove(&self, feature: &Feature) -> Result<bool, StoreError> {
        self.features.write().await.remove(feature.key());
        Ok(true)
    }

    async fn clear(&self, feature: &Feature) -> Result<bool, StoreError> {
        if let Some(snapshot) = self.features.write().await.get_mut(feature.key()) {
            *snapshot = FeatureSnapshot::default();
        }
        Ok(true)
    }

    async fn get(&self, feature: &Feature) -> Result<FeatureSnapshot, StoreError> {
        Ok(self
            .features
            .read()
            .await
            .get(feature.key())
            .cloned()
            .unwrap_or_default())
    }

    async fn get_multi(
        &self,
        features: &[Feature],
    ) -> Result<BTreeMap<String, FeatureSnapshot>, StoreError> {
        let stored = self.features.read().await;
        Ok(features
            .iter()
            .map(|feature| {
                let snapshot = stored.get(feature.key()).cloned().unwrap_or_default();
                (feature.key().to_string(), snapshot)
            })
            .collect())
    }

    async fn enable(
        &self,
        feature: &Feature,
        gate: &Gate,
        thing: &Thing,
    ) -> Result<bool, StoreError> {
        let key = gate.key()?;
        let mut stored = self.features.write().await;
        let snapshot = stored.entry(feature.key().to_string()).or_default();
        match key {
            GateKey::Boolean => {
                snapshot.set(key, GateValue::Boolean(Some("true".to_string())))?;
            }
            GateKey::Groups | GateKey::Actors => {
                insert_member(snapshot, key, thing.value_string())?;
            }
            GateKey::PercentageOfActors | GateKey::PercentageOfTime => {
                snapshot.set(key, GateValue::Percentage(Some(thing.value_string())))?;
            }
        }
        debug!(feature = %feature, gate = %key, "enabled gate");
        Ok(true)
    }

    async fn disable(
        &self,
        feature: &Feature,
        gate: &Gate,
        thing: &Thing,
    ) -> Result<bool, StoreError> {
        let key = gate.key()?;
        let mut stored = self.features.write().await;
        let snapshot = stored.entry(feature.key().to_string()).or_default();
        match key {
            // Turning the boolean gate off turns the whole feature off.
            GateKey::Boolean => *snapshot = FeatureSnapshot::default(),
            GateKey::Groups | GateKey::Actors => {
                remove_member(snapshot, key, &thing.value_string())?;
            }
            GateKey::PercentageOfActors | GateKey::PercentageOfTime => {
                snapshot.set(key, GateValue::Percentage(Some("0".to_string())))?;
            }
        }
        debug!(feature = %feature, gate = %key, "disabled gate");
        Ok(true)
    }
}
