//! Gate keys, gate values, and feature snapshots.
//!
//! The gate set is closed: every feature carries exactly one value for each
//! [`GateKey`], and the shape of that value is fixed by the key. Matching on
//! [`GateKey`] is exhaustive, so adding a gate forces every encoder and decoder
//! to handle it.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::StoreError;

// ---------------------------------------------------------------------------
// Gate keys
// ---------------------------------------------------------------------------

/// Identifies one of the five gate strategies a feature is evaluated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateKey {
    /// On for everyone, or not recorded.
    Boolean,
    /// On for members of the named groups.
    Groups,
    /// On for the listed actors.
    Actors,
    /// On for a stable percentage of actors.
    PercentageOfActors,
    /// On for a random percentage of checks.
    PercentageOfTime,
}

impl GateKey {
    /// Every gate key, in wire order.
    pub const ALL: [GateKey; 5] = [
        GateKey::Boolean,
        GateKey::Groups,
        GateKey::Actors,
        GateKey::PercentageOfActors,
        GateKey::PercentageOfTime,
    ];

    /// Returns the snake_case name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            GateKey::Boolean => "boolean",
            GateKey::Groups => "groups",
            GateKey::Actors => "actors",
            GateKey::PercentageOfActors => "percentage_of_actors",
            GateKey::PercentageOfTime => "percentage_of_time",
        }
    }
}

impl FromStr for GateKey {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GateKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| StoreError::InvalidGateKey { key: s.to_string() })
    }
}

impl std::fmt::Display for GateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Gate values
// ---------------------------------------------------------------------------

/// The value a feature holds for a single gate.
///
/// Boolean and percentage values are stored in their string form (`"true"`,
/// `"0"`, `"12.5"`), matching what the remote API round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GateValue {
    /// Value of the [`GateKey::Boolean`] gate; `None` when nothing is recorded.
    Boolean(Option<String>),
    /// Members of the [`GateKey::Groups`] or [`GateKey::Actors`] gate.
    Set(BTreeSet<String>),
    /// Value of a percentage gate; `None` when nothing is recorded.
    Percentage(Option<String>),
}

impl GateValue {
    /// Returns the "nothing recorded" value for `key`.
    pub fn empty_for(key: GateKey) -> Self {
        match key {
            GateKey::Boolean => GateValue::Boolean(None),
            GateKey::Groups | GateKey::Actors => GateValue::Set(BTreeSet::new()),
            GateKey::PercentageOfActors | GateKey::PercentageOfTime => GateValue::Percentage(None),
        }
    }

    /// Returns `true` if the value is the empty sentinel for its shape.
    pub fn is_empty(&self) -> bool {
        match self {
            GateValue::Boolean(v) | GateValue::Percentage(v) => v.is_none(),
            GateValue::Set(set) => set.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Feature snapshot
// ---------------------------------------------------------------------------

/// The state of every gate of one feature.
///
/// Always holds all five gates; gates without a recorded value hold their
/// empty sentinel (see [`GateValue::empty_for`]). Serialises as
/// `{boolean, groups, actors, percentage_of_actors, percentage_of_time}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    boolean: Option<String>,
    groups: BTreeSet<String>,
    actors: BTreeSet<String>,
    percentage_of_actors: Option<String>,
    percentage_of_time: Option<String>,
}

impl FeatureSnapshot {
    /// Returns the value held for `key`.
    pub fn value(&self, key: GateKey) -> GateValue {
        match key {
            GateKey::Boolean => GateValue::Boolean(self.boolean.clone()),
            GateKey::Groups => GateValue::Set(self.groups.clone()),
            GateKey::Actors => GateValue::Set(self.actors.clone()),
            GateKey::PercentageOfActors => GateValue::Percentage(self.percentage_of_actors.clone()),
            GateKey::PercentageOfTime => GateValue::Percentage(self.percentage_of_time.clone()),
        }
    }

    /// Replaces the value held for `key`.
    ///
    /// # Errors
    ///
    /// [`StoreError::GateValueMismatch`] if `value` does not have the shape
    /// `key` requires.
    pub fn set(&mut self, key: GateKey, value: GateValue) -> Result<(), StoreError> {
        match (key, value) {
            (GateKey::Boolean, GateValue::Boolean(v)) => self.boolean = v,
            (GateKey::Groups, GateValue::Set(v)) => self.groups = v,
            (GateKey::Actors, GateValue::Set(v)) => self.actors = v,
            (GateKey::PercentageOfActors, GateValue::Percentage(v)) => {
                self.percentage_of_actors = v
            }
            (GateKey::PercentageOfTime, GateValue::Percentage(v)) => self.percentage_of_time = v,
            (key, value) => {
                return Err(StoreError::GateValueMismatch {
                    key,
                    message: format!("expected {:?}, got {:?}", GateValue::empty_for(key), value),
                })
            }
        }
        Ok(())
    }

    /// Iterates over all five gates in [`GateKey::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (GateKey, GateValue)> + '_ {
        GateKey::ALL.into_iter().map(move |key| (key, self.value(key)))
    }

    /// Returns the boolean gate value, if recorded.
    pub fn boolean(&self) -> Option<&str> {
        self.boolean.as_deref()
    }

    /// Returns the enabled groups.
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Returns the enabled actors.
    pub fn actors(&self) -> &BTreeSet<String> {
        &self.actors
    }

    /// Returns the percentage-of-actors value, if recorded.
    pub fn percentage_of_actors(&self) -> Option<&str> {
        self.percentage_of_actors.as_deref()
    }

    /// Returns the percentage-of-time value, if recorded.
    pub fn percentage_of_time(&self) -> Option<&str> {
        self.percentage_of_time.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Things
// ---------------------------------------------------------------------------

/// The entity a gate is enabled or disabled for.
///
/// An actor id for the actors gate, a group name for the groups gate, a
/// percentage for the percentage gates, `true` for the boolean gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Thing(Value);

impl Thing {
    /// Wraps an arbitrary JSON value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// An actor identified by `id`.
    pub fn actor(id: impl Into<String>) -> Self {
        Self(Value::String(id.into()))
    }

    /// A group identified by `name`.
    pub fn group(name: impl Into<String>) -> Self {
        Self(Value::String(name.into()))
    }

    /// A percentage in `0..=100`.
    pub fn percentage(value: impl Into<serde_json::Number>) -> Self {
        Self(Value::Number(value.into()))
    }

    /// The value used with the boolean gate.
    pub fn boolean() -> Self {
        Self(Value::Bool(true))
    }

    /// Returns the raw value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Returns the value in string form; strings are returned without quotes.
    pub fn value_string(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_key_round_trips_through_wire_names() {
        for key in GateKey::ALL {
            assert_eq!(key.as_str().parse::<GateKey>().unwrap(), key);
        }
    }

    #[test]
    fn gate_key_rejects_unknown_names() {
        let err = "Boolean".parse::<GateKey>().unwrap_err();
        assert!(matches!(err, StoreError::InvalidGateKey { key } if key == "Boolean"));
    }

    #[test]
    fn default_snapshot_holds_every_empty_sentinel() {
        let snapshot = FeatureSnapshot::default();
        let values: Vec<_> = snapshot.iter().collect();
        assert_eq!(values.len(), 5);
        for (key, value) in values {
            assert_eq!(value, GateValue::empty_for(key));
            assert!(value.is_empty());
        }
    }

    #[test]
    fn default_snapshot_serialises_with_nulls_and_empty_arrays() {
        let json = serde_json::to_value(FeatureSnapshot::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "boolean": null,
                "groups": [],
                "actors": [],
                "percentage_of_actors": null,
                "percentage_of_time": null,
            })
        );
    }

    #[test]
    fn set_updates_the_matching_gate() {
        let mut snapshot = FeatureSnapshot::default();
        snapshot
            .set(GateKey::Actors, GateValue::Set(["22".to_string()].into()))
            .unwrap();
        snapshot
            .set(GateKey::PercentageOfTime, GateValue::Percentage(Some("5".to_string())))
            .unwrap();

        assert!(snapshot.actors().contains("22"));
        assert!(snapshot.groups().is_empty());
        assert_eq!(snapshot.percentage_of_time(), Some("5"));
        assert_eq!(snapshot.percentage_of_actors(), None);
    }

    #[test]
    fn set_rejects_mismatched_shapes() {
        let mut snapshot = FeatureSnapshot::default();
        let err = snapshot
            .set(GateKey::Boolean, GateValue::Set(BTreeSet::new()))
            .unwrap_err();
        assert!(matches!(err, StoreError::GateValueMismatch { key: GateKey::Boolean, .. }));
        assert_eq!(snapshot, FeatureSnapshot::default());
    }

    #[test]
    fn thing_value_string_strips_quotes_from_strings_only() {
        assert_eq!(Thing::actor("User;1").value_string(), "User;1");
        assert_eq!(Thing::percentage(25).value_string(), "25");
        assert_eq!(Thing::boolean().value_string(), "true");
        assert_eq!(Thing::new(12.5).value_string(), "12.5");
    }
}
