use std::collections::BTreeSet;

use flags::{FeatureSnapshot, FeatureStore, Gate, GateKey, StoreError, Thing};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::args::Command;

/// Result of one command, printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Output {
    Features { features: BTreeSet<String> },
    Snapshot(FeatureSnapshot),
    Changed { ok: bool },
}

impl Output {
    /// `true` when the store declined a mutating command.
    pub fn declined(&self) -> bool {
        matches!(self, Output::Changed { ok: false })
    }
}

/// Builds the thing a gate is changed for.
///
/// Group and actor values are always strings; other values are read as JSON
/// when they parse (`25`, `true`) and as strings otherwise. A missing value
/// means "everyone" for the boolean gate and `0` for percentages.
fn thing_for(gate: &Gate, raw: Option<&str>) -> Result<Thing, StoreError> {
    let key = gate.key()?;
    Ok(match (key, raw) {
        (GateKey::Groups | GateKey::Actors, Some(raw)) => Thing::new(raw),
        (_, Some(raw)) => serde_json::from_str::<Value>(raw)
            .map(Thing::new)
            .unwrap_or_else(|_| Thing::new(raw)),
        (GateKey::Boolean, None) => Thing::boolean(),
        (GateKey::PercentageOfActors | GateKey::PercentageOfTime, None) => Thing::percentage(0),
        (GateKey::Groups | GateKey::Actors, None) => {
            return Err(StoreError::GateValueMismatch {
                key,
                message: "a group name or actor id is required".to_string(),
            })
        }
    })
}

/// Runs `command` against `store`.
pub async fn run(command: &Command, store: &dyn FeatureStore) -> Result<Output, StoreError> {
    let output = match command {
        Command::List => Output::Features {
            features: store.features().await?,
        },
        Command::Get { feature } => Output::Snapshot(store.get(feature).await?),
        Command::Add { feature } => Output::Changed {
            ok: store.add(feature).await?,
        },
        Command::Remove { feature } => Output::Changed {
            ok: store.remove(feature).await?,
        },
        Command::Clear { feature } => Output::Changed {
            ok: store.clear(feature).await?,
        },
        Command::Enable { feature, gate, value } => {
            let thing = thing_for(gate, value.as_deref())?;
            Output::Changed {
                ok: store.enable(feature, gate, &thing).await?,
            }
        }
        Command::Disable { feature, gate, value } => {
            let thing = thing_for(gate, value.as_deref())?;
            Output::Changed {
                ok: store.disable(feature, gate, &thing).await?,
            }
        }
    };
    info!(?command, declined = output.declined(), "command finished");
    Ok(output)
}

#[cfg(test)]
mod tests {
    use flags::{Feature, MemoryStore, MockFeatureStore};
    use serde_json::json;

    use super::*;

    fn chat() -> Feature {
        Feature::new("chat").unwrap()
    }

    #[test]
    fn test_thing_for_keeps_actor_ids_as_strings() {
        let thing = thing_for(&Gate::from(GateKey::Actors), Some("22")).unwrap();
        assert_eq!(thing.value(), &json!("22"));
    }

    #[test]
    fn test_thing_for_parses_percentages() {
        let thing = thing_for(&Gate::from(GateKey::PercentageOfTime), Some("25")).unwrap();
        assert_eq!(thing.value(), &json!(25));
        let thing = thing_for(&Gate::from(GateKey::PercentageOfTime), None).unwrap();
        assert_eq!(thing.value(), &json!(0));
    }

    #[test]
    fn test_thing_for_requires_value_for_sets() {
        let err = thing_for(&Gate::from(GateKey::Groups), None).unwrap_err();
        assert!(matches!(err, StoreError::GateValueMismatch { key: GateKey::Groups, .. }));
    }

    #[test]
    fn test_thing_for_rejects_unknown_gates() {
        let err = thing_for(&Gate::new("expression").unwrap(), Some("1")).unwrap_err();
        assert!(matches!(err, StoreError::InvalidGateKey { .. }));
    }

    #[tokio::test]
    async fn test_run_enable_then_get_against_memory_store() {
        let store = MemoryStore::new();
        let enable = Command::Enable {
            feature: chat(),
            gate: Gate::from(GateKey::Groups),
            value: Some("admins".to_string()),
        };
        assert_eq!(run(&enable, &store).await.unwrap(), Output::Changed { ok: true });

        let output = run(&Command::Get { feature: chat() }, &store).await.unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["groups"], json!(["admins"]));
        assert_eq!(json["boolean"], json!(null));
    }

    #[tokio::test]
    async fn test_run_list_serialises_feature_keys() {
        let store = MemoryStore::new();
        store.add(&chat()).await.unwrap();

        let output = run(&Command::List, &store).await.unwrap();
        assert_eq!(
            serde_json::to_value(&output).unwrap(),
            json!({ "features": ["chat"] })
        );
    }

    #[tokio::test]
    async fn test_run_reports_declined_changes() {
        let mut store = MockFeatureStore::new();
        store
            .expect_remove()
            .withf(|feature| feature.key() == "chat")
            .returning(|_| Ok(false));

        let output = run(&Command::Remove { feature: chat() }, &store).await.unwrap();
        assert!(output.declined());
    }

    #[tokio::test]
    async fn test_run_propagates_store_errors() {
        let mut store = MockFeatureStore::new();
        store.expect_features().returning(|| {
            Err(StoreError::UnexpectedStatus {
                status: 503,
                body: "unavailable".to_string(),
            })
        });

        let err = run(&Command::List, &store).await.unwrap_err();
        assert!(matches!(err, StoreError::UnexpectedStatus { status: 503, .. }));
    }
}
