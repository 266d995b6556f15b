//! Newtype identifiers for the objects a host flag library hands to a store.
//!
//! A [`Feature`] and a [`Gate`] are both names under the hood, but they are
//! never interchangeable: a feature key addresses a flag, a gate name selects
//! how a value is encoded for that flag.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GateKey, StoreError};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// A named feature flag, composed of one value per gate.
    Feature
}

impl Feature {
    /// Returns the feature key used on the wire.
    pub fn key(&self) -> &str {
        self.as_str()
    }
}

string_id! {
    /// A gate as named by the host library.
    ///
    /// The name is kept raw so that an unknown gate is rejected by the store
    /// (see [`Gate::key`]) rather than at the call site.
    Gate
}

impl Gate {
    /// Resolves the gate name to a [`GateKey`].
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidGateKey`] if the name is not one of the five
    /// known gates.
    pub fn key(&self) -> Result<GateKey, StoreError> {
        GateKey::from_str(self.as_str())
    }
}

impl From<GateKey> for Gate {
    fn from(key: GateKey) -> Self {
        Self(key.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_names_are_rejected() {
        assert!(Feature::new("").is_none());
        assert!(Gate::new("").is_none());
    }

    #[test]
    fn feature_key_is_the_name() {
        let feature = Feature::new("chat").unwrap();
        assert_eq!(feature.key(), "chat");
        assert_eq!(feature.to_string(), "chat");
    }

    #[test]
    fn gate_resolves_known_keys() {
        let gate = Gate::new("percentage_of_time").unwrap();
        assert_eq!(gate.key().unwrap(), GateKey::PercentageOfTime);
        assert_eq!(Gate::from(GateKey::Actors).as_str(), "actors");
    }

    #[test]
    fn gate_rejects_unknown_keys() {
        let gate = Gate::new("expression").unwrap();
        assert!(matches!(
            gate.key(),
            Err(StoreError::InvalidGateKey { key }) if key == "expression"
        ));
    }
}
