//! [`RemoteStore`]: a [`FeatureStore`] backed by the feature-flag HTTP API.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use flags::{Feature, FeatureSnapshot, FeatureStore, Gate, GateKey, StoreError, Thing};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use tracing::{debug, instrument, warn};

use crate::codec::{gate_request_body, result_for_feature};
use crate::dispatcher::RawResponse;
use crate::wire::{FeatureResponse, FeaturesResponse};
use crate::{ClientConfig, RequestDispatcher};

const FEATURES_PATH: [&str; 3] = ["api", "v1", "features"];

/// Delegates all flag storage to a remote API mounted at one base URL.
///
/// Holds no feature data; every operation is one request/response exchange.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    mount: Url,
    dispatcher: RequestDispatcher,
}

impl RemoteStore {
    /// Creates a store for the API served under `mount`
    /// (e.g. `https://flags.example.com/admin`).
    ///
    /// # Errors
    ///
    /// [`StoreError::Configuration`] if `mount` is not an absolute `http(s)`
    /// URL or `config` holds invalid headers.
    pub fn new(mount: &str, config: ClientConfig) -> Result<Self, StoreError> {
        let mount = Url::parse(mount)
            .map_err(|e| StoreError::configuration(format!("mount {mount:?}: {e}")))?;
        if !matches!(mount.scheme(), "http" | "https") || mount.cannot_be_a_base() {
            return Err(StoreError::configuration(format!(
                "mount {mount} is not an http(s) base URL"
            )));
        }
        let dispatcher = RequestDispatcher::new(&config)?;
        Ok(Self { mount, dispatcher })
    }

    /// Returns the base URL the store was created with.
    pub fn mount(&self) -> &Url {
        &self.mount
    }

    /// Builds `{mount}/api/v1/features[/segment...]`, percent-encoding each segment.
    fn features_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.mount.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::configuration(format!("mount {} cannot be a base", self.mount))
            })?
            .pop_if_empty()
            .extend(FEATURES_PATH)
            .extend(segments);
        Ok(url)
    }
}

fn unexpected(response: RawResponse) -> StoreError {
    warn!(status = response.status.as_u16(), "unexpected response status");
    StoreError::UnexpectedStatus {
        status: response.status.as_u16(),
        body: response.body,
    }
}

#[async_trait]
impl FeatureStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip_all)]
    async fn features(&self) -> Result<BTreeSet<String>, StoreError> {
        let url = self.features_url(&[])?;
        let response = self.dispatcher.get(url).await.map_err(StoreError::transport)?;
        if !response.status.is_success() {
            return Err(unexpected(response));
        }
        let body: FeaturesResponse = response.json().map_err(StoreError::decode)?;
        Ok(body.features.into_iter().map(|f| f.key).collect())
    }

    #[instrument(skip_all, fields(feature = %feature))]
    async fn add(&self, feature: &Feature) -> Result<bool, StoreError> {
        let url = self.features_url(&[])?;
        let response = self
            .dispatcher
            .post(url, &json!({ "name": feature.key() }))
            .await
            .map_err(StoreError::transport)?;
        Ok(response.status == StatusCode::OK)
    }

    #[instrument(skip_all, fields(feature = %feature))]
    async fn remove(&self, feature: &Feature) -> Result<bool, StoreError> {
        let url = self.features_url(&[feature.key()])?;
        let response = self
            .dispatcher
            .delete(url, None)
            .await
            .map_err(StoreError::transport)?;
        Ok(response.status == StatusCode::NO_CONTENT)
    }

    #[instrument(skip_all, fields(feature = %feature))]
    async fn clear(&self, feature: &Feature) -> Result<bool, StoreError> {
        let url = self.features_url(&[feature.key(), GateKey::Boolean.as_str()])?;
        let response = self
            .dispatcher
            .delete(url, None)
            .await
            .map_err(StoreError::transport)?;
        Ok(response.status == StatusCode::OK)
    }

    #[instrument(skip_all, fields(feature = %feature))]
    async fn get(&self, feature: &Feature) -> Result<FeatureSnapshot, StoreError> {
        let url = self.features_url(&[feature.key()])?;
        let response = self.dispatcher.get(url).await.map_err(StoreError::transport)?;
        if response.status == StatusCode::NOT_FOUND {
            return Ok(FeatureSnapshot::default());
        }
        if !response.status.is_success() {
            return Err(unexpected(response));
        }

        let body: FeatureResponse = response.json().map_err(StoreError::decode)?;
        if body.is_off() {
            return Ok(FeatureSnapshot::default());
        }

        let mut snapshot = FeatureSnapshot::default();
        for gate in body.gates {
            let key: GateKey = gate.key.parse()?;
            snapshot.set(key, result_for_feature(key, &gate.value)?)?;
        }
        Ok(snapshot)
    }

    /// Not supported by the remote API: always returns an empty map.
    async fn get_multi(
        &self,
        features: &[Feature],
    ) -> Result<BTreeMap<String, FeatureSnapshot>, StoreError> {
        debug!(requested = features.len(), "get_multi is not implemented for the remote store");
        Ok(BTreeMap::new())
    }

    #[instrument(skip_all, fields(feature = %feature, gate = %gate))]
    async fn enable(
        &self,
        feature: &Feature,
        gate: &Gate,
        thing: &Thing,
    ) -> Result<bool, StoreError> {
        let key = gate.key()?;
        let body = gate_request_body(key, Value::String(thing.value_string()));
        let url = self.features_url(&[feature.key(), key.as_str()])?;
        let response = self
            .dispatcher
            .post(url, &body)
            .await
            .map_err(StoreError::transport)?;
        Ok(response.status == StatusCode::OK)
    }

    #[instrument(skip_all, fields(feature = %feature, gate = %gate))]
    async fn disable(
        &self,
        feature: &Feature,
        gate: &Gate,
        thing: &Thing,
    ) -> Result<bool, StoreError> {
        let key = gate.key()?;
        let body = match key {
            GateKey::Groups | GateKey::Actors => {
                Some(gate_request_body(key, thing.value().clone()))
            }
            GateKey::Boolean | GateKey::PercentageOfActors | GateKey::PercentageOfTime => None,
        };
        let url = self.features_url(&[feature.key(), key.as_str()])?;
        let response = self
            .dispatcher
            .delete(url, body.as_ref())
            .await
            .map_err(StoreError::transport)?;
        Ok(response.status == StatusCode::OK || response.status == StatusCode::NOT_FOUND)
    }
}
