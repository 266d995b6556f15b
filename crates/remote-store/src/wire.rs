//! JSON payloads exchanged with the feature-flag HTTP API.

use serde::Deserialize;
use serde_json::Value;

/// Body of `GET /api/v1/features/{key}`.
#[derive(Debug, Deserialize)]
pub struct FeatureResponse {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub gates: Vec<GateResponse>,
}

impl FeatureResponse {
    /// `true` when the API reports the feature as fully off.
    pub fn is_off(&self) -> bool {
        self.state.as_deref() == Some("off")
    }
}

/// One entry of [`FeatureResponse::gates`].
#[derive(Debug, Deserialize)]
pub struct GateResponse {
    pub key: String,
    #[serde(default)]
    pub value: Value,
}

/// Body of `GET /api/v1/features`.
#[derive(Debug, Deserialize)]
pub struct FeaturesResponse {
    #[serde(default)]
    pub features: Vec<FeatureSummary>,
}

/// One entry of [`FeaturesResponse::features`].
#[derive(Debug, Deserialize)]
pub struct FeatureSummary {
    /// Feature key.
    pub key: String,
}
