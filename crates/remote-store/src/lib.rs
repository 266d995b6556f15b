//! Remote feature-flag store adapter.
//!
//! Implements the [`flags::FeatureStore`] trait over a REST feature-flag API:
//! JSON request/response bodies carried over HTTP(S), served under a
//! configurable mount path.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** URL construction, request dispatch, authentication,
//! timeouts, and gate encoding all live here. Flag evaluation code sees only
//! [`flags::FeatureStore`].
//!
//! ## Wire protocol
//!
//! | Operation | Method | Path | Success status |
//! |-----------|--------|------|----------------|
//! | `get` | GET | `/api/v1/features/{key}` | 200 (404 or `state: "off"` → default) |
//! | `add` | POST | `/api/v1/features` | 200 |
//! | `features` | GET | `/api/v1/features` | 200 |
//! | `remove` | DELETE | `/api/v1/features/{key}` | 204 |
//! | `enable` | POST | `/api/v1/features/{key}/{gate}` | 200 |
//! | `disable` | DELETE | `/api/v1/features/{key}/{gate}` | 200 or 404 |
//! | `clear` | DELETE | `/api/v1/features/{key}/boolean` | 200 |
//!
//! `get_multi` has no counterpart in the API and returns an empty map.
//!
//! ## Example
//!
//! ```no_run
//! use flags::{Feature, FeatureStore};
//! use remote_store::{ClientConfig, RemoteStore};
//!
//! # async fn run() -> Result<(), flags::StoreError> {
//! let config = ClientConfig::new().with_basic_auth("admin", "secret");
//! let store = RemoteStore::new("https://flags.example.com/admin", config)?;
//! let chat = Feature::new("chat").expect("non-empty key");
//! let snapshot = store.get(&chat).await?;
//! println!("{:?}", snapshot.boolean());
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod store;
mod wire;

pub use codec::{gate_request_body, result_for_feature};
pub use config::ClientConfig;
pub use dispatcher::{RawResponse, RequestDispatcher};
pub use store::RemoteStore;
