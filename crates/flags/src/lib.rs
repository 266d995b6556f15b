//! Feature-flag domain and adapter contract.
//!
//! This crate contains the gate model (keys, values, snapshots), the
//! identifiers a flag library passes to its storage backend, and the
//! [`FeatureStore`] trait every backend implements. Backends that perform
//! I/O live in their own crates and never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no network dependencies.
//! It defines *what* a store must do; backend crates define *how*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`Feature`, `Gate`) |
//! | [`types`] | Gate keys, gate values, snapshots, things |
//! | [`errors`] | [`StoreError`] |
//! | [`store`] | The [`FeatureStore`] trait |
//! | [`memory`] | [`MemoryStore`], an in-process backend |
//!
//! ## Features
//!
//! - `mock` — generates `MockFeatureStore` via `mockall` for consumers' tests.

pub mod errors;
pub mod identifiers;
pub mod memory;
pub mod store;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{StoreError, TransportError};
pub use identifiers::{Feature, Gate};
pub use memory::MemoryStore;
pub use store::FeatureStore;
pub use types::{FeatureSnapshot, GateKey, GateValue, Thing};

#[cfg(feature = "mock")]
pub use store::MockFeatureStore;
