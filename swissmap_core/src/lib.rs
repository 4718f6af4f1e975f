//! # SwissMap core
//!
//! Storage layer for user-maintained map features.
//!
//! A [`Feature`] is an opaque geographic record (`id`, `type`, `geometry`, `properties`).
//! Features are kept in a [`FeatureStore`](store::FeatureStore), which has two interchangeable
//! implementations:
//! - [`LocalFileStore`](store::LocalFileStore): a single JSON array on disk
//! - [`FirestoreStore`](store::FirestoreStore): a Firestore collection, accessed via its REST API
//!   (requires the `firestore` feature)
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use swissmap_core::{FeaturePatch, store::{FeatureStore, LocalFileStore}};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = LocalFileStore::new("data/features.json");
//!     let ids = store
//!         .upsert_many(vec![FeaturePatch::new("poi").with_property("name", "Rigi")])
//!         .await
//!         .unwrap();
//!     println!("stored {ids:?}");
//! }
//! ```

mod error;
mod feature;
pub mod store;

pub use error::StoreError;
pub use feature::{Feature, FeaturePatch, generate_id};
