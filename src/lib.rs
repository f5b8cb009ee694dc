//! # Easy Store
//!
//! A small state container that notifies observers on change and persists a
//! filtered projection of its state into a key-value storage area.
//!
//! ## Core Concepts
//!
//! - **Snapshots**: The state is a JSON object, frozen into a shared,
//!   read-only snapshot and replaced (never mutated) on every update
//! - **Updates**: Partials shallow-merged onto the current snapshot, given
//!   as values, functions of the state, or futures
//! - **Observers**: Callbacks run in subscription order after each update
//! - **Persistence**: Allow-list / deny-list filtered JSON written to an
//!   injected storage area after each update, and restored on startup
//!
//! ## Example
//!
//! ```ignore
//! use easy_store::{into_partial, Storages, Store, StoreOptions, Update};
//! use serde_json::json;
//!
//! let storages = Storages::on_disk("./scratch")?;
//! let store = Store::new(
//!     StoreOptions::new(into_partial(json!({"counter": 0}))?).whitelist(["counter"]),
//!     &storages,
//! )?;
//!
//! let subscription = store.subscribe(|state| println!("state: {:?}", state));
//!
//! store.set_state_sync(into_partial(json!({"counter": 1}))?);
//! store
//!     .set_state_async(Update::deferred(fetch_message()), true)
//!     .await;
//!
//! subscription.unsubscribe();
//! ```

pub mod error;
pub mod state;
pub mod storage;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use error::{BoxError, Result, StoreError};
pub use state::{fold, merge, AsyncPatchFn, DeferredPatch, Patch, PatchFn, PersistFilter, Update};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, Storages};
pub use store::{Store, StoreOptions, DEFAULT_STORAGE_KEY};
pub use subscriptions::{Observer, ObserverRegistry, Subscription, SubscriptionId};
pub use types::*;
