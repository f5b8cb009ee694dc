//! Observer registry for store updates.
//!
//! Observers are plain callbacks. They are invoked synchronously, in
//! subscription order, once per completed update, with the new snapshot.
//!
//! # Example
//!
//! ```ignore
//! let subscription = store.subscribe(|state| {
//!     println!("count is now {}", state["count"]);
//! });
//!
//! store.set_state_sync(partial);
//!
//! // Stop listening; calling this again is a no-op.
//! subscription.unsubscribe();
//! ```

mod manager;
mod types;

pub use manager::ObserverRegistry;
pub use types::{Observer, Subscription, SubscriptionId};
