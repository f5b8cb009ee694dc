//! State transitions: merging partials, resolving updates, and filtering
//! what gets persisted.

mod filter;
mod operations;
mod update;

pub use filter::PersistFilter;
pub use operations::{fold, merge};
pub use update::{AsyncPatchFn, DeferredPatch, Patch, PatchFn, Update};
