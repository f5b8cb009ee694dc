//! Update sources and their resolution into partials.

use crate::error::{BoxError, Result, StoreError};
use crate::types::{Partial, Snapshot};
use futures::future::{self, BoxFuture, FutureExt, TryFutureExt};
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use super::operations::fold;

/// Computes a partial from the current snapshot.
pub type PatchFn = Box<dyn FnOnce(&Snapshot) -> Partial + Send>;

/// A partial available once a future resolves.
pub type DeferredPatch = BoxFuture<'static, std::result::Result<Partial, BoxError>>;

/// Computes a deferred partial from the current snapshot.
pub type AsyncPatchFn = Box<dyn FnOnce(&Snapshot) -> DeferredPatch + Send>;

/// A synchronous update: a partial, or a function producing one.
pub enum Patch {
    Value(Partial),
    Function(PatchFn),
}

impl Patch {
    pub fn value(partial: Partial) -> Self {
        Patch::Value(partial)
    }

    pub fn function<F>(f: F) -> Self
    where
        F: FnOnce(&Snapshot) -> Partial + Send + 'static,
    {
        Patch::Function(Box::new(f))
    }

    /// A panic in the function is caught and reported as
    /// [`StoreError::UpdatePanicked`].
    pub(crate) fn resolve(self, current: &Snapshot) -> Result<Partial> {
        match self {
            Patch::Value(partial) => Ok(partial),
            Patch::Function(f) => call_guarded(|| f(current)),
        }
    }
}

impl From<Partial> for Patch {
    fn from(partial: Partial) -> Self {
        Patch::Value(partial)
    }
}

/// An asynchronous update.
pub enum Update {
    /// A plain partial.
    Value(Partial),
    /// A function of the current snapshot, returning a partial.
    Function(PatchFn),
    /// A function of the current snapshot, returning a deferred partial.
    AsyncFunction(AsyncPatchFn),
    /// A partial that is still being computed.
    Deferred(DeferredPatch),
    /// Updates resolved concurrently and folded in order.
    Collection(Vec<Update>),
}

impl Update {
    pub fn value(partial: Partial) -> Self {
        Update::Value(partial)
    }

    pub fn function<F>(f: F) -> Self
    where
        F: FnOnce(&Snapshot) -> Partial + Send + 'static,
    {
        Update::Function(Box::new(f))
    }

    pub fn async_function<F, Fut, E>(f: F) -> Self
    where
        F: FnOnce(&Snapshot) -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<Partial, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Update::AsyncFunction(Box::new(move |current: &Snapshot| -> DeferredPatch {
            f(current).map_err(Into::into).boxed()
        }))
    }

    pub fn deferred<Fut, E>(fut: Fut) -> Self
    where
        Fut: Future<Output = std::result::Result<Partial, E>> + Send + 'static,
        E: Into<BoxError> + 'static,
    {
        Update::Deferred(fut.map_err(Into::into).boxed())
    }

    pub fn collection<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Update>,
    {
        Update::Collection(items.into_iter().collect())
    }

    /// Resolve to a single partial.
    ///
    /// Functions are invoked immediately with `current`, including those
    /// inside a collection. Collection elements are then awaited together;
    /// the first failure fails the whole update and nothing is folded.
    /// A function that panics when invoked fails the update the same way.
    pub(crate) fn resolve(self, current: Snapshot) -> BoxFuture<'static, Result<Partial>> {
        match self {
            Update::Value(partial) => future::ready(Ok(partial)).boxed(),
            Update::Function(f) => future::ready(call_guarded(|| f(&current))).boxed(),
            Update::AsyncFunction(f) => match call_guarded(|| f(&current)) {
                Ok(fut) => fut.map_err(StoreError::Resolve).boxed(),
                Err(e) => future::ready(Err(e)).boxed(),
            },
            Update::Deferred(fut) => fut.map_err(StoreError::Resolve).boxed(),
            Update::Collection(items) => {
                let pending: Vec<_> = items
                    .into_iter()
                    .map(|item| item.resolve(current.clone()))
                    .collect();

                async move {
                    let partials = future::try_join_all(pending).await?;
                    Ok::<_, StoreError>(fold(partials))
                }
                .boxed()
            }
        }
    }
}

/// Run a caller-supplied function, turning a panic into an error.
fn call_guarded<T>(f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| StoreError::UpdatePanicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl From<Partial> for Update {
    fn from(partial: Partial) -> Self {
        Update::Value(partial)
    }
}

impl From<Patch> for Update {
    fn from(patch: Patch) -> Self {
        match patch {
            Patch::Value(partial) => Update::Value(partial),
            Patch::Function(f) => Update::Function(f),
        }
    }
}

impl<T: Into<Update>> FromIterator<T> for Update {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Update::Collection(iter.into_iter().map(Into::into).collect())
    }
}
