//! Main Store struct tying state, observers and persistence together.

use crate::error::{Result, StoreError};
use crate::state::{merge, Patch, PersistFilter, Update};
use crate::storage::{StorageBackend, Storages};
use crate::subscriptions::{Observer, ObserverRegistry, Subscription};
use crate::types::{Partial, Snapshot, State, StorageType};
use parking_lot::{ReentrantMutex, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "easyStoreState";

/// Store options.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreOptions {
    /// State used when nothing is persisted under `storage_key`.
    pub initial_state: State,

    /// Key the filtered state is persisted under.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Storage area to persist into.
    #[serde(default)]
    pub storage_type: StorageType,

    /// If non-empty, only these keys are persisted.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Keys that are never persisted.
    #[serde(default)]
    pub blacklist: Vec<String>,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            initial_state: State::new(),
            storage_key: default_storage_key(),
            storage_type: StorageType::default(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
        }
    }
}

impl StoreOptions {
    pub fn new(initial_state: State) -> Self {
        Self {
            initial_state,
            ..Default::default()
        }
    }

    /// Parse options from JSON text (camelCase keys).
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| StoreError::Deserialization(e.to_string()))
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn storage_type(mut self, storage_type: StorageType) -> Self {
        self.storage_type = storage_type;
        self
    }

    pub fn whitelist<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn blacklist<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blacklist = keys.into_iter().map(Into::into).collect();
        self
    }
}

/// The state store.
///
/// Holds the current snapshot, notifies observers after every update and
/// writes a filtered copy of each new snapshot to its storage area.
///
/// Update entry points come in two flavours. `set_state_sync` and
/// `set_state_async` report failures to the log and return nothing;
/// `try_set_state_sync` and `try_set_state_async` return the error.
///
/// An update is fully resolved and merged before it is installed. Once
/// installed, the new snapshot stays current even if notifying observers
/// or persisting fails afterwards.
///
/// Commits are serialized: install, notify and persist of one update finish
/// before the next update installs. Observers may update the store from
/// inside their callback; they must not block on another thread that does.
pub struct Store {
    /// Current snapshot.
    state: RwLock<Snapshot>,

    /// Held across install, notify and persist.
    commit_lock: ReentrantMutex<()>,

    /// Registered observers.
    observers: Arc<ObserverRegistry>,

    /// Key persisted under.
    storage_key: String,

    /// Which area `storage` is.
    storage_type: StorageType,

    /// Selected storage area.
    storage: Arc<dyn StorageBackend>,

    /// Allow-list / deny-list.
    filter: PersistFilter,
}

impl Store {
    /// Create a store, restoring persisted state if any.
    ///
    /// A persisted value replaces `initial_state` entirely. Persisted text
    /// that does not parse, or that is not a JSON object, is an error.
    pub fn new(options: StoreOptions, storages: &Storages) -> Result<Self> {
        let StoreOptions {
            initial_state,
            storage_key,
            storage_type,
            whitelist,
            blacklist,
        } = options;

        let storage = storages.select(storage_type);

        let persisted = storage
            .get_item(&storage_key)?
            .filter(|text| !text.is_empty());
        let restored = persisted.is_some();

        let state = match persisted {
            Some(text) => Self::parse_persisted(&text)?,
            None => initial_state,
        };

        tracing::debug!(
            storage_key = %storage_key,
            storage_type = %storage_type,
            restored,
            "Opened state store"
        );

        Ok(Self {
            state: RwLock::new(Snapshot::freeze(state)),
            commit_lock: ReentrantMutex::new(()),
            observers: Arc::new(ObserverRegistry::new()),
            storage_key,
            storage_type,
            storage,
            filter: PersistFilter::new(whitelist, blacklist),
        })
    }

    fn parse_persisted(text: &str) -> Result<State> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| StoreError::Deserialization(e.to_string()))?;

        match value {
            Value::Object(state) => Ok(state),
            other => Err(StoreError::InvalidFormat(format!(
                "persisted state is not an object: {}",
                other
            ))),
        }
    }

    // --- Reads ---

    /// The current snapshot.
    pub fn get_state(&self) -> Snapshot {
        self.state.read().clone()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    // --- Updates ---

    /// Apply a partial (or a function of the current state) synchronously.
    ///
    /// Failures are logged, not returned.
    pub fn set_state_sync(&self, patch: impl Into<Patch>) {
        if let Err(e) = self.try_set_state_sync(patch) {
            tracing::error!("Error updating state: {}", e);
        }
    }

    /// Like [`Store::set_state_sync`], returning the failure.
    pub fn try_set_state_sync(&self, patch: impl Into<Patch>) -> Result<()> {
        let current = self.get_state();
        let partial = patch.into().resolve(&current)?;
        self.commit(partial)
    }

    /// Apply an asynchronous update.
    ///
    /// `is_async` must be true; otherwise the call is refused and nothing
    /// changes. Failures are logged, not returned.
    pub async fn set_state_async(&self, update: impl Into<Update>, is_async: bool) {
        match self.try_set_state_async(update, is_async).await {
            Ok(()) => {}
            Err(StoreError::NotAsync) => tracing::error!("This is not an Async function"),
            Err(e) => tracing::error!("Error updating state: {}", e),
        }
    }

    /// Like [`Store::set_state_async`], returning the failure.
    ///
    /// Functions in `update` see the snapshot current when this is called.
    /// The resolved partial is merged onto the snapshot current once
    /// resolution finishes, so concurrent updates land in completion order.
    pub async fn try_set_state_async(
        &self,
        update: impl Into<Update>,
        is_async: bool,
    ) -> Result<()> {
        if !is_async {
            return Err(StoreError::NotAsync);
        }

        let partial = update.into().resolve(self.get_state()).await?;
        self.commit(partial)
    }

    /// Merge, freeze and install, then notify and persist.
    fn commit(&self, partial: Partial) -> Result<()> {
        let _commit = self.commit_lock.lock();

        let snapshot = {
            let mut state = self.state.write();
            let next = Snapshot::freeze(merge(&state, partial));
            *state = next.clone();
            next
        };

        let notified = match self.observers.notify(&snapshot) {
            0 => Ok(()),
            failed => Err(StoreError::Observer { failed }),
        };
        let persisted = self.persist(&snapshot);

        if let (Err(_), Err(e)) = (&notified, &persisted) {
            tracing::error!("Error persisting state: {}", e);
        }

        notified.and(persisted)
    }

    /// Write the filtered snapshot to storage.
    ///
    /// An observer that updated the store during notification has already
    /// persisted a newer snapshot; an outdated one is not written over it.
    fn persist(&self, snapshot: &Snapshot) -> Result<()> {
        if !Snapshot::ptr_eq(&self.state.read(), snapshot) {
            tracing::trace!(storage_key = %self.storage_key, "Skipping outdated snapshot");
            return Ok(());
        }

        let filtered = self.filter.apply(snapshot);
        let text = serde_json::to_string(&filtered)?;

        tracing::trace!(
            storage_key = %self.storage_key,
            bytes = text.len(),
            "Persisting state"
        );

        self.storage.set_item(&self.storage_key, &text)
    }

    // --- Observers ---

    /// Register an observer, called after every update.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        self.observers.subscribe(Arc::new(observer))
    }

    /// Register an already-shared observer. The same observer may be
    /// registered more than once.
    pub fn subscribe_shared(&self, observer: Arc<Observer>) -> Subscription {
        self.observers.subscribe(observer)
    }

    /// Remove every registration of `observer`. Returns how many were removed.
    pub fn unsubscribe_observer(&self, observer: &Arc<Observer>) -> usize {
        self.observers.unsubscribe_observer(observer)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}
