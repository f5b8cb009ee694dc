//! File-backed counter store: subscribe, update synchronously, update from
//! a delayed future, then unsubscribe.
//!
//! Run with `cargo run --example counter`. State persists under `./scratch`,
//! so the counter picks up where the previous run left off.

use easy_store::{into_partial, Patch, StorageType, Storages, Store, StoreError, StoreOptions, Update};
use serde_json::json;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), StoreError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let storages = Storages::on_disk("./scratch")?;

    let store = Store::new(
        StoreOptions::new(into_partial(json!({
            "counter": 0,
            "message": "Hello, World!"
        }))?)
        .storage_key("myStoreState")
        .storage_type(StorageType::LocalStorage)
        .whitelist(["counter"]),
        &storages,
    )?;

    let subscription = store.subscribe(|state| {
        println!("State has changed: {:?}", state);
    });

    println!("Initial state: {:?}", store.get_state());

    store.set_state_sync(Patch::function(|state| {
        let counter = state["counter"].as_i64().unwrap_or(0);
        into_partial(json!({ "counter": counter + 1 })).unwrap_or_default()
    }));
    println!("State after synchronous update: {:?}", store.get_state());

    let delayed = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        into_partial(json!({ "message": "New message after async update" }))
    };
    store.set_state_async(Update::deferred(delayed), true).await;
    println!("State after asynchronous update: {:?}", store.get_state());

    subscription.unsubscribe();
    Ok(())
}
