//! Performance benchmarks for the state store.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use easy_store::{into_partial, Partial, Storages, Store, StoreOptions, Update};
use futures::executor::block_on;
use serde_json::{json, Value};
use tempfile::TempDir;

fn obj(value: Value) -> Partial {
    into_partial(value).unwrap()
}

/// State with `keys` top-level entries.
fn wide_state(keys: usize) -> Partial {
    (0..keys)
        .map(|i| (format!("key{}", i), json!({"index": i, "label": "value"})))
        .collect()
}

/// Benchmark sync updates against state of varying width
fn bench_sync_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_update");

    for keys in [10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("state_keys", keys), &keys, |b, &keys| {
            let storages = Storages::in_memory();
            let store = Store::new(StoreOptions::new(wide_state(keys)), &storages).unwrap();

            b.iter(|| {
                store.set_state_sync(obj(json!({"key0": {"index": 0, "label": "updated"}})));
            });
        });
    }

    group.finish();
}

/// Benchmark filtered persistence (allow-list keeps one key)
fn bench_whitelist_update(c: &mut Criterion) {
    let storages = Storages::in_memory();
    let store = Store::new(
        StoreOptions::new(wide_state(1000)).whitelist(["key0"]),
        &storages,
    )
    .unwrap();

    c.bench_function("whitelist_update_1000_keys", |b| {
        b.iter(|| {
            store.set_state_sync(obj(json!({"key0": 1})));
        });
    });
}

/// Benchmark updates persisted to disk
fn bench_file_update(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let storages = Storages::on_disk(dir.path()).unwrap();
    let store = Store::new(StoreOptions::new(obj(json!({"count": 0}))), &storages).unwrap();

    c.bench_function("file_update", |b| {
        b.iter(|| {
            store.set_state_sync(obj(json!({"count": 1})));
        });
    });
}

/// Benchmark async collection resolution
fn bench_async_collection(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_collection");

    for items in [1, 10, 100] {
        group.bench_with_input(BenchmarkId::new("items", items), &items, |b, &items| {
            let storages = Storages::in_memory();
            let store = Store::new(StoreOptions::new(obj(json!({"count": 0}))), &storages).unwrap();

            b.iter(|| {
                let update = Update::collection((0..items).map(|i| {
                    Update::deferred(async move {
                        Ok::<_, easy_store::StoreError>(obj(json!({ "count": i })))
                    })
                }));
                block_on(store.set_state_async(update, true));
            });
        });
    }

    group.finish();
}

/// Benchmark reading the current snapshot
fn bench_get_state(c: &mut Criterion) {
    let storages = Storages::in_memory();
    let store = Store::new(StoreOptions::new(wide_state(1000)), &storages).unwrap();

    c.bench_function("get_state", |b| {
        b.iter(|| {
            black_box(store.get_state());
        });
    });
}

criterion_group!(
    benches,
    bench_sync_update,
    bench_whitelist_update,
    bench_file_update,
    bench_async_collection,
    bench_get_state,
);

criterion_main!(benches);
