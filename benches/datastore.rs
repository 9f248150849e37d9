//! Benchmarks for the in-memory DataStore engine.
//!
//! Covers statement parsing, filtered and ordered reads, and transaction
//! snapshots over tables of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lc_datastore::{DataStore, MockDataStore, StatementParser, Value};
use tokio::runtime::Runtime;

fn statements() -> Vec<(&'static str, &'static str)> {
    vec![
        ("create_table", "CREATE TABLE users(id INT PRIMARY KEY, name TEXT, age INT)"),
        ("insert_columns", "INSERT INTO users (name, age) VALUES ($1, $2)"),
        ("update_where", "UPDATE users SET age = $1, name = $2 WHERE id = $3"),
        ("delete_where", "DELETE FROM users WHERE age > $1 AND name != $2"),
        ("select_star", "SELECT * FROM users"),
        (
            "select_complex",
            "SELECT id, name FROM users WHERE age > $1 AND age < $2 ORDER BY name DESC LIMIT 10",
        ),
    ]
}

fn seeded_store(rt: &Runtime, rows: usize) -> MockDataStore {
    rt.block_on(async {
        let store = MockDataStore::new().expect("store");
        store.connect().await.expect("connect");
        store.execute("CREATE TABLE users(id, name, age)", &[]).await.expect("create");
        for i in 0..rows {
            store
                .execute(
                    "INSERT INTO users (name, age) VALUES ($1, $2)",
                    &[Value::from(format!("user{}", i)), Value::from((i % 90) as i64)],
                )
                .await
                .expect("insert");
        }
        store
    })
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("datastore/parse");
    let parser = StatementParser::new().expect("parser");

    for (name, sql) in statements() {
        group.bench_with_input(BenchmarkId::new("statement", name), &sql, |b, sql| {
            b.iter(|| black_box(parser.parse(black_box(sql))));
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("datastore/select");
    let rt = Runtime::new().expect("runtime");

    for rows in [100, 1_000, 10_000] {
        let store = seeded_store(&rt, rows);

        group.bench_with_input(BenchmarkId::new("where", rows), &rows, |b, _| {
            b.iter(|| {
                rt.block_on(store.query(
                    "SELECT name FROM users WHERE age > $1 AND age < $2",
                    &[Value::from(20), Value::from(40)],
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("order_by", rows), &rows, |b, _| {
            b.iter(|| rt.block_on(store.query("SELECT * FROM users ORDER BY age DESC", &[])));
        });
    }

    group.finish();
}

fn bench_transaction(c: &mut Criterion) {
    let mut group = c.benchmark_group("datastore/transaction");
    let rt = Runtime::new().expect("runtime");

    for rows in [100, 1_000, 10_000] {
        let store = seeded_store(&rt, rows);

        // Snapshot plus restore dominates; the body does one insert and bails
        group.bench_with_input(BenchmarkId::new("rollback", rows), &rows, |b, _| {
            b.iter(|| {
                rt.block_on(store.transaction(|tx| async move {
                    tx.execute("INSERT INTO users (name) VALUES ($1)", &[Value::from("tmp")])
                        .await?;
                    tx.rollback().await
                }))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_select, bench_transaction);
criterion_main!(benches);
