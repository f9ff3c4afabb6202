//! Criterion benchmarks for the search core.
//!
//! Covers indexing, cascading delete and the search pipeline with filters,
//! facets and sorting.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use quiver::prelude::*;
use uuid::Uuid;

const INDEX: &str = "content";

/// Generate documents with a mix of text, keyword and numeric fields.
fn generate_documents(count: usize) -> Vec<Document> {
    let words = [
        "content", "media", "member", "element", "search", "index", "facet", "filter",
        "culture", "segment", "variant", "keyword",
    ];
    let colors = ["red", "green", "blue", "black", "white"];

    (0..count)
        .map(|i| {
            let title = format!("{} {}", words[i % words.len()], words[(i * 7) % words.len()]);
            Document::builder(Uuid::new_v4(), ObjectKind::Content)
                .variation(Variation::culture("en-US"))
                .variation(Variation::culture("da-DK"))
                .field(Field::new("title", IndexValue::texts_r1([title])).with_culture("en-US"))
                .field(
                    Field::new("title", IndexValue::texts_r1(["segment title"]))
                        .with_culture("en-US")
                        .with_segment("campaign"),
                )
                .field(Field::new("color", IndexValue::keywords([colors[i % colors.len()]])))
                .field(Field::new("price", IndexValue::integers([(i % 500) as i64])))
                .field(Field::new("rating", IndexValue::decimals([(i % 50) as f64 / 10.0])))
                .build()
        })
        .collect()
}

fn populated_engine(count: usize) -> SearchEngine {
    let store = Arc::new(MemoryDocumentStore::default());
    for document in generate_documents(count) {
        store.upsert_document(INDEX, document);
    }
    SearchEngine::new(store)
}

fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    group.throughput(Throughput::Elements(1000));
    group.bench_function("upsert_documents", |b| {
        b.iter_with_setup(
            || generate_documents(1000),
            |documents| {
                let store = MemoryDocumentStore::default();
                for document in documents {
                    store.upsert_document(INDEX, document);
                }
                black_box(store.document_count(INDEX))
            },
        )
    });

    group.bench_function("cascade_delete", |b| {
        b.iter_with_setup(
            || {
                let store = MemoryDocumentStore::default();
                let root = Uuid::new_v4();
                store.upsert(INDEX, root, ObjectKind::Content, vec![], vec![], None);
                for _ in 0..1000 {
                    let key = Uuid::new_v4();
                    let trail = IndexValue::keywords([root.to_string(), key.to_string()]);
                    store.upsert(
                        INDEX,
                        key,
                        ObjectKind::Content,
                        vec![],
                        vec![Field::new("PathIds", trail)],
                        None,
                    );
                }
                (store, root)
            },
            |(store, root)| black_box(store.delete(INDEX, &[root])),
        )
    });

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let engine = populated_engine(5000);

    group.bench_function("query_only", |b| {
        let request = SearchRequest::new().culture("en-US").query("facet");
        b.iter(|| black_box(engine.search(INDEX, &request)))
    });

    group.bench_function("filters_and_facets", |b| {
        let request = SearchRequest::new()
            .culture("en-US")
            .segment("campaign")
            .filter(Filter::keyword("color", ["red", "blue"]))
            .filter(Filter::integer_range("price", Some(100), Some(400)))
            .facet(Facet::keyword("color"))
            .facet(Facet::integer_range(
                "price",
                vec![
                    FacetRange::new("cheap", None, Some(100)),
                    FacetRange::new("mid", Some(100), Some(300)),
                    FacetRange::new("high", Some(300), None),
                ],
            ))
            .facet(Facet::decimal_exact("rating"));
        b.iter(|| black_box(engine.search(INDEX, &request)))
    });

    group.bench_function("sort_by_price", |b| {
        let request = SearchRequest::new()
            .culture("en-US")
            .sorter(Sorter::integer("price", Direction::Ascending))
            .sorter(Sorter::text("title", Direction::Descending))
            .take(50);
        b.iter(|| black_box(engine.search(INDEX, &request)))
    });

    group.finish();
}

criterion_group!(benches, bench_indexing, bench_search);
criterion_main!(benches);
