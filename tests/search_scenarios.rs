//! End-to-end search scenarios over the in-memory store.

use std::sync::Arc;

use quiver::prelude::*;
use uuid::Uuid;

const INDEX: &str = "content";

fn engine() -> (Arc<MemoryDocumentStore>, SearchEngine) {
    let store = Arc::new(MemoryDocumentStore::default());
    store.reset(INDEX);
    let engine = SearchEngine::new(store.clone());
    (store, engine)
}

fn id_field(key: Uuid) -> Field {
    Field::new("Id", IndexValue::keywords([key.to_string()]))
}

fn keys(result: &SearchResult) -> Vec<Uuid> {
    result.documents.iter().map(|document| document.key).collect()
}

#[test]
fn test_negated_id_filter_excludes_document() -> Result<()> {
    let (store, engine) = engine();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    store.upsert(
        INDEX,
        a,
        ObjectKind::Content,
        vec![Variation::invariant()],
        vec![
            id_field(a),
            Field::new("title", IndexValue::texts_r1(["Root"])),
            Field::new("body", IndexValue::texts(["X"])).with_segment("segment-1"),
        ],
        None,
    );
    store.upsert(
        INDEX,
        b,
        ObjectKind::Content,
        vec![Variation::invariant()],
        vec![id_field(b), Field::new("title", IndexValue::texts_r1(["Root"]))],
        None,
    );

    let result = engine.search(INDEX, &SearchRequest::new().query("Root"))?;
    assert_eq!(result.total, 2);

    let request = SearchRequest::new()
        .query("Root")
        .filter(Filter::keyword("Id", [a.to_string()]).negated());
    let result = engine.search(INDEX, &request)?;
    assert_eq!(result.total, 1);
    assert_eq!(keys(&result), vec![b]);
    assert_eq!(result.documents[0].object_kind, ObjectKind::Content);

    Ok(())
}

#[test]
fn test_fallback_is_exclusive_and_counted_once() -> Result<()> {
    let (store, engine) = engine();
    let pinned = Uuid::new_v4();
    let fallback = Uuid::new_v4();

    store.upsert_document(
        INDEX,
        Document::builder(pinned, ObjectKind::Content)
            .variation(Variation::culture("en-US"))
            .field(Field::new("tag", IndexValue::keywords(["default"])).with_culture("en-US"))
            .field(
                Field::new("tag", IndexValue::keywords(["segmented"]))
                    .with_culture("en-US")
                    .with_segment("s1"),
            )
            .build(),
    );
    store.upsert_document(
        INDEX,
        Document::builder(fallback, ObjectKind::Content)
            .variation(Variation::culture("en-US"))
            .field(Field::new("tag", IndexValue::keywords(["default"])).with_culture("en-US"))
            .build(),
    );

    let request = SearchRequest::new()
        .culture("en-US")
        .segment("s1")
        .facet(Facet::keyword("tag"));
    let result = engine.search(INDEX, &request)?;
    let facet = result.facet("tag").expect("tag facet");

    // The pinned document only counts through its segment value.
    assert_eq!(facet.keyword_count("segmented"), Some(1));
    assert_eq!(facet.keyword_count("default"), Some(1));

    let request = SearchRequest::new()
        .culture("en-US")
        .segment("s1")
        .filter(Filter::keyword("tag", ["default"]));
    let result = engine.search(INDEX, &request)?;
    assert_eq!(keys(&result), vec![fallback]);

    Ok(())
}

#[test]
fn test_null_segment_does_not_see_segment_values() -> Result<()> {
    let (store, engine) = engine();
    store.upsert_document(
        INDEX,
        Document::builder(Uuid::new_v4(), ObjectKind::Content)
            .variation(Variation::culture("en-US"))
            .field(
                Field::new("body", IndexValue::texts(["only in X"]))
                    .with_culture("en-US")
                    .with_segment("X"),
            )
            .build(),
    );

    let in_default = engine.search(INDEX, &SearchRequest::new().culture("en-US").query("only"))?;
    assert_eq!(in_default.total, 0);

    let in_x = engine.search(
        INDEX,
        &SearchRequest::new().culture("en-US").segment("X").query("only"),
    )?;
    assert_eq!(in_x.total, 1);

    Ok(())
}

#[test]
fn test_variation_scoping() -> Result<()> {
    let (store, engine) = engine();
    let english = Uuid::new_v4();
    let danish = Uuid::new_v4();
    let invariant = Uuid::new_v4();

    for (key, variation) in [
        (english, Variation::culture("en-US")),
        (danish, Variation::culture("da-DK")),
        (invariant, Variation::invariant()),
    ] {
        store.upsert_document(
            INDEX,
            Document::builder(key, ObjectKind::Content)
                .variation(variation)
                .build(),
        );
    }

    let result = engine.search(INDEX, &SearchRequest::new().culture("en-us"))?;
    assert_eq!(keys(&result), vec![english, invariant]);

    let result = engine.search(INDEX, &SearchRequest::new())?;
    assert_eq!(keys(&result), vec![invariant]);

    Ok(())
}

#[test]
fn test_active_facet_keeps_selected_bucket() -> Result<()> {
    let (store, engine) = engine();
    let colors = ["red", "red", "blue", "green"];
    for (i, color) in colors.iter().enumerate() {
        store.upsert_document(
            INDEX,
            Document::builder(Uuid::new_v4(), ObjectKind::Content)
                .variation(Variation::invariant())
                .field(Field::new("color", IndexValue::keywords([*color])))
                .field(Field::new("size", IndexValue::integers([i as i64 % 2])))
                .field(Field::new("kind", IndexValue::keywords(["shirt"])))
                .build(),
        );
    }

    let request = SearchRequest::new()
        .filter(Filter::keyword("kind", ["shirt"]))
        .filter(Filter::keyword("color", ["red"]))
        .facet(Facet::keyword("color"))
        .facet(Facet::integer_exact("size"));
    let result = engine.search(INDEX, &request)?;

    assert_eq!(result.total, 2);

    let color = result.facet("color").expect("color facet");
    assert_eq!(color.keyword_count("red"), Some(2));
    assert_eq!(color.keyword_count("blue"), Some(1));
    assert_eq!(color.keyword_count("green"), Some(1));

    // Passive: reflects the red selection (sizes 0 and 1, one each).
    let size = result.facet("size").expect("size facet");
    assert_eq!(
        size.values,
        vec![
            FacetValue::IntegerExact { key: 0, count: 1 },
            FacetValue::IntegerExact { key: 1, count: 1 },
        ]
    );

    Ok(())
}

#[test]
fn test_range_filter_and_facet_bounds_differ() -> Result<()> {
    let (store, engine) = engine();
    for value in [10, 50] {
        store.upsert_document(
            INDEX,
            Document::builder(Uuid::new_v4(), ObjectKind::Content)
                .variation(Variation::invariant())
                .field(Field::new("count", IndexValue::integers([value])))
                .build(),
        );
    }

    // Filter ranges include both bounds.
    let filtered = engine.search(
        INDEX,
        &SearchRequest::new().filter(Filter::integer_range("count", Some(10), Some(50))),
    )?;
    assert_eq!(filtered.total, 2);

    // Facet buckets exclude the lower bound.
    let faceted = engine.search(
        INDEX,
        &SearchRequest::new().facet(Facet::integer_range(
            "count",
            vec![FacetRange::new("10-50", Some(10), Some(50))],
        )),
    )?;
    assert_eq!(faceted.facet("count").and_then(|f| f.range_count("10-50")), Some(1));

    Ok(())
}

#[test]
fn test_access_context() -> Result<()> {
    let (store, engine) = engine();
    let g1 = Uuid::new_v4();
    let g2 = Uuid::new_v4();
    let g3 = Uuid::new_v4();
    let protected = Uuid::new_v4();
    let public = Uuid::new_v4();

    store.upsert(
        INDEX,
        protected,
        ObjectKind::Member,
        vec![Variation::invariant()],
        vec![],
        Some(Protection::new([g1, g2])),
    );
    store.upsert(INDEX, public, ObjectKind::Content, vec![Variation::invariant()], vec![], None);

    let anonymous = engine.search(INDEX, &SearchRequest::new())?;
    assert_eq!(keys(&anonymous), vec![public]);

    let member = engine.search(
        INDEX,
        &SearchRequest::new().access_context(AccessContext::new(Uuid::new_v4(), [g1])),
    )?;
    assert_eq!(keys(&member), vec![protected, public]);

    let outsider = engine.search(
        INDEX,
        &SearchRequest::new().access_context(AccessContext::new(Uuid::new_v4(), [g3])),
    )?;
    assert_eq!(keys(&outsider), vec![public]);

    Ok(())
}

#[test]
fn test_delete_cascade_is_visible_to_search() -> Result<()> {
    let (store, engine) = engine();
    let root = Uuid::new_v4();
    let child = Uuid::new_v4();
    let grandchild = Uuid::new_v4();
    let sibling = Uuid::new_v4();

    let trail = |ids: &[Uuid]| Field::new("PathIds", IndexValue::keywords(ids.iter().map(Uuid::to_string)));
    for (key, ids) in [
        (root, vec![root]),
        (child, vec![root, child]),
        (grandchild, vec![root, child, grandchild]),
        (sibling, vec![sibling]),
    ] {
        store.upsert(
            INDEX,
            key,
            ObjectKind::Content,
            vec![Variation::invariant()],
            vec![trail(&ids)],
            None,
        );
    }

    assert_eq!(store.delete(INDEX, &[root]), 3);

    let result = engine.search(INDEX, &SearchRequest::new())?;
    assert_eq!(keys(&result), vec![sibling]);
    assert_eq!(store.get_metadata(INDEX).document_count, 1);

    Ok(())
}

#[test]
fn test_request_from_json() -> Result<()> {
    let (store, engine) = engine();
    store.upsert_document(
        INDEX,
        Document::builder(Uuid::new_v4(), ObjectKind::Media)
            .variation(Variation::invariant())
            .field(Field::new("extension", IndexValue::keywords(["png"])))
            .field(Field::new("bytes", IndexValue::integers([2048])))
            .build(),
    );

    let request = SearchRequest::from_json(
        r#"{
            "filters": [{"field_name": "bytes", "kind": "integer_range", "ranges": [{"min": 1024}]}],
            "facets": [{"field_name": "extension", "kind": "keyword"}],
            "sorters": [{"kind": "score"}],
            "take": 5
        }"#,
    )?;
    let result = engine.search(INDEX, &request)?;

    assert_eq!(result.total, 1);
    assert_eq!(result.documents[0].object_kind, ObjectKind::Media);
    assert_eq!(result.facet("extension").and_then(|f| f.keyword_count("png")), Some(1));

    Ok(())
}
