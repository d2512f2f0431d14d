//! Search Tests
//!
//! Key search over the active document and the query cache behind it.

use crate::common::*;

// ============================================================================
// Key search
// ============================================================================

#[test]
fn test_find_keys_and_shallowest() {
    let store = Store::ephemeral().unwrap();
    store.upsert("p.q.k", "v").unwrap();
    store.upsert("r.k", "w").unwrap();

    let mut found = store.find_keys("k").unwrap();
    found.sort();
    assert_eq!(found, vec![path("p.q.k"), path("r.k")]);

    let (shallowest, value) = store.find_shallowest("k").unwrap();
    assert_eq!(shallowest, path("r.k"));
    assert_eq!(value, Value::from("w"));
    assert_eq!(store.get_first("k").unwrap(), Value::from("w"));
}

#[test]
fn test_shallowest_among_equal_depths_is_minimal() {
    let store = Store::ephemeral().unwrap();
    store.upsert("a.k", 1).unwrap();
    store.upsert("b.k", 2).unwrap();
    store.upsert("c.d.k", 3).unwrap();

    let (found, _) = store.find_shallowest("k").unwrap();
    assert_eq!(found.depth(), 2);
}

#[test]
fn test_every_found_path_resolves() {
    let store = Store::ephemeral().unwrap();
    store
        .import_bytes(MANIFESTS.as_bytes(), true)
        .unwrap();
    store.switch(1).unwrap();

    let found = store.find_keys("version").unwrap();
    assert_eq!(found.len(), 3);
    for p in found {
        assert_eq!(
            store.get_path(&p.to_string()).unwrap(),
            Value::from("v0.1.0")
        );
    }
}

#[test]
fn test_dotted_label_keys_are_not_reported() {
    let store = Store::ephemeral().unwrap();
    store
        .import_bytes(
            b"metadata:\n  labels:\n    app.kubernetes.io/name: web\n    name: web\n  name: web\n",
            true,
        )
        .unwrap();

    let found = store.find_keys("name").unwrap();
    assert_eq!(found.len(), 2);
    for p in &found {
        assert_eq!(store.get_path(&p.to_string()).unwrap(), Value::from("web"));
    }
    assert_eq!(
        store.find_keys("app.kubernetes.io/name").unwrap_err().kind(),
        ErrorKind::InvalidKeyPath
    );
}

#[test]
fn test_search_looks_inside_arrays() {
    let store = Store::ephemeral().unwrap();
    store.import_bytes(MANIFESTS.as_bytes(), true).unwrap();
    store.switch(1).unwrap();

    let found = store.find_keys("image").unwrap();
    assert_eq!(found, vec![path("spec.template.spec.containers.[0].image")]);
}

#[test]
fn test_find_on_missing_key() {
    let store = Store::ephemeral().unwrap();
    store.upsert("a", 1).unwrap();

    assert!(store.find_keys("nope").unwrap().is_empty());
    assert_eq!(
        store.find_shallowest("nope").unwrap_err().kind(),
        ErrorKind::KeyDoesNotExist
    );
}

#[test]
fn test_search_does_not_modify_document() {
    let store = Store::ephemeral().unwrap();
    store.upsert("x.k", 1).unwrap();
    store.upsert("y.k", 2).unwrap();
    let before = store.active_document().unwrap();

    store.find_keys("k").unwrap();
    store.find_shallowest("k").unwrap();

    assert_eq!(store.active_document().unwrap(), before);
}

// ============================================================================
// Query cache
// ============================================================================

fn cache_lifecycle(store: &Store) {
    store.upsert("test", 1).unwrap();
    assert!(store.cached_paths("test").is_none());

    assert_eq!(store.find_keys("test").unwrap(), vec![path("test")]);
    assert_eq!(
        store.cached_value("test", &path("test")),
        Some(Value::Int(1))
    );

    store.delete("test").unwrap();
    assert!(store.cached_paths("test").is_none());
    assert!(store.find_keys("test").unwrap().is_empty());

    store.upsert("key-1", "value-1").unwrap();
    store
        .upsert("path-1", map(vec![("key-1", Value::from("value-1"))]))
        .unwrap();
    store
        .upsert("path-2", map(vec![("key-1", Value::from("value-1"))]))
        .unwrap();
    assert!(store.cached_paths("key-1").is_none());

    assert_eq!(store.find_keys("key-1").unwrap().len(), 3);
    assert_eq!(store.cached_paths("key-1").unwrap().len(), 3);
    assert_eq!(
        store.cached_value("key-1", &path("key-1")),
        Some(Value::from("value-1"))
    );

    // Removing a path other than the shallowest keeps the bucket
    store.delete("path-1.key-1").unwrap();
    let cached = store.cached_paths("key-1").unwrap();
    assert_eq!(cached.len(), 2);
    assert!(cached.contains(&path("path-2.key-1")));
    assert_eq!(
        store.cached_value("key-1", &path("path-2.key-1")),
        Some(Value::from("value-1"))
    );

    // Removing the shallowest drops it
    store.delete("key-1").unwrap();
    assert!(store.cached_paths("key-1").is_none());
    assert_eq!(store.find_keys("key-1").unwrap().len(), 1);
}

#[test]
fn test_cache_follows_mutations_in_memory() {
    let store = Store::ephemeral().unwrap();
    cache_lifecycle(&store);
}

#[test]
fn test_cache_follows_mutations_on_file() {
    let t = TestStore::new();
    cache_lifecycle(&t.store);
}

#[test]
fn test_deleting_an_ancestor_drops_cached_descendants() {
    let store = Store::ephemeral().unwrap();
    store.upsert("top.k", 1).unwrap();
    store.upsert("tree.a.k", 2).unwrap();
    store.upsert("tree.b.k", 3).unwrap();
    store.find_keys("k").unwrap();

    store.delete("tree").unwrap();

    assert_eq!(store.cached_paths("k"), Some(vec![path("top.k")]));
}

#[test]
fn test_cache_is_scoped_per_document() {
    let store = Store::ephemeral().unwrap();
    store.upsert("a.k", 1).unwrap();
    store.find_keys("k").unwrap();

    store.add_document().unwrap();
    assert!(store.cached_paths("k").is_none());
    store.upsert("b.c.k", 2).unwrap();
    assert_eq!(store.find_keys("k").unwrap(), vec![path("b.c.k")]);

    store.switch(0).unwrap();
    assert_eq!(store.cached_paths("k"), Some(vec![path("a.k")]));
    assert_eq!(store.get_first("k").unwrap(), Value::Int(1));
}

#[test]
fn test_deleting_a_document_shifts_its_successors_cache() {
    let store = Store::ephemeral().unwrap();
    store.upsert("zero.k", 0).unwrap();
    store.find_keys("k").unwrap();
    store.add_document().unwrap();
    store.upsert("one.k", 1).unwrap();
    store.find_keys("k").unwrap();

    store.delete_document(0).unwrap();

    assert_eq!(store.active_index(), 0);
    assert_eq!(store.cached_paths("k"), Some(vec![path("one.k")]));
    assert_eq!(store.get_first("k").unwrap(), Value::Int(1));
}

#[test]
fn test_swap_delete_keeps_cached_search_complete() {
    let t = TestStore::new();
    let store = &t.store;
    store.upsert("id", "top").unwrap();
    store
        .upsert(
            "xs",
            vec![
                map(vec![("id", Value::Int(0))]),
                map(vec![("id", Value::Int(1))]),
                map(vec![("id", Value::Int(2))]),
            ],
        )
        .unwrap();
    assert_eq!(store.find_keys("id").unwrap().len(), 4);

    store.delete("xs.[0]").unwrap();

    let mut found = store.find_keys("id").unwrap();
    found.sort();
    assert_eq!(found, vec![path("id"), path("xs.[0].id"), path("xs.[1].id")]);
    assert_eq!(store.get_path("xs.[0].id").unwrap(), Value::Int(2));
}
