//! Global Operation Tests
//!
//! Operations applied to every document at once.

use crate::common::*;

const VERSION_PATHS: [&str; 5] = [
    "spec.selector.matchLabels.version",
    "metadata.labels.version",
    "spec.selector.version",
    "spec.template.selector.matchLabels.version",
    "spec.template.metadata.labels.version",
];

fn manifests() -> Store {
    let store = Store::ephemeral().unwrap();
    store.import_bytes(MANIFESTS.as_bytes(), true).unwrap();
    store.set_names("kind", "metadata.name").unwrap();
    store
}

#[test]
fn test_update_global_bumps_versions_where_present() {
    let store = manifests();

    let mut updated = 0;
    for p in VERSION_PATHS {
        updated += store.update_global(p, "v0.3.0").unwrap();
    }
    // Service: 2, Deployment: 3, ConfigMap: 1, Secret: 1
    assert_eq!(updated, 7);

    for name in store.list_names() {
        if name.starts_with("horizontalpodautoscaler/") {
            continue;
        }
        store.switch_by_name(&name).unwrap();
        assert_eq!(
            store.get_path("metadata.labels.version").unwrap(),
            Value::from("v0.3.0"),
            "document {}",
            name
        );
    }

    let hpa = store.index_of("horizontalpodautoscaler/web").unwrap();
    store.switch(hpa).unwrap();
    assert_eq!(
        store.get_path("metadata.labels").unwrap_err().kind(),
        ErrorKind::KeyDoesNotExist
    );
}

#[test]
fn test_upsert_global_reaches_every_document() {
    let store = manifests();
    store.switch(2).unwrap();

    store.upsert_global("metadata.annotations.team", "platform").unwrap();

    let found = store.get_path_global("metadata.annotations.team").unwrap();
    assert_eq!(found.len(), MANIFEST_DOCUMENTS);
    assert!(found.iter().all(|(_, v)| v == &Value::from("platform")));
    assert_eq!(store.active_index(), 2);
}

#[test]
fn test_upsert_global_aborts_without_partial_writes() {
    let store = manifests();
    store.switch(0).unwrap();
    store.upsert("metadata", "flattened").unwrap();
    let before = store.documents();

    let err = store
        .upsert_global("metadata.annotations.team", "platform")
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotAMap);
    assert_eq!(store.documents(), before);
}

#[test]
fn test_get_path_global_collects_per_document() {
    let store = manifests();
    let replicas = store.get_path_global("spec.replicas").unwrap();
    assert_eq!(replicas, vec![(1, Value::Int(2))]);
}

#[test]
fn test_find_keys_global_maps_document_indices() {
    let store = manifests();
    store.switch(3).unwrap();

    let found = store.find_keys_global("version").unwrap();

    assert_eq!(found.keys().copied().collect::<Vec<_>>(), vec![0, 1, 3, 4]);
    assert_eq!(found[&1].len(), 3);
    assert_eq!(found[&4], vec![path("metadata.labels.version")]);
    assert_eq!(store.active_index(), 3);
}

#[test]
fn test_delete_global_skips_documents_without_path() {
    let store = manifests();
    assert_eq!(store.delete_global("metadata.labels").unwrap(), 4);
    assert!(store.find_keys_global("version").unwrap().contains_key(&0));
    assert!(store.get_path_global("metadata.labels").unwrap().is_empty());
}
