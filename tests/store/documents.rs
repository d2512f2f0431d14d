//! Document Tests
//!
//! Document collection, active document and name bindings.

use crate::common::*;

// ============================================================================
// Collection
// ============================================================================

#[test]
fn test_add_then_delete_document() {
    let store = Store::ephemeral().unwrap();
    assert_eq!(store.document_count(), 1);

    assert_eq!(store.add_document().unwrap(), 1);
    assert_eq!(store.document_count(), 2);
    assert_eq!(store.active_index(), 1);

    store.delete_document(0).unwrap();
    assert_eq!(store.document_count(), 1);
    assert_eq!(store.active_index(), 0);
}

#[test]
fn test_delete_every_document_then_add_again() {
    let store = Store::ephemeral().unwrap();
    store.add_document().unwrap();
    store.switch(0).unwrap();

    store.delete_document(1).unwrap();
    assert_eq!(store.document_count(), 1);
    store.delete_document(0).unwrap();
    assert_eq!(store.document_count(), 0);
    assert_eq!(
        store.upsert("a", 1).unwrap_err().kind(),
        ErrorKind::LibOutOfIndex
    );

    store.add_document().unwrap();
    assert_eq!(store.document_count(), 1);
    store.upsert("a", 1).unwrap();
}

#[test]
fn test_switch_out_of_range() {
    let store = Store::ephemeral().unwrap();
    assert_eq!(store.switch(1).unwrap_err().kind(), ErrorKind::LibOutOfIndex);
    assert_eq!(
        store.delete_document(1).unwrap_err().kind(),
        ErrorKind::LibOutOfIndex
    );
}

#[test]
fn test_operations_target_the_active_document() {
    let store = Store::ephemeral().unwrap();
    store.upsert("owner", "first").unwrap();
    store.add_document().unwrap();
    store.upsert("owner", "second").unwrap();

    store.switch(0).unwrap();
    assert_eq!(store.get_path("owner").unwrap(), Value::from("first"));
    store.delete("owner").unwrap();

    store.switch(1).unwrap();
    assert_eq!(store.get_path("owner").unwrap(), Value::from("second"));
}

// ============================================================================
// Names
// ============================================================================

#[test]
fn test_set_name_and_switch_by_name() {
    let store = Store::ephemeral().unwrap();
    store.add_document().unwrap();

    store.set_name("Primary", 0).unwrap();
    assert_eq!(store.active_index(), 0);

    store.switch(1).unwrap();
    assert_eq!(store.switch_by_name("PRIMARY").unwrap(), 0);
    assert_eq!(store.active_index(), 0);
    assert_eq!(store.list_names(), vec!["primary".to_string()]);

    assert_eq!(
        store.switch_by_name("other").unwrap_err().kind(),
        ErrorKind::DocNotExists
    );
    assert_eq!(
        store.set_name("late", 5).unwrap_err().kind(),
        ErrorKind::LibOutOfIndex
    );
}

#[test]
fn test_set_names_from_manifests() {
    let store = Store::ephemeral().unwrap();
    assert_eq!(
        store.import_bytes(MANIFESTS.as_bytes(), true).unwrap(),
        MANIFEST_DOCUMENTS
    );

    // The Secret has no name
    assert_eq!(store.set_names("kind", "metadata.name").unwrap(), 4);
    assert_eq!(
        store.list_names(),
        vec![
            "configmap/web-settings",
            "deployment/web",
            "horizontalpodautoscaler/web",
            "service/web",
        ]
    );

    for name in store.list_names() {
        let index = store.switch_by_name(&name).unwrap();
        assert_eq!(store.active_index(), index);

        let kind = store.get_path("kind").unwrap();
        let doc_name = store.get_path("metadata.name").unwrap();
        let expected = format!(
            "{}/{}",
            kind.as_str().unwrap().to_lowercase(),
            doc_name.as_str().unwrap().to_lowercase()
        );
        assert_eq!(name, expected);
    }
}

#[test]
fn test_unnamed_documents_are_skipped() {
    let store = Store::ephemeral().unwrap();
    store.import_bytes(MANIFESTS.as_bytes(), true).unwrap();
    store.add_document().unwrap();
    store.add_document().unwrap();

    assert_eq!(store.set_names("kind", "metadata.name").unwrap(), 4);
    assert_eq!(store.document_count(), MANIFEST_DOCUMENTS + 2);
    assert_eq!(store.list_names().len(), 4);
}

#[test]
fn test_names_follow_documents_on_delete() {
    let store = Store::ephemeral().unwrap();
    store.import_bytes(MANIFESTS.as_bytes(), true).unwrap();
    store.set_names("kind", "metadata.name").unwrap();

    let service = store.index_of("service/web").unwrap();
    store.delete_document(service).unwrap();

    assert_eq!(store.index_of("service/web"), None);
    for name in store.list_names() {
        store.switch_by_name(&name).unwrap();
        let kind = store.get_path("kind").unwrap();
        assert!(name.starts_with(&kind.as_str().unwrap().to_lowercase()));
    }
}

#[test]
fn test_delete_all_clears_documents_and_names() {
    let store = Store::ephemeral().unwrap();
    store.import_bytes(MANIFESTS.as_bytes(), false).unwrap();
    store.set_names("kind", "metadata.name").unwrap();

    store.delete_all().unwrap();

    assert_eq!(store.document_count(), 0);
    assert!(store.list_names().is_empty());
    assert_eq!(store.active_index(), 0);
}

// ============================================================================
// Import
// ============================================================================

#[test]
fn test_import_appends_and_discards_empty_documents() {
    let store = Store::ephemeral().unwrap();
    store.upsert("existing", true).unwrap();

    let added = store.import_bytes(MANIFESTS.as_bytes(), false).unwrap();

    assert_eq!(added, MANIFEST_DOCUMENTS);
    assert_eq!(store.document_count(), MANIFEST_DOCUMENTS + 1);
    assert_eq!(store.active_index(), 0);
    assert_eq!(store.get_path("existing").unwrap(), Value::Bool(true));
}

#[test]
fn test_import_can_replace_existing_documents() {
    let store = Store::ephemeral().unwrap();
    store.upsert("existing", true).unwrap();
    store.set_name("old", 0).unwrap();

    store.import_bytes(MANIFESTS.as_bytes(), true).unwrap();

    assert_eq!(store.document_count(), MANIFEST_DOCUMENTS);
    assert!(store.list_names().is_empty());
    assert_eq!(store.get_path("kind").unwrap(), Value::from("Service"));
}

#[test]
fn test_import_rejects_malformed_input() {
    let store = Store::ephemeral().unwrap();
    let err = store.import_bytes(b"a: [1, 2\n", false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
    assert_eq!(store.document_count(), 1);
}
