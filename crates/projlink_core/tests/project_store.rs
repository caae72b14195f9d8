use projlink_core::{
    BlobStorage, LoadReport, MemoryBlobStorage, ProjectFields, ProjectId, ProjectKind,
    ProjectStore, RequiredField, SequentialIdGenerator, StoreChange, StoreError,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

type TestStore = ProjectStore<MemoryBlobStorage, SequentialIdGenerator>;

fn empty_store() -> (TestStore, MemoryBlobStorage) {
    let storage = MemoryBlobStorage::new();
    let store = ProjectStore::load(storage.clone(), SequentialIdGenerator::new("p")).unwrap();
    (store, storage)
}

fn fields(title: &str) -> ProjectFields {
    ProjectFields::new(title, format!("https://{}.dev", title.to_lowercase()))
}

#[test]
fn load_without_blob_starts_empty() {
    let (store, storage) = empty_store();
    assert!(store.is_empty());
    assert_eq!(storage.write_count(), 0);
}

#[test]
fn create_appends_entry_with_fresh_id_and_persists() {
    let (mut store, storage) = empty_store();
    let first = store.create(fields("Alpha")).unwrap();
    let second = store
        .create(
            ProjectFields::new("Beta", "https://beta.dev")
                .with_description("second")
                .with_kind(ProjectKind::Webapp)
                .with_tags(["rust", "wasm"]),
        )
        .unwrap();

    assert_ne!(first.id, second.id);
    let listed = store.list();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0], first);
    assert_eq!(listed[1], second);
    assert_eq!(listed[1].tags, vec!["rust", "wasm"]);
    assert_eq!(storage.write_count(), 2);
}

#[test]
fn create_rejects_missing_title_or_url_without_writing() {
    let (mut store, storage) = empty_store();
    store.create(fields("Keep")).unwrap();

    let err = store
        .create(ProjectFields::new("   ", "https://x.dev"))
        .unwrap_err();
    match err {
        StoreError::Validation(validation) => {
            assert_eq!(validation.missing, vec![RequiredField::Title]);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = store.create(ProjectFields::new("No url", "")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(v) if v.is_missing(RequiredField::Url)));

    assert_eq!(store.len(), 1);
    assert_eq!(storage.write_count(), 1);
}

#[test]
fn update_replaces_entry_in_place() {
    let (mut store, _storage) = empty_store();
    let a = store.create(fields("A")).unwrap();
    let b = store.create(fields("B")).unwrap();
    let c = store.create(fields("C")).unwrap();

    let updated = store
        .update(
            &b.id,
            ProjectFields::new("B2", "https://b2.dev")
                .with_kind(ProjectKind::Webapp)
                .with_tags(["new"]),
        )
        .unwrap();

    assert_eq!(updated.id, b.id);
    let listed = store.list();
    assert_eq!(listed[0], a);
    assert_eq!(listed[1], updated);
    assert_eq!(listed[1].title, "B2");
    assert_eq!(listed[1].kind, ProjectKind::Webapp);
    assert_eq!(listed[2], c);
}

#[test]
fn update_unknown_id_fails_and_leaves_collection_unchanged() {
    let (mut store, storage) = empty_store();
    store.create(fields("Only")).unwrap();
    let before = store.list().to_vec();

    let missing = ProjectId::new("nope");
    let err = store.update(&missing, fields("Other")).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == missing));
    assert_eq!(store.list(), before.as_slice());
    assert_eq!(storage.write_count(), 1);
}

#[test]
fn update_validation_runs_before_lookup() {
    let (mut store, _storage) = empty_store();
    let err = store
        .update(&ProjectId::new("nope"), ProjectFields::new("", ""))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn delete_is_idempotent() {
    let (mut store, storage) = empty_store();
    let a = store.create(fields("A")).unwrap();
    let b = store.create(fields("B")).unwrap();

    assert!(store.delete(&a.id).unwrap());
    assert!(store.get(&a.id).is_none());
    assert!(!store.delete(&a.id).unwrap());
    assert_eq!(store.list(), [b].as_slice());
    // Each delete rewrites the blob, even the no-op one.
    assert_eq!(storage.write_count(), 4);
}

#[test]
fn reload_reproduces_collection_and_order() {
    let (mut store, storage) = empty_store();
    let a = store.create(fields("A")).unwrap();
    store.create(fields("B")).unwrap();
    let c = store.create(fields("C")).unwrap();
    store
        .update(&a.id, fields("A2").with_tags(["x", "y"]))
        .unwrap();
    store.delete(&c.id).unwrap();
    let expected = store.list().to_vec();
    drop(store);

    let reloaded = ProjectStore::load(storage, SequentialIdGenerator::new("q")).unwrap();
    assert_eq!(reloaded.list(), expected.as_slice());
}

#[test]
fn persisted_blob_uses_type_field_and_flat_objects() {
    let (mut store, storage) = empty_store();
    store
        .create(fields("Blog").with_kind(ProjectKind::Webapp).with_tags(["css"]))
        .unwrap();

    let blob = storage.blob().unwrap();
    let json: serde_json::Value = serde_json::from_str(&blob).unwrap();
    let entry = &json.as_array().unwrap()[0];
    assert_eq!(entry["id"], "p-1");
    assert_eq!(entry["title"], "Blog");
    assert_eq!(entry["description"], "");
    assert_eq!(entry["url"], "https://blog.dev");
    assert_eq!(entry["type"], "webapp");
    assert_eq!(entry["tags"], serde_json::json!(["css"]));
}

#[test]
fn create_webapp_increments_webapp_count() {
    let (mut store, _storage) = empty_store();
    store.create(fields("Tool")).unwrap();
    let before = store.count_by_kind(ProjectKind::Webapp);

    let blog = store
        .create(
            ProjectFields::new("Blog", "https://x.com")
                .with_kind(ProjectKind::Webapp)
                .with_tags(["css"]),
        )
        .unwrap();

    assert_eq!(blog.kind, ProjectKind::Webapp);
    assert_eq!(store.count_by_kind(ProjectKind::Webapp), before + 1);
    assert_eq!(store.count_by_kind(ProjectKind::Project), 1);
}

#[test]
fn colliding_ids_are_regenerated() {
    let storage = MemoryBlobStorage::new();
    let mut candidates = vec!["dup", "dup", "fresh"].into_iter();
    let ids = move || ProjectId::new(candidates.next().unwrap_or("spare"));
    let mut store = ProjectStore::load(storage, ids).unwrap();

    let first = store.create(fields("One")).unwrap();
    let second = store.create(fields("Two")).unwrap();
    assert_eq!(first.id.as_str(), "dup");
    assert_eq!(second.id.as_str(), "fresh");
}

#[test]
fn exhausted_id_generator_is_reported() {
    let storage = MemoryBlobStorage::new();
    let mut store = ProjectStore::load(storage, || ProjectId::new("same")).unwrap();
    store.create(fields("One")).unwrap();

    let err = store.create(fields("Two")).unwrap_err();
    assert!(matches!(err, StoreError::IdExhausted { .. }));
    assert_eq!(store.len(), 1);
}

#[test]
fn ids_stay_unique_across_many_creates() {
    let mut store = ProjectStore::open(MemoryBlobStorage::new()).unwrap();
    for index in 0..50 {
        store.create(fields(&format!("P{index}"))).unwrap();
    }
    let ids: HashSet<_> = store.list().iter().map(|entry| entry.id.clone()).collect();
    assert_eq!(ids.len(), 50);
}

#[test]
fn failed_write_rolls_back_every_mutation() {
    let (mut store, storage) = empty_store();
    let a = store.create(fields("A")).unwrap();
    let b = store.create(fields("B")).unwrap();
    let before = store.list().to_vec();
    let revision = store.revision();

    storage.set_fail_writes(true);
    assert!(matches!(
        store.create(fields("C")),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(
        store.update(&a.id, fields("A2")),
        Err(StoreError::Storage(_))
    ));
    assert!(matches!(store.delete(&b.id), Err(StoreError::Storage(_))));

    assert_eq!(store.list(), before.as_slice());
    assert_eq!(store.revision(), revision);
}

#[test]
fn listeners_see_committed_changes_only() {
    let (mut store, storage) = empty_store();
    let seen: Rc<RefCell<Vec<StoreChange>>> = Rc::default();
    let sink = Rc::clone(&seen);
    store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    let a = store.create(fields("A")).unwrap();
    store.update(&a.id, fields("A2")).unwrap();
    let _ = store.create(ProjectFields::new("", ""));
    store.delete(&ProjectId::new("missing")).unwrap();
    storage.set_fail_writes(true);
    let _ = store.delete(&a.id);
    storage.set_fail_writes(false);
    store.delete(&a.id).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            StoreChange::Created(a.id.clone()),
            StoreChange::Updated(a.id.clone()),
            StoreChange::Deleted(a.id.clone()),
        ]
    );
    assert_eq!(store.revision(), 3);
}

#[test]
fn corrupt_blob_fails_strict_load() {
    let storage = MemoryBlobStorage::with_blob("{not json");
    let result = ProjectStore::load(storage, SequentialIdGenerator::default());
    assert!(matches!(result, Err(StoreError::CorruptBlob(_))));
}

#[test]
fn corrupt_blob_resets_and_is_reported_as_fallback() {
    let storage = MemoryBlobStorage::with_blob("[{\"id\":1}]");
    let (mut store, report) =
        ProjectStore::load_or_reset(storage.clone(), SequentialIdGenerator::default()).unwrap();

    assert!(report.is_fallback());
    assert!(matches!(report, LoadReport::ResetAfterCorruption { .. }));
    assert!(store.is_empty());
    // Untouched until the next mutation.
    assert_eq!(storage.blob().as_deref(), Some("[{\"id\":1}]"));

    store.create(fields("Fresh")).unwrap();
    let reloaded = ProjectStore::load(storage, SequentialIdGenerator::default()).unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn load_or_reset_reports_what_it_found() {
    let storage = MemoryBlobStorage::new();
    let (_, report) =
        ProjectStore::load_or_reset(storage.clone(), SequentialIdGenerator::default()).unwrap();
    assert_eq!(report, LoadReport::Empty);

    let mut writer = storage.clone();
    writer
        .write(r#"[{"id":"a","title":"A","description":"","url":"https://a.dev","type":"project","tags":[]}]"#)
        .unwrap();
    let (store, report) =
        ProjectStore::load_or_reset(storage, SequentialIdGenerator::default()).unwrap();
    assert_eq!(report, LoadReport::Loaded { count: 1 });
    assert!(!report.is_fallback());
    assert_eq!(store.list()[0].id.as_str(), "a");
}
