use std::fs;
use taskmaster_core::{
    FileDataManager, Importance, StoreError, TodoItem, TodoList, TodoValidationError,
};

fn populated_list(actor: &str, items: usize) -> TodoList {
    let mut list = TodoList::new(actor);
    for idx in 0..items {
        let mut item = TodoItem::new(format!("task {idx}"));
        item.importance = Importance::Important;
        list.add_item(item);
    }
    list
}

#[test]
fn save_five_lists_and_reload_roundtrips_every_id() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().to_str().unwrap();

    let mut writer = FileDataManager::<TodoList>::file_cache();
    writer.configure("TodoList", url).unwrap();
    writer.load().unwrap();
    let saved: Vec<TodoList> = (0..5).map(|idx| populated_list("simulator", idx)).collect();
    for list in &saved {
        assert!(writer.insert(list.clone()).unwrap().is_none());
    }
    writer.save().unwrap();

    let mut reader = FileDataManager::<TodoList>::file_cache();
    reader.configure("TodoList", url).unwrap();
    let loaded = reader.load().unwrap();

    assert_eq!(loaded.len(), 5);
    assert_eq!(reader.get_all().unwrap(), saved.as_slice());
    for list in &saved {
        assert_eq!(reader.get(&list.id).unwrap(), Some(list));
    }
}

#[test]
fn configure_twice_with_same_parameters_keeps_saved_data() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().to_str().unwrap();

    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager.configure("TodoList", url).unwrap();
    manager.load().unwrap();
    for idx in 0..3 {
        manager.insert(populated_list("phone", idx)).unwrap();
    }
    manager.save().unwrap();

    manager.configure("TodoList", url).unwrap();
    assert_eq!(manager.load().unwrap().len(), 3);

    let mut fresh = FileDataManager::<TodoList>::file_cache();
    fresh.configure("TodoList", url).unwrap();
    fresh.configure("TodoList", url).unwrap();
    assert_eq!(fresh.load().unwrap().len(), 3);
}

#[test]
fn missing_document_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager
        .configure("Fresh", dir.path().join("nested").to_str().unwrap())
        .unwrap();

    assert!(manager.load().unwrap().is_empty());
    assert!(dir.path().join("nested").is_dir());
}

#[test]
fn document_is_a_camel_case_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager
        .configure("Tasks", dir.path().to_str().unwrap())
        .unwrap();
    manager.load().unwrap();
    manager.insert(populated_list("device", 1)).unwrap();
    manager.save().unwrap();

    let raw = fs::read_to_string(dir.path().join("Tasks.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let first = &json.as_array().unwrap()[0];
    assert!(first["id"].is_string());
    assert!(first["items"].is_array());
    assert_eq!(first["revision"], 0);
    assert_eq!(first["isDirty"], true);
    assert_eq!(first["lastUpdatedBy"], "device");
    assert!(first["lastUpdatedOn"].is_string());
    assert_eq!(first["items"][0]["importance"], "important");
    assert_eq!(first["items"][0]["isDone"], false);
    assert!(!dir.path().join("Tasks.json.tmp").exists());
}

#[test]
fn deletions_are_persisted_by_whole_file_replace() {
    let dir = tempfile::tempdir().unwrap();
    let url = dir.path().to_str().unwrap();

    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager.configure("TodoList", url).unwrap();
    manager.load().unwrap();
    let keep = populated_list("a", 0);
    let gone = populated_list("a", 0);
    manager.insert(keep.clone()).unwrap();
    manager.insert(gone.clone()).unwrap();
    manager.save().unwrap();

    manager.delete(&gone.id).unwrap();
    manager.save().unwrap();

    let loaded = manager.load().unwrap();
    assert_eq!(loaded, vec![keep]);
}

#[test]
fn corrupt_document_surfaces_json_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();

    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager
        .configure("Broken", dir.path().to_str().unwrap())
        .unwrap();

    assert!(matches!(manager.load(), Err(StoreError::Json { .. })));
}

#[test]
fn duplicate_ids_in_document_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let list = TodoList::with_id("same", "x");
    let doc = serde_json::to_string(&vec![list.clone(), list]).unwrap();
    fs::write(dir.path().join("Dupes.json"), doc).unwrap();

    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager
        .configure("Dupes", dir.path().to_str().unwrap())
        .unwrap();

    assert!(matches!(manager.load(), Err(StoreError::DuplicateId(id)) if id == "same"));
}

#[test]
fn invalid_entity_blocks_save_and_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = FileDataManager::<TodoList>::file_cache();
    manager
        .configure("TodoList", dir.path().to_str().unwrap())
        .unwrap();
    manager.load().unwrap();
    manager.insert(TodoList::with_id("ok", "x")).unwrap();
    manager.save().unwrap();

    let mut broken = TodoList::with_id("bad", "x");
    broken.revision = -3;
    manager.insert(broken).unwrap();

    let err = manager.save().unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(TodoValidationError::NegativeRevision(-3))
    ));
    assert_eq!(manager.load().unwrap().len(), 1);
}

#[test]
fn standalone_task_cache_uses_same_machinery() {
    let dir = tempfile::tempdir().unwrap();
    let mut tasks = FileDataManager::<TodoItem>::file_cache();
    tasks.configure("Tasks", dir.path().to_str().unwrap()).unwrap();
    tasks.load().unwrap();

    let mut item = TodoItem::new("water plants");
    tasks.insert(item.clone()).unwrap();
    item.toggle_done();
    assert!(tasks.update(item.clone()).unwrap().is_some());
    tasks.save().unwrap();

    assert_eq!(tasks.load().unwrap(), vec![item]);
}
