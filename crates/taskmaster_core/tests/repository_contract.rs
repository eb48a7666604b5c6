use taskmaster_core::{Context, Repository, TodoItem, TodoList};

fn list(id: &str, revision: i64) -> TodoList {
    let mut list = TodoList::with_id(id, "tests");
    list.revision = revision;
    list
}

#[test]
fn insert_new_entity_returns_none_and_is_readable() {
    let mut repo: Repository<TodoList> = Repository::default();
    let a = list("1", 0);

    assert!(repo.insert(a.clone()).is_none());
    assert_eq!(repo.get_all(), &[a.clone()]);
    assert_eq!(repo.get("1"), Some(&a));
}

#[test]
fn insert_existing_id_returns_stored_value_without_overwriting() {
    let stored = list("1", 3);
    let mut repo = Repository::new(Context::from(vec![stored.clone()]));

    let mut conflicting = list("1", 7);
    conflicting.items.push(TodoItem::new("should not land"));

    assert_eq!(repo.insert(conflicting), Some(stored.clone()));
    assert_eq!(repo.get_all(), &[stored]);
}

#[test]
fn update_existing_returns_prior_value() {
    let mut repo = Repository::new(Context::from(vec![list("1", 0)]));

    let previous = repo.update(list("1", 1)).unwrap();
    assert_eq!(previous.revision, 0);
    assert_eq!(repo.get("1").unwrap().revision, 1);
}

#[test]
fn missing_ids_leave_context_unchanged() {
    let a = list("1", 0);
    let mut repo = Repository::new(Context::from(vec![a.clone()]));

    assert!(repo.delete("2").is_none());
    assert!(repo.update(list("2", 4)).is_none());
    assert!(repo.get("2").is_none());
    assert_eq!(repo.get_all(), &[a]);
}

#[test]
fn upsert_behaves_like_update_or_insert() {
    let mut updated = Repository::new(Context::from(vec![list("1", 0)]));
    let mut via_update = updated.clone();
    let replacement = list("1", 2);
    assert_eq!(
        updated.upsert(replacement.clone()),
        via_update.update(replacement)
    );
    assert_eq!(updated, via_update);

    let mut inserted: Repository<TodoList> = Repository::default();
    let mut via_insert = inserted.clone();
    let fresh = list("9", 0);
    assert_eq!(inserted.upsert(fresh.clone()), via_insert.insert(fresh));
    assert_eq!(inserted, via_insert);
}

#[test]
fn delete_returns_removed_entity() {
    let mut repo = Repository::new(Context::from(vec![list("1", 0), list("2", 0)]));

    let removed = repo.delete("1").unwrap();
    assert_eq!(removed.id, "1");
    assert_eq!(repo.get_all().len(), 1);
    assert_eq!(repo.context().len(), 1);

    repo.delete("2").unwrap();
    assert!(repo.context().is_empty());
}
