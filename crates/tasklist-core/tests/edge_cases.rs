//! Edge cases for the task store: boundary titles, unusual whitespace, and
//! id handling after churn.

use tasklist_core::{Filter, MAX_TITLE_CHARS, TaskId, TaskStore, ValidationError};

#[test]
fn title_of_exactly_max_chars_is_accepted() {
    let mut store = TaskStore::new();
    let title = "t".repeat(MAX_TITLE_CHARS);
    let task = store.add(&title).expect("100 chars is allowed");
    assert_eq!(task.title().len(), MAX_TITLE_CHARS);
}

#[test]
fn title_one_over_max_is_rejected() {
    let mut store = TaskStore::new();
    let err = store
        .add(&"t".repeat(MAX_TITLE_CHARS + 1))
        .expect_err("101 chars is too long");
    assert_eq!(
        err,
        ValidationError::TitleTooLong {
            len: MAX_TITLE_CHARS + 1,
            max: MAX_TITLE_CHARS
        }
    );
    assert!(store.is_empty());
}

#[test]
fn multibyte_titles_are_measured_in_chars() {
    let mut store = TaskStore::new();
    let title = "日".repeat(MAX_TITLE_CHARS);
    assert!(store.add(&title).is_ok());
    assert!(store.add(&"日".repeat(MAX_TITLE_CHARS + 1)).is_err());
}

#[test]
fn unicode_whitespace_only_title_is_empty() {
    let mut store = TaskStore::new();
    // NBSP and ideographic space are both trimmed.
    assert_eq!(store.add("\u{a0}\u{3000} \t"), Err(ValidationError::EmptyTitle));
}

#[test]
fn inner_whitespace_is_preserved() {
    let mut store = TaskStore::new();
    let task = store.add("  call   the  bank ").expect("valid title");
    assert_eq!(task.title(), "call   the  bank");
}

#[test]
fn empty_store_views_are_empty_for_every_filter() {
    let mut store = TaskStore::new();
    for filter in Filter::ALL {
        store.set_filter(filter);
        assert!(store.filtered_view().is_empty());
    }
    assert_eq!(store.stats().total, 0);
}

#[test]
fn ids_keep_increasing_through_churn() {
    let mut store = TaskStore::new();
    let mut last = TaskId(0);
    for round in 0..50 {
        let task = store.add(&format!("task {round}")).expect("valid title");
        assert!(task.id() > last);
        last = task.id();
        if round % 3 == 0 {
            store.delete(task.id());
        }
    }
    assert_eq!(store.len(), 50 - 17);
}

#[test]
fn delete_from_middle_keeps_neighbors_in_order() {
    let mut store = TaskStore::new();
    let a = store.add("a").expect("valid title");
    let b = store.add("b").expect("valid title");
    let c = store.add("c").expect("valid title");
    store.delete(b.id());
    let ids: Vec<TaskId> = store.tasks().iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![c.id(), a.id()]);
}

#[test]
fn toggled_task_moves_between_filtered_views() {
    let mut store = TaskStore::new();
    let task = store.add("Water plants").expect("valid title");
    assert_eq!(store.tasks_matching(Filter::Pending).len(), 1);
    store.toggle(task.id());
    assert!(store.tasks_matching(Filter::Pending).is_empty());
    assert_eq!(store.tasks_matching(Filter::Completed).len(), 1);
}
