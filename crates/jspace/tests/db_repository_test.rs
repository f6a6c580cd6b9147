//! Tests for highscore repository operations.

use tempfile::NamedTempFile;

use jspace::{HighscoreRepository, NewHighscore, PlayerRecord};

/// Creates a temporary database file and a migrated repository. The file
/// handle must stay in scope to keep the file alive.
fn setup_test_db() -> (NamedTempFile, HighscoreRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = HighscoreRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

fn entry(name: &str, task_index: i32, tries: i32) -> NewHighscore {
    NewHighscore::new(name.to_string(), task_index, tries)
}

#[test]
fn test_upsert_inserts_new_player() {
    let (_db, repo) = setup_test_db();
    let stored = repo.upsert(entry("Ada", 1, 3)).expect("Upsert failed");
    assert_eq!(stored.name(), "Ada");
    assert_eq!(*stored.task_index(), 1);
    assert_eq!(*stored.completed_tries(), 3);
    assert!(*stored.id() > 0);
}

#[test]
fn test_upsert_replaces_existing_player() {
    let (_db, repo) = setup_test_db();
    let first = repo.upsert(entry("Ada", 1, 3)).expect("Upsert failed");
    let second = repo.upsert(entry("Ada", 2, 5)).expect("Upsert failed");

    assert_eq!(first.id(), second.id());
    assert_eq!(*second.task_index(), 2);
    assert_eq!(*second.completed_tries(), 5);
    assert_eq!(repo.list().expect("List failed").len(), 1);
}

#[test]
fn test_upsert_keeps_better_entry() {
    let (_db, repo) = setup_test_db();
    let finished = repo.upsert(entry("Ada", 2, 6)).expect("Upsert failed");

    let kept = repo.upsert(entry("Ada", 0, 1)).expect("Upsert failed");
    assert_eq!(kept, finished);

    let stored = repo
        .get_by_name("Ada")
        .expect("Query failed")
        .expect("entry exists");
    assert_eq!(*stored.task_index(), 2);
    assert_eq!(*stored.completed_tries(), 6);

    let same_task = repo.upsert(entry("Ada", 2, 9)).expect("Upsert failed");
    assert_eq!(*same_task.completed_tries(), 9);
}

#[test]
fn test_get_by_name() {
    let (_db, repo) = setup_test_db();
    repo.upsert(entry("Grace", 0, 1)).expect("Upsert failed");

    let found = repo.get_by_name("Grace").expect("Query failed");
    assert_eq!(found.map(|h| *h.completed_tries()), Some(1));
    assert!(repo.get_by_name("Nobody").expect("Query failed").is_none());
}

#[test]
fn test_list_ranks_by_progress_then_tries() {
    let (_db, repo) = setup_test_db();
    repo.upsert(entry("Slow", 2, 9)).expect("Upsert failed");
    repo.upsert(entry("Behind", 1, 1)).expect("Upsert failed");
    repo.upsert(entry("Fast", 2, 4)).expect("Upsert failed");

    let names: Vec<String> = repo
        .list()
        .expect("List failed")
        .iter()
        .map(|h| h.name().clone())
        .collect();
    assert_eq!(names, vec!["Fast", "Slow", "Behind"]);
}

#[test]
fn test_board_counts_players() {
    let (_db, repo) = setup_test_db();
    assert_eq!(*repo.board().expect("Board failed").players(), 0);

    repo.upsert(entry("Ada", 3, 6)).expect("Upsert failed");
    repo.upsert(entry("Grace", 1, 2)).expect("Upsert failed");

    let board = repo.board().expect("Board failed");
    assert_eq!(*board.players(), 2);
    assert_eq!(board.entries()[0].name(), "Ada");
}

#[test]
fn test_from_record_converts_counters() {
    let record = PlayerRecord::new("Ada".to_string(), 2, 7);
    let new = NewHighscore::from_record(&record).expect("Conversion failed");
    assert_eq!(new.name(), "Ada");
    assert_eq!(*new.task_index(), 2);
    assert_eq!(*new.completed_tries(), 7);

    let huge = PlayerRecord::new("Ada".to_string(), usize::MAX, 0);
    assert!(NewHighscore::from_record(&huge).is_err());
}

#[test]
fn test_reopening_keeps_entries() {
    let (db, repo) = setup_test_db();
    repo.upsert(entry("Ada", 1, 1)).expect("Upsert failed");

    let path = db.path().to_str().expect("Invalid path").to_string();
    let reopened = HighscoreRepository::new(path).expect("Reopen failed");
    assert!(reopened.get_by_name("Ada").expect("Query failed").is_some());
}
