//! Integration tests for the directory-backed store.

mod common;

use std::fs;
use std::sync::Arc;

use redline::store::SUGGESTIONS_KEY;
use redline::{
    FileStore, GeneratedNameResolver, KeyValueStore, StaticNameResolver, StatusFilter,
    SuggestionService, SuggestionStatus, VoteDirection,
};
use serde_json::json;
use tempfile::TempDir;

use common::{edits, record};

#[test]
fn test_open_creates_directory() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("state");

    let store = FileStore::open(&root).unwrap();

    assert!(root.is_dir());
    assert_eq!(store.root(), root.as_path());
}

#[test]
fn test_set_get_remove() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();

    assert_eq!(store.get("missing").unwrap(), None);
    store.set("greeting", "hello").unwrap();
    store.set("greeting", "hello again").unwrap();
    assert_eq!(store.get("greeting").unwrap().as_deref(), Some("hello again"));
    assert!(store.path_for("greeting").exists());
    assert!(!store.path_for("greeting").with_extension("json.tmp").exists());

    store.remove("greeting").unwrap();
    store.remove("greeting").unwrap();
    assert!(!store.contains("greeting").unwrap());
}

#[test]
fn test_state_survives_reopen() {
    let dir = TempDir::new().unwrap();

    let id = {
        let service = SuggestionService::new(
            FileStore::open(dir.path()).unwrap(),
            StaticNameResolver::new(),
        );
        let sug = service
            .submit("r1", "alice", edits(json!({"name": "New"})), Some("Typo"))
            .unwrap();
        service.vote(&sug.id, "bob", VoteDirection::Upvote).unwrap();
        service.approve(&sug.id, "v1").unwrap();
        sug.id
    };

    let service = SuggestionService::new(
        FileStore::open(dir.path()).unwrap(),
        StaticNameResolver::new(),
    );
    let restored = service.get(&id).unwrap();

    assert_eq!(restored.status(), SuggestionStatus::Approved);
    assert_eq!(restored.reason.as_deref(), Some("Typo"));
    assert_eq!(restored.votes.vote_of("bob"), Some(VoteDirection::Upvote));
    assert_eq!(
        service.apply(&record(json!({"name": "Old"})), "r1")["name"],
        "New"
    );
}

#[test]
fn test_corrupt_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    fs::write(store.path_for(SUGGESTIONS_KEY), "[{\"id\": ").unwrap();

    let service = SuggestionService::new(store, StaticNameResolver::new());

    assert!(service.list("r1", StatusFilter::All).is_empty());
}

#[test]
fn test_generated_names_persist_in_files() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FileStore::open(dir.path()).unwrap());

    let name = GeneratedNameResolver::new(Arc::clone(&store));
    let service = SuggestionService::new(Arc::clone(&store), name);
    let first = service
        .submit("r1", "carol@example.com", edits(json!({"x": 1})), None)
        .unwrap();

    let reopened = Arc::new(FileStore::open(dir.path()).unwrap());
    let service = SuggestionService::new(
        Arc::clone(&reopened),
        GeneratedNameResolver::new(Arc::clone(&reopened)),
    );
    let second = service
        .submit("r1", "carol@example.com", edits(json!({"x": 2})), None)
        .unwrap();

    assert_eq!(first.author_display_name, second.author_display_name);
}
