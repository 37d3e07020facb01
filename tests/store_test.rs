use crossword::puzzle::Puzzle;
use crossword::store::{
    DRAFTS_KEY, DuplicateAction, FileStore, KeyValueStore, MemoryStore, PublishedMeta, SAVED_KEY,
    WorkLibrary,
};
use crossword::symmetry::SymmetryMode;
use tempfile::tempdir;

fn work(title: &str) -> Puzzle {
    Puzzle::new(title, 3, SymmetryMode::Rotational, vec![false; 9]).unwrap()
}

fn meta(code: &str, title: &str) -> PublishedMeta {
    PublishedMeta {
        code: code.to_string(),
        title: title.to_string(),
        rows: 3,
        cols: 3,
        created_at: Some(1_700_000_000_000),
    }
}

#[test]
fn memory_store_basics() {
    let mut store = MemoryStore::new();
    assert!(store.is_empty());
    store.set("k", "v").unwrap();
    assert_eq!(store.get("k"), Some("v".to_string()));
    assert_eq!(store.len(), 1);
    store.remove("k").unwrap();
    assert_eq!(store.get("k"), None);
}

#[test]
fn file_store_persists_between_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("works.json");

    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("k"), None);
    store.set("k", "v").unwrap();
    store.set("gone", "soon").unwrap();
    store.remove("gone").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("k"), Some("v".to_string()));
    assert_eq!(reopened.get("gone"), None);
    println!("✓ File store survives a reopen");
}

#[test]
fn file_store_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("works.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(FileStore::open(&path).is_err());

    std::fs::write(&path, "").unwrap();
    assert!(FileStore::open(&path).is_ok());
}

#[test]
fn drafts_upsert_newest_first() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    let mut first = work("First");
    let second = work("Second");
    lib.upsert_draft(&first).unwrap();
    lib.upsert_draft(&second).unwrap();

    first.title = "First, edited".to_string();
    lib.upsert_draft(&first).unwrap();

    let titles: Vec<String> = lib.drafts().into_iter().map(|w| w.title).collect();
    assert_eq!(titles, vec!["First, edited", "Second"]);
    println!("✓ Drafts replace by id and move to the front");
}

fn stored_title(stored: Option<Puzzle>) -> Option<String> {
    stored.map(|w| w.title)
}

#[test]
fn saving_handles_title_clashes() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    assert_eq!(
        stored_title(lib.save_work(&work("Sunday "), DuplicateAction::Cancel).unwrap()),
        Some("Sunday".to_string())
    );

    assert_eq!(lib.save_work(&work("Sunday"), DuplicateAction::Cancel).unwrap(), None);
    assert_eq!(lib.saved().len(), 1);

    assert_eq!(
        stored_title(lib.save_work(&work("Sunday"), DuplicateAction::Duplicate).unwrap()),
        Some("Sunday (1)".to_string())
    );
    assert_eq!(
        stored_title(lib.save_work(&work("Sunday"), DuplicateAction::Duplicate).unwrap()),
        Some("Sunday (2)".to_string())
    );
    assert_eq!(lib.saved().len(), 3);
    println!("✓ Cancel and duplicate behave");
}

#[test]
fn blank_titles_are_saved_as_untitled() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    let stored = lib.save_work(&work("  "), DuplicateAction::Duplicate).unwrap().unwrap();
    assert_eq!(stored.title, "Untitled");
    assert_eq!(lib.saved()[0].title, "Untitled");

    let again = lib.save_work(&work(""), DuplicateAction::Duplicate).unwrap().unwrap();
    assert_eq!(again.title, "Untitled (1)");

    let draft = lib.save_draft(&work(""), DuplicateAction::Cancel).unwrap().unwrap();
    assert_eq!(draft.title, "Untitled");
}

#[test]
fn overwrite_keeps_the_existing_id() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    let original = lib.save_work(&work("Sunday"), DuplicateAction::Cancel).unwrap().unwrap();

    let mut replacement = work("Sunday");
    replacement.set_letter(0, "z").unwrap();
    assert_ne!(replacement.id, original.id);

    let stored = lib.save_work(&replacement, DuplicateAction::Overwrite).unwrap().unwrap();
    assert_eq!(stored.id, original.id);

    let saved = lib.saved();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, original.id);
    assert_eq!(saved[0].fills[0], "Z", "content comes from the new work");
    println!("✓ Overwrite replaces content under the old id");
}

#[test]
fn saving_a_work_retires_its_draft() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    lib.upsert_draft(&work("Alpha")).unwrap();
    lib.upsert_draft(&work("Beta")).unwrap();

    lib.save_work(&work("Alpha"), DuplicateAction::Cancel).unwrap();
    let drafts: Vec<String> = lib.drafts().into_iter().map(|w| w.title).collect();
    assert_eq!(drafts, vec!["Beta"]);

    // a renamed duplicate leaves the draft alone
    lib.save_work(&work("Beta"), DuplicateAction::Cancel).unwrap();
    lib.upsert_draft(&work("Beta")).unwrap();
    lib.save_work(&work("Beta"), DuplicateAction::Duplicate).unwrap();
    assert_eq!(lib.drafts().len(), 1);
    println!("✓ A work saved under its own title leaves the drafts list");
}

#[test]
fn draft_saves_check_titles() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    let first = lib.save_draft(&work("Draft"), DuplicateAction::Cancel).unwrap().unwrap();

    assert_eq!(lib.save_draft(&work("Draft"), DuplicateAction::Cancel).unwrap(), None);
    assert_eq!(lib.drafts().len(), 1);

    let dup = lib.save_draft(&work("Draft"), DuplicateAction::Duplicate).unwrap().unwrap();
    assert_eq!(dup.title, "Draft (1)");
    assert_eq!(lib.drafts().len(), 2);

    let over = lib.save_draft(&work("Draft"), DuplicateAction::Overwrite).unwrap().unwrap();
    assert_eq!(over.id, first.id);
    assert_eq!(lib.drafts().len(), 2);
}

#[test]
fn title_across_fills_the_first_gap() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    assert_eq!(lib.next_title_across("T"), "T");

    lib.upsert_draft(&work("T")).unwrap();
    lib.record_published(meta("AAA111", "T (2)")).unwrap();
    assert_eq!(lib.next_title_across("T"), "T (1)");

    lib.save_work(&work("T (1)"), DuplicateAction::Cancel).unwrap();
    assert_eq!(lib.next_title_across(" T "), "T (3)");
    assert_eq!(lib.next_title_across(""), "Untitled");
    println!("✓ Publish titles take the lowest free number");
}

#[test]
fn publishing_settles_the_title_first() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    let fresh = lib.publish_work(&work("Solo"), "SOLO01", DuplicateAction::Cancel).unwrap().unwrap();
    assert_eq!(fresh.title, "Solo");
    assert_eq!((fresh.rows, fresh.cols), (3, 3));

    lib.upsert_draft(&work("Shared")).unwrap();
    assert_eq!(lib.publish_work(&work("Shared"), "SHR001", DuplicateAction::Cancel).unwrap(), None);

    let dup = lib.publish_work(&work("Shared"), "SHR001", DuplicateAction::Duplicate).unwrap().unwrap();
    assert_eq!(dup.title, "Shared (1)");
    assert_eq!(lib.drafts().len(), 1);

    let over = lib.publish_work(&work("Shared"), "SHR002", DuplicateAction::Overwrite).unwrap().unwrap();
    assert_eq!(over.title, "Shared");
    assert!(lib.drafts().is_empty(), "overwrite clears the title everywhere");
    let codes: Vec<String> = lib.published().into_iter().map(|p| p.code).collect();
    assert_eq!(codes, vec!["SHR002", "SHR001", "SOLO01"]);
}

#[test]
fn titles_span_every_list_and_can_be_removed() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    lib.upsert_draft(&work("Alpha")).unwrap();
    lib.upsert_draft(&work("   ")).unwrap();
    lib.save_work(&work("Beta"), DuplicateAction::Cancel).unwrap();
    lib.record_published(meta("ABC123", "Alpha")).unwrap();
    lib.record_published(meta("XYZ789", "Gamma")).unwrap();
    lib.record_published(meta("ABC123", "Alpha")).unwrap();

    assert_eq!(lib.published().len(), 2);
    let titles: Vec<String> = lib.all_titles().into_iter().collect();
    assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);

    lib.remove_title_everywhere("Alpha").unwrap();
    let titles: Vec<String> = lib.all_titles().into_iter().collect();
    assert_eq!(titles, vec!["Beta", "Gamma"]);
    assert_eq!(lib.drafts().len(), 1, "the blank-titled draft stays");
}

#[test]
fn blank_title_removes_nothing() {
    let mut lib = WorkLibrary::new(MemoryStore::new());
    lib.upsert_draft(&work("")).unwrap();
    lib.upsert_draft(&work("   ")).unwrap();
    lib.record_published(meta("BLANK1", " ")).unwrap();

    lib.remove_title_everywhere("").unwrap();
    lib.remove_title_everywhere("   ").unwrap();
    assert_eq!(lib.drafts().len(), 2);
    assert_eq!(lib.published().len(), 1);
    println!("✓ Removing a blank title is a no-op");
}

#[test]
fn unreadable_lists_read_as_empty() {
    let mut store = MemoryStore::new();
    store.set(DRAFTS_KEY, "oops").unwrap();
    store.set(SAVED_KEY, "{\"not\": \"a list\"}").unwrap();

    let lib = WorkLibrary::new(store);
    assert!(lib.drafts().is_empty());
    assert!(lib.saved().is_empty());
    assert!(lib.published().is_empty());
}

#[test]
fn library_works_over_a_file_store() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("library.json");
    {
        let mut lib = WorkLibrary::new(FileStore::open(&path).unwrap());
        lib.upsert_draft(&work("On disk")).unwrap();
    }
    let lib = WorkLibrary::new(FileStore::open(&path).unwrap());
    assert_eq!(lib.drafts()[0].title, "On disk");
    assert!(lib.store().get(DRAFTS_KEY).is_some());
}
