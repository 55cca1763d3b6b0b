use std::fs;

use tempfile::TempDir;

use clipdb_core::{ClippingRecord, Error, TextCodec};
use clipdb_store::{format_entry, BookStore, MIN_STEM_BUDGET, UNTITLED};

fn rec(body: &str) -> ClippingRecord {
    ClippingRecord {
        title: "Book A".to_string(),
        metadata_line: "- Your Highlight on page 1 | Added on 5 March 2021 14:32:10".to_string(),
        body: body.to_string(),
        added_at: None,
        source_index: 0,
    }
}

#[test]
fn creates_destination_with_parents() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("a/b/c");
    let store = BookStore::new(&root, TextCodec::default()).expect("store");
    assert!(root.is_dir());
    assert_eq!(store.root(), root.as_path());
}

#[test]
fn entry_layout_with_and_without_metadata() {
    let r = rec("Body text");
    assert_eq!(format_entry(&r, false), "Body text\n\n...\n\n");
    assert_eq!(
        format_entry(&r, true),
        "Body text\n- Your Highlight on page 1 | Added on 5 March 2021 14:32:10\n\n...\n\n"
    );
}

#[test]
fn append_only_grows_the_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("Book A.txt");
    fs::write(&path, "Older highlight\n\n...\n\n").unwrap();

    let mut store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    let stem = store.stem_for("Book A");
    assert_eq!(stem, "Book A");
    let book = store.open_or_create(&stem).expect("open");
    assert_eq!(book.existing_text, "Older highlight\n\n...\n\n");
    assert!(!book.touched());

    let written = store.append(&stem, &[rec("New one")], false).expect("append");
    assert_eq!(written, "New one\n\n...\n\n".len());
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "Older highlight\n\n...\n\nNew one\n\n...\n\n"
    );

    let book = store.open_or_create(&stem).unwrap();
    assert!(book.existing_text.ends_with("New one\n\n...\n\n"), "oracle tracks appended text");
    assert_eq!(store.touched_paths().into_iter().collect::<Vec<_>>(), vec![path]);
}

#[test]
fn existing_file_is_loaded_once_per_run() {
    let tmp = TempDir::new().unwrap();
    let mut store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    store.open_or_create("Book A").unwrap();
    fs::write(tmp.path().join("Book A.txt"), "written behind our back").unwrap();
    assert_eq!(store.open_or_create("Book A").unwrap().existing_text, "");
}

#[test]
fn empty_append_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    assert_eq!(store.append("Ghost", &[], true).unwrap(), 0);
    assert!(!tmp.path().join("Ghost.txt").exists());
    assert!(store.touched_paths().is_empty());
}

#[test]
fn symbol_only_titles_land_in_untitled() {
    let tmp = TempDir::new().unwrap();
    let store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    assert_eq!(store.stem_for("???"), UNTITLED);
}

#[test]
fn stem_reserves_room_for_destination_path() {
    let tmp = TempDir::new().unwrap();
    let store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    let reserved = tmp.path().to_string_lossy().len();
    let stem = store.stem_for(&"x".repeat(500));
    assert_eq!(stem.len(), 245 - reserved);
}

#[test]
fn long_multibyte_title_stays_a_legal_file_name() {
    let tmp = TempDir::new().unwrap();
    let mut store = BookStore::new(tmp.path(), TextCodec::default()).unwrap();
    let reserved = tmp.path().to_string_lossy().len();
    let stem = store.stem_for(&"Война и мир ".repeat(20));
    assert!(stem.len() <= 245 - reserved, "{} bytes", stem.len());

    store.append(&stem, &[rec("Все счастливые семьи похожи")], false).expect("append");
    assert!(store.path_for(&stem).is_file());
}

#[test]
fn destination_too_deep_for_any_stem_is_refused() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("d".repeat(245 - MIN_STEM_BUDGET));
    let err = BookStore::new(&root, TextCodec::default()).err().expect("too deep");
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(!root.exists(), "nothing is created for a refused destination");
}

#[test]
fn writes_in_the_requested_encoding() {
    let tmp = TempDir::new().unwrap();
    let codec = TextCodec::for_label("latin1").unwrap();
    let mut store = BookStore::new(tmp.path(), codec).unwrap();
    store.append("Cafe", &[rec("Café")], false).unwrap();
    assert_eq!(fs::read(tmp.path().join("Cafe.txt")).unwrap(), b"Caf\xe9\n\n...\n\n");
}
