use chrono::{Duration, NaiveDate, NaiveDateTime};

use clipdb_core::ClippingRecord;
use clipdb_dedup::{collapse_near_duplicates, dedupe, redundant_marks};

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 5).unwrap().and_hms_opt(14, 32, 10).unwrap()
}

fn rec(body: &str, offset_secs: Option<i64>, index: usize) -> ClippingRecord {
    ClippingRecord {
        title: "Book".to_string(),
        metadata_line: "- Your Highlight | Added on 5 March 2021 14:32:10".to_string(),
        body: body.to_string(),
        added_at: offset_secs.map(|s| t0() + Duration::seconds(s)),
        source_index: index,
    }
}

fn bodies(records: &[ClippingRecord]) -> Vec<&str> {
    records.iter().map(|r| r.body.as_str()).collect()
}

#[test]
fn exact_body_already_on_disk_is_dropped() {
    let out = dedupe("Hello world\n", vec![rec("Hello world", Some(0), 0)]);
    assert!(out.kept.is_empty());
    assert_eq!(out.duplicates_exact, 1);
}

#[test]
fn superstring_of_disk_text_is_not_contained() {
    let out = dedupe("Hello world\n", vec![rec("Hello world!", Some(0), 0)]);
    assert_eq!(bodies(&out.kept), vec!["Hello world!"]);
    assert_eq!(out.duplicates_exact, 0);
}

#[test]
fn substring_of_disk_text_is_contained() {
    let out = dedupe("Hello world!\n...\n\n", vec![rec("Hello world", Some(0), 0)]);
    assert!(out.kept.is_empty(), "containment is plain substring search");
}

#[test]
fn near_duplicates_ten_seconds_apart_collapse_to_the_later_one() {
    let out = dedupe(
        "",
        vec![rec("The quick brown fox", Some(0), 0), rec("The quick brown fox.", Some(10), 1)],
    );
    assert_eq!(bodies(&out.kept), vec!["The quick brown fox."]);
    assert_eq!(out.duplicates_fuzzy, 1);
}

#[test]
fn near_duplicates_ninety_seconds_apart_both_survive() {
    let out = dedupe(
        "",
        vec![rec("The quick brown fox", Some(0), 0), rec("The quick brown fox.", Some(90), 1)],
    );
    assert_eq!(bodies(&out.kept), vec!["The quick brown fox", "The quick brown fox."]);
    assert_eq!(out.duplicates_fuzzy, 0);
}

#[test]
fn exactly_one_minute_apart_is_not_close_enough() {
    let out = dedupe(
        "",
        vec![rec("The quick brown fox", Some(0), 0), rec("The quick brown fox.", Some(60), 1)],
    );
    assert_eq!(out.kept.len(), 2);
}

#[test]
fn undated_records_never_collapse() {
    let out = dedupe(
        "",
        vec![rec("The quick brown fox", None, 0), rec("The quick brown fox.", Some(5), 1)],
    );
    assert_eq!(out.kept.len(), 2);
}

#[test]
fn dissimilar_records_close_in_time_both_survive() {
    let out = dedupe("", vec![rec("Call me Ishmael.", Some(0), 0), rec("Zzz", Some(5), 1)]);
    assert_eq!(out.kept.len(), 2);
}

#[test]
fn chain_of_extensions_collapses_to_the_last() {
    let records = vec![
        rec("The quick brown", Some(0), 0),
        rec("The quick brown fox", Some(5), 1),
        rec("The quick brown fox jumps", Some(10), 2),
    ];
    assert_eq!(redundant_marks(&records), vec![true, true, false]);
    let out = dedupe("", records);
    assert_eq!(bodies(&out.kept), vec!["The quick brown fox jumps"]);
    assert_eq!(out.duplicates_fuzzy, 2);
}

#[test]
fn order_is_preserved_not_resorted_by_time() {
    let records =
        vec![rec("Later thought about something", Some(500), 0), rec("Xyzzy", Some(-500), 1)];
    let out = dedupe("", records);
    assert_eq!(bodies(&out.kept), vec!["Later thought about something", "Xyzzy"]);
}

#[test]
fn repeated_body_later_in_the_same_run_is_dropped() {
    let records = vec![
        rec("A line worth keeping", Some(0), 0),
        rec("Something else", Some(3600), 1),
        rec("A line worth keeping", Some(7200), 2),
    ];
    let out = dedupe("", records);
    assert_eq!(bodies(&out.kept), vec!["A line worth keeping", "Something else"]);
    assert_eq!(out.duplicates_exact, 1);
}

#[test]
fn collapse_verdict_is_stable_when_successor_is_already_on_disk() {
    // The user shrank the selection, so the kept highlight is not a superstring.
    let first = rec("The quick brown fox jumps", Some(0), 0);
    let second = rec("The quick brown fox", Some(10), 1);

    let run1 = dedupe("", vec![first.clone(), second.clone()]);
    assert_eq!(bodies(&run1.kept), vec!["The quick brown fox"]);

    let on_disk = "The quick brown fox\n\n...\n\n";
    let run2 = dedupe(on_disk, vec![first, second]);
    assert!(run2.kept.is_empty(), "rerun must not resurrect the collapsed highlight");
}

#[test]
fn collapse_near_duplicates_is_generic_over_entries() {
    let kept =
        collapse_near_duplicates(vec![rec("abcdef", Some(0), 0), rec("abcdefg", Some(1), 1)]);
    assert_eq!(bodies(&kept), vec!["abcdefg"]);
    assert!(collapse_near_duplicates(Vec::<ClippingRecord>::new()).is_empty());
}
