//! File-level round-trip tests exercising the store and the CSV codec
//! together the way the front ends do: parse, bulk replace, snapshot.

use student_grade_manager::csv::{load_students, save_students};
use student_grade_manager::Roster;

#[test]
fn round_trip_preserves_tricky_names() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");

    let mut roster = Roster::new();
    roster.add("Plain Name", 90.0);
    roster.add("Doe, Jane", 72.25);
    roster.add(r#"Smith, "Bob""#, 100.0);

    save_students(&path, roster.students()).unwrap();
    let outcome = load_students(&path).unwrap();

    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.students.len(), roster.len());
    for (original, loaded) in roster.students().iter().zip(&outcome.students) {
        assert_eq!(loaded.id, original.id);
        assert_eq!(loaded.name, original.name);
        assert_eq!(
            format!("{:.2}", loaded.grade),
            format!("{:.2}", original.grade)
        );
    }
}

#[test]
fn multiline_name_survives_as_quoted_field() {
    // The writer quotes newlines, but the line-oriented reader sees the
    // record split across two physical lines: the first half fails to
    // parse and is skipped, the second half is garbage too. This pins the
    // documented limitation so a future streaming reader can lift it.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");

    let mut roster = Roster::new();
    roster.add("one\ntwo", 50.0);
    save_students(&path, roster.students()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "1,\"one\ntwo\",50.00\n");
}

#[test]
fn load_resumes_id_assignment_after_replace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(&path, "5,Alice,90.00\n2,Bob,80.00\n").unwrap();

    let outcome = load_students(&path).unwrap();
    let mut roster = Roster::new();
    roster.replace_all(outcome.students, outcome.next_id);

    assert_eq!(roster.add("Cara", 70.0), 6);
}

#[test]
fn missing_file_starts_empty_with_id_one() {
    let dir = tempfile::tempdir().unwrap();
    let outcome = load_students(&dir.path().join("nope.csv")).unwrap();

    let mut roster = Roster::new();
    roster.replace_all(outcome.students, outcome.next_id);

    assert!(roster.is_empty());
    assert_eq!(roster.add("First", 90.0), 1);
}

#[test]
fn one_garbage_line_among_valid_lines_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(
        &path,
        "1,Alice,90.00\n2,Bob,80.00\nthis is not csv\n3,Cara,70.00\n",
    )
    .unwrap();

    let outcome = load_students(&path).unwrap();
    assert_eq!(outcome.students.len(), 3);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(outcome.skipped[0].line_number, 3);
    assert_eq!(outcome.skipped[0].content, "this is not csv");

    let names: Vec<&str> = outcome.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Alice", "Bob", "Cara"]);
}

#[test]
fn records_added_before_load_are_replaced_wholesale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("students.csv");
    std::fs::write(&path, "1,Persisted,90.00\n").unwrap();

    let mut roster = Roster::new();
    roster.add("never saved", 10.0);
    roster.add("also never saved", 20.0);

    let outcome = load_students(&path).unwrap();
    roster.replace_all(outcome.students, outcome.next_id);

    assert_eq!(roster.len(), 1);
    assert_eq!(roster.students()[0].name, "Persisted");
    assert_eq!(roster.add("new", 50.0), 2);
}
