//! CSV encoding and snapshot writes for the roster.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Student;

/// Whether a name must be wrapped in quotes to survive a round trip.
fn needs_quoting(name: &str) -> bool {
    name.contains([',', '"', '\n'])
}

/// Encode one record as a CSV line (no trailing newline).
///
/// The name is quoted only when it contains a comma, quote, or newline;
/// inside quotes every literal quote doubles. The id is numeric and never
/// quoted, and the grade always carries exactly two fractional digits.
pub fn encode_record(student: &Student) -> String {
    if needs_quoting(&student.name) {
        format!(
            "{},\"{}\",{:.2}",
            student.id,
            student.name.replace('"', "\"\""),
            student.grade
        )
    } else {
        format!("{},{},{:.2}", student.id, student.name, student.grade)
    }
}

/// Write the full roster snapshot, overwriting any existing file, and
/// return the number of records written.
///
/// The parent directory is created on demand so the default `data/` path
/// works on a fresh checkout. The destination is truncated on open, so a
/// failure mid-write can leave a short file; the format has no partial-file
/// recovery beyond the per-line tolerance of the loader.
pub fn save_students(path: &Path, students: &[Student]) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    let file = File::create(path)
        .with_context(|| format!("failed to open {} for writing", path.display()))?;
    let mut writer = BufWriter::new(file);

    for student in students {
        writeln!(writer, "{}", encode_record(student))
            .with_context(|| format!("failed to write to {}", path.display()))?;
    }

    writer
        .flush()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    Ok(students.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(id: i64, name: &str, grade: f64) -> Student {
        Student {
            id,
            name: name.to_string(),
            grade,
        }
    }

    #[test]
    fn plain_name_is_not_quoted() {
        assert_eq!(encode_record(&student(1, "Jane Doe", 87.5)), "1,Jane Doe,87.50");
    }

    #[test]
    fn comma_in_name_forces_quoting() {
        assert_eq!(
            encode_record(&student(2, "Doe, Jane", 90.0)),
            "2,\"Doe, Jane\",90.00"
        );
    }

    #[test]
    fn quotes_are_doubled_inside_quoted_field() {
        assert_eq!(
            encode_record(&student(3, r#"Smith, "Bob""#, 91.0)),
            r#"3,"Smith, ""Bob""",91.00"#
        );
    }

    #[test]
    fn newline_in_name_forces_quoting() {
        assert_eq!(
            encode_record(&student(4, "two\nlines", 55.0)),
            "4,\"two\nlines\",55.00"
        );
    }

    #[test]
    fn grade_always_has_two_fraction_digits() {
        assert_eq!(encode_record(&student(5, "Pat", 100.0)), "5,Pat,100.00");
        assert_eq!(encode_record(&student(6, "Lee", 66.666)), "6,Lee,66.67");
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");

        let first = vec![student(1, "A", 1.0), student(2, "B", 2.0)];
        assert_eq!(save_students(&path, &first).unwrap(), 2);

        let second = vec![student(3, "C", 3.0)];
        assert_eq!(save_students(&path, &second).unwrap(), 1);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "3,C,3.00\n");
    }

    #[test]
    fn save_creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("students.csv");
        save_students(&path, &[student(1, "A", 1.0)]).unwrap();
        assert!(path.exists());
    }
}
