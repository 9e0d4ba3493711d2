//! Line-oriented CSV decoding for the roster snapshot file.
//!
//! Decoding is deliberately tolerant at the file level and strict at the
//! line level: a malformed line is skipped with a typed diagnostic and the
//! load carries on, but within a line a non-integer id or a grade without a
//! numeric prefix rejects the whole line instead of silently defaulting.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;

use crate::models::{Student, MAX_NAME_BYTES};

/// Reasons a single line can be rejected during load. Each one is
/// recoverable: the line is skipped and the remaining lines still load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No comma terminates the id field.
    #[error("missing comma after the id field")]
    MissingIdSeparator,
    /// The id field is not an integer.
    #[error("id is not an integer")]
    InvalidId,
    /// A quoted name field never sees its closing quote.
    #[error("unterminated quote in the name field")]
    UnterminatedQuote,
    /// No comma separates the name field from the grade.
    #[error("missing comma after the name field")]
    MissingNameSeparator,
    /// The grade field has no numeric prefix.
    #[error("grade is not a number")]
    InvalidGrade,
}

/// One rejected input line, kept so front ends can surface a diagnostic.
#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-based line number in the source file.
    pub line_number: usize,
    /// The raw line content as read (newline stripped).
    pub content: String,
    /// Why the line was rejected.
    pub reason: ParseError,
}

/// Everything a bulk load produces: the parsed records, the id counter the
/// store should resume from, and the lines that failed to parse.
#[derive(Debug, Default)]
pub struct LoadOutcome {
    pub students: Vec<Student>,
    pub next_id: i64,
    pub skipped: Vec<SkippedLine>,
}

impl LoadOutcome {
    fn empty() -> Self {
        Self {
            students: Vec::new(),
            next_id: 1,
            skipped: Vec::new(),
        }
    }
}

/// Parse one CSV line into a record.
///
/// Fields are `id,name,grade`. The name may be wrapped in double quotes, in
/// which case a doubled quote decodes to one literal quote; unquoted names
/// run verbatim to the next comma. The grade accepts a numeric prefix and
/// ignores trailing text, matching the permissive parse the file format has
/// always tolerated. Decoded names are truncated to [`MAX_NAME_BYTES`] on a
/// char boundary.
pub fn parse_line(line: &str) -> Result<Student, ParseError> {
    let rest = line.trim_start();
    let (id_text, rest) = rest.split_once(',').ok_or(ParseError::MissingIdSeparator)?;
    let id: i64 = id_text
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidId)?;

    let (name, rest) = if let Some(body) = rest.strip_prefix('"') {
        parse_quoted_name(body)?
    } else {
        let (name, rest) = rest
            .split_once(',')
            .ok_or(ParseError::MissingNameSeparator)?;
        (name.to_string(), rest)
    };

    let grade_text = rest.trim_start();
    let grade = parse_grade_prefix(grade_text).ok_or(ParseError::InvalidGrade)?;

    Ok(Student {
        id,
        name: truncate_name(name),
        grade,
    })
}

/// Decode a quoted name field (the opening quote already consumed) and
/// return it together with the text after the comma that follows the field.
fn parse_quoted_name(body: &str) -> Result<(String, &str), ParseError> {
    let mut name = String::new();
    let mut chars = body.char_indices().peekable();
    let mut close = None;

    while let Some((idx, ch)) = chars.next() {
        if ch == '"' {
            if matches!(chars.peek(), Some((_, '"'))) {
                name.push('"');
                chars.next();
            } else {
                close = Some(idx);
                break;
            }
        } else {
            name.push(ch);
        }
    }

    let close = close.ok_or(ParseError::UnterminatedQuote)?;
    let after = &body[close + 1..];
    match after.find(',') {
        Some(pos) => Ok((name, &after[pos + 1..])),
        None => Err(ParseError::MissingNameSeparator),
    }
}

/// Parse the leading numeric portion of `text` as a float, ignoring any
/// trailing garbage. Returns `None` when no digits lead the field.
fn parse_grade_prefix(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => {
                seen_digit = true;
                end += 1;
            }
            b'.' if !seen_dot => {
                seen_dot = true;
                end += 1;
            }
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    text[..end].parse().ok()
}

/// Clamp a decoded name to the fixed byte bound without splitting a
/// multi-byte character.
fn truncate_name(mut name: String) -> String {
    if name.len() > MAX_NAME_BYTES {
        let mut cut = MAX_NAME_BYTES;
        while !name.is_char_boundary(cut) {
            cut -= 1;
        }
        name.truncate(cut);
    }
    name
}

/// Read the snapshot file and parse every non-blank line.
///
/// A missing file is not an error: it means "start with an empty roster"
/// and yields an empty outcome with `next_id` 1. Any other I/O failure
/// propagates before a single record is produced, so the caller's roster is
/// never half-replaced. The caller installs the result with
/// `Roster::replace_all(outcome.students, outcome.next_id)`.
pub fn load_students(path: &Path) -> Result<LoadOutcome> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(LoadOutcome::empty()),
        Err(err) => {
            return Err(err).with_context(|| format!("failed to open {}", path.display()))
        }
    };

    let reader = BufReader::new(file);
    let mut students = Vec::new();
    let mut skipped = Vec::new();
    let mut max_id: i64 = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(student) => {
                max_id = max_id.max(student.id);
                students.push(student);
            }
            Err(reason) => skipped.push(SkippedLine {
                line_number: idx + 1,
                content: line.to_string(),
                reason,
            }),
        }
    }

    Ok(LoadOutcome {
        students,
        next_id: max_id + 1,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_line() {
        let s = parse_line("3,Jane Doe,87.50").unwrap();
        assert_eq!(s.id, 3);
        assert_eq!(s.name, "Jane Doe");
        assert!((s.grade - 87.5).abs() < 1e-9);
    }

    #[test]
    fn parses_quoted_name_with_embedded_comma_and_quotes() {
        let s = parse_line(r#"7,"Smith, ""Bob""",91.00"#).unwrap();
        assert_eq!(s.id, 7);
        assert_eq!(s.name, r#"Smith, "Bob""#);
        assert!((s.grade - 91.0).abs() < 1e-9);
    }

    #[test]
    fn leading_whitespace_before_id_is_skipped() {
        let s = parse_line("  12,Pat,60.00").unwrap();
        assert_eq!(s.id, 12);
        assert_eq!(s.name, "Pat");
    }

    #[test]
    fn rejects_line_without_any_comma() {
        assert_eq!(
            parse_line("garbage").unwrap_err(),
            ParseError::MissingIdSeparator
        );
    }

    #[test]
    fn rejects_non_integer_id() {
        assert_eq!(parse_line("abc,Jane,90.0").unwrap_err(), ParseError::InvalidId);
    }

    #[test]
    fn rejects_unterminated_quote() {
        assert_eq!(
            parse_line(r#"1,"never closed,90.0"#).unwrap_err(),
            ParseError::UnterminatedQuote
        );
    }

    #[test]
    fn rejects_missing_grade_field() {
        assert_eq!(
            parse_line("1,Jane").unwrap_err(),
            ParseError::MissingNameSeparator
        );
    }

    #[test]
    fn rejects_non_numeric_grade() {
        assert_eq!(
            parse_line("1,Jane,ninety").unwrap_err(),
            ParseError::InvalidGrade
        );
    }

    #[test]
    fn grade_parse_ignores_trailing_garbage() {
        let s = parse_line("1,Jane,95.5abc").unwrap();
        assert!((s.grade - 95.5).abs() < 1e-9);
    }

    #[test]
    fn grade_accepts_sign() {
        let s = parse_line("1,Jane,-3.25").unwrap();
        assert!((s.grade + 3.25).abs() < 1e-9);
    }

    #[test]
    fn long_name_is_truncated_to_byte_bound() {
        let long = "x".repeat(250);
        let s = parse_line(&format!("1,{long},50.0")).unwrap();
        assert_eq!(s.name.len(), MAX_NAME_BYTES);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Three-byte characters put boundaries at multiples of 3, so the
        // 100-byte cut must back off to 99 instead of splitting a char.
        let name = "日".repeat(80);
        let s = parse_line(&format!("1,{name},50.0")).unwrap();
        assert_eq!(s.name.len(), 99);
        assert!(s.name.chars().all(|c| c == '日'));
    }

    #[test]
    fn load_skips_malformed_lines_and_keeps_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(
            &path,
            "1,Alice,90.00\nnot a record\n2,Bob,80.00\n3,Cara,70.00\n",
        )
        .unwrap();

        let outcome = load_students(&path).unwrap();
        assert_eq!(outcome.students.len(), 3);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].line_number, 2);
        assert_eq!(outcome.skipped[0].reason, ParseError::MissingIdSeparator);
        assert_eq!(outcome.next_id, 4);
    }

    #[test]
    fn load_of_missing_file_yields_empty_roster() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = load_students(&dir.path().join("absent.csv")).unwrap();
        assert!(outcome.students.is_empty());
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.next_id, 1);
    }

    #[test]
    fn load_ignores_blank_lines_and_crlf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "1,Alice,90.00\r\n\r\n   \n2,Bob,80.00\r\n").unwrap();

        let outcome = load_students(&path).unwrap();
        assert_eq!(outcome.students.len(), 2);
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.students[1].name, "Bob");
    }

    #[test]
    fn next_id_resumes_past_highest_seen_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "9,High,50.00\n2,Low,60.00\n").unwrap();

        let outcome = load_students(&path).unwrap();
        assert_eq!(outcome.next_id, 10);
    }
}
