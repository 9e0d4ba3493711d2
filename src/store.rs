//! The record store: single source of truth for the roster and the next-id
//! counter. The struct is owned by whichever front end is running and passed
//! by reference wherever it is needed, so there is no process-wide state.
//! The store never touches the filesystem; the CSV codec hands parsed data
//! back through [`Roster::replace_all`] and reads through [`Roster::students`].

use crate::models::Student;

/// Ordered collection of student records plus the id counter for new ones.
///
/// Records keep insertion order until a sort operation reorders them in
/// place. Single-threaded access is assumed throughout.
#[derive(Debug)]
pub struct Roster {
    students: Vec<Student>,
    next_id: i64,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}

impl Roster {
    /// Start with an empty roster. The first added student receives id 1.
    pub fn new() -> Self {
        Self {
            students: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a new record and return the id it was assigned. Ids are
    /// sequential and never reused while the records that consumed them are
    /// still held.
    pub fn add(&mut self, name: &str, grade: f64) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        self.students.push(Student {
            id,
            name: name.to_string(),
            grade,
        });
        id
    }

    /// Remove the record with the given id, keeping the relative order of
    /// the remaining records. Returns `false` when no record matches, which
    /// callers report as "not found" rather than treating as fatal.
    pub fn remove(&mut self, id: i64) -> bool {
        match self.students.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.students.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Borrowed read-only view of the roster in its current order. Used by
    /// the front ends for display and by the CSV writer for snapshots.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Whether the roster holds no records.
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// The id the next `add` call will assign. Exposed so front ends can
    /// show it and tests can assert the counter survives a bulk replace.
    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    /// Reorder the roster by case-insensitive name comparison. The sort is
    /// stable, so names that compare equal keep their prior relative order.
    pub fn sort_by_name(&mut self) {
        self.students.sort_by_key(|s| s.name.to_lowercase());
    }

    /// Reorder the roster by grade, highest first. Equal grades keep their
    /// prior relative order (stable sort); a non-comparable grade such as
    /// NaN is treated as equal rather than panicking.
    pub fn sort_by_grade_desc(&mut self) {
        self.students.sort_by(|a, b| {
            b.grade
                .partial_cmp(&a.grade)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Arithmetic mean of all grades, or `None` when the roster is empty so
    /// callers can distinguish "no data" from a genuine zero average.
    pub fn average(&self) -> Option<f64> {
        if self.students.is_empty() {
            return None;
        }
        let sum: f64 = self.students.iter().map(|s| s.grade).sum();
        Some(sum / self.students.len() as f64)
    }

    /// Discard the current roster and install a freshly parsed one together
    /// with the id counter to resume from. Used exclusively by bulk load;
    /// anything added since the last save is gone after this call.
    pub fn replace_all(&mut self, students: Vec<Student>, next_id: i64) {
        self.students = students;
        self.next_id = next_id.max(1);
    }
}
