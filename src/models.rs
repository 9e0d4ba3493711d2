//! Domain model shared by the store, the CSV codec, and both front ends.
//! The type stays a light-weight data holder so the other layers can focus
//! on roster bookkeeping, serialization, and presentation.

/// Upper bound, in bytes, for a student name coming out of the CSV decoder.
/// The bound is enforced only at the decode boundary (see `csv::reader`);
/// in-memory names are ordinary growable strings.
pub const MAX_NAME_BYTES: usize = 100;

#[derive(Debug, Clone, PartialEq)]
/// One student's record as held by the roster and persisted to disk.
pub struct Student {
    /// Identifier assigned by the roster. Unique among currently-held
    /// records and never reused while older records are still present;
    /// remove flows bubble it back to the store.
    pub id: i64,
    /// Display name. May contain commas, quotes, or newlines; the CSV
    /// writer quotes and escapes as needed.
    pub name: String,
    /// Numeric grade. The store accepts any value here; the 0-100 range
    /// check belongs to the front ends.
    pub grade: f64,
}
