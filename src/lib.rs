//! Core library surface for the Student Grade Manager.
//!
//! The public modules exposed here keep the API intentionally small so both
//! binary targets (the Ratatui front end and the plain text menu) reuse the
//! same pieces: an owned in-memory roster, a CSV snapshot codec, and the
//! two presentation layers that mediate between them.

pub mod csv;
pub mod menu;
pub mod models;
pub mod store;
pub mod ui;

/// Convenience re-exports for the persistence layer, typically used by the
/// binaries to hydrate the roster at startup and snapshot it on exit.
pub use csv::{load_students, save_students, DEFAULT_DATA_FILE};

/// The primary domain type that the other layers manipulate.
pub use models::Student;

/// The single source of truth for the in-memory roster.
pub use store::Roster;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
