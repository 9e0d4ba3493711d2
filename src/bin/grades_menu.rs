//! Binary entry point for the plain text-menu front end. Same lifecycle as
//! the TUI binary: load the fixed snapshot path, run the interactive loop,
//! save on the way out.

use std::path::PathBuf;

use anyhow::{Context, Result};
use student_grade_manager::csv::{load_students, save_students, LoadOutcome, DEFAULT_DATA_FILE};
use student_grade_manager::menu::run_menu;
use student_grade_manager::Roster;

fn main() -> Result<()> {
    let data_path = PathBuf::from(DEFAULT_DATA_FILE);

    let LoadOutcome {
        students,
        next_id,
        skipped,
    } = load_students(&data_path)
        .with_context(|| format!("failed to load {}", data_path.display()))?;

    for line in &skipped {
        eprintln!(
            "Warning: skipped line {}: {} ({})",
            line.line_number, line.content, line.reason
        );
    }
    if !students.is_empty() {
        println!(
            "Loaded {} students from {}",
            students.len(),
            data_path.display()
        );
    }

    let mut roster = Roster::new();
    roster.replace_all(students, next_id);

    run_menu(&mut roster, &data_path)?;

    let count = save_students(&data_path, roster.students())
        .with_context(|| format!("failed to save {}", data_path.display()))?;
    println!("Saved {count} students to {}", data_path.display());

    Ok(())
}
