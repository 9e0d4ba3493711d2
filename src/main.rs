//! Binary entry point for the Ratatui front end. The bootstrapping pipeline
//! mirrors the process contract: load the fixed snapshot path, drive the
//! event loop until the user quits, then write the snapshot back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use student_grade_manager::csv::{load_students, save_students, LoadOutcome, DEFAULT_DATA_FILE};
use student_grade_manager::{run_app, App, Roster};

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
            "Warning: skipped line {} of {}: {} ({})",
            line.line_number,
            data_path.display(),
            line.content,
            line.reason
        );
    }

    let mut roster = Roster::new();
    roster.replace_all(students, next_id);

    let mut app = App::new(roster, data_path.clone());
    app.notify_skipped(&skipped);
    run_app(&mut app)?;

    let count = save_students(&data_path, app.roster().students())
        .with_context(|| format!("failed to save {}", data_path.display()))?;
    println!("Saved {count} students to {}", data_path.display());

    Ok(())
}
