//! Line-oriented text menu front end. This is the second, simpler
//! presentation layer: it reads choices from stdin, prints the roster to
//! stdout, and reports problems on stderr, leaving all state changes to the
//! store and codec it calls into. Input validation (non-empty name, 0-100
//! grade, positive id) happens here, before the store is touched.

use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::csv::save_students;
use crate::store::Roster;

/// Run the interactive menu loop until the user exits or stdin closes.
/// The caller saves the roster afterwards, so every path out of this loop
/// leads to a snapshot write.
pub fn run_menu(roster: &mut Roster, data_path: &Path) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_menu();
        let choice = match prompt(&mut lines, "Choose: ")? {
            Some(choice) => choice,
            None => break,
        };

        match choice.trim() {
            "1" => list_students(roster),
            "2" => add_student(roster, &mut lines)?,
            "3" => remove_student(roster, &mut lines)?,
            "4" => match roster.average() {
                Some(avg) => println!("Class average: {avg:.2}"),
                None => println!("No students to average."),
            },
            "5" => match save_students(data_path, roster.students()) {
                Ok(count) => println!("Saved {count} students to {}", data_path.display()),
                Err(err) => eprintln!("Save failed: {err:#}"),
            },
            "6" => {
                roster.sort_by_name();
                println!("Sorted by name.");
            }
            "7" => {
                roster.sort_by_grade_desc();
                println!("Sorted by grade (desc).");
            }
            "8" => {
                if confirm(&mut lines, "Exit? Changes will be saved. (y/n): ")? {
                    println!("Exiting. Changes will be saved.");
                    break;
                }
            }
            _ => println!("Invalid option."),
        }
    }

    Ok(())
}

fn print_menu() {
    println!();
    println!("--- Student Grade Manager ---");
    println!("1) List students");
    println!("2) Add student");
    println!("3) Remove student by ID");
    println!("4) Class average");
    println!("5) Save (manual)");
    println!("6) Sort by name");
    println!("7) Sort by grade (desc)");
    println!("8) Exit");
}

fn list_students(roster: &Roster) {
    if roster.is_empty() {
        println!("No students found.");
        return;
    }
    println!("{:<5} {:<30} {:<6}", "ID", "Name", "Grade");
    println!("-------------------------------------------------");
    for student in roster.students() {
        println!(
            "{:<5} {:<30} {:<6.2}",
            student.id, student.name, student.grade
        );
    }
}

fn add_student(
    roster: &mut Roster,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let name = match prompt(lines, "Name: ")? {
        Some(name) => name,
        None => return Ok(()),
    };
    if name.trim().is_empty() {
        println!("Name cannot be empty.");
        return Ok(());
    }

    let grade_text = match prompt(lines, "Grade (0-100): ")? {
        Some(text) => text,
        None => return Ok(()),
    };
    let grade: f64 = match grade_text.trim().parse() {
        Ok(grade) => grade,
        Err(_) => {
            println!("Invalid grade.");
            return Ok(());
        }
    };
    if !(0.0..=100.0).contains(&grade) {
        println!("Invalid grade.");
        return Ok(());
    }

    let id = roster.add(name.trim(), grade);
    println!("Added student (id={id})");
    Ok(())
}

fn remove_student(
    roster: &mut Roster,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    let id_text = match prompt(lines, "ID to remove: ")? {
        Some(text) => text,
        None => return Ok(()),
    };
    let id: i64 = match id_text.trim().parse() {
        Ok(id) if id > 0 => id,
        _ => {
            println!("Invalid ID.");
            return Ok(());
        }
    };

    if !confirm(lines, &format!("Remove student id {id}? (y/n): "))? {
        println!("Removal cancelled.");
        return Ok(());
    }

    if roster.remove(id) {
        println!("Removed student id {id}");
    } else {
        println!("No student with id {id}");
    }
    Ok(())
}

/// Print a prompt and read one line. `None` means stdin reached EOF, which
/// callers treat as a request to wrap up.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> Result<Option<String>> {
    print!("{text}");
    io::stdout().flush().context("failed to flush stdout")?;
    match lines.next() {
        Some(line) => Ok(Some(line.context("failed to read stdin")?)),
        None => Ok(None),
    }
}

/// Yes/no confirmation used before destructive operations. Anything but an
/// explicit yes, including EOF, counts as no; a closed stdin still reaches
/// the save-on-exit path through the main loop's own EOF handling.
fn confirm(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> Result<bool> {
    match prompt(lines, text)? {
        Some(answer) => Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes")),
        None => Ok(false),
    }
}
