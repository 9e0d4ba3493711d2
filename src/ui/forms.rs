use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Student;

/// Internal representation of the "add student" form fields.
#[derive(Default, Clone)]
pub(crate) struct StudentForm {
    pub(crate) name: String,
    pub(crate) grade: String,
    pub(crate) active: StudentField,
    pub(crate) error: Option<String>,
}

/// Fields available within the student form.
#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum StudentField {
    #[default]
    Name,
    Grade,
}

impl StudentForm {
    /// Swap focus between the name and grade fields.
    pub(crate) fn toggle_field(&mut self) {
        self.active = match self.active {
            StudentField::Name => StudentField::Grade,
            StudentField::Grade => StudentField::Name,
        };
    }

    /// Append a character to the active field, validating allowed input.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        match self.active {
            StudentField::Name => {
                if !ch.is_control() {
                    self.name.push(ch);
                    true
                } else {
                    false
                }
            }
            StudentField::Grade => {
                if ch.is_ascii_digit() || ch == '.' {
                    self.grade.push(ch);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        match self.active {
            StudentField::Name => {
                self.name.pop();
            }
            StudentField::Grade => {
                self.grade.pop();
            }
        }
    }

    /// Validate the inputs and return typed values ready for the store.
    /// The range check lives here, at the front-end boundary, because the
    /// store itself accepts any grade.
    pub(crate) fn parse_inputs(&self) -> Result<(String, f64)> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(anyhow!("Name cannot be empty."));
        }
        let grade_raw = self.grade.trim();
        if grade_raw.is_empty() {
            return Err(anyhow!("Grade is required."));
        }
        let grade: f64 = grade_raw
            .parse()
            .context("Grade must be a number.")?;
        if !(0.0..=100.0).contains(&grade) {
            return Err(anyhow!("Grade must be between 0 and 100."));
        }
        Ok((name.to_string(), grade))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: StudentField) -> Line<'static> {
        let (value, is_active) = match field {
            StudentField::Name => (&self.name, self.active == StudentField::Name),
            StudentField::Grade => (&self.grade, self.active == StudentField::Grade),
        };

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Return the character count for the requested field.
    pub(crate) fn value_len(&self, field: StudentField) -> usize {
        match field {
            StudentField::Name => self.name.chars().count(),
            StudentField::Grade => self.grade.chars().count(),
        }
    }
}

/// State for confirming the removal of a single student.
#[derive(Clone)]
pub(crate) struct ConfirmRemove {
    pub(crate) student: Student,
}

impl ConfirmRemove {
    pub(crate) fn from(student: Student) -> Self {
        Self { student }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inputs_rejects_empty_name() {
        let mut form = StudentForm::default();
        form.grade = "90".to_string();
        assert!(form.parse_inputs().is_err());
    }

    #[test]
    fn parse_inputs_rejects_out_of_range_grade() {
        let mut form = StudentForm {
            name: "Jane".to_string(),
            grade: "101".to_string(),
            ..StudentForm::default()
        };
        assert!(form.parse_inputs().is_err());
        form.grade = "100".to_string();
        let (name, grade) = form.parse_inputs().unwrap();
        assert_eq!(name, "Jane");
        assert!((grade - 100.0).abs() < 1e-9);
    }

    #[test]
    fn grade_field_only_accepts_numeric_input() {
        let mut form = StudentForm::default();
        form.toggle_field();
        assert!(form.push_char('9'));
        assert!(form.push_char('.'));
        assert!(form.push_char('5'));
        assert!(!form.push_char('x'));
        assert_eq!(form.grade, "9.5");
    }
}
