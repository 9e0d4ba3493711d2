use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::csv::{save_students, SkippedLine};
use crate::models::Student;
use crate::store::Roster;

use super::forms::{ConfirmRemove, StudentField, StudentForm};
use super::helpers::{centered_rect, surface_error};

/// Footer space reserved for the status line and the shortcut hints.
const FOOTER_HEIGHT: u16 = 3;
/// Display width allotted to the name column in the roster list.
const NAME_COLUMN_WIDTH: usize = 32;

/// Fine-grained interaction modes layered over the roster list. Modal flows
/// (form entry, confirmations) borrow from Vim-style modal editing so the
/// keyboard model stays predictable.
enum Mode {
    Normal,
    AddingStudent(StudentForm),
    ConfirmRemove(ConfirmRemove),
    ConfirmExit,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the TUI front end. Owns the roster for the
/// lifetime of the interactive session; the binary saves it back to disk
/// after the event loop exits.
pub struct App {
    roster: Roster,
    data_path: PathBuf,
    selected: usize,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Construct the app around a preloaded roster and the path manual and
    /// exit saves write to.
    pub fn new(roster: Roster, data_path: PathBuf) -> Self {
        Self {
            roster,
            data_path,
            selected: 0,
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Borrow the roster, used by the binary for the save-on-exit snapshot.
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Surface a startup diagnostic when the load skipped malformed lines.
    pub fn notify_skipped(&mut self, skipped: &[SkippedLine]) {
        if skipped.is_empty() {
            return;
        }
        let plural = if skipped.len() == 1 { "" } else { "s" };
        self.set_status(
            format!(
                "Skipped {} malformed line{plural} while loading (first: line {}).",
                skipped.len(),
                skipped[0].line_number
            ),
            StatusKind::Error,
        );
    }

    /// Top-level key dispatcher. Every key funnels through the active mode,
    /// which returns the next mode to run; the boolean result tells the
    /// outer loop whether the user confirmed an exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code)?,
            Mode::AddingStudent(form) => self.handle_add_student(code, form),
            Mode::ConfirmRemove(confirm) => self.handle_confirm_remove(code, confirm),
            Mode::ConfirmExit => self.handle_confirm_exit(code, &mut exit),
        };

        Ok(exit)
    }

    /// Handle keys while no modal is open: list navigation, sorting, the
    /// average readout, and entry points into the modal flows.
    fn handle_normal_key(&mut self, code: KeyCode) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.clear_status();
                return Ok(Mode::ConfirmExit);
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-5),
            KeyCode::PageDown => self.move_selection(5),
            KeyCode::Home => self.select_first(),
            KeyCode::End => self.select_last(),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::AddingStudent(StudentForm::default()));
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') => {
                if let Some(student) = self.current_student().cloned() {
                    self.clear_status();
                    return Ok(Mode::ConfirmRemove(ConfirmRemove::from(student)));
                } else {
                    self.set_status("No student selected to remove.", StatusKind::Error);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.roster.sort_by_name();
                self.set_status("Sorted by name.", StatusKind::Info);
            }
            KeyCode::Char('g') | KeyCode::Char('G') => {
                self.roster.sort_by_grade_desc();
                self.set_status("Sorted by grade (desc).", StatusKind::Info);
            }
            KeyCode::Char('v') | KeyCode::Char('V') => match self.roster.average() {
                Some(avg) => {
                    self.set_status(format!("Class average: {avg:.2}"), StatusKind::Info)
                }
                None => self.set_status("No students to average.", StatusKind::Info),
            },
            KeyCode::Char('w') | KeyCode::Char('W') => self.save_now(),
            _ => {}
        }
        Ok(Mode::Normal)
    }

    /// Process key presses while the "Add Student" form is active. Returns
    /// the next mode so the caller can continue driving the state machine.
    fn handle_add_student(&mut self, code: KeyCode, mut form: StudentForm) -> Mode {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add student cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::BackTab => form.toggle_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok((name, grade)) => {
                    let id = self.roster.add(&name, grade);
                    self.selected = self.roster.len().saturating_sub(1);
                    self.set_status(format!("Added student (id={id})."), StatusKind::Info);
                    keep_open = false;
                }
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Mode::AddingStudent(form)
        } else {
            Mode::Normal
        }
    }

    /// Confirmation dialog for removals. Escape cancels, enter confirms.
    fn handle_confirm_remove(&mut self, code: KeyCode, confirm: ConfirmRemove) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Removal cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let id = confirm.student.id;
                if self.roster.remove(id) {
                    self.ensure_in_bounds();
                    self.set_status(format!("Removed student id {id}."), StatusKind::Info);
                } else {
                    self.set_status(format!("No student with id {id}."), StatusKind::Error);
                }
                Mode::Normal
            }
            _ => Mode::ConfirmRemove(confirm),
        }
    }

    /// Quit confirmation. The actual save happens in `main` after the event
    /// loop tears the terminal down, mirroring the process lifecycle of
    /// load-at-start / save-at-exit.
    fn handle_confirm_exit(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                *exit = true;
                Mode::Normal
            }
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => Mode::Normal,
            _ => Mode::ConfirmExit,
        }
    }

    /// Write the snapshot immediately (the manual save shortcut). Failures
    /// surface in the status line and the session keeps running.
    fn save_now(&mut self) {
        match save_students(&self.data_path, self.roster.students()) {
            Ok(count) => self.set_status(
                format!("Saved {count} students to {}.", self.data_path.display()),
                StatusKind::Info,
            ),
            Err(err) => {
                let message = surface_error(&err);
                self.set_status(format!("Save failed: {message}"), StatusKind::Error);
            }
        }
    }

    fn current_student(&self) -> Option<&Student> {
        self.roster.students().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.roster.len();
        if len == 0 {
            return;
        }
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len as isize {
            new = len as isize - 1;
        }
        self.selected = new as usize;
    }

    fn select_first(&mut self) {
        self.selected = 0;
    }

    fn select_last(&mut self) {
        self.selected = self.roster.len().saturating_sub(1);
    }

    fn ensure_in_bounds(&mut self) {
        if self.selected >= self.roster.len() {
            self.selected = self.roster.len().saturating_sub(1);
        }
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Main render routine invoked each tick by Ratatui. Splits the frame
    /// into the roster list and the footer, then overlays the active modal.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_roster(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingStudent(form) => self.draw_student_form(frame, area, form),
            Mode::ConfirmRemove(confirm) => self.draw_confirm_remove(frame, area, confirm),
            Mode::ConfirmExit => self.draw_confirm_exit(frame, area),
            Mode::Normal => {}
        }
    }

    /// Render the roster list with a header row and the current selection
    /// highlighted. Scrolling keeps the selection visible without any
    /// mutable draw state.
    fn draw_roster(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Student Grade Manager ({} students) ", self.roster.len()));

        if self.roster.is_empty() {
            let message = Paragraph::new("No students found. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let mut lines = Vec::with_capacity(self.roster.len() + 1);
        lines.push(Line::from(Span::styled(
            format!("{:>5}  {:<width$}  {:>7}", "ID", "Name", "Grade", width = NAME_COLUMN_WIDTH),
            Style::default().add_modifier(Modifier::BOLD),
        )));

        for (idx, student) in self.roster.students().iter().enumerate() {
            // Newlines are legal in stored names but would break the row.
            let name: String = student
                .name
                .replace('\n', " ")
                .chars()
                .take(NAME_COLUMN_WIDTH)
                .collect();
            let row = format!(
                "{:>5}  {:<width$}  {:>7.2}",
                student.id,
                name,
                student.grade,
                width = NAME_COLUMN_WIDTH
            );
            if idx == self.selected {
                lines.push(Line::from(Span::styled(
                    row,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
            } else {
                lines.push(Line::from(row));
            }
        }

        // One line for the header row and two for the borders.
        let visible = area.height.saturating_sub(3) as usize;
        let offset = if visible > 0 && self.selected + 1 > visible {
            (self.selected + 1 - visible) as u16
        } else {
            0
        };

        let list = Paragraph::new(lines).block(block).scroll((offset, 0));
        frame.render_widget(list, area);
    }

    /// Footer with the latest status message and the shortcut reference.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let status_line = match &self.status {
            Some(message) => Line::from(Span::styled(message.text.clone(), message.kind.style())),
            None => Line::from(""),
        };
        let hints = Line::from(Span::styled(
            "up/down select | + add | - remove | n name sort | g grade sort | v average | w save | q quit",
            Style::default().fg(Color::DarkGray),
        ));

        let footer = Paragraph::new(vec![status_line, hints])
            .block(Block::default().borders(Borders::TOP));
        frame.render_widget(footer, area);
    }

    /// Modal form for adding a student, with the cursor placed at the end
    /// of the focused field.
    fn draw_student_form(&self, frame: &mut Frame, area: Rect, form: &StudentForm) {
        let popup = centered_rect(50, 40, area);
        frame.render_widget(Clear, popup);

        let mut lines = vec![
            form.build_line("Name", StudentField::Name),
            form.build_line("Grade (0-100)", StudentField::Grade),
            Line::from(""),
        ];
        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        }
        lines.push(Line::from(Span::styled(
            "Tab switch field | Enter save | Esc cancel",
            Style::default().fg(Color::DarkGray),
        )));

        let block = Block::default().borders(Borders::ALL).title(" Add Student ");
        let inner = block.inner(popup);
        frame.render_widget(Paragraph::new(lines).block(block), popup);

        let (label, row) = match form.active {
            StudentField::Name => ("Name: ", 0u16),
            StudentField::Grade => ("Grade (0-100): ", 1u16),
        };
        let cursor_x = inner.x + label.len() as u16 + form.value_len(form.active) as u16;
        frame.set_cursor_position((cursor_x, inner.y + row));
    }

    /// Confirmation dialog shown before a record is removed.
    fn draw_confirm_remove(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmRemove) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from(format!(
                "Remove {} (id {})?",
                confirm.student.name, confirm.student.id
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Enter/Y confirm | Esc/N cancel",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let dialog = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Remove Student "));
        frame.render_widget(dialog, popup);
    }

    /// Confirmation dialog shown before quitting; exiting always saves.
    fn draw_confirm_exit(&self, frame: &mut Frame, area: Rect) {
        let popup = centered_rect(50, 25, area);
        frame.render_widget(Clear, popup);

        let lines = vec![
            Line::from("Quit? Changes will be saved."),
            Line::from(""),
            Line::from(Span::styled(
                "Enter/Y quit | Esc/N stay",
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let dialog = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Quit "));
        frame.render_widget(dialog, popup);
    }
}
