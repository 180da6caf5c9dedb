//! TUI application state and key handling.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc::UnboundedReceiver;

use pei_core::dashboard::Dashboard;
use pei_core::editor::EditorView;
use pei_core::generator::PlanGenerator;
use pei_core::intake::{IntakeForm, SelectField};
use pei_core::notify::{ChannelNotifier, Notification};
use pei_core::profile::{CommunicationStyle, Diagnosis, Grade, TextField};
use pei_core::simulator::SimulatorSettings;
use pei_core::{Step, Trigger, Wizard};

/// One row of the intake form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Text(TextField),
    Select(SelectField),
    Diagnosis,
}

pub const FORM_ROWS: [FormRow; 12] = [
    FormRow::Text(TextField::Name),
    FormRow::Text(TextField::Age),
    FormRow::Select(SelectField::Grade),
    FormRow::Text(TextField::BirthDate),
    FormRow::Diagnosis,
    FormRow::Text(TextField::Strengths),
    FormRow::Text(TextField::Challenges),
    FormRow::Select(SelectField::CommunicationStyle),
    FormRow::Text(TextField::Interests),
    FormRow::Text(TextField::GuardianName),
    FormRow::Text(TextField::GuardianContact),
    FormRow::Text(TextField::AdditionalNotes),
];

/// Application state for the TUI.
pub struct App {
    pub wizard: Wizard,
    notifications: UnboundedReceiver<Notification>,
    /// Most recent notification, shown in the status bar.
    pub last_notification: Option<Notification>,
    pub form_row: usize,
    pub diagnosis_cursor: usize,
    /// Typing goes into the selected plan section.
    pub editing_section: bool,
    pub tick_rate: Duration,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        generator: Arc<dyn PlanGenerator>,
        settings: SimulatorSettings,
        dashboard: Dashboard,
        tick_rate: Duration,
    ) -> Self {
        let (notifier, notifications) = ChannelNotifier::new();
        let wizard = Wizard::new(generator, Arc::new(notifier), settings).with_dashboard(dashboard);
        Self {
            wizard,
            notifications,
            last_notification: None,
            form_row: 0,
            diagnosis_cursor: 0,
            editing_section: false,
            tick_rate,
            should_quit: false,
        }
    }

    /// How long the event loop may block before the next redraw.
    pub fn poll_timeout(&self) -> Duration {
        self.wizard
            .until_next()
            .map_or(self.tick_rate, |next| next.min(self.tick_rate))
    }

    /// Advance the wizard clock and pick up new notifications.
    pub fn on_tick(&mut self, elapsed: Duration) {
        self.wizard.advance(elapsed);
        self.drain_notifications();
    }

    fn drain_notifications(&mut self) {
        while let Ok(notification) = self.notifications.try_recv() {
            self.last_notification = Some(notification);
        }
    }

    pub fn focused_row(&self) -> FormRow {
        FORM_ROWS[self.form_row]
    }

    fn dispatch(&mut self, trigger: Trigger) {
        let before = self.wizard.step();
        self.wizard.dispatch(trigger);
        if self.wizard.step() != before {
            self.form_row = 0;
            self.diagnosis_cursor = 0;
            self.editing_section = false;
        }
        self.drain_notifications();
    }

    // -- Key handling --

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.wizard.step() {
            Step::Dashboard => self.handle_dashboard_key(key),
            Step::Intake => self.handle_intake_key(key),
            Step::Generation => self.handle_generation_key(key),
            Step::Complete => self.handle_complete_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('n') | KeyCode::Enter => self.dispatch(Trigger::CreateNew),
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_intake_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.dispatch(Trigger::Submit),
            KeyCode::Down | KeyCode::Tab => self.form_row = (self.form_row + 1) % FORM_ROWS.len(),
            KeyCode::Up | KeyCode::BackTab => {
                self.form_row = (self.form_row + FORM_ROWS.len() - 1) % FORM_ROWS.len();
            }
            KeyCode::Left => self.cycle_focused(false),
            KeyCode::Right => self.cycle_focused(true),
            KeyCode::Char(' ') if self.focused_row() == FormRow::Diagnosis => {
                self.toggle_focused_diagnosis();
            }
            KeyCode::Char(c) => self.edit_focused_text(|text| text.push(c)),
            KeyCode::Backspace => self.edit_focused_text(|text| {
                text.pop();
            }),
            _ => {}
        }
    }

    fn edit_focused_text(&mut self, f: impl FnOnce(&mut String)) {
        let FormRow::Text(field) = self.focused_row() else {
            return;
        };
        if let Some(form) = self.wizard.intake_mut() {
            let mut value = form.draft().text(field).to_string();
            f(&mut value);
            form.set_text(field, value);
        }
    }

    fn cycle_focused(&mut self, forward: bool) {
        let row = self.focused_row();
        if row == FormRow::Diagnosis {
            let n = Diagnosis::ALL.len();
            self.diagnosis_cursor = if forward {
                (self.diagnosis_cursor + 1) % n
            } else {
                (self.diagnosis_cursor + n - 1) % n
            };
            return;
        }
        let Some(form) = self.wizard.intake_mut() else {
            return;
        };
        match row {
            FormRow::Select(SelectField::Grade) => {
                let next = cycle(&Grade::ALL, form.draft().grade, forward);
                form.set_grade(next);
            }
            FormRow::Select(SelectField::CommunicationStyle) => {
                let next = cycle(
                    &CommunicationStyle::ALL,
                    form.draft().communication_style,
                    forward,
                );
                form.set_communication_style(next);
            }
            _ => {}
        }
    }

    fn toggle_focused_diagnosis(&mut self) {
        let code = Diagnosis::ALL[self.diagnosis_cursor];
        if let Some(form) = self.wizard.intake_mut() {
            let checked = form.draft().diagnosis.contains(&code);
            form.toggle_diagnosis(code, !checked);
        }
    }

    fn handle_generation_key(&mut self, key: KeyEvent) {
        let Some(view) = self.wizard.editor().map(|e| e.view()) else {
            return;
        };
        if self.editing_section {
            self.handle_section_typing(key);
            return;
        }
        match (view, key.code) {
            (EditorView::Prompt, KeyCode::Enter | KeyCode::Char('g')) => {
                if let Some(editor) = self.wizard.editor_mut() {
                    editor.generate();
                }
            }
            (EditorView::Editing, KeyCode::Tab | KeyCode::Right) => {
                if let Some(editor) = self.wizard.editor_mut() {
                    editor.next_tab();
                }
            }
            (EditorView::Editing, KeyCode::BackTab | KeyCode::Left) => {
                if let Some(editor) = self.wizard.editor_mut() {
                    editor.prev_tab();
                }
            }
            (EditorView::Editing, KeyCode::Char('e') | KeyCode::Enter) => {
                self.editing_section = true;
            }
            (EditorView::Editing, KeyCode::Char('f')) => self.dispatch(Trigger::Finalize),
            (_, KeyCode::Esc | KeyCode::Char('b')) => self.dispatch(Trigger::Back),
            _ => {}
        }
    }

    fn handle_section_typing(&mut self, key: KeyEvent) {
        let Some(editor) = self.wizard.editor_mut() else {
            return;
        };
        let section = editor.tab();
        let mut text = editor.content().section(section).to_string();
        match key.code {
            KeyCode::Esc => {
                self.editing_section = false;
                return;
            }
            KeyCode::Enter => text.push('\n'),
            KeyCode::Backspace => {
                text.pop();
            }
            KeyCode::Char(c) => text.push(c),
            _ => return,
        }
        editor.edit(section, text);
    }

    fn handle_complete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') | KeyCode::Esc => self.dispatch(Trigger::ViewDashboard),
            KeyCode::Char('n') => self.dispatch(Trigger::CreateNew),
            _ => {}
        }
    }
}

/// Step through `None, all[0], ..., all[n-1]` and around.
fn cycle<T: Copy + PartialEq>(all: &[T], current: Option<T>, forward: bool) -> Option<T> {
    let pos = current.and_then(|c| all.iter().position(|x| *x == c));
    let slots = all.len() + 1;
    let index = pos.map_or(0, |p| p + 1);
    let next = if forward {
        (index + 1) % slots
    } else {
        (index + slots - 1) % slots
    };
    next.checked_sub(1).map(|i| all[i])
}

/// Intake draft convenience for rendering.
pub fn intake_value(form: &IntakeForm, row: FormRow) -> String {
    let draft = form.draft();
    match row {
        FormRow::Text(field) => draft.text(field).to_string(),
        FormRow::Select(SelectField::Grade) => draft
            .grade
            .map(|g| g.label().to_string())
            .unwrap_or_default(),
        FormRow::Select(SelectField::CommunicationStyle) => draft
            .communication_style
            .map(|s| s.label().to_string())
            .unwrap_or_default(),
        FormRow::Diagnosis => String::new(),
    }
}

pub fn row_label(row: FormRow) -> &'static str {
    match row {
        FormRow::Text(field) => field.label(),
        FormRow::Select(field) => field.label(),
        FormRow::Diagnosis => "Diagnóstico",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
