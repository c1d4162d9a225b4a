//! Ratatui front-end driving the survey flow.

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use prakriti::wire::{EXPORT_FILENAME, NO_RESPONSES, SubmitResponse};
use prakriti::{Choice, Effect, Field, FlowEvent, Gender, Phase, SurveyFlow};
use ratatui::{Terminal, prelude::CrosstermBackend, style::Color};
use thiserror::Error;

use crate::draw::draw_ui;
use crate::gateway::SurveyGateway;

/// How long to wait for input when no advance is due.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Error type for the wizard.
#[derive(Debug, Error)]
pub enum WizardError {
    /// The respondent quit before a result was shown.
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WizardError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub text: Color,
    pub highlight: Color,
    pub error: Color,
    pub success: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color::Cyan,
            secondary: Color::Blue,
            text: Color::White,
            highlight: Color::Yellow,
            error: Color::Red,
            success: Color::Green,
            border: Color::Gray,
        }
    }
}

/// Step-by-step terminal wizard for the questionnaire.
#[derive(Debug, Clone)]
pub struct RatatuiWizard {
    title: String,
    theme: Theme,
    export_path: PathBuf,
}

impl Default for RatatuiWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl RatatuiWizard {
    pub fn new() -> Self {
        Self {
            title: "Prakriti".to_string(),
            theme: Theme::default(),
            export_path: PathBuf::from(EXPORT_FILENAME),
        }
    }

    /// Set the title shown at the top of the wizard.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Where the result screen saves the CSV export of all responses.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// Run the survey until the respondent quits.
    ///
    /// Returns the last result shown, or [`WizardError::Cancelled`] if the
    /// respondent quit before finishing.
    pub fn run(&self, gateway: &dyn SurveyGateway) -> Result<SubmitResponse, WizardError> {
        let mut terminal = self.setup_terminal()?;
        let outcome = self.event_loop(&mut terminal, gateway);
        self.restore_terminal(&mut terminal)?;
        outcome?.ok_or(WizardError::Cancelled)
    }

    fn setup_terminal(&self) -> Result<Terminal<CrosstermBackend<Stdout>>, WizardError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(terminal)
    }

    fn restore_terminal(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), WizardError> {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
        gateway: &dyn SurveyGateway,
    ) -> Result<Option<SubmitResponse>, WizardError> {
        let mut state = WizardState::new(self.theme.clone(), self.title.clone());
        state.export_path = self.export_path.clone();

        loop {
            terminal.draw(|frame| draw_ui(frame, &state))?;

            // Loading and submitting screens are on display while this blocks.
            if state.run_pending(gateway) {
                continue;
            }

            let timeout = state
                .advance_at
                .map(|at| at.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL);
            if event::poll(timeout)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
                && state.on_key(key) == Control::Quit
            {
                break;
            }

            state.tick(Instant::now());
        }

        Ok(state.last_result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Control {
    Continue,
    Quit,
}

/// Everything the wizard shows, on top of the flow itself.
pub(crate) struct WizardState {
    pub(crate) flow: SurveyFlow,
    /// Highlighted option on the question screen.
    pub(crate) selected_option: usize,
    /// Focused field on the info form.
    pub(crate) focused: usize,
    /// Blocking effect waiting for the next draw to finish.
    pending: Option<Effect>,
    /// When the pending advance is due.
    advance_at: Option<Instant>,
    last_result: Option<SubmitResponse>,
    /// Target file of the CSV export offered on the result screen.
    pub(crate) export_path: PathBuf,
    export_requested: bool,
    /// Outcome of the last export, shown on the result screen.
    pub(crate) export_status: Option<String>,
    pub(crate) theme: Theme,
    pub(crate) title: String,
}

impl WizardState {
    pub(crate) fn new(theme: Theme, title: String) -> Self {
        let (flow, effect) = SurveyFlow::start();
        Self {
            flow,
            selected_option: 0,
            focused: 0,
            pending: Some(effect),
            advance_at: None,
            last_result: None,
            export_path: PathBuf::from(EXPORT_FILENAME),
            export_requested: false,
            export_status: None,
            theme,
            title,
        }
    }

    pub(crate) fn focused_field(&self) -> Field {
        Field::ALL[self.focused]
    }

    fn dispatch(&mut self, event: FlowEvent) {
        let before = self.flow.phase().clone();
        match self.flow.handle(event) {
            Some(Effect::ScheduleAdvance(delay)) => {
                self.advance_at = Some(Instant::now() + delay);
            }
            Some(effect) => self.pending = Some(effect),
            None => {}
        }
        if self.flow.phase() != &before {
            self.on_phase_change();
        }
    }

    fn on_phase_change(&mut self) {
        self.export_status = None;
        match self.flow.phase() {
            Phase::Answering { index } => {
                self.selected_option = self
                    .flow
                    .answers()
                    .get(*index)
                    .map(|choice| choice.position())
                    .unwrap_or(0);
            }
            Phase::CollectingInfo => self.focus_first_error(),
            Phase::Result(response) => {
                self.last_result = Some(response.clone());
                self.focused = 0;
            }
            _ => {}
        }
    }

    fn focus_first_error(&mut self) {
        if let Some(field) = self.flow.field_errors().first().map(|err| err.field()) {
            self.focused = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
        }
    }

    /// Carry out a blocking effect. Returns whether one ran.
    pub(crate) fn run_pending(&mut self, gateway: &dyn SurveyGateway) -> bool {
        if std::mem::take(&mut self.export_requested) {
            self.export_status = Some(self.save_export(gateway));
            return true;
        }
        let Some(effect) = self.pending.take() else {
            return false;
        };
        let event = match effect {
            Effect::FetchQuestions => match gateway.fetch_questions() {
                Ok(bank) => FlowEvent::QuestionsLoaded(bank),
                Err(err) => FlowEvent::QuestionsFailed(err.to_string()),
            },
            Effect::Submit(submission) => match gateway.submit(&submission) {
                Ok(response) => FlowEvent::Submitted(response),
                Err(err) => FlowEvent::SubmitFailed(err.into_failure()),
            },
            Effect::ScheduleAdvance(_) => return false,
        };
        self.dispatch(event);
        true
    }

    fn request_export(&mut self) {
        self.export_requested = true;
        self.export_status = Some("Saving export...".to_string());
    }

    fn save_export(&self, gateway: &dyn SurveyGateway) -> String {
        let path = self.export_path.display();
        match gateway.export_csv() {
            Ok(Some(csv)) => match std::fs::write(&self.export_path, csv) {
                Ok(()) => {
                    tracing::info!(%path, "export saved");
                    format!("All responses saved to {path}")
                }
                Err(err) => {
                    tracing::warn!(%path, error = %err, "failed to write export");
                    format!("Could not write {path}: {err}")
                }
            },
            Ok(None) => NO_RESPONSES.to_string(),
            Err(err) => {
                tracing::warn!(error = %err, "export failed");
                err.to_string()
            }
        }
    }

    /// Fire the advance once its delay has passed.
    pub(crate) fn tick(&mut self, now: Instant) {
        if self.advance_at.is_some_and(|at| now >= at) {
            self.advance_at = None;
            self.dispatch(FlowEvent::AdvanceElapsed);
        }
    }

    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        match self.flow.phase() {
            Phase::Loading | Phase::Submitting => Control::Continue,
            Phase::Answering { .. } => self.on_question_key(key.code),
            Phase::CollectingInfo => self.on_form_key(key.code),
            Phase::Result(_) | Phase::Error(_) => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Control::Quit,
                KeyCode::Char('e') if matches!(self.flow.phase(), Phase::Result(_)) => {
                    self.request_export();
                    Control::Continue
                }
                KeyCode::Enter | KeyCode::Char('r') => {
                    self.dispatch(FlowEvent::Restart);
                    Control::Continue
                }
                _ => Control::Continue,
            },
        }
    }

    fn on_question_key(&mut self, code: KeyCode) -> Control {
        match code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Up => self.selected_option = self.selected_option.saturating_sub(1),
            KeyCode::Down => {
                self.selected_option = (self.selected_option + 1).min(Choice::ALL.len() - 1);
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if let Some(choice) = Choice::from_position(self.selected_option) {
                    self.choose(choice);
                }
            }
            KeyCode::Char(c) => {
                let quick = match c {
                    'a' | '1' => Some(Choice::A),
                    'b' | '2' => Some(Choice::B),
                    'c' | '3' => Some(Choice::C),
                    _ => None,
                };
                if let Some(choice) = quick {
                    self.choose(choice);
                }
            }
            KeyCode::Left | KeyCode::Backspace => self.dispatch(FlowEvent::Back),
            _ => {}
        }
        Control::Continue
    }

    fn choose(&mut self, choice: Choice) {
        if !self.flow.is_advance_pending() {
            self.selected_option = choice.position();
        }
        self.dispatch(FlowEvent::Choose(choice));
    }

    fn on_form_key(&mut self, code: KeyCode) -> Control {
        let field = self.focused_field();
        match code {
            KeyCode::Esc => self.dispatch(FlowEvent::Back),
            KeyCode::Enter => {
                self.dispatch(FlowEvent::Submit);
                self.focus_first_error();
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focused = (self.focused + 1) % Field::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focused = (self.focused + Field::ALL.len() - 1) % Field::ALL.len();
            }
            KeyCode::Left | KeyCode::Right if field == Field::Gender => {
                let forward = code == KeyCode::Right;
                let value = cycle_gender(self.flow.info().get(field), forward);
                self.dispatch(FlowEvent::Edit(field, value));
            }
            KeyCode::Char(c) if field != Field::Gender => {
                let mut value = self.flow.info().get(field).to_string();
                value.push(c);
                self.dispatch(FlowEvent::Edit(field, value));
            }
            KeyCode::Backspace => {
                let mut value = self.flow.info().get(field).to_string();
                value.pop();
                self.dispatch(FlowEvent::Edit(field, value));
            }
            _ => {}
        }
        Control::Continue
    }
}

/// Next gender in list order, starting from the first when unset.
fn cycle_gender(current: &str, forward: bool) -> String {
    let len = Gender::ALL.len();
    let next = match Gender::ALL.iter().position(|g| g.as_str() == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None if forward => 0,
        None => len - 1,
    };
    Gender::ALL[next].as_str().to_string()
}
