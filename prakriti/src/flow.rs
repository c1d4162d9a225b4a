//! The per-respondent survey flow as an explicit state machine.
//!
//! [`SurveyFlow`] never performs I/O or waits. Front-ends feed it
//! [`FlowEvent`]s and carry out the [`Effect`]s it returns: fetching the
//! questions, waiting out the advance delay after a choice, and sending the
//! submission.
//!
//! ```text
//! Loading -> Answering(0) -> .. -> Answering(n-1) -> CollectingInfo
//!         -> Submitting -> Result | Error
//! ```

use std::time::Duration;

use crate::submission::Submission;
use crate::validate::{FieldCheck, FieldError, check_field, validate_all};
use crate::wire::SubmitResponse;
use crate::{AnswerSet, Choice, Field, PersonalInfo, Question, QuestionBank};

/// Pause between picking an option and moving on, so the choice is visible.
pub const ADVANCE_DELAY: Duration = Duration::from_millis(500);

/// Where the respondent currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the questions.
    Loading,
    /// Showing the question at `index`.
    Answering { index: usize },
    /// Filling in personal info.
    CollectingInfo,
    /// Submission sent, waiting for the reply.
    Submitting,
    /// The classification came back.
    Result(SubmitResponse),
    /// Unrecoverable failure; retry starts over from loading.
    Error(String),
}

/// How a submission failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitFailure {
    /// The server rejected the submission with these messages.
    Rejected(Vec<String>),
    /// The record could not be saved; resubmitting may work.
    Persistence(String),
    /// Anything else: malformed request, unreachable server, bad reply.
    Fatal(String),
}

/// Input to [`SurveyFlow::handle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    QuestionsLoaded(QuestionBank),
    QuestionsFailed(String),
    Choose(Choice),
    /// The delay requested by [`Effect::ScheduleAdvance`] elapsed.
    AdvanceElapsed,
    Back,
    Edit(Field, String),
    Submit,
    Submitted(SubmitResponse),
    SubmitFailed(SubmitFailure),
    /// Start over from a result, or retry after an error.
    Restart,
}

/// Work the front-end must do on behalf of the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Load the questions, then report [`FlowEvent::QuestionsLoaded`] or
    /// [`FlowEvent::QuestionsFailed`].
    FetchQuestions,
    /// Wait, then report [`FlowEvent::AdvanceElapsed`].
    ScheduleAdvance(Duration),
    /// Send the submission, then report [`FlowEvent::Submitted`] or
    /// [`FlowEvent::SubmitFailed`].
    Submit(Submission),
}

/// State of one respondent's session.
#[derive(Debug, Clone)]
pub struct SurveyFlow {
    phase: Phase,
    bank: QuestionBank,
    answers: AnswerSet,
    info: PersonalInfo,
    field_errors: Vec<FieldError>,
    messages: Vec<String>,
    advance_pending: bool,
    advance_delay: Duration,
}

impl SurveyFlow {
    /// A flow in [`Phase::Loading`] together with the fetch it needs.
    pub fn start() -> (Self, Effect) {
        let flow = Self {
            phase: Phase::Loading,
            bank: QuestionBank::default(),
            answers: AnswerSet::new(),
            info: PersonalInfo::new(),
            field_errors: Vec::new(),
            messages: Vec::new(),
            advance_pending: false,
            advance_delay: ADVANCE_DELAY,
        };
        (flow, Effect::FetchQuestions)
    }

    /// Use a different delay between choosing and advancing.
    pub fn with_advance_delay(mut self, delay: Duration) -> Self {
        self.advance_delay = delay;
        self
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn questions(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn info(&self) -> &PersonalInfo {
        &self.info
    }

    /// The question being shown, if any.
    pub fn current_question(&self) -> Option<(usize, &Question)> {
        match self.phase {
            Phase::Answering { index } => self.bank.get(index).map(|q| (index, q)),
            _ => None,
        }
    }

    /// Field errors from the last submit attempt that were not edited since.
    pub fn field_errors(&self) -> &[FieldError] {
        &self.field_errors
    }

    /// The recorded error for `field`, if any.
    pub fn field_error(&self, field: Field) -> Option<&FieldError> {
        self.field_errors.iter().find(|err| err.field() == field)
    }

    /// Live feedback for a field's current value.
    pub fn field_check(&self, field: Field) -> FieldCheck {
        check_field(field, self.info.get(field))
    }

    /// Form-level messages, such as a rejection or persistence failure.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Whether a choice is waiting for its advance delay.
    pub fn is_advance_pending(&self) -> bool {
        self.advance_pending
    }

    /// Whether the flow waits for a collaborator.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Loading | Phase::Submitting) || self.advance_pending
    }

    /// Answered questions and total question count.
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.bank.len())
    }

    /// Apply an event. Events that make no sense in the current phase are
    /// ignored.
    pub fn handle(&mut self, event: FlowEvent) -> Option<Effect> {
        match (&self.phase, event) {
            (Phase::Loading, FlowEvent::QuestionsLoaded(bank)) => {
                if bank.is_empty() {
                    tracing::warn!("question source returned no questions");
                    self.phase = Phase::Error("No questions are available.".to_string());
                } else {
                    tracing::debug!(questions = bank.len(), "questions loaded");
                    self.bank = bank;
                    self.phase = Phase::Answering { index: 0 };
                }
                None
            }
            (Phase::Loading, FlowEvent::QuestionsFailed(reason)) => {
                tracing::warn!(%reason, "failed to load questions");
                self.phase = Phase::Error(reason);
                None
            }

            (Phase::Answering { index }, FlowEvent::Choose(choice)) if !self.advance_pending => {
                self.answers.record(*index, choice);
                self.advance_pending = true;
                Some(Effect::ScheduleAdvance(self.advance_delay))
            }
            (Phase::Answering { index }, FlowEvent::AdvanceElapsed) if self.advance_pending => {
                self.advance_pending = false;
                let next = index + 1;
                self.phase = if next < self.bank.len() {
                    Phase::Answering { index: next }
                } else {
                    Phase::CollectingInfo
                };
                None
            }
            (Phase::Answering { index }, FlowEvent::Back)
                if *index > 0 && !self.advance_pending =>
            {
                self.phase = Phase::Answering { index: index - 1 };
                None
            }

            (Phase::CollectingInfo, FlowEvent::Back) => {
                self.messages.clear();
                self.phase = Phase::Answering {
                    index: self.bank.len().saturating_sub(1),
                };
                None
            }
            (Phase::CollectingInfo, FlowEvent::Edit(field, value)) => {
                self.info.set(field, value);
                self.field_errors.retain(|err| err.field() != field);
                None
            }
            (Phase::CollectingInfo, FlowEvent::Submit) => self.try_submit(),

            (Phase::Submitting, FlowEvent::Submitted(response)) => {
                tracing::info!(result = %response.result, "survey submitted");
                self.phase = Phase::Result(response);
                None
            }
            (Phase::Submitting, FlowEvent::SubmitFailed(failure)) => {
                match failure {
                    SubmitFailure::Rejected(messages) => {
                        self.messages = messages;
                        self.phase = Phase::CollectingInfo;
                    }
                    SubmitFailure::Persistence(message) => {
                        self.messages = vec![message];
                        self.phase = Phase::CollectingInfo;
                    }
                    SubmitFailure::Fatal(reason) => {
                        tracing::error!(%reason, "submission failed");
                        self.phase = Phase::Error(reason);
                    }
                }
                None
            }

            (Phase::Result(_), FlowEvent::Restart) => {
                self.reset_session();
                self.phase = Phase::Answering { index: 0 };
                None
            }
            (Phase::Error(_), FlowEvent::Restart) => {
                self.reset_session();
                self.bank = QuestionBank::default();
                self.phase = Phase::Loading;
                Some(Effect::FetchQuestions)
            }

            (phase, event) => {
                tracing::debug!(?phase, ?event, "ignoring event");
                None
            }
        }
    }

    fn try_submit(&mut self) -> Option<Effect> {
        self.messages.clear();
        self.field_errors = validate_all(&self.info);
        if !self.field_errors.is_empty() {
            return None;
        }
        // Questions can only be left unanswered if the bank changed under us.
        if let Some(&index) = self.answers.missing(self.bank.len()).first() {
            self.phase = Phase::Answering { index };
            return None;
        }
        self.phase = Phase::Submitting;
        Some(Effect::Submit(Submission::new(
            self.answers.clone(),
            self.info.trimmed(),
        )))
    }

    fn reset_session(&mut self) {
        self.answers.clear();
        self.info = PersonalInfo::new();
        self.field_errors.clear();
        self.messages.clear();
        self.advance_pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tally;

    fn bank(n: usize) -> QuestionBank {
        QuestionBank::new(
            (0..n)
                .map(|i| Question::new(format!("Question {i}"), ["a", "b", "c"]))
                .collect(),
        )
    }

    fn answering(n: usize) -> SurveyFlow {
        let (mut flow, effect) = SurveyFlow::start();
        assert_eq!(effect, Effect::FetchQuestions);
        flow.handle(FlowEvent::QuestionsLoaded(bank(n)));
        flow
    }

    fn choose(flow: &mut SurveyFlow, choice: Choice) {
        assert_eq!(
            flow.handle(FlowEvent::Choose(choice)),
            Some(Effect::ScheduleAdvance(ADVANCE_DELAY))
        );
        assert_eq!(flow.handle(FlowEvent::AdvanceElapsed), None);
    }

    fn fill_valid(flow: &mut SurveyFlow) {
        for (field, value) in [
            (Field::Name, "Asha"),
            (Field::Gender, "Female"),
            (Field::Phone, "9876543210"),
            (Field::Email, "asha@example.com"),
            (Field::City, "Surat"),
        ] {
            flow.handle(FlowEvent::Edit(field, value.to_string()));
        }
    }

    fn submitting(n: usize) -> SurveyFlow {
        let mut flow = answering(n);
        for _ in 0..n {
            choose(&mut flow, Choice::B);
        }
        fill_valid(&mut flow);
        assert!(matches!(
            flow.handle(FlowEvent::Submit),
            Some(Effect::Submit(_))
        ));
        flow
    }

    fn response() -> SubmitResponse {
        SubmitResponse {
            result: "Pitta".into(),
            description: "text".into(),
            counts: Tally::new(0, 2, 0),
        }
    }

    #[test]
    fn loading_to_first_question() {
        let flow = answering(3);
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });
        assert_eq!(flow.current_question().map(|(i, _)| i), Some(0));
    }

    #[test]
    fn empty_or_failed_fetch_is_an_error() {
        let flow = answering(0);
        assert!(matches!(flow.phase(), Phase::Error(_)));

        let (mut flow, _) = SurveyFlow::start();
        flow.handle(FlowEvent::QuestionsFailed("offline".into()));
        assert_eq!(flow.phase(), &Phase::Error("offline".into()));
    }

    #[test]
    fn choice_advances_after_delay() {
        let mut flow = answering(2);
        flow.handle(FlowEvent::Choose(Choice::A));
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });
        assert!(flow.is_advance_pending());
        assert_eq!(flow.answers().get(0), Some(Choice::A));

        flow.handle(FlowEvent::AdvanceElapsed);
        assert_eq!(flow.phase(), &Phase::Answering { index: 1 });
        choose(&mut flow, Choice::C);
        assert_eq!(flow.phase(), &Phase::CollectingInfo);
        assert_eq!(flow.progress(), (2, 2));
    }

    #[test]
    fn choices_ignored_while_advance_pending() {
        let mut flow = answering(3);
        flow.handle(FlowEvent::Choose(Choice::A));
        assert_eq!(flow.handle(FlowEvent::Choose(Choice::C)), None);
        assert_eq!(flow.answers().get(0), Some(Choice::A));
        assert_eq!(flow.handle(FlowEvent::Back), None);
        assert!(flow.is_advance_pending());
    }

    #[test]
    fn stray_advance_is_ignored() {
        let mut flow = answering(3);
        flow.handle(FlowEvent::AdvanceElapsed);
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });
    }

    #[test]
    fn back_navigation() {
        let mut flow = answering(2);
        flow.handle(FlowEvent::Back);
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });

        choose(&mut flow, Choice::A);
        flow.handle(FlowEvent::Back);
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });

        // revisiting overwrites the earlier answer
        choose(&mut flow, Choice::B);
        choose(&mut flow, Choice::C);
        assert_eq!(flow.answers().get(0), Some(Choice::B));
        assert_eq!(flow.phase(), &Phase::CollectingInfo);

        flow.handle(FlowEvent::Back);
        assert_eq!(flow.phase(), &Phase::Answering { index: 1 });
    }

    #[test]
    fn invalid_info_stays_on_form() {
        let mut flow = answering(1);
        choose(&mut flow, Choice::A);
        flow.handle(FlowEvent::Edit(Field::Name, "J".into()));
        assert_eq!(flow.handle(FlowEvent::Submit), None);
        assert_eq!(flow.phase(), &Phase::CollectingInfo);
        assert_eq!(flow.field_errors().len(), 5);
        assert!(flow.field_error(Field::Name).is_some());

        flow.handle(FlowEvent::Edit(Field::Name, "Jon".into()));
        assert!(flow.field_error(Field::Name).is_none());
        assert!(flow.field_check(Field::Name).is_valid);
    }

    #[test]
    fn submit_sends_trimmed_payload() {
        let mut flow = answering(1);
        choose(&mut flow, Choice::A);
        fill_valid(&mut flow);
        flow.handle(FlowEvent::Edit(Field::City, " Surat ".into()));
        let Some(Effect::Submit(submission)) = flow.handle(FlowEvent::Submit) else {
            panic!("expected a submit effect");
        };
        assert_eq!(submission.info().city, "Surat");
        assert_eq!(submission.answers().get(0), Some(Choice::A));
        assert_eq!(flow.phase(), &Phase::Submitting);
    }

    #[test]
    fn double_submit_is_ignored() {
        let mut flow = submitting(2);
        assert_eq!(flow.handle(FlowEvent::Submit), None);
        assert_eq!(flow.phase(), &Phase::Submitting);
        assert!(flow.is_busy());
    }

    #[test]
    fn success_shows_result() {
        let mut flow = submitting(2);
        flow.handle(FlowEvent::Submitted(response()));
        assert_eq!(flow.phase(), &Phase::Result(response()));
    }

    #[test]
    fn rejection_returns_to_form_with_messages() {
        let mut flow = submitting(2);
        flow.handle(FlowEvent::SubmitFailed(SubmitFailure::Rejected(vec![
            "Email must contain '@'.".into(),
        ])));
        assert_eq!(flow.phase(), &Phase::CollectingInfo);
        assert_eq!(flow.messages(), ["Email must contain '@'."]);

        flow.handle(FlowEvent::SubmitFailed(SubmitFailure::Persistence("x".into())));
        assert_eq!(flow.phase(), &Phase::CollectingInfo);

        assert!(matches!(
            flow.handle(FlowEvent::Submit),
            Some(Effect::Submit(_))
        ));
        assert!(flow.messages().is_empty());
    }

    #[test]
    fn fatal_failure_is_an_error_and_retry_refetches() {
        let mut flow = submitting(2);
        flow.handle(FlowEvent::SubmitFailed(SubmitFailure::Fatal("bad reply".into())));
        assert_eq!(flow.phase(), &Phase::Error("bad reply".into()));

        assert_eq!(flow.handle(FlowEvent::Restart), Some(Effect::FetchQuestions));
        assert_eq!(flow.phase(), &Phase::Loading);
        assert!(flow.answers().is_empty());
        assert!(flow.questions().is_empty());
    }

    #[test]
    fn restart_keeps_questions() {
        let mut flow = submitting(2);
        flow.handle(FlowEvent::Submitted(response()));
        assert_eq!(flow.handle(FlowEvent::Restart), None);
        assert_eq!(flow.phase(), &Phase::Answering { index: 0 });
        assert_eq!(flow.questions().len(), 2);
        assert!(flow.answers().is_empty());
        assert_eq!(flow.info(), &PersonalInfo::new());
    }

    #[test]
    fn custom_delay_is_requested() {
        let (flow, _) = SurveyFlow::start();
        let mut flow = flow.with_advance_delay(Duration::ZERO);
        flow.handle(FlowEvent::QuestionsLoaded(bank(1)));
        assert_eq!(
            flow.handle(FlowEvent::Choose(Choice::A)),
            Some(Effect::ScheduleAdvance(Duration::ZERO))
        );
    }
}
