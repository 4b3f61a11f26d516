use std::sync::Arc;

use mindspace_core::error::BackendError;
use mindspace_core::models::answer::AnswerValue;
use mindspace_core::models::question::{Question, QuestionSet};
use mindspace_core::models::submission::{ScanReceipt, SubmissionPayload};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::answers::AnswerStore;
use crate::error::ScreeningError;
use crate::navigation::{BackOutcome, Navigation};
use crate::timer::{Countdown, Tick, TimerSettings};

/// What started a submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Manual,
    Timer,
}

/// Lifecycle of one screening session.
///
/// `InProgress → Submitting → Submitted`, or back to `InProgress` when the
/// backend rejects the attempt. `Submitted` and `Exited` are terminal.
/// `Exited` means the user backed out of the first question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    InProgress,
    Submitting,
    Submitted { receipt: ScanReceipt },
    Exited,
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub question_index: usize,
    pub question_count: usize,
    pub question_id: String,
    pub question_text: String,
    pub selected: Option<u8>,
    pub answered_count: usize,
    pub is_last: bool,
    pub can_advance: bool,
    pub can_submit: bool,
    pub progress_percent: u32,
    pub remaining_secs: u32,
    pub clock: String,
    pub low_time: bool,
    pub time_expired: bool,
    pub phase: Phase,
    pub error_message: Option<String>,
}

/// State of one attempt at a question set. Synchronous; the async driver
/// lives in [`crate::service`].
#[derive(Debug, Clone)]
pub struct ScreeningSession {
    user_id: String,
    questions: Arc<QuestionSet>,
    navigation: Navigation,
    answers: AnswerStore,
    countdown: Countdown,
    phase: Phase,
    error_message: Option<String>,
}

impl ScreeningSession {
    pub fn new(
        user_id: impl Into<String>,
        questions: Arc<QuestionSet>,
        timer: &TimerSettings,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            navigation: Navigation::new(questions.len()),
            answers: AnswerStore::new(Arc::clone(&questions)),
            questions,
            countdown: Countdown::new(timer),
            phase: Phase::InProgress,
            error_message: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn index(&self) -> usize {
        self.navigation.index()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.navigation.index())
    }

    fn current_id(&self) -> String {
        self.current_question()
            .map(|q| q.id.clone())
            .unwrap_or_default()
    }

    fn current_answered(&self) -> bool {
        self.current_question()
            .is_some_and(|q| self.answers.is_answered(&q.id))
    }

    fn ensure_in_progress(&self) -> Result<(), ScreeningError> {
        match self.phase {
            Phase::InProgress => Ok(()),
            _ => Err(ScreeningError::NotInProgress),
        }
    }

    /// Record an answer. Never moves the navigation index.
    pub fn select(
        &mut self,
        question_id: &str,
        value: u8,
    ) -> Result<AnswerValue, ScreeningError> {
        self.ensure_in_progress()?;
        if self.countdown.is_expired() {
            return Err(ScreeningError::TimeExpired);
        }
        let value = self.answers.set_answer(question_id, value)?;
        self.error_message = None;
        debug!(question_id, value = value.weight(), "answer recorded");
        Ok(value)
    }

    pub fn select_current(&mut self, value: u8) -> Result<AnswerValue, ScreeningError> {
        let id = self.current_id();
        self.select(&id, value)
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.phase, Phase::InProgress)
            && !self.navigation.is_last()
            && self.current_answered()
    }

    /// Whether a manual submission would be accepted right now.
    pub fn can_submit(&self) -> bool {
        if !matches!(self.phase, Phase::InProgress) {
            return false;
        }
        self.countdown.is_expired() || (self.navigation.is_last() && self.current_answered())
    }

    pub fn next(&mut self) -> Result<usize, ScreeningError> {
        self.ensure_in_progress()?;
        if self.navigation.is_last() {
            return Err(ScreeningError::AtLastQuestion);
        }
        let answered = self.current_answered();
        self.navigation
            .go_next(answered)
            .ok_or_else(|| ScreeningError::Unanswered {
                question_id: self.current_id(),
            })
    }

    /// Step back one question. Backing out of the first question ends the
    /// session for good.
    pub fn back(&mut self) -> Result<BackOutcome, ScreeningError> {
        self.ensure_in_progress()?;
        let outcome = self.navigation.go_back();
        if outcome == BackOutcome::Exit {
            info!("screening exited from the first question");
            self.phase = Phase::Exited;
        }
        Ok(outcome)
    }

    /// Advance the countdown. A finished session no longer counts down.
    pub fn tick(&mut self) -> Tick {
        if matches!(self.phase, Phase::Submitted { .. } | Phase::Exited) {
            return Tick::Inert;
        }
        self.countdown.tick()
    }

    /// Enter `Submitting` and return the payload to send, or `None` when an
    /// attempt is already in flight or has succeeded. An exited session
    /// refuses to submit.
    ///
    /// Manual attempts need the last question answered, unless time already
    /// ran out, in which case they resend the forced submission.
    pub fn begin_submission(
        &mut self,
        trigger: Trigger,
    ) -> Result<Option<SubmissionPayload>, ScreeningError> {
        match self.phase {
            Phase::InProgress => {}
            Phase::Submitting | Phase::Submitted { .. } => {
                debug!(?trigger, phase = ?self.phase, "submission suppressed");
                return Ok(None);
            }
            Phase::Exited => return Err(ScreeningError::NotInProgress),
        }

        if trigger == Trigger::Manual && !self.countdown.is_expired() {
            if !self.navigation.is_last() {
                return Err(ScreeningError::NotAtLastQuestion);
            }
            if !self.current_answered() {
                return Err(ScreeningError::Unanswered {
                    question_id: self.current_id(),
                });
            }
        }

        let payload =
            SubmissionPayload::build(&self.user_id, &self.questions, self.answers.as_map());
        self.phase = Phase::Submitting;
        self.error_message = None;
        Ok(Some(payload))
    }

    /// Apply the backend's answer to an attempt started by
    /// [`begin_submission`](Self::begin_submission).
    pub fn finish_submission(&mut self, result: &Result<ScanReceipt, BackendError>) {
        if self.phase != Phase::Submitting {
            warn!(phase = ?self.phase, "submission result arrived outside Submitting; ignored");
            return;
        }
        match result {
            Ok(receipt) => {
                info!(total_score = receipt.total_score, "screening submitted");
                self.phase = Phase::Submitted {
                    receipt: receipt.clone(),
                };
            }
            Err(e) => {
                self.phase = Phase::InProgress;
                self.error_message = Some(e.to_string());
            }
        }
    }

    pub fn view(&self) -> SessionView {
        let question = self.current_question();
        let question_id = question.map(|q| q.id.clone()).unwrap_or_default();
        SessionView {
            question_index: self.navigation.index(),
            question_count: self.questions.len(),
            selected: self.answers.get(&question_id).map(AnswerValue::weight),
            question_text: question.map(|q| q.text.clone()).unwrap_or_default(),
            question_id,
            answered_count: self.answers.answered_count(),
            is_last: self.navigation.is_last(),
            can_advance: self.can_advance(),
            can_submit: self.can_submit(),
            progress_percent: self.navigation.progress_percent(),
            remaining_secs: self.countdown.remaining(),
            clock: self.countdown.display(),
            low_time: self.countdown.is_low(),
            time_expired: self.countdown.is_expired(),
            phase: self.phase.clone(),
            error_message: self.error_message.clone(),
        }
    }
}
