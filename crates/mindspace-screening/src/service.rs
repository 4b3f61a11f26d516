use std::ops::ControlFlow;
use std::sync::{Arc, OnceLock};

use mindspace_core::models::answer::AnswerValue;
use mindspace_core::models::credentials::Credentials;
use mindspace_core::models::question::QuestionSet;
use mindspace_core::models::submission::ScanReceipt;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::backend::ScanBackend;
use crate::error::ScreeningError;
use crate::navigation::BackOutcome;
use crate::session::{ScreeningSession, SessionView, Trigger};
use crate::timer::{PeriodicTask, Tick, TimerSettings};

/// Result of a submission request that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The backend stored the scan. The caller should move on to the
    /// results view.
    Submitted(ScanReceipt),
    /// Another attempt was already in flight or finished; nothing was sent.
    Suppressed,
}

struct Shared<B> {
    session: Mutex<ScreeningSession>,
    backend: B,
    credentials: Credentials,
    view: watch::Sender<SessionView>,
    timer: OnceLock<PeriodicTask>,
}

impl<B: ScanBackend> Shared<B> {
    fn publish(&self, session: &ScreeningSession) {
        self.view.send_replace(session.view());
    }

    fn cancel_timer(&self) {
        if let Some(timer) = self.timer.get() {
            timer.cancel();
        }
    }

    async fn on_tick(&self) -> ControlFlow<()> {
        let tick = {
            let mut session = self.session.lock().await;
            let tick = session.tick();
            self.publish(&session);
            tick
        };

        match tick {
            Tick::Running(remaining) => {
                debug!(remaining, "screening timer tick");
                ControlFlow::Continue(())
            }
            Tick::Expired => {
                info!("screening time is up; submitting");
                if let Err(e) = self.submit(Trigger::Timer).await {
                    warn!(error = %e, "timed-out submission failed");
                }
                ControlFlow::Break(())
            }
            Tick::Inert => ControlFlow::Break(()),
        }
    }

    async fn submit(&self, trigger: Trigger) -> Result<SubmitOutcome, ScreeningError> {
        let payload = {
            let mut session = self.session.lock().await;
            let begun = session.begin_submission(trigger);
            self.publish(&session);
            match begun? {
                Some(payload) => payload,
                None => return Ok(SubmitOutcome::Suppressed),
            }
        };

        info!(
            ?trigger,
            user = %payload.user,
            total_score = payload.total_score,
            "sending screening"
        );
        let result = self.backend.submit_scan(&self.credentials, &payload).await;

        {
            let mut session = self.session.lock().await;
            session.finish_submission(&result);
            self.publish(&session);
        }

        match result {
            Ok(receipt) => {
                self.cancel_timer();
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(e) => {
                warn!(?trigger, error = %e, "screening submission failed");
                Err(e.into())
            }
        }
    }
}

/// A running screening session.
///
/// Owns the countdown task and serializes every user action and timer tick
/// through one lock. Whichever of a manual submit or the timer's forced
/// submit reaches the session first sends the payload; the other is
/// suppressed. Dropping the `Screening` stops the timer.
pub struct Screening<B: ScanBackend> {
    shared: Arc<Shared<B>>,
    view: watch::Receiver<SessionView>,
}

impl<B: ScanBackend> Screening<B> {
    /// Start a session and its countdown. Must be called from within a
    /// Tokio runtime.
    pub fn start(
        questions: Arc<QuestionSet>,
        credentials: Credentials,
        backend: B,
        timer: TimerSettings,
    ) -> Self {
        let session = ScreeningSession::new(credentials.user_id.clone(), questions, &timer);
        let (view_tx, view) = watch::channel(session.view());

        let shared = Arc::new(Shared {
            session: Mutex::new(session),
            backend,
            credentials,
            view: view_tx,
            timer: OnceLock::new(),
        });

        let weak = Arc::downgrade(&shared);
        let task = PeriodicTask::spawn(timer.tick_period(), move || {
            let weak = weak.clone();
            async move {
                match weak.upgrade() {
                    Some(shared) => shared.on_tick().await,
                    None => ControlFlow::Break(()),
                }
            }
        });
        // The cell was created empty just above.
        let _ = shared.timer.set(task);

        info!(
            duration_secs = timer.duration_secs,
            user = %shared.credentials.user_id,
            "screening started"
        );
        Self { shared, view }
    }

    /// Receiver that sees a fresh [`SessionView`] after every change,
    /// including timer ticks and forced submissions.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view.clone()
    }

    pub fn view(&self) -> SessionView {
        self.view.borrow().clone()
    }

    pub async fn select(
        &self,
        question_id: &str,
        value: u8,
    ) -> Result<AnswerValue, ScreeningError> {
        let mut session = self.shared.session.lock().await;
        let result = session.select(question_id, value);
        self.shared.publish(&session);
        result
    }

    pub async fn select_current(&self, value: u8) -> Result<AnswerValue, ScreeningError> {
        let mut session = self.shared.session.lock().await;
        let result = session.select_current(value);
        self.shared.publish(&session);
        result
    }

    pub async fn next(&self) -> Result<usize, ScreeningError> {
        let mut session = self.shared.session.lock().await;
        let result = session.next();
        self.shared.publish(&session);
        result
    }

    /// Move back one question. On the first question this ends the session:
    /// the timer stops, every later action fails with `NotInProgress`, and
    /// the caller should leave.
    pub async fn back(&self) -> Result<BackOutcome, ScreeningError> {
        let outcome = {
            let mut session = self.shared.session.lock().await;
            let outcome = session.back()?;
            self.shared.publish(&session);
            outcome
        };
        if outcome == BackOutcome::Exit {
            self.shared.cancel_timer();
        }
        Ok(outcome)
    }

    /// Manual submission. Suppressed when an attempt is already in flight.
    pub async fn submit(&self) -> Result<SubmitOutcome, ScreeningError> {
        self.shared.submit(Trigger::Manual).await
    }

    /// True once the countdown task has exited, by expiry or cancellation.
    pub fn timer_stopped(&self) -> bool {
        self.shared.timer.get().is_none_or(PeriodicTask::is_finished)
    }
}
