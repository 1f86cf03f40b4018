//! The poll loop: fetch, validate, format, notify, sleep, repeat.
//!
//! - The cursor (`from_date`) only moves after a validated response whose
//!   outcome was fully handled (delivered, already delivered, or no updates).
//! - Consecutive identical messages are sent once.
//! - Recoverable errors end the cycle with a best-effort report to the chat;
//!   only startup-fatal errors leave the loop.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use crate::{
    api::port::HomeworkApi,
    domain::{initial_cursor, ChatId, Cursor},
    errors::{Error, ErrorKind},
    formatting::{failure_report, parse_status},
    messaging::port::{notify, Notifier},
    validation::check_response,
    Result,
};

/// State carried from one cycle to the next. Lives in memory only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollState {
    pub cursor: Cursor,
    pub last_sent: Option<String>,
}

impl PollState {
    pub fn new(cursor: Cursor) -> Self {
        Self {
            cursor,
            last_sent: None,
        }
    }

    pub fn starting_now() -> Self {
        Self::new(initial_cursor())
    }

    fn advance(&mut self, current_date: Option<Cursor>) {
        if let Some(ts) = current_date {
            self.cursor = ts;
        }
    }

    fn already_sent(&self, message: &str) -> bool {
        self.last_sent.as_deref() == Some(message)
    }
}

/// What a single cycle ended with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A status change was delivered.
    Notified,
    /// The status message equals the last one sent; nothing was sent.
    Duplicate,
    /// The API reported no homework in the window.
    NoUpdates,
    /// The status message could not be delivered; it is retried next cycle.
    DeliveryFailed,
    /// Fetching, validation or formatting failed.
    Failed { reported: bool },
}

struct StatusUpdate {
    message: Option<String>,
    current_date: Option<Cursor>,
}

pub struct Poller {
    api: Arc<dyn HomeworkApi>,
    notifier: Arc<dyn Notifier>,
    chat_id: ChatId,
    retry_period: Duration,
}

impl Poller {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        notifier: Arc<dyn Notifier>,
        chat_id: ChatId,
        retry_period: Duration,
    ) -> Self {
        Self {
            api,
            notifier,
            chat_id,
            retry_period,
        }
    }

    /// Run cycles until `cancel` fires. Returns early only on a startup-fatal error.
    pub async fn run(&self, state: &mut PollState, cancel: &CancellationToken) -> Result<()> {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                outcome = self.run_cycle(state) => {
                    let outcome = outcome?;
                    tracing::debug!(?outcome, cursor = state.cursor, "cycle finished");
                }
            }

            tracing::debug!(seconds = self.retry_period.as_secs(), "sleeping until next poll");
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                _ = sleep(self.retry_period) => {}
            }
        }
    }

    /// One fetch → validate → format → notify pass over `state`.
    pub async fn run_cycle(&self, state: &mut PollState) -> Result<CycleOutcome> {
        let update = match self.poll(state.cursor).await {
            Ok(u) => u,
            Err(err) => return self.handle_failure(state, err).await,
        };

        let Some(message) = update.message else {
            tracing::warn!(cursor = state.cursor, "no homework status updates");
            state.advance(update.current_date);
            return Ok(CycleOutcome::NoUpdates);
        };

        if state.already_sent(&message) {
            tracing::debug!("status message unchanged since last send");
            state.advance(update.current_date);
            return Ok(CycleOutcome::Duplicate);
        }

        match notify(self.notifier.as_ref(), self.chat_id, &message).await {
            Ok(()) => {
                state.last_sent = Some(message);
                state.advance(update.current_date);
                Ok(CycleOutcome::Notified)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to deliver status message to telegram");
                Ok(CycleOutcome::DeliveryFailed)
            }
        }
    }

    async fn poll(&self, cursor: Cursor) -> Result<StatusUpdate> {
        let response = self.api.fetch(cursor).await?;
        let batch = check_response(&response)?;

        let message = match batch.latest() {
            Some(homework) => {
                let message = parse_status(homework)?;
                tracing::warn!(%message, "homework status");
                Some(message)
            }
            None => None,
        };

        Ok(StatusUpdate {
            message,
            current_date: batch.current_date,
        })
    }

    async fn handle_failure(&self, state: &mut PollState, err: Error) -> Result<CycleOutcome> {
        if err.kind() == ErrorKind::StartupFatal {
            tracing::error!(critical = true, error = %err, "fatal error in poll loop");
            return Err(err);
        }

        tracing::error!(error = %err, cursor = state.cursor, "homework poll cycle failed");

        let report = failure_report(&err);
        if state.already_sent(&report) {
            tracing::debug!("failure already reported");
            return Ok(CycleOutcome::Failed { reported: false });
        }

        match notify(self.notifier.as_ref(), self.chat_id, &report).await {
            Ok(()) => {
                state.last_sent = Some(report);
                Ok(CycleOutcome::Failed { reported: true })
            }
            Err(send_err) => {
                tracing::error!(error = %send_err, "failed to report the failure to telegram");
                Ok(CycleOutcome::Failed { reported: false })
            }
        }
    }
}
