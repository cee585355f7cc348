//! Submission coordinator: owns one form and its submission state, turns the
//! form into a payload, and records what the processing endpoint answered.

use tracing::{error, info, warn};

use crate::processing::ProcessingClient;
use crate::selection::TailorForm;
use crate::submission::payload::{build_payload, SubmissionPayload};
use crate::submission::state::{
    transition, SubmissionEvent, SubmissionState, TailoringResult, Ticket,
};

/// A submission that has been started but not yet completed.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub ticket: Ticket,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Default)]
pub struct Coordinator {
    form: TailorForm,
    state: SubmissionState,
    last_ticket: u64,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &TailorForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TailorForm {
        &mut self.form
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Marks a submission as in flight (clearing any previous result) and
    /// snapshots the payload it will send.
    pub fn begin(&mut self) -> PendingSubmission {
        self.last_ticket += 1;
        let ticket = Ticket(self.last_ticket);

        if let Some(previous) = self.state.in_flight() {
            warn!(
                "Submission {} superseded by {} before it resolved",
                previous.0, ticket.0
            );
        }

        let (resume, job) = self.form.resolve_active_inputs();
        let payload = build_payload(resume, job);
        self.state = transition(&self.state, SubmissionEvent::Started(ticket));

        info!("Submission {} started", ticket.0);
        PendingSubmission { ticket, payload }
    }

    /// Records the outcome of `ticket`. Returns `false` when the ticket is
    /// stale and the outcome was dropped.
    pub fn complete(&mut self, ticket: Ticket, result: TailoringResult) -> bool {
        if self.state.in_flight() != Some(ticket) {
            warn!("Dropping stale result for submission {}", ticket.0);
            return false;
        }
        self.state = transition(&self.state, SubmissionEvent::Finished(ticket, result));
        info!("Submission {} finished: {}", ticket.0, self.state.status());
        true
    }
}

/// Sends `payload` and maps every outcome to a displayable result.
/// Failures are logged here and never returned as errors.
pub async fn submit(
    processor: &dyn ProcessingClient,
    payload: &SubmissionPayload,
) -> TailoringResult {
    match processor.process(payload).await {
        Ok(response) => match response.tailored_resume {
            Some(text) => TailoringResult::Tailored(text),
            None => {
                warn!("Processing service answered without a tailored resume");
                TailoringResult::missing()
            }
        },
        Err(e) => {
            error!("Failed to tailor resume: {e}");
            TailoringResult::error()
        }
    }
}
