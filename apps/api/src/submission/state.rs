//! Submission state machine.
//!
//! `Idle → Submitting → Succeeded | Failed`, with `Submitting` re-enterable
//! from any state. Every submission carries a [`Ticket`]; a completion whose
//! ticket is not the one in flight is stale and leaves the state untouched,
//! so the newest submission always wins.

/// Shown when the processing endpoint answers without a tailored resume.
pub const MISSING_RESULT_MESSAGE: &str = "Failed to get tailored resume";
/// Shown when the exchange with the processing endpoint fails.
pub const PROCESSING_ERROR_MESSAGE: &str = "Error: Failed to process resume";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Outcome of one exchange with the processing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TailoringResult {
    Tailored(String),
    Failed(String),
}

impl TailoringResult {
    pub fn missing() -> Self {
        TailoringResult::Failed(MISSING_RESULT_MESSAGE.to_string())
    }

    pub fn error() -> Self {
        TailoringResult::Failed(PROCESSING_ERROR_MESSAGE.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting {
        ticket: Ticket,
    },
    Succeeded(String),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Started(Ticket),
    Finished(Ticket, TailoringResult),
}

impl SubmissionState {
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Submitting { .. })
    }

    /// The displayed result; `None` while idle or in flight.
    pub fn result(&self) -> Option<&str> {
        match self {
            SubmissionState::Succeeded(text) | SubmissionState::Failed(text) => Some(text),
            SubmissionState::Idle | SubmissionState::Submitting { .. } => None,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "idle",
            SubmissionState::Submitting { .. } => "submitting",
            SubmissionState::Succeeded(_) => "succeeded",
            SubmissionState::Failed(_) => "failed",
        }
    }

    pub fn in_flight(&self) -> Option<Ticket> {
        match self {
            SubmissionState::Submitting { ticket } => Some(*ticket),
            _ => None,
        }
    }
}

/// Applies one event. Starting always clears the previous result; finishing
/// only counts for the ticket currently in flight.
pub fn transition(state: &SubmissionState, event: SubmissionEvent) -> SubmissionState {
    match event {
        SubmissionEvent::Started(ticket) => SubmissionState::Submitting { ticket },
        SubmissionEvent::Finished(ticket, result) => {
            if state.in_flight() != Some(ticket) {
                return state.clone();
            }
            match result {
                TailoringResult::Tailored(text) => SubmissionState::Succeeded(text),
                TailoringResult::Failed(message) => SubmissionState::Failed(message),
            }
        }
    }
}
