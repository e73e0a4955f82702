//! Step-sequenced interaction controller
//!
//! [`Wizard`] owns the session values, the step counter, the transcript and
//! the busy flag. Each non-terminal step issues exactly one request; whatever
//! comes back is narrated into the transcript and the wizard moves on, without
//! branching on success or failure.

pub mod operation;
pub mod sequencer;
pub mod session;
pub mod step;
pub mod transcript;

pub use operation::Operation;
pub use sequencer::StepSequencer;
pub use session::{Field, SessionState};
pub use step::{InputKind, InputSpec, WizardStep, TOTAL_STEPS};
pub use transcript::{Sender, Transcript, TranscriptEntry};

use thiserror::Error;
use tracing::{debug, info};

use crate::api::{ApiRequest, ApiResponse, Transport};

#[cfg(test)]
mod tests;

/// A request taken out of the wizard while it is in flight
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOperation {
    pub step: WizardStep,
    pub operation: Operation,
    pub request: ApiRequest,
}

/// Why the current step cannot be submitted right now
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("a request is already in flight")]
    Busy,
    #[error("all steps are complete")]
    Finished,
    #[error("please fill in: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// The wizard controller
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    session: SessionState,
    sequencer: StepSequencer,
    transcript: Transcript,
    busy: bool,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn step(&self) -> WizardStep {
        self.sequencer.current()
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// True while exactly one request is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_finished(&self) -> bool {
        self.sequencer.is_terminal()
    }

    /// Whether the back control is offered on the current step
    pub fn can_go_back(&self) -> bool {
        !self.busy && self.sequencer.can_retreat()
    }

    /// Update a form-bound session value
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.session.set(field, value);
    }

    /// Labels of the current step's inputs that are still empty
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.step()
            .inputs()
            .iter()
            .filter(|input| self.session.get(input.field).is_empty())
            .map(|input| input.label)
            .collect()
    }

    pub fn form_ready(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Take the current step's request and mark the wizard busy.
    pub fn begin(&mut self) -> Result<PendingOperation, SubmitBlocked> {
        if self.busy {
            return Err(SubmitBlocked::Busy);
        }
        let step = self.step();
        let Some(operation) = step.operation() else {
            return Err(SubmitBlocked::Finished);
        };
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(SubmitBlocked::MissingFields(missing));
        }

        let request = operation.request(&self.session);
        info!(
            step = step.number(),
            method = %request.method,
            target = %request.target(),
            "Starting operation"
        );
        self.busy = true;

        Ok(PendingOperation {
            step,
            operation,
            request,
        })
    }

    /// Record the outcome of an in-flight request and advance one step
    pub fn finish(&mut self, pending: PendingOperation, response: ApiResponse) -> &TranscriptEntry {
        self.busy = false;

        let text = pending.operation.apply(&response, &mut self.session);
        debug!(step = pending.step.number(), body = %response.serialized_body(), "Operation response");

        let next = self.sequencer.advance();
        info!(
            step = pending.step.number(),
            status = response.status,
            next = next.number(),
            "Operation completed"
        );

        self.transcript.append(text, Sender::System)
    }

    /// Run the current step's operation to completion over `transport`
    pub async fn submit(&mut self, transport: &dyn Transport) -> Result<WizardStep, SubmitBlocked> {
        let pending = self.begin()?;
        let response = transport.send(pending.request.clone()).await;
        self.finish(pending, response);
        Ok(self.step())
    }

    /// Step back one screen. Session values and transcript are kept.
    pub fn go_back(&mut self) -> bool {
        if !self.can_go_back() {
            return false;
        }
        let before = self.step();
        let after = self.sequencer.retreat();
        debug!(from = before.number(), to = after.number(), "Stepped back");
        before != after
    }

    /// "Start Over" from the terminal step: back to step 1 with an empty
    /// transcript. Session values are left as they are.
    pub fn restart(&mut self) -> bool {
        if !self.sequencer.is_terminal() {
            return false;
        }
        self.sequencer.reset();
        self.transcript.clear();
        info!("Wizard restarted");
        true
    }
}
