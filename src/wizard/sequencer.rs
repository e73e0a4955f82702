//! Monotonic step counter with bounded back-navigation

use super::step::WizardStep;

/// Tracks the single active step.
///
/// Moves forward one step per completed operation and backward one step on
/// explicit request, never skipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequencer {
    current: WizardStep,
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl StepSequencer {
    pub fn new() -> Self {
        Self {
            current: WizardStep::first(),
        }
    }

    pub fn current(&self) -> WizardStep {
        self.current
    }

    pub fn is_terminal(&self) -> bool {
        self.current.is_terminal()
    }

    /// Back-navigation is only offered strictly between the first and last step
    pub fn can_retreat(&self) -> bool {
        self.current.number() > 1 && !self.current.is_terminal()
    }

    /// Move forward one step, saturating at the terminal step
    pub fn advance(&mut self) -> WizardStep {
        self.current = self.current.next();
        self.current
    }

    /// Move back one step; no-op at the first and terminal steps
    pub fn retreat(&mut self) -> WizardStep {
        if self.can_retreat() {
            self.current = self.current.prev();
        }
        self.current
    }

    pub fn reset(&mut self) {
        self.current = WizardStep::first();
    }
}
