use super::ExitReason;

/// Outcome of the most recent foreground command.
///
/// Background completions never touch this; before any foreground command
/// has run it reports a clean exit.
pub(super) struct ForegroundStatus {
    last: ExitReason,
}

impl Default for ForegroundStatus {
    fn default() -> Self {
        Self {
            last: ExitReason::Code(0),
        }
    }
}

impl ForegroundStatus {
    pub(super) fn record(&mut self, outcome: ExitReason) {
        self.last = outcome;
    }

    pub(super) fn describe(&self) -> String {
        self.last.to_string()
    }
}
