/// Statistics tracking for the message stream
use serde::{Deserialize, Serialize};

/// Running counters kept by a [`MessageStream`](crate::MessageStream)
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamStats {
    /// Number of attached translators
    pub translators: usize,
    /// Propagation passes run since creation
    pub passes: u64,
    /// Total `translate` calls
    pub translate_calls: u64,
    /// Messages destroyed by a translator
    pub messages_destroyed: u64,
    /// Messages created by translators during propagation
    pub messages_synthesized: u64,
    /// Messages handed to the command list
    pub messages_forwarded: u64,
}

impl StreamStats {
    pub(crate) fn record(&mut self, report: &PropagationReport) {
        self.passes += 1;
        self.translate_calls += report.translate_calls;
        self.messages_destroyed += report.destroyed;
        self.messages_synthesized += report.synthesized;
        self.messages_forwarded += report.forwarded;
    }
}

/// Outcome of a single propagation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    /// Translators that ran this pass
    pub translators_run: usize,
    pub translate_calls: u64,
    pub destroyed: u64,
    pub synthesized: u64,
    /// Survivors moved to the command list
    pub forwarded: u64,
}
