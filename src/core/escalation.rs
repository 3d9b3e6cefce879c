//! Escalation policy consulted at entry finalization

use super::severity::{Category, Level, SeverityMask};

/// Consequence of finalizing an entry, decided from its maximum severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escalation {
    /// Entry was dispatched normally.
    None,
    /// Drain the queue, then surface a typed error to the finalizing caller.
    Exception,
    /// Drain the queue, then terminate the process.
    Terminate,
}

/// Process-wide escalation configuration.
///
/// Plain value settings read synchronously at finalization time; changing
/// them affects only entries finalized afterward. The exception mask takes
/// precedence when both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationPolicy {
    pub exception_mask: SeverityMask,
    pub termination_mask: SeverityMask,
}

impl Default for EscalationPolicy {
    /// No exceptions; termination on any error.
    fn default() -> Self {
        Self {
            exception_mask: SeverityMask::EMPTY,
            termination_mask: SeverityMask::every(Category::Error),
        }
    }
}

impl EscalationPolicy {
    pub fn decide(&self, category: Category, level: Level) -> Escalation {
        if self.exception_mask.matches(category, level) {
            Escalation::Exception
        } else if self.termination_mask.matches(category, level) {
            Escalation::Terminate
        } else {
            Escalation::None
        }
    }
}
