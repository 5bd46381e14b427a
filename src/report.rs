//! Diagnostics sink for the record builder.

use tracing::{debug, warn};

/// Receives extraction events. Every method defaults to a no-op so sinks only
/// implement what they care about.
pub trait Reporter: Send + Sync {
    /// A region query ran and matched `matches` nodes.
    fn region_matched(&self, region: &str, matches: usize) {
        let _ = (region, matches);
    }

    /// A field query ran and produced `candidates` raw values where the page
    /// layout renders `expected`.
    fn field_candidates(&self, field: &str, candidates: usize, expected: usize) {
        let _ = (field, candidates, expected);
    }
}

/// How a candidate count compares with what the layout renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    Missing,
    Expected,
    /// More candidates than the layout renders; the field rule picked one by
    /// position.
    Ambiguous,
}

impl Coverage {
    pub fn assess(candidates: usize, expected: usize) -> Self {
        if candidates == 0 {
            Coverage::Missing
        } else if candidates > expected {
            Coverage::Ambiguous
        } else {
            Coverage::Expected
        }
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn region_matched(&self, region: &str, matches: usize) {
        if matches == 0 {
            warn!(region, "Region matched nothing; page layout may have changed");
        } else {
            debug!(region, matches, "Region resolved");
        }
    }

    fn field_candidates(&self, field: &str, candidates: usize, expected: usize) {
        match Coverage::assess(candidates, expected) {
            Coverage::Missing => warn!(field, "No candidates for field"),
            Coverage::Ambiguous => warn!(
                field,
                candidates, expected, "More candidates than expected; value chosen by position"
            ),
            Coverage::Expected => debug!(field, candidates, "Field candidates"),
        }
    }
}
