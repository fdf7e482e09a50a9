//! Progress snapshot published after every batch.

/// Counters after a batch barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationProgress {
    /// Entries decided so far (probed, or dropped for lacking a URL).
    pub checked: usize,
    pub total: usize,
    pub valid: usize,
    pub removed: usize,
}

impl ValidationProgress {
    /// Fraction complete in [0, 1]; an empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.checked as f64 / self.total as f64
        }
    }
}
