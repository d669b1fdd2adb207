#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Outcome counts of a committed sync.
pub struct SyncReport {
    /// Records enrolled into the new snapshot.
    pub succeeded: usize,
    /// Candidates skipped because of a per-record failure.
    pub failed: usize,
}

impl SyncReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} enrolled, {} skipped", self.succeeded, self.failed)
    }
}
