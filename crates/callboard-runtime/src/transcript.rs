use callboard_types::TranscriptEntry;

/// Client-visible transcript of the active call.
///
/// The voice provider pushes cumulative snapshots, so every update replaces
/// the whole sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptAccumulator {
    entries: Vec<TranscriptEntry>,
    updates: u64,
}

impl TranscriptAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, snapshot: Vec<TranscriptEntry>) {
        self.entries = snapshot;
        self.updates += 1;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.updates = 0;
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of snapshots applied since the last clear.
    pub fn updates(&self) -> u64 {
        self.updates
    }
}
