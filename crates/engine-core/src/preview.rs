use model::records::record::ValidatedRecord;

/// Bounded view of the preview for rendering.
#[derive(Debug, Clone, Copy)]
pub struct PreviewSlice<'a> {
    pub shown: &'a [ValidatedRecord],
    pub total: usize,
    pub remaining: usize,
}

impl PreviewSlice<'_> {
    /// `"+N more"` when the slice does not show everything.
    pub fn more_label(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("+{} more", self.remaining))
    }
}

/// Validated records held for review. Each new parse replaces the contents
/// wholesale; nothing here touches the network.
#[derive(Debug, Default)]
pub struct PreviewStore {
    records: Vec<ValidatedRecord>,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, records: Vec<ValidatedRecord>) {
        self.records = records;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ValidatedRecord] {
        &self.records
    }

    pub fn slice(&self, limit: usize) -> PreviewSlice<'_> {
        let shown = &self.records[..self.records.len().min(limit)];
        PreviewSlice {
            shown,
            total: self.records.len(),
            remaining: self.records.len() - shown.len(),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Moves the records out for submission, leaving the store empty.
    pub fn take(&mut self) -> Vec<ValidatedRecord> {
        std::mem::take(&mut self.records)
    }
}
