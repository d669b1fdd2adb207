use super::types::EnrollmentRecord;

/// One immutable version of the enrollment set.
///
/// Each record carries its own embedding and metadata, so the two can never drift out of
/// alignment. Order is the order records were produced by the sync that built it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    records: Vec<EnrollmentRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<EnrollmentRecord>) -> Self {
        Self { records }
    }

    /// Creates a snapshot with no records.
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[EnrollmentRecord] {
        &self.records
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&EnrollmentRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrollmentRecord> {
        self.records.iter()
    }
}

impl FromIterator<EnrollmentRecord> for Snapshot {
    fn from_iter<I: IntoIterator<Item = EnrollmentRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
