use crate::filter::ExclusionSet;
use crate::scanner::FileRecord;

/// Fixed-capacity selection of the largest files seen so far
///
/// Slots are kept sorted ascending by size, empty slots first, so slot 0 is
/// always the entry a newcomer has to beat. Owned by a single consumer; no
/// locking.
#[derive(Debug, Clone)]
pub struct TopFiles {
    slots: Vec<Option<FileRecord>>,
}

impl TopFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of real entries held
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Size a record must exceed to get in (`None` while a slot is free)
    #[cfg(test)]
    pub(crate) fn threshold(&self) -> Option<u64> {
        self.slots.first().and_then(|s| s.as_ref()).map(|r| r.size)
    }

    /// Offer a record; returns whether it was kept
    ///
    /// The exclusion check only runs for records big enough to enter, which
    /// keeps the common case to a single comparison. Equal sizes never
    /// displace a held record.
    pub fn offer(&mut self, record: FileRecord, exclusions: &ExclusionSet) -> bool {
        let Some(smallest) = self.slots.first() else {
            return false;
        };
        let beats = match smallest {
            Some(held) => record.size > held.size,
            None => true,
        };
        if !beats || exclusions.is_excluded(&record.path) {
            return false;
        }

        self.slots[0] = Some(record);
        // Stable: the newcomer stays ahead of equal sizes and is evicted first.
        self.slots.sort_by_key(|s| s.as_ref().map(|r| r.size));
        true
    }

    /// Held entries, ascending by size
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &FileRecord> {
        self.slots.iter().flatten()
    }

    /// Held entries, ascending by size, empty slots dropped
    pub fn into_sorted_vec(self) -> Vec<FileRecord> {
        self.slots.into_iter().flatten().collect()
    }
}
