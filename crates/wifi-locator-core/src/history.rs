//! Append-only scan history.
//!
//! The log is split into a single [`HistoryWriter`] and any number of
//! [`HistoryReader`] handles. The writer is not `Clone` and `append` takes
//! `&mut self`, so only the task that owns it can grow the log. Readers copy
//! out of the shared buffer under a read lock and therefore observe the log
//! either before or after an append, never half-way.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::result::HistoryEntry;
use crate::error::HistoryError;

type SharedLog = Arc<RwLock<Vec<HistoryEntry>>>;

/// Constructor for a connected writer/reader pair.
pub struct ScanHistory;

impl ScanHistory {
    /// Create an empty log.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (HistoryWriter, HistoryReader) {
        let log: SharedLog = Arc::new(RwLock::new(Vec::new()));
        (
            HistoryWriter { log: Arc::clone(&log) },
            HistoryReader { log },
        )
    }
}

/// Exclusive append handle.
#[derive(Debug)]
pub struct HistoryWriter {
    log: SharedLog,
}

impl HistoryWriter {
    /// Append one processed scan.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.log.write().push(entry);
    }

    /// A new reader over the same log.
    pub fn reader(&self) -> HistoryReader {
        HistoryReader {
            log: Arc::clone(&self.log),
        }
    }
}

/// Shared read handle.
#[derive(Debug, Clone)]
pub struct HistoryReader {
    log: SharedLog,
}

impl HistoryReader {
    /// The most recently appended entry.
    pub fn latest(&self) -> Result<HistoryEntry, HistoryError> {
        self.log.read().last().cloned().ok_or(HistoryError::Empty)
    }

    /// The last `limit` entries, oldest first.
    ///
    /// Returns every entry when `limit` exceeds the log length.
    pub fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let log = self.log.read();
        let start = log.len().saturating_sub(limit);
        log[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.log.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.read().is_empty()
    }
}
