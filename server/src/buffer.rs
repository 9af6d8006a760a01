//! Bounded in-memory buffer of recent player actions
//!
//! This module holds the only piece of process-wide state in the relay:
//! - A fixed-capacity FIFO of enriched action records, oldest first
//! - Server-side timestamping of every payload on insertion
//! - One-in-one-out eviction once the buffer is full
//!
//! Pollers only ever see the newest record. Anything they miss between two
//! polls is gone from their point of view, even while it is still buffered.

use chrono::{DateTime, Utc};
use log::debug;
use shared::{ActionPayload, ActionRecord, MAX_BUFFER_SIZE};
use std::collections::VecDeque;

/// Fixed-capacity queue of the most recent action records
///
/// The buffer is created empty at startup and only ever grows by `append`,
/// shrinking again by exactly one record whenever an append pushes it past
/// its capacity. Callers sharing it between requests wrap it in a lock so
/// that appends and reads never interleave.
#[derive(Debug)]
pub struct ActionBuffer {
    /// Records in arrival order, oldest at the front
    records: VecDeque<ActionRecord>,
    /// Maximum number of records retained
    capacity: usize,
    /// Timestamp assigned to the most recent append
    last_stamp: Option<DateTime<Utc>>,
}

impl ActionBuffer {
    /// Creates an empty buffer holding at most `MAX_BUFFER_SIZE` records
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(MAX_BUFFER_SIZE + 1),
            capacity: MAX_BUFFER_SIZE,
            last_stamp: None,
        }
    }

    /// Stamps the payload with the current time and stores it as the newest record
    ///
    /// The payload is accepted as-is: no fields are required and nothing is
    /// validated. If the buffer was already full, the oldest record is dropped.
    pub fn append(&mut self, payload: ActionPayload) {
        self.append_at(payload, Utc::now());
    }

    fn append_at(&mut self, payload: ActionPayload, now: DateTime<Utc>) {
        // Wall clocks can step backwards; stamps must not.
        let stamp = match self.last_stamp {
            Some(last) if now < last => last,
            _ => now,
        };
        self.last_stamp = Some(stamp);

        self.records.push_back(ActionRecord::new(payload, stamp));

        if self.records.len() > self.capacity {
            if let Some(evicted) = self.records.pop_front() {
                debug!("Evicted action stamped {}", evicted.timestamp_iso());
            }
        }
    }

    /// Returns the most recently appended record, or None if nothing was ever appended
    pub fn latest(&self) -> Option<&ActionRecord> {
        self.records.back()
    }

    /// Iterates over the buffered records from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter()
    }

    /// Returns the number of buffered records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing has been appended yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the maximum number of records retained
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::new()
    }
}
