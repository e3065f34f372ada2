//! Write pacing.

use std::thread;

use tracing::debug;

use crate::config::ThrottlePolicy;
use crate::models::{SeatMutation, WfhRecord};

use super::{AllocationStore, StoreError, UpsertOutcome};

/// Forwards writes to a store, pausing after every full batch.
///
/// One writer is created per run, so concurrent runs on different branches
/// never wait on each other's pauses.
pub struct BatchWriter<'a> {
    store: &'a dyn AllocationStore,
    policy: ThrottlePolicy,
    in_batch: usize,
    writes: usize,
}

impl<'a> BatchWriter<'a> {
    /// Creates a writer over `store`.
    pub fn new(store: &'a dyn AllocationStore, policy: ThrottlePolicy) -> Self {
        Self {
            store,
            policy,
            in_batch: 0,
            writes: 0,
        }
    }

    /// Writes one seat mutation.
    pub fn write_seat(&mut self, mutation: &SeatMutation) -> Result<(), StoreError> {
        self.pace();
        self.store.write_seat(mutation)
    }

    /// Upserts one WFH record.
    pub fn upsert_wfh_record(&mut self, record: &WfhRecord) -> Result<UpsertOutcome, StoreError> {
        self.pace();
        self.store.upsert_wfh_record(record)
    }

    /// Writes attempted so far, successful or not.
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn pace(&mut self) {
        self.writes += 1;
        let Some(delay) = self.policy.delay() else {
            return;
        };
        if self.in_batch == self.policy.batch_size {
            debug!(writes = self.writes - 1, delay_ms = self.policy.delay_ms, "throttling writes");
            thread::sleep(delay);
            self.in_batch = 0;
        }
        self.in_batch += 1;
    }
}
