//! Per-view cache of queue snapshots.

use std::collections::HashMap;

use crate::{Appointment, AppointmentProgress, ProgressPolicy, QueueId, QueueStatus};

/// The in-memory snapshot map owned by a single view.
///
/// Every fetch is tagged with the generation returned by [`SnapshotCache::begin`].
/// Responses carrying an older generation, or arriving after [`SnapshotCache::close`],
/// are discarded. Within a generation the last response applied wins.
#[derive(Debug, Default, Clone)]
pub struct SnapshotCache {
    statuses: HashMap<QueueId, QueueStatus>,
    generation: u64,
    closed: bool,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation to tag an outgoing fetch with.
    pub fn begin(&self) -> u64 {
        self.generation
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn accepts(&self, generation: u64) -> bool {
        !self.closed && generation == self.generation
    }

    /// Replace the whole map with a fetched batch.
    ///
    /// Returns `false` when the response was stale and nothing changed.
    pub fn apply(&mut self, generation: u64, statuses: Vec<QueueStatus>) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.statuses = statuses.into_iter().map(|s| (s.queue_id, s)).collect();
        true
    }

    /// Record a failed fetch. Queues read as absent until the next success.
    pub fn apply_failure(&mut self, generation: u64) -> bool {
        if !self.accepts(generation) {
            return false;
        }
        self.statuses.clear();
        true
    }

    /// Drop outstanding fetches without closing the cache, e.g. when the set
    /// of visible queues changes.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Tear the cache down. Later responses are ignored.
    pub fn close(&mut self) {
        self.invalidate();
        self.closed = true;
        self.statuses.clear();
    }

    pub fn status(&self, queue_id: &QueueId) -> Option<&QueueStatus> {
        self.statuses.get(queue_id)
    }

    /// All cached snapshots, ordered by queue ID.
    pub fn statuses(&self) -> Vec<QueueStatus> {
        let mut statuses: Vec<QueueStatus> = self.statuses.values().cloned().collect();
        statuses.sort_by_key(|s| s.queue_id);
        statuses
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    /// Project each appointment against the cached snapshot for its queue.
    pub fn project(
        &self,
        appointments: &[Appointment],
        policy: &ProgressPolicy,
    ) -> Vec<AppointmentProgress> {
        appointments
            .iter()
            .map(|appointment| AppointmentProgress {
                appointment: appointment.clone(),
                progress: policy.compute(&appointment.ticket, self.status(&appointment.queue_id())),
            })
            .collect()
    }
}
