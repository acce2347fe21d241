//! Bounded log of circuit state transitions.

use super::types::CircuitState;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of transitions retained per breaker
pub const HISTORY_CAPACITY: usize = 100;

/// A single state transition, immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateChangeRecord {
    /// Position among all transitions of the breaker, starting at 0
    pub sequence: u64,
    /// State the breaker entered
    pub state: CircuitState,
    /// Wall-clock time of the transition, for display only; order by `sequence`
    pub timestamp: DateTime<Utc>,
    /// Human-readable cause
    pub reason: String,
}

impl StateChangeRecord {
    pub(crate) fn new(state: CircuitState, reason: impl Into<String>) -> Self {
        Self {
            sequence: 0,
            state,
            timestamp: Utc::now(),
            reason: reason.into(),
        }
    }
}

/// Fixed-capacity append log that drops the oldest record first
#[derive(Debug)]
pub struct TransitionLog {
    records: VecDeque<StateChangeRecord>,
    capacity: usize,
    next_sequence: u64,
}

impl TransitionLog {
    /// Create an empty log holding at most `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
            next_sequence: 0,
        }
    }

    /// Append a record, evicting the oldest one when full
    pub fn push(&mut self, mut record: StateChangeRecord) {
        record.sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        if self.capacity == 0 {
            return;
        }
        while self.records.len() >= self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent record, if any
    pub fn last(&self) -> Option<&StateChangeRecord> {
        self.records.back()
    }

    /// Owned copy of the records, oldest first
    pub fn snapshot(&self) -> Vec<StateChangeRecord> {
        self.records.iter().cloned().collect()
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}
