//! Storage for time-delayed effect entries.

use std::{collections::VecDeque, time::Duration};

use rampart_core::ScheduledEffect;

/// FIFO holding scheduled effects until they come due.
#[derive(Clone, Debug, Default)]
pub struct ScheduledEffectQueue {
    entries: VecDeque<ScheduledEffect>,
}

impl ScheduledEffectQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry behind every entry already queued.
    pub fn push(&mut self, entry: ScheduledEffect) {
        self.entries.push_back(entry);
    }

    /// Moves every entry due at `now` into `out`, in insertion order.
    ///
    /// Entries not yet due stay queued in their original order.
    pub fn take_due(&mut self, now: Duration, out: &mut Vec<ScheduledEffect>) {
        if !self.entries.iter().any(|entry| entry.is_due(now)) {
            return;
        }

        let mut pending = VecDeque::with_capacity(self.entries.len());
        for entry in self.entries.drain(..) {
            if entry.is_due(now) {
                out.push(entry);
            } else {
                pending.push_back(entry);
            }
        }
        self.entries = pending;
    }

    /// Queued entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduledEffect> {
        self.entries.iter()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
