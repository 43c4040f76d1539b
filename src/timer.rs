//! Single-slot timers
//!
//! The session never owns a real timer. It hands an [`AlarmMessage`] and a
//! delay to the host's scheduling callback and expects the message back
//! through [`crate::game::Session::receive_alarm`]. Each message carries the
//! generation it was armed with, so re-arming or cancelling makes every
//! earlier message stale without the host having to clear anything.

use web_time::Duration;

use crate::AlarmMessage;

/// Tracks the one live generation of a debounced timer
#[derive(Debug, Default, Clone)]
pub struct Debouncer {
    generation: u64,
    pending: Option<u64>,
}

impl Debouncer {
    /// Starts a new generation, superseding whatever was pending
    ///
    /// # Returns
    ///
    /// The generation the caller must attach to the scheduled alarm
    pub fn arm(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.pending = Some(self.generation);
        self.generation
    }

    /// Drops the pending generation, returning whether one existed
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Whether an alarm is currently expected
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Consumes the pending generation if `generation` is the live one
    ///
    /// # Returns
    ///
    /// `true` if the alarm should take effect, `false` if it is stale
    pub fn fire(&mut self, generation: u64) -> bool {
        if self.pending == Some(generation) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
struct ScheduledAlarm {
    due: Duration,
    sequence: u64,
    message: AlarmMessage,
}

/// A virtual-time queue of scheduled alarms
///
/// Native hosts and tests use this in place of `setTimeout`: schedule
/// through [`AlarmQueue::scheduler`], then [`AlarmQueue::advance`] the clock
/// and deliver whatever fell due. Alarms due at the same instant come out in
/// scheduling order.
#[derive(Debug, Default)]
pub struct AlarmQueue {
    now: Duration,
    next_sequence: u64,
    entries: Vec<ScheduledAlarm>,
}

impl AlarmQueue {
    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of alarms waiting, stale ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Queues a message to become due after `delay`
    pub fn schedule(&mut self, message: AlarmMessage, delay: Duration) {
        self.entries.push(ScheduledAlarm {
            due: self.now + delay,
            sequence: self.next_sequence,
            message,
        });
        self.next_sequence += 1;
    }

    /// Borrows the queue as a scheduling callback
    pub fn scheduler(&mut self) -> impl FnMut(AlarmMessage, Duration) + '_ {
        move |message, delay| self.schedule(message, delay)
    }

    /// When the earliest alarm becomes due
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|entry| entry.due).min()
    }

    /// Removes the earliest alarm due no later than `until`
    ///
    /// The clock moves forward to that alarm's due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<AlarmMessage> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.sequence))
            .map(|(index, _)| index)?;

        let entry = self.entries.swap_remove(index);
        self.now = self.now.max(entry.due);
        Some(entry.message)
    }

    /// Moves the clock forward by `by`, delivering due alarms in order
    ///
    /// `deliver` receives the queue back so it can schedule follow-up
    /// alarms; those are delivered too if they fall within the window.
    pub fn advance<F: FnMut(AlarmMessage, &mut Self)>(&mut self, by: Duration, mut deliver: F) {
        let target = self.now + by;
        while let Some(message) = self.pop_due(target) {
            deliver(message, self);
        }
        self.now = target;
    }
}
