use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::time::Duration;
use tracing::trace;

/// Handle for a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry {
    due: Duration,
    seq: u64,
    id: TimerId,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

#[derive(Debug)]
struct Timer<E> {
    event: E,
    period: Option<Duration>,
}

/// Priority queue of timed events.
///
/// Time is passed in by the caller, so the scheduler itself never reads a
/// clock. Events due at the same instant fire in the order they were armed.
/// Cancelled timers are dropped lazily when they reach the head of the queue.
#[derive(Debug)]
pub struct Scheduler<E> {
    queue: BinaryHeap<Reverse<Entry>>,
    timers: HashMap<TimerId, Timer<E>>,
    next_id: u64,
    next_seq: u64,
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            queue: BinaryHeap::new(),
            timers: HashMap::new(),
            next_id: 0,
            next_seq: 0,
        }
    }

    /// Fires `event` once at `now + delay`.
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, event: E) -> TimerId {
        self.arm(now + delay, event, None)
    }

    /// Fires `event` every `period`, first at `now + period`.
    pub fn schedule_repeating(&mut self, now: Duration, period: Duration, event: E) -> TimerId {
        // a zero period would re-arm at the same instant forever
        let period = period.max(Duration::from_millis(1));
        self.arm(now + period, event, Some(period))
    }

    fn arm(&mut self, due: Duration, event: E, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert(id, Timer { event, period });
        self.push(id, due);
        id
    }

    fn push(&mut self, id: TimerId, due: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry { due, seq, id }));
    }

    /// Returns true if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn cancel_all(&mut self) {
        trace!(pending = self.timers.len(), "cancelling all timers");
        self.timers.clear();
        self.queue.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.contains_key(&id)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Instant at which the earliest live timer fires
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.discard_cancelled();
        self.queue.peek().map(|Reverse(entry)| entry.due)
    }

    /// Pops the earliest event due at or before `now`.
    ///
    /// Repeating timers are re-armed at `due + period` before returning, so
    /// a late poll catches up one period at a time instead of drifting.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerId, E)> {
        self.discard_cancelled();
        let due = self.queue.peek().map(|Reverse(entry)| entry.due)?;
        if due > now {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        let timer = self.timers.get(&entry.id)?;
        let event = timer.event.clone();
        let period = timer.period;
        match period {
            Some(period) => self.push(entry.id, entry.due + period),
            None => {
                self.timers.remove(&entry.id);
            }
        }
        Some((entry.id, event))
    }

    fn discard_cancelled(&mut self) {
        while let Some(Reverse(entry)) = self.queue.peek() {
            if self.timers.contains_key(&entry.id) {
                break;
            }
            self.queue.pop();
        }
    }
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}
