//! Virtual-time deferral queue.
//!
//! UI pacing (reveal delays, loading shims, transient flashes) is modelled
//! as tasks scheduled against a millisecond clock the caller advances.
//! Nothing here sleeps, so tests drive time deterministically and a task
//! firing after its trigger went stale is simply dropped by the handler.

#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_seq: u64,
    pending: Vec<(u64, u64, T)>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_seq: 0,
            pending: Vec::new(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay_ms: u64, task: T) {
        let due = self.now_ms + delay_ms;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push((due, seq, task));
    }

    /// Move the clock forward and return every task that came due, in
    /// (due time, schedule order) order.
    pub fn advance(&mut self, delta_ms: u64) -> Vec<T> {
        self.now_ms += delta_ms;
        let now = self.now_ms;
        let mut due: Vec<(u64, u64, T)> = Vec::new();
        let mut remaining: Vec<(u64, u64, T)> = Vec::new();
        for item in self.pending.drain(..) {
            if item.0 <= now {
                due.push(item);
            } else {
                remaining.push(item);
            }
        }
        self.pending = remaining;
        due.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        due.into_iter().map(|(_, _, t)| t).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
