//! Quiet-period debouncing for editor change notifications.
//!
//! # Invariants
//! - Only the most recent recorded value is ever emitted.
//! - A value is emitted at most once.
//! - The clock is supplied by the caller; nothing here reads wall time.

use std::time::{Duration, Instant};

/// Quiet period applied before block edits are persisted.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1000);

/// Holds the latest change until no newer change arrived for a quiet period.
#[derive(Debug)]
pub struct ChangeDebouncer<T> {
    quiet_period: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Default for ChangeDebouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl<T> ChangeDebouncer<T> {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    /// Records `value` as the latest change observed at `now`.
    ///
    /// Replaces any pending value and restarts the quiet period.
    pub fn record(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now));
    }

    /// Takes the pending value if the quiet period has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let ready = matches!(
            &self.pending,
            Some((_, recorded_at)) if now.saturating_duration_since(*recorded_at) >= self.quiet_period
        );
        if ready {
            return self.pending.take().map(|(value, _)| value);
        }
        None
    }

    /// Takes the pending value regardless of the quiet period.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::{ChangeDebouncer, DEFAULT_QUIET_PERIOD};
    use std::time::{Duration, Instant};

    #[test]
    fn emits_only_after_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ChangeDebouncer::default();
        debouncer.record("v1", start);

        assert_eq!(debouncer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(debouncer.poll(start + DEFAULT_QUIET_PERIOD), Some("v1"));
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.poll(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn newer_record_replaces_pending_and_restarts_timer() {
        let start = Instant::now();
        let mut debouncer = ChangeDebouncer::new(Duration::from_millis(100));
        debouncer.record(1, start);
        debouncer.record(2, start + Duration::from_millis(80));

        assert_eq!(debouncer.poll(start + Duration::from_millis(120)), None);
        assert_eq!(debouncer.poll(start + Duration::from_millis(180)), Some(2));
    }

    #[test]
    fn flush_ignores_quiet_period() {
        let start = Instant::now();
        let mut debouncer = ChangeDebouncer::default();
        debouncer.record(vec![1, 2], start);
        assert_eq!(debouncer.flush(), Some(vec![1, 2]));
        assert_eq!(debouncer.flush(), None);
    }
}
