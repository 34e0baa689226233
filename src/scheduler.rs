use std::time::Duration;

use web_time::Instant;

/// Deadline for the next deferred computer step.
///
/// Nothing blocks: the host asks for the deadline, waits however it likes
/// (a browser `setTimeout`, a game loop tick) and then polls.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    due: Option<Instant>,
}

impl Scheduler {
    pub fn schedule(&mut self, delay: Duration) {
        self.due = Some(Instant::now() + delay);
    }

    pub fn cancel(&mut self) {
        self.due = None;
    }

    pub fn pending_until(&self) -> Option<Instant> {
        self.due
    }

    /// Time left until the pending step is due; zero once it is overdue.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.due.map(|due| due.saturating_duration_since(now))
    }

    /// Consumes the pending step if it is due at `now`.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    /// Consumes the pending step regardless of its deadline.
    pub fn take(&mut self) -> bool {
        self.due.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_fires_only_once_it_is_due() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::from_secs(60));
        let due = scheduler.pending_until().unwrap();

        assert!(!scheduler.take_due(Instant::now()));
        assert!(scheduler.remaining(Instant::now()).unwrap() > Duration::from_secs(59));
        assert!(scheduler.take_due(due));
        assert!(!scheduler.take_due(due));
        assert_eq!(scheduler.pending_until(), None);
    }

    #[test]
    fn overdue_step_reports_zero_remaining() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::ZERO);

        assert_eq!(
            scheduler.remaining(Instant::now() + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
        assert!(scheduler.take());
        assert!(!scheduler.take());
    }

    #[test]
    fn cancel_drops_pending_step() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::from_millis(10));
        scheduler.cancel();

        assert_eq!(scheduler.remaining(Instant::now()), None);
        assert!(!scheduler.take());
    }
}
