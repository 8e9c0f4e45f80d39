//! Round timers as subscriptions on a single ticking source.
//!
//! The page runs one loop that calls `GameController::advance(now)`; the
//! controller asks its [`Scheduler`] which subscriptions are due. Tearing a
//! round down is one `clear()`, so no callback can outlive the round it was
//! armed for.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Periodic target relocation.
    Movement,
    /// Periodic elapsed-time display.
    Clock,
    /// Periodic clicks-per-second display.
    Rate,
    /// One-shot end of round.
    RoundEnd,
    /// One-shot restore after the click pulse.
    Pulse,
}

#[derive(Clone, Copy, Debug)]
struct Subscription {
    kind: TimerKind,
    due_ms: f64,
    period_ms: Option<f64>,
    seq: u64,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    subs: Vec<Subscription>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `kind` every `period_ms`, first at `now + period_ms`.
    pub fn every(&mut self, kind: TimerKind, now: f64, period_ms: f64) {
        self.insert(kind, now + period_ms, Some(period_ms.max(1.0)));
    }

    /// Fire `kind` once at `now + delay_ms`.
    pub fn after(&mut self, kind: TimerKind, now: f64, delay_ms: f64) {
        self.insert(kind, now + delay_ms, None);
    }

    fn insert(&mut self, kind: TimerKind, due_ms: f64, period_ms: Option<f64>) {
        self.cancel(kind);
        let seq = self.bump_seq();
        self.subs.push(Subscription { kind, due_ms, period_ms, seq });
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.subs.retain(|s| s.kind != kind);
    }

    /// Drop every subscription at once.
    pub fn clear(&mut self) {
        self.subs.clear();
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.subs.iter().any(|s| s.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.subs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subs.len()
    }

    /// Take the earliest subscription due at `now` (ties in subscription order).
    /// One-shots are removed; periodic ones move to their next slot after `now`,
    /// so a lagging loop fires each periodic timer at most once per call.
    pub fn pop_due(&mut self, now: f64) -> Option<TimerKind> {
        let idx = self
            .subs
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due_ms <= now)
            .min_by(|(_, a), (_, b)| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;

        let sub = self.subs[idx];
        match sub.period_ms {
            None => {
                self.subs.swap_remove(idx);
            }
            Some(period) => {
                let mut next = sub.due_ms + period;
                if next <= now {
                    let missed = ((now - next) / period).floor() + 1.0;
                    next += missed * period;
                }
                let seq = self.bump_seq();
                let entry = &mut self.subs[idx];
                entry.due_ms = next;
                entry.seq = seq;
            }
        }
        Some(sub.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(s: &mut Scheduler, now: f64) -> Vec<TimerKind> {
        std::iter::from_fn(|| s.pop_due(now)).collect()
    }

    #[test]
    fn test_nothing_due_before_first_period() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Rate, 0.0, 50.0);
        assert!(drain(&mut s, 49.9).is_empty());
        assert_eq!(drain(&mut s, 50.0), vec![TimerKind::Rate]);
        assert!(s.is_armed(TimerKind::Rate));
    }

    #[test]
    fn test_due_order_then_subscription_order() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Movement, 0.0, 100.0);
        s.every(TimerKind::Clock, 0.0, 100.0);
        s.every(TimerKind::Rate, 0.0, 50.0);
        assert_eq!(
            drain(&mut s, 100.0),
            vec![TimerKind::Rate, TimerKind::Movement, TimerKind::Clock]
        );
    }

    #[test]
    fn test_lagging_periodic_fires_once_and_skips_ahead() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Rate, 0.0, 50.0);
        assert_eq!(drain(&mut s, 1_000.0), vec![TimerKind::Rate]);
        // next slot is strictly after 1000
        assert!(drain(&mut s, 1_000.0).is_empty());
        assert_eq!(drain(&mut s, 1_050.0), vec![TimerKind::Rate]);
    }

    #[test]
    fn test_one_shot_is_removed() {
        let mut s = Scheduler::new();
        s.after(TimerKind::RoundEnd, 0.0, 5_000.0);
        assert_eq!(drain(&mut s, 5_000.0), vec![TimerKind::RoundEnd]);
        assert!(!s.is_armed(TimerKind::RoundEnd));
        assert!(s.is_empty());
    }

    #[test]
    fn test_resubscribe_replaces() {
        let mut s = Scheduler::new();
        s.after(TimerKind::Pulse, 0.0, 100.0);
        s.after(TimerKind::Pulse, 80.0, 100.0);
        assert_eq!(s.len(), 1);
        assert!(drain(&mut s, 150.0).is_empty());
        assert_eq!(drain(&mut s, 180.0), vec![TimerKind::Pulse]);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut s = Scheduler::new();
        s.every(TimerKind::Movement, 0.0, 100.0);
        s.every(TimerKind::Clock, 0.0, 100.0);
        s.every(TimerKind::Rate, 0.0, 50.0);
        s.after(TimerKind::RoundEnd, 0.0, 5_000.0);
        s.clear();
        assert!(s.is_empty());
        assert!(drain(&mut s, 10_000.0).is_empty());
    }
}
