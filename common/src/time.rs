use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    time::{Duration, Instant},
};

pub const TICK_RATE: f32 = 60.0;
pub const TICK_SECS: f32 = 1.0 / 60.0;
pub const TICK: Duration = Duration::from_micros(16667);

/// A monotonic time source. Readings are offsets from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    DismissMessage,
    ReturnToMenu,
}

/// Handed to the timer service and back again when it fires. `generation`
/// identifies the session that scheduled it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerTicket {
    pub generation: u64,
    pub action: DeferredAction,
}

pub trait TimerService {
    fn schedule_after(&mut self, delay: Duration, ticket: TimerTicket);
}

#[derive(Debug, Default)]
struct TimerQueue {
    now: Duration,
    pending: Vec<(Duration, TimerTicket)>,
}

/// Timers driven by the host's tick. Clones share one queue, so a host can
/// keep a handle while the session owns another.
#[derive(Clone, Debug, Default)]
pub struct TickTimers {
    queue: Rc<RefCell<TimerQueue>>,
}

impl TickTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward and returns the tickets that came due, earliest
    /// first. Tickets due at the same moment keep their scheduling order.
    pub fn advance(&self, by: Duration) -> Vec<TimerTicket> {
        let mut queue = self.queue.borrow_mut();
        queue.now += by;
        let now = queue.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            queue.pending.drain(..).partition(|(at, _)| *at <= now);
        queue.pending = pending;

        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, ticket)| ticket).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().pending.len()
    }
}

impl TimerService for TickTimers {
    fn schedule_after(&mut self, delay: Duration, ticket: TimerTicket) {
        let mut queue = self.queue.borrow_mut();
        let at = queue.now + delay;
        queue.pending.push((at, ticket));
    }
}

/// Formats as whole minutes plus fractional seconds, e.g. `2 min 5.25 s`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let minutes = elapsed.as_secs() / 60;
    let seconds = elapsed.as_secs_f64() - (minutes * 60) as f64;
    format!("{} min {:.2} s", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket(generation: u64, action: DeferredAction) -> TimerTicket {
        TimerTicket { generation, action }
    }

    #[test]
    fn timers_fire_once_their_delay_has_passed() {
        let mut timers = TickTimers::new();
        timers.schedule_after(
            Duration::from_secs(2),
            ticket(1, DeferredAction::DismissMessage),
        );

        assert!(timers.advance(Duration::from_millis(1999)).is_empty());
        assert_eq!(
            timers.advance(Duration::from_millis(1)),
            vec![ticket(1, DeferredAction::DismissMessage)]
        );
        assert!(timers.advance(Duration::from_secs(10)).is_empty());
        assert_eq!(timers.pending(), 0);
    }

    #[test]
    fn due_timers_come_out_earliest_first() {
        let mut timers = TickTimers::new();
        timers.schedule_after(Duration::from_secs(3), ticket(1, DeferredAction::ReturnToMenu));
        timers.schedule_after(
            Duration::from_secs(1),
            ticket(1, DeferredAction::DismissMessage),
        );
        timers.schedule_after(Duration::from_secs(3), ticket(2, DeferredAction::ReturnToMenu));

        assert_eq!(
            timers.advance(Duration::from_secs(5)),
            vec![
                ticket(1, DeferredAction::DismissMessage),
                ticket(1, DeferredAction::ReturnToMenu),
                ticket(2, DeferredAction::ReturnToMenu),
            ]
        );
    }

    #[test]
    fn clones_share_the_queue() {
        let timers = TickTimers::new();
        let mut handle = timers.clone();
        handle.schedule_after(Duration::ZERO, ticket(4, DeferredAction::DismissMessage));

        assert_eq!(timers.pending(), 1);
        assert_eq!(timers.advance(Duration::ZERO).len(), 1);
    }

    #[test]
    fn manual_clock_moves_only_when_advanced() {
        let clock = ManualClock::new();
        let shared = clock.clone();

        assert_eq!(clock.now(), Duration::ZERO);
        shared.advance(Duration::from_millis(1500));
        assert_eq!(clock.now(), Duration::from_millis(1500));
    }

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn elapsed_is_minutes_and_fractional_seconds() {
        assert_eq!(format_elapsed(Duration::from_millis(125_250)), "2 min 5.25 s");
        assert_eq!(format_elapsed(Duration::from_millis(61_500)), "1 min 1.50 s");
        assert_eq!(format_elapsed(Duration::ZERO), "0 min 0.00 s");
    }
}
