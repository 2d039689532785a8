//! Tick scheduling capability
//!
//! The simulations own the logical tick (`step`) but never the timing
//! mechanism. A host event loop implements [`Scheduler`]; [`ManualScheduler`]
//! is the portable fixed-timestep implementation used headless and in tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Duration;

use crate::consts::MAX_SUBSTEPS;

/// Identifies one repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

pub trait Scheduler {
    /// Start a repeating timer; the first fire is one `interval` from now
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle;
    /// Stop a timer. Unknown or already-cancelled handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

impl<T: Scheduler> Scheduler for Rc<RefCell<T>> {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        self.borrow_mut().schedule_repeating(interval)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.borrow_mut().cancel(handle)
    }
}

#[derive(Debug, Clone)]
struct Timer {
    interval: Duration,
    accumulator: Duration,
}

/// Accumulator-driven scheduler advanced explicitly by the host
#[derive(Debug, Default)]
pub struct ManualScheduler {
    timers: BTreeMap<TimerHandle, Timer>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    pub fn interval(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers.get(&handle).map(|t| t.interval)
    }

    pub fn live_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance wall time and return every fire that became due, in handle order.
    ///
    /// Each timer fires at most `MAX_SUBSTEPS` times per call; any backlog
    /// beyond that is dropped so a stalled host cannot spiral.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for (handle, timer) in self.timers.iter_mut() {
            timer.accumulator += elapsed;
            let mut substeps = 0;
            while timer.accumulator >= timer.interval && substeps < MAX_SUBSTEPS {
                timer.accumulator -= timer.interval;
                fired.push(*handle);
                substeps += 1;
            }
            if substeps == MAX_SUBSTEPS && timer.accumulator >= timer.interval {
                log::debug!("Timer {} dropped backlog", handle.0);
                timer.accumulator = Duration::ZERO;
            }
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, interval: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        // A zero interval would fire forever within one advance
        let interval = interval.max(Duration::from_micros(1));
        self.timers.insert(
            handle,
            Timer {
                interval,
                accumulator: Duration::ZERO,
            },
        );
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.remove(&handle);
    }
}

/// One simulation's periodic tick: its interval and the live timer, if any
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    handle: Option<TimerHandle>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn handle(&self) -> Option<TimerHandle> {
        self.handle
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start ticking; a no-op when already running
    pub fn start(&mut self, scheduler: &mut dyn Scheduler) {
        if self.handle.is_none() {
            self.handle = Some(scheduler.schedule_repeating(self.interval));
        }
    }

    pub fn stop(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
        }
    }

    /// Change the interval. A running timer is swapped for one at the new
    /// interval inside this call; a stopped ticker stays stopped.
    pub fn set_interval(&mut self, interval: Duration, scheduler: &mut dyn Scheduler) {
        self.interval = interval;
        if let Some(handle) = self.handle.take() {
            scheduler.cancel(handle);
            self.handle = Some(scheduler.schedule_repeating(interval));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_interval() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(120));

        assert!(scheduler.advance(Duration::from_millis(100)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(20)), vec![handle]);
        assert_eq!(
            scheduler.advance(Duration::from_millis(240)),
            vec![handle, handle]
        );
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(10));
        scheduler.cancel(handle);
        assert!(!scheduler.is_live(handle));
        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
        // Cancelling twice is harmless
        scheduler.cancel(handle);
    }

    #[test]
    fn test_backlog_is_capped() {
        let mut scheduler = ManualScheduler::new();
        let handle = scheduler.schedule_repeating(Duration::from_millis(10));
        let fired = scheduler.advance(Duration::from_secs(10));
        assert_eq!(fired.len(), MAX_SUBSTEPS as usize);
        assert!(fired.iter().all(|h| *h == handle));
        // Backlog dropped: the next short advance does not burst
        assert!(scheduler.advance(Duration::from_millis(5)).is_empty());
    }

    #[test]
    fn test_handles_are_unique() {
        let mut scheduler = ManualScheduler::new();
        let a = scheduler.schedule_repeating(Duration::from_millis(10));
        let b = scheduler.schedule_repeating(Duration::from_millis(10));
        assert_ne!(a, b);
        assert_eq!(scheduler.live_count(), 2);
        assert_eq!(scheduler.interval(b), Some(Duration::from_millis(10)));
    }

    #[test]
    fn test_ticker_reschedule_keeps_running() {
        let mut scheduler = ManualScheduler::new();
        let mut ticker = Ticker::new(Duration::from_millis(120));
        ticker.start(&mut scheduler);
        let first = ticker.handle().unwrap();

        ticker.set_interval(Duration::from_millis(105), &mut scheduler);
        let second = ticker.handle().unwrap();
        assert_ne!(first, second);
        assert!(!scheduler.is_live(first));
        assert_eq!(scheduler.interval(second), Some(Duration::from_millis(105)));
        assert_eq!(scheduler.live_count(), 1);
    }

    #[test]
    fn test_ticker_stopped_stays_stopped() {
        let mut scheduler = ManualScheduler::new();
        let mut ticker = Ticker::new(Duration::from_millis(120));
        ticker.set_interval(Duration::from_millis(60), &mut scheduler);
        assert!(!ticker.is_running());
        assert_eq!(scheduler.live_count(), 0);

        ticker.start(&mut scheduler);
        ticker.start(&mut scheduler);
        assert_eq!(scheduler.live_count(), 1);
        ticker.stop(&mut scheduler);
        assert!(!ticker.is_running());
        assert_eq!(scheduler.live_count(), 0);
    }
}
