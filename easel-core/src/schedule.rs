//! # Animation scheduling
//! Playing media must be redrawn at its own frame rate, and several media may be playing at once at
//! different rates. Rather than one timer per object, the surface runs a single tick loop whose delays
//! land exactly on every object's frame instants.
//!
//! Each frame rate becomes a frame duration in whole milliseconds. Over one hyperperiod (the LCM of the
//! durations) every duration's multiples are merged into one sorted list of instants, and the gaps
//! between consecutive instants become the repeating cycle of tick delays. A single rate, or rates whose
//! instants are evenly spaced, collapse to a single delay. Pathological rate sets whose cycle would be too
//! long fall back to ticking at the GCD of the durations, which still lands on every instant.

use std::time::Duration;

use smallvec::SmallVec;

use crate::util::{gcd_all, lcm_all};

/// Source of monotonic time, used to measure how long each tick's redraw took.
pub trait Clock: Send {
    /// Time since some fixed, arbitrary origin.
    fn now(&self) -> Duration;
}

/// [`Clock`] backed by [`std::time::Instant`].
#[derive(Copy, Clone, Debug)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}
impl Default for MonotonicClock {
    fn default() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}
impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Whole milliseconds per frame at `fps`, at least one.
#[must_use]
pub fn frame_duration_ms(fps: u32) -> u64 {
    // Result is in 1..=1000
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let ms = (1000.0 / f64::from(fps.max(1))).round() as u64;
    ms.max(1)
}

/// A fixed schedule of tick delays reproducing a set of frame durations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickPlan {
    /// Distinct frame durations in ms, ascending.
    durations: SmallVec<[u64; 4]>,
    granularity: u64,
    /// Delays between ticks in ms, repeated forever.
    cycle: Vec<u64>,
}
impl TickPlan {
    /// Plan for the given frame rates, or `None` if there are no positive rates.
    pub fn new(rates: impl IntoIterator<Item = u32>, max_cycle: usize) -> Option<Self> {
        let mut durations: SmallVec<[u64; 4]> = rates
            .into_iter()
            .filter(|&fps| fps > 0)
            .map(frame_duration_ms)
            .collect();
        durations.sort_unstable();
        durations.dedup();
        let granularity = gcd_all(durations.iter().copied())?;
        let cycle = Self::cycle_for(&durations, granularity, max_cycle.max(1));
        Some(Self {
            durations,
            granularity,
            cycle,
        })
    }
    fn cycle_for(durations: &[u64], granularity: u64, max_cycle: usize) -> Vec<u64> {
        if let [only] = durations {
            return vec![*only];
        }
        let fallback = vec![granularity];
        let Some(hyperperiod) = lcm_all(durations.iter().copied()) else {
            return fallback;
        };
        // Upper bound on the number of distinct instants. Bail before allocating for huge ones.
        let events: u64 = durations.iter().map(|d| hyperperiod / d).sum();
        if events > (max_cycle as u64).saturating_mul(durations.len() as u64) {
            return fallback;
        }
        let mut instants: Vec<u64> = durations
            .iter()
            .flat_map(|&d| (0..hyperperiod).step_by(d as usize))
            .collect();
        instants.sort_unstable();
        instants.dedup();

        let mut gaps: Vec<u64> = instants.windows(2).map(|w| w[1] - w[0]).collect();
        // Wrap around to the start of the next hyperperiod. Instant zero is always present.
        gaps.push(hyperperiod - instants[instants.len() - 1]);

        if gaps.iter().all(|&gap| gap == gaps[0]) {
            vec![gaps[0]]
        } else if gaps.len() > max_cycle {
            fallback
        } else {
            gaps
        }
    }
    #[must_use]
    pub fn durations(&self) -> &[u64] {
        &self.durations
    }
    /// GCD of every duration. Every tick lands on a multiple of this.
    #[must_use]
    pub fn granularity(&self) -> u64 {
        self.granularity
    }
    #[must_use]
    pub fn cycle(&self) -> &[u64] {
        &self.cycle
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::AsRefStr)]
pub enum SchedulerState {
    /// No timer running.
    Idle,
    /// A tick is pending.
    Active,
}

#[derive(Clone, Debug)]
struct Running {
    plan: TickPlan,
    /// Index into the cycle of the next delay.
    cursor: usize,
    /// Position of the most recent tick.
    time_ms: u64,
}
impl Running {
    fn next_gap(&self) -> u64 {
        // Cycles are never empty.
        self.plan.cycle[self.cursor % self.plan.cycle.len()]
    }
}

/// The two-state tick loop.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    running: Option<Running>,
}
impl Scheduler {
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if self.running.is_some() {
            SchedulerState::Active
        } else {
            SchedulerState::Idle
        }
    }
    #[must_use]
    pub fn plan(&self) -> Option<&TickPlan> {
        self.running.as_ref().map(|running| &running.plan)
    }
    /// Position of the most recent tick, in ms since the loop (re)started.
    #[must_use]
    pub fn time_ms(&self) -> Option<u64> {
        self.running.as_ref().map(|running| running.time_ms)
    }
    /// Recompute the plan from the rates of every animating object.
    ///
    /// An unchanged plan keeps its position. A changed plan restarts from tick zero, and no rates at all stops the loop.
    pub fn reloop(&mut self, rates: impl IntoIterator<Item = u32>, max_cycle: usize) {
        let plan = TickPlan::new(rates, max_cycle);
        match (&self.running, plan) {
            (Some(running), Some(plan)) if running.plan == plan => (),
            (_, Some(plan)) => {
                log::debug!(
                    "scheduler active: durations {:?}ms, granularity {}ms, cycle of {}",
                    plan.durations,
                    plan.granularity,
                    plan.cycle.len()
                );
                self.running = Some(Running {
                    plan,
                    cursor: 0,
                    time_ms: 0,
                });
            }
            (Some(_), None) => {
                log::debug!("scheduler idle");
                self.running = None;
            }
            (None, None) => (),
        }
    }
    /// Delay until the next tick, before compensation. `None` when idle.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.running
            .as_ref()
            .map(|running| Duration::from_millis(running.next_gap()))
    }
    /// Move to the next tick, returning its position in ms.
    pub fn advance(&mut self) -> Option<u64> {
        let running = self.running.as_mut()?;
        let gap = running.next_gap();
        running.cursor = (running.cursor + 1) % running.plan.cycle.len();
        running.time_ms = running.time_ms.saturating_add(gap);
        log::trace!("tick at {}ms", running.time_ms);
        Some(running.time_ms)
    }
    /// The next delay, less the time already spent processing the current tick.
    #[must_use]
    pub fn compensated_delay(&self, elapsed: Duration) -> Option<Duration> {
        self.next_delay()
            .map(|delay| delay.saturating_sub(elapsed))
    }
}

/// Does an object animating at `rates` need a redraw at the tick at `time_ms`?
#[must_use]
pub fn is_due(rates: &[u32], time_ms: u64) -> bool {
    rates
        .iter()
        .filter(|&&fps| fps > 0)
        .any(|&fps| time_ms % frame_duration_ms(fps) == 0)
}

#[cfg(test)]
mod test {
    use super::{frame_duration_ms, is_due, Scheduler, SchedulerState, TickPlan};
    use std::time::Duration;

    #[test]
    fn durations_rounded() {
        assert_eq!(frame_duration_ms(24), 42);
        assert_eq!(frame_duration_ms(30), 33);
        assert_eq!(frame_duration_ms(60), 17);
        assert_eq!(frame_duration_ms(5000), 1);
        assert_eq!(frame_duration_ms(0), 1000);
    }
    #[test]
    fn twenty_four_and_thirty() {
        let plan = TickPlan::new([24, 30, 24], 256).unwrap();
        assert_eq!(plan.durations(), &[33, 42]);
        assert_eq!(plan.granularity(), 3);
        // 14 + 11 instants in 462ms, sharing zero.
        assert_eq!(plan.cycle().len(), 24);
        assert_eq!(plan.cycle().iter().sum::<u64>(), 462);
        assert_eq!(plan.cycle()[0], 33);
        assert!(plan.cycle().iter().all(|gap| gap % 3 == 0));
    }
    #[test]
    fn even_rates_collapse() {
        let plan = TickPlan::new([30], 256).unwrap();
        assert_eq!(plan.cycle(), &[33]);
        // 10ms and 20ms instants are all 10ms apart.
        let plan = TickPlan::new([100, 50], 256).unwrap();
        assert_eq!(plan.cycle(), &[10]);
    }
    #[test]
    fn long_cycles_fall_back() {
        let plan = TickPlan::new([7, 11, 13, 17, 19, 23], 256).unwrap();
        assert_eq!(plan.cycle(), &[plan.granularity()]);
        let plan = TickPlan::new([24, 30], 4).unwrap();
        assert_eq!(plan.cycle(), &[3]);
    }
    #[test]
    fn no_rates() {
        assert_eq!(TickPlan::new([], 256), None);
        assert_eq!(TickPlan::new([0, 0], 256), None);
    }
    #[test]
    fn state_machine() {
        let mut scheduler = Scheduler::default();
        assert_eq!(scheduler.state(), SchedulerState::Idle);
        assert_eq!(scheduler.advance(), None);
        assert_eq!(scheduler.next_delay(), None);

        scheduler.reloop([24, 30], 256);
        assert_eq!(scheduler.state(), SchedulerState::Active);
        assert_eq!(scheduler.next_delay(), Some(Duration::from_millis(33)));
        assert_eq!(scheduler.advance(), Some(33));
        assert_eq!(scheduler.advance(), Some(42));

        // Same plan, same position.
        scheduler.reloop([30, 24], 256);
        assert_eq!(scheduler.time_ms(), Some(42));
        // New plan restarts.
        scheduler.reloop([30], 256);
        assert_eq!(scheduler.time_ms(), Some(0));

        scheduler.reloop([], 256);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }
    #[test]
    fn compensation_saturates() {
        let mut scheduler = Scheduler::default();
        scheduler.reloop([30], 256);
        assert_eq!(
            scheduler.compensated_delay(Duration::from_millis(5)),
            Some(Duration::from_millis(28))
        );
        assert_eq!(
            scheduler.compensated_delay(Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }
    #[test]
    fn due_objects() {
        assert!(is_due(&[30], 33));
        assert!(!is_due(&[24], 33));
        assert!(is_due(&[24, 30], 66));
        assert!(!is_due(&[], 0));
    }
}
