use crate::engine::Engine;
use crate::params::SimulationParameters;
use crate::random::RandomSource;
use crate::stats::Statistic;
use anyhow::{Context, Result};
use serde::Serialize;
use std::{
    thread,
    time::{Duration, Instant},
};

/// Outcome of a scheduled run.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct RunReport {
    /// Days simulated by this run.
    pub days: u32,
    /// Ticks dropped because a step overran its deadline.
    pub skipped_ticks: u64,
    /// The epidemic died out.
    pub ended: bool,
}

/// Tick source driving an [`Engine`].
///
/// Each tick calls [`Engine::step`] synchronously, so steps never overlap.
/// Ticks missed while a step was running are skipped, not queued.
pub struct Scheduler {
    period: Option<Duration>,
    max_days: u32,
}

impl Scheduler {
    /// Create a scheduler running at most `max_days` days.
    ///
    /// A non-positive `steps_per_second` disables pacing.
    ///
    /// # Errors
    /// Returns an error if the tick period does not fit a [`Duration`].
    pub fn new(steps_per_second: f64, max_days: u32) -> Result<Self> {
        let period = if steps_per_second > 0.0 {
            let period = Duration::try_from_secs_f64(1.0 / steps_per_second).with_context(
                || format!("invalid tick period for {steps_per_second} steps per second"),
            )?;
            Some(period)
        } else {
            None
        };
        Ok(Self { period, max_days })
    }

    /// Perform exactly one step, unless the run is already over.
    pub fn single_step<R: RandomSource>(
        &self,
        engine: &mut Engine<R>,
        params: &SimulationParameters,
    ) -> Option<Statistic> {
        if engine.is_ended() || engine.day() >= self.max_days {
            return None;
        }
        Some(engine.step(params))
    }

    /// Step until the epidemic ends or `max_days` is reached.
    ///
    /// `on_step` observes every new statistic.
    pub fn run<R, F>(
        &self,
        engine: &mut Engine<R>,
        params: &SimulationParameters,
        mut on_step: F,
    ) -> RunReport
    where
        R: RandomSource,
        F: FnMut(&Statistic),
    {
        let start_day = engine.day();
        let mut skipped_ticks = 0;
        let mut next_tick = Instant::now();

        while !engine.is_ended() && engine.day() < self.max_days {
            if let Some(period) = self.period {
                let now = Instant::now();
                if next_tick > now {
                    thread::sleep(next_tick - now);
                }
                next_tick += period;
            }

            let stat = engine.step(params);
            on_step(&stat);

            if let Some(period) = self.period {
                let missed = count_missed(next_tick, Instant::now(), period);
                if missed > 0 {
                    log::debug!("step overran, skipping {missed} ticks");
                    skipped_ticks += missed;
                    next_tick += period * missed as u32;
                }
            }
        }

        RunReport {
            days: engine.day() - start_day,
            skipped_ticks,
            ended: engine.is_ended(),
        }
    }
}

/// Number of whole tick deadlines already elapsed at `now`.
fn count_missed(next_tick: Instant, now: Instant, period: Duration) -> u64 {
    if now <= next_tick || period.is_zero() {
        return 0;
    }
    let late = now - next_tick;
    (late.as_nanos() / period.as_nanos()) as u64 + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ChaChaSource;

    #[test]
    fn stops_at_max_days() {
        let params = SimulationParameters {
            transmission_probability: 1.0,
            symptomatic_days: 1000,
            ..Default::default()
        };
        let mut engine = Engine::new(11, 11, None, ChaChaSource::from_seed(1)).unwrap();
        let scheduler = Scheduler::new(0.0, 5).unwrap();

        let mut days = Vec::new();
        let report = scheduler.run(&mut engine, &params, |stat| days.push(stat.day));
        assert_eq!(report.days, 5);
        assert!(!report.ended);
        assert_eq!(report.skipped_ticks, 0);
        assert_eq!(days, vec![1, 2, 3, 4, 5]);
        assert!(scheduler.single_step(&mut engine, &params).is_none());
    }

    #[test]
    fn stops_when_epidemic_ends() {
        let params = SimulationParameters {
            transmission_probability: 0.0,
            ..Default::default()
        };
        let mut engine = Engine::new(5, 5, None, ChaChaSource::from_seed(2)).unwrap();
        let report = Scheduler::new(0.0, 1000).unwrap().run(&mut engine, &params, |_| {});
        assert!(report.ended);
        assert!(report.days < 1000);
        assert_eq!(engine.latest().infectious, 0);
    }

    #[test]
    fn single_step_advances_one_day() {
        let params = SimulationParameters::default();
        let mut engine = Engine::new(5, 5, None, ChaChaSource::from_seed(3)).unwrap();
        let stat = Scheduler::new(0.0, 10).unwrap().single_step(&mut engine, &params);
        assert_eq!(stat.map(|stat| stat.day), Some(1));
        assert_eq!(engine.day(), 1);
    }

    #[test]
    fn rejects_unrepresentable_period() {
        assert!(Scheduler::new(1e-20, 10).is_err());
        assert!(Scheduler::new(f64::MIN_POSITIVE, 10).is_err());

        let scheduler = Scheduler::new(0.5, 10).unwrap();
        assert_eq!(scheduler.period, Some(Duration::from_secs(2)));
        assert!(Scheduler::new(1e-3, 10).unwrap().period.is_some());
        assert_eq!(Scheduler::new(-1.0, 10).unwrap().period, None);
    }

    #[test]
    fn counts_missed_ticks() {
        let start = Instant::now();
        let period = Duration::from_millis(10);
        assert_eq!(count_missed(start + period, start, period), 0);
        assert_eq!(count_missed(start, start + Duration::from_millis(5), period), 1);
        assert_eq!(count_missed(start, start + Duration::from_millis(25), period), 3);
    }
}
