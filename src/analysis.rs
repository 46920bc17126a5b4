use crate::stats::{Accumulator, AccumulatorReport, StatisticsLog};
use std::collections::BTreeMap;

/// Observable measured once per finished run.
pub trait Obs {
    fn name(&self) -> &'static str;
    fn update(&mut self, log: &StatisticsLog);
    fn report(&self) -> AccumulatorReport;
}

pub struct PeakInfectious {
    acc: Accumulator,
}

impl Obs for PeakInfectious {
    fn name(&self) -> &'static str {
        "peak_infectious"
    }

    fn update(&mut self, log: &StatisticsLog) {
        let peak = log.iter().map(|stat| stat.infectious).max().unwrap_or(0);
        self.acc.add(peak as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

pub struct PeakDay {
    acc: Accumulator,
}

impl Obs for PeakDay {
    fn name(&self) -> &'static str {
        "peak_day"
    }

    fn update(&mut self, log: &StatisticsLog) {
        // First day reaching the peak.
        let peak = log
            .entries()
            .iter()
            .rev()
            .max_by_key(|stat| stat.infectious)
            .map_or(0, |stat| stat.day);
        self.acc.add(peak as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

pub struct FinalRecovered {
    acc: Accumulator,
}

impl Obs for FinalRecovered {
    fn name(&self) -> &'static str {
        "final_recovered"
    }

    fn update(&mut self, log: &StatisticsLog) {
        self.acc.add(log.latest().recovered as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

pub struct FinalDeceased {
    acc: Accumulator,
}

impl Obs for FinalDeceased {
    fn name(&self) -> &'static str {
        "final_deceased"
    }

    fn update(&mut self, log: &StatisticsLog) {
        self.acc.add(log.latest().deceased as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

pub struct EpidemicDuration {
    acc: Accumulator,
}

impl Obs for EpidemicDuration {
    fn name(&self) -> &'static str {
        "duration"
    }

    fn update(&mut self, log: &StatisticsLog) {
        self.acc.add(log.latest().day as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

/// Fraction of agents that left the healthy state.
pub struct AttackRate {
    acc: Accumulator,
}

impl Obs for AttackRate {
    fn name(&self) -> &'static str {
        "attack_rate"
    }

    fn update(&mut self, log: &StatisticsLog) {
        let last = log.latest();
        let n_agt = last.total();
        if n_agt == 0 {
            return;
        }
        self.acc.add((n_agt - last.healthy) as f64 / n_agt as f64);
    }

    fn report(&self) -> AccumulatorReport {
        self.acc.report()
    }
}

/// Aggregates observables over replicate runs.
pub struct Analyzer {
    n_runs: usize,
    obs_ptr_vec: Vec<Box<dyn Obs>>,
}

impl Analyzer {
    pub fn new() -> Self {
        let obs_ptr_vec: Vec<Box<dyn Obs>> = vec![
            Box::new(PeakInfectious {
                acc: Accumulator::new(),
            }),
            Box::new(PeakDay {
                acc: Accumulator::new(),
            }),
            Box::new(FinalRecovered {
                acc: Accumulator::new(),
            }),
            Box::new(FinalDeceased {
                acc: Accumulator::new(),
            }),
            Box::new(EpidemicDuration {
                acc: Accumulator::new(),
            }),
            Box::new(AttackRate {
                acc: Accumulator::new(),
            }),
        ];
        Self {
            n_runs: 0,
            obs_ptr_vec,
        }
    }

    pub fn add_run(&mut self, log: &StatisticsLog) {
        self.n_runs += 1;
        for obs in &mut self.obs_ptr_vec {
            obs.update(log);
        }
    }

    pub fn n_runs(&self) -> usize {
        self.n_runs
    }

    pub fn report(&self) -> BTreeMap<&'static str, AccumulatorReport> {
        self.obs_ptr_vec
            .iter()
            .map(|obs| (obs.name(), obs.report()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Census;

    fn log_of(census_vec: &[(usize, usize, usize, usize)]) -> StatisticsLog {
        let census = |&(infectious, recovered, deceased, healthy): &(usize, usize, usize, usize)| {
            Census {
                infectious,
                recovered,
                deceased,
                healthy,
            }
        };
        let mut log = StatisticsLog::new(census(&census_vec[0]));
        for entry in &census_vec[1..] {
            log.push(census(entry));
        }
        log
    }

    #[test]
    fn reports_each_observable() {
        let mut analyzer = Analyzer::new();
        analyzer.add_run(&log_of(&[(1, 0, 0, 9), (4, 0, 0, 6), (4, 1, 0, 5), (0, 4, 1, 5)]));
        analyzer.add_run(&log_of(&[(1, 0, 0, 9), (2, 0, 0, 8), (0, 2, 0, 8)]));
        assert_eq!(analyzer.n_runs(), 2);

        let report = analyzer.report();
        assert_eq!(report["peak_infectious"].mean, 3.0);
        assert_eq!(report["peak_day"].mean, 1.0);
        assert_eq!(report["final_recovered"].mean, 3.0);
        assert_eq!(report["final_deceased"].mean, 0.5);
        assert_eq!(report["duration"].mean, 2.5);
        assert!((report["attack_rate"].mean - 0.35).abs() < 1e-12);
    }
}
