use crate::model::HealthState;
use serde::{Deserialize, Serialize};

/// Number of agents per summarized health state.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Census {
    pub infectious: usize,
    pub recovered: usize,
    pub deceased: usize,
    pub healthy: usize,
}

impl Census {
    pub fn add(&mut self, state: HealthState) {
        match state {
            HealthState::Exposed | HealthState::Infected => self.infectious += 1,
            HealthState::Recovered => self.recovered += 1,
            HealthState::Deceased => self.deceased += 1,
            HealthState::Receptive => self.healthy += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.infectious + self.recovered + self.deceased + self.healthy
    }
}

impl FromIterator<HealthState> for Census {
    fn from_iter<I: IntoIterator<Item = HealthState>>(iter: I) -> Self {
        let mut census = Self::default();
        iter.into_iter().for_each(|state| census.add(state));
        census
    }
}

/// Change of each count with respect to the previous day.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct StatisticDelta {
    pub infectious: i64,
    pub recovered: i64,
    pub deceased: i64,
    pub healthy: i64,
}

/// Summary of the grid at the end of one day.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub struct Statistic {
    pub day: u32,
    /// Exposed and Infected agents.
    pub infectious: usize,
    pub recovered: usize,
    pub deceased: usize,
    /// Receptive agents.
    pub healthy: usize,
    /// Absent for the first day of a log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<StatisticDelta>,
}

impl Statistic {
    pub fn total(&self) -> usize {
        self.infectious + self.recovered + self.deceased + self.healthy
    }
}

fn diff(new: usize, old: usize) -> i64 {
    new as i64 - old as i64
}

/// Append-only sequence of daily statistics, starting at day zero.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsLog {
    stat_vec: Vec<Statistic>,
}

impl StatisticsLog {
    /// Start a log with the day zero census.
    pub fn new(census: Census) -> Self {
        let first = Statistic {
            day: 0,
            infectious: census.infectious,
            recovered: census.recovered,
            deceased: census.deceased,
            healthy: census.healthy,
            delta: None,
        };
        Self {
            stat_vec: vec![first],
        }
    }

    /// Append the census of the next day and return its statistic.
    pub fn push(&mut self, census: Census) -> Statistic {
        let prev = self.latest();
        let stat = Statistic {
            day: prev.day + 1,
            infectious: census.infectious,
            recovered: census.recovered,
            deceased: census.deceased,
            healthy: census.healthy,
            delta: Some(StatisticDelta {
                infectious: diff(census.infectious, prev.infectious),
                recovered: diff(census.recovered, prev.recovered),
                deceased: diff(census.deceased, prev.deceased),
                healthy: diff(census.healthy, prev.healthy),
            }),
        };
        self.stat_vec.push(stat);
        stat
    }

    pub fn latest(&self) -> Statistic {
        // The log always holds the day zero entry.
        self.stat_vec[self.stat_vec.len() - 1]
    }

    pub fn entries(&self) -> &[Statistic] {
        &self.stat_vec
    }

    pub fn len(&self) -> usize {
        self.stat_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stat_vec.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Statistic> {
        self.stat_vec.iter()
    }
}

/// Online mean and variance (Welford).
pub struct Accumulator {
    n_vals: usize,
    mean: f64,
    diff_2_sum: f64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct AccumulatorReport {
    pub mean: f64,
    pub std_dev: f64,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            n_vals: 0,
            mean: 0.0,
            diff_2_sum: 0.0,
        }
    }

    pub fn add(&mut self, val: f64) {
        self.n_vals += 1;

        let diff_a = val - self.mean;
        self.mean += diff_a / self.n_vals as f64;

        let diff_b = val - self.mean;
        self.diff_2_sum += diff_a * diff_b;
    }

    pub fn report(&self) -> AccumulatorReport {
        AccumulatorReport {
            mean: if self.n_vals > 0 { self.mean } else { f64::NAN },
            std_dev: if self.n_vals > 1 {
                (self.diff_2_sum / (self.n_vals as f64 - 1.0)).sqrt()
            } else {
                f64::NAN
            },
        }
    }
}
