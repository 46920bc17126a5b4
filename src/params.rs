use crate::random::RandomSource;
use crate::utils::check_num;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Incubation duration, either fixed or drawn from an inclusive range.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncubationDays {
    /// Fixed number of days.
    Fixed(u32),
    /// Inclusive `[min, max]` range, drawn anew at every evaluation.
    Range(u32, u32),
}

impl IncubationDays {
    /// Effective incubation length for one evaluation.
    pub fn draw<R: RandomSource>(&self, rng: &mut R) -> u32 {
        match *self {
            Self::Fixed(days) => days,
            Self::Range(min, max) => rng.uniform_int(min as i64, max as i64) as u32,
        }
    }
}

/// Epidemic parameters applied to one simulation step.
///
/// The engine does not check these values; call [`SimulationParameters::validate`]
/// before handing them to a run.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParameters {
    /// Days spent Exposed before becoming Infected.
    pub incubation_days: IncubationDays,
    /// Days spent Infected before recovering or dying.
    pub symptomatic_days: u32,
    /// Probability of isolating on becoming Infected.
    pub isolation_rate_symptomatic: f64,
    /// Probability that one contact with a Receptive agent exposes it.
    pub transmission_probability: f64,
    /// Probability that an Infected agent dies at the end of its illness.
    pub death_rate: f64,
    /// Probability that one contact with a Recovered agent exposes it again.
    pub re_infection_rate: f64,
    /// Half-width of the contact sampling window.
    pub movement_radius: u32,
    /// Contacts sampled per infectious agent per day.
    pub number_of_contacts: u32,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            incubation_days: IncubationDays::Range(2, 4),
            symptomatic_days: 2,
            isolation_rate_symptomatic: 0.0,
            transmission_probability: 0.35,
            death_rate: 0.15,
            re_infection_rate: 0.0,
            movement_radius: 1,
            number_of_contacts: 4,
        }
    }
}

impl SimulationParameters {
    pub fn validate(&self) -> Result<()> {
        if let IncubationDays::Range(min, max) = self.incubation_days {
            if min > max {
                bail!("incubation range minimum {min} exceeds maximum {max}");
            }
        }

        check_num(self.isolation_rate_symptomatic, 0.0..=1.0)
            .context("invalid isolation rate")?;
        check_num(self.transmission_probability, 0.0..=1.0)
            .context("invalid transmission probability")?;
        check_num(self.death_rate, 0.0..=1.0).context("invalid death rate")?;
        check_num(self.re_infection_rate, 0.0..=1.0).context("invalid reinfection rate")?;

        Ok(())
    }
}
