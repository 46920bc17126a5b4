use crate::grid::Coord;
use crate::params::IncubationDays;
use crate::random::RandomSource;
use serde::{Deserialize, Serialize};

/// Health state of an agent.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum HealthState {
    Receptive,
    Exposed,
    Infected,
    Recovered,
    Deceased,
}

impl HealthState {
    /// Exposed and Infected agents spread the disease.
    pub fn is_infectious(self) -> bool {
        matches!(self, Self::Exposed | Self::Infected)
    }
}

/// Agent occupying one grid cell.
///
/// `state` only changes inside [`Agent::evaluate_new_state`]. Infection
/// proposals write `next_state`, and are committed at the next evaluation.
#[derive(Debug, Clone, Copy)]
pub struct Agent {
    coord: Coord,
    state: HealthState,
    next_state: HealthState,
    days_in_current_state: u32,
    isolating: bool,
}

impl Agent {
    /// Create a Receptive agent at `coord`.
    pub fn new(coord: Coord) -> Self {
        Self {
            coord,
            state: HealthState::Receptive,
            next_state: HealthState::Receptive,
            days_in_current_state: 0,
            isolating: false,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn state(&self) -> HealthState {
        self.state
    }

    pub fn next_state(&self) -> HealthState {
        self.next_state
    }

    pub fn days_in_current_state(&self) -> u32 {
        self.days_in_current_state
    }

    pub fn isolating(&self) -> bool {
        self.isolating
    }

    pub fn is_receptive(&self) -> bool {
        self.state == HealthState::Receptive
    }

    pub fn is_recovered(&self) -> bool {
        self.state == HealthState::Recovered
    }

    pub fn is_infectious(&self) -> bool {
        self.state.is_infectious()
    }

    /// Freeze the current state as the pending one for this day.
    pub fn start_day(&mut self) {
        self.next_state = self.state;
    }

    /// Propose a new state to be committed at the next evaluation.
    pub fn propose_infection(&mut self) {
        self.next_state = HealthState::Exposed;
    }

    fn commit_state(&mut self) {
        self.state = self.next_state;
        self.days_in_current_state = 0;
    }

    /// Advance the state machine by one day.
    pub fn evaluate_new_state<R: RandomSource>(
        &mut self,
        incubation: IncubationDays,
        symptomatic_days: u32,
        death_rate: f64,
        isolation_rate: f64,
        rng: &mut R,
    ) {
        if self.next_state != self.state {
            self.commit_state();
            return;
        }

        self.days_in_current_state += 1;

        match self.state {
            HealthState::Exposed => {
                if self.days_in_current_state >= incubation.draw(rng) {
                    self.state = HealthState::Infected;
                    self.days_in_current_state = 0;
                    self.isolating = rng.uniform01() < isolation_rate;
                }
            }
            HealthState::Infected => {
                if self.days_in_current_state >= symptomatic_days {
                    self.state = if rng.uniform01() < death_rate {
                        HealthState::Deceased
                    } else {
                        HealthState::Recovered
                    };
                    self.days_in_current_state = 0;
                    self.isolating = false;
                }
            }
            HealthState::Receptive | HealthState::Recovered | HealthState::Deceased => {}
        }
        self.next_state = self.state;
    }

    /// Try to expose `target` through one contact with this agent.
    ///
    /// Only `target.next_state` is written, so the target's current state is
    /// unaffected until it is committed.
    pub fn try_infect<R: RandomSource>(
        &self,
        target: &mut Agent,
        transmission_prob: f64,
        re_infection_rate: f64,
        rng: &mut R,
    ) {
        if !self.is_infectious() {
            return;
        }
        if target.is_receptive() && rng.uniform01() < transmission_prob {
            target.propose_infection();
        } else if target.is_recovered() && rng.uniform01() < re_infection_rate {
            target.propose_infection();
        }
    }
}
