use crate::grid::{Coord, Grid};
use crate::model::Agent;
use crate::params::SimulationParameters;
use crate::random::{ChaChaSource, RandomSource};
use crate::sampler::ContactSampler;
use crate::stats::{Census, Statistic, StatisticsLog};
use anyhow::{Context, Result};

/// Transmission factor applied to isolating agents.
const ISOLATION_FACTOR: f64 = 0.1;

/// Simulation engine.
///
/// Owns the grid, the statistics log and the random source, and advances the
/// whole grid one day per [`Engine::step`]. Between calls the state is always
/// consistent, so a run can be paused and resumed at any point.
pub struct Engine<R: RandomSource = ChaChaSource> {
    grid: Grid,
    log: StatisticsLog,
    rng: R,
    ended: bool,
}

impl<R: RandomSource> Engine<R> {
    /// Create an engine on a fresh `rows x cols` grid.
    ///
    /// Patient zero defaults to the center cell.
    pub fn new(
        rows: usize,
        cols: usize,
        patient_zero: Option<&[Coord]>,
        mut rng: R,
    ) -> Result<Self> {
        let grid = init_grid(rows, cols, patient_zero, &mut rng)?;
        let log = StatisticsLog::new(census(&grid));
        Ok(Self {
            grid,
            log,
            rng,
            ended: false,
        })
    }

    /// Discard the grid and the log and rebuild both.
    ///
    /// Returns the new day zero statistic.
    pub fn reset(&mut self, patient_zero: Option<&[Coord]>) -> Result<Statistic> {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        self.grid = init_grid(rows, cols, patient_zero, &mut self.rng)?;
        self.log = StatisticsLog::new(census(&self.grid));
        self.ended = false;
        log::debug!("reset {rows}x{cols} grid");
        Ok(self.log.latest())
    }

    /// Simulate one day and return its statistic.
    pub fn step(&mut self, params: &SimulationParameters) -> Statistic {
        // Freeze the state each agent starts the day in.
        self.grid.iter_mut().for_each(Agent::start_day);

        // Let infectious agents propose infections to their contacts.
        self.spread_contagion(params);

        // Commit proposals, advance durations and count states.
        let mut census = Census::default();
        for agt in self.grid.iter_mut() {
            agt.evaluate_new_state(
                params.incubation_days,
                params.symptomatic_days,
                params.death_rate,
                params.isolation_rate_symptomatic,
                &mut self.rng,
            );
            census.add(agt.state());
        }

        let stat = self.log.push(census);
        self.ended = stat.infectious == 0;
        stat
    }

    fn spread_contagion(&mut self, params: &SimulationParameters) {
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let origin = Coord::new(row, col);
                // States are frozen during this pass, so a copy stays accurate.
                let src = *self.grid.agent(origin);
                if !src.is_infectious() {
                    continue;
                }

                let transmission_prob = transmission_probability(&src, params);
                let contacts = ContactSampler::new(&self.grid).sample(
                    origin,
                    params.movement_radius,
                    params.number_of_contacts,
                    &mut self.rng,
                );
                for contact in contacts {
                    src.try_infect(
                        self.grid.agent_mut(contact),
                        transmission_prob,
                        params.re_infection_rate,
                        &mut self.rng,
                    );
                }
            }
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn statistics(&self) -> &StatisticsLog {
        &self.log
    }

    pub fn latest(&self) -> Statistic {
        self.log.latest()
    }

    pub fn day(&self) -> u32 {
        self.log.latest().day
    }

    /// True once a step leaves no infectious agent.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

fn init_grid<R: RandomSource>(
    rows: usize,
    cols: usize,
    patient_zero: Option<&[Coord]>,
    rng: &mut R,
) -> Result<Grid> {
    let center = [Coord::new(rows / 2, cols / 2)];
    let patient_zero = patient_zero.unwrap_or(&center[..]);
    Grid::initialize(rows, cols, patient_zero, rng).context("failed to initialize grid")
}

fn census(grid: &Grid) -> Census {
    grid.iter().map(Agent::state).collect()
}

fn transmission_probability(agt: &Agent, params: &SimulationParameters) -> f64 {
    if agt.isolating() {
        params.transmission_probability * ISOLATION_FACTOR
    } else {
        params.transmission_probability
    }
}
