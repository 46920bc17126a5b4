use crate::model::{Agent, HealthState};
use crate::params::IncubationDays;
use crate::random::RandomSource;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// Position of a grid cell.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for (usize, usize) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

/// Dense `rows x cols` array of agents.
///
/// Dimensions are fixed at construction and every cell holds exactly one agent.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    agt_vec: Vec<Agent>,
}

impl Grid {
    /// Create a grid of Receptive agents.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            bail!("grid dimensions must be positive, but are {rows}x{cols}");
        }
        let agt_vec = (0..rows * cols)
            .map(|idx| Agent::new(Coord::new(idx / cols, idx % cols)))
            .collect();
        Ok(Self {
            rows,
            cols,
            agt_vec,
        })
    }

    /// Create a grid with every `patient_zero` cell forced to Exposed.
    ///
    /// Each patient zero has its pending state committed at once, so it is
    /// recorded as Exposed at day zero. Repeated coordinates count once.
    pub fn initialize<R: RandomSource>(
        rows: usize,
        cols: usize,
        patient_zero: &[Coord],
        rng: &mut R,
    ) -> Result<Self> {
        let mut grid = Self::new(rows, cols)?;
        grid.check_coords(patient_zero)?;

        for &coord in patient_zero {
            let agt = grid.agent_mut(coord);
            if agt.state() == HealthState::Exposed {
                continue;
            }
            agt.propose_infection();
            agt.evaluate_new_state(IncubationDays::Fixed(0), 0, 0.0, 0.0, rng);
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.agt_vec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agt_vec.is_empty()
    }

    /// Center cell, rounding down.
    pub fn center(&self) -> Coord {
        Coord::new(self.rows / 2, self.cols / 2)
    }

    pub fn contains(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Check that `coord` lies inside the grid.
    pub fn check_coord(&self, coord: Coord) -> Result<()> {
        if coord.row >= self.rows || coord.col >= self.cols {
            bail!(
                "coordinate ({}, {}) is outside the {}x{} grid",
                coord.row,
                coord.col,
                self.rows,
                self.cols
            );
        }
        Ok(())
    }

    fn index(&self, coord: Coord) -> usize {
        coord.row * self.cols + coord.col
    }

    pub fn agent(&self, coord: Coord) -> &Agent {
        &self.agt_vec[self.index(coord)]
    }

    pub(crate) fn agent_mut(&mut self, coord: Coord) -> &mut Agent {
        let idx = self.index(coord);
        &mut self.agt_vec[idx]
    }

    /// Agents in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agt_vec.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agt_vec.iter_mut()
    }

    /// Agents of one row.
    pub fn row(&self, row: usize) -> &[Agent] {
        &self.agt_vec[row * self.cols..(row + 1) * self.cols]
    }

    fn check_coords(&self, coords: &[Coord]) -> Result<()> {
        for (i_coord, &coord) in coords.iter().enumerate() {
            self.check_coord(coord)
                .with_context(|| format!("invalid patient zero {i_coord}"))?;
        }
        Ok(())
    }
}
