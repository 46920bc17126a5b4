use crate::grid::Coord;
use crate::params::SimulationParameters;
use crate::utils::check_num;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Run configuration.
///
/// Loaded from a TOML file and validated before use.
/// See [`Config::from_file`] for loading.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub grid: GridConfig,
    pub params: SimulationParameters,
    pub run: RunConfig,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Number of grid rows.
    pub rows: usize,
    /// Number of grid columns.
    pub cols: usize,
    /// Cells exposed at day zero. Defaults to the center cell.
    pub patient_zero: Option<Vec<Coord>>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 69,
            cols: 69,
            patient_zero: None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Maximum number of simulated days per run.
    pub max_days: u32,
    /// Pacing of a single run; zero runs as fast as possible.
    pub steps_per_second: f64,
    /// Seed of the random source. Drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_days: 1000,
            steps_per_second: 5.0,
            seed: None,
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        let config: Config = toml::from_str(&contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        check_num(grid.rows, 1..=10_000).context("invalid number of rows")?;
        check_num(grid.cols, 1..=10_000).context("invalid number of columns")?;
        if grid.rows * grid.cols < 2 {
            bail!("grid must hold at least two agents");
        }
        if let Some(patient_zero) = &grid.patient_zero {
            if patient_zero.is_empty() {
                bail!("patient zero list must not be empty");
            }
            for (i_coord, coord) in patient_zero.iter().enumerate() {
                check_num(coord.row, 0..grid.rows)
                    .and(check_num(coord.col, 0..grid.cols))
                    .with_context(|| format!("invalid patient zero {i_coord}"))?;
            }
        }

        self.params.validate().context("invalid simulation parameters")?;
        let max_radius = grid.rows.max(grid.cols);
        check_num(self.params.movement_radius as usize, 0..max_radius)
            .context("invalid movement radius")?;

        check_num(self.run.max_days, 1..=1_000_000).context("invalid maximum number of days")?;
        // Zero disables pacing; any other rate needs a representable tick period.
        if self.run.steps_per_second != 0.0 {
            check_num(self.run.steps_per_second, 1e-3..=1000.0)
                .context("invalid number of steps per second")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::IncubationDays;

    #[test]
    fn parses_full_config() {
        let config: Config = toml::from_str(
            r#"
[grid]
rows = 20
cols = 30
patient_zero = [[0, 0], [19, 29]]

[params]
incubation_days = 3
symptomatic_days = 4
isolation_rate_symptomatic = 0.3
transmission_probability = 0.5
death_rate = 0.1
re_infection_rate = 0.05
movement_radius = 2
number_of_contacts = 6

[run]
max_days = 300
steps_per_second = 0.0
seed = 17
"#,
        )
        .unwrap();
        config.validate().unwrap();

        assert_eq!(
            config.grid.patient_zero,
            Some(vec![Coord::new(0, 0), Coord::new(19, 29)])
        );
        assert_eq!(config.params.incubation_days, IncubationDays::Fixed(3));
        assert_eq!(config.params.number_of_contacts, 6);
        assert_eq!(config.run.seed, Some(17));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        config.validate().unwrap();
    }

    #[test]
    fn rejects_invalid_values() {
        let mut config = Config::default();
        config.grid.patient_zero = Some(vec![Coord::new(69, 0)]);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.grid.rows = 1;
        config.grid.cols = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.params.transmission_probability = -0.1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.params.movement_radius = 69;
        assert!(config.validate().is_err());

        assert!(toml::from_str::<Config>("[grid]\nsize = 3\n").is_err());
    }

    #[test]
    fn steps_per_second_bounds() {
        let mut config = Config::default();
        for steps_per_second in [0.0, 1e-3, 1000.0] {
            config.run.steps_per_second = steps_per_second;
            assert!(config.validate().is_ok(), "{steps_per_second} rejected");
        }
        for steps_per_second in [1e-20, 9e-4, -1.0, 1000.5, f64::NAN] {
            config.run.steps_per_second = steps_per_second;
            assert!(config.validate().is_err(), "{steps_per_second} accepted");
        }
    }
}
