use crate::analysis::Analyzer;
use crate::config::Config;
use crate::engine::Engine;
use crate::random::ChaChaSource;
use crate::scheduler::{RunReport, Scheduler};
use crate::stats::{AccumulatorReport, Statistic};
use anyhow::{Context, Result};
use serde::Serialize;
use std::{collections::BTreeMap, path::Path};

/// Summary of a single run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub report: RunReport,
    pub last: Statistic,
}

/// Summary of replicate runs.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary {
    pub n_runs: usize,
    pub observables: BTreeMap<&'static str, AccumulatorReport>,
}

pub struct Manager {
    cfg: Config,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(config_file: P) -> Result<Self> {
        let config_file = config_file.as_ref();
        let cfg = Config::from_file(config_file)
            .with_context(|| format!("failed to load {config_file:?}"))?;
        log::info!("{cfg:#?}");

        Ok(Self { cfg })
    }

    pub fn from_config(cfg: Config) -> Result<Self> {
        cfg.validate().context("failed to validate config")?;
        Ok(Self { cfg })
    }

    /// Run one paced simulation, logging every day.
    pub fn run_simulation(&self) -> Result<RunSummary> {
        let mut engine = self.create_engine(0).context("failed to create engine")?;
        let scheduler = Scheduler::new(self.cfg.run.steps_per_second, self.cfg.run.max_days)
            .context("failed to create scheduler")?;

        let report = scheduler.run(&mut engine, &self.cfg.params, |stat| {
            log::info!(
                "day {:4}: infectious {} recovered {} deceased {} healthy {}",
                stat.day,
                stat.infectious,
                stat.recovered,
                stat.deceased,
                stat.healthy
            );
        });

        if report.ended {
            log::info!("epidemic ended after {} days", report.days);
        } else {
            log::info!("stopped after {} days", report.days);
        }

        Ok(RunSummary {
            report,
            last: engine.latest(),
        })
    }

    /// Run `n_runs` unpaced replicates and aggregate their observables.
    pub fn run_analysis(&self, n_runs: usize) -> Result<AnalysisSummary> {
        let scheduler =
            Scheduler::new(0.0, self.cfg.run.max_days).context("failed to create scheduler")?;
        let mut analyzer = Analyzer::new();

        for i_run in 0..n_runs {
            let mut engine = self
                .create_engine(i_run as u64)
                .with_context(|| format!("failed to create engine for run {i_run}"))?;
            scheduler.run(&mut engine, &self.cfg.params, |_| {});
            analyzer.add_run(engine.statistics());

            let progress = 100.0 * (i_run + 1) as f64 / n_runs as f64;
            log::info!("completed {progress:06.2}%");
        }

        Ok(AnalysisSummary {
            n_runs: analyzer.n_runs(),
            observables: analyzer.report(),
        })
    }

    fn create_engine(&self, i_run: u64) -> Result<Engine> {
        let rng = match self.cfg.run.seed {
            Some(seed) => ChaChaSource::from_seed(seed.wrapping_add(i_run)),
            None => ChaChaSource::from_os().context("failed to seed from OS")?,
        };
        let grid = &self.cfg.grid;
        Engine::new(grid.rows, grid.cols, grid.patient_zero.as_deref(), rng)
    }
}
