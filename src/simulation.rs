use crate::*;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

const PROGRESS_UPDATE_INTERVAL: usize = 1024;

/// The three parameters of a run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Total number of balls, N.
    pub balls: usize,
    /// Balls that start in the left box, ne.
    pub initial_left: usize,
    /// Length of the recorded series, tf. Entry 0 is the initial state.
    pub steps: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config::new(100)
    }
}

impl Config {
    /// All balls start on the left and the run lasts 5·N steps.
    pub const fn new(balls: usize) -> Config {
        Config {
            balls,
            initial_left: balls,
            steps: balls.saturating_mul(5),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.balls == 0 {
            return Err(Error::EmptyUrn);
        }
        if self.initial_left > self.balls {
            return Err(Error::InitialCountOutOfRange {
                initial_left: self.initial_left,
                balls: self.balls,
            });
        }
        Ok(())
    }

    /// The long-run expected occupancy of either box, N/2.
    pub fn equilibrium(&self) -> f64 {
        self.balls as f64 / 2.
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Left count, right count and equilibrium reference, one entry per recorded step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    pub left: Vec<usize>,
    pub right: Vec<usize>,
    pub equilibrium: Vec<f64>,
}

impl TimeSeries {
    pub fn with_capacity(capacity: usize) -> TimeSeries {
        TimeSeries {
            left: Vec::with_capacity(capacity),
            right: Vec::with_capacity(capacity),
            equilibrium: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, occupancy: Occupancy, equilibrium: f64) {
        self.left.push(occupancy.left);
        self.right.push(occupancy.right);
        self.equilibrium.push(equilibrium);
    }

    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn get(&self, t: usize) -> Option<Occupancy> {
        Some(Occupancy {
            left: *self.left.get(t)?,
            right: *self.right.get(t)?,
        })
    }
}

/// Progress bar for a run of `len` steps.
pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {percent}% ({eta})")
            .progress_chars("#>-"),
    );
    pb
}

pub struct Simulation<R = ChaCha8Rng> {
    config: Config,
    urn: Urn,
    stepnumber: usize,
    rng: R,
}

impl Simulation<ChaCha8Rng> {
    /// Same seed and config always give the same series, on every platform.
    pub fn from_seed(config: Config, seed: u64) -> Result<Self> {
        debug!(seed, "seeding ChaCha8 generator");
        Simulation::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulation<R> {
    pub fn with_rng(config: Config, rng: R) -> Result<Self> {
        config.validate()?;
        let urn = Urn::new(config.balls, config.initial_left)?;
        debug!(?config, "urn initialised");
        Ok(Simulation {
            config,
            urn,
            stepnumber: 0,
            rng,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn urn(&self) -> &Urn {
        &self.urn
    }

    pub fn occupancy(&self) -> Occupancy {
        self.urn.occupancy()
    }

    /// Transitions performed so far.
    pub fn step_number(&self) -> usize {
        self.stepnumber
    }

    /// One transition: a uniformly chosen ball changes boxes.
    pub fn step(&mut self) -> Transfer {
        self.stepnumber += 1;
        self.urn.transfer_one_ball(&mut self.rng)
    }

    /// Records `config.steps` entries. Entry 0 is the current state and every
    /// later entry follows exactly one transition.
    pub fn run(self) -> TimeSeries {
        self.run_with_progress(&ProgressBar::hidden())
    }

    pub fn run_with_progress(mut self, pb: &ProgressBar) -> TimeSeries {
        let steps = self.config.steps;
        let equilibrium = self.config.equilibrium();
        info!(
            balls = self.config.balls,
            initial_left = self.config.initial_left,
            steps,
            "starting run"
        );

        let mut series = TimeSeries::with_capacity(steps);
        if steps > 0 {
            series.record(self.occupancy(), equilibrium);
        }
        for t in 1..steps {
            self.step();
            series.record(self.occupancy(), equilibrium);
            if t % PROGRESS_UPDATE_INTERVAL == 0 {
                pb.set_position(t as u64);
            }
        }
        pb.set_position(steps as u64);
        pb.finish_with_message("simulation complete");

        let last = self.occupancy();
        info!(
            transitions = self.stepnumber,
            left = last.left,
            right = last.right,
            "run finished"
        );
        series
    }
}
