use clap::Parser;
use ehrenfest::output::{self, NumberFormat};
use ehrenfest::{progress_bar, Config, Simulation};
use indicatif::ProgressBar;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Ehrenfest urn model: the irreversible route to equilibrium
#[derive(Parser)]
#[command(name = "ehrenfest")]
#[command(version)]
struct Cli {
    /// JSON file with `balls`, `initial_left` and `steps`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Total number of balls, N
    #[arg(short = 'n', long)]
    balls: Option<usize>,

    /// Balls initially in the left box (defaults to N)
    #[arg(short = 'e', long)]
    initial_left: Option<usize>,

    /// Length of the recorded series, entry 0 included (defaults to 5·N)
    #[arg(short = 't', long)]
    steps: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for ne.txt, nd.txt and eq.txt
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Number format of the output files
    #[arg(short, long, value_enum, default_value_t = NumberFormat::Plain)]
    format: NumberFormat,

    /// Quiet mode (no progress bar or console summary)
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    fn resolve_config(&self) -> ehrenfest::Result<Config> {
        let base = match &self.config {
            Some(path) => Some(Config::from_json_file(path)?),
            None => None,
        };
        let balls = self
            .balls
            .or(base.map(|c| c.balls))
            .unwrap_or(Config::default().balls);
        let defaults = Config::new(balls);
        let config = Config {
            balls,
            initial_left: self
                .initial_left
                .or(base.map(|c| c.initial_left))
                .unwrap_or(defaults.initial_left),
            steps: self
                .steps
                .or(base.map(|c| c.steps))
                .unwrap_or(defaults.steps),
        };
        config.validate()?;
        Ok(config)
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> ehrenfest::Result<()> {
    let config = cli.resolve_config()?;
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "using seed");

    let simulation = Simulation::from_seed(config, seed)?;
    let start = simulation.occupancy();
    if !cli.quiet {
        println!("t: 0 ne: {} nd: {}", start.left, start.right);
    }

    let pb = match cli.quiet {
        true => ProgressBar::hidden(),
        false => progress_bar(config.steps),
    };
    let series = simulation.run_with_progress(&pb);
    let files = output::write_all(&cli.output, &series, cli.format)?;

    if !cli.quiet {
        if let Some(last) = series.len().checked_sub(1).and_then(|t| series.get(t)) {
            println!(
                "t: {} ne: {} nd: {}",
                series.len() - 1,
                last.left,
                last.right
            );
        }
        println!(
            "wrote {}, {}, {}",
            files.left.display(),
            files.right.display(),
            files.equilibrium.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ehrenfest::Error;

    fn resolve(args: &[&str]) -> ehrenfest::Result<Config> {
        let args = std::iter::once("ehrenfest").chain(args.iter().copied());
        Cli::try_parse_from(args).unwrap().resolve_config()
    }

    fn json_config(dir: &tempfile::TempDir) -> String {
        let path = dir.path().join("run.json");
        std::fs::write(&path, r#"{"balls": 10, "initial_left": 4, "steps": 20}"#).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn defaults_without_flags() {
        assert_eq!(resolve(&[]).unwrap(), Config::new(100));
    }

    #[test]
    fn defaults_follow_the_given_ball_count() {
        assert_eq!(
            resolve(&["-n", "6"]).unwrap(),
            Config {
                balls: 6,
                initial_left: 6,
                steps: 30
            }
        );
        assert_eq!(
            resolve(&["--balls", "6", "--initial-left", "2"]).unwrap(),
            Config {
                balls: 6,
                initial_left: 2,
                steps: 30
            }
        );
    }

    #[test]
    fn config_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = json_config(&dir);
        assert_eq!(
            resolve(&["--config", &path]).unwrap(),
            Config {
                balls: 10,
                initial_left: 4,
                steps: 20
            }
        );
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = json_config(&dir);
        assert_eq!(
            resolve(&["--config", &path, "--steps", "7"]).unwrap(),
            Config {
                balls: 10,
                initial_left: 4,
                steps: 7
            }
        );
        assert_eq!(
            resolve(&["--config", &path, "-n", "12", "-e", "12"]).unwrap(),
            Config {
                balls: 12,
                initial_left: 12,
                steps: 20
            }
        );
    }

    #[test]
    fn out_of_range_combination_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = json_config(&dir);
        assert!(matches!(
            resolve(&["--config", &path, "-n", "3"]),
            Err(Error::InitialCountOutOfRange {
                initial_left: 4,
                balls: 3
            })
        ));
        assert!(matches!(
            resolve(&["-n", "5", "-e", "6"]),
            Err(Error::InitialCountOutOfRange {
                initial_left: 6,
                balls: 5
            })
        ));
        assert!(matches!(resolve(&["-n", "0"]), Err(Error::EmptyUrn)));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        assert!(matches!(
            resolve(&["--config", "/nonexistent/run.json"]),
            Err(Error::Io { .. })
        ));
    }
}

fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
