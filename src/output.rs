//! Flat text output of the occupancy series, one value per line.

use crate::{Error, Result, TimeSeries};
use itertools::Itertools;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const LEFT_FILE: &str = "ne.txt";
pub const RIGHT_FILE: &str = "nd.txt";
pub const EQUILIBRIUM_FILE: &str = "eq.txt";

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum)]
pub enum NumberFormat {
    /// Integers for counts, shortest float form for N/2
    #[default]
    Plain,
    /// `%.18e` with a signed two-digit exponent, readable by numpy.loadtxt
    Scientific,
}

pub trait SeriesValue {
    fn render(&self, format: NumberFormat) -> String;
}

impl SeriesValue for usize {
    fn render(&self, format: NumberFormat) -> String {
        match format {
            NumberFormat::Plain => self.to_string(),
            NumberFormat::Scientific => scientific(*self as f64),
        }
    }
}

impl SeriesValue for f64 {
    fn render(&self, format: NumberFormat) -> String {
        match format {
            NumberFormat::Plain => self.to_string(),
            NumberFormat::Scientific => scientific(*self),
        }
    }
}

/// Rust writes `1e2` where C writes `1e+02`.
fn scientific(value: f64) -> String {
    let rendered = format!("{:.18e}", value);
    match rendered
        .split_once('e')
        .and_then(|(mantissa, exp)| Some((mantissa, exp.parse::<i32>().ok()?)))
    {
        Some((mantissa, exp)) => format!(
            "{}e{}{:02}",
            mantissa,
            if exp < 0 { '-' } else { '+' },
            exp.abs()
        ),
        None => rendered,
    }
}

pub fn render_series<T: SeriesValue>(values: &[T], format: NumberFormat) -> String {
    values
        .iter()
        .map(|v| format!("{}\n", v.render(format)))
        .join("")
}

pub fn write_series<T: SeriesValue>(
    path: impl AsRef<Path>,
    values: &[T],
    format: NumberFormat,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writer
        .write_all(render_series(values, format).as_bytes())
        .and_then(|_| writer.flush())
        .map_err(|e| Error::io(path, e))?;
    info!("wrote {} values to {}", values.len(), path.display());
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputFiles {
    pub left: PathBuf,
    pub right: PathBuf,
    pub equilibrium: PathBuf,
}

impl OutputFiles {
    pub fn in_dir(dir: impl AsRef<Path>) -> OutputFiles {
        let dir = dir.as_ref();
        OutputFiles {
            left: dir.join(LEFT_FILE),
            right: dir.join(RIGHT_FILE),
            equilibrium: dir.join(EQUILIBRIUM_FILE),
        }
    }
}

/// Writes `ne.txt`, `nd.txt` and `eq.txt` into `dir`, creating it if needed.
pub fn write_all(
    dir: impl AsRef<Path>,
    series: &TimeSeries,
    format: NumberFormat,
) -> Result<OutputFiles> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    let files = OutputFiles::in_dir(dir);
    write_series(&files.left, &series.left, format)?;
    write_series(&files.right, &series.right, format)?;
    write_series(&files.equilibrium, &series.equilibrium, format)?;
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_format() {
        assert_eq!(render_series(&[4usize, 3, 2], NumberFormat::Plain), "4\n3\n2\n");
        assert_eq!(render_series(&[50.0f64, 50.5], NumberFormat::Plain), "50\n50.5\n");
        assert_eq!(render_series::<usize>(&[], NumberFormat::Plain), "");
    }

    #[test]
    fn scientific_format_matches_savetxt() {
        assert_eq!(100usize.render(NumberFormat::Scientific), "1.000000000000000000e+02");
        assert_eq!(0usize.render(NumberFormat::Scientific), "0.000000000000000000e+00");
        assert_eq!(50.5f64.render(NumberFormat::Scientific), "5.050000000000000000e+01");
        assert_eq!(0.25f64.render(NumberFormat::Scientific), "2.500000000000000000e-01");
    }

    #[test]
    fn write_all_creates_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run");
        let series = TimeSeries {
            left: vec![4, 3, 4],
            right: vec![0, 1, 0],
            equilibrium: vec![2.; 3],
        };
        let files = write_all(&target, &series, NumberFormat::Plain).unwrap();
        assert_eq!(files, OutputFiles::in_dir(&target));
        assert_eq!(fs::read_to_string(&files.left).unwrap(), "4\n3\n4\n");
        assert_eq!(fs::read_to_string(&files.right).unwrap(), "0\n1\n0\n");
        assert_eq!(fs::read_to_string(&files.equilibrium).unwrap(), "2\n2\n2\n");
    }

    #[test]
    fn write_errors_carry_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();
        let path = blocker.join(LEFT_FILE);
        match write_series(&path, &[1usize], NumberFormat::Plain) {
            Err(Error::Io { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected an io error, got {:?}", other),
        }
    }
}
