//! Append-only CSV log of best fitness per run and generation
//!
//! Each run appends one `Run N,<generation>,<fitness>` row per generation.
//! Runs are numbered by counting the distinct run labels already present.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::diagnostics::StatisticsLog;
use crate::error::CheckpointError;

const HEADER: &str = "Run,Generation,Fitness";

/// Which per-generation value a run log records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoggedValue {
    /// Smallest fitness, the best value when minimising
    #[default]
    Min,
    /// Largest fitness, the best value when maximising
    Max,
}

/// CSV sink for run histories
#[derive(Clone, Debug)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    /// Log to `path`; nothing is touched until the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of distinct runs already in the file
    pub fn logged_runs(&self) -> Result<usize, CheckpointError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let runs: HashSet<&str> = contents
            .lines()
            .skip(1)
            .filter_map(|line| line.split(',').next())
            .filter(|run| !run.is_empty())
            .collect();
        Ok(runs.len())
    }

    /// Append one row per `(generation, fitness)` pair and return the run
    /// number that was assigned
    pub fn append_run<I>(&self, rows: I) -> Result<usize, CheckpointError>
    where
        I: IntoIterator<Item = (usize, f64)>,
    {
        let is_new = !self.path.exists();
        let run = self.logged_runs()? + 1;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = BufWriter::new(file);

        if is_new {
            writeln!(writer, "{}", HEADER)?;
        }
        for (generation, fitness) in rows {
            writeln!(writer, "Run {},{},{}", run, generation, fitness)?;
        }
        writer.flush()?;

        info!("appended run {} to {}", run, self.path.display());
        Ok(run)
    }

    /// Append a run's statistics history
    pub fn append_statistics(
        &self,
        statistics: &StatisticsLog,
        value: LoggedValue,
    ) -> Result<usize, CheckpointError> {
        self.append_run(statistics.iter().map(|s| {
            let fitness = match value {
                LoggedValue::Min => s.min,
                LoggedValue::Max => s.max,
            };
            (s.generation, fitness)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::GenerationStats;
    use tempfile::tempdir;

    #[test]
    fn test_header_written_once() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("runs.csv"));

        assert_eq!(log.logged_runs().unwrap(), 0);
        assert_eq!(log.append_run(vec![(0, 1.5), (1, 1.25)]).unwrap(), 1);
        assert_eq!(log.append_run(vec![(0, 2.0)]).unwrap(), 2);

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Run,Generation,Fitness",
                "Run 1,0,1.5",
                "Run 1,1,1.25",
                "Run 2,0,2",
            ]
        );
    }

    #[test]
    fn test_run_numbering_ignores_history_length() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("runs.csv"));

        log.append_run((0..5).map(|g| (g, g as f64))).unwrap();
        log.append_run((0..2).map(|g| (g, g as f64))).unwrap();
        assert_eq!(log.logged_runs().unwrap(), 2);
        assert_eq!(log.append_run(vec![(0, 0.0)]).unwrap(), 3);
    }

    #[test]
    fn test_append_statistics() {
        let dir = tempdir().unwrap();
        let log = RunLog::new(dir.path().join("runs.csv"));

        let mut stats = StatisticsLog::new();
        stats.record(GenerationStats::from_values(&[1.0, 3.0], 0, 2).unwrap());
        stats.record(GenerationStats::from_values(&[0.5, 4.0], 1, 2).unwrap());

        log.append_statistics(&stats, LoggedValue::Max).unwrap();
        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("Run 1,0,3\n"));
        assert!(contents.contains("Run 1,1,4\n"));

        log.append_statistics(&stats, LoggedValue::Min).unwrap();
        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.contains("Run 2,1,0.5\n"));
    }
}
