use chrono::prelude::*;
use std::fmt;
use std::time::Duration;
use std::time::Instant;
use std::time::SystemTime;

/// Timing of a single program run.
#[derive(Clone, Debug, PartialEq)]
pub struct Stats {
    /// When the program was started.
    pub start: SystemTime,

    /// How long it ran for.
    pub duration: Duration,

    /// Number of bytes written to stdout and stderr.
    pub stdout_size: usize,
    pub stderr_size: usize,
}

/// Builder class to aid in the construction of Stats objects.
pub(crate) struct StatsBuilder {
    start: SystemTime,
    timer: Instant,
}

impl StatsBuilder {
    /// Call just before the program is spawned.
    pub fn start() -> StatsBuilder {
        StatsBuilder {
            start: SystemTime::now(),
            timer: Instant::now(),
        }
    }

    /// Call just after the program exits. Consumes the StatsBuilder and returns a Stats.
    pub fn end(self, stdout_size: usize, stderr_size: usize) -> Stats {
        Stats {
            start: self.start,
            duration: self.timer.elapsed(),

            stdout_size,
            stderr_size,
        }
    }
}

/// Displays the stats in the same style as `dig`'s footer.
impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, ";; Run time: {} msec", self.duration.as_millis())?;

        let start: chrono::DateTime<Local> = self.start.into();
        // ;; WHEN: Sat Jun 12 12:14:21 PDT 2021
        writeln!(f, ";; WHEN: {}", start.format("%a %b %-d %H:%M:%S %z %-Y"))?;
        writeln!(
            f,
            ";; OUTPUT SIZE stdout: {} stderr: {}",
            self.stdout_size, self.stderr_size
        )
    }
}
