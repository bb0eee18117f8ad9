use super::stats::StatsBuilder;
use super::Captured;
use super::Spawner;
use crate::Error;
use async_trait::async_trait;
use log::debug;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Runs programs as real subprocesses, killing any that run longer than `timeout`.
pub struct ProcessSpawner {
    timeout: Duration,
}

impl ProcessSpawner {
    pub fn new(timeout: Duration) -> ProcessSpawner {
        ProcessSpawner { timeout }
    }
}

#[async_trait]
impl Spawner for ProcessSpawner {
    /// Spawns `program` with `args`, and waits for it to exit.
    async fn spawn(&self, program: &str, args: &[String]) -> Result<Captured, Error> {
        debug!("Running: {} {}", program, args.join(" "));

        let stats = StatsBuilder::start();

        // kill_on_drop ensures the child doesn't outlive a timeout.
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(output) => output?,
            Err(_) => {
                return Err(Error::Timeout {
                    program: program.to_string(),
                    timeout: self.timeout,
                })
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        Ok(Captured {
            status: output.status.code(),
            stats: stats.end(stdout.len(), stderr.len()),
            stdout,
            stderr,
        })
    }
}
