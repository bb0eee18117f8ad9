//! Runs test cases: spawns `dig` and the client under test, parses both
//! reports and compares them.
//!
//! Cases are run strictly one after another, with a short pause after each
//! one so the queried DNS server isn't flooded.

use crate::case::TestCase;
use crate::compare;
use crate::compare::compare_section;
use crate::CompareOptions;
use crate::Error;
use crate::ParseError;
use crate::Report;
use crate::Section;
use crate::Type;
use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::time::Duration;

pub use self::process::ProcessSpawner;
pub use self::stats::Stats;

mod process;
mod stats;

pub const DNS_PROGRAM_NAME: &str = "./dns";
pub const DIG_PROGRAM_NAME: &str = "dig";

pub const SUBPROCESS_TIMEOUT: Duration = Duration::from_secs(15);
pub const RUN_TEST_SLEEP: Duration = Duration::from_millis(500);

/// What the client under test is compared against.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// The output of `dig`.
    Dig,

    /// The answers of a DNS JSON API, such as [`crate::clients::json::GOOGLE`].
    #[cfg(feature = "json")]
    Json { url: String },
}

/// Runner configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Path to the client under test.
    pub program: String,

    /// Path to `dig`.
    pub dig: String,

    /// How long any one program may run for.
    pub timeout: Duration,

    /// How long to wait after each case.
    pub sleep: Duration,

    pub compare: CompareOptions,

    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            program: DNS_PROGRAM_NAME.to_string(),
            dig: DIG_PROGRAM_NAME.to_string(),
            timeout: SUBPROCESS_TIMEOUT,
            sleep: RUN_TEST_SLEEP,
            compare: CompareOptions::default(),
            mode: Mode::Dig,
        }
    }
}

/// The captured result of a program that ran to completion.
#[derive(Clone, Debug, PartialEq)]
pub struct Captured {
    /// The exit code, or None if the program was killed by a signal.
    pub status: Option<i32>,

    pub stdout: String,
    pub stderr: String,

    pub stats: Stats,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Spawner runs a program and captures its output.
#[async_trait]
pub trait Spawner {
    async fn spawn(&self, program: &str, args: &[String]) -> Result<Captured, Error>;
}

/// Lookup answers queries in place of `dig`, for example a DNS JSON API.
#[async_trait]
pub trait Lookup {
    async fn lookup(&self, name: &str, r#type: Type) -> Result<Report, Error>;
}

/// How a passing test case passed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Both reports were equivalent.
    Matched,

    /// The client under test failed, as the case said it should.
    ExpectedFailure,
}

/// Tally of a full run.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    pub passed: usize,
    pub total: usize,
}

impl Summary {
    pub fn failed(&self) -> usize {
        self.total - self.passed
    }
}

/// Runs test cases using a [`Spawner`].
///
/// # Example
///
/// ```rust,no_run
/// use digdiff::runner::{Config, Runner};
///
/// #[tokio::main]
/// async fn main() -> Result<(), digdiff::Error> {
///     let cases = digdiff::case::load(std::fs::File::open("test_cases.json")?)?;
///
///     let summary = Runner::new(Config::default())
///         .run_all(&cases, |i, total, result| println!("{}/{}: {:?}", i + 1, total, result))
///         .await;
///
///     println!("PASSED: {}/{}", summary.passed, summary.total);
///     Ok(())
/// }
/// ```
pub struct Runner<S = ProcessSpawner> {
    config: Config,
    spawner: S,
}

impl Runner {
    /// Creates a new Runner that spawns real processes.
    pub fn new(config: Config) -> Runner<ProcessSpawner> {
        let spawner = ProcessSpawner::new(config.timeout);
        Runner::new_with_spawner(config, spawner)
    }
}

impl<S> Runner<S>
where
    S: Spawner + Sync,
{
    pub fn new_with_spawner(config: Config, spawner: S) -> Runner<S> {
        Runner { config, spawner }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Runs every case in order, calling `on_result` after each one, and
    /// pausing for [`Config::sleep`] between them.
    pub async fn run_all<F>(&self, cases: &[Value], mut on_result: F) -> Summary
    where
        F: FnMut(usize, usize, &Result<Outcome, Error>),
    {
        let mut summary = Summary {
            passed: 0,
            total: cases.len(),
        };

        for (i, case) in cases.iter().enumerate() {
            let result = self.run_case(case).await;
            if result.is_ok() {
                summary.passed += 1;
            }

            on_result(i, cases.len(), &result);

            if !self.config.sleep.is_zero() {
                tokio::time::sleep(self.config.sleep).await;
            }
        }

        summary
    }

    /// Runs a single (not yet validated) test case.
    pub async fn run_case(&self, case: &Value) -> Result<Outcome, Error> {
        let case = TestCase::from_value(case)?;

        match &self.config.mode {
            Mode::Dig => self.run_dig_case(&case).await,

            #[cfg(feature = "json")]
            Mode::Json { url } => self.run_json_case(&case, url).await,
        }
    }

    async fn run_dig_case(&self, case: &TestCase) -> Result<Outcome, Error> {
        let dig = self.spawn(&self.config.dig, &case.dig_args()).await?;
        if !dig.success() {
            return Err(failed(&self.config.dig, dig));
        }

        let client = match self.run_client(case).await? {
            Some(client) => client,
            None => return Ok(Outcome::ExpectedFailure),
        };

        debug!("{}", dig.stdout);
        debug!("{}", client.stdout);

        let want = Report::from_dig_output(&dig.stdout)
            .map_err(|source| parse_error(&self.config.dig, source))?;
        let got = Report::from_client_output(&client.stdout)
            .map_err(|source| parse_error(&self.config.program, source))?;

        compare(&got, &want, &self.config.compare)?;

        Ok(Outcome::Matched)
    }

    #[cfg(feature = "json")]
    async fn run_json_case(&self, case: &TestCase, url: &str) -> Result<Outcome, Error> {
        let api = crate::clients::json::Client::new(url)?;
        self.run_lookup_case(case, &api).await
    }

    /// Runs a single (not yet validated) test case, comparing the client's
    /// Answer section against the answers from `lookup` instead of `dig`.
    pub async fn run_case_with_lookup<L>(&self, case: &Value, lookup: &L) -> Result<Outcome, Error>
    where
        L: Lookup + Sync,
    {
        let case = TestCase::from_value(case)?;
        self.run_lookup_case(&case, lookup).await
    }

    async fn run_lookup_case<L>(&self, case: &TestCase, lookup: &L) -> Result<Outcome, Error>
    where
        L: Lookup + Sync,
    {
        let want = lookup.lookup(&case.query_name()?, case.query_type()).await?;

        let client = match self.run_client(case).await? {
            Some(client) => client,
            None => return Ok(Outcome::ExpectedFailure),
        };

        debug!("{}", client.stdout);

        let got = Report::from_client_output(&client.stdout)
            .map_err(|source| parse_error(&self.config.program, source))?;

        // Lookups only return answers, so the other sections are never compared.
        compare_section(
            Section::Answer,
            &got.answers,
            &want.answers,
            &self.config.compare,
        )?;

        Ok(Outcome::Matched)
    }

    /// Runs the client under test. Returns None if it failed as expected.
    async fn run_client(&self, case: &TestCase) -> Result<Option<Captured>, Error> {
        let client = self.spawn(&self.config.program, &case.client_args()).await?;

        if client.success() {
            return Ok(Some(client));
        }

        if case.should_fail {
            debug!("{} failed as expected: {}", self.config.program, client.stderr);
            return Ok(None);
        }

        Err(failed(&self.config.program, client))
    }

    async fn spawn(&self, program: &str, args: &[String]) -> Result<Captured, Error> {
        let captured = self.spawner.spawn(program, args).await?;
        debug!("{}:\n{}", program, captured.stats);
        Ok(captured)
    }
}

fn failed(program: &str, captured: Captured) -> Error {
    Error::ProgramFailed {
        program: program.to_string(),
        status: captured.status,
        stderr: captured.stderr,
    }
}

fn parse_error(program: &str, source: ParseError) -> Error {
    Error::Parse {
        program: program.to_string(),
        source,
    }
}
