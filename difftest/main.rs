// Runs a DNS client against dig for every case in a JSON file.
// difftest [-d] [-6] [-v] {input file}
use clap::Parser;
use colored::*;
use digdiff::case::{self, Filter, VPN_SERVERS};
use digdiff::runner::{Config, Mode, Outcome, Runner, Summary};
use digdiff::CompareOptions;
use digdiff::Error;
use log::LevelFilter;
use std::fs::File;
use std::process;
use std::time::Duration;

// A simple type alias so as to DRY.
type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser, Debug)]
#[clap(about = "Compares the output of a DNS client against dig")]
struct Args {
    /// Test cases, a JSON array of objects
    input_file: String,

    /// Print the output of every program, and how each record was matched
    #[clap(short, long)]
    debug: bool,

    /// Skip tests that need IPv6 connectivity
    #[clap(short = '6', long)]
    ignore_ipv6: bool,

    /// Skip tests whose server is only reachable over a VPN
    #[clap(short = 'v', long)]
    ignore_vpn: bool,

    /// A server only reachable over a VPN
    #[clap(long = "vpn-server", value_name = "SERVER")]
    vpn_servers: Vec<String>,

    /// Also require TTLs to be equal
    #[clap(long)]
    compare_ttl: bool,

    /// Only log, instead of failing, when one report has records in a section the other lacks
    #[clap(long)]
    lenient_sections: bool,

    /// The client under test
    #[clap(long, default_value = digdiff::runner::DNS_PROGRAM_NAME)]
    program: String,

    #[clap(long, default_value = digdiff::runner::DIG_PROGRAM_NAME)]
    dig: String,

    /// Seconds any one program may run for
    #[clap(long, default_value_t = 15)]
    timeout: u64,

    /// Milliseconds to wait after each test
    #[clap(long, default_value_t = 500)]
    sleep: u64,

    /// Compare against the Google Public DNS JSON API instead of dig
    #[clap(long)]
    google: bool,
}

impl Args {
    fn config(&self) -> Config {
        let mode = if self.google {
            Mode::Json {
                url: digdiff::clients::json::GOOGLE.to_string(),
            }
        } else {
            Mode::Dig
        };

        Config {
            program: self.program.clone(),
            dig: self.dig.clone(),
            timeout: Duration::from_secs(self.timeout),
            sleep: Duration::from_millis(self.sleep),
            compare: CompareOptions {
                compare_ttl: self.compare_ttl,
                strict_sections: !self.lenient_sections,
            },
            mode,
        }
    }

    fn filter(&self) -> Filter {
        let vpn_servers = if self.vpn_servers.is_empty() {
            VPN_SERVERS.iter().map(|s| s.to_string()).collect()
        } else {
            self.vpn_servers.clone()
        };

        Filter {
            ignore_ipv6: self.ignore_ipv6,
            ignore_vpn: self.ignore_vpn,
            vpn_servers,
        }
    }
}

fn print_result(i: usize, total: usize, result: &std::result::Result<Outcome, Error>) {
    match result {
        Ok(_) => println!("{}", format!("TEST PASSED ({}/{}).", i + 1, total).green()),
        Err(e) => {
            println!("{}", format!("TEST FAILED ({}/{}).", i + 1, total).red());
            eprintln!("{}", format!("ERROR: {}", e).red());
        }
    }
}

fn print_summary(summary: &Summary) {
    println!("{}", "-".repeat(30));
    println!(
        "{}",
        format!("PASSED: {}/{}", summary.passed, summary.total).green()
    );
    println!(
        "{}",
        format!("FAILED: {}/{}", summary.failed(), summary.total).red()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::builder().filter_level(level).init();

    if args.debug {
        println!("{}", "Running in debug mode.".yellow());
    }
    if args.ignore_ipv6 {
        println!("{}", "Ignoring tests that require IPv6.".yellow());
    }
    if args.ignore_vpn {
        println!("{}", "Ignoring tests that require a VPN.".yellow());
    }

    let cases = match File::open(&args.input_file)
        .map_err(Error::from)
        .and_then(case::load)
    {
        Ok(cases) => cases,
        Err(e) => {
            eprintln!("Failed to load {}: {}", args.input_file, e);
            process::exit(1);
        }
    };

    let filter = args.filter();
    let cases: Vec<_> = cases.into_iter().filter(|c| filter.accepts(c)).collect();

    let summary = Runner::new(args.config())
        .run_all(&cases, print_result)
        .await;

    print_summary(&summary);

    if summary.failed() > 0 {
        process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_args() {
        let args = Args::parse_from(["difftest", "-d", "-6", "--compare-ttl", "tests.json"]);

        assert_eq!(args.input_file, "tests.json");
        assert!(args.debug);
        assert!(args.ignore_ipv6);
        assert!(!args.ignore_vpn);

        let config = args.config();
        assert_eq!(config.program, "./dns");
        assert_eq!(config.dig, "dig");
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.sleep, Duration::from_millis(500));
        assert_eq!(config.mode, Mode::Dig);
        assert_eq!(
            config.compare,
            CompareOptions {
                compare_ttl: true,
                strict_sections: true,
            }
        );

        assert_eq!(args.filter().vpn_servers, vec!["kazi.fit.vutbr.cz"]);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::parse_from([
            "difftest",
            "-v",
            "--vpn-server",
            "a.example",
            "--vpn-server",
            "b.example",
            "--lenient-sections",
            "--timeout",
            "2",
            "--google",
            "tests.json",
        ]);

        let filter = args.filter();
        assert!(filter.ignore_vpn);
        assert_eq!(filter.vpn_servers, vec!["a.example", "b.example"]);

        let config = args.config();
        assert!(!config.compare.strict_sections);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert!(matches!(config.mode, Mode::Json { .. }));
    }
}
