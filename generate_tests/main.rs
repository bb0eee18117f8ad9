/// Simple tool that runs dig for a set of queries, captures its output
/// and writes out test data for the dig parser.
///
/// # Example
///
/// ```
/// cargo run --bin generate_tests
/// ```
/// If the tool fails, that indicates maybe a problem with the library.
use digdiff::Report;
use serde::Serialize;
use std::fs;
use std::process::Command;

const TEST_DATA_FILENAME: &str = "tests/test_data.yaml";

// Set of actual queries we do, to get example output.
const TESTS: [&str; 6] = [
    "+recurse @dns.google www.google.com",
    "+recurse @dns.google AAAA www.google.com",
    "+recurse @dns.google -x 140.82.121.4",
    "+recurse @dns.google www.github.com",
    "+norecurse @a.ns.nic.cz www.fit.vut.cz", // Referral
    "+recurse @dns.google nonexistent.google.com", // NXDOMAIN
];

#[derive(Serialize)]
struct TestCase {
    // Name of the test case.
    name: String,

    // Raw `dig +nostats` output.
    output: String,

    // What the output parsed into, to be checked by hand.
    report: Report,
}

fn main() -> std::io::Result<()> {
    let mut output = Vec::new();

    for test in TESTS {
        println!("Running dig {}", test);

        let result = Command::new("dig")
            .arg("+nostats")
            .args(test.split_whitespace())
            .output()?;

        if !result.status.success() {
            panic!(
                "dig {} failed: {}",
                test,
                String::from_utf8_lossy(&result.stderr)
            );
        }

        let stdout = String::from_utf8_lossy(&result.stdout).to_string();
        let report = Report::from_dig_output(&stdout).expect("invalid output from dig");

        output.push(TestCase {
            name: "dig ".to_owned() + test,
            output: stdout,
            report,
        });
    }

    println!("Writing new test data to {}", TEST_DATA_FILENAME);

    match serde_yaml::to_string(&output) {
        Err(e) => eprintln!("Failed to serialise test results: {:?}", e),
        Ok(s) => fs::write(TEST_DATA_FILENAME, s)?,
    }

    Ok(())
}
