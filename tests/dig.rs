// Test data is captured from real dig runs by `cargo run --bin generate_tests`.
use digdiff::{compare, CompareOptions, Report};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::fs;

const TEST_DATA_FILENAME: &str = "tests/test_data.yaml";

#[derive(Deserialize)]
struct TestCase {
    // Name of the test case.
    name: String,

    // Raw `dig +nostats` output.
    output: String,

    // What the output should parse into.
    report: Report,
}

fn load() -> Vec<TestCase> {
    let s = fs::read(TEST_DATA_FILENAME).expect("failed read test input");
    serde_yaml::from_slice(&s).expect("failed to deserialise test input")
}

#[test]
fn tests() {
    for case in load() {
        test_parse(case);
    }
}

fn test_parse(case: TestCase) {
    let got = match Report::from_dig_output(&case.output) {
        Err(e) => panic!("{}: Unable to parse: {}", case.name, e),
        Ok(r) => r,
    };

    assert_eq!(got, case.report, "{}: Parsed report doesn't match", case.name);

    // Printing the report back out in either layout, and parsing it again, loses nothing.
    let dig = Report::from_dig_output(&got.dig_style().to_string())
        .unwrap_or_else(|e| panic!("{}: Unable to reparse dig layout: {}", case.name, e));
    assert_eq!(dig, got, "{}: dig layout doesn't round trip", case.name);

    let client = Report::from_client_output(&got.to_string())
        .unwrap_or_else(|e| panic!("{}: Unable to reparse client layout: {}", case.name, e));
    assert_eq!(client, got, "{}: client layout doesn't round trip", case.name);

    // A report always matches itself.
    assert_eq!(
        compare(&client, &dig, &CompareOptions::default()),
        Ok(()),
        "{}: not reflexive",
        case.name
    );
}
