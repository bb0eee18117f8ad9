use digdiff::case::{self, Filter, TestCase, VPN_SERVERS};
use pretty_assertions::assert_eq;
use std::fs::File;

const TEST_CASES_FILENAME: &str = "tests/test_cases.json";

fn load() -> Vec<serde_json::Value> {
    let f = File::open(TEST_CASES_FILENAME).expect("failed to open test cases");
    case::load(f).expect("failed to load test cases")
}

#[test]
fn test_all_cases_are_valid() {
    for value in load() {
        if let Err(e) = TestCase::from_value(&value) {
            panic!("{}: {}", value, e);
        }
    }
}

#[test]
fn test_filter() {
    let cases = load();

    let count = |filter: Filter| cases.iter().filter(|c| filter.accepts(c)).count();
    let vpn_servers: Vec<String> = VPN_SERVERS.iter().map(|s| s.to_string()).collect();

    assert_eq!(count(Filter::default()), 10);
    assert_eq!(
        count(Filter {
            ignore_ipv6: true,
            ..Default::default()
        }),
        8
    );
    assert_eq!(
        count(Filter {
            ignore_vpn: true,
            vpn_servers: vpn_servers.clone(),
            ..Default::default()
        }),
        9
    );
    assert_eq!(
        count(Filter {
            ignore_ipv6: true,
            ignore_vpn: true,
            vpn_servers,
        }),
        7
    );
}

#[test]
fn test_client_args() {
    let cases: Vec<TestCase> = load()
        .iter()
        .map(|v| TestCase::from_value(v).expect("invalid case"))
        .collect();

    assert_eq!(
        cases[3].client_args(),
        vec!["-r", "-x", "-s", "dns.google", "2001:4860:4860::8888"]
    );
    assert_eq!(
        cases[8].client_args(),
        vec!["-r", "-s", "dns.google", "-p", "not a port", "www.google.com"]
    );
    assert_eq!(
        cases[5].dig_args(),
        vec!["+nostats", "+norecurse", "@a.ns.nic.cz", "www.fit.vut.cz"]
    );
}
