//! Declarative test cases, as loaded from the JSON input file.
//!
//! ```json
//! [
//!     {"recursive": true, "inverse": false, "aaaa": false},
//!     {"server": "kazi.fit.vutbr.cz", "address": "www.fit.vut.cz", "recursive": false, "inverse": false, "aaaa": true},
//!     {"recursive": true, "inverse": false, "aaaa": false, "port": 5353, "should_fail": true}
//! ]
//! ```

use crate::bail;
use crate::Error;
use crate::Type;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::io::Read;
use std::net::IpAddr;

pub const DEFAULT_SERVER: &str = "dns.google";
pub const DEFAULT_ADDRESS: &str = "www.google.com";
pub const DEFAULT_IPV4: &str = "142.250.180.196"; // www.google.com

/// Servers that can only be reached from behind a VPN.
pub const VPN_SERVERS: [&str; 1] = ["kazi.fit.vutbr.cz"];

/// A single test case.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct TestCase {
    /// The DNS server to query.
    #[serde(default = "default_server")]
    pub server: String,

    /// The domain (or for inverse queries, the IP address) to query.
    #[serde(default)]
    pub address: Option<String>,

    /// Ask for recursion.
    pub recursive: bool,

    /// Make a reverse (PTR) query for `address`.
    pub inverse: bool,

    /// Query for AAAA instead of A records.
    pub aaaa: bool,

    /// The server's port, if not 53. Kept as written, so tests can pass invalid ports.
    #[serde(default)]
    pub port: Option<Port>,

    /// The client under test is expected to exit with an error.
    #[serde(default)]
    pub should_fail: bool,

    /// Requires IPv6 connectivity.
    #[serde(default)]
    pub ip6_required: bool,
}

/// A port number, or whatever else the test case put there.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Port {
    Number(i64),
    Text(String),
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Port::Number(n) => n.fmt(f),
            Port::Text(s) => s.fmt(f),
        }
    }
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

impl TestCase {
    /// Deserialises a single case. A case that is missing a required field
    /// is an [`Error::InvalidCase`], which only fails that case.
    pub fn from_value(value: &Value) -> Result<TestCase, Error> {
        TestCase::deserialize(value).map_err(Error::InvalidCase)
    }

    /// The address to query, defaulting to a well known name (or IP for inverse queries).
    pub fn address(&self) -> &str {
        match &self.address {
            Some(address) => address,
            None if self.inverse => DEFAULT_IPV4,
            None => DEFAULT_ADDRESS,
        }
    }

    /// Arguments for `dig`, for example `+nostats +recurse @dns.google AAAA www.google.com`.
    pub fn dig_args(&self) -> Vec<String> {
        let recurse = if self.recursive { "+recurse" } else { "+norecurse" };
        let mut args = vec![
            "+nostats".to_string(),
            recurse.to_string(),
            format!("@{}", self.server),
        ];

        if self.inverse {
            args.push("-x".to_string());
        } else if self.aaaa {
            args.push("AAAA".to_string());
        }

        args.push(self.address().to_string());
        args
    }

    /// Arguments for the client under test, for example `-r -6 -s dns.google www.google.com`.
    pub fn client_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if self.recursive {
            args.push("-r".to_string());
        }
        if self.aaaa {
            args.push("-6".to_string());
        }
        if self.inverse {
            args.push("-x".to_string());
        }

        args.push("-s".to_string());
        args.push(self.server.clone());

        if let Some(port) = &self.port {
            args.push("-p".to_string());
            args.push(port.to_string());
        }

        args.push(self.address().to_string());
        args
    }

    /// The record type asked for. Inverse queries take precedence over AAAA.
    pub fn query_type(&self) -> Type {
        if self.inverse {
            Type::PTR
        } else if self.aaaa {
            Type::AAAA
        } else {
            Type::A
        }
    }

    /// The name actually looked up, which for inverse queries is the
    /// `in-addr.arpa` or `ip6.arpa` name of the address.
    pub fn query_name(&self) -> Result<String, Error> {
        if !self.inverse {
            return Ok(self.address().to_string());
        }

        let ip: IpAddr = match self.address().parse() {
            Ok(ip) => ip,
            Err(_) => bail!(InvalidInput, "[{}] is not a IP address", self.address()),
        };

        Ok(match ip {
            IpAddr::V4(ip) => {
                let o = ip.octets();
                format!("{}.{}.{}.{}.in-addr.arpa", o[3], o[2], o[1], o[0])
            }
            IpAddr::V6(ip) => {
                let mut name = String::new();
                for b in ip.octets().iter().rev() {
                    name.push_str(&format!("{:x}.{:x}.", b & 0xf, b >> 4));
                }
                name + "ip6.arpa"
            }
        })
    }
}

/// Selects which test cases are run.
#[derive(Clone, Debug, Default)]
pub struct Filter {
    /// Skip cases that require IPv6.
    pub ignore_ipv6: bool,

    /// Skip cases whose server is one of `vpn_servers`.
    pub ignore_vpn: bool,

    pub vpn_servers: Vec<String>,
}

impl Filter {
    /// Returns true if this (possibly invalid) case should be run.
    pub fn accepts(&self, case: &Value) -> bool {
        if self.ignore_ipv6 && case.get("ip6_required").and_then(Value::as_bool) == Some(true) {
            return false;
        }

        if self.ignore_vpn {
            let server = case
                .get("server")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_SERVER);

            if self.vpn_servers.iter().any(|vpn| vpn == server) {
                return false;
            }
        }

        true
    }
}

/// Reads the JSON array of test cases. The cases themselves are validated
/// one at a time, with [`TestCase::from_value`], when they are run.
pub fn load<R: Read>(reader: R) -> Result<Vec<Value>, Error> {
    let value: Value = serde_json::from_reader(reader)?;
    match value {
        Value::Array(cases) => Ok(cases),
        other => bail!(
            InvalidData,
            "expected a JSON array of test cases, got: {}",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn case(value: Value) -> TestCase {
        TestCase::from_value(&value).expect("invalid test case")
    }

    #[test]
    fn test_args() {
        struct Test {
            case: Value,
            dig: &'static str,
            client: &'static str,
        }

        let tests = vec![
            Test {
                case: json!({"recursive": true, "inverse": false, "aaaa": false}),
                dig: "+nostats +recurse @dns.google www.google.com",
                client: "-r -s dns.google www.google.com",
            },
            Test {
                case: json!({"recursive": false, "inverse": false, "aaaa": true, "server": "kazi.fit.vutbr.cz", "address": "www.fit.vut.cz"}),
                dig: "+nostats +norecurse @kazi.fit.vutbr.cz AAAA www.fit.vut.cz",
                client: "-6 -s kazi.fit.vutbr.cz www.fit.vut.cz",
            },
            Test {
                case: json!({"recursive": true, "inverse": true, "aaaa": true}),
                dig: "+nostats +recurse @dns.google -x 142.250.180.196",
                client: "-r -6 -x -s dns.google 142.250.180.196",
            },
            Test {
                case: json!({"recursive": true, "inverse": false, "aaaa": false, "port": 5353}),
                dig: "+nostats +recurse @dns.google www.google.com",
                client: "-r -s dns.google -p 5353 www.google.com",
            },
            Test {
                case: json!({"recursive": true, "inverse": false, "aaaa": false, "port": "abc"}),
                dig: "+nostats +recurse @dns.google www.google.com",
                client: "-r -s dns.google -p abc www.google.com",
            },
        ];

        for test in tests {
            let c = case(test.case.clone());
            assert_eq!(c.dig_args().join(" "), test.dig, "dig args for {}", test.case);
            assert_eq!(c.client_args().join(" "), test.client, "client args for {}", test.case);
        }
    }

    #[test]
    fn test_missing_required_field() {
        for value in [
            json!({"inverse": false, "aaaa": false}),
            json!({"recursive": true, "aaaa": false}),
            json!({"recursive": true, "inverse": false}),
        ] {
            match TestCase::from_value(&value) {
                Err(Error::InvalidCase(_)) => (),
                got => panic!("{} should be invalid, got {:?}", value, got),
            }
        }
    }

    #[test]
    fn test_query_type() {
        let tests = [
            (json!({"recursive": true, "inverse": false, "aaaa": false}), Type::A),
            (json!({"recursive": true, "inverse": false, "aaaa": true}), Type::AAAA),
            (json!({"recursive": true, "inverse": true, "aaaa": false}), Type::PTR),
            (json!({"recursive": true, "inverse": true, "aaaa": true}), Type::PTR),
        ];

        for (value, want) in tests {
            assert_eq!(case(value.clone()).query_type(), want, "{}", value);
        }
    }

    #[test]
    fn test_query_name() {
        let tests = [
            (json!({"recursive": true, "inverse": false, "aaaa": false}), "www.google.com"),
            (json!({"recursive": true, "inverse": true, "aaaa": false}), "196.180.250.142.in-addr.arpa"),
            (
                json!({"recursive": true, "inverse": true, "aaaa": false, "address": "2001:db8::567:89ab"}),
                "b.a.9.8.7.6.5.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2.ip6.arpa",
            ),
        ];

        for (value, want) in tests {
            assert_eq!(case(value).query_name().expect("invalid address"), want);
        }

        let invalid = case(json!({"recursive": true, "inverse": true, "aaaa": false, "address": "www.google.com"}));
        assert!(invalid.query_name().is_err());
    }

    #[test]
    fn test_filter() {
        let cases = vec![
            json!({"recursive": true, "inverse": false, "aaaa": true, "ip6_required": true}),
            json!({"recursive": true, "inverse": false, "aaaa": false, "server": "kazi.fit.vutbr.cz"}),
            json!({"recursive": true, "inverse": false, "aaaa": false}),
        ];

        let count = |filter: &Filter| cases.iter().filter(|c| filter.accepts(c)).count();

        let mut filter = Filter {
            vpn_servers: VPN_SERVERS.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        };
        assert_eq!(count(&filter), 3);

        filter.ignore_ipv6 = true;
        assert_eq!(count(&filter), 2);

        filter.ignore_vpn = true;
        assert_eq!(count(&filter), 1);
    }

    #[test]
    fn test_load() {
        let cases = load(r#"[{"recursive": true}, {}]"#.as_bytes()).expect("failed to load");
        assert_eq!(cases.len(), 2);

        match load(r#"{"recursive": true}"#.as_bytes()) {
            Err(Error::InvalidData(_)) => (),
            got => panic!("expected InvalidData, got {:?}", got),
        }
    }
}
