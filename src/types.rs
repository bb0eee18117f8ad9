use crate::errors::ParseError;
use crate::parsers;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The four sections of a DNS report.
///
/// The declaration order is the order both reports print their sections in,
/// and the order they are compared in. Do not reorder.
#[derive(Copy, Clone, Debug, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Section {
    Question,
    Answer,
    Authority,
    Additional,
}

impl Section {
    /// The header `dig` prints above this section, for example `;; ANSWER SECTION:`.
    pub fn dig_header(self) -> &'static str {
        match self {
            Section::Question => "QUESTION SECTION",
            Section::Answer => "ANSWER SECTION",
            Section::Authority => "AUTHORITY SECTION",
            Section::Additional => "ADDITIONAL SECTION",
        }
    }

    /// The header the client under test prints above this section, for
    /// example `Answer section (2)`.
    pub fn client_header(self) -> &'static str {
        match self {
            Section::Question => "Question section",
            Section::Answer => "Answer section",
            Section::Authority => "Authority section",
            Section::Additional => "Additional section",
        }
    }
}

/// A single resource record line, as printed by one of the programs.
///
/// All fields are kept as the text that was printed. Question records carry
/// no `ttl` or `rdata`, every other record carries both (except `dig` output
/// printed without TTLs).
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Record {
    pub name: String,

    #[serde(rename = "type")]
    pub r#type: String,

    pub class: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rdata: Option<String>,
}

impl Record {
    /// Creates a Question section record.
    pub fn question(name: &str, r#type: &str, class: &str) -> Record {
        Record {
            name: name.to_string(),
            r#type: r#type.to_string(),
            class: class.to_string(),
            ttl: None,
            rdata: None,
        }
    }

    /// Creates a Answer, Authority or Additional section record.
    pub fn new(name: &str, r#type: &str, class: &str, ttl: &str, rdata: &str) -> Record {
        Record {
            ttl: Some(ttl.to_string()),
            rdata: Some(rdata.to_string()),

            ..Record::question(name, r#type, class)
        }
    }
}

/// The parsed output of one program run: the records of each [`Section`].
///
/// # Examples
///
/// ```rust
/// use digdiff::{Record, Report, Section};
///
/// let report = Report::from_client_output(
///     "Question section (1)\n  www.google.com., AAAA, IN\n\
///      Answer section (0)\nAuthority section (0)\nAdditional section (0)\n",
/// ).expect("invalid report");
///
/// assert_eq!(
///     report.section(Section::Question),
///     &[Record::question("www.google.com.", "AAAA", "IN")]
/// );
/// assert!(report.section(Section::Answer).is_empty());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Report {
    #[serde(default)]
    pub questions: Vec<Record>,

    #[serde(default)]
    pub answers: Vec<Record>,

    #[serde(default)]
    pub authorities: Vec<Record>,

    #[serde(default)]
    pub additionals: Vec<Record>,
}

impl Report {
    /// Parses the standard output of the client under test.
    pub fn from_client_output(output: &str) -> Result<Report, ParseError> {
        let lines: Vec<&str> = output.lines().collect();
        parsers::client::parse(&lines)
    }

    /// Parses the standard output of `dig +nostats`.
    pub fn from_dig_output(output: &str) -> Result<Report, ParseError> {
        let lines: Vec<&str> = output.lines().collect();
        parsers::dig::parse(&lines)
    }

    pub fn section(&self, section: Section) -> &[Record] {
        match section {
            Section::Question => &self.questions,
            Section::Answer => &self.answers,
            Section::Authority => &self.authorities,
            Section::Additional => &self.additionals,
        }
    }

    pub(crate) fn section_mut(&mut self, section: Section) -> &mut Vec<Record> {
        match section {
            Section::Question => &mut self.questions,
            Section::Answer => &mut self.answers,
            Section::Authority => &mut self.authorities,
            Section::Additional => &mut self.additionals,
        }
    }
}

/// Resource Record Type, for example, A, CNAME or SOA.
///
/// Only used to turn the numeric types returned by the JSON API into the
/// mnemonics both reports print.
#[derive(Copy, Clone, Debug, Display, FromPrimitive, PartialEq)]
#[allow(clippy::upper_case_acronyms)]
#[repr(u16)]
pub enum Type {
    /// IPv4 Address.
    A = 1,
    NS = 2,
    CNAME = 5,
    SOA = 6,

    /// Domain name pointer.
    PTR = 12,

    /// Mail exchange.
    MX = 15,

    /// Text strings.
    TXT = 16,

    /// IPv6 Address.
    AAAA = 28,

    /// Server Selection
    SRV = 33,

    /// EDNS(0) Opt type. See [rfc6891].
    ///
    /// [rfc6891]: https://datatracker.ietf.org/doc/html/rfc6891
    OPT = 41,

    /// Any record type.
    /// Only valid as a Question Type.
    ANY = 255,
}

impl Type {
    /// Returns the mnemonic for this numeric type, or `TYPE{n}` (per [rfc3597]) for
    /// types we don't know about, matching what `dig` prints.
    ///
    /// [rfc3597]: https://datatracker.ietf.org/doc/html/rfc3597#section-5
    pub fn name_of(code: u16) -> String {
        match Type::from_u16(code) {
            Some(r#type) => r#type.to_string(),
            None => format!("TYPE{}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_section_order() {
        let got: Vec<Section> = Section::iter().collect();
        assert_eq!(
            got,
            vec![
                Section::Question,
                Section::Answer,
                Section::Authority,
                Section::Additional
            ]
        );
    }

    #[test]
    fn test_type_name_of() {
        let tests = [
            (1, "A"),
            (28, "AAAA"),
            (12, "PTR"),
            (5, "CNAME"),
            (65, "TYPE65"),
        ];

        for (code, want) in tests {
            assert_eq!(Type::name_of(code), want, "type {}", code);
        }
    }
}
