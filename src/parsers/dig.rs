//! Parses the output of `dig +nostats`.
// Refer to https://github.com/tigeli/bind-utils/blob/master/bin/dig/dig.c for reference.
//
// A typical response looks like:
//
//   ;; QUESTION SECTION:
//   ;www.google.com.                IN      A
//
//   ;; ANSWER SECTION:
//   www.google.com.         300     IN      A       142.250.180.196
//
// Sections that hold no records are not printed at all.

use super::trim_line;
use crate::ParseError;
use crate::Record;
use crate::Report;
use crate::Section;
use regex::Captures;
use regex::Regex;
use strum::IntoEnumIterator;

// The tokens are told apart by their shape, not their position: a TTL is
// always numeric and a class is always one of a few known mnemonics.
const CLASS: &str = r"(?P<class>IN|CH|HS|CS|NONE|ANY|CLASS\d+)";
const TYPE: &str = r"(?P<type>[A-Z][A-Z0-9-]*)";

lazy_static! {
    // ";www.google.com.   IN   A" (with the ';' already stripped)
    // "{name} {class} {type}"
    static ref QUESTION_RE: Regex =
        Regex::new(&format!(r"^(?P<name>\S+)\s+{}\s+{}$", CLASS, TYPE)).unwrap();

    // "www.google.com.   300   IN   A   142.250.180.196"
    // "{name} [{ttl}] {class} {type} {rdata}"
    static ref RECORD_RE: Regex = Regex::new(&format!(
        r"^(?P<name>\S+)\s+(?:(?P<ttl>\d+)\s+)?{}\s+{}\s+(?P<rdata>\S.*)$",
        CLASS, TYPE
    ))
    .unwrap();
}

/// Parses the lines of `dig`'s standard output.
///
/// Sections that `dig` did not print are returned empty. Any non-blank line
/// within a section that isn't a record is an error.
///
/// ```rust
/// use digdiff::parsers::dig;
/// use digdiff::{Record, Section};
///
/// let lines = [
///     ";; QUESTION SECTION:",
///     ";8.8.8.8.in-addr.arpa.\t\tIN\tPTR",
///     "",
///     ";; ANSWER SECTION:",
///     "8.8.8.8.in-addr.arpa.\t21600\tIN\tPTR\tdns.google.",
///     "",
/// ];
///
/// let report = dig::parse(&lines).expect("invalid output");
/// assert_eq!(
///     report.section(Section::Answer),
///     &[Record::new("8.8.8.8.in-addr.arpa.", "PTR", "IN", "21600", "dns.google.")]
/// );
/// assert!(report.section(Section::Authority).is_empty());
/// ```
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Report, ParseError> {
    let headers: Vec<(usize, Section)> = lines
        .iter()
        .enumerate()
        .filter_map(|(i, line)| header(line.as_ref()).map(|section| (i, section)))
        .collect();

    // The last line of output always closes the final section.
    let sentinel = lines.len().saturating_sub(1);

    let mut report = Report::default();

    for (i, &(start, section)) in headers.iter().enumerate() {
        let end = headers.get(i + 1).map_or(sentinel, |&(next, _)| next);

        for line in lines.iter().take(end).skip(start + 1) {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }

            let record = parse_record(section, line)?;
            report.section_mut(section).push(record);
        }
    }

    Ok(report)
}

/// Returns the section this line is the header of, if any.
fn header(line: &str) -> Option<Section> {
    Section::iter().find(|section| line.contains(section.dig_header()))
}

fn parse_record(section: Section, line: &str) -> Result<Record, ParseError> {
    let trimmed = trim_line(line);

    let invalid = || ParseError::InvalidRecordLine {
        section,
        line: line.to_string(),
    };

    if section == Section::Question {
        let caps = QUESTION_RE.captures(trimmed).ok_or_else(invalid)?;
        return Ok(Record::question(&caps["name"], &caps["type"], &caps["class"]));
    }

    let caps = RECORD_RE.captures(trimmed).ok_or_else(invalid)?;
    Ok(Record {
        name: caps["name"].to_string(),
        r#type: caps["type"].to_string(),
        class: caps["class"].to_string(),
        ttl: caps.name("ttl").map(|ttl| ttl.as_str().to_string()),
        rdata: Some(rdata(&caps)),
    })
}

// Collapses the whitespace between rdata fields (e.g. of SOA or MX records)
// to a single space. Quoted character strings, as in TXT records, are kept
// exactly as printed.
fn rdata(caps: &Captures) -> String {
    let mut rdata = String::new();
    let mut quoted = false;
    let mut escaped = false;
    let mut space = false;

    for c in caps["rdata"].chars() {
        if !quoted && c.is_whitespace() {
            space = true;
            continue;
        }
        if space {
            rdata.push(' ');
            space = false;
        }

        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            _ => (),
        }
        rdata.push(c);
    }

    rdata
}
