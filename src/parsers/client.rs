//! Parses the output of the DNS client under test.
//
// A typical response looks like:
//
//   Authoritative: No, Recursive: Yes, Truncated: No
//   Question section (1)
//     www.google.com., A, IN
//   Answer section (1)
//     www.google.com., A, IN, 300, 142.250.180.196
//   Authority section (0)
//   Additional section (0)
//
// Unlike dig, every section is always printed, and it states how many
// record lines follow it.

use super::trim_line;
use crate::ParseError;
use crate::Record;
use crate::Report;
use crate::Section;
use regex::Regex;
use strum::IntoEnumIterator;

lazy_static! {
    // "Answer section (2)"
    static ref COUNT_RE: Regex = Regex::new(r"\((.*?)\)").unwrap();
}

/// Parses the lines of the client under test's standard output.
///
/// All four section headers must be present, each followed by exactly as
/// many record lines as it claims.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Report, ParseError> {
    let mut report = Report::default();

    for section in Section::iter() {
        let (index, header) = lines
            .iter()
            .enumerate()
            .find(|(_, line)| line.as_ref().contains(section.client_header()))
            .ok_or(ParseError::MissingSection(section))?;

        let count = record_count(section, header.as_ref())?;
        let first = index + 1;

        // The count is whatever the client printed, so it may be absurdly large.
        let records = first
            .checked_add(count)
            .and_then(|end| lines.get(first..end))
            .ok_or(ParseError::TruncatedSection {
                section,
                expected: count,
                found: lines.len() - first,
            })?;

        for line in records {
            let record = parse_record(section, line.as_ref())?;
            report.section_mut(section).push(record);
        }
    }

    Ok(report)
}

fn record_count(section: Section, header: &str) -> Result<usize, ParseError> {
    let caps = COUNT_RE
        .captures(header)
        .ok_or(ParseError::MissingCount(section))?;

    let value = caps[1].trim();
    value.parse().map_err(|_| ParseError::InvalidCount {
        section,
        value: value.to_string(),
    })
}

// "{name}, {type}, {class}" or "{name}, {type}, {class}, {ttl}, {rdata}"
fn parse_record(section: Section, line: &str) -> Result<Record, ParseError> {
    // The rdata is the last field, so let it keep any commas of its own.
    let parts: Vec<&str> = trim_line(line).splitn(5, ',').map(str::trim).collect();

    let wanted = if section == Section::Question { 3 } else { 5 };
    if parts.len() < wanted {
        return Err(ParseError::NotEnoughFields {
            section,
            line: line.to_string(),
        });
    }

    if section == Section::Question {
        return Ok(Record::question(parts[0], parts[1], parts[2]));
    }

    Ok(Record::new(parts[0], parts[1], parts[2], parts[3], parts[4]))
}
