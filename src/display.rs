//! Implements the Display trait for the report types, so they can be printed
//! back out in either program's layout.
//
// The client layout is the default `Display`, while [`DigStyle`] prints the
// `dig +nostats` layout. Both round trip through their parsers.

use crate::Record;
use crate::Report;
use crate::Section;
use std::fmt;
use strum::IntoEnumIterator;

/// Displays this record the way the client under test prints it:
/// `name, type, class[, ttl, rdata]`.
impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{name}, {rtype}, {class}",
            name = self.name,
            rtype = self.r#type,
            class = self.class,
        )?;

        if let (Some(ttl), Some(rdata)) = (&self.ttl, &self.rdata) {
            write!(f, ", {ttl}, {rdata}", ttl = ttl, rdata = rdata)?;
        }

        Ok(())
    }
}

/// Displays this report the way the client under test prints it, every
/// section headed by its record count.
impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for section in Section::iter() {
            let records = self.section(section);

            writeln!(f, "{} ({})", section.client_header(), records.len())?;
            for record in records {
                writeln!(f, "  {}", record)?;
            }
        }

        Ok(())
    }
}

/// Wraps a [`Report`] so it displays in a format resembling `dig +nostats` output.
///
/// ```rust
/// use digdiff::{Record, Report};
///
/// let report = Report {
///     questions: vec![Record::question("bramp.net.", "A", "IN")],
///     ..Default::default()
/// };
///
/// assert_eq!(
///     report.dig_style().to_string(),
///     ";; QUESTION SECTION:\n;bramp.net.              IN   A\n\n"
/// );
/// ```
pub struct DigStyle<'a>(&'a Report);

impl Report {
    pub fn dig_style(&self) -> DigStyle<'_> {
        DigStyle(self)
    }
}

impl fmt::Display for DigStyle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // Always display the question section, but optionally
        // display the other sections.
        for section in Section::iter() {
            let records = self.0.section(section);
            if section != Section::Question && records.is_empty() {
                continue;
            }

            writeln!(f, ";; {}:", section.dig_header())?;
            for record in records {
                fmt_dig_record(f, record)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

fn fmt_dig_record(f: &mut fmt::Formatter, record: &Record) -> fmt::Result {
    match (&record.ttl, &record.rdata) {
        (None, None) => writeln!(
            f,
            ";{name:<23} {class:4} {rtype}",
            name = record.name,
            class = record.class,
            rtype = record.r#type,
        ),
        (Some(ttl), Some(rdata)) => writeln!(
            f,
            "{name:<23} {ttl:>5} {class:4} {rtype:6} {rdata}",
            name = record.name,
            ttl = ttl,
            class = record.class,
            rtype = record.r#type,
            rdata = rdata,
        ),
        (None, Some(rdata)) => writeln!(
            f,
            "{name:<23} {class:4} {rtype:6} {rdata}",
            name = record.name,
            class = record.class,
            rtype = record.r#type,
            rdata = rdata,
        ),
        // A TTL without rdata is never produced by the parsers.
        (Some(ttl), None) => writeln!(
            f,
            "{name:<23} {ttl:>5} {class:4} {rtype}",
            name = record.name,
            ttl = ttl,
            class = record.class,
            rtype = record.r#type,
        ),
    }
}
