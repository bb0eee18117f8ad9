//! Decides whether two [`Report`]s are equivalent.
//!
//! The reference report (from the client under test) is checked against the
//! comparison report (from `dig`), one [`Section`] at a time in the fixed
//! section order. Every reference record must be found in the same section
//! of the comparison report. The comparison report may hold extra records.

use crate::Record;
use crate::Report;
use crate::Section;
use log::{debug, error};
use strum::IntoEnumIterator;
use thiserror::Error;

/// Options that change how records and sections are matched.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompareOptions {
    /// Also require the TTLs to be equal. TTLs usually drift between two
    /// independent queries, so this is off by default.
    pub compare_ttl: bool,

    /// Fail when a section is empty on one side but not the other. When
    /// false such sections are only reported.
    pub strict_sections: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        CompareOptions {
            compare_ttl: false,
            strict_sections: true,
        }
    }
}

/// Why two reports are not equivalent.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum Mismatch {
    #[error("[{section}] section is missing a line: {record}")]
    MissingRecord { section: Section, record: Record },

    #[error("[{section}] section must be empty, but has {count} records")]
    UnexpectedRecords { section: Section, count: usize },

    #[error("[{section}] section must NOT be empty, expected {count} records")]
    MissingRecords { section: Section, count: usize },
}

impl Record {
    /// Returns true if this record is equivalent to `other`.
    ///
    /// Name, class and type must always be equal. The rdata must be equal when
    /// both records have one, and the TTLs only when asked to.
    pub fn matches(&self, other: &Record, options: &CompareOptions) -> bool {
        if self.name != other.name || self.class != other.class || self.r#type != other.r#type {
            return false;
        }

        if options.compare_ttl && self.ttl != other.ttl {
            return false;
        }

        match (&self.rdata, &other.rdata) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Compares every section of the `reference` report against the same section
/// of the `comparison` report, stopping at the first [`Mismatch`].
///
/// ```rust
/// use digdiff::{compare, CompareOptions, Mismatch, Record, Report, Section};
///
/// let reference = Report {
///     answers: vec![Record::new("www.google.com.", "A", "IN", "300", "142.250.180.196")],
///     ..Default::default()
/// };
/// let mut comparison = Report {
///     answers: vec![Record::new("www.google.com.", "A", "IN", "299", "142.250.180.196")],
///     ..Default::default()
/// };
///
/// // The TTLs are ignored by default.
/// assert_eq!(compare(&reference, &comparison, &CompareOptions::default()), Ok(()));
///
/// comparison.answers[0].rdata = Some("1.2.3.4".to_string());
/// assert_eq!(
///     compare(&reference, &comparison, &CompareOptions::default()),
///     Err(Mismatch::MissingRecord {
///         section: Section::Answer,
///         record: reference.answers[0].clone(),
///     })
/// );
/// ```
pub fn compare(
    reference: &Report,
    comparison: &Report,
    options: &CompareOptions,
) -> Result<(), Mismatch> {
    for section in Section::iter() {
        debug!("Comparing {} section", section);

        compare_section(
            section,
            reference.section(section),
            comparison.section(section),
            options,
        )?;

        debug!("\tSECTION OK");
    }

    Ok(())
}

/// Compares the records of a single section.
pub fn compare_section(
    section: Section,
    reference: &[Record],
    comparison: &[Record],
    options: &CompareOptions,
) -> Result<(), Mismatch> {
    let mismatch = match (reference.is_empty(), comparison.is_empty()) {
        (true, true) => return Ok(()),

        (false, false) => {
            for record in reference {
                debug!("\tlooking for line: {}", record);

                if !comparison.iter().any(|other| record.matches(other, options)) {
                    return Err(Mismatch::MissingRecord {
                        section,
                        record: record.clone(),
                    });
                }

                debug!("\t\tLINE OK");
            }
            return Ok(());
        }

        (false, true) => Mismatch::UnexpectedRecords {
            section,
            count: reference.len(),
        },

        (true, false) => Mismatch::MissingRecords {
            section,
            count: comparison.len(),
        },
    };

    if options.strict_sections {
        return Err(mismatch);
    }

    error!("{}", mismatch);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn a(ttl: &str, ip: &str) -> Record {
        Record::new("www.google.com.", "A", "IN", ttl, ip)
    }

    fn report(answers: Vec<Record>) -> Report {
        Report {
            questions: vec![Record::question("www.google.com.", "A", "IN")],
            answers,
            ..Default::default()
        }
    }

    #[test]
    fn test_reflexive() {
        let r = report(vec![a("300", "142.250.180.196"), a("300", "142.250.180.228")]);

        assert_eq!(compare(&r, &r.clone(), &CompareOptions::default()), Ok(()));
        assert_eq!(
            compare(&Report::default(), &Report::default(), &CompareOptions::default()),
            Ok(())
        );
    }

    #[test]
    fn test_ttl() {
        let reference = report(vec![a("300", "142.250.180.196")]);
        let comparison = report(vec![a("299", "142.250.180.196")]);

        assert_eq!(compare(&reference, &comparison, &CompareOptions::default()), Ok(()));

        let options = CompareOptions {
            compare_ttl: true,
            ..Default::default()
        };
        assert_eq!(
            compare(&reference, &comparison, &options),
            Err(Mismatch::MissingRecord {
                section: Section::Answer,
                record: a("300", "142.250.180.196"),
            })
        );

        // Questions have no TTL on either side.
        assert_eq!(compare(&reference, &reference, &options), Ok(()));
    }

    #[test]
    fn test_superset() {
        let reference = report(vec![a("300", "142.250.180.196")]);
        let comparison = report(vec![
            Record::new("www.google.com.", "CNAME", "IN", "300", "www.l.google.com."),
            a("300", "142.250.180.228"),
            a("300", "142.250.180.196"),
        ]);

        assert_eq!(compare(&reference, &comparison, &CompareOptions::default()), Ok(()));

        // But not the other way round.
        assert!(compare(&comparison, &reference, &CompareOptions::default()).is_err());
    }

    #[test]
    fn test_existential() {
        // Two reference records may match the same comparison record.
        let reference = report(vec![a("300", "142.250.180.196"), a("60", "142.250.180.196")]);
        let comparison = report(vec![a("1", "142.250.180.196")]);

        assert_eq!(compare(&reference, &comparison, &CompareOptions::default()), Ok(()));
    }

    #[test]
    fn test_case_sensitive() {
        let reference = report(vec![a("300", "142.250.180.196")]);
        let comparison = report(vec![Record::new(
            "WWW.google.com.",
            "A",
            "IN",
            "300",
            "142.250.180.196",
        )]);

        assert!(compare(&reference, &comparison, &CompareOptions::default()).is_err());
    }

    #[test]
    fn test_stops_at_first_mismatch() {
        let mut reference = report(vec![a("300", "1.2.3.4")]);
        reference.questions[0].r#type = "AAAA".to_string();

        // The question fails first, so the answer is never looked at.
        assert_eq!(
            compare(&reference, &report(vec![]), &CompareOptions::default()),
            Err(Mismatch::MissingRecord {
                section: Section::Question,
                record: Record::question("www.google.com.", "AAAA", "IN"),
            })
        );
    }

    #[test]
    fn test_asymmetric_sections() {
        let lenient = CompareOptions {
            strict_sections: false,
            ..Default::default()
        };
        let with_answer = report(vec![a("300", "142.250.180.196")]);
        let without_answer = report(vec![]);

        assert_eq!(
            compare(&with_answer, &without_answer, &CompareOptions::default()),
            Err(Mismatch::UnexpectedRecords {
                section: Section::Answer,
                count: 1
            })
        );
        assert_eq!(
            compare(&without_answer, &with_answer, &CompareOptions::default()),
            Err(Mismatch::MissingRecords {
                section: Section::Answer,
                count: 1
            })
        );

        assert_eq!(compare(&with_answer, &without_answer, &lenient), Ok(()));
        assert_eq!(compare(&without_answer, &with_answer, &lenient), Ok(()));
    }

    #[test]
    fn test_rdata_only_when_present() {
        let options = CompareOptions::default();
        let question = Record::question("www.google.com.", "A", "IN");

        assert!(question.matches(&a("300", "142.250.180.196"), &options));
        assert!(!a("300", "1.2.3.4").matches(&a("300", "142.250.180.196"), &options));
    }
}
