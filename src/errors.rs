use crate::types::Section;
use thiserror::Error;

/// A report (from either program) that could not be turned into a [`crate::Report`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParseError {
    #[error("could not find [{0}] section in output")]
    MissingSection(Section),

    #[error("could not find number of lines in [{0}] section")]
    MissingCount(Section),

    #[error("could not convert [{value}] to an integer in [{section}] section")]
    InvalidCount { section: Section, value: String },

    #[error("[{section}] section has [{expected}] records but there are only {found} more lines in the output")]
    TruncatedSection {
        section: Section,
        expected: usize,
        found: usize,
    },

    #[error("not enough parts in [{section}] line: {line:?}")]
    NotEnoughFields { section: Section, line: String },

    #[error("[{section}] line is not a valid record: {line:?}")]
    InvalidRecordLine { section: Section, line: String },
}

/// Everything that can go wrong while running a single test case.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("test case is missing a required field: {0}")]
    InvalidCase(#[source] serde_json::Error),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidData(String),

    #[error("{program} did not finish within {timeout:?}")]
    Timeout {
        program: String,
        timeout: std::time::Duration,
    },

    #[error("{program} failed with an error (exit code {status:?})\nstderr: {stderr}")]
    ProgramFailed {
        program: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("could not parse {program} output: {source}")]
    Parse {
        program: String,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    Mismatch(#[from] crate::compare::Mismatch),

    #[cfg(feature = "http_deps")]
    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[cfg(feature = "http_deps")]
    #[error(transparent)]
    InvalidUri(#[from] http::uri::InvalidUri),

    #[cfg(feature = "http_deps")]
    #[error(transparent)]
    Http(#[from] http::Error),

    #[cfg(feature = "http_deps")]
    #[error(transparent)]
    Hyper(#[from] hyper::Error),
}

/// Returns early with the given [`Error`] kind and a formatted message.
#[macro_export]
macro_rules! bail {
    ($kind:ident, $($arg:tt)*) => {
        return Err($crate::Error::$kind(format!($($arg)*)))
    };
}
