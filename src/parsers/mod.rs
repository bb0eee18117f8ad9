//! Parsers that turn each program's textual report into a [`crate::Report`].
//!
//! The two layouts differ a lot, `dig` prints zone file style lines under
//! `;; ANSWER SECTION:` headers, while the client under test prints comma
//! separated lines under `Answer section (N)` headers, but both produce the
//! same [`crate::Record`]s so they can be compared.

pub mod client;
pub mod dig;

/// Strips the comment markers and whitespace surrounding a record line.
pub(crate) fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c == ';' || c.is_whitespace())
}
