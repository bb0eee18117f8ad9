//! Clients for reference resolvers other than `dig`.

pub mod json;
