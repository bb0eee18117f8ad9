//! Differential testing of a DNS client against `dig`.
//!
//! Both programs print a human readable report of the same query. This crate
//! parses each report into a [`Report`] (the client's comma separated layout
//! with [`parsers::client`], `dig`'s zone file like layout with
//! [`parsers::dig`]) and then checks the two are equivalent with [`compare`].
//!
//! ```rust
//! use digdiff::{compare, CompareOptions, Report};
//!
//! let client = Report::from_client_output(
//!     "Question section (1)\n  www.google.com., A, IN\n\
//!      Answer section (1)\n  www.google.com., A, IN, 300, 142.250.180.196\n\
//!      Authority section (0)\n\
//!      Additional section (0)\n",
//! )?;
//!
//! let dig = Report::from_dig_output(
//!     ";; QUESTION SECTION:\n;www.google.com.  IN  A\n\n\
//!      ;; ANSWER SECTION:\nwww.google.com.  299  IN  A  142.250.180.196\n\n",
//! )?;
//!
//! assert_eq!(compare(&client, &dig, &CompareOptions::default()), Ok(()));
//! # Ok::<(), digdiff::ParseError>(())
//! ```

#[macro_use]
extern crate lazy_static;

#[macro_use]
extern crate num_derive;

#[macro_use]
mod cfg;

pub mod case;
pub mod compare;
mod display;
mod errors;
pub mod parsers;
pub mod types;

cfg_feature! {
    #![feature = "runner"]
    pub mod runner;
}

cfg_feature! {
    #![feature = "json"]
    pub mod clients;
}

pub use crate::errors::*;
pub use crate::types::*;

// Pull up the various types that should be on the front page of the docs.
#[doc(inline)]
pub use crate::compare::compare;
#[doc(inline)]
pub use crate::compare::CompareOptions;
#[doc(inline)]
pub use crate::compare::Mismatch;
#[doc(inline)]
pub use crate::display::DigStyle;
