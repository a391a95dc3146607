#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! House number extraction from parcel addresses.
//!
//! Parcel addresses come in many shapes:
//! - Single numbers: `"10 Tremont St 02116"`
//! - Hyphenated ranges: `"10-12 Tremont St 02116"`
//! - Letter suffixes: `"10A Tremont St 02116"`
//!
//! [`extract_range`] reduces all addresses of a segment to one
//! human-readable range such as `"9-10B"`.

pub mod natural;
pub mod range;

pub use natural::{NaturalKey, natural_cmp};
pub use range::{extract_range, house_numbers, is_mostly_numeric};
