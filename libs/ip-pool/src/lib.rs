#![doc = include_str!("../README.md")]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod addr;
mod error;
pub mod intervals;
mod pool;
mod range;

pub use addr::{normalize, AddressInput, Family, PoolOptions};
pub use error::{Error, RangeFault, Result};
pub use pool::Pool;
pub use range::{parse_range, Interval};

/// The largest number of addresses a pool will expand into a list.
///
/// Listing a larger pool (a `/8` for example) fails with [`Error::TooManyAddresses`] instead.
pub const MAX_EXPANSION: usize = 65_536;
