//! Error types for this library

use ipnet::IpNet;

use crate::range::Interval;

/// Why a range token was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFault {
    /// The two ends are of different address families
    MixedVersions,
    /// The two ends do not share a network
    MixedNetworks,
    /// The start address is greater than the end address
    Reversed,
    /// The token is not of the form `start-end`
    Malformed,
}

impl std::fmt::Display for RangeFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::MixedVersions => "contains different IP versions",
            Self::MixedNetworks => "contains different networks",
            Self::Reversed => "start IP is greater than end IP",
            Self::Malformed => "expected exactly one '-' between two addresses",
        })
    }
}

/// All possible errors thrown by `ip-pool` functions
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("Invalid IP address: {0}")]
    InvalidAddress(String),
    #[error("IP range '{range}' {reason}")]
    InvalidAddressRange { range: String, reason: RangeFault },
    #[error("Range separator must not be empty")]
    InvalidSeparator,
    #[error("IP pool {0} contains mixed IP versions")]
    InvalidVersion(String),
    #[error("IP pool {0} contains different subnets")]
    InvalidNetwork(String),
    #[error("{addr} was not found in any of {} ranges", .ranges.len())]
    NotInRanges { addr: IpNet, ranges: Vec<Interval> },
    #[error("{addr} is not in the available pool")]
    NotInAvailablePool {
        addr: IpNet,
        available: Vec<Interval>,
    },
    #[error("{addr} is not a used address")]
    NotInUsed { addr: IpNet, used: Vec<Interval> },
    #[error("No available IP addresses in the pool")]
    PoolExhausted,
    #[error("Refusing to expand more than {limit} addresses from pool {pool}")]
    TooManyAddresses { pool: String, limit: usize },
}

/// Result type for `ip-pool`
pub type Result<T> = std::result::Result<T, Error>;
