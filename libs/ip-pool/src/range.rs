use ipnet::IpNet;

use crate::{
    addr::{key, normalize, same_network, value, with_value, Family, PoolOptions},
    error::{Error, RangeFault, Result},
};

/// A contiguous, ascending range of addresses within one family and network.
///
/// A single address is represented as an interval whose start equals its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    pub(crate) start: IpNet,
    pub(crate) end: IpNet,
}

impl Interval {
    /// Construct a new `Interval`, checking that both ends share a family and network
    /// and that `start` is not greater than `end`
    pub fn new(start: IpNet, end: IpNet) -> std::result::Result<Self, RangeFault> {
        if Family::of(&start) != Family::of(&end) {
            return Err(RangeFault::MixedVersions);
        }
        if !same_network(&start, &end) {
            return Err(RangeFault::MixedNetworks);
        }
        if value(&start) > value(&end) {
            return Err(RangeFault::Reversed);
        }
        Ok(Self { start, end })
    }

    /// Construct an `Interval` holding exactly one address
    #[must_use]
    pub fn single(addr: IpNet) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    #[must_use]
    pub fn start(&self) -> IpNet {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> IpNet {
        self.end
    }

    #[must_use]
    pub fn family(&self) -> Family {
        Family::of(&self.start)
    }

    /// Number of addresses covered. Saturates for the full IPv6 space.
    #[must_use]
    pub fn len(&self) -> u128 {
        (value(&self.end) - value(&self.start)).saturating_add(1)
    }

    /// Intervals always hold at least one address
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check if `addr` falls within this interval. The prefix of `addr` is ignored.
    #[must_use]
    pub fn contains(&self, addr: &IpNet) -> bool {
        let needle = key(addr);
        key(&self.start) <= needle && needle <= key(&self.end)
    }

    /// Iterate over every address in this interval, each carrying the prefix of `start`
    pub fn addresses(&self) -> impl Iterator<Item = IpNet> + '_ {
        (value(&self.start)..=value(&self.end)).filter_map(|raw| with_value(&self.start, raw).ok())
    }

    /// Render as `addr/prefix` or `start/prefix-end/prefix`
    #[must_use]
    pub fn to_prefixed_string(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }
}

impl std::fmt::Display for Interval {
    /// Renders as `addr` or `start-end`, without prefixes
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start.addr())
        } else {
            write!(f, "{}-{}", self.start.addr(), self.end.addr())
        }
    }
}

/// Parse a single range token (`ip`, `ip/prefix`, or `ip1-ip2`) into an [`Interval`]
#[profiling::function]
pub fn parse_range(token: &str, options: &PoolOptions) -> Result<Interval> {
    let Some((start_text, end_text)) = token.split_once('-') else {
        return Ok(Interval::single(normalize(token, options)?));
    };
    let (start_text, end_text) = (start_text.trim(), end_text.trim());
    let range = format!("{start_text}-{end_text}");

    // Only one separator is allowed between the two ends
    if end_text.contains('-') {
        return Err(Error::InvalidAddressRange {
            range,
            reason: RangeFault::Malformed,
        });
    }

    let start = normalize(start_text, options)?;
    let end = normalize(end_text, options)?;
    Interval::new(start, end).map_err(|reason| {
        log::error!("Rejecting IP range '{}': {}", range, reason);
        Error::InvalidAddressRange { range, reason }
    })
}
