//! Parsing and numeric handling of individual addresses

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnet::{IpNet, Ipv4Net, Ipv6Net};

use crate::error::{Error, Result};

/// An IP address family
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Get the family of an address-with-prefix
    #[must_use]
    pub fn of(net: &IpNet) -> Self {
        match net {
            IpNet::V4(_) => Self::V4,
            IpNet::V6(_) => Self::V6,
        }
    }

    /// Get the family of a bare address
    #[must_use]
    pub fn of_addr(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::V4 => f.write_str("IPv4"),
            Self::V6 => f.write_str("IPv6"),
        }
    }
}

/// Settings used when reading range strings and bare addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolOptions {
    /// Separator between ranges in a pool string. Must not be empty.
    pub separator: String,
    /// Prefix length applied to IPv4 addresses given without one
    pub ipv4_prefix_len: u8,
    /// Prefix length applied to IPv6 addresses given without one
    pub ipv6_prefix_len: u8,
}

impl PoolOptions {
    /// Get the default prefix length for a family
    #[must_use]
    pub fn default_prefix_len(&self, family: Family) -> u8 {
        match family {
            Family::V4 => self.ipv4_prefix_len,
            Family::V6 => self.ipv6_prefix_len,
        }
    }
}

impl Default for PoolOptions {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            ipv4_prefix_len: 24,
            ipv6_prefix_len: 64,
        }
    }
}

/// Parse an address, with or without a `/prefix`, into an address-with-prefix.
///
/// Addresses without a prefix get the default prefix length for their family from `options`.
pub fn normalize(input: &str, options: &PoolOptions) -> Result<IpNet> {
    let input = input.trim();

    // An explicit prefix is taken literally
    if input.contains('/') {
        return input.parse::<IpNet>().map_err(|error| {
            log::error!("Invalid IP address {}: {}", input, error);
            Error::InvalidAddress(input.to_string())
        });
    }

    let addr = input.parse::<IpAddr>().map_err(|error| {
        log::error!("Invalid IP address {}: {}", input, error);
        Error::InvalidAddress(input.to_string())
    })?;
    let family = Family::of_addr(&addr);
    let prefix_len = options.default_prefix_len(family);
    log::debug!(
        "Input IP {} does not have a prefix. Default {} prefix /{} is applied",
        input,
        family,
        prefix_len
    );
    IpNet::new(addr, prefix_len).map_err(|_| {
        log::error!("Default prefix /{} is out of range for {}", prefix_len, input);
        Error::InvalidAddress(format!("{input}/{prefix_len}"))
    })
}

/// Anything that can be turned into an address-with-prefix by a pool
pub trait AddressInput {
    /// Convert to an address-with-prefix, applying defaults from `options` where needed
    fn to_address(&self, options: &PoolOptions) -> Result<IpNet>;
}

impl AddressInput for str {
    fn to_address(&self, options: &PoolOptions) -> Result<IpNet> {
        normalize(self, options)
    }
}

impl AddressInput for String {
    fn to_address(&self, options: &PoolOptions) -> Result<IpNet> {
        normalize(self, options)
    }
}

impl AddressInput for IpNet {
    fn to_address(&self, _options: &PoolOptions) -> Result<IpNet> {
        Ok(*self)
    }
}

impl AddressInput for IpAddr {
    fn to_address(&self, options: &PoolOptions) -> Result<IpNet> {
        let prefix_len = options.default_prefix_len(Family::of_addr(self));
        IpNet::new(*self, prefix_len)
            .map_err(|_| Error::InvalidAddress(format!("{self}/{prefix_len}")))
    }
}

impl<T: AddressInput + ?Sized> AddressInput for &T {
    fn to_address(&self, options: &PoolOptions) -> Result<IpNet> {
        (**self).to_address(options)
    }
}

/// Get the numeric value of an address, ignoring its prefix
#[must_use]
pub(crate) fn value(net: &IpNet) -> u128 {
    match net {
        IpNet::V4(net) => u32::from(net.addr()).into(),
        IpNet::V6(net) => net.addr().into(),
    }
}

/// Ordering key for addresses. Families never interleave.
#[must_use]
pub(crate) fn key(net: &IpNet) -> (Family, u128) {
    (Family::of(net), value(net))
}

/// Build an address with the given numeric value, keeping the family and prefix length of `like`
pub(crate) fn with_value(like: &IpNet, value: u128) -> Result<IpNet> {
    let rebuilt = match like {
        IpNet::V4(net) => u32::try_from(value)
            .ok()
            .and_then(|value| Ipv4Net::new(Ipv4Addr::from(value), net.prefix_len()).ok())
            .map(IpNet::V4),
        IpNet::V6(net) => Ipv6Net::new(Ipv6Addr::from(value), net.prefix_len())
            .ok()
            .map(IpNet::V6),
    };
    rebuilt.ok_or_else(|| Error::InvalidAddress(format!("{value}/{}", like.prefix_len())))
}

/// Check if two addresses belong to the same network (address masked by prefix, and prefix length)
#[must_use]
pub(crate) fn same_network(a: &IpNet, b: &IpNet) -> bool {
    a.trunc() == b.trunc()
}
