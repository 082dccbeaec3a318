use std::str::FromStr;

use ipnet::IpNet;

use crate::{
    addr::{value, with_value, AddressInput, Family, PoolOptions},
    error::{Error, Result},
    intervals::{contains, remove_address, sort_and_merge},
    range::{parse_range, Interval},
    MAX_EXPANSION,
};

/// A pool of addresses from a single family and network, split into *available* and *used* sets.
///
/// Both sets are kept sorted, merged, and disjoint. Together they always cover exactly the
/// addresses the pool was constructed with.
///
/// A `Pool` has no internal locking. Callers sharing one between threads must wrap it in a mutex.
#[derive(Debug, Clone)]
pub struct Pool {
    /// Settings used to read addresses passed to this pool
    options: PoolOptions,
    /// Family of every address in the pool
    family: Family,
    /// Network (address masked by prefix) shared by every address in the pool
    network: IpNet,
    /// Addresses that can be handed out
    available: Vec<Interval>,
    /// Addresses that have been handed out or reserved
    used: Vec<Interval>,
}

impl Pool {
    /// Construct a new `Pool` from a range string such as `192.168.1.1-192.168.1.10,192.168.1.20`
    ///
    /// **Arguments:**
    /// - `ranges`: Ranges separated by `options.separator`
    /// - `options`: Separator and default prefix lengths
    pub fn new(ranges: &str, options: PoolOptions) -> Result<Self> {
        if options.separator.is_empty() {
            return Err(Error::InvalidSeparator);
        }

        // The first range fixes the family and network for the whole pool
        let mut tokens = ranges.split(options.separator.as_str());
        let first = parse_range(tokens.next().unwrap_or_default(), &options)?;
        let family = first.family();
        let network = first.start.trunc();

        let mut parsed = vec![first];
        for token in tokens {
            let interval = parse_range(token, &options)?;
            if interval.family() != family {
                log::error!("IP pool {} contains mixed IP versions", ranges);
                return Err(Error::InvalidVersion(ranges.to_string()));
            }
            if interval.start.trunc() != network {
                log::error!("IP pool {} contains different subnets", ranges);
                return Err(Error::InvalidNetwork(ranges.to_string()));
            }
            parsed.push(interval);
        }

        let available = sort_and_merge(parsed);
        log::debug!(
            "Created {} pool in {} with {} range(s)",
            family,
            network,
            available.len()
        );
        Ok(Self {
            options,
            family,
            network,
            available,
            used: Vec::new(),
        })
    }

    /// Construct a new `Pool` and mark `used` addresses as already taken
    pub fn with_used<I, T>(ranges: &str, options: PoolOptions, used: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: AddressInput,
    {
        let mut pool = Self::new(ranges, options)?;
        pool.set_used_ips(used)?;
        Ok(pool)
    }

    #[must_use]
    pub fn options(&self) -> &PoolOptions {
        &self.options
    }

    #[must_use]
    pub fn family(&self) -> Family {
        self.family
    }

    /// The network every address in this pool belongs to
    #[must_use]
    pub fn network(&self) -> IpNet {
        self.network
    }

    /// Ranges that can still be handed out
    #[must_use]
    pub fn available(&self) -> &[Interval] {
        &self.available
    }

    /// Ranges that have been handed out
    #[must_use]
    pub fn used(&self) -> &[Interval] {
        &self.used
    }

    #[must_use]
    pub fn available_count(&self) -> u128 {
        count(&self.available)
    }

    #[must_use]
    pub fn used_count(&self) -> u128 {
        count(&self.used)
    }

    /// Allocate the lowest available address
    #[profiling::function]
    pub fn allocate(&mut self) -> Result<IpNet> {
        let Some(&first) = self.available.first() else {
            log::warn!("Address pool {} is exhausted", self.repr());
            return Err(Error::PoolExhausted);
        };
        let addr = first.start;

        // Shrink or drop the lowest interval
        if first.start == first.end {
            self.available.remove(0);
        } else {
            self.available[0].start = with_value(&addr, value(&addr) + 1)?;
        }

        let mut used = std::mem::take(&mut self.used);
        used.push(Interval::single(addr));
        self.used = sort_and_merge(used);

        log::debug!("Allocated {}", addr);
        Ok(addr)
    }

    /// Mark specific addresses as used.
    ///
    /// All-or-nothing: if any address is not currently available, the pool is left untouched.
    #[profiling::function]
    pub fn set_used_ips<I, T>(&mut self, addrs: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AddressInput,
    {
        let (available, used) =
            self.transfer(&self.available, &self.used, addrs, |addr, available| {
                Error::NotInAvailablePool { addr, available }
            })?;
        self.available = available;
        self.used = used;
        Ok(())
    }

    /// Return specific used addresses to the available set.
    ///
    /// All-or-nothing: if any address is not currently used, the pool is left untouched.
    #[profiling::function]
    pub fn unset_used_ips<I, T>(&mut self, addrs: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AddressInput,
    {
        let (used, available) =
            self.transfer(&self.used, &self.available, addrs, |addr, used| {
                Error::NotInUsed { addr, used }
            })?;
        self.available = available;
        self.used = used;
        Ok(())
    }

    /// Return every used address to the available set
    pub fn cleanup_used_ips(&mut self) {
        log::debug!("Releasing {} used address(es)", self.used_count());
        let mut available = std::mem::take(&mut self.available);
        available.append(&mut self.used);
        self.available = sort_and_merge(available);
    }

    /// Move `addrs` out of `source` and into `destination`, working on copies of both.
    ///
    /// Returns the new `(source, destination)` lists. Stored addresses adopt the pool prefix.
    fn transfer<I, T, F>(
        &self,
        source: &[Interval],
        destination: &[Interval],
        addrs: I,
        not_found: F,
    ) -> Result<(Vec<Interval>, Vec<Interval>)>
    where
        I: IntoIterator<Item = T>,
        T: AddressInput,
        F: Fn(IpNet, Vec<Interval>) -> Error,
    {
        let mut source = source.to_vec();
        let mut destination = destination.to_vec();
        for addr in addrs {
            let addr = addr.to_address(&self.options)?;
            source = remove_address(&source, &addr).map_err(|error| match error {
                Error::NotInRanges { addr, ranges } => not_found(addr, ranges),
                other => other,
            })?;
            let addr = with_value(&self.network, value(&addr))?;
            log::debug!("Moving {}", addr);
            destination.push(Interval::single(addr));
        }
        Ok((source, sort_and_merge(destination)))
    }

    /// Check if an address is available
    pub fn is_in_available_ip_pool<T: AddressInput>(&self, addr: T) -> Result<bool> {
        Ok(contains(&addr.to_address(&self.options)?, &self.available))
    }

    /// Check if an address is used
    pub fn is_in_used_ips<T: AddressInput>(&self, addr: T) -> Result<bool> {
        Ok(contains(&addr.to_address(&self.options)?, &self.used))
    }

    /// Check if an address belongs to this pool at all (available or used)
    pub fn contains<T: AddressInput>(&self, addr: T) -> Result<bool> {
        let addr = addr.to_address(&self.options)?;
        Ok(contains(&addr, &self.available) || contains(&addr, &self.used))
    }

    /// Expand the available ranges into individual addresses
    pub fn list_available_ip(&self) -> Result<Vec<IpNet>> {
        self.expand(&self.available)
    }

    /// Expand the used ranges into individual addresses
    pub fn list_used_ips(&self) -> Result<Vec<IpNet>> {
        self.expand(&self.used)
    }

    /// Expand the available ranges into address strings, with or without prefixes
    pub fn list_available_ip_strings(&self, include_prefix: bool) -> Result<Vec<String>> {
        Ok(render(self.list_available_ip()?, include_prefix))
    }

    /// Expand the used ranges into address strings, with or without prefixes
    pub fn list_used_ip_strings(&self, include_prefix: bool) -> Result<Vec<String>> {
        Ok(render(self.list_used_ips()?, include_prefix))
    }

    fn expand(&self, intervals: &[Interval]) -> Result<Vec<IpNet>> {
        let total = count(intervals);
        if total > MAX_EXPANSION as u128 {
            log::error!(
                "Refusing to expand {} addresses from pool {}",
                total,
                self.repr()
            );
            return Err(Error::TooManyAddresses {
                pool: self.repr(),
                limit: MAX_EXPANSION,
            });
        }
        Ok(intervals.iter().flat_map(Interval::addresses).collect())
    }

    /// Every range in the pool, used or not, merged back into canonical form
    fn universe(&self) -> Vec<Interval> {
        sort_and_merge(
            self.available
                .iter()
                .chain(self.used.iter())
                .copied()
                .collect(),
        )
    }

    /// Render the whole pool with prefixes, e.g. `192.168.1.1/24-192.168.1.10/24`
    #[must_use]
    pub fn repr(&self) -> String {
        self.universe()
            .iter()
            .map(Interval::to_prefixed_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Number of addresses across a list of intervals
fn count(intervals: &[Interval]) -> u128 {
    intervals
        .iter()
        .fold(0u128, |total, interval| total.saturating_add(interval.len()))
}

fn render(addrs: Vec<IpNet>, include_prefix: bool) -> Vec<String> {
    addrs
        .into_iter()
        .map(|addr| match include_prefix {
            true => addr.to_string(),
            false => addr.addr().to_string(),
        })
        .collect()
}

impl std::fmt::Display for Pool {
    /// Renders the whole pool without prefixes, e.g. `192.168.1.1-192.168.1.10`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges = self
            .universe()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        f.write_str(&ranges.join(","))
    }
}

impl FromStr for Pool {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s, PoolOptions::default())
    }
}

impl PartialEq for Pool {
    fn eq(&self, other: &Self) -> bool {
        self.available == other.available && self.used == other.used
    }
}

impl Eq for Pool {}
