//! Serializable views of a pool for `--json` output

use ip_pool::{Interval, Pool};
use ipnet::IpNet;

/// A snapshot of a pool's state
#[derive(Debug, serde::Serialize)]
pub struct PoolSummary {
    /// `IPv4` or `IPv6`
    pub family: String,
    /// Network shared by every address in the pool
    pub network: IpNet,
    /// Every range in the pool, used or not
    pub pool: String,
    /// Ranges that can still be allocated
    pub available: Vec<String>,
    /// Ranges that have been allocated or reserved
    pub used: Vec<String>,
    pub available_count: u128,
    pub used_count: u128,
}

impl PoolSummary {
    /// Build a summary, rendering ranges with or without their prefixes
    pub fn new(pool: &Pool, with_prefix: bool) -> Self {
        let render = |intervals: &[Interval]| -> Vec<String> {
            intervals
                .iter()
                .map(|interval| match with_prefix {
                    true => interval.to_prefixed_string(),
                    false => interval.to_string(),
                })
                .collect()
        };
        Self {
            family: pool.family().to_string(),
            network: pool.network(),
            pool: match with_prefix {
                true => pool.repr(),
                false => pool.to_string(),
            },
            available: render(pool.available()),
            used: render(pool.used()),
            available_count: pool.available_count(),
            used_count: pool.used_count(),
        }
    }
}

/// Output of the `allocate` command
#[derive(Debug, serde::Serialize)]
pub struct AllocationSummary {
    /// Addresses handed out, in order
    pub allocated: Vec<IpNet>,
    /// Pool state after allocation
    pub state: PoolSummary,
}

/// Output of the `check` command
#[derive(Debug, serde::Serialize)]
pub struct CheckSummary {
    pub address: String,
    pub in_pool: bool,
    pub available: bool,
    pub used: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_json() {
        let mut pool: Pool = "192.168.1.1-192.168.1.10".parse().unwrap();
        pool.set_used_ips(["192.168.1.4", "192.168.1.5"]).unwrap();

        let value = serde_json::to_value(PoolSummary::new(&pool, false)).unwrap();
        assert_eq!(value["family"], "IPv4");
        assert_eq!(value["network"], "192.168.1.0/24");
        assert_eq!(value["pool"], "192.168.1.1-192.168.1.10");
        assert_eq!(
            value["available"],
            serde_json::json!(["192.168.1.1-192.168.1.3", "192.168.1.6-192.168.1.10"])
        );
        assert_eq!(value["used"], serde_json::json!(["192.168.1.4-192.168.1.5"]));
        assert_eq!(value["available_count"], 8);
        assert_eq!(value["used_count"], 2);
    }

    #[test]
    fn test_summary_with_prefix() {
        let pool: Pool = "10.0.0.1/8-10.0.0.10/8".parse().unwrap();
        let summary = PoolSummary::new(&pool, true);
        assert_eq!(summary.pool, "10.0.0.1/8-10.0.0.10/8");
        assert_eq!(summary.available, vec!["10.0.0.1/8-10.0.0.10/8"]);
        assert!(summary.used.is_empty());
    }
}
