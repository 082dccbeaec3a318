//! Operations over ordered lists of [`Interval`]s
//!
//! Every function here expects (and produces) lists sorted ascending by start address.

use ipnet::IpNet;

use crate::{
    addr::{key, value, with_value},
    error::{Error, Result},
    range::Interval,
};

/// Sort a list of intervals and merge any that overlap or touch.
///
/// The result is the minimal ordered list covering the same addresses. Merging an
/// already-merged list returns it unchanged.
#[must_use]
#[profiling::function]
pub fn sort_and_merge(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|interval| (key(&interval.start), key(&interval.end)));

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for next in intervals {
        if let Some(last) = merged.last_mut() {
            // Adjacent intervals are merged as well as overlapping ones
            if last.family() == next.family()
                && value(&next.start) <= value(&last.end).saturating_add(1)
            {
                if key(&next.end) > key(&last.end) {
                    last.end = next.end;
                }
                continue;
            }
        }
        merged.push(next);
    }
    merged
}

/// Find the index of the interval containing `addr`
fn position(intervals: &[Interval], addr: &IpNet) -> Option<usize> {
    let needle = key(addr);
    let index = intervals.partition_point(|interval| key(&interval.start) <= needle);
    index
        .checked_sub(1)
        .filter(|&index| intervals[index].contains(addr))
}

/// Check if `addr` falls within any interval of the same family
#[must_use]
pub fn contains(addr: &IpNet, intervals: &[Interval]) -> bool {
    position(intervals, addr).is_some()
}

/// Remove a single address from a list of intervals, splitting the interval that holds it.
///
/// Fails with [`Error::NotInRanges`] if no interval contains `addr`.
#[profiling::function]
pub fn remove_address(intervals: &[Interval], addr: &IpNet) -> Result<Vec<Interval>> {
    let Some(index) = position(intervals, addr) else {
        return Err(Error::NotInRanges {
            addr: *addr,
            ranges: intervals.to_vec(),
        });
    };
    let hit = intervals[index];
    let target = value(addr);

    let mut remaining = Vec::with_capacity(intervals.len() + 1);
    remaining.extend_from_slice(&intervals[..index]);
    if value(&hit.start) < target {
        remaining.push(Interval {
            start: hit.start,
            end: with_value(&hit.start, target - 1)?,
        });
    }
    if target < value(&hit.end) {
        remaining.push(Interval {
            start: with_value(&hit.start, target + 1)?,
            end: hit.end,
        });
    }
    remaining.extend_from_slice(&intervals[index + 1..]);
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{addr::PoolOptions, range::parse_range};

    fn intervals(tokens: &[&str]) -> Vec<Interval> {
        tokens
            .iter()
            .map(|token| parse_range(token, &PoolOptions::default()).unwrap())
            .collect()
    }

    fn render(intervals: &[Interval]) -> Vec<String> {
        intervals.iter().map(ToString::to_string).collect()
    }

    fn net(addr: &str) -> IpNet {
        format!("{addr}/24").parse().unwrap()
    }

    #[test]
    fn test_merge_overlapping_and_adjacent() {
        let merged = sort_and_merge(intervals(&[
            "192.168.1.20-192.168.1.30",
            "192.168.1.1-192.168.1.5",
            "192.168.1.6",
            "192.168.1.4-192.168.1.8",
            "192.168.1.25-192.168.1.40",
        ]));
        assert_eq!(
            render(&merged),
            vec!["192.168.1.1-192.168.1.8", "192.168.1.20-192.168.1.40"]
        );
    }

    #[test]
    fn test_merge_keeps_gaps() {
        let merged = sort_and_merge(intervals(&["192.168.1.1", "192.168.1.3"]));
        assert_eq!(render(&merged), vec!["192.168.1.1", "192.168.1.3"]);
    }

    #[test]
    fn test_merge_contained_interval() {
        let merged = sort_and_merge(intervals(&[
            "192.168.1.1-192.168.1.100",
            "192.168.1.10-192.168.1.20",
        ]));
        assert_eq!(render(&merged), vec!["192.168.1.1-192.168.1.100"]);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let once = sort_and_merge(intervals(&[
            "192.168.1.9",
            "192.168.1.1-192.168.1.3",
            "192.168.1.4",
            "192.168.1.50-192.168.1.60",
        ]));
        let twice = sort_and_merge(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_merge_empty() {
        assert!(sort_and_merge(Vec::new()).is_empty());
    }

    #[test]
    fn test_merge_never_crosses_families() {
        let merged = sort_and_merge(intervals(&["::1-::5", "0.0.0.1-0.0.0.5"]));
        assert_eq!(merged.len(), 2);
        assert_eq!(render(&merged), vec!["0.0.0.1-0.0.0.5", "::1-::5"]);
    }

    #[test]
    fn test_remove_splits_interval() {
        let ranges = intervals(&["192.168.1.1-192.168.1.10", "192.168.1.20"]);
        let remaining = remove_address(&ranges, &net("192.168.1.5")).unwrap();
        assert_eq!(
            render(&remaining),
            vec![
                "192.168.1.1-192.168.1.4",
                "192.168.1.6-192.168.1.10",
                "192.168.1.20"
            ]
        );
    }

    #[test]
    fn test_remove_edges() {
        let ranges = intervals(&["192.168.1.1-192.168.1.3"]);
        let remaining = remove_address(&ranges, &net("192.168.1.1")).unwrap();
        assert_eq!(render(&remaining), vec!["192.168.1.2-192.168.1.3"]);
        let remaining = remove_address(&remaining, &net("192.168.1.3")).unwrap();
        assert_eq!(render(&remaining), vec!["192.168.1.2"]);
        let remaining = remove_address(&remaining, &net("192.168.1.2")).unwrap();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_remove_keeps_interval_prefix() {
        let ranges = intervals(&["10.0.0.1/8-10.0.0.10/8"]);
        let remaining = remove_address(&ranges, &net("10.0.0.5")).unwrap();
        assert_eq!(remaining[0].to_prefixed_string(), "10.0.0.1/8-10.0.0.4/8");
        assert_eq!(remaining[1].to_prefixed_string(), "10.0.0.6/8-10.0.0.10/8");
    }

    #[test]
    fn test_remove_missing() {
        let ranges = intervals(&["192.168.1.1-192.168.1.10"]);
        assert_eq!(
            remove_address(&ranges, &net("192.168.1.11")),
            Err(Error::NotInRanges {
                addr: net("192.168.1.11"),
                ranges: ranges.clone(),
            })
        );
    }

    #[test]
    fn test_contains() {
        let ranges = intervals(&["192.168.1.1-192.168.1.10", "192.168.1.20-192.168.1.30"]);
        assert!(contains(&net("192.168.1.1"), &ranges));
        assert!(contains(&net("192.168.1.10"), &ranges));
        assert!(contains(&net("192.168.1.25"), &ranges));
        assert!(!contains(&net("192.168.1.15"), &ranges));
        assert!(!contains(&net("192.168.1.31"), &ranges));
        assert!(!contains(&net("192.168.1.0"), &ranges));
        assert!(!contains(&net("192.168.1.5"), &[]));
    }
}
