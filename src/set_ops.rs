//! Merging a collection of ranges and subtracting ranges from a range.
//!
//! Both operations work on a sorted private copy of their input; the
//! caller's slice is never reordered.

use std::cmp::Ordering;

use tracing::trace;

use crate::addr;
use crate::ip_range::IpRange;

/// Copies the valid ranges out of `ranges` and sorts them.
fn sorted_copy<T>(ranges: &[T]) -> Vec<IpRange>
where
    T: Copy + Into<Option<IpRange>>,
{
    let mut rs: Vec<IpRange> = ranges.iter().filter_map(|&r| r.into()).collect();
    rs.sort_unstable();
    rs
}

/// Merges adjacent and overlapping ranges.
///
/// Duplicates and subsets are absorbed and `None` entries are skipped. The
/// result is sorted, and no two of its ranges overlap or touch.
///
/// Accepts `&[IpRange]` as well as `&[Option<IpRange>]`.
///
/// # Examples
/// ```
/// use ip_range::{merge, IpRange};
///
/// let ranges: Vec<IpRange> = ["10.0.0.0/32", "10.0.0.1/32", "10.0.0.4/30", "10.0.0.6-10.0.0.99"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
///
/// let merged: Vec<String> = merge(&ranges).iter().map(|r| r.to_string()).collect();
/// assert_eq!(merged, ["10.0.0.0/31", "10.0.0.4-10.0.0.99"]);
/// ```
pub fn merge<T>(ranges: &[T]) -> Vec<IpRange>
where
    T: Copy + Into<Option<IpRange>>,
{
    if ranges.is_empty() {
        return Vec::new();
    }

    let sorted = sorted_copy(ranges);
    let mut out: Vec<IpRange> = Vec::with_capacity(sorted.len());

    for r in sorted {
        let Some(top) = out.last_mut() else {
            out.push(r);
            continue;
        };

        // Case order matters, the cases are not mutually exclusive.
        if addr::next(top.last) == Some(r.first) {
            // adjacent [f...l][f...l]
            top.last = r.last;
        } else if top.is_disjoint_left(&r) {
            // disjoint [f...l]  [f...l]
            out.push(r);
        } else if top.covers(&r) {
            // duplicate or subset
        } else if top.last < r.last {
            // partial overlap [f......l]
            //                      [f....l]
            top.last = r.last;
        } else {
            unreachable!("merge: {r:?} sorted after {top:?}");
        }
    }

    trace!(input = ranges.len(), merged = out.len(), "merged ip ranges");
    out
}

impl IpRange {
    /// Removes `subtrahends` from the range and returns what remains.
    ///
    /// The subtrahends are merged first, so they may overlap, repeat or
    /// contain `None` entries. The result is sorted and disjoint; it is
    /// empty when the subtrahends cover the whole range.
    ///
    /// # Examples
    /// ```
    /// use ip_range::IpRange;
    ///
    /// let outer: IpRange = "192.168.2.0/24".parse().unwrap();
    /// let inner: Vec<IpRange> = vec![
    ///     "192.168.2.0/26".parse().unwrap(),
    ///     "192.168.2.240-192.168.2.249".parse().unwrap(),
    /// ];
    ///
    /// let rest: Vec<String> = outer.remove(&inner).iter().map(|r| r.to_string()).collect();
    /// assert_eq!(rest, ["192.168.2.64-192.168.2.239", "192.168.2.250-192.168.2.255"]);
    ///
    /// assert!(outer.remove(&[outer]).is_empty());
    /// ```
    pub fn remove<T>(&self, subtrahends: &[T]) -> Vec<IpRange>
    where
        T: Copy + Into<Option<IpRange>>,
    {
        let merged = merge(subtrahends);

        let (Some(head), Some(tail)) = (merged.first(), merged.last()) else {
            trace!(range = %self, remaining = 1_usize, "nothing to remove");
            return vec![*self];
        };
        if self.is_disjoint_left(head) || self.is_disjoint_right(tail) {
            trace!(range = %self, remaining = 1_usize, "range disjoint with all subtrahends");
            return vec![*self];
        }

        let mut out = Vec::new();
        // Cursor over the part of `self` not yet visited.
        let mut r = *self;

        for m in &merged {
            if m.is_disjoint(&r) {
                continue;
            }
            if m.covers(&r) {
                // m masks the rest
                trace!(range = %self, remaining = out.len(), "removed ip ranges");
                return out;
            }

            match m.first.cmp(&r.first) {
                Ordering::Less | Ordering::Equal => {
                    // left overlap, only move the cursor
                }
                Ordering::Greater => {
                    // right overlap, keep [r.first, m.first - 1]
                    match addr::prev(m.first) {
                        Some(before) => out.push(IpRange {
                            first: r.first,
                            last: before,
                        }),
                        None => unreachable!("remove: {m:?} starts after {r:?} but has no predecessor"),
                    }
                }
            }

            // m ends at the top of the address space
            let Some(next) = addr::next(m.last) else {
                trace!(range = %self, remaining = out.len(), "removed ip ranges");
                return out;
            };
            r.first = next;

            if r.last < r.first {
                trace!(range = %self, remaining = out.len(), "removed ip ranges");
                return out;
            }
        }

        out.push(r);
        trace!(range = %self, remaining = out.len(), "removed ip ranges");
        out
    }
}
