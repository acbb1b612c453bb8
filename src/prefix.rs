//! Splitting an address interval into aligned CIDR blocks.

use ipnetwork::IpNetwork;
use num_traits::{CheckedAdd, One, PrimInt, Zero};

use crate::addr::{host_mask, Address};

/// Number of host bits of the largest block that starts at `cursor` and
/// does not run past `last`.
fn block_host_bits<A: Address>(cursor: A::Uint, last: A::Uint) -> u32 {
    // Alignment of the cursor; zero is aligned to every length.
    let aligned = if cursor.is_zero() {
        A::BITS
    } else {
        cursor.trailing_zeros()
    };

    // floor(log2(last - cursor + 1)), the remaining span has to hold the block.
    let span = last - cursor;
    let fits = match span.checked_add(&A::Uint::one()) {
        Some(count) => A::BITS - 1 - count.leading_zeros(),
        None => A::BITS,
    };

    aligned.min(fits)
}

/// Appends to `dst` the minimal ordered list of prefixes covering `[first, last]`.
///
/// Each emitted block is the largest aligned block starting at the current
/// cursor that stays within `last`; the cursor then moves one past the
/// block. Reaching the top of the address space ends the walk.
pub(crate) fn append_prefixes<A: Address>(dst: &mut Vec<IpNetwork>, first: A, last: A) {
    debug_assert!(first <= last, "first must not exceed last");

    let last = last.to_uint();
    let mut cursor = first.to_uint();

    loop {
        let host_bits = block_host_bits::<A>(cursor, last);
        let len = (A::BITS - host_bits) as u8;
        dst.push(A::from_uint(cursor).network(len));

        let block_last = cursor | host_mask::<A>(len);
        if block_last >= last {
            return;
        }
        match block_last.checked_add(&A::Uint::one()) {
            Some(next) => cursor = next,
            None => return,
        }
    }
}

/// Returns the prefix length when `[first, last]` is exactly one aligned block.
pub(crate) fn exact_prefix_len<A: Address>(first: A, last: A) -> Option<u8> {
    let first = first.to_uint();
    let last = last.to_uint();

    // The differing bits must be a run of trailing ones ...
    let host = first ^ last;
    if host.count_ones() + host.leading_zeros() != A::BITS {
        return None;
    }
    // ... with first all-zero and last all-one in that run.
    if !(first & host).is_zero() || (last & host) != host {
        return None;
    }

    Some((A::BITS - host.count_ones()) as u8)
}

/// Returns `[first, last]` as a single prefix, if it is exactly one.
pub(crate) fn exact_prefix<A: Address>(first: A, last: A) -> Option<IpNetwork> {
    exact_prefix_len(first, last).map(|len| first.network(len))
}
