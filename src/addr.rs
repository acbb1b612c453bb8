//! Address arithmetic shared by every range operation.
//!
//! Successor and predecessor never wrap around: stepping past the top or
//! the bottom of an address family yields `None`.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use ipnetwork::{IpNetwork, Ipv4Network, Ipv6Network};
use num_traits::{Bounded, CheckedAdd, CheckedSub, One, PrimInt, Unsigned, Zero};

/// Sealed trait module to prevent external implementations.
mod private {
    pub trait Sealed {}
    impl Sealed for std::net::Ipv4Addr {}
    impl Sealed for std::net::Ipv6Addr {}
}

/// A fixed-width address of one family, viewed as an unsigned integer.
///
/// This trait is sealed and only implemented for [`Ipv4Addr`] and
/// [`Ipv6Addr`].
///
/// | Address    | Integer | Bits |
/// |------------|---------|------|
/// | `Ipv4Addr` | `u32`   | 32   |
/// | `Ipv6Addr` | `u128`  | 128  |
pub trait Address: private::Sealed + Copy + Ord + fmt::Debug + Into<IpAddr> + 'static {
    /// The unsigned integer with the same width as the address.
    type Uint: PrimInt + Unsigned;

    /// Width of the address in bits.
    const BITS: u32;

    /// Returns the address as an integer, most significant byte first.
    fn to_uint(self) -> Self::Uint;

    /// Builds an address from its integer form.
    fn from_uint(uint: Self::Uint) -> Self;

    /// Returns the prefix `self/len`.
    ///
    /// `len` must not exceed [`Address::BITS`].
    fn network(self, len: u8) -> IpNetwork;
}

impl Address for Ipv4Addr {
    type Uint = u32;
    const BITS: u32 = 32;

    #[inline]
    fn to_uint(self) -> u32 {
        u32::from(self)
    }

    #[inline]
    fn from_uint(uint: u32) -> Self {
        Ipv4Addr::from(uint)
    }

    fn network(self, len: u8) -> IpNetwork {
        match Ipv4Network::new(self, len) {
            Ok(net) => IpNetwork::V4(net),
            Err(err) => unreachable!("prefix length {len} rejected for {self}: {err}"),
        }
    }
}

impl Address for Ipv6Addr {
    type Uint = u128;
    const BITS: u32 = 128;

    #[inline]
    fn to_uint(self) -> u128 {
        u128::from(self)
    }

    #[inline]
    fn from_uint(uint: u128) -> Self {
        Ipv6Addr::from(uint)
    }

    fn network(self, len: u8) -> IpNetwork {
        match Ipv6Network::new(self, len) {
            Ok(net) => IpNetwork::V6(net),
            Err(err) => unreachable!("prefix length {len} rejected for {self}: {err}"),
        }
    }
}

/// Mask with the lowest `BITS - len` bits set.
///
/// `len == BITS` gives zero, `len == 0` gives all ones.
#[inline]
pub(crate) fn host_mask<A: Address>(len: u8) -> A::Uint {
    let len = u32::from(len);
    debug_assert!(len <= A::BITS, "prefix length exceeds address width");
    if len >= A::BITS {
        A::Uint::zero()
    } else {
        A::Uint::max_value() >> len as usize
    }
}

/// Lowest and highest address of the prefix `addr/len`, host bits ignored.
#[inline]
pub(crate) fn prefix_bounds<A: Address>(addr: A, len: u8) -> (A, A) {
    let host = host_mask::<A>(len);
    let uint = addr.to_uint();
    (A::from_uint(uint & !host), A::from_uint(uint | host))
}

#[inline]
pub(crate) fn successor<A: Address>(addr: A) -> Option<A> {
    addr.to_uint()
        .checked_add(&A::Uint::one())
        .map(A::from_uint)
}

#[inline]
pub(crate) fn predecessor<A: Address>(addr: A) -> Option<A> {
    addr.to_uint()
        .checked_sub(&A::Uint::one())
        .map(A::from_uint)
}

/// Returns the address directly after `ip`, or `None` at the top of its family.
///
/// # Examples
/// ```
/// use std::net::IpAddr;
/// use ip_range::addr;
///
/// let ip: IpAddr = "10.0.0.255".parse().unwrap();
/// assert_eq!(addr::next(ip), Some("10.0.1.0".parse().unwrap()));
///
/// // No wraparound past the last address of the family.
/// let max: IpAddr = "255.255.255.255".parse().unwrap();
/// assert_eq!(addr::next(max), None);
/// ```
pub fn next(ip: IpAddr) -> Option<IpAddr> {
    match ip {
        IpAddr::V4(v4) => successor(v4).map(IpAddr::V4),
        IpAddr::V6(v6) => successor(v6).map(IpAddr::V6),
    }
}

/// Returns the address directly before `ip`, or `None` at the bottom of its family.
///
/// # Examples
/// ```
/// use std::net::IpAddr;
/// use ip_range::addr;
///
/// let ip: IpAddr = "2001:db8::".parse().unwrap();
/// assert_eq!(addr::prev(ip), Some("2001:db7:ffff:ffff:ffff:ffff:ffff:ffff".parse().unwrap()));
/// assert_eq!(addr::prev("::".parse().unwrap()), None);
/// ```
pub fn prev(ip: IpAddr) -> Option<IpAddr> {
    match ip {
        IpAddr::V4(v4) => predecessor(v4).map(IpAddr::V4),
        IpAddr::V6(v6) => predecessor(v6).map(IpAddr::V6),
    }
}
