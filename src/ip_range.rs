use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use ipnetwork::{IpNetwork, IpNetworkError};
use tracing::debug;

use crate::addr;
use crate::error::Error;
use crate::prefix;

/// An inclusive range of IP addresses from the same address family.
///
/// ```text
/// 10.0.0.3-10.0.17.134        range
/// 2001:db8::1-2001:db8::f6    range
/// 192.168.0.0/24              prefix
/// ::1/128                     prefix
/// ```
///
/// Ranges and CIDR prefixes are handled transparently: a range that is
/// exactly one prefix displays as one.
///
/// # Invariants
/// - `first` and `last` are both IPv4 or both IPv6
/// - `first <= last`
///
/// An `IpRange` is always valid. The absence of a range (an unset or failed
/// value) is spelled `Option<IpRange>`.
///
/// # Ordering
/// Ranges sort by `first` ascending and, for equal `first`, by `last`
/// descending, so a superset sorts before its subsets. IPv4 ranges sort
/// before IPv6 ranges.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpRange {
    pub(crate) first: IpAddr,
    pub(crate) last: IpAddr,
}

impl IpRange {
    /// Creates a range from its first and last address.
    ///
    /// Fails if the addresses belong to different IP versions or if `last`
    /// is less than `first`.
    ///
    /// # Examples
    /// ```
    /// use std::net::IpAddr;
    /// use ip_range::IpRange;
    ///
    /// let first: IpAddr = "10.0.0.6".parse().unwrap();
    /// let last: IpAddr = "10.0.0.99".parse().unwrap();
    /// let range = IpRange::from_addrs(first, last).unwrap();
    /// assert_eq!(range.addrs(), (first, last));
    ///
    /// // Inverted bounds are rejected.
    /// assert!(IpRange::from_addrs(last, first).is_err());
    /// ```
    pub fn from_addrs(first: IpAddr, last: IpAddr) -> Result<Self, Error> {
        if first.is_ipv4() != last.is_ipv4() {
            return Err(Error::FamilyMismatch);
        }
        if last < first {
            return Err(Error::InvertedBounds);
        }
        Ok(Self { first, last })
    }

    /// Creates the range covered by the prefix `addr/len`.
    ///
    /// Host bits set in `addr` are ignored. Fails if `len` exceeds 32 for
    /// IPv4 or 128 for IPv6.
    ///
    /// # Examples
    /// ```
    /// use std::net::IpAddr;
    /// use ip_range::IpRange;
    ///
    /// let addr: IpAddr = "10.1.2.3".parse().unwrap();
    /// let range = IpRange::from_prefix(addr, 8).unwrap();
    /// assert_eq!(range.to_string(), "10.0.0.0/8");
    ///
    /// assert!(IpRange::from_prefix(addr, 33).is_err());
    /// ```
    pub fn from_prefix(addr: IpAddr, len: u8) -> Result<Self, Error> {
        let net = IpNetwork::new(addr, len).map_err(|_| Error::InvalidPrefix { len })?;
        Ok(Self::from(net))
    }

    /// Returns the first address of the range.
    #[inline]
    pub fn first(&self) -> IpAddr {
        self.first
    }

    /// Returns the last address of the range.
    #[inline]
    pub fn last(&self) -> IpAddr {
        self.last
    }

    /// Returns the first and last address of the range.
    #[inline]
    pub fn addrs(&self) -> (IpAddr, IpAddr) {
        (self.first, self.last)
    }

    #[inline]
    pub fn is_ipv4(&self) -> bool {
        self.first.is_ipv4()
    }

    #[inline]
    pub fn is_ipv6(&self) -> bool {
        self.first.is_ipv6()
    }

    /// Returns `true` if `ip` lies within the range.
    ///
    /// Addresses of the other IP version are never contained.
    #[inline]
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.first <= ip && ip <= self.last
    }

    /// Returns `true` if every address of `other` lies within `self`.
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.first <= other.first && self.last >= other.last
    }

    /// Returns `true` if the ranges share at least one address.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        !self.is_disjoint(other)
    }

    /// Returns the range as a prefix, if it is exactly one.
    ///
    /// Both ends are checked: `first` must be aligned to the prefix length
    /// and `last` must be the highest address of that prefix.
    ///
    /// # Examples
    /// ```
    /// use ip_range::IpRange;
    ///
    /// let range: IpRange = "10.0.0.0-11.255.255.255".parse().unwrap();
    /// assert_eq!(range.as_prefix().unwrap().to_string(), "10.0.0.0/7");
    ///
    /// let range: IpRange = "10.0.0.0-11.255.255.254".parse().unwrap();
    /// assert!(range.as_prefix().is_none());
    /// ```
    pub fn as_prefix(&self) -> Option<IpNetwork> {
        match (self.first, self.last) {
            (IpAddr::V4(first), IpAddr::V4(last)) => prefix::exact_prefix(first, last),
            (IpAddr::V6(first), IpAddr::V6(last)) => prefix::exact_prefix(first, last),
            _ => unreachable!("mixed address families in {self:?}"),
        }
    }

    /// Returns the minimal ordered list of prefixes that covers the range.
    ///
    /// `prefixes` allocates; see [`IpRange::prefixes_append`] for a version
    /// that reuses a buffer you provide.
    ///
    /// # Examples
    /// ```
    /// use ip_range::IpRange;
    ///
    /// let range: IpRange = "10.0.0.6-10.0.0.99".parse().unwrap();
    /// let prefixes: Vec<String> = range.prefixes().iter().map(|p| p.to_string()).collect();
    /// assert_eq!(
    ///     prefixes,
    ///     ["10.0.0.6/31", "10.0.0.8/29", "10.0.0.16/28", "10.0.0.32/27", "10.0.0.64/27", "10.0.0.96/30"],
    /// );
    /// ```
    pub fn prefixes(&self) -> Vec<IpNetwork> {
        let mut dst = Vec::new();
        self.prefixes_append(&mut dst);
        dst
    }

    /// Appends the prefixes covering the range to `dst`.
    ///
    /// Same result as [`IpRange::prefixes`], without allocating when `dst`
    /// already has room.
    pub fn prefixes_append(&self, dst: &mut Vec<IpNetwork>) {
        match (self.first, self.last) {
            (IpAddr::V4(first), IpAddr::V4(last)) => prefix::append_prefixes(dst, first, last),
            (IpAddr::V6(first), IpAddr::V6(last)) => prefix::append_prefixes(dst, first, last),
            _ => unreachable!("mixed address families in {self:?}"),
        }
    }

    /// Compares the first addresses of both ranges.
    #[inline]
    pub fn cmp_first(&self, other: &Self) -> Ordering {
        self.first.cmp(&other.first)
    }

    /// Compares the last addresses of both ranges.
    #[inline]
    pub fn cmp_last(&self, other: &Self) -> Ordering {
        self.last.cmp(&other.last)
    }

    #[inline]
    pub(crate) fn is_disjoint_left(&self, other: &Self) -> bool {
        self.last < other.first
    }

    #[inline]
    pub(crate) fn is_disjoint_right(&self, other: &Self) -> bool {
        other.last < self.first
    }

    #[inline]
    pub(crate) fn is_disjoint(&self, other: &Self) -> bool {
        self.is_disjoint_left(other) || self.is_disjoint_right(other)
    }
}

/// Compares the four end points of two ranges.
///
/// Returns `(first vs first, last vs last, first vs other's last, last vs
/// other's first)`, enough for an interval index to classify overlap and
/// containment without looking at the addresses again.
///
/// # Examples
/// ```
/// use std::cmp::Ordering::*;
/// use ip_range::{compare, IpRange};
///
/// let a: IpRange = "10.0.0.0/24".parse().unwrap();
/// let b: IpRange = "10.0.0.128/25".parse().unwrap();
/// assert_eq!(compare(&a, &b), (Less, Equal, Less, Greater));
/// ```
pub fn compare(a: &IpRange, b: &IpRange) -> (Ordering, Ordering, Ordering, Ordering) {
    (
        a.first.cmp(&b.first),
        a.last.cmp(&b.last),
        a.first.cmp(&b.last),
        a.last.cmp(&b.first),
    )
}

impl Ord for IpRange {
    fn cmp(&self, other: &Self) -> Ordering {
        self.first
            .cmp(&other.first)
            .then_with(|| other.last.cmp(&self.last))
    }
}

impl PartialOrd for IpRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<IpNetwork> for IpRange {
    fn from(net: IpNetwork) -> Self {
        let (first, last) = match net {
            IpNetwork::V4(v4) => {
                let (first, last) = addr::prefix_bounds(v4.ip(), v4.prefix());
                (first.into(), last.into())
            }
            IpNetwork::V6(v6) => {
                let (first, last) = addr::prefix_bounds(v6.ip(), v6.prefix());
                (first.into(), last.into())
            }
        };
        Self { first, last }
    }
}

/// A single address becomes a one-address range, a /32 or /128.
impl From<IpAddr> for IpRange {
    fn from(ip: IpAddr) -> Self {
        Self { first: ip, last: ip }
    }
}

impl TryFrom<(IpAddr, IpAddr)> for IpRange {
    type Error = Error;

    fn try_from((first, last): (IpAddr, IpAddr)) -> Result<Self, Error> {
        Self::from_addrs(first, last)
    }
}

fn parse_addr(s: &str) -> Result<IpAddr, Error> {
    if s.contains('%') {
        return Err(Error::ZonedAddress(s.to_owned()));
    }
    Ok(s.parse()?)
}

fn parse_range(s: &str) -> Result<IpRange, Error> {
    if s.is_empty() {
        return Err(Error::EmptyInput);
    }

    // addr/bits
    if let Some((_, bits)) = s.split_once('/') {
        if let Some((ip, _)) = s.split_once('%') {
            return Err(Error::ZonedAddress(ip.to_owned()));
        }
        // decimal digits only, without sign or leading zero
        let leading_zero = bits.len() > 1 && bits.starts_with('0');
        if leading_zero || !bits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::ParsePrefix(IpNetworkError::InvalidPrefix));
        }
        let net: IpNetwork = s.parse()?;
        return Ok(IpRange::from(net));
    }

    // addr-addr
    if let Some((first, last)) = s.split_once('-') {
        return IpRange::from_addrs(parse_addr(first)?, parse_addr(last)?);
    }

    parse_addr(s).map(IpRange::from)
}

/// Parses `first-last`, `addr/bits` or a single address.
///
/// # Examples
/// ```
/// use ip_range::IpRange;
///
/// let range: IpRange = "192.168.2.3-192.168.7.255".parse().unwrap();
/// assert_eq!(range.to_string(), "192.168.2.3-192.168.7.255");
///
/// let range: IpRange = "2001:db8:dead::/38".parse().unwrap();
/// assert_eq!(range.to_string(), "2001:db8:dc00::/38");
///
/// let range: IpRange = "4.4.4.4".parse().unwrap();
/// assert_eq!(range.to_string(), "4.4.4.4/32");
///
/// assert!("".parse::<IpRange>().is_err());
/// assert!("fe80::2-fe80::1".parse::<IpRange>().is_err());
/// ```
impl FromStr for IpRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        parse_range(s).inspect_err(|err| debug!(input = s, %err, "rejected ip range"))
    }
}

/// Displays the range as `addr/bits` when it is exactly one prefix, and as
/// `first-last` otherwise.
impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_prefix() {
            Some(net) => write!(f, "{}/{}", net.ip(), net.prefix()),
            None => write!(f, "{}-{}", self.first, self.last),
        }
    }
}

impl fmt::Debug for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IpRange")
            .field("first", &self.first)
            .field("last", &self.last)
            .finish()
    }
}
