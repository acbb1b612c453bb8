//! Text and binary encodings of ranges.
//!
//! The binary form is the raw bytes of `first` followed by the raw bytes of
//! `last`: 8 bytes for IPv4, 32 bytes for IPv6. An absent range encodes as
//! empty text or zero bytes.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use crate::error::Error;
use crate::ip_range::IpRange;

/// Text shown for an absent range.
pub const INVALID_MARKER: &str = "invalid IpRange";

impl IpRange {
    /// Returns the binary form of the range, 8 or 32 bytes long.
    ///
    /// # Examples
    /// ```
    /// use ip_range::IpRange;
    ///
    /// let range: IpRange = "1.2.3.4-6.7.8.9".parse().unwrap();
    /// assert_eq!(range.to_bytes(), [1, 2, 3, 4, 6, 7, 8, 9]);
    /// ```
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(32);
        for ip in [self.first, self.last] {
            match ip {
                IpAddr::V4(v4) => buf.extend_from_slice(&v4.octets()),
                IpAddr::V6(v6) => buf.extend_from_slice(&v6.octets()),
            }
        }
        buf
    }

    /// Decodes the binary form produced by [`IpRange::to_bytes`].
    ///
    /// Empty input decodes to `None`. Any length other than 0, 8 or 32 fails
    /// with [`Error::DecodeLength`].
    pub fn from_bytes(data: &[u8]) -> Result<Option<Self>, Error> {
        let (first, last): (IpAddr, IpAddr) = match data.len() {
            0 => return Ok(None),
            8 => {
                let mut first = [0u8; 4];
                let mut last = [0u8; 4];
                first.copy_from_slice(&data[..4]);
                last.copy_from_slice(&data[4..]);
                (Ipv4Addr::from(first).into(), Ipv4Addr::from(last).into())
            }
            32 => {
                let mut first = [0u8; 16];
                let mut last = [0u8; 16];
                first.copy_from_slice(&data[..16]);
                last.copy_from_slice(&data[16..]);
                (Ipv6Addr::from(first).into(), Ipv6Addr::from(last).into())
            }
            n => return Err(Error::DecodeLength(n)),
        };
        Self::from_addrs(first, last).map(Some)
    }
}

/// Marshaling of a possibly absent range.
///
/// Implemented for `Option<IpRange>`, where `None` stands for the absent
/// range. Unmarshaling only writes into `None`, so an existing value is
/// never overwritten by accident.
///
/// # Examples
/// ```
/// use ip_range::{IpRange, Marshal};
///
/// let range: Option<IpRange> = Some("10.0.0.0/24".parse().unwrap());
/// let bytes = range.marshal_binary();
///
/// let mut decoded: Option<IpRange> = None;
/// decoded.unmarshal_binary(&bytes).unwrap();
/// assert_eq!(decoded, range);
///
/// // A second decode into the now filled value is refused.
/// assert!(decoded.unmarshal_binary(&bytes).is_err());
/// ```
pub trait Marshal {
    /// Display form of the range, or [`INVALID_MARKER`] when absent.
    fn to_text(&self) -> String;

    /// Text encoding: the display form, or empty when absent.
    fn marshal_text(&self) -> String;

    /// Binary encoding: 8 or 32 bytes, or empty when absent.
    fn marshal_binary(&self) -> Vec<u8>;

    /// Decodes text in any form accepted by `IpRange::from_str`.
    ///
    /// Empty text leaves the target absent.
    fn unmarshal_text(&mut self, text: &str) -> Result<(), Error>;

    /// Decodes the binary encoding.
    ///
    /// Empty input leaves the target absent.
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Error>;
}

impl Marshal for Option<IpRange> {
    fn to_text(&self) -> String {
        match self {
            Some(r) => r.to_string(),
            None => INVALID_MARKER.to_owned(),
        }
    }

    fn marshal_text(&self) -> String {
        self.map(|r| r.to_string()).unwrap_or_default()
    }

    fn marshal_binary(&self) -> Vec<u8> {
        self.map(|r| r.to_bytes()).unwrap_or_default()
    }

    fn unmarshal_text(&mut self, text: &str) -> Result<(), Error> {
        if self.is_some() {
            return Err(Error::NonZeroTarget);
        }
        if text.is_empty() {
            return Ok(());
        }
        *self = Some(text.parse()?);
        Ok(())
    }

    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), Error> {
        if self.is_some() {
            return Err(Error::NonZeroTarget);
        }
        *self = IpRange::from_bytes(data)?;
        Ok(())
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use std::fmt;

    use serde::de::{self, Deserializer, Visitor};
    use serde::{Deserialize, Serialize, Serializer};

    use crate::ip_range::IpRange;

    /// Human readable formats get the display form, compact formats the
    /// binary form.
    impl Serialize for IpRange {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.collect_str(self)
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    struct IpRangeVisitor;

    impl<'de> Visitor<'de> for IpRangeVisitor {
        type Value = IpRange;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an IP range as text, or 8 or 32 bytes")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<IpRange, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<IpRange, E> {
            match IpRange::from_bytes(v) {
                Ok(Some(range)) => Ok(range),
                Ok(None) => Err(E::invalid_length(0, &self)),
                Err(err) => Err(E::custom(err)),
            }
        }
    }

    impl<'de> Deserialize<'de> for IpRange {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<IpRange, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_str(IpRangeVisitor)
            } else {
                deserializer.deserialize_bytes(IpRangeVisitor)
            }
        }
    }
}
