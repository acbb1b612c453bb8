use std::net::AddrParseError;

use ipnetwork::IpNetworkError;
use thiserror::Error;

/// Errors returned when building or decoding an [`IpRange`](crate::IpRange).
#[derive(Debug, Error)]
pub enum Error {
    #[error("empty input")]
    EmptyInput,

    #[error("invalid address: {0}")]
    ParseAddr(#[from] AddrParseError),

    #[error("invalid prefix: {0}")]
    ParsePrefix(#[from] IpNetworkError),

    #[error("first and last address belong to different IP versions")]
    FamilyMismatch,

    /// The address carries a `%zone` suffix, e.g. `fe80::1%eth0`.
    #[error("address {0:?} must not have a zone")]
    ZonedAddress(String),

    #[error("last address is less than first address")]
    InvertedBounds,

    #[error("prefix length {len} exceeds the address width")]
    InvalidPrefix { len: u8 },

    /// Binary input must be 0, 8 or 32 bytes long.
    #[error("unexpected binary length {0}, want 0, 8 or 32 bytes")]
    DecodeLength(usize),

    #[error("refusing to unmarshal into a non-empty range")]
    NonZeroTarget,
}
