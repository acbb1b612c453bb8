#![doc = include_str!("../README.md")]
//!
//! # Quick Start
//!
//! ```rust
//! use ip_range::{merge, IpRange};
//!
//! // Ranges, prefixes and single addresses all parse into an IpRange.
//! let range: IpRange = "10.0.0.6-10.0.0.99".parse().unwrap();
//! assert_eq!(range.prefixes().len(), 6);
//!
//! // A range that is exactly one prefix displays as a prefix.
//! let range: IpRange = "10.0.0.0-11.255.255.255".parse().unwrap();
//! assert_eq!(range.to_string(), "10.0.0.0/7");
//!
//! // Merge overlapping and adjacent ranges.
//! let ranges: Vec<IpRange> = ["fe80::/12", "fe80::fe2d:5eff:fef0:fc64", "fe80::/10"]
//!     .iter()
//!     .map(|s| s.parse().unwrap())
//!     .collect();
//! assert_eq!(merge(&ranges), ["fe80::/10".parse::<IpRange>().unwrap()]);
//! ```
//!
//! # Absent Ranges
//!
//! An [`IpRange`] is always valid. Where a range may be missing, use
//! `Option<IpRange>`: [`merge`] and [`IpRange::remove`] skip `None` entries,
//! and [`Marshal`] maps `None` to empty text or zero bytes.
//!
//! ```rust
//! use ip_range::{merge, IpRange, Marshal};
//!
//! let ranges: [Option<IpRange>; 3] = [None, "::/64".parse().ok(), "1.2.3.4-5.6.7.8".parse().ok()];
//! let merged: Vec<String> = merge(&ranges).iter().map(|r| r.to_string()).collect();
//! assert_eq!(merged, ["1.2.3.4-5.6.7.8", "::/64"]);
//!
//! let absent: Option<IpRange> = None;
//! assert_eq!(absent.to_text(), "invalid IpRange");
//! assert!(absent.marshal_binary().is_empty());
//! ```

pub mod addr;
mod codec;
mod error;
mod ip_range;
mod prefix;
mod set_ops;

pub use codec::{Marshal, INVALID_MARKER};
pub use error::Error;
pub use ip_range::{compare, IpRange};
pub use ipnetwork::IpNetwork;
pub use set_ops::merge;

#[cfg(test)]
#[path = "tests/ip_range_tests.rs"]
mod ip_range_tests;

#[cfg(test)]
#[path = "tests/prefix_tests.rs"]
mod prefix_tests;

#[cfg(test)]
#[path = "tests/set_ops_tests.rs"]
mod set_ops_tests;

#[cfg(test)]
#[path = "tests/codec_tests.rs"]
mod codec_tests;
