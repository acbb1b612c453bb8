use crate::{merge, IpRange};

fn range(s: &str) -> IpRange {
    s.parse().unwrap()
}

fn ranges(ss: &[&str]) -> Vec<IpRange> {
    ss.iter().map(|s| range(s)).collect()
}

fn strings(rs: &[IpRange]) -> Vec<String> {
    rs.iter().map(|r| r.to_string()).collect()
}

// =============================================================================
// Merge Tests
// =============================================================================

#[test]
fn test_merge_example() {
    let rs = ranges(&[
        "10.0.0.0/32",
        "10.0.0.1/32",
        "10.0.0.4/30",
        "10.0.0.6-10.0.0.99",
        "fe80::/12",
        "fe80:0:0:0:fe2d:5eff:fef0:fc64/128",
        "fe80::/10",
    ]);

    assert_eq!(
        strings(&merge(&rs)),
        ["10.0.0.0/31", "10.0.0.4-10.0.0.99", "fe80::/10"]
    );
}

#[test]
fn test_merge_empty() {
    let empty: [IpRange; 0] = [];
    assert!(merge(&empty).is_empty());

    let absent: [Option<IpRange>; 2] = [None, None];
    assert!(merge(&absent).is_empty());
}

#[test]
fn test_merge_skips_absent() {
    let rs = [None, Some(range("1.2.3.4-5.6.7.8"))];
    assert_eq!(merge(&rs), [range("1.2.3.4-5.6.7.8")]);

    let rs = [
        None,
        None,
        Some(range("::/64")),
        None,
        Some(range("1.2.3.4-5.6.7.8")),
    ];
    assert_eq!(merge(&rs), [range("1.2.3.4-5.6.7.8"), range("::/64")]);
}

#[test]
fn test_merge_overlap_and_adjacent() {
    let cases: [(&[&str], &[&str]); 5] = [
        // partial overlap
        (&["1.2.3.4-5.6.7.8", "5.6.7.0-10.0.0.0"], &["1.2.3.4-10.0.0.0"]),
        // adjacent
        (&["1.2.3.4-5.6.7.8", "5.6.7.9-10.0.0.0"], &["1.2.3.4-10.0.0.0"]),
        (&["2001:db8::4/126", "2001:db8::8/127"], &["2001:db8::4-2001:db8::9"]),
        // gap of one address stays
        (&["10.0.0.0-10.0.0.4", "10.0.0.6-10.0.0.9"], &["10.0.0.0-10.0.0.4", "10.0.0.6-10.0.0.9"]),
        // duplicates
        (&["10.0.0.0/8", "10.0.0.0/8", "10.0.0.0/8"], &["10.0.0.0/8"]),
    ];

    for (input, want) in cases {
        assert_eq!(strings(&merge(&ranges(input))), want, "merge of {input:?}");
    }
}

#[test]
fn test_merge_supersets() {
    let rs = ranges(&[
        "0.0.0.0/0",
        "10.0.0.15/32",
        "10.0.0.16/28",
        "10.0.0.32/27",
        "10.0.0.64/26",
        "10.0.0.128/26",
        "10.0.0.192/27",
        "134.60.0.0/16",
        "134.60.0.255/24",
        "193.197.62.192/29",
        "193.197.64.0/22",
        "193.197.228.0/22",
        "::/0",
        "::-::ffff",
        "2001:7c0:900::/48",
        "2001:7c0:900::/49",
        "2001:7c0:900::/52",
        "2001:7c0:900::/53",
        "2001:7c0:900:800::/56",
        "2001:7c0:900:800::/64",
    ]);

    assert_eq!(merge(&rs), ranges(&["0.0.0.0/0", "::/0"]));
}

#[test]
fn test_merge_single() {
    assert_eq!(merge(&[range("0.0.0.0/8")]), [range("0.0.0.0/8")]);
}

#[test]
fn test_merge_top_of_address_space() {
    // no wraparound from 255.255.255.255 to 0.0.0.0
    let rs = ranges(&["255.255.255.0/24", "0.0.0.0/24"]);
    assert_eq!(merge(&rs), ranges(&["0.0.0.0/24", "255.255.255.0/24"]));

    // nor across address families
    let rs = ranges(&["255.255.255.255", "::"]);
    assert_eq!(merge(&rs), ranges(&["255.255.255.255", "::"]));
}

#[test]
fn test_merge_leaves_input_untouched() {
    let rs = ranges(&["10.0.0.8/29", "10.0.0.0/29", "10.0.0.4"]);
    let before = rs.clone();
    assert_eq!(merge(&rs), [range("10.0.0.0/28")]);
    assert_eq!(rs, before);
}

// =============================================================================
// Remove Tests
// =============================================================================

#[test]
fn test_remove_v4_example() {
    let outer = range("192.168.2.0/24");
    let inner = ranges(&["192.168.2.0/26", "192.168.2.240-192.168.2.249"]);

    assert_eq!(
        strings(&outer.remove(&inner)),
        ["192.168.2.64-192.168.2.239", "192.168.2.250-192.168.2.255"]
    );
}

#[test]
fn test_remove_v6_example() {
    let outer = range("2001:db8:de00::/40");
    let inner = ranges(&["2001:db8:dea0::/44"]);

    assert_eq!(
        strings(&outer.remove(&inner)),
        [
            "2001:db8:de00::-2001:db8:de9f:ffff:ffff:ffff:ffff:ffff",
            "2001:db8:deb0::-2001:db8:deff:ffff:ffff:ffff:ffff:ffff",
        ]
    );
}

#[test]
fn test_remove_nothing() {
    let r = range("::/0");
    let none: [IpRange; 0] = [];
    assert_eq!(r.remove(&none), [r]);

    let absent: [Option<IpRange>; 1] = [None];
    assert_eq!(r.remove(&absent), [r]);
}

#[test]
fn test_remove_self() {
    let r = range("::/0");
    assert!(r.remove(&[r]).is_empty());
}

#[test]
fn test_remove_covering() {
    let r = range("10.0.0.0/16");
    assert!(r.remove(&[range("10.0.0.0/8")]).is_empty());
}

#[test]
fn test_remove_disjoint() {
    let r = range("10.0.0.0/16");
    // left, right and in between of the subtrahends
    assert_eq!(r.remove(&[range("11.0.0.0/8")]), [r]);
    assert_eq!(r.remove(&[range("9.0.0.0/8")]), [r]);
    assert_eq!(r.remove(&ranges(&["9.0.0.0/8", "11.0.0.0/8"])), [r]);
    // other family
    assert_eq!(r.remove(&[range("::/0")]), [r]);
}

#[test]
fn test_remove_corner_cases() {
    let cases = [
        // overflow: the subtrahend ends at the top of the address space
        ("0.0.0.0/0", "255.255.255.255", "0.0.0.0-255.255.255.254"),
        ("::/0", "ffff::/16", "::-fffe:ffff:ffff:ffff:ffff:ffff:ffff:ffff"),
        // cursor moves behind last
        ("10.0.0.0/8", "10.128.0.0/9", "10.0.0.0/9"),
        // left overlap
        ("10.0.0.5-10.0.0.15", "10.0.0.3-10.0.0.10", "10.0.0.11-10.0.0.15"),
        ("2001:db8::17-2001:db8::177", "2001:db8::14-2001:db8::137", "2001:db8::138-2001:db8::177"),
        // right overlap
        ("10.0.0.4-10.0.0.15", "10.0.0.6-10.0.0.19", "10.0.0.4-10.0.0.5"),
        ("2001:db8::17-2001:db8::177", "2001:db8::3f-2001:db8::fff", "2001:db8::17-2001:db8::3e"),
        // bottom of the address space
        ("0.0.0.0/8", "0.0.0.0", "0.0.0.1-0.255.255.255"),
        ("0.0.0.0/8", "0.0.0.1-0.255.255.255", "0.0.0.0"),
        ("::/112", "::1-::ffff", "::"),
    ];

    for (r, sub, want) in cases {
        assert_eq!(range(r).remove(&[range(sub)]), [range(want)], "{r} - {sub}");
    }
}

#[test]
fn test_remove_iana_v6() {
    let outer = range("::/0");
    let inner = ranges(&[
        "0000::/8",
        "0100::/8",
        "0200::/7",
        "0400::/6",
        "0800::/5",
        "1000::/4",
        "2000::/3",
        "4000::/3",
        "8000::/3",
        "a000::/3",
        "c000::/3",
        "e000::/4",
        "f000::/5",
        "f800::/6",
        "fe00::/9",
        "fe80::/10",
        "fec0::/10",
        "ff00::/8",
    ]);

    assert_eq!(outer.remove(&inner), ranges(&["6000::/3", "fc00::/7"]));
}

#[test]
fn test_remove_unsorted_overlapping_subtrahends() {
    let outer = range("10.0.0.0/24");
    let inner = [
        Some(range("10.0.0.200-10.0.0.210")),
        None,
        Some(range("10.0.0.10-10.0.0.20")),
        Some(range("10.0.0.15-10.0.0.30")),
        Some(range("10.0.0.205-10.0.0.255")),
    ];

    assert_eq!(
        strings(&outer.remove(&inner)),
        ["10.0.0.0-10.0.0.9", "10.0.0.31-10.0.0.199"]
    );
}

// =============================================================================
// Logging Tests
// =============================================================================

mod logging {
    use super::*;
    use std::fmt;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Metadata, Subscriber};

    /// Collects the `remaining` field of every event.
    #[derive(Clone, Default)]
    struct Remaining(Arc<Mutex<Vec<u64>>>);

    struct RemainingVisitor(Option<u64>);

    impl Visit for RemainingVisitor {
        fn record_u64(&mut self, field: &Field, value: u64) {
            if field.name() == "remaining" {
                self.0 = Some(value);
            }
        }

        fn record_debug(&mut self, _: &Field, _: &dyn fmt::Debug) {}
    }

    impl Subscriber for Remaining {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let mut visitor = RemainingVisitor(None);
            event.record(&mut visitor);
            if let Some(n) = visitor.0 {
                self.0.lock().unwrap().push(n);
            }
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    #[test]
    fn test_remove_records_remaining_on_every_exit() {
        let cases = [
            // nothing to remove, or disjoint
            ("10.0.0.0/16", "11.0.0.0/8", 1),
            // subtrahend covers the rest
            ("10.0.0.0/16", "10.0.0.0/8", 0),
            // subtrahend ends at the top of the address space
            ("0.0.0.0/0", "255.255.255.0/24", 1),
            // cursor moves behind last
            ("10.0.0.0/24", "10.0.0.128/25", 1),
            // walk runs to completion
            ("10.0.0.0/8", "10.1.0.0/16", 2),
        ];

        for (r, sub, want) in cases {
            let remaining = Remaining::default();
            let got = tracing::subscriber::with_default(remaining.clone(), || {
                range(r).remove(&[range(sub)])
            });

            assert_eq!(got.len() as u64, want, "{r} - {sub}");
            assert_eq!(*remaining.0.lock().unwrap(), [want], "{r} - {sub}");
        }
    }
}

// =============================================================================
// Property-Based Tests
// =============================================================================

mod proptest_tests {
    use super::*;
    use crate::addr;
    use proptest::prelude::*;
    use std::net::{IpAddr, Ipv4Addr};

    // Ranges inside 10.0.0.0/23, small enough to check address by address.
    const BASE: u32 = 0x0A00_0000;
    const SPAN: u32 = 512;

    fn window_range() -> impl Strategy<Value = IpRange> {
        (0..SPAN, 0..SPAN).prop_map(|(a, b)| {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            IpRange::from_addrs(ip(lo), ip(hi)).unwrap()
        })
    }

    fn ip(offset: u32) -> IpAddr {
        Ipv4Addr::from(BASE + offset).into()
    }

    fn covered(rs: &[IpRange], offset: u32) -> bool {
        rs.iter().any(|r| r.contains(ip(offset)))
    }

    proptest! {
        #[test]
        fn merge_is_idempotent(rs in prop::collection::vec(window_range(), 0..20)) {
            let once = merge(&rs);
            prop_assert_eq!(merge(&once), once);
        }

        #[test]
        fn merge_is_sorted_and_disjoint(rs in prop::collection::vec(window_range(), 0..20)) {
            let merged = merge(&rs);
            for w in merged.windows(2) {
                prop_assert!(w[0].last() < w[1].first());
                // not even adjacent
                prop_assert_ne!(addr::next(w[0].last()), Some(w[1].first()));
            }
        }

        #[test]
        fn merge_keeps_coverage(rs in prop::collection::vec(window_range(), 0..20)) {
            let merged = merge(&rs);
            for offset in 0..SPAN {
                prop_assert_eq!(covered(&merged, offset), covered(&rs, offset));
            }
        }

        #[test]
        fn remove_is_complement(r in window_range(), subs in prop::collection::vec(window_range(), 0..10)) {
            let rest = r.remove(&subs);
            for offset in 0..SPAN {
                let want = r.contains(ip(offset)) && !covered(&subs, offset);
                prop_assert_eq!(covered(&rest, offset), want);
            }
            // already normalized
            prop_assert_eq!(merge(&rest), rest);
        }

        #[test]
        fn remove_self_is_empty(r in window_range()) {
            prop_assert!(r.remove(&[r]).is_empty());
        }
    }
}
