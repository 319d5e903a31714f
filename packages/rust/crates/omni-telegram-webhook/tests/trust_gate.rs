#![allow(missing_docs)]

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use anyhow::Result;
use omni_telegram_webhook::TrustGate;
use proptest::prelude::*;

fn v4_member(addr: Ipv4Addr, net: Ipv4Addr, prefix: u8) -> bool {
    let mask = if prefix == 0 {
        0
    } else {
        u32::MAX << (32 - u32::from(prefix))
    };
    (u32::from(addr) & mask) == (u32::from(net) & mask)
}

fn v6_member(addr: Ipv6Addr, net: Ipv6Addr, prefix: u8) -> bool {
    let mask = if prefix == 0 {
        0
    } else {
        u128::MAX << (128 - u32::from(prefix))
    };
    (u128::from(addr) & mask) == (u128::from(net) & mask)
}

/// Reference membership, written independently of the gate.
fn oracle(addr: IpAddr, ranges: &[(IpAddr, u8)]) -> bool {
    let inside = |addr: IpAddr| {
        ranges.iter().any(|(net, prefix)| match (addr, net) {
            (IpAddr::V4(a), IpAddr::V4(n)) => v4_member(a, *n, *prefix),
            (IpAddr::V6(a), IpAddr::V6(n)) => v6_member(a, *n, *prefix),
            _ => false,
        })
    };
    inside(addr) || inside(addr.to_canonical())
}

fn arb_range() -> impl Strategy<Value = (IpAddr, u8)> {
    prop_oneof![
        (any::<u32>(), 0u8..=32)
            .prop_map(|(bits, prefix)| (IpAddr::V4(Ipv4Addr::from(bits)), prefix)),
        (any::<u128>(), 0u8..=128)
            .prop_map(|(bits, prefix)| (IpAddr::V6(Ipv6Addr::from(bits)), prefix)),
    ]
}

fn arb_addr() -> impl Strategy<Value = IpAddr> {
    prop_oneof![
        any::<u32>().prop_map(|bits| IpAddr::V4(Ipv4Addr::from(bits))),
        any::<u128>().prop_map(|bits| IpAddr::V6(Ipv6Addr::from(bits))),
    ]
}

/// Address sharing the first `prefix` bits with `net` (so it is a member).
fn member_of(net: IpAddr, prefix: u8, noise: u128) -> IpAddr {
    match net {
        IpAddr::V4(n) => {
            let host_mask = if prefix == 0 {
                u32::MAX
            } else {
                !(u32::MAX << (32 - u32::from(prefix)))
            };
            let bits = (u32::from(n) & !host_mask) | ((noise as u32) & host_mask);
            IpAddr::V4(Ipv4Addr::from(bits))
        }
        IpAddr::V6(n) => {
            let host_mask = if prefix == 0 {
                u128::MAX
            } else {
                !(u128::MAX << (128 - u32::from(prefix)))
            };
            let bits = (u128::from(n) & !host_mask) | (noise & host_mask);
            IpAddr::V6(Ipv6Addr::from(bits))
        }
    }
}

fn gate_for(ranges: &[(IpAddr, u8)]) -> Result<TrustGate> {
    let cidrs: Vec<String> = ranges
        .iter()
        .map(|(net, prefix)| format!("{net}/{prefix}"))
        .collect();
    Ok(TrustGate::from_cidrs(&cidrs)?)
}

proptest! {
    #[test]
    fn allowed_iff_inside_some_range(
        ranges in prop::collection::vec(arb_range(), 0..6),
        addr in arb_addr(),
    ) {
        let gate = gate_for(&ranges).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(gate.is_allowed(addr), oracle(addr, &ranges));
    }

    #[test]
    fn addresses_built_inside_a_range_are_allowed(
        ranges in prop::collection::vec(arb_range(), 1..6),
        pick in any::<prop::sample::Index>(),
        noise in any::<u128>(),
    ) {
        let (net, prefix) = ranges[pick.index(ranges.len())];
        let addr = member_of(net, prefix, noise);
        let gate = gate_for(&ranges).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(gate.is_allowed(addr));
    }
}

#[test]
fn ipv4_and_ipv6_literals() -> Result<()> {
    let gate = TrustGate::from_cidrs(["10.0.0.0/8", "2001:db8::/32"])?;
    assert!(gate.is_allowed("10.1.2.3".parse()?));
    assert!(!gate.is_allowed("203.0.113.5".parse()?));
    assert!(gate.is_allowed("2001:db8:1::7".parse()?));
    assert!(!gate.is_allowed("2001:db9::1".parse()?));
    Ok(())
}

#[test]
fn empty_set_denies_everything() -> Result<()> {
    let gate = TrustGate::from_cidrs(Vec::<String>::new())?;
    assert!(gate.is_empty());
    assert!(!gate.is_allowed("10.1.2.3".parse()?));
    assert!(!gate.is_allowed("::1".parse()?));
    Ok(())
}
