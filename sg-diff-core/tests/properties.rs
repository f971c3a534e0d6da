//! Property-based tests for the permission differ.
//!
//! Inputs are drawn from small value pools so identities and sub-rule items
//! collide often:
//! - diffing a list against itself is empty
//! - swapping desired and actual swaps add and remove
//! - permuting or fragmenting the input does not change the result
//! - canonical output never repeats an item

use std::collections::HashSet;

use proptest::prelude::*;
use sg_diff_core::{
    assemble, canonicalize, diff, diff_permissions, IpPermission, IpRange, Ipv6Range,
    PrefixListId, UserIdGroupPair,
};

fn description_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec!["office", "vpn"]).prop_map(String::from))
}

fn ip_range_strategy() -> impl Strategy<Value = IpRange> {
    (
        prop::sample::select(vec!["10.0.0.0/24", "192.168.0.1/32", "0.0.0.0/0"]),
        description_strategy(),
    )
        .prop_map(|(cidr, description)| IpRange {
            cidr_ip: cidr.to_string(),
            description,
        })
}

fn ipv6_range_strategy() -> impl Strategy<Value = Ipv6Range> {
    prop::sample::select(vec!["::/0", "2001:db8::/32"]).prop_map(Ipv6Range::new)
}

fn prefix_list_strategy() -> impl Strategy<Value = PrefixListId> {
    (prop::sample::select(vec!["pl-1", "pl-2"]), description_strategy()).prop_map(
        |(id, description)| PrefixListId {
            prefix_list_id: id.to_string(),
            description,
        },
    )
}

fn group_pair_strategy() -> impl Strategy<Value = UserIdGroupPair> {
    (
        prop::sample::select(vec!["sg-a", "sg-b"]),
        prop::option::of(Just("123456789012".to_string())),
        description_strategy(),
    )
        .prop_map(|(group, user_id, description)| UserIdGroupPair {
            group_id: Some(group.to_string()),
            user_id,
            description,
            ..UserIdGroupPair::default()
        })
}

fn port_strategy() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(prop::sample::select(vec![-1i64, 22, 443]))
}

fn permission_strategy(protocols: Vec<&'static str>) -> impl Strategy<Value = IpPermission> {
    (
        prop::sample::select(protocols),
        port_strategy(),
        port_strategy(),
        prop::collection::vec(ip_range_strategy(), 0..4),
        prop::collection::vec(ipv6_range_strategy(), 0..2),
        prop::collection::vec(prefix_list_strategy(), 0..2),
        prop::collection::vec(group_pair_strategy(), 0..3),
    )
        .prop_map(
            |(protocol, from_port, to_port, ip_ranges, ipv6_ranges, prefix_list_ids, pairs)| {
                IpPermission {
                    ip_protocol: protocol.to_string(),
                    from_port,
                    to_port,
                    ip_ranges,
                    ipv6_ranges,
                    prefix_list_ids,
                    user_id_group_pairs: pairs,
                }
            },
        )
}

// Mixed-case protocols; the stored spelling depends on input order.
fn mixed_case_list() -> impl Strategy<Value = Vec<IpPermission>> {
    prop::collection::vec(permission_strategy(vec!["tcp", "TCP", "udp", "-1"]), 0..8)
}

// Single spelling per protocol, so results are comparable after reordering.
fn lower_case_list() -> impl Strategy<Value = Vec<IpPermission>> {
    prop::collection::vec(permission_strategy(vec!["tcp", "udp", "-1"]), 0..8)
}

fn fragment(perms: &[IpPermission]) -> Vec<IpPermission> {
    let mut out = Vec::new();
    for perm in perms {
        let bare = IpPermission {
            ip_protocol: perm.ip_protocol.clone(),
            from_port: perm.from_port,
            to_port: perm.to_port,
            ..IpPermission::default()
        };
        out.extend(perm.ip_ranges.iter().cloned().map(|r| bare.clone().with_ip_range(r)));
        out.extend(perm.ipv6_ranges.iter().cloned().map(|r| bare.clone().with_ipv6_range(r)));
        out.extend(
            perm.prefix_list_ids
                .iter()
                .cloned()
                .map(|p| bare.clone().with_prefix_list(p)),
        );
        out.extend(
            perm.user_id_group_pairs
                .iter()
                .cloned()
                .map(|g| bare.clone().with_group_pair(g)),
        );
    }
    out
}

#[test]
fn prop_diff_against_self_is_empty() {
    proptest!(|(perms in mixed_case_list())| {
        let set = canonicalize(&perms);
        let (add, remove) = diff(&set, &set);
        prop_assert_eq!(add.item_count(), 0);
        prop_assert_eq!(remove.item_count(), 0);
        prop_assert!(diff_permissions(&perms, &perms).is_empty());
    });
}

#[test]
fn prop_diff_is_anti_symmetric() {
    proptest!(|(a in mixed_case_list(), b in mixed_case_list())| {
        let (ab_add, ab_remove) = diff(&canonicalize(&a), &canonicalize(&b));
        let (ba_add, ba_remove) = diff(&canonicalize(&b), &canonicalize(&a));
        prop_assert_eq!(&ab_add, &ba_remove);
        prop_assert_eq!(&ab_remove, &ba_add);

        let forward = diff_permissions(&a, &b);
        let backward = diff_permissions(&b, &a);
        prop_assert_eq!(forward.add, backward.remove);
        prop_assert_eq!(forward.remove, backward.add);
    });
}

#[test]
fn prop_permutation_does_not_change_result() {
    let inputs = (lower_case_list(), lower_case_list()).prop_flat_map(|(a, b)| {
        (
            Just(a.clone()),
            Just(a).prop_shuffle(),
            Just(b.clone()),
            Just(b).prop_shuffle(),
        )
    });
    proptest!(|((a, a_shuffled, b, b_shuffled) in inputs)| {
        prop_assert_eq!(canonicalize(&a), canonicalize(&a_shuffled));
        prop_assert_eq!(diff_permissions(&a, &b), diff_permissions(&a_shuffled, &b_shuffled));
    });
}

#[test]
fn prop_fragmentation_does_not_change_result() {
    proptest!(|(a in lower_case_list(), b in lower_case_list())| {
        let a_split = fragment(&a);
        let b_split = fragment(&b);
        prop_assert_eq!(
            assemble(&canonicalize(&a)),
            assemble(&canonicalize(&a_split))
        );
        prop_assert_eq!(diff_permissions(&a, &b), diff_permissions(&a_split, &b_split));
    });
}

#[test]
fn prop_canonical_items_are_unique_and_sorted() {
    proptest!(|(perms in mixed_case_list())| {
        for perm in assemble(&canonicalize(&perms)) {
            let unique: HashSet<&IpRange> = perm.ip_ranges.iter().collect();
            prop_assert_eq!(unique.len(), perm.ip_ranges.len());
            let unique: HashSet<&UserIdGroupPair> = perm.user_id_group_pairs.iter().collect();
            prop_assert_eq!(unique.len(), perm.user_id_group_pairs.len());

            let mut sorted = perm.ip_ranges.clone();
            sorted.sort();
            prop_assert_eq!(sorted, perm.ip_ranges.clone());
            prop_assert!(perm.has_rules());
        }
    });
}

#[test]
fn prop_protocol_case_never_splits_identities() {
    proptest!(|(perms in lower_case_list())| {
        let upper: Vec<IpPermission> = perms
            .iter()
            .cloned()
            .map(|mut p| {
                p.ip_protocol = p.ip_protocol.to_uppercase();
                p
            })
            .collect();
        prop_assert!(diff_permissions(&perms, &upper).is_empty());
    });
}
