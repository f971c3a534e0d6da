//! Canonical (merged, deduplicated) form of a permission list.
//!
//! [`canonicalize`] folds fragments that share a [`RuleIdentity`] into one
//! [`CanonicalRule`]. Each of the four sub-rule kinds lives in a [`ValueSet`],
//! so membership is by value and inserting a duplicate is a no-op.

use std::collections::btree_map;
use std::collections::hash_set;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;

use tracing::debug;

use crate::diff::DiffOptions;
use crate::identity::{identity_with_options, RuleIdentity};
use crate::{IpPermission, IpRange, Ipv6Range, PrefixListId, UserIdGroupPair};

/// Hash-backed set of sub-rule items with by-value membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSet<T: Eq + Hash> {
    items: HashSet<T>,
}

impl<T: Eq + Hash> Default for ValueSet<T> {
    fn default() -> Self {
        Self {
            items: HashSet::new(),
        }
    }
}

impl<T: Eq + Hash + Ord + Clone> ValueSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> hash_set::Iter<'_, T> {
        self.items.iter()
    }

    /// Items of `self` that are not in `other`.
    pub fn difference(&self, other: &ValueSet<T>) -> ValueSet<T> {
        self.items
            .iter()
            .filter(|item| !other.contains(item))
            .cloned()
            .collect()
    }

    /// Items in their natural ordering.
    pub fn to_sorted_vec(&self) -> Vec<T> {
        let mut out: Vec<T> = self.items.iter().cloned().collect();
        out.sort_unstable();
        out
    }
}

impl<T: Eq + Hash> FromIterator<T> for ValueSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash> Extend<T> for ValueSet<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

/// All sub-rules merged under one identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRule {
    /// Scalar fields as last observed for this identity.
    pub ip_protocol: String,
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub ip_ranges: ValueSet<IpRange>,
    pub ipv6_ranges: ValueSet<Ipv6Range>,
    pub prefix_list_ids: ValueSet<PrefixListId>,
    pub user_id_group_pairs: ValueSet<UserIdGroupPair>,
}

impl CanonicalRule {
    /// Fold one permission fragment into this rule.
    ///
    /// The caller must only merge fragments with the rule's identity. Scalar
    /// fields are overwritten; sub-rule items are unioned by value.
    pub fn merge(&mut self, perm: &IpPermission) {
        self.ip_protocol.clone_from(&perm.ip_protocol);
        self.from_port = perm.from_port;
        self.to_port = perm.to_port;

        self.ip_ranges.extend(perm.ip_ranges.iter().cloned());
        self.ipv6_ranges.extend(perm.ipv6_ranges.iter().cloned());
        self.prefix_list_ids
            .extend(perm.prefix_list_ids.iter().cloned());
        self.user_id_group_pairs
            .extend(perm.user_id_group_pairs.iter().cloned());
    }

    /// Sub-rules of `self` missing from `other`, keeping `self`'s scalars.
    pub fn difference(&self, other: &CanonicalRule) -> CanonicalRule {
        CanonicalRule {
            ip_protocol: self.ip_protocol.clone(),
            from_port: self.from_port,
            to_port: self.to_port,
            ip_ranges: self.ip_ranges.difference(&other.ip_ranges),
            ipv6_ranges: self.ipv6_ranges.difference(&other.ipv6_ranges),
            prefix_list_ids: self.prefix_list_ids.difference(&other.prefix_list_ids),
            user_id_group_pairs: self
                .user_id_group_pairs
                .difference(&other.user_id_group_pairs),
        }
    }

    pub fn item_count(&self) -> usize {
        self.ip_ranges.len()
            + self.ipv6_ranges.len()
            + self.prefix_list_ids.len()
            + self.user_id_group_pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Rebuild a wire permission with every item list sorted.
    pub fn to_permission(&self) -> IpPermission {
        IpPermission {
            ip_protocol: self.ip_protocol.clone(),
            from_port: self.from_port,
            to_port: self.to_port,
            ip_ranges: self.ip_ranges.to_sorted_vec(),
            ipv6_ranges: self.ipv6_ranges.to_sorted_vec(),
            prefix_list_ids: self.prefix_list_ids.to_sorted_vec(),
            user_id_group_pairs: self.user_id_group_pairs.to_sorted_vec(),
        }
    }
}

/// Canonical rules of one snapshot, ordered by identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRuleSet {
    rules: BTreeMap<RuleIdentity, CanonicalRule>,
}

impl CanonicalRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `perm` into the rule for `key`, creating the rule if needed.
    pub fn merge(&mut self, key: RuleIdentity, perm: &IpPermission) {
        self.rules.entry(key).or_default().merge(perm);
    }

    /// Replace the rule stored under `key`.
    pub fn insert(&mut self, key: RuleIdentity, rule: CanonicalRule) {
        self.rules.insert(key, rule);
    }

    pub fn get(&self, key: &RuleIdentity) -> Option<&CanonicalRule> {
        self.rules.get(key)
    }

    pub fn contains(&self, key: &RuleIdentity) -> bool {
        self.rules.contains_key(key)
    }

    /// Rules in identity order.
    pub fn iter(&self) -> btree_map::Iter<'_, RuleIdentity, CanonicalRule> {
        self.rules.iter()
    }

    /// Number of identities, including ones with no items.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Sub-rule items across every identity.
    pub fn item_count(&self) -> usize {
        self.rules.values().map(CanonicalRule::item_count).sum()
    }
}

impl<'a> IntoIterator for &'a CanonicalRuleSet {
    type Item = (&'a RuleIdentity, &'a CanonicalRule);
    type IntoIter = btree_map::Iter<'a, RuleIdentity, CanonicalRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Canonicalize `perms` with default options.
pub fn canonicalize(perms: &[IpPermission]) -> CanonicalRuleSet {
    canonicalize_with_options(perms, &DiffOptions::default())
}

/// Fold `perms`, in order, into a fresh [`CanonicalRuleSet`].
pub fn canonicalize_with_options(perms: &[IpPermission], opts: &DiffOptions) -> CanonicalRuleSet {
    let set = perms
        .iter()
        .fold(CanonicalRuleSet::new(), |mut acc, perm| {
            acc.merge(identity_with_options(perm, opts), perm);
            acc
        });

    debug!(
        fragments = perms.len(),
        identities = set.len(),
        items = set.item_count(),
        "canonicalized permissions"
    );
    set
}
