use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::assemble::assemble;
use crate::canonical::{canonicalize_with_options, CanonicalRuleSet};
use crate::diff::result::PermissionDelta;
use crate::IpPermission;

/// How an explicit `-1` port relates to an absent port when grouping rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortSentinel {
    /// Absent and `-1` are different identities.
    #[default]
    Distinct,
    /// `-1` groups with absent ports. EC2 echoes all-port rules back without
    /// ports, so this matches what a describe call returns.
    FoldAllPorts,
}

/// Configures identity derivation for canonicalization and diffing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    pub port_sentinel: PortSentinel,
    /// Key numeric protocols (`6`, `17`, `1`, `58`) and `all` under their
    /// names (`tcp`, `udp`, `icmp`, `icmpv6`, `-1`).
    ///
    /// Folded fragments keep the spelling of the last one merged, so the
    /// stored protocol may be `6` for a rule that also has `tcp` fragments.
    /// EC2 accepts either form.
    pub protocol_aliases: bool,
}

/// Compare two canonical sets and return `(to_add, to_remove)`.
///
/// Identities present on both sides yield a rule in each output, possibly
/// with no items. Identities on one side only yield the whole rule on that
/// side's output.
pub fn diff(
    desired: &CanonicalRuleSet,
    actual: &CanonicalRuleSet,
) -> (CanonicalRuleSet, CanonicalRuleSet) {
    let mut to_add = CanonicalRuleSet::new();
    let mut to_remove = CanonicalRuleSet::new();

    for (key, want) in desired {
        match actual.get(key) {
            Some(have) => {
                let add = want.difference(have);
                let remove = have.difference(want);
                if !add.is_empty() || !remove.is_empty() {
                    trace!(
                        identity = %key,
                        add = add.item_count(),
                        remove = remove.item_count(),
                        "rule changed"
                    );
                }
                to_add.insert(key.clone(), add);
                to_remove.insert(key.clone(), remove);
            }
            None => {
                trace!(identity = %key, items = want.item_count(), "rule only desired");
                to_add.insert(key.clone(), want.clone());
            }
        }
    }

    for (key, have) in actual {
        if !desired.contains(key) {
            trace!(identity = %key, items = have.item_count(), "rule only actual");
            to_remove.insert(key.clone(), have.clone());
        }
    }

    (to_add, to_remove)
}

/// Diff two permission lists with default options.
pub fn diff_permissions(desired: &[IpPermission], actual: &[IpPermission]) -> PermissionDelta {
    diff_permissions_with_options(desired, actual, &DiffOptions::default())
}

/// Canonicalize both lists, diff them and assemble the delta.
pub fn diff_permissions_with_options(
    desired: &[IpPermission],
    actual: &[IpPermission],
    opts: &DiffOptions,
) -> PermissionDelta {
    let want = canonicalize_with_options(desired, opts);
    let have = canonicalize_with_options(actual, opts);
    let (to_add, to_remove) = diff(&want, &have);

    let delta = PermissionDelta {
        add: assemble(&to_add),
        remove: assemble(&to_remove),
    };
    debug!(
        add_entries = delta.add.len(),
        add_items = delta.add_items(),
        remove_entries = delta.remove.len(),
        remove_items = delta.remove_items(),
        "computed permission delta"
    );
    delta
}
