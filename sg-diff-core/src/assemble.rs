use crate::canonical::CanonicalRuleSet;
use crate::IpPermission;

/// Rebuild wire permissions from a canonical set, one per identity.
///
/// Identities without any sub-rule items are dropped, so a rule group that
/// matched completely never turns into an empty authorize or revoke call.
pub fn assemble(set: &CanonicalRuleSet) -> Vec<IpPermission> {
    set.iter()
        .filter(|(_, rule)| !rule.is_empty())
        .map(|(_, rule)| rule.to_permission())
        .collect()
}
