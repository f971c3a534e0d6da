//! Canonicalize and diff EC2 security group permission sets.
//!
//! A permission list is folded into a [`CanonicalRuleSet`] keyed by
//! [`RuleIdentity`] (protocol and port range), with each sub-rule kind
//! deduplicated by value. Two canonical sets are compared per identity and the
//! result is assembled back into wire-shaped permissions to authorize and
//! revoke.
//!
//! Everything here is pure: no I/O besides the explicit file helpers in
//! [`parser`] and [`writer`], and no state kept between calls.

pub mod assemble;
pub mod canonical;
pub mod diff;
pub mod format;
pub mod identity;
pub mod model;
pub mod parser;
pub mod writer;

pub use assemble::assemble;
pub use canonical::{
    canonicalize, canonicalize_with_options, CanonicalRule, CanonicalRuleSet, ValueSet,
};
pub use diff::{
    diff, diff_permissions, diff_permissions_with_options, DiffOptions, PermissionDelta,
    PortSentinel,
};
pub use format::{format_json, format_permissions, format_summary, format_text};
pub use identity::{identity, identity_with_options, PortKey, RuleIdentity};
pub use model::{IpPermission, IpRange, Ipv6Range, PrefixListId, UserIdGroupPair};
pub use parser::{parse_permissions, parse_permissions_file, ParseError};
pub use writer::{write_permissions, write_permissions_file, WriteError};
