//! Grouping keys for permission fragments.
//!
//! EC2 accepts one rule as a single permission with many CIDR blocks or as
//! many permissions with one block each. Both shapes share a [`RuleIdentity`]
//! and are merged before comparison.

use std::fmt::{self, Display, Formatter};

use serde::Serialize;

use crate::diff::{DiffOptions, PortSentinel};
use crate::IpPermission;

/// Port component of a [`RuleIdentity`].
///
/// `Unspecified` orders below every numeric port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PortKey {
    Unspecified,
    Port(i64),
}

impl PortKey {
    fn from_port(port: Option<i64>, sentinel: PortSentinel) -> Self {
        match (port, sentinel) {
            (None, _) => PortKey::Unspecified,
            (Some(-1), PortSentinel::FoldAllPorts) => PortKey::Unspecified,
            (Some(p), _) => PortKey::Port(p),
        }
    }
}

impl Display for PortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PortKey::Unspecified => write!(f, "*"),
            PortKey::Port(p) => write!(f, "{p}"),
        }
    }
}

/// The `(protocol, from, to)` tuple one logical rule is grouped under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RuleIdentity {
    /// Lower-cased protocol.
    pub protocol: String,
    pub from_port: PortKey,
    pub to_port: PortKey,
}

impl Display for RuleIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}", self.protocol, self.from_port, self.to_port)
    }
}

/// Derive the identity of `perm` with default options.
pub fn identity(perm: &IpPermission) -> RuleIdentity {
    identity_with_options(perm, &DiffOptions::default())
}

/// Derive the identity of `perm`.
pub fn identity_with_options(perm: &IpPermission, opts: &DiffOptions) -> RuleIdentity {
    RuleIdentity {
        protocol: protocol_key(&perm.ip_protocol, opts),
        from_port: PortKey::from_port(perm.from_port, opts.port_sentinel),
        to_port: PortKey::from_port(perm.to_port, opts.port_sentinel),
    }
}

fn protocol_key(protocol: &str, opts: &DiffOptions) -> String {
    let lower = protocol.to_lowercase();
    if !opts.protocol_aliases {
        return lower;
    }
    match lower.as_str() {
        "6" => "tcp".to_string(),
        "17" => "udp".to_string(),
        "1" => "icmp".to_string(),
        "58" => "icmpv6".to_string(),
        "all" => "-1".to_string(),
        _ => lower,
    }
}
