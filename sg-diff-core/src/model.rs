use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One wire-level permission block, shaped like EC2's `IpPermission`.
///
/// Field names serialize in the PascalCase used by the EC2 API and the
/// `aws ec2` CLI, so describe output can be read as-is and assembled deltas
/// can be handed to `--ip-permissions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpPermission {
    /// Protocol name or number. Compared case-insensitively, stored as given.
    #[serde(default)]
    pub ip_protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_ranges: Vec<IpRange>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ipv6_ranges: Vec<Ipv6Range>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefix_list_ids: Vec<PrefixListId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_id_group_pairs: Vec<UserIdGroupPair>,
}

impl IpPermission {
    /// Create a permission for `protocol` with no ports and no sub-rules.
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            ip_protocol: protocol.into(),
            ..Self::default()
        }
    }

    /// Set both ends of the port range.
    pub fn with_ports(mut self, from_port: i64, to_port: i64) -> Self {
        self.from_port = Some(from_port);
        self.to_port = Some(to_port);
        self
    }

    pub fn with_ip_range(mut self, range: IpRange) -> Self {
        self.ip_ranges.push(range);
        self
    }

    pub fn with_ipv6_range(mut self, range: Ipv6Range) -> Self {
        self.ipv6_ranges.push(range);
        self
    }

    pub fn with_prefix_list(mut self, prefix_list: PrefixListId) -> Self {
        self.prefix_list_ids.push(prefix_list);
        self
    }

    pub fn with_group_pair(mut self, pair: UserIdGroupPair) -> Self {
        self.user_id_group_pairs.push(pair);
        self
    }

    /// Total number of sub-rule items across all four kinds.
    pub fn item_count(&self) -> usize {
        self.ip_ranges.len()
            + self.ipv6_ranges.len()
            + self.prefix_list_ids.len()
            + self.user_id_group_pairs.len()
    }

    /// True when the permission carries at least one sub-rule item.
    pub fn has_rules(&self) -> bool {
        self.item_count() > 0
    }

    /// Human-readable `protocol from-to` label. Absent ports render as `*`.
    pub fn label(&self) -> String {
        format!(
            "{} {}-{}",
            self.ip_protocol,
            port_label(self.from_port),
            port_label(self.to_port)
        )
    }
}

fn port_label(port: Option<i64>) -> String {
    port.map_or_else(|| "*".to_string(), |p| p.to_string())
}

/// IPv4 CIDR sub-rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpRange {
    #[serde(default)]
    pub cidr_ip: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl IpRange {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr_ip: cidr.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// IPv6 CIDR sub-rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Ipv6Range {
    #[serde(default)]
    pub cidr_ipv6: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Ipv6Range {
    pub fn new(cidr: impl Into<String>) -> Self {
        Self {
            cidr_ipv6: cidr.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Managed prefix-list reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrefixListId {
    #[serde(default)]
    pub prefix_list_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrefixListId {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            prefix_list_id: id.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Reference to a peer security group.
///
/// Every field takes part in equality and ordering, so two references that
/// differ only in `description` are distinct rules.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "PascalCase")]
pub struct UserIdGroupPair {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
    /// Owning account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_peering_connection_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peering_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UserIdGroupPair {
    /// Reference a peer group by id.
    pub fn group(group_id: impl Into<String>) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Self::default()
        }
    }
}

fn write_description(f: &mut Formatter<'_>, description: &Option<String>) -> fmt::Result {
    match description {
        Some(d) => write!(f, " ({d})"),
        None => Ok(()),
    }
}

impl Display for IpRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "cidr {}", self.cidr_ip)?;
        write_description(f, &self.description)
    }
}

impl Display for Ipv6Range {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "cidr6 {}", self.cidr_ipv6)?;
        write_description(f, &self.description)
    }
}

impl Display for PrefixListId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "prefix-list {}", self.prefix_list_id)?;
        write_description(f, &self.description)
    }
}

impl Display for UserIdGroupPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let target = self
            .group_id
            .as_deref()
            .or(self.group_name.as_deref())
            .unwrap_or("?");
        write!(f, "group {target}")?;

        let extras = [
            ("name", self.group_name.as_deref().filter(|_| self.group_id.is_some())),
            ("owner", self.user_id.as_deref()),
            ("vpc", self.vpc_id.as_deref()),
            ("peering", self.vpc_peering_connection_id.as_deref()),
            ("status", self.peering_status.as_deref()),
        ];
        for (key, value) in extras {
            if let Some(value) = value {
                write!(f, " {key}={value}")?;
            }
        }
        write_description(f, &self.description)
    }
}
