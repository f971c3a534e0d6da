//! Declared security group state.
//!
//! A declaration is written by hand, usually as TOML:
//!
//! ```toml
//! name = "web"
//! description = "web tier"
//! vpc_id = "vpc-0a1b2c3d"
//!
//! [[ingress]]
//! protocol = "tcp"
//! from_port = 443
//! to_port = 443
//! cidr_blocks = [{ cidr = "0.0.0.0/0", description = "https" }]
//! ```
//!
//! JSON with the same snake_case keys is accepted for files ending in
//! `.json`. Rules map one-to-one onto EC2 permissions; fragments of one rule
//! may be declared separately and are merged when diffed.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sg_diff_core::{IpPermission, IpRange, Ipv6Range, PrefixListId, UserIdGroupPair};

use crate::error::LoadError;

/// Desired state of one security group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecurityGroupDeclaration {
    pub name: String,
    /// Compared against the observed description when set.
    #[serde(default)]
    pub description: Option<String>,
    /// Compared against the observed VPC when set.
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub ingress: Vec<RuleDecl>,
    #[serde(default)]
    pub egress: Vec<RuleDecl>,
}

impl SecurityGroupDeclaration {
    pub fn ingress_permissions(&self) -> Vec<IpPermission> {
        self.ingress.iter().map(RuleDecl::to_permission).collect()
    }

    pub fn egress_permissions(&self) -> Vec<IpPermission> {
        self.egress.iter().map(RuleDecl::to_permission).collect()
    }
}

/// One declared rule (or fragment of a rule).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDecl {
    pub protocol: String,
    #[serde(default)]
    pub from_port: Option<i64>,
    #[serde(default)]
    pub to_port: Option<i64>,
    #[serde(default)]
    pub cidr_blocks: Vec<CidrDecl>,
    #[serde(default)]
    pub ipv6_cidr_blocks: Vec<CidrDecl>,
    #[serde(default)]
    pub prefix_lists: Vec<PrefixListDecl>,
    #[serde(default)]
    pub peer_groups: Vec<PeerGroupDecl>,
}

impl RuleDecl {
    pub fn to_permission(&self) -> IpPermission {
        IpPermission {
            ip_protocol: self.protocol.clone(),
            from_port: self.from_port,
            to_port: self.to_port,
            ip_ranges: self
                .cidr_blocks
                .iter()
                .map(|c| IpRange {
                    cidr_ip: c.cidr.clone(),
                    description: c.description.clone(),
                })
                .collect(),
            ipv6_ranges: self
                .ipv6_cidr_blocks
                .iter()
                .map(|c| Ipv6Range {
                    cidr_ipv6: c.cidr.clone(),
                    description: c.description.clone(),
                })
                .collect(),
            prefix_list_ids: self
                .prefix_lists
                .iter()
                .map(|p| PrefixListId {
                    prefix_list_id: p.id.clone(),
                    description: p.description.clone(),
                })
                .collect(),
            user_id_group_pairs: self
                .peer_groups
                .iter()
                .map(PeerGroupDecl::to_group_pair)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CidrDecl {
    pub cidr: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PrefixListDecl {
    pub id: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerGroupDecl {
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,
    /// Account owning the peer group.
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub vpc_peering_connection_id: Option<String>,
    #[serde(default)]
    pub peering_status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl PeerGroupDecl {
    fn to_group_pair(&self) -> UserIdGroupPair {
        UserIdGroupPair {
            group_id: self.group_id.clone(),
            group_name: self.group_name.clone(),
            user_id: self.owner_id.clone(),
            vpc_id: self.vpc_id.clone(),
            vpc_peering_connection_id: self.vpc_peering_connection_id.clone(),
            peering_status: self.peering_status.clone(),
            description: self.description.clone(),
        }
    }
}

/// Load a declaration, choosing JSON for `.json` files and TOML otherwise.
pub fn load_declaration(path: &Path) -> Result<SecurityGroupDeclaration, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        parse_declaration_json(&raw, path.display().to_string())
    } else {
        parse_declaration_toml(&raw, path.display().to_string())
    }
}

pub fn parse_declaration_toml(
    raw: &str,
    path: String,
) -> Result<SecurityGroupDeclaration, LoadError> {
    toml::from_str(raw).map_err(|source| LoadError::Toml { path, source })
}

pub fn parse_declaration_json(
    raw: &str,
    path: String,
) -> Result<SecurityGroupDeclaration, LoadError> {
    serde_json::from_str(raw).map_err(|source| LoadError::Json { path, source })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use sg_diff_core::{IpPermission, IpRange, UserIdGroupPair};

    use super::{load_declaration, parse_declaration_json, parse_declaration_toml};
    use crate::error::LoadError;

    #[test]
    fn toml_rules_convert_to_permissions() {
        let decl = parse_declaration_toml(
            r#"
name = "app"

[[ingress]]
protocol = "tcp"
from_port = 8080
to_port = 8080
cidr_blocks = [{ cidr = "10.0.0.0/8", description = "internal" }]
peer_groups = [{ group_id = "sg-lb", owner_id = "123456789012" }]
"#,
            "inline".to_string(),
        )
        .expect("declaration should parse");

        assert_eq!(decl.description, None);
        assert!(decl.egress.is_empty());

        let mut pair = UserIdGroupPair::group("sg-lb");
        pair.user_id = Some("123456789012".to_string());
        assert_eq!(
            decl.ingress_permissions(),
            vec![IpPermission::new("tcp")
                .with_ports(8080, 8080)
                .with_ip_range(IpRange::new("10.0.0.0/8").with_description("internal"))
                .with_group_pair(pair)]
        );
    }

    #[test]
    fn rejects_unknown_rule_fields() {
        let err = parse_declaration_toml(
            "name = \"app\"\n[[ingress]]\nprotocol = \"tcp\"\ncidrs = []\n",
            "inline".to_string(),
        )
        .expect_err("typo should be rejected");
        assert!(matches!(err, LoadError::Toml { .. }));
    }

    #[test]
    fn json_declarations_use_the_same_fields() {
        let decl = parse_declaration_json(
            r#"{"name":"app","egress":[{"protocol":"-1","cidr_blocks":[{"cidr":"0.0.0.0/0"}]}]}"#,
            "inline".to_string(),
        )
        .expect("json should parse");
        let egress = decl.egress_permissions();
        assert_eq!(egress.len(), 1);
        assert_eq!(egress[0].from_port, None);
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let json_path = dir.path().join("sg.json");
        fs::write(&json_path, r#"{"name":"from-json"}"#).expect("write json");
        let toml_path = dir.path().join("sg.toml");
        fs::write(&toml_path, "name = \"from-toml\"\n").expect("write toml");

        assert_eq!(load_declaration(&json_path).expect("json").name, "from-json");
        assert_eq!(load_declaration(&toml_path).expect("toml").name, "from-toml");
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load_declaration(&dir.path().join("absent.toml")).expect_err("should fail");
        match err {
            LoadError::Io { path, .. } => assert!(path.ends_with("absent.toml")),
            other => panic!("unexpected error variant: {other}"),
        }
    }
}
