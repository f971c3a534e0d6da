//! Observed security group state, as returned by
//! `aws ec2 describe-security-groups --output json`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sg_diff_core::IpPermission;
use tracing::debug;

use crate::error::LoadError;

/// One security group from a describe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObservedGroup {
    pub group_id: String,
    pub group_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vpc_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    /// Ingress rules.
    #[serde(default)]
    pub ip_permissions: Vec<IpPermission>,
    #[serde(default)]
    pub ip_permissions_egress: Vec<IpPermission>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ObservedDocument {
    Describe {
        #[serde(rename = "SecurityGroups")]
        security_groups: Vec<ObservedGroup>,
    },
    Single(ObservedGroup),
}

/// Load every group from a describe response (or a single group object).
pub fn load_observed(path: &Path) -> Result<Vec<ObservedGroup>, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_observed(&raw, path.display().to_string())
}

pub fn parse_observed(raw: &str, path: String) -> Result<Vec<ObservedGroup>, LoadError> {
    let doc: ObservedDocument =
        serde_json::from_str(raw).map_err(|source| LoadError::Json { path, source })?;
    let groups = match doc {
        ObservedDocument::Describe { security_groups } => security_groups,
        ObservedDocument::Single(group) => vec![group],
    };
    debug!(groups = groups.len(), "loaded observed security groups");
    Ok(groups)
}

/// Pick the group to compare against.
///
/// An explicit `selector` must match a group id or name. Without one, a lone
/// group is used as-is and otherwise the group named `declared_name` is chosen.
pub fn select_group(
    groups: Vec<ObservedGroup>,
    selector: Option<&str>,
    declared_name: &str,
) -> Result<ObservedGroup, LoadError> {
    if selector.is_none() && groups.len() == 1 {
        return groups
            .into_iter()
            .next()
            .ok_or_else(|| LoadError::GroupNotFound {
                selector: declared_name.to_string(),
            });
    }

    let wanted = selector.unwrap_or(declared_name);
    let mut matches: Vec<ObservedGroup> = groups
        .into_iter()
        .filter(|g| g.group_id == wanted || g.group_name == wanted)
        .collect();

    match matches.len() {
        0 => Err(LoadError::GroupNotFound {
            selector: wanted.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => {
            // Ids are unique; several hits means the name is shared across VPCs.
            if let Some(idx) = matches.iter().position(|g| g.group_id == wanted) {
                return Ok(matches.swap_remove(idx));
            }
            Err(LoadError::AmbiguousGroup {
                selector: wanted.to_string(),
                count,
            })
        }
    }
}
