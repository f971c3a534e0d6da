//! Security group level plan: ingress and egress deltas plus metadata drift.

use serde::Serialize;
use sg_diff_core::{diff_permissions_with_options, DiffOptions, PermissionDelta};
use tracing::{debug, info};

use crate::desired::SecurityGroupDeclaration;
use crate::observed::ObservedGroup;

/// Which rule directions to compare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlanScope {
    #[default]
    Both,
    IngressOnly,
    EgressOnly,
}

impl PlanScope {
    fn ingress(self) -> bool {
        self != PlanScope::EgressOnly
    }

    fn egress(self) -> bool {
        self != PlanScope::IngressOnly
    }
}

/// A group attribute whose observed value differs from the declaration.
///
/// EC2 cannot change these in place; the group has to be replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataDrift {
    pub field: String,
    pub desired: String,
    pub observed: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityGroupPlan {
    pub group_id: String,
    pub group_name: String,
    pub ingress: PermissionDelta,
    pub egress: PermissionDelta,
    pub metadata_drift: Vec<MetadataDrift>,
    pub up_to_date: bool,
}

/// Compare a declaration with an observed group.
pub fn build_plan(
    desired: &SecurityGroupDeclaration,
    observed: &ObservedGroup,
    opts: &DiffOptions,
    scope: PlanScope,
) -> SecurityGroupPlan {
    let ingress = if scope.ingress() {
        diff_permissions_with_options(
            &desired.ingress_permissions(),
            &observed.ip_permissions,
            opts,
        )
    } else {
        PermissionDelta::default()
    };
    let egress = if scope.egress() {
        diff_permissions_with_options(
            &desired.egress_permissions(),
            &observed.ip_permissions_egress,
            opts,
        )
    } else {
        PermissionDelta::default()
    };
    let metadata_drift = metadata_drift(desired, observed);
    debug!(drift = metadata_drift.len(), "compared group metadata");

    let up_to_date = ingress.is_empty() && egress.is_empty() && metadata_drift.is_empty();
    info!(
        group_id = %observed.group_id,
        up_to_date,
        "built security group plan"
    );

    SecurityGroupPlan {
        group_id: observed.group_id.clone(),
        group_name: observed.group_name.clone(),
        ingress,
        egress,
        metadata_drift,
        up_to_date,
    }
}

fn metadata_drift(
    desired: &SecurityGroupDeclaration,
    observed: &ObservedGroup,
) -> Vec<MetadataDrift> {
    let mut out = Vec::new();
    if desired.name != observed.group_name {
        out.push(drift("group_name", &desired.name, &observed.group_name));
    }
    if let Some(description) = &desired.description {
        if description != &observed.description {
            out.push(drift("description", description, &observed.description));
        }
    }
    if let Some(vpc_id) = &desired.vpc_id {
        let observed_vpc = observed.vpc_id.as_deref().unwrap_or("");
        if vpc_id != observed_vpc {
            out.push(drift("vpc_id", vpc_id, observed_vpc));
        }
    }
    out
}

fn drift(field: &str, desired: &str, observed: &str) -> MetadataDrift {
    MetadataDrift {
        field: field.to_string(),
        desired: desired.to_string(),
        observed: observed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use sg_diff_core::{DiffOptions, IpPermission, IpRange};

    use super::{build_plan, PlanScope};
    use crate::desired::{CidrDecl, RuleDecl, SecurityGroupDeclaration};
    use crate::observed::ObservedGroup;

    const CIDR: &str = "192.168.0.0/32";

    fn is_up_to_date(desired: &SecurityGroupDeclaration, observed: &ObservedGroup) -> bool {
        build_plan(desired, observed, &DiffOptions::default(), PlanScope::Both).up_to_date
    }

    fn rule(port: i64) -> RuleDecl {
        RuleDecl {
            protocol: "tcp".to_string(),
            from_port: Some(port),
            to_port: Some(port),
            cidr_blocks: vec![CidrDecl {
                cidr: CIDR.to_string(),
                description: None,
            }],
            ipv6_cidr_blocks: Vec::new(),
            prefix_lists: Vec::new(),
            peer_groups: Vec::new(),
        }
    }

    fn permission(port: i64) -> IpPermission {
        IpPermission::new("tcp")
            .with_ports(port, port)
            .with_ip_range(IpRange::new(CIDR))
    }

    fn declaration(ports: &[i64]) -> SecurityGroupDeclaration {
        SecurityGroupDeclaration {
            name: "some name".to_string(),
            description: Some("some description".to_string()),
            vpc_id: Some("some vpc".to_string()),
            ingress: ports.iter().copied().map(rule).collect(),
            egress: Vec::new(),
        }
    }

    fn observed(ports: &[i64]) -> ObservedGroup {
        ObservedGroup {
            group_id: "some id".to_string(),
            group_name: "some name".to_string(),
            description: "some description".to_string(),
            vpc_id: Some("some vpc".to_string()),
            owner_id: Some("some owner".to_string()),
            ip_permissions: ports.iter().copied().map(permission).collect(),
            ip_permissions_egress: Vec::new(),
        }
    }

    #[test]
    fn same_fields_are_up_to_date() {
        assert!(is_up_to_date(&declaration(&[80]), &observed(&[80])));
    }

    #[test]
    fn same_fields_unsorted_are_up_to_date() {
        assert!(is_up_to_date(&declaration(&[100, 90, 80]), &observed(&[80, 100, 90])));
    }

    #[test]
    fn different_rules_are_not_up_to_date() {
        let plan = build_plan(
            &declaration(&[100]),
            &observed(&[80]),
            &DiffOptions::default(),
            PlanScope::Both,
        );
        assert!(!plan.up_to_date);
        assert_eq!(plan.ingress.add, vec![permission(100)]);
        assert_eq!(plan.ingress.remove, vec![permission(80)]);
        assert!(plan.egress.is_empty());
    }

    #[test]
    fn description_drift_blocks_up_to_date() {
        let mut desired = declaration(&[80]);
        desired.description = Some("new description".to_string());
        let plan = build_plan(
            &desired,
            &observed(&[80]),
            &DiffOptions::default(),
            PlanScope::Both,
        );
        assert!(!plan.up_to_date);
        assert_eq!(plan.metadata_drift.len(), 1);
        assert_eq!(plan.metadata_drift[0].field, "description");
        assert_eq!(plan.metadata_drift[0].observed, "some description");
    }

    #[test]
    fn undeclared_metadata_is_not_compared() {
        let mut desired = declaration(&[80]);
        desired.description = None;
        desired.vpc_id = None;
        let mut group = observed(&[80]);
        group.vpc_id = Some("vpc-other".to_string());
        assert!(is_up_to_date(&desired, &group));
    }

    #[test]
    fn scope_limits_compared_directions() {
        let mut group = observed(&[80]);
        group.ip_permissions_egress = vec![permission(443)];

        let ingress_only = build_plan(
            &declaration(&[80]),
            &group,
            &DiffOptions::default(),
            PlanScope::IngressOnly,
        );
        assert!(ingress_only.up_to_date);

        let both = build_plan(
            &declaration(&[80]),
            &group,
            &DiffOptions::default(),
            PlanScope::Both,
        );
        assert_eq!(both.egress.remove, vec![permission(443)]);
        assert!(!both.up_to_date);

        let egress_only = build_plan(
            &declaration(&[22]),
            &group,
            &DiffOptions::default(),
            PlanScope::EgressOnly,
        );
        assert!(egress_only.ingress.is_empty());
        assert_eq!(egress_only.egress.remove.len(), 1);
    }
}
