use colored::Colorize;
use sg_diff_core::{format_permissions, format_summary, format_text, IpPermission, PermissionDelta};

use crate::plan::SecurityGroupPlan;

/// Render a delta for terminal output, one line per sub-rule item.
pub fn render_delta(delta: &PermissionDelta) -> String {
    colorize(&format_text(delta))
}

/// Render a permission list as `+` lines, for inspecting canonical forms.
pub fn render_permissions(perms: &[IpPermission]) -> String {
    colorize(&format_permissions(perms, '+'))
}

fn colorize(raw: &str) -> String {
    raw.lines()
        .map(|line| {
            if line.starts_with('+') {
                line.green().to_string()
            } else if line.starts_with('-') {
                line.red().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a full plan: header, drift, then ingress and egress changes.
pub fn render_plan_text(plan: &SecurityGroupPlan) -> String {
    let mut out = Vec::new();
    out.push(
        format!("security_group id={} name={}", plan.group_id, plan.group_name)
            .cyan()
            .to_string(),
    );

    for drift in &plan.metadata_drift {
        out.push(
            format!(
                "! {}: desired={:?} observed={:?} (requires replacement)",
                drift.field, drift.desired, drift.observed
            )
            .yellow()
            .to_string(),
        );
    }

    push_direction(&mut out, "ingress", &plan.ingress);
    push_direction(&mut out, "egress", &plan.egress);

    out.push(String::new());
    out.push(render_plan_summary(plan));
    out.join("\n")
}

fn push_direction(out: &mut Vec<String>, name: &str, delta: &PermissionDelta) {
    out.push(String::new());
    out.push(name.to_string());
    if delta.is_empty() {
        out.push("  no changes".to_string());
        return;
    }
    for line in render_delta(delta).lines() {
        out.push(format!("  {line}"));
    }
}

/// Render the one-line summary for a plan.
pub fn render_plan_summary(plan: &SecurityGroupPlan) -> String {
    let line = format!(
        "up_to_date={} drift={} ingress[{}] egress[{}]",
        plan.up_to_date,
        plan.metadata_drift.len(),
        format_summary(&plan.ingress),
        format_summary(&plan.egress)
    );
    if plan.up_to_date {
        line.cyan().to_string()
    } else {
        line.yellow().to_string()
    }
}
