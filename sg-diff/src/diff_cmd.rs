use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sg_diff::desired::load_declaration;
use sg_diff::observed::{load_observed, select_group};
use sg_diff::plan::{build_plan, PlanScope, SecurityGroupPlan};
use sg_diff::report::{render_plan_summary, render_plan_text};
use sg_diff_core::{format_json, write_permissions_file, IpPermission, PermissionDelta};
use tracing::{info, warn};

use crate::cli::{diff_options, DiffArgs, OutputFormat};
use crate::path_guard;

pub fn run_diff(args: DiffArgs) -> Result<()> {
    let desired = load_declaration(&args.desired)
        .with_context(|| format!("failed to load declaration {}", args.desired.display()))?;
    let groups = load_observed(&args.observed)
        .with_context(|| format!("failed to load observed state {}", args.observed.display()))?;
    let observed = select_group(groups, args.group.as_deref(), &desired.name)?;

    let opts = diff_options(args.fold_all_ports, args.protocol_aliases);
    let scope = if args.ingress_only {
        PlanScope::IngressOnly
    } else if args.egress_only {
        PlanScope::EgressOnly
    } else {
        PlanScope::Both
    };
    let plan = build_plan(&desired, &observed, &opts, scope);
    if !plan.metadata_drift.is_empty() {
        warn!(
            group_id = %plan.group_id,
            fields = plan.metadata_drift.len(),
            "group metadata differs from declaration"
        );
    }

    let inputs = [args.desired.as_path(), args.observed.as_path()];
    if let Some(plan_path) = &args.plan {
        path_guard::ensure_output_not_same(plan_path, &inputs)?;
        let plan_json = serde_json::to_string_pretty(&plan)?;
        fs::write(plan_path, plan_json)
            .with_context(|| format!("failed to write plan file {}", plan_path.display()))?;
        info!(path = %plan_path.display(), "wrote plan");
    }

    if let Some(dir) = &args.emit_dir {
        emit_payloads(dir, &plan, &inputs)?;
    }

    if args.summary {
        println!("{}", render_plan_summary(&plan));
    } else {
        match args.format {
            OutputFormat::Text => println!("{}", render_plan_text(&plan)),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
        }
    }

    if args.strict && !plan.up_to_date {
        bail!(
            "strict mode failed: security group {} is not up to date",
            plan.group_id
        );
    }
    Ok(())
}

/// Write one payload file per non-empty authorize/revoke call, plus a
/// `<direction>-delta.json` holding both sides of each changed direction.
fn emit_payloads(dir: &Path, plan: &SecurityGroupPlan, inputs: &[&Path]) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))?;

    let payloads: [(&str, &[IpPermission]); 4] = [
        ("ingress-authorize.json", &plan.ingress.add),
        ("ingress-revoke.json", &plan.ingress.remove),
        ("egress-authorize.json", &plan.egress.add),
        ("egress-revoke.json", &plan.egress.remove),
    ];
    for (name, perms) in payloads {
        if perms.is_empty() {
            continue;
        }
        let path: PathBuf = dir.join(name);
        path_guard::ensure_output_not_same(&path, inputs)?;
        write_permissions_file(perms, &path)
            .with_context(|| format!("failed to write payload {}", path.display()))?;
        info!(path = %path.display(), entries = perms.len(), "wrote payload");
    }

    let deltas: [(&str, &PermissionDelta); 2] = [
        ("ingress-delta.json", &plan.ingress),
        ("egress-delta.json", &plan.egress),
    ];
    for (name, delta) in deltas {
        if delta.is_empty() {
            continue;
        }
        let path = dir.join(name);
        path_guard::ensure_output_not_same(&path, inputs)?;
        fs::write(&path, format_json(delta) + "\n")
            .with_context(|| format!("failed to write delta {}", path.display()))?;
    }
    Ok(())
}
