use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use sg_diff::desired::{load_declaration, parse_declaration_json};
use sg_diff::observed::{parse_observed, select_group, ObservedGroup};
use sg_diff::report::render_permissions;
use sg_diff_core::{
    assemble, canonicalize_with_options, parse_permissions, write_permissions, IpPermission,
};

use crate::cli::{diff_options, Direction, InputKind, InspectArgs, OutputFormat};

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let perms = read_permissions(&args)?;
    let opts = diff_options(args.fold_all_ports, args.protocol_aliases);
    let canonical = canonicalize_with_options(&perms, &opts);
    let assembled = assemble(&canonical);

    match args.format {
        OutputFormat::Text => {
            println!(
                "entries_in={} identities={} items={} entries_out={}",
                perms.len(),
                canonical.len(),
                canonical.item_count(),
                assembled.len()
            );
            if !assembled.is_empty() {
                println!("{}", render_permissions(&assembled));
            }
        }
        OutputFormat::Json => {
            let bytes = write_permissions(&assembled)?;
            print!("{}", String::from_utf8_lossy(&bytes));
        }
    }
    Ok(())
}

fn read_permissions(args: &InspectArgs) -> Result<Vec<IpPermission>> {
    let path = args.file.as_path();
    let kind = match args.input {
        InputKind::Auto => detect_kind(path)?,
        kind => kind,
    };

    match kind {
        InputKind::Declaration => {
            let decl = load_declaration(path)
                .with_context(|| format!("failed to load declaration {}", path.display()))?;
            Ok(match args.direction {
                Direction::Ingress => decl.ingress_permissions(),
                Direction::Egress => decl.egress_permissions(),
            })
        }
        InputKind::Observed => {
            let raw = read(path)?;
            let groups = parse_observed(&raw, path.display().to_string())?;
            let group = select_observed(groups, args.group.as_deref())?;
            Ok(match args.direction {
                Direction::Ingress => group.ip_permissions,
                Direction::Egress => group.ip_permissions_egress,
            })
        }
        InputKind::Permissions | InputKind::Auto => {
            let raw = read(path)?;
            parse_permissions(raw.as_bytes())
                .with_context(|| format!("failed to parse permissions {}", path.display()))
        }
    }
}

fn select_observed(groups: Vec<ObservedGroup>, selector: Option<&str>) -> Result<ObservedGroup> {
    if selector.is_none() && groups.len() > 1 {
        bail!("file holds {} security groups; pass --group", groups.len());
    }
    Ok(select_group(groups, selector, "")?)
}

/// TOML is always a declaration; JSON is probed as a permission array, then a
/// describe response, then a declaration.
fn detect_kind(path: &Path) -> Result<InputKind> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return Ok(InputKind::Declaration);
    }

    let raw = read(path)?;
    if parse_permissions(raw.as_bytes()).is_ok() {
        return Ok(InputKind::Permissions);
    }
    if parse_observed(&raw, String::new()).is_ok() {
        return Ok(InputKind::Observed);
    }
    if parse_declaration_json(&raw, String::new()).is_ok() {
        return Ok(InputKind::Declaration);
    }
    bail!(
        "could not recognize {}; pass --input declaration|observed|permissions",
        path.display()
    )
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
