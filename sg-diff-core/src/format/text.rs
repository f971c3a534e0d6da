use crate::diff::result::PermissionDelta;
use crate::IpPermission;

/// Format a delta as plain text, `+` for additions and `-` for removals.
pub fn format_text(delta: &PermissionDelta) -> String {
    let mut lines = Vec::with_capacity(delta.add_items() + delta.remove_items());
    push_permission_lines(&mut lines, '+', &delta.add);
    push_permission_lines(&mut lines, '-', &delta.remove);
    lines.join("\n")
}

/// Format permissions one sub-rule item per line, prefixed with `marker`.
pub fn format_permissions(perms: &[IpPermission], marker: char) -> String {
    let mut lines = Vec::new();
    push_permission_lines(&mut lines, marker, perms);
    lines.join("\n")
}

fn push_permission_lines(lines: &mut Vec<String>, marker: char, perms: &[IpPermission]) {
    for perm in perms {
        let label = perm.label();
        for item in &perm.ip_ranges {
            lines.push(format!("{marker} {label} {item}"));
        }
        for item in &perm.ipv6_ranges {
            lines.push(format!("{marker} {label} {item}"));
        }
        for item in &perm.prefix_list_ids {
            lines.push(format!("{marker} {label} {item}"));
        }
        for item in &perm.user_id_group_pairs {
            lines.push(format!("{marker} {label} {item}"));
        }
    }
}

/// Format entry and item counts for both sides of a delta.
pub fn format_summary(delta: &PermissionDelta) -> String {
    format!(
        "add_entries={} add_items={} remove_entries={} remove_items={}",
        delta.add.len(),
        delta.add_items(),
        delta.remove.len(),
        delta.remove_items()
    )
}
