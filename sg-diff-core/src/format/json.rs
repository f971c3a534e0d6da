use crate::diff::result::PermissionDelta;

/// Format a delta as JSON with `add` and `remove` arrays.
pub fn format_json(delta: &PermissionDelta) -> String {
    serde_json::to_string_pretty(delta)
        .unwrap_or_else(|_| r#"{"add":[],"remove":[]}"#.to_string())
}
