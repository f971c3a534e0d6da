use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::IpPermission;

/// Errors that can occur while writing a permission list.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to serialize permissions.
    #[error("failed to serialize permissions: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to write output file.
    #[error("failed to write permissions file: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize permissions as pretty JSON in the EC2 wire shape.
///
/// The output is accepted by `aws ec2 authorize-security-group-ingress
/// --ip-permissions file://...` and the matching egress/revoke commands.
pub fn write_permissions(perms: &[IpPermission]) -> Result<Vec<u8>, WriteError> {
    let mut out = serde_json::to_vec_pretty(perms)?;
    out.push(b'\n');
    Ok(out)
}

/// Serialize permissions and write them to `path`.
pub fn write_permissions_file(perms: &[IpPermission], path: &Path) -> Result<(), WriteError> {
    let bytes = write_permissions(perms)?;
    fs::write(path, bytes)?;
    Ok(())
}
