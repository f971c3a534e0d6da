use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::IpPermission;

/// Errors that can occur while reading a permission list.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Input was not a JSON array of EC2 permissions.
    #[error("failed to parse permissions JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Failed to read input file.
    #[error("failed to read permissions file: {0}")]
    Io(#[from] std::io::Error),
}

/// Parse a JSON array of EC2 `IpPermission` objects.
///
/// Sub-rule lists that are missing from an object are treated as empty.
pub fn parse_permissions(json: &[u8]) -> Result<Vec<IpPermission>, ParseError> {
    Ok(serde_json::from_slice(json)?)
}

/// Parse a permissions file. See [`parse_permissions`].
pub fn parse_permissions_file(path: &Path) -> Result<Vec<IpPermission>, ParseError> {
    let bytes = fs::read(path)?;
    parse_permissions(&bytes)
}
