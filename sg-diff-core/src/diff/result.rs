use serde::{Deserialize, Serialize};

use crate::IpPermission;

/// Rule changes that converge an observed permission list to a desired one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDelta {
    /// Permissions to authorize.
    pub add: Vec<IpPermission>,
    /// Permissions to revoke.
    pub remove: Vec<IpPermission>,
}

impl PermissionDelta {
    /// True when nothing needs to be authorized or revoked.
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn add_items(&self) -> usize {
        self.add.iter().map(IpPermission::item_count).sum()
    }

    pub fn remove_items(&self) -> usize {
        self.remove.iter().map(IpPermission::item_count).sum()
    }
}
