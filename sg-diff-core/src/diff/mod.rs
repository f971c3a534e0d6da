//! Set arithmetic between canonical rule sets.

pub mod engine;
pub mod result;

pub use engine::{diff, diff_permissions, diff_permissions_with_options, DiffOptions, PortSentinel};
pub use result::PermissionDelta;
