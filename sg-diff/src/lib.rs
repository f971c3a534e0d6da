//! Plan the rule changes that converge an EC2 security group to its
//! declaration.
//!
//! The heavy lifting (canonicalization and set arithmetic over permission
//! lists) lives in `sg-diff-core`. This crate adds the security group around
//! it:
//!
//! - [`desired`]: load hand-written TOML/JSON declarations
//! - [`observed`]: load `aws ec2 describe-security-groups` output and pick a group
//! - [`plan`]: diff ingress and egress independently and check group metadata
//! - [`report`]: terminal-friendly colored rendering
//!
//! # Workflow
//!
//! 1. **Load** the declaration and the describe output
//! 2. **Select** the observed group by id, name, or the declared name
//! 3. **Plan** ingress and egress deltas and metadata drift
//! 4. **Report** or hand the deltas to `authorize-*`/`revoke-*` calls
//!
//! Nothing here calls AWS. The caller fetches the observed snapshot and
//! applies the plan.

pub mod desired;
pub mod error;
pub mod observed;
pub mod plan;
pub mod report;
