use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use sg_diff_core::{DiffOptions, PortSentinel};

#[derive(Parser, Debug)]
#[command(name = "sg-diff")]
#[command(about = "Plan the rule changes that converge a security group to its declaration")]
pub struct Cli {
    /// Log filter (for example `debug` or `sg_diff_core=trace`). Defaults to RUST_LOG, then `warn`.
    #[arg(long, global = true)]
    pub log: Option<String>,
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). Ignored with `--log`.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Compare a declaration with describe-security-groups output.
    Diff(DiffArgs),
    /// Show the canonical (merged, deduplicated, ordered) form of a rule file.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct DiffArgs {
    /// Declaration file (TOML, or JSON by extension).
    pub desired: PathBuf,
    /// Output of `aws ec2 describe-security-groups --output json`.
    pub observed: PathBuf,
    /// Group id or name to compare against. Defaults to the declared name.
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Print only the summary line.
    #[arg(long)]
    pub summary: bool,
    /// Write the plan as JSON to this path.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Write authorize/revoke payloads for `--ip-permissions file://...` into this directory.
    #[arg(long)]
    pub emit_dir: Option<PathBuf>,
    /// Fail when the group is not up to date.
    #[arg(long)]
    pub strict: bool,
    /// Treat an explicit -1 port like an absent port.
    #[arg(long)]
    pub fold_all_ports: bool,
    /// Match numeric protocols (6, 17, 1, 58) with their names.
    #[arg(long)]
    pub protocol_aliases: bool,
    #[arg(long, conflicts_with = "egress_only")]
    pub ingress_only: bool,
    #[arg(long, conflicts_with = "ingress_only")]
    pub egress_only: bool,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
    /// How to read the file. `auto` uses the extension and JSON shape.
    #[arg(long, value_enum, default_value_t = InputKind::Auto)]
    pub input: InputKind,
    /// Direction to show for declarations and describe output.
    #[arg(long, value_enum, default_value_t = Direction::Ingress)]
    pub direction: Direction,
    /// Group id or name when the file holds several groups.
    #[arg(long)]
    pub group: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    #[arg(long)]
    pub fold_all_ports: bool,
    #[arg(long)]
    pub protocol_aliases: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum InputKind {
    Auto,
    /// Hand-written declaration.
    Declaration,
    /// describe-security-groups output.
    Observed,
    /// Bare JSON array of EC2 permissions.
    Permissions,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum Direction {
    Ingress,
    Egress,
}

pub fn diff_options(fold_all_ports: bool, protocol_aliases: bool) -> DiffOptions {
    DiffOptions {
        port_sentinel: if fold_all_ports {
            PortSentinel::FoldAllPorts
        } else {
            PortSentinel::Distinct
        },
        protocol_aliases,
    }
}
