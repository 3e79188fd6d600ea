//! CLI definition for the hookwarden binary.
//!
//! Dispatch logic lives in `lib.rs`.

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(
    name = "hookwarden",
    version = env!("CARGO_PKG_VERSION"),
    about = "Policy gate for coding-agent tool hooks. Reads one JSON event on stdin, reports on stderr, exits 0 (allow/warn) or 2 (block)."
)]
pub(crate) struct Cli {
    /// Hook phase to run, e.g. `pre-edit` or `protect-files`.
    pub phase: Option<String>,
    /// List every known phase and exit.
    #[clap(long)]
    pub list: bool,
}
