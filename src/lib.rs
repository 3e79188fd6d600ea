//! hookwarden: a policy gate for coding-agent tool hooks
//!
//! **hookwarden sits between an agent and its tools.** The host agent calls
//! `hookwarden <phase>` at fixed lifecycle points (before an edit, after an
//! edit, before a shell command, on prompt submit, on stop) and pipes the
//! tool-use event to stdin as JSON. hookwarden runs the phase's validators
//! and answers through its exit status and output streams.
//!
//! # Protocol
//!
//! - **Exit status**: `0` allow or warn, `2` block, `1` invocation error
//! - **stderr**: one `WARNING:` / `BLOCKED:` / `NOTE:` diagnostic per message
//! - **stdout**: at most one `{"additionalContext": "..."}` JSON line
//!
//! A payload that cannot be decoded is allowed silently. A missing or
//! unknown phase is an invocation error.
//!
//! # Phases
//!
//! Single validators (`protect-files`, `dangerous-command`,
//! `validate-commit`, ...) and five fixed pipelines:
//!
//! - `pre-edit`: file protection (gate), size limits, git status, branch
//!   protection, test-file guard, API verification notes
//! - `post-edit`: formatter, type-checker, JAX shape lint, import contracts,
//!   session log
//! - `pre-bash`: dangerous commands (gate), branch and commit grammar
//! - `user-prompt`: topic checklists, documentation suggestions
//! - `stop`: documentation reminder, desktop notification
//!
//! # Examples
//!
//! ```bash
//! echo '{"tool_name":"Bash","tool_input":{"command":"rm -rf /"}}' | hookwarden pre-bash
//! echo $?   # 2
//!
//! hookwarden --list
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: event model, verdict algebra, catalogs, pipelines, config,
//!   external-tool seam
//! - [`plugins`]: the validators
//! - [`phases`]: phase names mapped to validators and pipelines

mod cli;
pub mod core;
pub mod phases;
pub mod plugins;

use crate::core::config::HookConfig;
use crate::core::context::HookContext;
use crate::core::error::HookError;
use crate::core::event::Event;
use crate::core::verdict::Verdict;
use crate::core::{logging, output};
use crate::phases::{Handler, Phase};

use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use std::io::{self, Read, Write};

/// Decode `raw`, run the phase, and return the merged verdict.
///
/// A payload that does not decode is a silent allow.
pub fn dispatch(phase: Phase, raw: &str, ctx: &HookContext) -> Verdict {
    let event = match Event::decode(raw) {
        Ok(event) => event,
        Err(err) => {
            tracing::debug!(phase = phase.as_str(), error = %err, "undecodable payload, allowing");
            return Verdict::allow();
        }
    };
    match phase.handler() {
        Handler::Single(validator) => validator(&event, ctx),
        Handler::Pipeline(pipeline) => pipeline.run(&event, ctx),
    }
}

/// Print every phase with its kind; pipelines also show their steps.
pub fn list_phases<W: Write>(out: &mut W) -> io::Result<()> {
    for (phase, name) in Phase::ALL {
        match phase.handler() {
            Handler::Single(_) => writeln!(out, "{:<20} {}", name, "validator".cyan())?,
            Handler::Pipeline(pipeline) => {
                let steps = pipeline.step_names().collect::<Vec<_>>().join(" -> ");
                writeln!(out, "{:<20} {} {}", name, "pipeline".magenta(), steps.dimmed())?;
            }
        }
    }
    Ok(())
}

fn read_payload() -> String {
    let mut raw = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut raw) {
        tracing::debug!(error = %err, "unreadable stdin, treating as empty payload");
        raw.clear();
    }
    raw
}

/// Run the binary. Returns the process exit status on success.
pub fn run() -> Result<u8, HookError> {
    logging::init();

    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                err.print()?;
                return Ok(0);
            }
            _ => return Err(HookError::UsageError(err.to_string().trim_end().to_string())),
        },
    };

    if cli.list {
        list_phases(&mut io::stdout().lock())?;
        return Ok(0);
    }

    let Some(name) = cli.phase else {
        return Err(HookError::UsageError(
            "Usage: hookwarden <phase>\nRun `hookwarden --list` to see the known phases.".to_string(),
        ));
    };
    let phase = Phase::from_name(&name)?;

    let ctx = HookContext::new(HookConfig::load());
    let raw = read_payload();
    let verdict = dispatch(phase, &raw, &ctx);
    tracing::debug!(
        phase = phase.as_str(),
        severity = verdict.severity().as_str(),
        messages = verdict.messages().len(),
        "phase finished"
    );

    Ok(output::emit(
        &verdict,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    ))
}
