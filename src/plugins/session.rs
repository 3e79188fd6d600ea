//! Session bookkeeping: the per-day tool log, the documentation reminder
//! built from it, and the end-of-session notification.

use crate::core::catalog::SOURCE_EXTENSIONS;
use crate::core::context::HookContext;
use crate::core::event::{Event, ToolKind};
use crate::core::external::ExternalCapability;
use crate::core::output::compact_line;
use crate::core::paths;
use crate::core::verdict::Verdict;
use chrono::{Local, NaiveDate};
use regex::Regex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

pub const MAX_LOGGED_COMMAND_CHARS: usize = 100;
pub const MAX_LISTED_EDITS: usize = 10;

const DOC_LOCATIONS: &[&str] = &["README.md", "docs", "CLAUDE.md", ".claude/CLAUDE.md"];

static LOGGED_FILE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"file=(\S+)").unwrap());

pub fn session_log_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("session-{}.log", date.format("%Y-%m-%d")))
}

/// `session=<id> tool=<name> <detail>`, without the timestamp prefix.
pub fn log_entry(event: &Event) -> String {
    let session = event.session_id.as_deref().unwrap_or("unknown");
    let tool = event.tool_name().unwrap_or("unknown");
    let detail = match &event.tool {
        Some(ToolKind::Edit | ToolKind::Write | ToolKind::Read) => {
            format!("file={}", event.file_path.as_deref().unwrap_or("unknown"))
        }
        Some(ToolKind::Bash) => format!(
            "cmd={}",
            compact_line(
                event.command.as_deref().unwrap_or("unknown"),
                MAX_LOGGED_COMMAND_CHARS
            )
        ),
        Some(ToolKind::Glob | ToolKind::Grep) => {
            format!("pattern={}", event.pattern.as_deref().unwrap_or("unknown"))
        }
        _ => String::new(),
    };
    format!("session={} tool={} {}", session, tool, detail)
}

/// Append one line per tool use to today's session log. Always allows.
pub fn session_logger(event: &Event, ctx: &HookContext) -> Verdict {
    let Some(dir) = ctx.config().session_log_dir() else {
        return Verdict::allow();
    };
    let now = Local::now();
    let line = format!("[{}] {}\n", now.format("%Y-%m-%d %H:%M:%S"), log_entry(event));

    let result = fs::create_dir_all(&dir).and_then(|_| {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(session_log_path(&dir, now.date_naive()))?;
        file.write_all(line.as_bytes())
    });
    if let Err(err) = result {
        tracing::warn!(dir = %dir.display(), error = %err, "failed to append session log");
    }
    Verdict::allow()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEdit {
    pub path: String,
    pub is_new: bool,
}

/// Distinct Edit/Write targets logged for `session_id`, first sighting wins.
pub fn session_edits(log: &str, session_id: &str) -> Vec<SessionEdit> {
    let marker = format!("session={} ", session_id);
    let mut seen = HashSet::new();
    let mut edits = Vec::new();

    for line in log.lines().filter(|l| l.contains(&marker)) {
        let is_write = line.contains("tool=Write");
        if !is_write && !line.contains("tool=Edit") {
            continue;
        }
        let Some(caps) = LOGGED_FILE.captures(line) else {
            continue;
        };
        let path = caps[1].to_string();
        if seen.insert(path.clone()) {
            edits.push(SessionEdit {
                path,
                is_new: is_write,
            });
        }
    }
    edits
}

/// Ask for an explicit documentation decision when source files changed.
pub fn doc_reminder(event: &Event, ctx: &HookContext) -> Verdict {
    let Some(session_id) = event.session_id.as_deref().filter(|s| !s.is_empty()) else {
        return Verdict::allow();
    };
    let Some(dir) = ctx.config().session_log_dir() else {
        return Verdict::allow();
    };
    let Ok(log) = fs::read_to_string(session_log_path(&dir, Local::now().date_naive())) else {
        return Verdict::allow();
    };

    let source_edits: Vec<SessionEdit> = session_edits(&log, session_id)
        .into_iter()
        .filter(|e| paths::has_extension(&e.path, SOURCE_EXTENSIONS))
        .collect();
    if source_edits.is_empty() {
        return Verdict::allow();
    }

    let cwd = match event.cwd.as_deref() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir().unwrap_or_default(),
    };
    let docs: Vec<&str> = DOC_LOCATIONS
        .iter()
        .copied()
        .filter(|doc| cwd.join(doc).exists())
        .collect();

    Verdict::with_context(reminder_text(&source_edits, &docs))
}

fn reminder_text(edits: &[SessionEdit], docs: &[&str]) -> String {
    let mut files = edits
        .iter()
        .take(MAX_LISTED_EDITS)
        .map(|e| format!("  - {} ({})", e.path, if e.is_new { "NEW" } else { "modified" }))
        .collect::<Vec<_>>()
        .join("\n");
    if edits.len() > MAX_LISTED_EDITS {
        files.push_str(&format!("\n  ... and {} more", edits.len() - MAX_LISTED_EDITS));
    }

    let docs_line = if docs.is_empty() {
        "No project documentation found.".to_string()
    } else {
        format!("Existing documentation found: {}", docs.join(", "))
    };

    format!(
        "DOCUMENTATION CHECK REQUIRED\n\n\
         The following source files were modified this session:\n{files}\n\n\
         {docs_line}\n\n\
         REQUIRED: Before completing, explicitly state one of:\n\
         1. \"Documentation updates needed: [list specific docs/sections]\" - then make the updates\n\
         2. \"No documentation updates needed: [brief reason]\" - e.g., internal refactor, bug fix, etc.\n\n\
         Do not skip this acknowledgment."
    )
}

pub fn stop_message(reason: Option<&str>) -> &str {
    match reason.unwrap_or("completed") {
        "user_stop" => "Session stopped by user",
        "end_turn" => "Task completed",
        other => other,
    }
}

/// Fire whichever desktop notifiers are installed. Always allows.
pub fn notify_done(event: &Event, ctx: &HookContext) -> Verdict {
    let message = stop_message(event.stop_reason.as_deref());
    let title = ctx.config().notification_title.as_str();

    let script = format!(
        "display notification \"{}\" with title \"{}\"",
        apple_quote(message),
        apple_quote(title)
    );
    ctx.execute(ExternalCapability::Notify, "osascript", &["-e", script.as_str()], None);
    ctx.execute(
        ExternalCapability::Notify,
        "notify-send",
        &[title, message, "--urgency=normal", "--icon=terminal"],
        None,
    );
    Verdict::allow()
}

fn apple_quote(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
