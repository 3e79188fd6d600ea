//! File protection, write size limits and dangerous shell commands.

use crate::core::catalog::RM_WITH_VARIABLE;
use crate::core::context::HookContext;
use crate::core::event::{Event, ToolKind};
use crate::core::verdict::Verdict;

pub const MAX_WRITE_BYTES: usize = 1_048_576;
pub const LARGE_WRITE_BYTES: usize = 102_400;
pub const LARGE_EDIT_BYTES: usize = 51_200;
/// Writes at or below this size skip the binary heuristic.
pub const BINARY_SCAN_MIN_BYTES: usize = 1000;
/// Percentage of control bytes above which content looks binary.
pub const BINARY_RATIO_PERCENT: usize = 20;

/// Block writes to protected paths and writes carrying secrets.
pub fn protect_files(event: &Event, ctx: &HookContext) -> Verdict {
    if !event.is_file_mutation() {
        return Verdict::allow();
    }
    let Some(path) = event.target_path() else {
        return Verdict::allow();
    };

    if let Some(pattern) = ctx.catalog().protected_match(path) {
        return Verdict::block(format!(
            "BLOCKED: Cannot modify protected file: {}\nPattern matched: {}\nIf you need to modify this file, please do so manually.",
            path,
            pattern.as_str()
        ));
    }

    if event.is_tool(&ToolKind::Write) {
        let content = event.content.as_deref().unwrap_or_default();
        if let Some(signature) = ctx.catalog().secret_match(content) {
            return Verdict::block(format!(
                "BLOCKED: Potential secret/API key detected in file content\nPattern: {} ({})\nPlease use environment variables or a secrets manager instead.",
                signature.name,
                signature.regex.as_str()
            ));
        }
    }

    Verdict::allow()
}

/// Size ceilings for writes and edits, plus a binary-content heuristic.
pub fn large_file_check(event: &Event, _ctx: &HookContext) -> Verdict {
    match event.tool {
        Some(ToolKind::Write) => {
            let Some(content) = event.content.as_deref().filter(|c| !c.is_empty()) else {
                return Verdict::allow();
            };
            check_write_size(content, event.target_path().unwrap_or("unknown"))
        }
        Some(ToolKind::Edit) => {
            let Some(fragment) = event.new_string.as_deref() else {
                return Verdict::allow();
            };
            if fragment.len() > LARGE_EDIT_BYTES {
                return Verdict::warn(format!(
                    "WARNING: Large edit detected ({}KB replacement)\nConsider breaking into smaller edits.",
                    fragment.len() / 1024
                ));
            }
            Verdict::allow()
        }
        _ => Verdict::allow(),
    }
}

fn check_write_size(content: &str, path: &str) -> Verdict {
    let size = content.len();
    if size > MAX_WRITE_BYTES {
        return Verdict::block(format!(
            "BLOCKED: File content too large ({}MB)\nThis is likely a mistake. If intentional, write manually.",
            size / MAX_WRITE_BYTES
        ));
    }

    let mut verdict = Verdict::allow();
    if size > LARGE_WRITE_BYTES {
        verdict.push_warning(format!(
            "WARNING: Large file write detected\nFile: {}\nSize: {}KB\n\nConsider:\n  - Breaking into smaller files\n  - Using external data storage\n  - Generating programmatically instead of hardcoding",
            path,
            size / 1024
        ));
    }
    if size > BINARY_SCAN_MIN_BYTES {
        let ratio = non_printable_percent(content.as_bytes());
        if ratio > BINARY_RATIO_PERCENT {
            verdict.push_warning(format!(
                "WARNING: Content appears to contain binary data ({}% non-printable)\nFile: {}",
                ratio, path
            ));
        }
    }
    verdict
}

/// Control bytes other than tab, newline and carriage return, as a floored
/// percentage of the whole buffer.
pub fn non_printable_percent(bytes: &[u8]) -> usize {
    if bytes.is_empty() {
        return 0;
    }
    let non_printable = bytes
        .iter()
        .filter(|&&b| b < 32 && b != b'\t' && b != b'\n' && b != b'\r')
        .count();
    non_printable * 100 / bytes.len()
}

/// Block catalogued destructive commands; warn on risky shapes.
pub fn dangerous_command(event: &Event, ctx: &HookContext) -> Verdict {
    if !event.is_tool(&ToolKind::Bash) {
        return Verdict::allow();
    }
    let Some(command) = event.shell_command() else {
        return Verdict::allow();
    };

    if let Some(pattern) = ctx.catalog().dangerous_match(command) {
        return Verdict::block(format!(
            "BLOCKED: Potentially dangerous command detected\nPattern matched: {}\nCommand: {}\n\nIf you really need to run this command, please do so manually.",
            pattern.as_str(),
            command
        ));
    }

    let mut verdict = Verdict::allow();
    if RM_WITH_VARIABLE.is_match(command) {
        verdict.push_warning(format!(
            "WARNING: rm -rf with variable expansion detected\nCommand: {}\nEnsure the variable is set correctly before proceeding.",
            command
        ));
    }
    if command.starts_with("sudo ") {
        verdict.push_warning("WARNING: sudo command detected - will require manual approval");
    }
    verdict
}
