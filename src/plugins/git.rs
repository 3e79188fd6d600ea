//! Git-aware checks: working tree state, current branch, test files, and
//! the branch-name / commit-message grammar.

use crate::core::catalog::{
    BRANCH_CREATE, BRANCH_EXEMPT, BRANCH_NAMING, COMMIT_MESSAGE_ARG, COMMIT_TYPES,
    CONVENTIONAL_COMMIT, PROTECTED_BRANCHES, TEST_FILE_MARKERS,
};
use crate::core::context::HookContext;
use crate::core::event::{Event, ToolKind};
use crate::core::external::ExternalCapability;
use crate::core::paths;
use crate::core::verdict::Verdict;
use std::path::Path;

/// Repositories with more pending changes than this draw a note.
pub const DIRTY_TREE_THRESHOLD: usize = 20;
/// Subject lines longer than this draw a warning.
pub const COMMIT_SUBJECT_MAX_CHARS: usize = 72;

pub fn git_status_check(event: &Event, ctx: &HookContext) -> Verdict {
    if !event.is_file_mutation() {
        return Verdict::allow();
    }
    let Some(file_path) = event.target_path() else {
        return Verdict::allow();
    };
    let path = Path::new(file_path);
    if !path.exists() {
        return Verdict::allow();
    }
    let Some(git_root) = paths::find_git_root(path) else {
        return Verdict::allow();
    };

    let mut verdict = Verdict::allow();
    if let Some(out) = ctx.execute(
        ExternalCapability::VcsRead,
        "git",
        &["status", "--porcelain", file_path],
        Some(&git_root),
    ) {
        if !out.stdout.trim().is_empty() {
            let code = out.stdout.get(..2).unwrap_or_default();
            match code {
                " M" | "MM" | "AM" => verdict.push_warning(format!(
                    "WARNING: File has uncommitted modifications\nFile: {}\nConsider committing or stashing changes first.",
                    file_path
                )),
                "??" => {}
                other => verdict.push_warning(format!(
                    "WARNING: File has uncommitted changes (status: {})\nFile: {}",
                    other.trim(),
                    file_path
                )),
            }
        }
    }

    if let Some(out) = ctx.execute(
        ExternalCapability::VcsRead,
        "git",
        &["status", "--porcelain"],
        Some(&git_root),
    ) {
        let changes = out.stdout.trim().lines().count();
        if changes > DIRTY_TREE_THRESHOLD {
            verdict.push_warning(format!(
                "NOTE: Repository has {} uncommitted changes\nConsider committing or stashing before making more changes.",
                changes
            ));
        }
    }

    verdict
}

pub fn branch_protection(event: &Event, ctx: &HookContext) -> Verdict {
    if !event.is_file_mutation() {
        return Verdict::allow();
    }
    let cwd = event.cwd.as_deref().map(Path::new).filter(|p| p.is_dir());
    let Some(out) = ctx.execute(
        ExternalCapability::VcsRead,
        "git",
        &["branch", "--show-current"],
        cwd,
    ) else {
        return Verdict::allow();
    };
    if !out.success() {
        return Verdict::allow();
    }

    let branch = out.stdout.trim();
    if PROTECTED_BRANCHES.contains(&branch) {
        return Verdict::warn(format!(
            "WARNING: You are on '{}' branch.\nConsider creating a feature branch: git checkout -b feature/your-feature",
            branch
        ));
    }
    Verdict::allow()
}

pub fn test_file_guard(event: &Event, _ctx: &HookContext) -> Verdict {
    if !event.is_file_mutation() {
        return Verdict::allow();
    }
    let Some(path) = event.target_path() else {
        return Verdict::allow();
    };
    if is_test_file(path) {
        return Verdict::warn("NOTE: Editing test file. Remember to run tests before committing.");
    }
    Verdict::allow()
}

pub fn is_test_file(path: &str) -> bool {
    TEST_FILE_MARKERS.iter().any(|m| path.contains(m))
}

/// Branch names first, then commit messages, in the same command.
pub fn validate_commit(event: &Event, _ctx: &HookContext) -> Verdict {
    if !event.is_tool(&ToolKind::Bash) {
        return Verdict::allow();
    }
    let Some(command) = event.shell_command() else {
        return Verdict::allow();
    };

    if let Some(branch) = created_branch(command) {
        if BRANCH_EXEMPT.is_match(branch) {
            return Verdict::allow();
        }
        if !BRANCH_NAMING.is_match(branch) {
            return Verdict::block(format!(
                "BLOCKED: Branch name does not follow naming convention\n\nExpected format: type/short-description\nExample: feat/add-oauth-login\nYour branch: {}",
                branch
            ));
        }
    }

    if command.contains("git commit") {
        if let Some(message) = commit_message(command) {
            return check_commit_message(message);
        }
    }

    Verdict::allow()
}

/// Target of `git checkout -b` / `git switch -c`.
pub fn created_branch(command: &str) -> Option<&str> {
    BRANCH_CREATE
        .captures(command)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Inline `-m "..."` / `-m '...'` message, if any.
pub fn commit_message(command: &str) -> Option<&str> {
    COMMIT_MESSAGE_ARG
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn check_commit_message(message: &str) -> Verdict {
    if !CONVENTIONAL_COMMIT.is_match(message) {
        let types = COMMIT_TYPES
            .iter()
            .map(|(name, meaning)| format!("  {:<8} - {}", name, meaning))
            .collect::<Vec<_>>()
            .join("\n");
        return Verdict::block(format!(
            "BLOCKED: Commit message does not follow conventional commits format\n\nExpected format: type(scope): description\n\nValid types:\n{}\n\nExample: feat(auth): add OAuth2 login flow\nYour message: {}",
            types, message
        ));
    }

    let subject = message.lines().next().unwrap_or(message);
    let length = subject.chars().count();
    if length > COMMIT_SUBJECT_MAX_CHARS {
        return Verdict::warn(format!(
            "WARNING: Commit subject line is {} chars (recommended <= 50, max 72)",
            length
        ));
    }
    Verdict::allow()
}
