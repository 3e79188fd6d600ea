//! Phase registration: the closed set of hook names and what each runs.
//!
//! Adding a phase: add a variant, give it a name in `Phase::ALL`, and map
//! it in `Phase::handler`.

use crate::core::error::HookError;
use crate::core::pipeline::{Pipeline, Step, Validator};
use crate::plugins::{context, format, git, jax, protection, session};

/// What a phase runs: one validator, or a fixed pipeline of them.
#[derive(Clone, Copy)]
pub enum Handler {
    Single(Validator),
    Pipeline(&'static Pipeline),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    ProtectFiles,
    LargeFileCheck,
    GitStatusCheck,
    BranchProtection,
    TestFileGuard,
    VerifyApiCalls,
    DangerousCommand,
    ValidateCommit,
    FormatOnSave,
    Typecheck,
    JaxShapeCheck,
    ImportCycleCheck,
    SessionLogger,
    InjectContext,
    Context7Docs,
    NotifyDone,
    DocReminder,
    PreEdit,
    PostEdit,
    PreBash,
    UserPrompt,
    Stop,
}

pub static PRE_EDIT: Pipeline = Pipeline {
    name: "pre-edit",
    steps: &[
        Step::gate("protect-files", protection::protect_files),
        Step::run("large-file-check", protection::large_file_check),
        Step::run("git-status-check", git::git_status_check),
        Step::run("branch-protection", git::branch_protection),
        Step::run("test-file-guard", git::test_file_guard),
        Step::run("verify-api-calls", jax::verify_api_calls),
    ],
};

pub static POST_EDIT: Pipeline = Pipeline {
    name: "post-edit",
    steps: &[
        Step::run("format-on-save", format::format_on_save),
        Step::run("typecheck", format::typecheck),
        Step::run("jax-shape-check", jax::jax_shape_check),
        Step::run("import-cycle-check", jax::import_cycle_check),
        Step::run("session-logger", session::session_logger),
    ],
};

pub static PRE_BASH: Pipeline = Pipeline {
    name: "pre-bash",
    steps: &[
        Step::gate("dangerous-command", protection::dangerous_command),
        Step::run("validate-commit", git::validate_commit),
    ],
};

pub static USER_PROMPT: Pipeline = Pipeline {
    name: "user-prompt",
    steps: &[
        Step::run("inject-context", context::inject_context),
        Step::run("context7-docs", context::context7_docs),
    ],
};

pub static STOP: Pipeline = Pipeline {
    name: "stop",
    steps: &[
        Step::run("doc-reminder", session::doc_reminder),
        Step::run("notify-done", session::notify_done),
    ],
};

impl Phase {
    /// Every phase with its command-line name, validators before pipelines.
    pub const ALL: &'static [(Phase, &'static str)] = &[
        (Phase::ProtectFiles, "protect-files"),
        (Phase::LargeFileCheck, "large-file-check"),
        (Phase::GitStatusCheck, "git-status-check"),
        (Phase::BranchProtection, "branch-protection"),
        (Phase::TestFileGuard, "test-file-guard"),
        (Phase::VerifyApiCalls, "verify-api-calls"),
        (Phase::DangerousCommand, "dangerous-command"),
        (Phase::ValidateCommit, "validate-commit"),
        (Phase::FormatOnSave, "format-on-save"),
        (Phase::Typecheck, "typecheck"),
        (Phase::JaxShapeCheck, "jax-shape-check"),
        (Phase::ImportCycleCheck, "import-cycle-check"),
        (Phase::SessionLogger, "session-logger"),
        (Phase::InjectContext, "inject-context"),
        (Phase::Context7Docs, "context7-docs"),
        (Phase::NotifyDone, "notify-done"),
        (Phase::DocReminder, "doc-reminder"),
        (Phase::PreEdit, "pre-edit"),
        (Phase::PostEdit, "post-edit"),
        (Phase::PreBash, "pre-bash"),
        (Phase::UserPrompt, "user-prompt"),
        (Phase::Stop, "stop"),
    ];

    pub fn from_name(name: &str) -> Result<Phase, HookError> {
        Self::ALL
            .iter()
            .find(|(_, n)| *n == name)
            .map(|(phase, _)| *phase)
            .ok_or_else(|| HookError::UnknownPhase(name.to_string()))
    }

    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(phase, _)| *phase == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    pub fn handler(self) -> Handler {
        match self {
            Phase::ProtectFiles => Handler::Single(protection::protect_files),
            Phase::LargeFileCheck => Handler::Single(protection::large_file_check),
            Phase::GitStatusCheck => Handler::Single(git::git_status_check),
            Phase::BranchProtection => Handler::Single(git::branch_protection),
            Phase::TestFileGuard => Handler::Single(git::test_file_guard),
            Phase::VerifyApiCalls => Handler::Single(jax::verify_api_calls),
            Phase::DangerousCommand => Handler::Single(protection::dangerous_command),
            Phase::ValidateCommit => Handler::Single(git::validate_commit),
            Phase::FormatOnSave => Handler::Single(format::format_on_save),
            Phase::Typecheck => Handler::Single(format::typecheck),
            Phase::JaxShapeCheck => Handler::Single(jax::jax_shape_check),
            Phase::ImportCycleCheck => Handler::Single(jax::import_cycle_check),
            Phase::SessionLogger => Handler::Single(session::session_logger),
            Phase::InjectContext => Handler::Single(context::inject_context),
            Phase::Context7Docs => Handler::Single(context::context7_docs),
            Phase::NotifyDone => Handler::Single(session::notify_done),
            Phase::DocReminder => Handler::Single(session::doc_reminder),
            Phase::PreEdit => Handler::Pipeline(&PRE_EDIT),
            Phase::PostEdit => Handler::Pipeline(&POST_EDIT),
            Phase::PreBash => Handler::Pipeline(&PRE_BASH),
            Phase::UserPrompt => Handler::Pipeline(&USER_PROMPT),
            Phase::Stop => Handler::Pipeline(&STOP),
        }
    }

    pub fn is_pipeline(self) -> bool {
        matches!(self.handler(), Handler::Pipeline(_))
    }
}
