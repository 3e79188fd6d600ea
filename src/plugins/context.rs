//! Prompt-time context: topic checklists and documentation lookups.

use crate::core::catalog::{DOC_TRIGGERS, KNOWN_LIBS};
use crate::core::context::HookContext;
use crate::core::event::Event;
use crate::core::verdict::Verdict;
use regex::Regex;

struct Checklist {
    keywords: &'static [&'static str],
    body: &'static str,
}

const CHECKLISTS: &[Checklist] = &[
    Checklist {
        keywords: &["deploy", "release", "publish"],
        body: "DEPLOYMENT CHECKLIST:\n\
               - Run full test suite before deploying\n\
               - Check for uncommitted changes (git status)\n\
               - Verify version bump in package.json/pyproject.toml/Cargo.toml\n\
               - Update CHANGELOG.md\n\
               - Create git tag after successful deploy",
    },
    Checklist {
        keywords: &["migration", "database", "schema"],
        body: "DATABASE SAFETY:\n\
               - Always backup before migrations\n\
               - Test migrations on staging first\n\
               - Ensure migrations are reversible when possible\n\
               - Check for long-running locks on production tables",
    },
    Checklist {
        keywords: &["optim", "performance", "slow", "fast"],
        body: "PERFORMANCE CHECKLIST:\n\
               - Profile before optimizing (measure, don't guess)\n\
               - Check algorithmic complexity first\n\
               - Consider caching strategies\n\
               - For JAX: ensure JIT compilation, check for recompilation triggers",
    },
    Checklist {
        keywords: &["auth", "security", "password", "token"],
        body: "SECURITY REMINDER:\n\
               - Never hardcode secrets - use environment variables\n\
               - Validate and sanitize all user inputs\n\
               - Use parameterized queries for database operations",
    },
    Checklist {
        keywords: &["test", "coverage", "pytest"],
        body: "TESTING GUIDELINES:\n\
               - Test behavior, not implementation\n\
               - Include edge cases: empty inputs, null values, boundaries\n\
               - For ML: test with fixed random seeds for reproducibility",
    },
    Checklist {
        keywords: &["train", "model", "jax", "flax"],
        body: "ML TRAINING CHECKLIST:\n\
               - Set random seeds for reproducibility\n\
               - Use gradient clipping (optax.clip_by_global_norm)\n\
               - Monitor for NaN/Inf in gradients\n\
               - Checkpoint frequently with Orbax",
    },
    Checklist {
        keywords: &["refactor", "clean", "restructure"],
        body: "REFACTORING GUIDELINES:\n\
               - Ensure tests pass before and after\n\
               - Make small, incremental changes\n\
               - Avoid mixing refactoring with feature changes\n\
               - Use git commits to checkpoint progress",
    },
];

/// Attach every checklist whose topic the prompt mentions.
pub fn inject_context(event: &Event, _ctx: &HookContext) -> Verdict {
    let Some(prompt) = event.prompt.as_deref().filter(|p| !p.is_empty()) else {
        return Verdict::allow();
    };
    let prompt = prompt.to_lowercase();

    let parts: Vec<&str> = CHECKLISTS
        .iter()
        .filter(|c| c.keywords.iter().any(|k| prompt.contains(k)))
        .map(|c| c.body)
        .collect();

    if parts.is_empty() {
        return Verdict::allow();
    }
    Verdict::with_context(parts.join("\n\n"))
}

pub fn context7_docs(event: &Event, _ctx: &HookContext) -> Verdict {
    match event.hook_event_name.as_deref() {
        Some("UserPromptSubmit") => suggest_for_prompt(event),
        Some("PreToolUse") => note_for_code(event),
        _ => Verdict::allow(),
    }
}

fn suggest_for_prompt(event: &Event) -> Verdict {
    let Some(prompt) = event.prompt.as_deref().filter(|p| !p.is_empty()) else {
        return Verdict::allow();
    };
    let prompt = prompt.to_lowercase();
    if prompt.contains("context7") {
        return Verdict::allow();
    }

    let is_doc_question = DOC_TRIGGERS.iter().any(|t| prompt.contains(t));
    for lib in KNOWN_LIBS.iter().filter(|lib| prompt.contains(*lib)) {
        if is_doc_question {
            return Verdict::with_context(format!(
                "Use Context7 MCP for up-to-date {lib} docs: resolve-library-id('{lib}') then get-library-docs()"
            ));
        }
        if prompt.contains('?') {
            return Verdict::with_context(format!(
                "Consider using Context7 MCP for current {lib} documentation if needed."
            ));
        }
    }
    Verdict::allow()
}

fn note_for_code(event: &Event) -> Verdict {
    if !event.is_file_mutation() || !event.targets_python() {
        return Verdict::allow();
    }
    let Some(content) = event.incoming_text() else {
        return Verdict::allow();
    };
    let content = content.to_lowercase();

    let called = KNOWN_LIBS
        .iter()
        .find(|lib| content.contains(*lib) && calls_into(lib, &content));
    match called {
        Some(lib) => Verdict::warn(format!(
            "NOTE: Code uses {lib} APIs. If unsure about function signatures, verify with Context7 MCP."
        )),
        None => Verdict::allow(),
    }
}

/// `lib.name(` anywhere in already lower-cased source.
fn calls_into(lib: &str, content: &str) -> bool {
    Regex::new(&format!(r"{}\.([a-z_]+)\(", regex::escape(lib)))
        .map(|re| re.is_match(content))
        .unwrap_or(false)
}
