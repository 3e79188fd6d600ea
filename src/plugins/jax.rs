//! Python/ML checks: API verification notes, JAX shape lint and import
//! contracts.

use crate::core::catalog::ML_LIBS;
use crate::core::context::HookContext;
use crate::core::event::Event;
use crate::core::external::ExternalCapability;
use crate::core::paths;
use crate::core::verdict::Verdict;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

pub const MAX_SHAPE_WARNINGS: usize = 10;
pub const MAX_IMPORT_LINT_LINES: usize = 20;

const JAX_IMPORT_MARKERS: &[&str] = &["import jax", "from jax", "from flax", "from jaxtyping"];

static EINSUM_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"jnp\.einsum\s*\(\s*["']([^"']+)["']"#).unwrap());

static BARE_MAP_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"jax\.(vmap|pmap)\s*\(\s*\w+\s*\)").unwrap());

pub fn verify_api_calls(event: &Event, _ctx: &HookContext) -> Verdict {
    if !event.is_file_mutation() || !event.targets_python() {
        return Verdict::allow();
    }
    let Some(content) = event.incoming_text() else {
        return Verdict::allow();
    };

    let found: Vec<&str> = ML_LIBS
        .iter()
        .copied()
        .filter(|lib| imports_module(content, lib))
        .collect();
    if found.is_empty() {
        return Verdict::allow();
    }
    Verdict::warn(format!(
        "NOTE: Code uses APIs from: {}\nThese libraries have complex/evolving APIs. Consider verifying function signatures with Context7 MCP if unsure.",
        found.join(", ")
    ))
}

fn imports_module(content: &str, module: &str) -> bool {
    content.contains(&format!("from {module}")) || content.contains(&format!("import {module}"))
}

/// Lint the saved file for einsum index mismatches and implicit vmap axes.
pub fn jax_shape_check(event: &Event, _ctx: &HookContext) -> Verdict {
    if !event.targets_python() {
        return Verdict::allow();
    }
    let Some(path) = event.target_path() else {
        return Verdict::allow();
    };
    let Ok(source) = fs::read_to_string(path) else {
        return Verdict::allow();
    };

    let warnings = shape_warnings(&source);
    if warnings.is_empty() {
        return Verdict::allow();
    }
    let shown: Vec<&str> = warnings
        .iter()
        .take(MAX_SHAPE_WARNINGS)
        .map(String::as_str)
        .collect();
    Verdict::warn(format!("JAX shape/type warnings:\n  {}", shown.join("\n  ")))
}

/// All einsum findings first, then vmap/pmap findings, with 1-based lines.
pub fn shape_warnings(source: &str) -> Vec<String> {
    if !JAX_IMPORT_MARKERS.iter().any(|m| source.contains(m)) {
        return Vec::new();
    }

    let mut warnings = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        let Some(caps) = EINSUM_CALL.captures(line) else {
            continue;
        };
        let Some((inputs, output)) = caps[1].split_once("->") else {
            continue;
        };
        let input_indices: BTreeSet<char> = inputs.chars().filter(|c| c.is_alphabetic()).collect();
        let missing: Vec<String> = output
            .chars()
            .filter(|c| c.is_alphabetic() && !input_indices.contains(c))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(String::from)
            .collect();
        if !missing.is_empty() {
            warnings.push(format!(
                "Line {}: einsum output has indices {{{}}} not present in input",
                idx + 1,
                missing.join(", ")
            ));
        }
    }

    for (idx, line) in source.lines().enumerate() {
        if BARE_MAP_CALL.is_match(line) && !line.contains("in_axes") && !line.contains("out_axes") {
            warnings.push(format!(
                "Line {}: vmap/pmap without explicit in_axes/out_axes (defaults to 0, verify this is intended)",
                idx + 1
            ));
        }
    }
    warnings
}

pub fn import_cycle_check(event: &Event, ctx: &HookContext) -> Verdict {
    if !event.targets_python() {
        return Verdict::allow();
    }
    let Some(path) = event.target_path() else {
        return Verdict::allow();
    };
    let Some(root) = paths::find_python_root(Path::new(path)) else {
        return Verdict::allow();
    };
    if !root.join(".importlinter").exists() {
        return Verdict::allow();
    }

    match ctx.execute(ExternalCapability::ImportLint, "lint-imports", &[], Some(&root)) {
        Some(out) if !out.success() => {
            let lines: Vec<&str> = out.stderr.lines().take(MAX_IMPORT_LINT_LINES).collect();
            Verdict::warn(format!("WARNING: Import cycle detected:\n{}", lines.join("\n")))
        }
        _ => Verdict::allow(),
    }
}
