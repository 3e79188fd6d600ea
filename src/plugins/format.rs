//! Post-write formatting and type checking through external tools.

use crate::core::context::HookContext;
use crate::core::event::Event;
use crate::core::external::ExternalCapability;
use crate::core::paths;
use crate::core::verdict::Verdict;
use std::fs;
use std::path::Path;

pub const MAX_CLIPPY_ERRORS: usize = 10;

const PRETTIER_EXTENSIONS: &[&str] = &["ts", "tsx", "js", "jsx", "json"];
const MYPY_CONFIG_FILES: &[&str] = &["mypy.ini", ".mypy.ini"];

/// Run the formatter for the file's extension. Never fails the event.
pub fn format_on_save(event: &Event, ctx: &HookContext) -> Verdict {
    let Some(file) = event.target_path() else {
        return Verdict::allow();
    };
    if !Path::new(file).exists() {
        return Verdict::allow();
    }

    let fmt = |program: &str, args: &[&str]| {
        ctx.execute(ExternalCapability::Format, program, args, None);
    };
    if paths::has_extension(file, &["py"]) {
        fmt("ruff", &["check", file, "--fix", "--quiet"]);
        fmt("ruff", &["format", file, "--quiet"]);
    } else if paths::has_extension(file, &["rs"]) {
        fmt("rustfmt", &[file]);
    } else if paths::has_extension(file, PRETTIER_EXTENSIONS) {
        fmt("npx", &["prettier", "--write", file]);
    } else if paths::has_extension(file, &["md"]) {
        fmt("npx", &["prettier", "--write", file, "--prose-wrap=always"]);
    }
    Verdict::allow()
}

pub fn typecheck(event: &Event, ctx: &HookContext) -> Verdict {
    let Some(file) = event.target_path() else {
        return Verdict::allow();
    };
    if !Path::new(file).exists() {
        return Verdict::allow();
    }

    if paths::has_extension(file, &["py"]) {
        typecheck_python(file, ctx)
    } else if paths::has_extension(file, &["ts", "tsx"]) {
        typecheck_typescript(file, ctx)
    } else if paths::has_extension(file, &["rs"]) {
        typecheck_rust(file, ctx)
    } else {
        Verdict::allow()
    }
}

/// mypy is opt-in: the project must carry a mypy config.
pub fn has_mypy_config(root: &Path) -> bool {
    if MYPY_CONFIG_FILES.iter().any(|f| root.join(f).exists()) {
        return true;
    }
    fs::read_to_string(root.join("pyproject.toml"))
        .map(|text| text.contains("[tool.mypy]"))
        .unwrap_or(false)
}

fn typecheck_python(file: &str, ctx: &HookContext) -> Verdict {
    let path = Path::new(file);
    let Some(root) = paths::find_python_root(path) else {
        return Verdict::allow();
    };
    if !has_mypy_config(&root) {
        return Verdict::allow();
    }
    let Some(rel) = path.strip_prefix(&root).ok().and_then(|p| p.to_str()) else {
        return Verdict::allow();
    };

    let output = if root.join("pyproject.toml").exists() {
        ctx.execute(
            ExternalCapability::Typecheck,
            "uv",
            &["run", "--quiet", "mypy", rel, "--no-error-summary", "--no-color"],
            Some(&root),
        )
    } else {
        ctx.execute(
            ExternalCapability::Typecheck,
            "mypy",
            &[rel, "--no-error-summary", "--no-color"],
            Some(&root),
        )
    };

    let Some(out) = output.filter(|o| !o.success()) else {
        return Verdict::allow();
    };
    let errors: Vec<&str> = out.stdout.lines().filter(|l| l.starts_with(rel)).collect();
    if errors.is_empty() {
        return Verdict::allow();
    }
    Verdict::block(format!("mypy errors in {}:\n{}", file, errors.join("\n")))
}

fn typecheck_typescript(file: &str, ctx: &HookContext) -> Verdict {
    let Some(project) = paths::find_upwards(Path::new(file), &["tsconfig.json"]) else {
        return Verdict::allow();
    };
    let tsconfig = project.join("tsconfig.json");
    let Some(tsconfig) = tsconfig.to_str() else {
        return Verdict::allow();
    };

    let Some(out) = ctx.execute(
        ExternalCapability::Typecheck,
        "npx",
        &["tsc", "--noEmit", "--project", tsconfig],
        Some(&project),
    ) else {
        return Verdict::allow();
    };
    // tsc reports paths relative to its working directory.
    let rel = Path::new(file)
        .strip_prefix(&project)
        .ok()
        .and_then(Path::to_str)
        .unwrap_or(file);
    let errors: Vec<&str> = out
        .stdout
        .lines()
        .filter(|l| l.starts_with(rel) || l.starts_with(file))
        .collect();
    if errors.is_empty() {
        return Verdict::allow();
    }
    Verdict::block(format!("TypeScript errors in {}:\n{}", file, errors.join("\n")))
}

fn typecheck_rust(file: &str, ctx: &HookContext) -> Verdict {
    let Some(crate_dir) = paths::find_upwards(Path::new(file), &["Cargo.toml"]) else {
        return Verdict::allow();
    };
    let Some(out) = ctx.execute(
        ExternalCapability::Typecheck,
        "cargo",
        &["clippy", "--message-format=short"],
        Some(&crate_dir),
    ) else {
        return Verdict::allow();
    };

    let errors: Vec<&str> = out
        .stderr
        .lines()
        .filter(|l| l.starts_with("error"))
        .take(MAX_CLIPPY_ERRORS)
        .collect();
    if errors.is_empty() {
        return Verdict::allow();
    }
    Verdict::block(format!("Clippy errors:\n{}", errors.join("\n")))
}
