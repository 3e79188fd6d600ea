//! Pattern catalogs
//!
//! Static rule sets consulted by the validators:
//! - Protected path globs (plus operator-supplied extras)
//! - Secret signatures
//! - Dangerous shell command signatures
//! - Commit message and branch name grammars
//! - Library, branch, test-file and source-extension name sets
//!
//! Everything here is built once per process and never mutated.

use glob::Pattern;
use regex::Regex;
use std::sync::LazyLock;

/// Built-in protected path globs, checked in order.
pub const PROTECTED_PATTERNS: &[&str] = &[
    "*.env",
    "*.env.*",
    "*/.env",
    "*/.env.*",
    "*credentials*",
    "*secrets*",
    "*.pem",
    "*.key",
    "*.crt",
    "*id_rsa*",
    "*id_ed25519*",
    ".git/*",
    "*/.git/*",
    "package-lock.json",
    "yarn.lock",
    "Cargo.lock",
    "uv.lock",
    "poetry.lock",
    ".vscode/settings.json",
    ".idea/*",
];

/// Branches on which direct edits draw a warning.
pub const PROTECTED_BRANCHES: &[&str] =
    &["main", "master", "production", "prod", "release", "develop"];

/// Libraries with fast-moving APIs, matched against `from X` / `import X`.
pub const ML_LIBS: &[&str] = &[
    "jax",
    "jax.numpy",
    "jax.lax",
    "jax.random",
    "jax.nn",
    "flax.nnx",
    "flax.linen",
    "optax",
    "orbax",
    "orbax.checkpoint",
    "jaxtyping",
    "grain",
    "chex",
    "equinox",
    "fiddle",
    "langchain",
    "transformers",
    "anthropic",
    "openai",
];

/// Libraries for which a documentation lookup is suggested.
pub const KNOWN_LIBS: &[&str] = &[
    "jax",
    "flax",
    "optax",
    "orbax",
    "grain",
    "jaxtyping",
    "chex",
    "equinox",
    "pydantic",
    "fastapi",
    "pytest",
    "numpy",
    "pandas",
    "transformers",
    "torch",
    "pytorch",
    "tensorflow",
    "langchain",
    "openai",
    "anthropic",
    "httpx",
    "sqlalchemy",
    "redis",
    "celery",
    "aiohttp",
    "requests",
    "django",
    "flask",
];

/// Phrases that mark a prompt as a documentation question.
pub const DOC_TRIGGERS: &[&str] = &[
    "how do i",
    "how to",
    "how can i",
    "documentation",
    "docs",
    "api",
    "examples",
    "tutorial",
    "guide",
    "getting started",
    "learn",
    "show me how",
];

/// Path fragments that identify test files.
pub const TEST_FILE_MARKERS: &[&str] = &[
    "test_",
    "_test.",
    "/tests/",
    "Test.java",
    "Test.ts",
    "Test.tsx",
    ".test.ts",
    ".test.tsx",
    ".test.js",
    ".spec.ts",
    ".spec.js",
];

/// Extensions counted as source code by the documentation reminder.
pub const SOURCE_EXTENSIONS: &[&str] = &[
    "py", "rs", "ts", "tsx", "js", "jsx", "go", "java", "kt", "swift", "c", "cc", "cpp", "h",
    "hpp", "rb", "php", "cs", "scala", "sh",
];

/// A named regular expression for credential material.
pub struct SecretSignature {
    pub name: &'static str,
    pub regex: Regex,
}

pub static SECRET_SIGNATURES: LazyLock<Vec<SecretSignature>> = LazyLock::new(|| {
    [
        ("aws-access-key", r"AKIA[0-9A-Z]{16}"),
        ("openai-api-key", r"sk-[a-zA-Z0-9]{48}"),
        ("openai-project-key", r"sk-proj-[a-zA-Z0-9\-]{80,}"),
        ("github-pat", r"ghp_[a-zA-Z0-9]{36}"),
        ("github-oauth", r"gho_[a-zA-Z0-9]{36}"),
        ("github-fine-grained-pat", r"github_pat_[a-zA-Z0-9]{22}_[a-zA-Z0-9]{59}"),
        ("slack-token", r"xox[baprs]-[a-zA-Z0-9\-]+"),
        ("stripe-live-key", r"sk_live_[a-zA-Z0-9]+"),
        ("stripe-restricted-key", r"rk_live_[a-zA-Z0-9]+"),
    ]
    .into_iter()
    .map(|(name, pattern)| SecretSignature {
        name,
        regex: Regex::new(pattern).unwrap(),
    })
    .collect()
});

/// Shell command signatures that are always blocked, in match order.
pub static DANGEROUS_COMMANDS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"rm -rf /($|[^a-zA-Z])",
        r"rm -rf /\*",
        r"rm -rf ~",
        r"rm -rf ~/\*",
        r"rm -rf \$HOME",
        r"rm -rf \.$",
        r"rm -rf \.\.",
        r"rm -rf \./\*",
        r"mkfs",
        r"dd if=.* of=/dev/",
        r"> /dev/sd",
        r"chmod -R 777 /",
        r"chown -R .* /",
        r":\(\)\{ :\|:& \};:",
        r"fork while fork",
        r"history -c",
        r"shred.*history",
        r"shred.*bash_history",
        r"git push.*--force.*main",
        r"git push.*--force.*master",
        r"git push.*-f.*main",
        r"git push.*-f.*master",
        r"git reset --hard.*origin/main",
        r"git reset --hard.*origin/master",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// `rm -rf` whose target involves a variable expansion.
pub static RM_WITH_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"rm\s+-rf?\s+.*\$").unwrap());

pub static COMMIT_MESSAGE_ARG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"-m\s*["']([^"']+)["']"#).unwrap());

pub static CONVENTIONAL_COMMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(feat|fix|docs|style|refactor|perf|test|chore|ci|build|revert)(\([a-zA-Z0-9_-]+\))?: .+",
    )
    .unwrap()
});

pub static BRANCH_CREATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(checkout\s+-b|switch\s+-c)\s+(\S+)").unwrap());

/// Long-lived branches exempt from the naming convention.
pub static BRANCH_EXEMPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(main|master|develop|release/.+|hotfix/.+)$").unwrap());

pub static BRANCH_NAMING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(feat|fix|refactor|docs|test|chore|ci|build|perf|revert)/[a-z0-9-]+$").unwrap()
});

/// Commit types with their one-line meaning, in display order.
pub const COMMIT_TYPES: &[(&str, &str)] = &[
    ("feat", "New feature"),
    ("fix", "Bug fix"),
    ("docs", "Documentation only"),
    ("style", "Formatting (no code change)"),
    ("refactor", "Code restructuring"),
    ("perf", "Performance improvement"),
    ("test", "Adding/updating tests"),
    ("chore", "Maintenance tasks"),
    ("ci", "CI/CD changes"),
    ("build", "Build system changes"),
    ("revert", "Reverting changes"),
];

/// One protected-path rule.
#[derive(Debug, Clone)]
pub struct ProtectedPattern {
    raw: String,
    glob: Pattern,
    basename_fallback: bool,
}

impl ProtectedPattern {
    pub fn new(raw: &str) -> Result<Self, glob::PatternError> {
        Ok(Self {
            raw: raw.to_string(),
            glob: Pattern::new(raw)?,
            basename_fallback: !raw.contains('/'),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whole-path match, then basename match for separator-free patterns.
    /// `*` may cross `/` in the whole-path form.
    pub fn matches(&self, path: &str) -> bool {
        if self.glob.matches(path) {
            return true;
        }
        if self.basename_fallback {
            let basename = path.rsplit('/').next().unwrap_or(path);
            return self.glob.matches(basename);
        }
        false
    }
}

/// Per-process catalog: built-in protected paths plus configured extras.
#[derive(Debug, Clone)]
pub struct Catalog {
    protected: Vec<ProtectedPattern>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Catalog {
    /// Build the catalog. Extra patterns that are not valid globs are
    /// skipped with a warning.
    pub fn new(extra_protected: &[String]) -> Self {
        let builtin = PROTECTED_PATTERNS.iter().copied();
        let extra = extra_protected.iter().map(String::as_str);
        let protected = builtin
            .chain(extra)
            .filter_map(|raw| match ProtectedPattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(err) => {
                    tracing::warn!(pattern = raw, error = %err, "skipping invalid protected pattern");
                    None
                }
            })
            .collect();
        Self { protected }
    }

    pub fn protected_patterns(&self) -> &[ProtectedPattern] {
        &self.protected
    }

    /// First protected pattern matching `path`.
    pub fn protected_match(&self, path: &str) -> Option<&ProtectedPattern> {
        self.protected.iter().find(|p| p.matches(path))
    }

    /// First secret signature found anywhere in `content`.
    pub fn secret_match(&self, content: &str) -> Option<&'static SecretSignature> {
        SECRET_SIGNATURES.iter().find(|s| s.regex.is_match(content))
    }

    /// First dangerous command signature matching `command`.
    pub fn dangerous_match(&self, command: &str) -> Option<&'static Regex> {
        DANGEROUS_COMMANDS.iter().find(|r| r.is_match(command))
    }
}
