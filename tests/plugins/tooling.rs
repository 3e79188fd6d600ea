use hookwarden::core::config::HookConfig;
use hookwarden::core::context::HookContext;
use hookwarden::core::error::HookError;
use hookwarden::core::event::{Event, ToolKind};
use hookwarden::core::external::{CommandOutput, CommandRunner};
use hookwarden::core::pipeline::Validator;
use hookwarden::core::verdict::{Severity, Verdict};
use hookwarden::plugins::format::{format_on_save, typecheck};
use hookwarden::plugins::jax::{import_cycle_check, jax_shape_check, verify_api_calls};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    argv: String,
    cwd: Option<PathBuf>,
}

/// Every tool is installed; replies are matched on the program name.
#[derive(Default)]
struct Recorder {
    replies: Vec<(&'static str, CommandOutput)>,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Recorder {
    fn reply(mut self, program: &'static str, code: i32, stdout: &str, stderr: &str) -> Self {
        self.replies.push((
            program,
            CommandOutput {
                code: Some(code),
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        ));
        self
    }
}

impl CommandRunner for Recorder {
    fn is_available(&self, _program: &str) -> bool {
        true
    }

    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
        _timeout: Duration,
    ) -> Result<CommandOutput, HookError> {
        self.calls.borrow_mut().push(Call {
            argv: format!("{} {}", program, args.join(" ")),
            cwd: cwd.map(Path::to_path_buf),
        });
        Ok(self
            .replies
            .iter()
            .find(|(p, _)| *p == program)
            .map(|(_, out)| out.clone())
            .unwrap_or(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            }))
    }
}

fn saved(path: &Path) -> Event {
    Event {
        tool: Some(ToolKind::Write),
        file_path: Some(path.to_string_lossy().into_owned()),
        ..Event::default()
    }
}

fn run_with(recorder: Recorder, validator: Validator, event: &Event) -> (Verdict, Vec<Call>) {
    let calls = recorder.calls.clone();
    let ctx = HookContext::with_runner(HookConfig::default(), Box::new(recorder));
    let verdict = validator(event, &ctx);
    let calls = calls.borrow().clone();
    (verdict, calls)
}

#[test]
fn formatter_follows_extension() {
    let tmp = tempdir().unwrap();
    let cases: [(&str, &[&str]); 5] = [
        ("a.py", &["ruff check {} --fix --quiet", "ruff format {} --quiet"]),
        ("a.rs", &["rustfmt {}"]),
        ("a.tsx", &["npx prettier --write {}"]),
        ("a.json", &["npx prettier --write {}"]),
        ("a.md", &["npx prettier --write {} --prose-wrap=always"]),
    ];
    for (name, expected) in cases {
        let file = tmp.path().join(name);
        fs::write(&file, "x").unwrap();
        let (verdict, calls) = run_with(Recorder::default(), format_on_save, &saved(&file));
        assert!(verdict.is_silent());
        let path = file.to_string_lossy();
        let argv: Vec<String> = calls.into_iter().map(|c| c.argv).collect();
        let expected: Vec<String> = expected.iter().map(|e| e.replace("{}", &path)).collect();
        assert_eq!(argv, expected, "{}", name);
    }
}

#[test]
fn formatter_ignores_missing_and_unknown_files() {
    let tmp = tempdir().unwrap();
    let (_, calls) = run_with(Recorder::default(), format_on_save, &saved(&tmp.path().join("gone.py")));
    assert!(calls.is_empty());

    let other = tmp.path().join("notes.txt");
    fs::write(&other, "x").unwrap();
    let (_, calls) = run_with(Recorder::default(), format_on_save, &saved(&other));
    assert!(calls.is_empty());
}

#[test]
fn formatter_failure_never_blocks() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("a.rs");
    fs::write(&file, "fn").unwrap();
    let recorder = Recorder::default().reply("rustfmt", 1, "", "error: expected item");
    let (verdict, _) = run_with(recorder, format_on_save, &saved(&file));
    assert_eq!(verdict.severity(), Severity::Allow);
}

#[test]
fn mypy_runs_through_uv_when_configured() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("pyproject.toml"), "[tool.mypy]\nstrict = true\n").unwrap();
    fs::create_dir(root.join("pkg")).unwrap();
    let file = root.join("pkg/mod.py");
    fs::write(&file, "x: int = 'a'\n").unwrap();

    let stdout = "pkg/mod.py:1: error: Incompatible types in assignment\nother/file.py:3: error: nope\n";
    let recorder = Recorder::default().reply("uv", 1, stdout, "");
    let (verdict, calls) = run_with(recorder, typecheck, &saved(&file));

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].argv, "uv run --quiet mypy pkg/mod.py --no-error-summary --no-color");
    assert_eq!(calls[0].cwd.as_deref(), Some(root));
    assert!(verdict.is_blocking());
    let message = &verdict.messages()[0];
    assert!(message.starts_with(&format!("mypy errors in {}:", file.display())));
    assert!(message.contains("pkg/mod.py:1: error"));
    assert!(!message.contains("other/file.py"));
}

#[test]
fn mypy_is_skipped_without_config() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("setup.py"), "").unwrap();
    let file = tmp.path().join("a.py");
    fs::write(&file, "").unwrap();
    let (verdict, calls) = run_with(Recorder::default(), typecheck, &saved(&file));
    assert!(verdict.is_silent());
    assert!(calls.is_empty());
}

#[test]
fn plain_mypy_without_pyproject() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("setup.cfg"), "").unwrap();
    fs::write(tmp.path().join("mypy.ini"), "[mypy]\n").unwrap();
    let file = tmp.path().join("a.py");
    fs::write(&file, "").unwrap();
    let (verdict, calls) = run_with(Recorder::default(), typecheck, &saved(&file));
    assert!(verdict.is_silent());
    assert_eq!(calls[0].argv, "mypy a.py --no-error-summary --no-color");
}

#[test]
fn tsc_errors_for_the_file_block() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("tsconfig.json"), "{}").unwrap();
    fs::create_dir(tmp.path().join("src")).unwrap();
    let file = tmp.path().join("src/app.ts");
    fs::write(&file, "let x: number = 'a';").unwrap();
    let path = file.to_string_lossy().into_owned();

    let stdout = "src/app.ts(1,5): error TS2322: Type 'string' is not assignable\n\
                  src/other.ts(2,1): error TS2304: Cannot find name 'y'\n";
    let recorder = Recorder::default().reply("npx", 2, stdout, "");
    let (verdict, calls) = run_with(recorder, typecheck, &saved(&file));
    assert!(calls[0].argv.starts_with("npx tsc --noEmit --project "));
    assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path()));
    assert!(verdict.is_blocking());
    let message = &verdict.messages()[0];
    assert!(message.starts_with(&format!("TypeScript errors in {}:", path)));
    assert!(message.contains("src/app.ts(1,5): error TS2322"));
    assert!(!message.contains("src/other.ts"));
}

#[test]
fn tsc_errors_in_other_files_are_ignored() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("tsconfig.json"), "{}").unwrap();
    let file = tmp.path().join("app.ts");
    fs::write(&file, "").unwrap();
    let recorder = Recorder::default().reply("npx", 2, "lib.ts(1,1): error TS1005: ';' expected\n", "");
    let (verdict, _) = run_with(recorder, typecheck, &saved(&file));
    assert!(verdict.is_silent());
}

#[test]
fn clippy_errors_are_capped() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("Cargo.toml"), "[package]\n").unwrap();
    fs::create_dir(tmp.path().join("src")).unwrap();
    let file = tmp.path().join("src/lib.rs");
    fs::write(&file, "").unwrap();

    let stderr: String = (0..15)
        .map(|i| format!("error[E0{}]: bad\nwarning: meh\n", i))
        .collect();
    let recorder = Recorder::default().reply("cargo", 101, "", &stderr);
    let (verdict, calls) = run_with(recorder, typecheck, &saved(&file));
    assert_eq!(calls[0].argv, "cargo clippy --message-format=short");
    assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path()));
    assert!(verdict.is_blocking());
    let message = &verdict.messages()[0];
    assert!(message.starts_with("Clippy errors:\n"));
    assert_eq!(message.lines().count(), 11);
    assert!(!message.contains("warning"));
}

#[test]
fn api_note_lists_libraries_in_catalog_order() {
    let ctx = HookContext::default();
    let event = Event {
        tool: Some(ToolKind::Edit),
        file_path: Some("/p/train.py".to_string()),
        new_string: Some("import optax\nfrom flax.nnx import Linear\n".to_string()),
        ..Event::default()
    };
    let verdict = verify_api_calls(&event, &ctx);
    assert_eq!(verdict.severity(), Severity::Warn);
    assert!(verdict.messages()[0].starts_with("NOTE: Code uses APIs from: flax.nnx, optax\n"));

    let rust = Event {
        file_path: Some("/p/train.rs".to_string()),
        ..event
    };
    assert!(verify_api_calls(&rust, &ctx).is_silent());
}

#[test]
fn shape_check_reads_the_saved_file() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("net.py");
    fs::write(
        &file,
        "import jax\nimport jax.numpy as jnp\ny = jnp.einsum('bi,ij->bk', x, w)\nf = jax.vmap(g)\n",
    )
    .unwrap();
    let verdict = jax_shape_check(&saved(&file), &HookContext::default());
    assert_eq!(verdict.severity(), Severity::Warn);
    let message = &verdict.messages()[0];
    assert!(message.starts_with("JAX shape/type warnings:\n  Line 3:"));
    assert!(message.contains("\n  Line 4: vmap/pmap"));
}

#[test]
fn shape_check_caps_warning_lines() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("many.py");
    let mut source = String::from("from jax import vmap\nimport jax\n");
    for _ in 0..14 {
        source.push_str("h = jax.pmap(step)\n");
    }
    fs::write(&file, source).unwrap();
    let verdict = jax_shape_check(&saved(&file), &HookContext::default());
    assert_eq!(verdict.messages()[0].lines().count(), 11);
}

#[test]
fn import_linter_runs_only_when_configured() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("pyproject.toml"), "").unwrap();
    let file = tmp.path().join("a.py");
    fs::write(&file, "").unwrap();

    let (verdict, calls) = run_with(Recorder::default(), import_cycle_check, &saved(&file));
    assert!(verdict.is_silent());
    assert!(calls.is_empty());

    fs::write(tmp.path().join(".importlinter"), "[importlinter]\n").unwrap();
    let stderr: String = (0..30).map(|i| format!("line {}\n", i)).collect();
    let recorder = Recorder::default().reply("lint-imports", 1, "", &stderr);
    let (verdict, calls) = run_with(recorder, import_cycle_check, &saved(&file));
    assert_eq!(calls[0].argv, "lint-imports ");
    assert_eq!(verdict.severity(), Severity::Warn);
    let message = &verdict.messages()[0];
    assert!(message.starts_with("WARNING: Import cycle detected:\nline 0"));
    assert_eq!(message.lines().count(), 21);
}
