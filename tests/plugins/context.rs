use hookwarden::core::context::HookContext;
use hookwarden::core::event::{Event, ToolKind};
use hookwarden::core::verdict::Severity;
use hookwarden::plugins::context::{context7_docs, inject_context};

fn prompt(text: &str) -> Event {
    Event {
        prompt: Some(text.to_string()),
        hook_event_name: Some("UserPromptSubmit".to_string()),
        ..Event::default()
    }
}

fn pre_tool(tool: ToolKind, path: &str, content: &str) -> Event {
    Event {
        tool: Some(tool),
        file_path: Some(path.to_string()),
        content: Some(content.to_string()),
        hook_event_name: Some("PreToolUse".to_string()),
        ..Event::default()
    }
}

#[test]
fn each_topic_adds_its_checklist() {
    let ctx = HookContext::default();
    let cases = [
        ("Please publish the crate", "DEPLOYMENT CHECKLIST:"),
        ("write a schema migration", "DATABASE SAFETY:"),
        ("this loop is SLOW", "PERFORMANCE CHECKLIST:"),
        ("rotate the password", "SECURITY REMINDER:"),
        ("add coverage", "TESTING GUIDELINES:"),
        ("train it", "ML TRAINING CHECKLIST:"),
        ("restructure the module", "REFACTORING GUIDELINES:"),
    ];
    for (text, header) in cases {
        let verdict = inject_context(&prompt(text), &ctx);
        assert_eq!(verdict.severity(), Severity::Allow);
        assert!(verdict.messages().is_empty());
        let context = verdict.context().unwrap();
        assert!(context.starts_with(header), "{:?} -> {}", text, context);
    }
}

#[test]
fn multiple_topics_join_in_fixed_order() {
    let ctx = HookContext::default();
    let verdict = inject_context(&prompt("Refactor auth before we deploy"), &ctx);
    let context = verdict.context().unwrap();
    let sections: Vec<&str> = context.split("\n\n").collect();
    assert_eq!(sections.len(), 3);
    assert!(sections[0].starts_with("DEPLOYMENT"));
    assert!(sections[1].starts_with("SECURITY"));
    assert!(sections[2].starts_with("REFACTORING"));
}

#[test]
fn unrelated_or_empty_prompts_are_silent() {
    let ctx = HookContext::default();
    assert!(inject_context(&prompt("What is 2 + 2?"), &ctx).is_silent());
    assert!(inject_context(&prompt(""), &ctx).is_silent());
    assert!(inject_context(&Event::default(), &ctx).is_silent());
}

#[test]
fn documentation_questions_get_strong_suggestion() {
    let ctx = HookContext::default();
    let verdict = context7_docs(&prompt("How do I use FastAPI dependencies"), &ctx);
    assert_eq!(
        verdict.context(),
        Some("Use Context7 MCP for up-to-date fastapi docs: resolve-library-id('fastapi') then get-library-docs()")
    );
}

#[test]
fn plain_questions_get_soft_suggestion() {
    let ctx = HookContext::default();
    let verdict = context7_docs(&prompt("why does pandas drop my index?"), &ctx);
    assert_eq!(
        verdict.context(),
        Some("Consider using Context7 MCP for current pandas documentation if needed.")
    );
}

#[test]
fn first_catalogued_library_wins() {
    let ctx = HookContext::default();
    let verdict = context7_docs(&prompt("numpy vs jax docs"), &ctx);
    assert!(verdict.context().unwrap().contains("up-to-date jax docs"));
}

#[test]
fn suggestion_is_skipped_when_already_asked_or_not_a_question() {
    let ctx = HookContext::default();
    assert!(context7_docs(&prompt("use context7 for the flask docs"), &ctx).is_silent());
    assert!(context7_docs(&prompt("refactor the flask app"), &ctx).is_silent());
    let no_phase = Event {
        prompt: Some("how do I use flask".to_string()),
        ..Event::default()
    };
    assert!(context7_docs(&no_phase, &ctx).is_silent());
}

#[test]
fn python_edits_calling_known_libraries_get_a_note() {
    let ctx = HookContext::default();
    let verdict = context7_docs(
        &pre_tool(ToolKind::Write, "/p/model.py", "import optax\ntx = optax.adamw(1e-3)\n"),
        &ctx,
    );
    assert_eq!(verdict.severity(), Severity::Warn);
    assert_eq!(
        verdict.messages(),
        ["NOTE: Code uses optax APIs. If unsure about function signatures, verify with Context7 MCP."]
    );
}

#[test]
fn code_notes_need_python_mutations_with_calls() {
    let ctx = HookContext::default();
    let call = "x = numpy.zeros(3)";
    assert!(context7_docs(&pre_tool(ToolKind::Write, "/p/a.rs", call), &ctx).is_silent());
    assert!(context7_docs(&pre_tool(ToolKind::Read, "/p/a.py", call), &ctx).is_silent());
    assert!(context7_docs(&pre_tool(ToolKind::Write, "/p/a.py", "import numpy"), &ctx).is_silent());

    let edit = Event {
        tool: Some(ToolKind::Edit),
        file_path: Some("/p/a.py".to_string()),
        new_string: Some("y = Requests.get(url)".to_string()),
        hook_event_name: Some("PreToolUse".to_string()),
        ..Event::default()
    };
    let verdict = context7_docs(&edit, &ctx);
    assert!(verdict.messages()[0].contains("requests APIs"));
}
