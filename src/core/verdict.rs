//! Verdict algebra.
//!
//! A [`Verdict`] is the outcome of running one or more validators against
//! one event. Verdicts combine with [`Verdict::merge`]:
//!
//! - severity is the maximum of both sides (`Allow < Warn < Block`);
//! - messages are concatenated, left then right;
//! - additional context is joined with a blank line when both sides carry
//!   one, otherwise the side that has one wins.
//!
//! `merge` is associative and [`Verdict::allow`] is its identity, so a
//! pipeline can fold any sequence of verdicts left to right. Severity
//! merging is also commutative; message order is not.

/// Key under which context is surfaced back to the agent.
pub const ADDITIONAL_CONTEXT_KEY: &str = "additionalContext";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    #[default]
    Allow,
    Warn,
    Block,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Allow => "allow",
            Severity::Warn => "warn",
            Severity::Block => "block",
        }
    }

    /// Process exit status. Warnings are advisory and never change it.
    pub fn exit_code(self) -> u8 {
        match self {
            Severity::Allow | Severity::Warn => 0,
            Severity::Block => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Verdict {
    severity: Severity,
    messages: Vec<String>,
    context: Option<String>,
}

impl Verdict {
    pub fn allow() -> Self {
        Self::default()
    }

    pub fn warn(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warn,
            messages: vec![msg.into()],
            context: None,
        }
    }

    pub fn block(msg: impl Into<String>) -> Self {
        Self {
            severity: Severity::Block,
            messages: vec![msg.into()],
            context: None,
        }
    }

    /// Allow, carrying additional context for the agent.
    pub fn with_context(context: impl Into<String>) -> Self {
        Self {
            severity: Severity::Allow,
            messages: Vec::new(),
            context: Some(context.into()),
        }
    }

    /// Record a warning without short-circuiting the current validator.
    pub fn push_warning(&mut self, msg: impl Into<String>) {
        self.severity = self.severity.max(Severity::Warn);
        self.messages.push(msg.into());
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Block
    }

    pub fn is_silent(&self) -> bool {
        self.messages.is_empty() && self.context.is_none()
    }

    pub fn merge(mut self, other: Verdict) -> Verdict {
        self.severity = self.severity.max(other.severity);
        self.messages.extend(other.messages);
        self.context = match (self.context, other.context) {
            (Some(left), Some(right)) => Some(format!("{}\n\n{}", left, right)),
            (left, right) => right.or(left),
        };
        self
    }

    /// JSON object emitted on stdout, if any context was produced.
    pub fn context_payload(&self) -> Option<serde_json::Value> {
        self.context
            .as_ref()
            .map(|ctx| serde_json::json!({ ADDITIONAL_CONTEXT_KEY: ctx }))
    }
}

impl FromIterator<Verdict> for Verdict {
    fn from_iter<I: IntoIterator<Item = Verdict>>(iter: I) -> Self {
        iter.into_iter().fold(Verdict::allow(), Verdict::merge)
    }
}
