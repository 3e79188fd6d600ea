//! Per-phase validator pipelines.
//!
//! A pipeline folds its steps' verdicts left to right with
//! [`Verdict::merge`]. A step marked as a gate stops the pipeline when the
//! accumulated verdict is blocking; every other step always runs.

use crate::core::context::HookContext;
use crate::core::event::Event;
use crate::core::verdict::Verdict;

/// A policy check: one event in, one verdict out.
pub type Validator = fn(&Event, &HookContext) -> Verdict;

#[derive(Clone, Copy)]
pub struct Step {
    pub name: &'static str,
    pub validator: Validator,
    /// Stop the pipeline here if the verdict so far blocks.
    pub gate: bool,
}

impl Step {
    pub const fn run(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            validator,
            gate: false,
        }
    }

    pub const fn gate(name: &'static str, validator: Validator) -> Self {
        Self {
            name,
            validator,
            gate: true,
        }
    }
}

#[derive(Clone, Copy)]
pub struct Pipeline {
    pub name: &'static str,
    pub steps: &'static [Step],
}

impl Pipeline {
    pub fn run(&self, event: &Event, ctx: &HookContext) -> Verdict {
        let mut verdict = Verdict::allow();
        for step in self.steps {
            let outcome = (step.validator)(event, ctx);
            tracing::debug!(
                pipeline = self.name,
                step = step.name,
                severity = outcome.severity().as_str(),
                "step finished"
            );
            verdict = verdict.merge(outcome);
            if step.gate && verdict.is_blocking() {
                tracing::debug!(pipeline = self.name, step = step.name, "short-circuit on block");
                break;
            }
        }
        verdict
    }

    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|s| s.name)
    }
}
