//! Per-invocation environment shared by every validator.

use crate::core::catalog::Catalog;
use crate::core::config::HookConfig;
use crate::core::external::{CommandOutput, CommandRunner, ExternalCapability, SystemRunner};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

/// Read-only configuration and catalog, plus the command runner and the
/// tool-availability cache for this invocation.
pub struct HookContext {
    config: HookConfig,
    catalog: Catalog,
    runner: Box<dyn CommandRunner>,
    probes: RefCell<HashMap<String, bool>>,
}

impl HookContext {
    pub fn new(config: HookConfig) -> Self {
        Self::with_runner(config, Box::new(SystemRunner))
    }

    pub fn with_runner(config: HookConfig, runner: Box<dyn CommandRunner>) -> Self {
        let catalog = Catalog::new(&config.extra_protected_patterns);
        Self {
            config,
            catalog,
            runner,
            probes: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &HookConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Probe for `program` once; later calls reuse the answer.
    pub fn has_tool(&self, program: &str) -> bool {
        if let Some(&known) = self.probes.borrow().get(program) {
            return known;
        }
        let available = self.runner.is_available(program);
        tracing::debug!(program, available, "probed external tool");
        self.probes
            .borrow_mut()
            .insert(program.to_string(), available);
        available
    }

    /// Run an external tool for evidence. Any failure (not allowed, not
    /// installed, spawn error, timeout) is reported as `None`.
    pub fn execute(
        &self,
        capability: ExternalCapability,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> Option<CommandOutput> {
        if !capability.allows(program) {
            tracing::warn!(
                capability = capability.as_str(),
                program,
                "external tool not allowed for capability"
            );
            return None;
        }
        if !self.has_tool(program) {
            return None;
        }
        let timeout = capability.timeout(&self.config.timeouts);
        match self.runner.run(program, args, cwd, timeout) {
            Ok(output) => {
                tracing::debug!(
                    capability = capability.as_str(),
                    program,
                    ?args,
                    code = ?output.code,
                    "external tool finished"
                );
                Some(output)
            }
            Err(err) => {
                tracing::warn!(
                    capability = capability.as_str(),
                    program,
                    error = %err,
                    "external tool unavailable, treating as no evidence"
                );
                None
            }
        }
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new(HookConfig::default())
    }
}
