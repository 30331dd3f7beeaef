// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{anyhow, Result};
use gridrun::core::config::{AttrMap, MatrixConfig, Scalar};
use gridrun::core::execution::{CommandOutcome, ContextProvider, ExecutionContext};
use gridrun::core::models::JobSpec;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Parses a matrix configuration from an inline TOML string and validates it.
pub fn parse_matrix(toml_str: &str) -> MatrixConfig {
    let matrix: MatrixConfig = toml::from_str(toml_str).expect("Failed to parse test matrix");
    matrix.validate().expect("Test matrix failed validation");
    matrix
}

/// Builds a job spec with string-valued attributes.
pub fn spec(index: usize, pairs: &[(&str, &str)]) -> JobSpec {
    let attributes: AttrMap = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Scalar::Str(value.to_string())))
        .collect();
    JobSpec::new(index, attributes)
}

/// What the scripted provider should do for one spec index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Every command in the context succeeds.
    Succeed,
    /// Every command in the context reports a failing exit status.
    FailCommand,
    /// Context acquisition itself fails (no runner available).
    RefuseAcquire,
    /// Running any command returns an infrastructure error.
    BreakOnRun,
    /// Sleep this long, then succeed. For timeout tests.
    SleepMs(u64),
}

/// An execution context provider scripted per spec index, recording which
/// specs were actually dispatched. Specs without a script succeed.
pub struct ScriptedProvider {
    scripts: BTreeMap<usize, Script>,
    dispatched: Arc<Mutex<Vec<usize>>>,
}

impl ScriptedProvider {
    pub fn new(scripts: impl IntoIterator<Item = (usize, Script)>) -> Self {
        Self {
            scripts: scripts.into_iter().collect(),
            dispatched: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Spec indices that reached context acquisition, in dispatch order.
    pub fn dispatched_indices(&self) -> Vec<usize> {
        self.dispatched.lock().unwrap().clone()
    }
}

pub struct ScriptedContext {
    script: Script,
}

impl ContextProvider for ScriptedProvider {
    type Context = ScriptedContext;

    async fn acquire(&self, spec: &JobSpec) -> Result<Self::Context> {
        self.dispatched.lock().unwrap().push(spec.index);
        let script = self
            .scripts
            .get(&spec.index)
            .copied()
            .unwrap_or(Script::Succeed);
        if script == Script::RefuseAcquire {
            return Err(anyhow!("no runner available for job #{}", spec.index));
        }
        Ok(ScriptedContext { script })
    }
}

impl ExecutionContext for ScriptedContext {
    async fn run_command(&mut self, argv: &[String]) -> Result<CommandOutcome> {
        match self.script {
            Script::Succeed => Ok(CommandOutcome {
                success: true,
                output: format!("ran: {}\n", argv.join(" ")),
            }),
            Script::FailCommand => Ok(CommandOutcome {
                success: false,
                output: format!("failed: {}\n", argv.join(" ")),
            }),
            Script::BreakOnRun => Err(anyhow!("execution context broke")),
            Script::SleepMs(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(CommandOutcome {
                    success: true,
                    output: "slow but fine\n".to_string(),
                })
            }
            Script::RefuseAcquire => unreachable!("acquire already refused"),
        }
    }
}
