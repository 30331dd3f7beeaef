//! # Local Execution Context Module / 本地执行上下文模块
//!
//! The shipped implementation of the execution context seam: provisions an
//! isolated temporary workspace per job, optionally stages a source tree
//! into it, and runs commands as local processes with the job's attributes
//! exported as `MATRIX_*` environment variables.
//!
//! 执行上下文接口的内置实现：为每个作业供给隔离的临时工作区，
//! 可选地将源码树复制进去，并以本地进程运行命令，
//! 作业属性作为 `MATRIX_*` 环境变量导出。

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::execution::{CommandOutcome, ContextProvider, ExecutionContext};
use crate::core::models::JobSpec;
use crate::infra::{command, fs};

/// Provisions local workspaces and processes for job execution.
/// 为作业执行供给本地工作区和进程。
#[derive(Debug, Clone, Default)]
pub struct LocalContextProvider {
    /// Directory staged into each workspace before any step runs; this is
    /// the local stand-in for source checkout.
    /// 在任何步骤运行前复制到每个工作区的目录；这是源码检出的本地替代。
    source_dir: Option<PathBuf>,
}

impl LocalContextProvider {
    pub fn new(source_dir: Option<PathBuf>) -> Self {
        Self { source_dir }
    }
}

/// One provisioned local environment: a workspace directory plus the job's
/// exported attribute environment.
/// 一个已供给的本地环境：工作区目录加上作业导出的属性环境变量。
#[derive(Debug)]
pub struct LocalContext {
    workspace: fs::JobWorkspace,
    env: Vec<(String, String)>,
}

impl ContextProvider for LocalContextProvider {
    type Context = LocalContext;

    async fn acquire(&self, spec: &JobSpec) -> Result<Self::Context> {
        let workspace = fs::create_job_workspace(&spec.label())
            .with_context(|| format!("Failed to provision workspace for job {spec}"))?;

        if let Some(source) = &self.source_dir {
            fs::stage_source_dir(source, workspace.path())
                .with_context(|| format!("Failed to stage sources for job {spec}"))?;
        }

        Ok(LocalContext {
            workspace,
            env: spec.env_vars(),
        })
    }
}

impl ExecutionContext for LocalContext {
    async fn run_command(&mut self, argv: &[String]) -> Result<CommandOutcome> {
        let cmd = command::build_command(argv, self.workspace.path(), &self.env);
        let (status, output) = command::spawn_and_capture(cmd).await;
        let status = status
            .with_context(|| format!("Failed to run command '{}'", argv.join(" ")))?;
        Ok(CommandOutcome {
            success: status.success(),
            output,
        })
    }
}
