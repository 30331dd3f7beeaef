//! # Job Dispatch Engine Module / 作业派发引擎模块
//!
//! This module provides the core functionality for dispatching job specs.
//! For each spec it resolves the command template and setup-step templates,
//! acquires an execution context from the provider, runs the ordered setup
//! steps and the main command, and classifies the outcome. A bounded
//! unordered buffer drives concurrent dispatch; cancellation tokens carry
//! the fail-fast and interrupt signals.
//!
//! 此模块提供派发作业规格的核心功能。
//! 对每个规格，它解析命令模板和 setup 步骤模板，从提供者获取执行上下文，
//! 按顺序运行 setup 步骤和主命令，并对结果进行分类。
//! 有界无序缓冲驱动并发派发；取消令牌承载 fail-fast 和中断信号。

use anyhow::Result;
use colored::*;
use futures::{stream, StreamExt};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::core::{
    aggregator::ResultAggregator,
    config::SetupStep,
    models::{ErrorReason, FailureReason, JobResult, JobSpec},
    template::CommandTemplate,
};
use crate::infra::t;

/// What one command run inside an execution context reported back.
/// 在执行上下文内运行一条命令后报告的结果。
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// `true` if the command exited with a success status.
    /// 如果命令以成功状态退出则为 `true`。
    pub success: bool,
    /// Combined stdout and stderr of the command.
    /// 命令的 stdout 和 stderr 合并输出。
    pub output: String,
}

/// A provisioned, isolated environment that can run commands for one job.
/// The job's attributes were already baked in at acquisition time.
///
/// 已供给的隔离环境，可为一个作业运行命令。
/// 作业的属性在获取时就已注入。
#[allow(async_fn_in_trait)]
pub trait ExecutionContext {
    /// Runs one resolved command to completion inside the environment.
    /// An `Err` means the context itself broke, not that the command failed.
    ///
    /// 在环境内将一条已解析的命令运行至结束。
    /// `Err` 表示上下文本身损坏，而不是命令失败。
    async fn run_command(&mut self, argv: &[String]) -> Result<CommandOutcome>;
}

/// The external collaborator that provisions execution contexts. The core
/// never touches the environment directly; everything environment-shaped
/// goes through this seam.
///
/// 供给执行上下文的外部协作者。核心从不直接接触环境；
/// 一切与环境相关的内容都经过这个接口。
#[allow(async_fn_in_trait)]
pub trait ContextProvider: Sync {
    type Context: ExecutionContext;

    /// Provisions an isolated environment for the job spec, consuming its
    /// environment-relevant attributes.
    /// 为作业规格供给隔离环境，消费其环境相关属性。
    async fn acquire(&self, spec: &JobSpec) -> Result<Self::Context>;
}

/// What happened once the job actually ran inside its context.
enum Verdict {
    Succeeded { output: String },
    CommandFailed { output: String },
    StepFailed { output: String },
    Broke { output: String },
}

/// Dispatches a single job spec and classifies its terminal result.
///
/// Exactly one external execution sequence is started per spec; there is no
/// automatic retry (retry policy belongs to the execution context provider).
/// Every error is scoped to this spec and folded into the returned result.
///
/// 派发单个作业规格并分类其终态结果。
///
/// 每个规格恰好启动一次外部执行序列；没有自动重试
/// （重试策略属于执行上下文提供者）。
/// 所有错误的作用域都限于此规格，并折叠进返回的结果。
pub async fn dispatch_job<P: ContextProvider>(
    spec: JobSpec,
    provider: &P,
    command: &CommandTemplate,
    setup: &[SetupStep],
    timeout_secs: Option<u64>,
) -> JobResult {
    let started = Instant::now();
    let label = spec.label();

    // Template resolution happens before any context is acquired; a bad
    // template never costs an environment.
    let argv = match resolve_argv(command, &spec) {
        Ok(argv) => argv,
        Err(message) => {
            println!("{}", t!("run.job_template_error", name = label).red());
            return JobResult::Errored {
                spec,
                output: message,
                reason: ErrorReason::Template,
                duration: started.elapsed(),
            };
        }
    };

    let mut steps = Vec::with_capacity(setup.len());
    for step in setup {
        match resolve_argv(&CommandTemplate::new(step.command.clone()), &spec) {
            Ok(step_argv) => steps.push((step.name.clone(), step_argv)),
            Err(message) => {
                println!("{}", t!("run.job_template_error", name = label).red());
                return JobResult::Errored {
                    spec,
                    output: format!("[{}] {}", step.name, message),
                    reason: ErrorReason::Template,
                    duration: started.elapsed(),
                };
            }
        }
    }

    println!("{}", t!("run.dispatching_job", name = label).blue());

    let mut context = match provider.acquire(&spec).await {
        Ok(context) => context,
        Err(e) => {
            println!("{}", t!("run.context_unavailable", name = label).red());
            return JobResult::Errored {
                spec,
                output: format!("{e:#}"),
                reason: ErrorReason::ContextUnavailable,
                duration: started.elapsed(),
            };
        }
    };

    let execution = run_in_context(&mut context, &steps, &argv);
    let verdict = match timeout_secs.map(Duration::from_secs) {
        Some(limit) => match tokio::time::timeout(limit, execution).await {
            Ok(verdict) => verdict,
            Err(_) => {
                println!(
                    "{}",
                    t!("run.job_timeout", name = label, timeout = limit.as_secs()).red()
                );
                return JobResult::Failed {
                    spec,
                    output: t!("run.job_timeout_message").to_string(),
                    reason: FailureReason::Timeout,
                    duration: limit,
                };
            }
        },
        None => execution.await,
    };

    let duration = started.elapsed();
    let secs = duration.as_secs_f64();
    match verdict {
        Verdict::Succeeded { output } => {
            println!(
                "{}",
                t!("run.job_succeeded", name = label, duration = format!("{secs:.2}")).green()
            );
            JobResult::Succeeded {
                spec,
                output,
                duration,
            }
        }
        Verdict::CommandFailed { output } => {
            println!(
                "{}",
                t!("run.job_failed", name = label, duration = format!("{secs:.2}")).red()
            );
            JobResult::Failed {
                spec,
                output,
                reason: FailureReason::Command,
                duration,
            }
        }
        Verdict::StepFailed { output } => {
            println!("{}", t!("run.setup_step_failed", name = label).red());
            JobResult::Errored {
                spec,
                output,
                reason: ErrorReason::SetupStep,
                duration,
            }
        }
        Verdict::Broke { output } => {
            println!("{}", t!("run.context_unavailable", name = label).red());
            JobResult::Errored {
                spec,
                output,
                reason: ErrorReason::ContextUnavailable,
                duration,
            }
        }
    }
}

/// Runs the setup steps in order, then the main command, accumulating one
/// combined log. The first failing step short-circuits.
async fn run_in_context<C: ExecutionContext>(
    context: &mut C,
    steps: &[(String, Vec<String>)],
    main_argv: &[String],
) -> Verdict {
    let mut log = String::new();

    for (name, argv) in steps {
        log.push_str(&format!("$ [{name}] {}\n", argv.join(" ")));
        match context.run_command(argv).await {
            Ok(outcome) => {
                log.push_str(&outcome.output);
                if !outcome.success {
                    return Verdict::StepFailed { output: log };
                }
            }
            Err(e) => {
                log.push_str(&format!("{e:#}\n"));
                return Verdict::Broke { output: log };
            }
        }
    }

    log.push_str(&format!("$ {}\n", main_argv.join(" ")));
    match context.run_command(main_argv).await {
        Ok(outcome) => {
            log.push_str(&outcome.output);
            if outcome.success {
                Verdict::Succeeded { output: log }
            } else {
                Verdict::CommandFailed { output: log }
            }
        }
        Err(e) => {
            log.push_str(&format!("{e:#}\n"));
            Verdict::Broke { output: log }
        }
    }
}

/// Resolves a command template against a spec and splits it into an argv.
/// Environment variables and `~` in the resolved string are expanded, the
/// way a shell would before dispatching.
fn resolve_argv(template: &CommandTemplate, spec: &JobSpec) -> Result<Vec<String>, String> {
    let resolved = template.resolve(spec).map_err(|e| e.to_string())?;

    let expanded = shellexpand::full(&resolved)
        .map_err(|e| format!("failed to expand command '{resolved}': {e}"))?
        .to_string();

    let argv = shlex::split(&expanded)
        .ok_or_else(|| format!("failed to parse command: {expanded}"))?;

    if argv.is_empty() {
        return Err(format!("command resolved to nothing: '{}'", template.raw()));
    }

    Ok(argv)
}

/// Dispatches every planned job spec with bounded concurrency, recording
/// each result into the aggregator as it completes.
///
/// A spec that has not started when the fail-fast token or the interrupt
/// token trips is recorded as `Cancelled` without being dispatched. The
/// fail-fast token lets in-flight jobs drain; the interrupt token also
/// abandons them. No spec is ever silently dropped: every planned spec
/// produces exactly one recorded result.
///
/// 以有界并发派发每个计划中的作业规格，并在完成时将结果记录到聚合器。
///
/// 当 fail-fast 令牌或中断令牌触发时尚未启动的规格会被记录为
/// `Cancelled` 而不被派发。fail-fast 令牌允许进行中的作业结束；
/// 中断令牌还会放弃它们。任何规格都不会被静默丢弃：
/// 每个计划中的规格恰好产生一条记录的结果。
#[allow(clippy::too_many_arguments)]
pub async fn dispatch_all<P: ContextProvider>(
    specs: Vec<JobSpec>,
    provider: &P,
    command: &CommandTemplate,
    setup: &[SetupStep],
    timeout_secs: Option<u64>,
    parallelism: usize,
    aggregator: &ResultAggregator,
    stop: &CancellationToken,
) {
    let fail_fast_token = aggregator.cancel_token();

    stream::iter(specs.into_iter().map(|spec| {
        let fail_fast_token = fail_fast_token.clone();
        async move {
            if stop.is_cancelled() || fail_fast_token.is_cancelled() {
                aggregator.record(JobResult::Cancelled { spec });
                return;
            }

            let interrupted_spec = spec.clone();
            let result = tokio::select! {
                biased;
                _ = stop.cancelled() => JobResult::Cancelled { spec: interrupted_spec },
                result = dispatch_job(spec, provider, command, setup, timeout_secs) => result,
            };
            aggregator.record(result);
        }
    }))
    .buffer_unordered(parallelism.max(1))
    .collect::<Vec<()>>()
    .await;
}
