//! # Data Models Module / 数据模型模块
//!
//! This module defines the core data structures used throughout the matrix
//! engine: job specifications, per-job results with their failure and error
//! classifications, and the aggregate run status.
//!
//! 此模块定义整个矩阵引擎中使用的核心数据结构：
//! 作业规格、带有失败和错误分类的单作业结果，以及聚合运行状态。

use crate::core::config::{AttrMap, Scalar};
use crate::infra::t;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The final, fully-resolved attribute mapping for one execution.
/// Created by the expander, consumed exactly once by the dispatcher and
/// never mutated afterwards. `index` is the spec's position in the expanded
/// sequence and serves as its identity for reporting.
///
/// 单次执行的最终、完全解析的属性映射。
/// 由展开器创建，被派发器恰好消费一次，此后不再被修改。
/// `index` 是规格在展开序列中的位置，作为报告时的标识。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Position in the expanded job sequence / 在展开的作业序列中的位置
    pub index: usize,
    /// Attribute name to selected value / 属性名到所选值的映射
    pub attributes: AttrMap,
}

impl JobSpec {
    pub fn new(index: usize, attributes: AttrMap) -> Self {
        Self { index, attributes }
    }

    /// Looks up one attribute value by name.
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.attributes.get(key)
    }

    /// A stable human-readable label, e.g. `os=linux, python=3.8`.
    /// 稳定的人类可读标签，例如 `os=linux, python=3.8`。
    pub fn label(&self) -> String {
        if self.attributes.is_empty() {
            return format!("#{}", self.index);
        }
        self.attributes
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Environment variables exported to the execution context, one per
    /// attribute: `MATRIX_<NAME>=<value>` with non-alphanumeric characters
    /// in the name replaced by underscores.
    ///
    /// 导出到执行上下文的环境变量，每个属性一个：
    /// `MATRIX_<NAME>=<value>`，名称中的非字母数字字符替换为下划线。
    pub fn env_vars(&self) -> Vec<(String, String)> {
        self.attributes
            .iter()
            .map(|(key, value)| {
                let name: String = key
                    .chars()
                    .map(|c| {
                        if c.is_ascii_alphanumeric() {
                            c.to_ascii_uppercase()
                        } else {
                            '_'
                        }
                    })
                    .collect();
                (format!("MATRIX_{name}"), value.to_string())
            })
            .collect()
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} [{}]", self.index, self.label())
    }
}

/// Why a dispatched command counted as a job failure.
/// 被派发的命令被计为作业失败的原因。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum FailureReason {
    /// The main command exited with a failing status.
    /// 主命令以失败状态退出。
    Command,
    /// The job exceeded its configured timeout.
    /// 作业超过了配置的超时时间。
    Timeout,
}

/// Why a job never produced a meaningful command verdict. These are
/// infrastructure and configuration problems, kept distinct from command
/// failures so the exit code can tell them apart.
///
/// 作业未能产生有效命令裁决的原因。这些是基础设施和配置问题，
/// 与命令失败区分开，以便退出码能够区分它们。
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ErrorReason {
    /// The command template referenced an attribute the spec does not carry,
    /// or the resolved command could not be parsed into an argv.
    /// 命令模板引用了规格中不存在的属性，或解析后的命令无法拆分为 argv。
    Template,
    /// The execution context could not be provisioned, or broke while
    /// running a command.
    /// 执行上下文无法供给，或在运行命令时损坏。
    ContextUnavailable,
    /// A setup step (checkout, dependency install) failed.
    /// 某个 setup 步骤（检出、依赖安装）失败。
    SetupStep,
}

/// The terminal result of one job spec's dispatch.
/// 一个作业规格派发后的终态结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum JobResult {
    /// The main command completed with a success status.
    /// 主命令以成功状态完成。
    Succeeded {
        spec: JobSpec,
        /// Combined output of setup steps and the main command
        /// setup 步骤与主命令的合并输出
        output: String,
        duration: Duration,
    },
    /// The main command ran and reported failure (or timed out).
    /// 主命令运行后报告失败（或超时）。
    Failed {
        spec: JobSpec,
        output: String,
        reason: FailureReason,
        duration: Duration,
    },
    /// Infrastructure or template trouble prevented a command verdict.
    /// 基础设施或模板问题导致无法得到命令裁决。
    Errored {
        spec: JobSpec,
        output: String,
        reason: ErrorReason,
        duration: Duration,
    },
    /// The spec was never dispatched: fail-fast had already tripped, or the
    /// run was interrupted.
    /// 该规格从未被派发：fail-fast 已触发，或运行被中断。
    Cancelled { spec: JobSpec },
}

impl JobResult {
    /// The originating job spec.
    pub fn spec(&self) -> &JobSpec {
        match self {
            JobResult::Succeeded { spec, .. }
            | JobResult::Failed { spec, .. }
            | JobResult::Errored { spec, .. }
            | JobResult::Cancelled { spec } => spec,
        }
    }

    /// Identity of the originating spec in the expanded sequence.
    pub fn spec_index(&self) -> usize {
        self.spec().index
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, JobResult::Failed { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JobResult::Errored { .. })
    }

    /// A failure or an error — anything that makes the run non-successful.
    pub fn is_bad(&self) -> bool {
        self.is_failure() || self.is_error()
    }

    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            JobResult::Failed { reason, .. } if *reason == FailureReason::Timeout
        )
    }

    /// Gets the captured output. Empty for cancelled jobs.
    /// 获取捕获的输出。已取消的作业为空。
    pub fn output(&self) -> &str {
        match self {
            JobResult::Succeeded { output, .. }
            | JobResult::Failed { output, .. }
            | JobResult::Errored { output, .. } => output,
            JobResult::Cancelled { .. } => "",
        }
    }

    /// Gets the duration. Returns None for cancelled jobs.
    /// 获取持续时间。已取消的作业返回 None。
    pub fn duration(&self) -> Option<Duration> {
        match self {
            JobResult::Succeeded { duration, .. }
            | JobResult::Failed { duration, .. }
            | JobResult::Errored { duration, .. } => Some(*duration),
            JobResult::Cancelled { .. } => None,
        }
    }

    /// Gets the status of the result as a localized string for display.
    /// 以本地化字符串形式获取结果状态以供显示。
    pub fn status_str(&self, locale: &str) -> String {
        match self {
            JobResult::Succeeded { .. } => {
                t!("report.status_succeeded", locale = locale).to_string()
            }
            JobResult::Failed { reason, .. } => {
                if *reason == FailureReason::Timeout {
                    t!("report.status_timeout", locale = locale).to_string()
                } else {
                    t!("report.status_failed", locale = locale).to_string()
                }
            }
            JobResult::Errored { .. } => t!("report.status_errored", locale = locale).to_string(),
            JobResult::Cancelled { .. } => {
                t!("report.status_cancelled", locale = locale).to_string()
            }
        }
    }

    /// Gets the appropriate CSS class for the HTML report.
    pub fn status_class(&self) -> &str {
        match self {
            JobResult::Succeeded { .. } => "status-succeeded",
            JobResult::Failed { .. } => {
                if self.is_timeout() {
                    "status-timeout"
                } else {
                    "status-failed"
                }
            }
            JobResult::Errored { .. } => "status-errored",
            JobResult::Cancelled { .. } => "status-cancelled",
        }
    }

    /// A localized reason for failure detail headers, empty for successful
    /// and cancelled jobs.
    /// 用于失败详情标题的本地化原因，成功和已取消的作业为空。
    pub fn reason_str(&self, locale: &str) -> String {
        match self {
            JobResult::Failed { reason, .. } => match reason {
                FailureReason::Command => t!("report.reason_command", locale = locale).to_string(),
                FailureReason::Timeout => t!("report.reason_timeout", locale = locale).to_string(),
            },
            JobResult::Errored { reason, .. } => match reason {
                ErrorReason::Template => t!("report.reason_template", locale = locale).to_string(),
                ErrorReason::ContextUnavailable => {
                    t!("report.reason_context", locale = locale).to_string()
                }
                ErrorReason::SetupStep => t!("report.reason_setup", locale = locale).to_string(),
            },
            _ => String::new(),
        }
    }
}

/// The aggregate status of a whole run.
/// 整个运行的聚合状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Not all expected job results have been recorded yet.
    /// 尚未记录所有预期的作业结果。
    Pending,
    /// Every job succeeded (or the matrix was empty).
    /// 所有作业成功（或矩阵为空）。
    Succeeded,
    /// At least one job reported a command failure.
    /// 至少一个作业报告了命令失败。
    Failed,
    /// At least one job hit an infrastructure/template error, or the run
    /// was interrupted before completing.
    /// 至少一个作业遇到基础设施/模板错误，或运行在完成前被中断。
    Errored,
}

impl RunStatus {
    /// The process exit code for scriptable consumption: 0 for success,
    /// 1 for command failures, 2 for infrastructure errors. A still-pending
    /// status maps to 2 since the run never reached a verdict.
    ///
    /// 供脚本消费的进程退出码：成功为 0，命令失败为 1，基础设施错误为 2。
    /// 仍处于 Pending 的状态映射为 2，因为运行从未得出裁决。
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Succeeded => 0,
            RunStatus::Failed => 1,
            RunStatus::Errored | RunStatus::Pending => 2,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != RunStatus::Pending
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStatus::Pending => "pending",
            RunStatus::Succeeded => "succeeded",
            RunStatus::Failed => "failed",
            RunStatus::Errored => "errored",
        };
        f.write_str(s)
    }
}

/// The terminal value of the whole run: the aggregate status plus every
/// job result, ordered by spec index regardless of completion order.
///
/// 整个运行的终值：聚合状态加上按规格索引排序的所有作业结果，
/// 与完成顺序无关。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub results: Vec<JobResult>,
}
