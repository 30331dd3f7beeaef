//! # JSON Reporting Module / JSON 报告模块
//!
//! Machine-readable run reports for scriptable consumption, e.g. by a CI
//! step that wants per-job detail beyond the process exit code.
//!
//! 供脚本消费的机器可读运行报告，
//! 例如需要进程退出码之外逐作业详情的 CI 步骤。

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::core::models::{JobResult, RunOutcome};

/// The top-level structure of the JSON report.
/// JSON 报告的顶层结构。
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    status: String,
    exit_code: u8,
    generated_at: DateTime<Local>,
    total: usize,
    jobs: Vec<JsonJob<'a>>,
}

/// One job entry in the JSON report.
/// JSON 报告中的一条作业记录。
#[derive(Debug, Serialize)]
struct JsonJob<'a> {
    index: usize,
    label: String,
    attributes: &'a crate::core::config::AttrMap,
    status: &'static str,
    duration_secs: Option<f64>,
    output: &'a str,
}

/// Writes the run outcome as pretty-printed JSON.
///
/// 将运行结局写为格式化的 JSON。
pub fn write_json_report(outcome: &RunOutcome, output_path: &Path) -> Result<()> {
    let report = JsonReport {
        status: outcome.status.to_string(),
        exit_code: outcome.status.exit_code(),
        generated_at: Local::now(),
        total: outcome.results.len(),
        jobs: outcome.results.iter().map(json_job).collect(),
    };

    let body = serde_json::to_string_pretty(&report)?;
    fs::write(output_path, body)
        .with_context(|| format!("Failed to write JSON report: {}", output_path.display()))?;
    Ok(())
}

fn json_job(result: &JobResult) -> JsonJob<'_> {
    let status = match result {
        JobResult::Succeeded { .. } => "succeeded",
        JobResult::Failed { .. } => "failed",
        JobResult::Errored { .. } => "errored",
        JobResult::Cancelled { .. } => "cancelled",
    };
    JsonJob {
        index: result.spec_index(),
        label: result.spec().label(),
        attributes: &result.spec().attributes,
        status,
        duration_secs: result.duration().map(|d| d.as_secs_f64()),
        output: result.output(),
    }
}
