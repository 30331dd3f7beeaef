//! # Console Reporting Module / 控制台报告模块
//!
//! This module handles the generation and display of run reports in the
//! console. It prints a colorful per-job summary table in spec order and a
//! detail block for every failed or errored job, so no problem is ever
//! collapsed into a single message.
//!
//! 此模块处理控制台中运行报告的生成和显示。
//! 它按规格顺序打印彩色的逐作业摘要表，并为每个失败或出错的作业打印
//! 详情块，因此任何问题都不会被折叠成单条消息。

use crate::core::models::{JobResult, RunStatus};
use crate::infra::t;
use colored::*;

/// Prints a formatted summary of all job results to the console, one row
/// per job spec in expansion order.
///
/// 在控制台打印所有作业结果的格式化摘要，
/// 按展开顺序每个作业规格一行。
///
/// # Output Format / 输出格式
/// ```text
/// --- Run Summary ---
///   - Succeeded  | os=linux, python=3.8                     |     1.23s
///   - Failed     | os=linux, python=3.9                     |     0.45s
///   - Errored    | os=mac, python=3.8                       |     0.02s
///   - Cancelled  | os=mac, python=3.9                       |       N/A
/// ```
pub fn print_summary(results: &[JobResult], locale: &str) {
    println!("\n{}", t!("report.summary_banner", locale = locale).bold());

    for result in results {
        let status_str = result.status_str(locale);
        let duration_str = result
            .duration()
            .map(|d| format!("{:.2?}", d))
            .unwrap_or_else(|| "N/A".to_string());

        let status_colored = match result {
            JobResult::Succeeded { .. } => status_str.green(),
            JobResult::Failed { .. } => status_str.red(),
            JobResult::Errored { .. } => status_str.yellow(),
            JobResult::Cancelled { .. } => status_str.dimmed(),
        };

        println!(
            "  - {:<12} | {:<40} | {:>10}",
            status_colored,
            result.spec().label(),
            duration_str
        );
    }
}

/// Prints detailed information about every failed or errored job: which
/// spec, which kind of problem, and the captured execution log.
///
/// 打印每个失败或出错作业的详细信息：
/// 哪个规格、哪类问题，以及捕获的执行日志。
pub fn print_problem_details(problems: &[&JobResult], locale: &str) {
    if problems.is_empty() {
        return;
    }

    println!(
        "\n{}",
        t!("report.problem_banner", locale = locale).red().bold()
    );
    println!("{}", "-".repeat(80));

    for (i, result) in problems.iter().enumerate() {
        println!(
            "[{}/{}] {} '{}' ({})",
            i + 1,
            problems.len(),
            t!("report.problem_header", locale = locale).red(),
            result.spec().label().cyan(),
            result.reason_str(locale)
        );

        println!(
            "\n--- {} ---\n",
            t!("report.execution_log", locale = locale).yellow()
        );
        println!("{}", result.output());
        println!("\n{}", "-".repeat(80));
    }
}

/// Prints the terminal line for the whole run.
/// 打印整个运行的最终结果行。
pub fn print_final_status(status: RunStatus, locale: &str) {
    match status {
        RunStatus::Succeeded => {
            println!(
                "\n{}",
                t!("report.run_succeeded", locale = locale).green().bold()
            );
        }
        RunStatus::Failed => {
            println!(
                "\n{}",
                t!("report.run_failed", locale = locale).red().bold()
            );
        }
        RunStatus::Errored => {
            println!(
                "\n{}",
                t!("report.run_errored", locale = locale).yellow().bold()
            );
        }
        RunStatus::Pending => {
            println!("\n{}", t!("report.run_pending", locale = locale).bold());
        }
    }
}
