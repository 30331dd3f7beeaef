//! # HTML Reporting Module / HTML 报告模块
//!
//! This module handles the generation of HTML run reports.
//! It creates styled HTML files with run statistics, a detailed per-job
//! table, and interactive toggles for viewing execution logs.
//!
//! 此模块处理 HTML 运行报告的生成。
//! 它创建带有运行统计、逐作业详情表格和查看执行日志交互开关的
//! 样式化 HTML 文件。

use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::Path;

use crate::core::models::{JobResult, RunStatus};
use crate::infra::t;

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

/// Embedded JavaScript for HTML report interactivity / HTML 报告交互性的嵌入式 JavaScript
const HTML_SCRIPT: &str = include_str!("assets/report.js");

/// Generates an HTML report from the run's job results.
///
/// 从运行的作业结果生成 HTML 报告。
///
/// # Errors / 错误
/// This function will return an error if the output file cannot be written
/// to the specified path.
/// 如果无法将输出文件写入指定路径，此函数会返回错误。
pub fn generate_html_report(
    results: &[JobResult],
    status: RunStatus,
    output_path: &Path,
    locale: &str,
) -> Result<()> {
    let mut html = String::new();
    html.push_str(&format!(
        "<!DOCTYPE html><html><head><title>{}</title>",
        t!("html_report.title", locale = locale)
    ));
    html.push_str("<style>");
    html.push_str(HTML_STYLE);
    html.push_str("</style>");
    html.push_str("</head><body>");
    html.push_str(&format!(
        "<h1>{}</h1>",
        t!("html_report.main_header", locale = locale)
    ));
    html.push_str(&format!(
        "<p class='meta'>{} · {}</p>",
        t!("html_report.run_status", locale = locale, status = status),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    ));

    // Summary statistics
    let total = results.len();
    let succeeded = results
        .iter()
        .filter(|r| matches!(r, JobResult::Succeeded { .. }))
        .count();
    let failed = results.iter().filter(|r| r.is_failure()).count();
    let errored = results.iter().filter(|r| r.is_error()).count();
    let cancelled = results
        .iter()
        .filter(|r| matches!(r, JobResult::Cancelled { .. }))
        .count();

    html.push_str("<div class='summary-container'>");
    for (count, class, label) in [
        (total, "", t!("html_report.summary.total", locale = locale)),
        (
            succeeded,
            "succeeded-text",
            t!("html_report.summary.succeeded", locale = locale),
        ),
        (
            failed,
            "failed-text",
            t!("html_report.summary.failed", locale = locale),
        ),
        (
            errored,
            "errored-text",
            t!("html_report.summary.errored", locale = locale),
        ),
        (
            cancelled,
            "cancelled-text",
            t!("html_report.summary.cancelled", locale = locale),
        ),
    ] {
        html.push_str(&format!(
            "<div class='summary-item'><span class='count {class}'>{count}</span><span class='label'>{label}</span></div>",
        ));
    }
    html.push_str("</div>");

    // Results table
    html.push_str("<table><thead><tr>");
    html.push_str(&format!(
        "<th>{}</th>",
        t!("html_report.table.header.job", locale = locale)
    ));
    html.push_str(&format!(
        "<th class='status-col'>{}</th>",
        t!("html_report.table.header.status", locale = locale)
    ));
    html.push_str(&format!(
        "<th class='duration-cell'>{}</th>",
        t!("html_report.table.header.duration", locale = locale)
    ));
    html.push_str("</tr></thead><tbody>");

    for (i, result) in results.iter().enumerate() {
        let status_str = result.status_str(locale);
        let status_class = result.status_class();
        let duration_str = result
            .duration()
            .map(|d| format!("{:.2}s", d.as_secs_f64()))
            .unwrap_or_else(|| "N/A".to_string());

        let output_id = format!("output-{i}");
        let problem_details = if result.is_bad() {
            format!(
                "<tr id='{}' style='display:none;'><td colspan='3'><pre class='output-content'>{}</pre></td></tr>",
                output_id,
                escape_html(result.output())
            )
        } else {
            String::new()
        };

        let output_toggle = if result.is_bad() {
            format!(
                "<div class='output-toggle' onclick=\"toggleOutput('{}')\">{}</div>",
                output_id,
                t!("html_report.toggle_output", locale = locale)
            )
        } else {
            String::new()
        };

        html.push_str("<tr>");
        html.push_str(&format!(
            "<td>{}</td>",
            escape_html(&result.spec().label())
        ));
        html.push_str(&format!(
            "<td class='status-col'><div class='status-cell {status_class}'>{status_str}</div>{output_toggle}</td>",
        ));
        html.push_str(&format!("<td class='duration-cell'>{duration_str}</td>"));
        html.push_str("</tr>");
        html.push_str(&problem_details);
    }

    html.push_str("</tbody></table>");
    html.push_str("<script>");
    html.push_str(HTML_SCRIPT);
    html.push_str("</script></body></html>");

    fs::write(output_path, html)?;
    Ok(())
}

/// Simple HTML escape function to replace special characters with their HTML entities
/// 简单的 HTML 转义函数，用 HTML 实体替换特殊字符
fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
