//! # Run Command Module / 运行命令模块
//!
//! This module implements the `run` command for the Gridrun CLI: it loads
//! and validates the matrix definition, expands it into job specs, plans
//! the execution (optionally sharded across CI runners), dispatches the
//! jobs and reports the aggregate outcome.
//!
//! 此模块实现 Gridrun CLI 的 `run` 命令：加载并验证矩阵定义，
//! 将其展开为作业规格，制定执行计划（可选地在 CI 运行器间切分），
//! 派发作业并报告聚合结局。

use anyhow::{Context, Result};
use colored::*;
use std::{fs, path::PathBuf};
use tokio::signal;
use tokio_util::sync::CancellationToken;

use crate::{
    core::{
        aggregator::ResultAggregator,
        config::{self, MatrixConfig},
        execution::dispatch_all,
        expander,
        models::{JobResult, JobSpec, RunStatus},
        planner,
        template::CommandTemplate,
    },
    infra::{local::LocalContextProvider, t},
    reporting::{
        console::{print_final_status, print_problem_details, print_summary},
        html::generate_html_report,
        json::write_json_report,
    },
};

/// Executes the run command with the provided arguments.
///
/// # Arguments
/// * `jobs` - Number of parallel jobs to dispatch at once
/// * `config` - Path to the matrix configuration file
/// * `total_runners` - Total number of distributed runners (for CI)
/// * `runner_index` - Index of this runner (for CI)
/// * `html` - Optional path for HTML report output
/// * `json` - Optional path for JSON report output
/// * `dry_run` - Print the expanded job specs without dispatching
///
/// # Returns
/// The aggregate run status; the caller maps it to the process exit code.
pub async fn execute(
    jobs: Option<usize>,
    config: PathBuf,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
    html: Option<PathBuf>,
    json: Option<PathBuf>,
    dry_run: bool,
) -> Result<RunStatus> {
    let (matrix, config_path) = setup_and_parse_config(&config)?;
    let locale = matrix.language.clone();
    rust_i18n::set_locale(&locale);

    println!(
        "{}",
        t!("run.loading_matrix", locale = locale, path = config_path.display())
    );

    let specs = expander::expand(&matrix);
    println!(
        "{}",
        t!(
            "run.expanded_jobs",
            locale = locale,
            count = specs.len(),
            axes = matrix.axes.len()
        )
        .cyan()
    );

    let plan = planner::plan_execution(specs, total_runners, runner_index)?;

    if let (Some(total), Some(index)) = (total_runners, runner_index) {
        println!(
            "{}",
            t!(
                "run.running_as_shard",
                locale = locale,
                index = index,
                total = total,
                count = plan.jobs_to_run.len()
            )
            .bold()
        );
    } else {
        println!("{}", t!("run.running_as_single", locale = locale).bold());
    }

    if dry_run {
        print_dry_run(&plan.jobs_to_run, &locale);
        return Ok(RunStatus::Succeeded);
    }

    // An empty job sequence (empty axis set, everything excluded, or an
    // out-of-range shard) is a vacuously successful run, exit code 0.
    if plan.jobs_to_run.is_empty() {
        println!("{}", t!("run.no_jobs", locale = locale).green());
        return Ok(RunStatus::Succeeded);
    }

    let stop_token = setup_signal_handler(&locale)?;

    let provider = LocalContextProvider::new(matrix.source_dir.clone());
    let template = CommandTemplate::new(matrix.command.clone());
    let aggregator = ResultAggregator::new(plan.jobs_to_run.len(), matrix.fail_fast);
    let parallelism = jobs.unwrap_or(num_cpus::get() / 2 + 1);

    dispatch_all(
        plan.jobs_to_run,
        &provider,
        &template,
        &matrix.setup,
        matrix.timeout_secs,
        parallelism,
        &aggregator,
        &stop_token,
    )
    .await;

    let outcome = aggregator.into_outcome();

    print_summary(&outcome.results, &locale);

    let problems: Vec<&JobResult> = outcome.results.iter().filter(|r| r.is_bad()).collect();
    print_problem_details(&problems, &locale);

    if let Some(report_path) = &html {
        println!(
            "\n{}",
            t!("run.writing_html", locale = locale, path = report_path.display())
        );
        if let Err(e) = generate_html_report(&outcome.results, outcome.status, report_path, &locale)
        {
            eprintln!("{} {}", t!("run.html_failed", locale = locale).red(), e);
        }
    }

    if let Some(report_path) = &json {
        println!(
            "{}",
            t!("run.writing_json", locale = locale, path = report_path.display())
        );
        if let Err(e) = write_json_report(&outcome, report_path) {
            eprintln!("{} {}", t!("run.json_failed", locale = locale).red(), e);
        }
    }

    print_final_status(outcome.status, &locale);
    Ok(outcome.status)
}

/// Sets up and parses the matrix configuration file. A configuration error
/// here aborts the run before anything is expanded or dispatched.
fn setup_and_parse_config(config_path_arg: &PathBuf) -> Result<(MatrixConfig, PathBuf)> {
    // For config parsing, we don't have the locale yet. Use English as a default.
    let locale = "en";
    let config_path = fs::canonicalize(config_path_arg).with_context(|| {
        t!(
            "run.config_read_failed",
            locale = locale,
            path = config_path_arg.display()
        )
        .to_string()
    })?;

    let matrix = config::load_matrix_config(&config_path)
        .with_context(|| t!("run.config_parse_failed", locale = locale).to_string())?;

    Ok((matrix, config_path))
}

/// Prints the expanded job spec sequence without dispatching anything.
fn print_dry_run(specs: &[JobSpec], locale: &str) {
    println!("\n{}", t!("run.dry_run_banner", locale = locale).bold());
    for spec in specs {
        println!("  {spec}");
    }
    println!(
        "{}",
        t!("run.dry_run_total", locale = locale, count = specs.len()).cyan()
    );
}

/// Sets up a signal handler for graceful shutdown.
fn setup_signal_handler(locale: &str) -> Result<CancellationToken> {
    let token = CancellationToken::new();
    let token_clone = token.clone();
    let locale = locale.to_string();

    tokio::spawn(async move {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl-C");
        println!("\n{}", t!("run.shutdown_signal", locale = &locale).yellow());
        token_clone.cancel();
    });

    Ok(token)
}
