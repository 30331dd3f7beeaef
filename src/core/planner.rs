//! # Execution Planner Module / 执行计划模块
//!
//! This module turns the expanded job spec sequence into an execution plan,
//! optionally sharding it across multiple CI runners with a deterministic
//! modulo split. Expander order is preserved within a shard.
//!
//! 此模块将展开的作业规格序列转换为执行计划，
//! 可选地通过确定性的取模切分将其分布到多个 CI 运行器上。
//! 分片内保留展开器的顺序。

use crate::core::models::JobSpec;
use anyhow::{bail, Result};

/// A complete execution plan for one runner.
/// 单个运行器的完整执行计划。
#[derive(Debug)]
pub struct ExecutionPlan {
    /// The job specs this runner dispatches, in expander order.
    /// 此运行器派发的作业规格，按展开器顺序排列。
    pub jobs_to_run: Vec<JobSpec>,
    /// The size of the full expanded sequence before sharding.
    /// 切分前完整展开序列的大小。
    pub total_expanded: usize,
    /// Whether the sequence was sharded across multiple runners.
    /// 序列是否被切分到多个运行器上。
    pub is_distributed: bool,
}

/// Creates an execution plan for the expanded job specs.
///
/// With both `total_runners` and `runner_index` set, this runner takes
/// every spec whose position satisfies `position % total == index`. Spec
/// indices keep their original values so reports from different shards can
/// be correlated.
///
/// 为展开的作业规格创建执行计划。
///
/// 当同时设置了 `total_runners` 和 `runner_index` 时，
/// 此运行器获取位置满足 `position % total == index` 的所有规格。
/// 规格索引保持原值，以便关联来自不同分片的报告。
pub fn plan_execution(
    specs: Vec<JobSpec>,
    total_runners: Option<usize>,
    runner_index: Option<usize>,
) -> Result<ExecutionPlan> {
    let total_expanded = specs.len();

    let (jobs_to_run, is_distributed) = match (total_runners, runner_index) {
        (Some(total), Some(index)) => {
            if total == 0 {
                bail!("Total runners must be at least 1.");
            }
            if index >= total {
                bail!("Runner index must be less than total runners.");
            }
            let shard: Vec<_> = specs
                .into_iter()
                .enumerate()
                .filter(|(position, _)| position % total == index)
                .map(|(_, spec)| spec)
                .collect();
            (shard, true)
        }
        (None, None) => (specs, false),
        _ => bail!("Both --total-runners and --runner-index must be provided."),
    };

    Ok(ExecutionPlan {
        jobs_to_run,
        total_expanded,
        is_distributed,
    })
}
