//! # Result Aggregator Module / 结果聚合模块
//!
//! The single writer of the run's tally. Job results arrive in completion
//! order from concurrently dispatched jobs; the aggregator records them
//! keyed by spec identity, drives the fail-fast cancellation token, and
//! answers status queries idempotently until the run turns terminal.
//!
//! 运行计数的唯一写入者。作业结果以完成顺序从并发派发的作业到达；
//! 聚合器按规格标识记录它们，驱动 fail-fast 取消令牌，
//! 并在运行进入终态之前幂等地回答状态查询。

use crate::core::models::{JobResult, RunOutcome, RunStatus};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tokio_util::sync::CancellationToken;

/// Collects job results and computes the aggregate run status under the
/// configured fail-fast policy.
/// 收集作业结果，并在配置的 fail-fast 策略下计算聚合运行状态。
pub struct ResultAggregator {
    expected: usize,
    fail_fast: bool,
    cancel: CancellationToken,
    state: Mutex<Tally>,
}

/// The mutable tally. Updates are serialized behind the aggregator's mutex;
/// they are small and infrequent relative to job execution time.
/// 可变计数。更新在聚合器的互斥锁后串行化；
/// 相对于作业执行时间，更新既小又不频繁。
struct Tally {
    /// Results keyed by spec index, which keeps reporting order stable
    /// regardless of completion order.
    /// 按规格索引键控的结果，使报告顺序与完成顺序无关。
    results: BTreeMap<usize, JobResult>,
    /// The outcome class locked in by the first bad result under fail-fast.
    /// fail-fast 下由第一个坏结果锁定的结局类别。
    verdict: Option<RunStatus>,
}

impl ResultAggregator {
    /// Creates an aggregator expecting `expected` job results.
    pub fn new(expected: usize, fail_fast: bool) -> Self {
        Self {
            expected,
            fail_fast,
            cancel: CancellationToken::new(),
            state: Mutex::new(Tally {
                results: BTreeMap::new(),
                verdict: None,
            }),
        }
    }

    /// The token the dispatcher checks before starting a job. Cancelled by
    /// the first failed or errored result when fail-fast is enabled.
    /// 派发器在启动作业前检查的令牌。
    /// 启用 fail-fast 时，由第一个失败或出错的结果取消。
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Records one job result. A result for a spec index that was already
    /// recorded replaces the earlier entry; the dispatcher never produces
    /// two results for one spec, so this only matters for tests.
    ///
    /// 记录一个作业结果。已记录的规格索引的结果会替换先前的条目；
    /// 派发器不会为同一规格产生两个结果，因此这只与测试相关。
    pub fn record(&self, result: JobResult) {
        let mut tally = self.state.lock().expect("aggregator tally poisoned");

        let bad_class = match &result {
            JobResult::Failed { .. } => Some(RunStatus::Failed),
            JobResult::Errored { .. } => Some(RunStatus::Errored),
            _ => None,
        };

        // The first bad result locks the class; later results are still
        // recorded but never change it.
        if let Some(class) = bad_class {
            if tally.verdict.is_none() {
                tally.verdict = Some(class);
                if self.fail_fast {
                    self.cancel.cancel();
                }
            }
        }

        tally.results.insert(result.spec_index(), result);
    }

    /// How many results have been recorded so far.
    pub fn recorded(&self) -> usize {
        self.state
            .lock()
            .expect("aggregator tally poisoned")
            .results
            .len()
    }

    /// The aggregate status. `Pending` until every expected result
    /// (including `Cancelled` placeholders) has been recorded, then
    /// terminal. Safe to query repeatedly from any point of the run.
    ///
    /// 聚合状态。在记录完所有预期结果（包括 `Cancelled` 占位结果）之前
    /// 为 `Pending`，之后进入终态。可在运行的任何时刻重复查询。
    pub fn status(&self) -> RunStatus {
        let tally = self.state.lock().expect("aggregator tally poisoned");
        if tally.results.len() < self.expected {
            return RunStatus::Pending;
        }
        Self::terminal_status(self.fail_fast, &tally)
    }

    /// Consumes the aggregator and yields the run outcome with results in
    /// spec-index order.
    /// 消费聚合器，产出按规格索引排序结果的运行结局。
    pub fn into_outcome(self) -> RunOutcome {
        let tally = self
            .state
            .into_inner()
            .expect("aggregator tally poisoned");
        let status = if tally.results.len() < self.expected {
            RunStatus::Pending
        } else {
            Self::terminal_status(self.fail_fast, &tally)
        };
        RunOutcome {
            status,
            results: tally.results.into_values().collect(),
        }
    }

    /// The terminal class once all results are in.
    ///
    /// Under fail-fast the class was locked by the first bad result. Without
    /// fail-fast it is computed from the full tally, deterministically:
    /// errored outranks failed. A run whose only non-successes are cancelled
    /// jobs was interrupted and counts as errored.
    ///
    /// 所有结果到齐后的终态类别。
    ///
    /// 在 fail-fast 下，类别由第一个坏结果锁定。没有 fail-fast 时，
    /// 它根据完整计数确定性地计算：errored 优先于 failed。
    /// 唯一非成功结果是已取消作业的运行属于被中断，计为 errored。
    fn terminal_status(fail_fast: bool, tally: &Tally) -> RunStatus {
        if fail_fast {
            if let Some(class) = tally.verdict {
                return class;
            }
        }
        if tally.results.values().any(|r| r.is_error()) {
            RunStatus::Errored
        } else if tally.results.values().any(|r| r.is_failure()) {
            RunStatus::Failed
        } else if tally
            .results
            .values()
            .any(|r| matches!(r, JobResult::Cancelled { .. }))
        {
            RunStatus::Errored
        } else {
            RunStatus::Succeeded
        }
    }
}
