//! # Aggregator Module Unit Tests / Aggregator 模块单元测试
//!
//! This module contains unit tests for the result aggregator: pending and
//! terminal status queries, fail-fast transitions, outcome class stability
//! and the vacuous empty-matrix run.
//!
//! 此模块包含结果聚合器的单元测试：Pending 与终态状态查询、
//! fail-fast 转换、结局类别稳定性以及空矩阵的平凡成功运行。

mod common;

use common::spec;
use gridrun::core::aggregator::ResultAggregator;
use gridrun::core::models::{ErrorReason, FailureReason, JobResult, RunStatus};
use std::time::Duration;

fn succeeded(index: usize) -> JobResult {
    JobResult::Succeeded {
        spec: spec(index, &[]),
        output: String::new(),
        duration: Duration::from_millis(1),
    }
}

fn failed(index: usize) -> JobResult {
    JobResult::Failed {
        spec: spec(index, &[]),
        output: String::new(),
        reason: FailureReason::Command,
        duration: Duration::from_millis(1),
    }
}

fn errored(index: usize) -> JobResult {
    JobResult::Errored {
        spec: spec(index, &[]),
        output: String::new(),
        reason: ErrorReason::ContextUnavailable,
        duration: Duration::from_millis(1),
    }
}

fn cancelled(index: usize) -> JobResult {
    JobResult::Cancelled { spec: spec(index, &[]) }
}

#[cfg(test)]
mod status_tests {
    use super::*;

    #[test]
    fn test_pending_until_all_results_recorded() {
        let aggregator = ResultAggregator::new(3, true);

        assert_eq!(aggregator.status(), RunStatus::Pending);
        aggregator.record(succeeded(0));
        assert_eq!(aggregator.status(), RunStatus::Pending);
        aggregator.record(succeeded(1));
        assert_eq!(aggregator.status(), RunStatus::Pending);
        aggregator.record(succeeded(2));
        assert_eq!(aggregator.status(), RunStatus::Succeeded);

        // Terminal status queries stay stable
        assert_eq!(aggregator.status(), RunStatus::Succeeded);
    }

    #[test]
    fn test_results_come_back_in_spec_order() {
        let aggregator = ResultAggregator::new(3, false);

        // Completion order differs from spec order
        aggregator.record(succeeded(2));
        aggregator.record(succeeded(0));
        aggregator.record(succeeded(1));

        let outcome = aggregator.into_outcome();
        let indices: Vec<usize> = outcome.results.iter().map(|r| r.spec_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_run_is_vacuously_successful() {
        let aggregator = ResultAggregator::new(0, true);

        assert_eq!(aggregator.status(), RunStatus::Succeeded);
        let outcome = aggregator.into_outcome();
        assert_eq!(outcome.status, RunStatus::Succeeded);
        assert!(outcome.results.is_empty());
    }
}

#[cfg(test)]
mod fail_fast_tests {
    use super::*;

    #[test]
    fn test_first_failure_trips_the_cancel_token() {
        let aggregator = ResultAggregator::new(3, true);
        let token = aggregator.cancel_token();

        aggregator.record(succeeded(0));
        assert!(!token.is_cancelled());

        aggregator.record(failed(1));
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_fail_fast_outcome_keeps_first_bad_class() {
        let aggregator = ResultAggregator::new(3, true);

        aggregator.record(failed(0));
        // A draining in-flight job errors later; the class stays Failed
        aggregator.record(errored(1));
        aggregator.record(cancelled(2));

        assert_eq!(aggregator.status(), RunStatus::Failed);
    }

    #[test]
    fn test_fail_fast_errored_class_locked_too() {
        let aggregator = ResultAggregator::new(2, true);

        aggregator.record(errored(0));
        aggregator.record(failed(1));

        assert_eq!(aggregator.status(), RunStatus::Errored);
    }

    #[test]
    fn test_no_fail_fast_leaves_token_alone() {
        let aggregator = ResultAggregator::new(2, false);
        let token = aggregator.cancel_token();

        aggregator.record(failed(0));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_no_fail_fast_errored_outranks_failed() {
        let aggregator = ResultAggregator::new(3, false);

        aggregator.record(failed(0));
        aggregator.record(errored(1));
        aggregator.record(succeeded(2));

        assert_eq!(aggregator.status(), RunStatus::Errored);
    }

    #[test]
    fn test_no_fail_fast_all_failures_is_failed() {
        let aggregator = ResultAggregator::new(2, false);

        aggregator.record(failed(0));
        aggregator.record(failed(1));

        assert_eq!(aggregator.status(), RunStatus::Failed);
    }
}

#[cfg(test)]
mod cancellation_tests {
    use super::*;

    #[test]
    fn test_interrupted_run_counts_as_errored() {
        let aggregator = ResultAggregator::new(3, true);

        aggregator.record(succeeded(0));
        aggregator.record(cancelled(1));
        aggregator.record(cancelled(2));

        // Nothing failed, but the run never finished its work
        assert_eq!(aggregator.status(), RunStatus::Errored);
    }

    #[test]
    fn test_recorded_counts_cancelled_placeholders() {
        let aggregator = ResultAggregator::new(2, true);

        aggregator.record(failed(0));
        assert_eq!(aggregator.recorded(), 1);
        aggregator.record(cancelled(1));
        assert_eq!(aggregator.recorded(), 2);
        assert!(aggregator.status().is_terminal());
    }
}
