//! # Models Module Unit Tests / Models 模块单元测试
//!
//! This module contains unit tests for the core data models: job specs,
//! job results and the aggregate run status with its exit-code mapping.
//!
//! 此模块包含核心数据模型的单元测试：
//! 作业规格、作业结果，以及带退出码映射的聚合运行状态。

mod common;

use common::spec;
use gridrun::core::models::{
    ErrorReason, FailureReason, JobResult, RunStatus,
};
use std::time::Duration;

#[cfg(test)]
mod job_spec_tests {
    use super::*;

    #[test]
    fn test_label_lists_attributes_deterministically() {
        let job = spec(3, &[("version", "3.8"), ("os", "linux")]);

        // Attribute maps are ordered, so the label is stable across runs
        assert_eq!(job.label(), "os=linux, version=3.8");
    }

    #[test]
    fn test_label_of_attributeless_spec_uses_index() {
        let job = spec(7, &[]);
        assert_eq!(job.label(), "#7");
    }

    #[test]
    fn test_env_vars_are_prefixed_and_sanitized() {
        let job = spec(0, &[("python-version", "3.x"), ("os", "linux")]);

        let env = job.env_vars();
        assert!(env.contains(&("MATRIX_OS".to_string(), "linux".to_string())));
        assert!(env.contains(&("MATRIX_PYTHON_VERSION".to_string(), "3.x".to_string())));
    }

    #[test]
    fn test_display_includes_index_and_label() {
        let job = spec(2, &[("os", "mac")]);
        assert_eq!(format!("{job}"), "#2 [os=mac]");
    }
}

#[cfg(test)]
mod job_result_tests {
    use super::*;

    #[test]
    fn test_succeeded_result_accessors() {
        let result = JobResult::Succeeded {
            spec: spec(1, &[("os", "linux")]),
            output: "all good".to_string(),
            duration: Duration::from_secs(2),
        };

        assert!(!result.is_bad());
        assert_eq!(result.spec_index(), 1);
        assert_eq!(result.output(), "all good");
        assert_eq!(result.duration(), Some(Duration::from_secs(2)));
        assert_eq!(result.status_class(), "status-succeeded");
    }

    #[test]
    fn test_failed_result_is_bad_but_not_error() {
        let result = JobResult::Failed {
            spec: spec(0, &[]),
            output: "boom".to_string(),
            reason: FailureReason::Command,
            duration: Duration::from_millis(10),
        };

        assert!(result.is_failure());
        assert!(!result.is_error());
        assert!(result.is_bad());
        assert!(!result.is_timeout());
        assert_eq!(result.status_class(), "status-failed");
    }

    #[test]
    fn test_timeout_is_a_failure_with_its_own_class() {
        let result = JobResult::Failed {
            spec: spec(0, &[]),
            output: String::new(),
            reason: FailureReason::Timeout,
            duration: Duration::from_secs(60),
        };

        assert!(result.is_failure());
        assert!(result.is_timeout());
        assert_eq!(result.status_class(), "status-timeout");
    }

    #[test]
    fn test_errored_result_is_error_not_failure() {
        let result = JobResult::Errored {
            spec: spec(0, &[]),
            output: "no runner".to_string(),
            reason: ErrorReason::ContextUnavailable,
            duration: Duration::ZERO,
        };

        assert!(result.is_error());
        assert!(!result.is_failure());
        assert!(result.is_bad());
        assert_eq!(result.status_class(), "status-errored");
    }

    #[test]
    fn test_cancelled_result_has_no_output_or_duration() {
        let result = JobResult::Cancelled { spec: spec(4, &[]) };

        assert!(!result.is_bad());
        assert_eq!(result.output(), "");
        assert_eq!(result.duration(), None);
        assert_eq!(result.spec_index(), 4);
        assert_eq!(result.status_class(), "status-cancelled");
    }

    #[test]
    fn test_result_serialization_roundtrip() {
        let original = JobResult::Errored {
            spec: spec(2, &[("os", "linux")]),
            output: "template problem".to_string(),
            reason: ErrorReason::Template,
            duration: Duration::from_millis(5),
        };

        let json = serde_json::to_string(&original).unwrap();
        let reparsed: JobResult = serde_json::from_str(&json).unwrap();

        assert!(reparsed.is_error());
        assert_eq!(reparsed.spec_index(), 2);
        assert_eq!(reparsed.output(), "template problem");
    }
}

#[cfg(test)]
mod run_status_tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(RunStatus::Succeeded.exit_code(), 0);
        assert_eq!(RunStatus::Failed.exit_code(), 1);
        assert_eq!(RunStatus::Errored.exit_code(), 2);
        // A run that never reached a verdict is not a success
        assert_eq!(RunStatus::Pending.exit_code(), 2);
    }

    #[test]
    fn test_terminality() {
        assert!(!RunStatus::Pending.is_terminal());
        assert!(RunStatus::Succeeded.is_terminal());
        assert!(RunStatus::Failed.is_terminal());
        assert!(RunStatus::Errored.is_terminal());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(RunStatus::Succeeded.to_string(), "succeeded");
        assert_eq!(RunStatus::Failed.to_string(), "failed");
        assert_eq!(RunStatus::Errored.to_string(), "errored");
        assert_eq!(RunStatus::Pending.to_string(), "pending");
    }
}
