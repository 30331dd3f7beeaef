//! # Template Module Unit Tests / Template 模块单元测试
//!
//! This module contains unit tests for command template resolution against
//! job spec attributes, including escapes and the per-job error cases.
//!
//! 此模块包含针对作业规格属性的命令模板解析单元测试，
//! 包括转义和单作业错误情形。

mod common;

use common::spec;
use gridrun::core::config::{AttrMap, Scalar};
use gridrun::core::models::JobSpec;
use gridrun::core::template::{CommandTemplate, TemplateError};

#[cfg(test)]
mod resolution_tests {
    use super::*;

    #[test]
    fn test_single_placeholder() {
        let template = CommandTemplate::new("tox -e {toxenv}");
        let job = spec(0, &[("toxenv", "py38")]);

        assert_eq!(template.resolve(&job).unwrap(), "tox -e py38");
    }

    #[test]
    fn test_multiple_placeholders() {
        let template = CommandTemplate::new("run {os}/{python} --label {label}");
        let job = spec(0, &[("os", "linux"), ("python", "3.8"), ("label", "lint")]);

        assert_eq!(
            template.resolve(&job).unwrap(),
            "run linux/3.8 --label lint"
        );
    }

    #[test]
    fn test_placeholder_surrounded_by_spaces() {
        let template = CommandTemplate::new("echo {  os  }");
        let job = spec(0, &[("os", "linux")]);

        assert_eq!(template.resolve(&job).unwrap(), "echo linux");
    }

    #[test]
    fn test_no_placeholders_passes_through() {
        let template = CommandTemplate::new("cargo test --workspace");
        let job = spec(0, &[]);

        assert_eq!(template.resolve(&job).unwrap(), "cargo test --workspace");
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let template = CommandTemplate::new("echo {{not_a_placeholder}} {os}");
        let job = spec(0, &[("os", "mac")]);

        assert_eq!(
            template.resolve(&job).unwrap(),
            "echo {not_a_placeholder} mac"
        );
    }

    #[test]
    fn test_non_string_scalars_format_plainly() {
        let mut attributes = AttrMap::new();
        attributes.insert("workers".to_string(), Scalar::Int(4));
        attributes.insert("version".to_string(), Scalar::Float(3.8));
        attributes.insert("verbose".to_string(), Scalar::Bool(true));
        let job = JobSpec::new(0, attributes);

        let template = CommandTemplate::new("run -j{workers} -V{version} --verbose={verbose}");

        assert_eq!(template.resolve(&job).unwrap(), "run -j4 -V3.8 --verbose=true");
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;

    #[test]
    fn test_unknown_attribute_is_reported_by_name() {
        let template = CommandTemplate::new("tox -e {toxenv}");
        let job = spec(0, &[("os", "linux")]);

        assert_eq!(
            template.resolve(&job),
            Err(TemplateError::UnknownAttribute {
                placeholder: "toxenv".to_string()
            })
        );
    }

    #[test]
    fn test_unterminated_placeholder() {
        let template = CommandTemplate::new("echo {os");
        let job = spec(0, &[("os", "linux")]);

        assert_eq!(
            template.resolve(&job),
            Err(TemplateError::UnterminatedPlaceholder)
        );
    }

    #[test]
    fn test_error_message_names_the_placeholder() {
        let error = TemplateError::UnknownAttribute {
            placeholder: "toxenv".to_string(),
        };
        assert!(error.to_string().contains("{toxenv}"));
    }
}
