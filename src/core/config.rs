//! # Matrix Configuration Module / 矩阵配置模块
//!
//! This module defines the declarative matrix definition loaded from a TOML
//! file: axes, include/exclude rules, the command template, setup steps and
//! the fail-fast policy, together with load-time validation. The
//! configuration is parsed into explicit value types once and never
//! re-interpreted downstream.
//!
//! 此模块定义从 TOML 文件加载的声明式矩阵定义：
//! 轴、include/exclude 规则、命令模板、setup 步骤和 fail-fast 策略，
//! 以及加载时验证。配置被一次性解析为显式的值类型，
//! 下游不再重新解释。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One scalar attribute value. Matching is type-strict: the string `"3.8"`
/// and the float `3.8` are different values and never equal.
///
/// 单个标量属性值。匹配是类型严格的：
/// 字符串 `"3.8"` 和浮点数 `3.8` 是不同的值，永不相等。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int(value) => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{value}"),
            Scalar::Str(value) => f.write_str(value),
        }
    }
}

/// An attribute mapping: one cell of the matrix, one rule predicate, or one
/// rule attribute set. Ordered so that labels and reports are stable.
///
/// 属性映射：矩阵的一个单元格、一条规则的谓词或一条规则的属性集合。
/// 有序存储使标签和报告保持稳定。
pub type AttrMap = BTreeMap<String, Scalar>;

/// One named enumeration axis with its ordered value list.
/// 一个命名的枚举轴及其有序的取值列表。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axis {
    /// The axis name, unique within the axis set.
    /// 轴名称，在轴集合内唯一。
    pub name: String,
    /// The ordered values; declaration order drives the cartesian product.
    /// 有序的取值；声明顺序决定笛卡尔积的顺序。
    pub values: Vec<Scalar>,
}

/// An additive rule: extends matching cells with extra attributes, or
/// appends a wholly new cell when its predicate is empty or unmatched.
/// The `set` may carry keys outside the axis set; such keys are visible
/// only on the cells this rule touched.
///
/// 附加规则：用额外属性扩展匹配的单元格，
/// 或在谓词为空或无匹配时追加一个全新的单元格。
/// `set` 可以携带轴集合之外的键；这些键仅在此规则触及的单元格上可见。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncludeRule {
    /// Attributes merged into matching cells (rule wins on key conflict),
    /// or forming the appended cell.
    /// 合并进匹配单元格的属性（键冲突时规则优先），或构成追加的单元格。
    #[serde(default)]
    pub set: AttrMap,
    /// The match predicate: every key/value pair must be present on a cell
    /// for the rule to extend it. Empty means append unconditionally.
    /// 匹配谓词：每个键值对都必须出现在单元格上，规则才会扩展它。
    /// 为空表示无条件追加。
    #[serde(default)]
    pub when: AttrMap,
}

impl IncludeRule {
    /// Whether this rule's predicate matches a cell (equality on every
    /// predicate key).
    /// 此规则的谓词是否匹配一个单元格（所有谓词键都相等）。
    pub fn matches(&self, cell: &AttrMap) -> bool {
        self.when
            .iter()
            .all(|(key, value)| cell.get(key) == Some(value))
    }
}

/// A subtractive rule: removes every cell that carries all of its key/value
/// pairs. A cell lacking one of the rule's keys does not match and is kept.
///
/// 删减规则：移除携带其全部键值对的每个单元格。
/// 缺少规则某个键的单元格不匹配并被保留。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExcludeRule(pub AttrMap);

impl ExcludeRule {
    /// Superset match: true if the cell has every rule key with the exact
    /// rule value.
    /// 超集匹配：单元格携带规则的每个键且值完全一致时为 true。
    pub fn matches(&self, cell: &AttrMap) -> bool {
        self.0
            .iter()
            .all(|(key, value)| cell.get(key) == Some(value))
    }
}

/// One named external step run before the main command, e.g. source
/// checkout or dependency install. Step failures are infrastructure errors,
/// not command failures.
///
/// 在主命令之前运行的一个命名外部步骤，例如源码检出或依赖安装。
/// 步骤失败属于基础设施错误，而不是命令失败。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupStep {
    /// The step name, shown in logs and error reports.
    /// 步骤名称，显示在日志和错误报告中。
    pub name: String,
    /// The step's command template, resolved against the same job spec
    /// attributes as the main command.
    /// 步骤的命令模板，针对与主命令相同的作业规格属性解析。
    pub command: String,
}

/// The entire matrix definition, loaded from a TOML file.
/// 从 TOML 文件加载的整个矩阵定义。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// The language for the runner's output messages (e.g., "en", "zh-CN").
    /// Defaults to "en" if not specified.
    ///
    /// 运行器输出消息的语言（例如 "en", "zh-CN"）。
    /// 如果未指定，则默认为 "en"。
    #[serde(default = "default_language")]
    pub language: String,

    /// The command template run once per job spec, with `{attribute}`
    /// placeholders.
    /// 每个作业规格运行一次的命令模板，带 `{attribute}` 占位符。
    pub command: String,

    /// Stop dispatching new jobs after the first failed or errored result.
    /// Defaults to `true`.
    /// 在第一个失败或出错的结果之后停止派发新作业。默认为 `true`。
    #[serde(default = "default_fail_fast")]
    pub fail_fast: bool,

    /// An optional per-job timeout in seconds. A job running longer is
    /// terminated and recorded as a timeout failure.
    /// 可选的单作业超时时间（秒）。运行更久的作业会被终止并记录为超时失败。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// A directory staged into every job workspace before any step runs;
    /// the local stand-in for source checkout.
    /// 在任何步骤运行前复制到每个作业工作区的目录；源码检出的本地替代。
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dir: Option<PathBuf>,

    /// Ordered external steps run before the main command in every job.
    /// 在每个作业的主命令之前按顺序运行的外部步骤。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub setup: Vec<SetupStep>,

    /// The axis set, in declaration order.
    /// 轴集合，按声明顺序排列。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<Axis>,

    /// Include rules, applied in declaration order after the product.
    /// include 规则，在乘积之后按声明顺序应用。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<IncludeRule>,

    /// Exclude rules, applied in declaration order after all includes.
    /// exclude 规则，在所有 include 之后按声明顺序应用。
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<ExcludeRule>,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_fail_fast() -> bool {
    true
}

/// A malformed matrix definition. Fatal: surfaced before anything is
/// expanded or dispatched, and mapped to the errored exit code.
///
/// 格式错误的矩阵定义。致命错误：在任何展开或派发之前暴露，
/// 并映射到 errored 退出码。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Two axes share a name. / 两个轴同名。
    DuplicateAxis(String),
    /// An axis declares no values. / 某个轴未声明任何取值。
    EmptyAxis(String),
    /// The command template is empty or blank. / 命令模板为空或全为空白。
    EmptyCommand,
    /// An include rule has an empty `set`, at this declaration position.
    /// 某条 include 规则的 `set` 为空，位于此声明位置。
    EmptyIncludeRule(usize),
    /// An exclude rule has no keys, at this declaration position.
    /// 某条 exclude 规则没有任何键，位于此声明位置。
    EmptyExcludeRule(usize),
    /// A setup step has a blank name, at this declaration position.
    /// 某个 setup 步骤的名称为空白，位于此声明位置。
    InvalidSetupStep(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DuplicateAxis(name) => {
                write!(f, "duplicate axis name '{name}'")
            }
            ConfigError::EmptyAxis(name) => {
                write!(f, "axis '{name}' declares no values")
            }
            ConfigError::EmptyCommand => f.write_str("the command template is empty"),
            ConfigError::EmptyIncludeRule(position) => {
                write!(f, "include rule #{position} has an empty 'set'")
            }
            ConfigError::EmptyExcludeRule(position) => {
                write!(f, "exclude rule #{position} has no keys")
            }
            ConfigError::InvalidSetupStep(position) => {
                write!(f, "setup step #{position} has no name")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl MatrixConfig {
    /// Validates the parsed definition. Positions in the returned errors are
    /// declaration-order indices, matching the file the user wrote.
    ///
    /// 验证解析后的定义。返回错误中的位置是声明顺序的索引，
    /// 与用户编写的文件一致。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        let mut seen = std::collections::BTreeSet::new();
        for axis in &self.axes {
            if !seen.insert(axis.name.as_str()) {
                return Err(ConfigError::DuplicateAxis(axis.name.clone()));
            }
            if axis.values.is_empty() {
                return Err(ConfigError::EmptyAxis(axis.name.clone()));
            }
        }

        for (position, rule) in self.include.iter().enumerate() {
            if rule.set.is_empty() {
                return Err(ConfigError::EmptyIncludeRule(position));
            }
        }

        for (position, rule) in self.exclude.iter().enumerate() {
            if rule.0.is_empty() {
                return Err(ConfigError::EmptyExcludeRule(position));
            }
        }

        for (position, step) in self.setup.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(ConfigError::InvalidSetupStep(position));
            }
        }

        Ok(())
    }
}

/// Loads and validates a matrix definition from a TOML file.
///
/// 从 TOML 文件加载并验证矩阵定义。
///
/// # Errors / 错误
/// Returns an error if the file cannot be read, is not valid TOML, or
/// fails validation.
/// 如果文件无法读取、不是有效的 TOML 或未通过验证，则返回错误。
pub fn load_matrix_config(path: &Path) -> Result<MatrixConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read matrix definition: {}", path.display()))?;

    let matrix: MatrixConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse matrix definition: {}", path.display()))?;

    matrix.validate()?;
    Ok(matrix)
}
