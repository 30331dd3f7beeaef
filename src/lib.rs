//! # Gridrun Library / Gridrun 库
//!
//! This library provides the core functionality for the Gridrun tool,
//! a configuration-driven CI matrix engine: it expands axes and
//! include/exclude rules into job specs and dispatches them against an
//! execution context provider with fail-fast aggregation.
//!
//! 此库为 Gridrun 工具提供核心功能，
//! 这是一个配置驱动的 CI 矩阵引擎：它将轴和 include/exclude 规则
//! 展开为作业规格，并通过执行上下文提供者派发它们，带 fail-fast 聚合。
//!
//! ## Modules / 模块
//!
//! - `core` - Core data models, matrix expansion and the dispatch engine
//! - `infra` - Infrastructure services like process spawning and workspaces
//! - `reporting` - Run result reporting and visualization
//! - `cli` - Command-line interface and commands
//!
//! - `core` - 核心数据模型、矩阵展开和派发引擎
//! - `infra` - 基础设施服务，如进程派生和工作区
//! - `reporting` - 运行结果报告和可视化
//! - `cli` - 命令行接口和命令

pub mod core;
pub mod infra;
pub mod reporting;
pub mod cli;

// Re-export commonly used items
pub use crate::core::config;
pub use crate::core::expander;
pub use crate::core::models;

/// Initializes the application's internationalization (i18n) based on the system locale.
///
/// This function detects the user's system locale and sets the appropriate
/// language for the application's user interface. It attempts to match the full
/// locale (e.g., "zh-CN"), then just the language code (e.g., "en"), and
/// finally falls back to the default language ("en").
pub fn init() {
    // Detect system locale and set it for i18n.
    // Fallback to "en" if detection fails.
    let locale = sys_locale::get_locale().unwrap_or_else(|| "en".to_string());
    let available_locales = rust_i18n::available_locales!();

    // Try to match the full locale first (e.g., "zh-CN")
    // Then try to match the language part only (e.g., "en" from "en-US")
    // Finally, fall back to "en"
    let lang = if available_locales.contains(&locale.as_str()) {
        &locale
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| available_locales.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

// Initialize i18n
rust_i18n::i18n!("locales", fallback = "en");
