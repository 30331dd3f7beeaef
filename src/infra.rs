//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for the matrix engine,
//! including process spawning, workspace management on the file system,
//! the local execution context provider, and i18n support.
//!
//! 此模块为矩阵引擎提供基础设施服务，
//! 包括进程派生、文件系统上的工作区管理、本地执行上下文提供者和国际化支持。

pub mod command;
pub mod fs;
pub mod local;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
