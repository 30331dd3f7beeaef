//! # CLI Commands Module / CLI 命令模块
//!
//! The subcommand implementations of the Gridrun CLI.
//! Gridrun CLI 的子命令实现。

pub mod init;
pub mod run;
