//! # File System Operations Module / 文件系统操作模块
//!
//! This module provides utilities for file system operations,
//! such as creating isolated per-job workspaces and staging source trees.
//!
//! 此模块提供文件系统操作的实用功能，
//! 如创建隔离的单作业工作区和复制源码树。

use anyhow::{Context, Result};
use fs_extra::dir::{copy, CopyOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated working directory for one job. The directory on disk is
/// deleted when this struct is dropped, ensuring cleanup even when the job
/// errors out.
///
/// 单个作业的隔离工作目录。当此结构体被丢弃时，磁盘上的目录会被删除，
/// 即使作业出错也能确保清理。
#[derive(Debug)]
pub struct JobWorkspace {
    /// The `TempDir` guard. When it goes out of scope, the directory is gone.
    /// `TempDir` 的 guard。当它超出作用域时，目录即被删除。
    _guard: TempDir,
    path: PathBuf,
}

impl JobWorkspace {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Creates a unique temporary workspace for a job, with the job's label
/// baked into the directory name for easier debugging of leftovers.
///
/// 为作业创建唯一的临时工作区，目录名中包含作业标签，
/// 便于调试遗留目录。
pub fn create_job_workspace(label: &str) -> Result<JobWorkspace> {
    let prefix = format!("gridrun_{}_", sanitize_label(label));
    let guard = tempfile::Builder::new()
        .prefix(&prefix)
        .tempdir()
        .context("Failed to create job workspace directory")?;
    let path = guard.path().to_path_buf();
    Ok(JobWorkspace {
        _guard: guard,
        path,
    })
}

/// Copies the entire content of a source directory into a workspace.
///
/// 将源目录的全部内容复制到工作区中。
pub fn stage_source_dir(from: &Path, to: &Path) -> Result<()> {
    let from = fs::canonicalize(from)
        .with_context(|| format!("Source directory not found: {}", from.display()))?;
    let mut options = CopyOptions::new();
    options.overwrite = true;
    options.content_only = true;
    copy(&from, to, &options)
        .with_context(|| format!("Failed to stage source directory: {}", from.display()))?;
    Ok(())
}

/// Replaces every character that is awkward in a directory name.
pub fn sanitize_label(label: &str) -> String {
    let mut sanitized: String = label
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    sanitized.truncate(48);
    sanitized
}
