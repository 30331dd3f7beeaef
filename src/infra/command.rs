//! # Process Spawning Module / 进程派生模块
//!
//! Spawns external commands and captures their output for the execution
//! log. Both output streams are drained concurrently so a chatty child
//! cannot deadlock on a full pipe.
//!
//! 派生外部命令并为执行日志捕获其输出。
//! 两个输出流被并发读取，因此输出繁多的子进程不会因管道填满而死锁。

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// Builds a command for an argv with a working directory and extra
/// environment variables. The child is killed if the handle is dropped,
/// e.g. when a run is interrupted.
///
/// 为 argv 构建命令，带有工作目录和额外的环境变量。
/// 如果句柄被丢弃（例如运行被中断），子进程会被杀死。
pub fn build_command(argv: &[String], cwd: &Path, env: &[(String, String)]) -> Command {
    let mut cmd = Command::new(&argv[0]);
    cmd.args(&argv[1..])
        .current_dir(cwd)
        .kill_on_drop(true)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd
}

/// Spawns a command and waits for it, capturing stdout and stderr.
///
/// The streams are drained concurrently into separate buffers and joined
/// stdout-first afterwards; line-level interleaving is not preserved.
///
/// # Returns
/// The `ExitStatus` wrapped in an `io::Result`, and the captured output.
///
/// 派生命令并等待其结束，捕获 stdout 和 stderr。
///
/// 两个流被并发读入各自的缓冲区，随后按 stdout 在前的顺序拼接；
/// 不保留行级交错。
///
/// # Returns
/// 包装在 `io::Result` 中的 `ExitStatus`，以及捕获的输出。
pub async fn spawn_and_capture(
    mut cmd: Command,
) -> (std::io::Result<ExitStatus>, String) {
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => return (Err(e), String::new()),
    };

    // Both pipes were requested in build_command; a missing one means the
    // caller configured the command differently.
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, out, err) = tokio::join!(
        child.wait(),
        read_lines(stdout),
        read_lines(stderr),
    );

    let mut output = out;
    output.push_str(&err);
    (status, output)
}

/// Drains one output stream line by line into a string.
async fn read_lines<R: AsyncRead + Unpin>(stream: Option<R>) -> String {
    let Some(stream) = stream else {
        return String::new();
    };
    let mut buffer = String::new();
    let mut lines = BufReader::new(stream).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        buffer.push_str(&line);
        buffer.push('\n');
    }
    buffer
}
