//! # Matrix Initialization Module / 矩阵初始化模块
//!
//! This module provides functionality for initializing a new matrix
//! configuration through an interactive command-line wizard. It helps users
//! create a `Matrix.toml` file with axes, a command template and the
//! fail-fast policy.
//!
//! 此模块通过交互式命令行向导提供初始化新矩阵配置的功能。
//! 它帮助用户创建带有轴、命令模板和 fail-fast 策略的 `Matrix.toml` 文件。

use anyhow::{Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::fs;
use std::path::Path;

use crate::core::config::{Axis, MatrixConfig, Scalar};
use crate::infra::t;

const DEFAULT_CONFIG: &str = r#"# Matrix Configuration / 矩阵配置
# Documentation: https://github.com/ShaoG-R/gridrun

# Language for runner messages / 运行器消息的语言
language = "en"

# Command template, resolved once per job / 命令模板，每个作业解析一次
command = "echo matrix cell {python} on {os}"

# Stop dispatching after the first failure? / 第一次失败后停止派发？
fail_fast = true

# Axes / 轴
[[axes]]
name = "python" # Axis name / 轴名称
values = ["3.8", "3.9", "3.10"] # Ordered values / 有序的取值

[[axes]]
name = "os"
values = ["linux", "macos"]

# Extend one cell with an extra attribute / 用额外属性扩展一个单元格
[[include]]
when = { python = "3.8", os = "linux" }
set = { label = "lint" }

# Drop a cell from the product / 从乘积中去掉一个单元格
[[exclude]]
python = "3.10"
os = "macos"
"#;

/// Runs the wizard (or writes the default file) to generate `Matrix.toml`.
///
/// 运行向导（或写出默认文件）以生成 `Matrix.toml`。
pub fn run_init_wizard(language: &str, non_interactive: bool) -> Result<()> {
    let config_path = Path::new("Matrix.toml");
    let theme = ColorfulTheme::default();

    if !non_interactive {
        println!(
            "\n{}",
            t!("init.wizard_welcome", locale = language).cyan().bold()
        );
        println!("{}", t!("init.wizard_description", locale = language));
    }

    if config_path.exists() {
        if non_interactive {
            println!(
                "{}",
                t!(
                    "init.file_exists",
                    locale = language,
                    path = config_path.display()
                )
                .red()
            );
            return Ok(());
        }
        let confirmation = Confirm::with_theme(&theme)
            .with_prompt(t!(
                "init.overwrite_prompt",
                locale = language,
                path = config_path.display()
            ))
            .default(false)
            .interact()
            .context(t!("init.user_confirmation_failed", locale = language).to_string())?;
        if !confirmation {
            println!("{}", t!("init.aborted", locale = language));
            return Ok(());
        }
    }

    if non_interactive {
        fs::write(config_path, DEFAULT_CONFIG).with_context(|| {
            t!(
                "init.write_failed",
                locale = language,
                path = config_path.display()
            )
            .to_string()
        })?;
        print_success(config_path, language);
        return Ok(());
    }

    // Interactive part starts here
    let command: String = Input::with_theme(&theme)
        .with_prompt(t!("init.command_prompt", locale = language))
        .default("echo hello".to_string())
        .interact_text()?;

    let mut axes = Vec::new();
    loop {
        let entry: String = Input::with_theme(&theme)
            .with_prompt(t!("init.axis_prompt", locale = language))
            .allow_empty(true)
            .interact_text()?;
        if entry.trim().is_empty() {
            break;
        }
        match parse_axis_entry(&entry) {
            Some(axis) => axes.push(axis),
            None => println!("{}", t!("init.axis_invalid", locale = language).yellow()),
        }
    }

    let fail_fast = Confirm::with_theme(&theme)
        .with_prompt(t!("init.fail_fast_prompt", locale = language))
        .default(true)
        .interact()
        .context(t!("init.user_confirmation_failed", locale = language).to_string())?;

    let matrix = MatrixConfig {
        language: language.to_string(),
        command,
        fail_fast,
        timeout_secs: None,
        source_dir: None,
        setup: vec![],
        axes,
        include: vec![],
        exclude: vec![],
    };

    let toml_string = toml::to_string_pretty(&matrix)
        .context(t!("init.serialize_failed", locale = language).to_string())?;

    fs::write(config_path, toml_string).with_context(|| {
        t!(
            "init.write_failed",
            locale = language,
            path = config_path.display()
        )
        .to_string()
    })?;

    print_success(config_path, language);
    Ok(())
}

/// Parses one wizard axis entry of the form `name=value1,value2,value3`.
/// All wizard-entered values are strings; richer types can be edited into
/// the file afterwards.
///
/// 解析形如 `name=value1,value2,value3` 的向导轴条目。
/// 向导输入的所有值都是字符串；更丰富的类型可以随后在文件中编辑。
fn parse_axis_entry(entry: &str) -> Option<Axis> {
    let (name, values) = entry.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let values: Vec<Scalar> = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| Scalar::Str(v.to_string()))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(Axis {
        name: name.to_string(),
        values,
    })
}

fn print_success(path: &Path, language: &str) {
    println!(
        "\n{} {}",
        "✔".green(),
        t!(
            "init.success_created",
            locale = language,
            path = path.display()
        )
        .bold()
    );
    println!("{}", t!("init.usage_hint", locale = language));
}
