//! # Matrix Expander Module / 矩阵展开模块
//!
//! This module turns a validated matrix configuration into the ordered
//! sequence of job specs: cartesian product of the axes in declaration
//! order, then include rules, then exclude rules. The output is fully
//! deterministic for identical input.
//!
//! 此模块将验证过的矩阵配置转换为有序的作业规格序列：
//! 按声明顺序对轴求笛卡尔积，然后应用 include 规则，再应用 exclude 规则。
//! 对于相同的输入，输出是完全确定的。

use crate::core::config::{AttrMap, MatrixConfig};
use crate::core::models::JobSpec;

/// Expands the matrix into its final job spec sequence.
///
/// The leftmost declared axis varies slowest, matching conventional matrix
/// semantics. Include rules apply in declaration order: a rule with a
/// non-empty predicate extends every matching cell (rule attributes win on
/// key conflict); a rule with an empty or unmatched predicate appends one
/// new cell built from its own attributes. Exclude rules then remove every
/// cell that carries all of the rule's key/value pairs, including cells the
/// includes added. Duplicate cells are kept and run independently.
///
/// 将矩阵展开为最终的作业规格序列。
///
/// 最左侧声明的轴变化最慢，符合常规矩阵语义。include 规则按声明顺序应用：
/// 谓词非空的规则会扩展每个匹配的单元格（键冲突时规则属性优先）；
/// 谓词为空或无匹配的规则会追加一个由其自身属性构成的新单元格。
/// 随后 exclude 规则移除携带规则全部键值对的每个单元格，
/// 包括由 include 添加的单元格。重复的单元格会被保留并独立运行。
pub fn expand(config: &MatrixConfig) -> Vec<JobSpec> {
    let mut cells = base_product(config);

    for rule in &config.include {
        if rule.when.is_empty() {
            cells.push(rule.set.clone());
            continue;
        }

        let mut matched = false;
        for cell in cells.iter_mut() {
            if rule.matches(cell) {
                for (key, value) in &rule.set {
                    cell.insert(key.clone(), value.clone());
                }
                matched = true;
            }
        }
        if !matched {
            cells.push(rule.set.clone());
        }
    }

    for rule in &config.exclude {
        cells.retain(|cell| !rule.matches(cell));
    }

    cells
        .into_iter()
        .enumerate()
        .map(|(index, attributes)| JobSpec::new(index, attributes))
        .collect()
}

/// The cartesian product of all axes in declaration order. An empty axis
/// set yields zero cells, not one empty cell.
/// 按声明顺序对所有轴求笛卡尔积。空轴集合产生零个单元格，而不是一个空单元格。
fn base_product(config: &MatrixConfig) -> Vec<AttrMap> {
    if config.axes.is_empty() {
        return Vec::new();
    }

    let mut cells = vec![AttrMap::new()];
    for axis in &config.axes {
        let mut extended = Vec::with_capacity(cells.len() * axis.values.len());
        for cell in &cells {
            for value in &axis.values {
                let mut next = cell.clone();
                next.insert(axis.name.clone(), value.clone());
                extended.push(next);
            }
        }
        cells = extended;
    }
    cells
}
