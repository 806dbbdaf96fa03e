// ==========================================
// 报表导出 - TXT
// ==========================================
// 列对齐: 按各列最大字符数右侧补空格，列间两个空格
// 均值保留两位小数
// ==========================================

use super::{cells_of, check_shape, columns_for, ExportResult};
use crate::domain::report::{AggregationRow, GroupingKey};

const COLUMN_GAP: &str = "  ";

/// 渲染 TXT 文本（表头 + 分隔线 + 数据行）
pub fn render_txt(group_by: GroupingKey, rows: &[AggregationRow]) -> ExportResult<String> {
    check_shape(group_by, rows)?;
    let header: Vec<String> = columns_for(group_by)
        .iter()
        .map(|c| c.to_string())
        .collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| cells_of(row, format!("{:.2}", row.avg())))
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    Ok(out)
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", cell, " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    out.push_str(line.trim_end());
    out.push('\n');
}
