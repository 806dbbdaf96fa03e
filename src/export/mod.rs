// ==========================================
// 教务档案系统 - 报表导出
// ==========================================
// 格式: TXT（列对齐）/ CSV（默认分号分隔）
// 编码: UTF-8，直接由 AggregationRow 生成
// ==========================================

pub mod csv;
pub mod txt;

use std::path::Path;

use thiserror::Error;

use crate::domain::report::{AggregationRow, GroupingKey};

pub use self::csv::render_csv;
pub use self::txt::render_txt;

/// 导出错误
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV 写入失败: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("文件写入失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("编码失败: {0}")]
    Encoding(String),

    #[error("不支持的导出格式: {0}（可选 json / txt / csv）")]
    UnsupportedFormat(String),

    #[error("第 {index} 行与 {group_by} 维度的列不一致")]
    ShapeMismatch { group_by: &'static str, index: usize },
}

pub type ExportResult<T> = Result<T, ExportError>;

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Txt,
    Csv,
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "txt" => Ok(ExportFormat::Txt),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// 表头列（year 维度没有 id 列）
pub(crate) fn columns_for(group_by: GroupingKey) -> &'static [&'static str] {
    match group_by {
        GroupingKey::Year => &["key", "avg", "count"],
        _ => &["id", "name", "avg", "count"],
    }
}

/// 行的各列取值，与 columns_for 一一对应
pub(crate) fn cells_of(row: &AggregationRow, avg: String) -> Vec<String> {
    match row {
        AggregationRow::Entity { id, name, count, .. } => vec![
            id.map(|v| v.to_string()).unwrap_or_default(),
            name.clone(),
            avg,
            count.to_string(),
        ],
        AggregationRow::Year { key, count, .. } => vec![key.clone(), avg, count.to_string()],
    }
}

/// 行形态须与维度一致: year 维度只接受 Year 行，其余维度只接受 Entity 行
pub(crate) fn check_shape(group_by: GroupingKey, rows: &[AggregationRow]) -> ExportResult<()> {
    let want_year = group_by == GroupingKey::Year;
    match rows
        .iter()
        .position(|row| matches!(row, AggregationRow::Year { .. }) != want_year)
    {
        Some(index) => Err(ExportError::ShapeMismatch {
            group_by: group_by.as_str(),
            index,
        }),
        None => Ok(()),
    }
}

/// 按格式渲染
pub fn render(
    format: ExportFormat,
    group_by: GroupingKey,
    rows: &[AggregationRow],
    csv_delimiter: u8,
) -> ExportResult<String> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(rows)
            .map_err(|e| ExportError::Encoding(e.to_string())),
        ExportFormat::Txt => render_txt(group_by, rows),
        ExportFormat::Csv => render_csv(group_by, rows, csv_delimiter),
    }
}

/// 渲染并写入文件
pub fn write_to_path(
    path: impl AsRef<Path>,
    format: ExportFormat,
    group_by: GroupingKey,
    rows: &[AggregationRow],
    csv_delimiter: u8,
) -> ExportResult<()> {
    let content = render(format, group_by, rows, csv_delimiter)?;
    std::fs::write(path.as_ref(), content)?;
    tracing::info!(path = %path.as_ref().display(), rows = rows.len(), "报表已导出");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!(" txt ".parse::<ExportFormat>().unwrap(), ExportFormat::Txt);
        assert!(matches!(
            "xlsx".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_json_render_is_row_list() {
        let rows = vec![AggregationRow::Year {
            key: "2024".to_string(),
            avg: 4.0,
            count: 2,
        }];
        let out = render(ExportFormat::Json, GroupingKey::Year, &rows, b';').unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["key"], "2024");
        assert_eq!(value[0]["count"], 2);
        assert!(value[0].get("id").is_none());
    }

    #[test]
    fn test_rows_must_match_dimension() {
        let entity = AggregationRow::Entity {
            id: Some(1),
            name: "G1".to_string(),
            avg: 4.0,
            count: 1,
        };
        let year = AggregationRow::Year {
            key: "2024".to_string(),
            avg: 4.0,
            count: 1,
        };

        for format in [ExportFormat::Txt, ExportFormat::Csv] {
            assert!(matches!(
                render(format, GroupingKey::Year, &[entity.clone()], b';'),
                Err(ExportError::ShapeMismatch { group_by: "year", index: 0 })
            ));
            assert!(matches!(
                render(format, GroupingKey::Group, &[entity.clone(), year.clone()], b';'),
                Err(ExportError::ShapeMismatch { group_by: "group", index: 1 })
            ));
        }
    }

    #[test]
    fn test_write_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let rows = vec![AggregationRow::Entity {
            id: Some(1),
            name: "G1".to_string(),
            avg: 4.5,
            count: 2,
        }];
        write_to_path(&path, ExportFormat::Csv, GroupingKey::Group, &rows, b';').unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "id;name;avg;count\n1;G1;4.5;2\n");
    }
}
