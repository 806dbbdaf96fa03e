// ==========================================
// 报表导出 - CSV
// ==========================================
// 表头: id;name;avg;count（year 维度: key;avg;count）
// 均值保留完整精度，不做舍入
// ==========================================

use ::csv::WriterBuilder;

use super::{cells_of, check_shape, columns_for, ExportError, ExportResult};
use crate::domain::report::{AggregationRow, GroupingKey};

/// 渲染 CSV 文本
pub fn render_csv(
    group_by: GroupingKey,
    rows: &[AggregationRow],
    delimiter: u8,
) -> ExportResult<String> {
    check_shape(group_by, rows)?;
    let mut wtr = WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    wtr.write_record(columns_for(group_by))?;
    for row in rows {
        wtr.write_record(cells_of(row, row.avg().to_string()))?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_rows() {
        let rows = vec![
            AggregationRow::Entity {
                id: Some(3),
                name: "Doe John".to_string(),
                avg: 11.0 / 3.0,
                count: 3,
            },
            AggregationRow::Entity {
                id: Some(7),
                name: "Smith; Anna".to_string(),
                avg: 5.0,
                count: 1,
            },
        ];
        let out = render_csv(GroupingKey::Student, &rows, b';').unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "id;name;avg;count");
        assert!(lines[1].starts_with("3;Doe John;3.666"));
        // 含分隔符的字段加引号
        assert_eq!(lines[2], "7;\"Smith; Anna\";5;1");
    }

    #[test]
    fn test_year_rows_and_custom_delimiter() {
        let rows = vec![AggregationRow::Year {
            key: "2023".to_string(),
            avg: 3.5,
            count: 4,
        }];
        let out = render_csv(GroupingKey::Year, &rows, b',').unwrap();
        assert_eq!(out, "key,avg,count\n2023,3.5,4\n");
    }

    #[test]
    fn test_empty_rows_keep_header() {
        let out = render_csv(GroupingKey::Subject, &[], b';').unwrap();
        assert_eq!(out, "id;name;avg;count\n");
    }
}
