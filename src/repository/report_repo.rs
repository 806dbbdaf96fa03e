// ==========================================
// 教务档案系统 - 报表事实数据仓储
// ==========================================
// 职责: 为报表引擎提供联表后的成绩事实行
// 连接: marks ⋈ people(学生) ⋈ people(教师) ⋈ subjects ⟕ groups(学生所在小组)
// 约束: 所有连接均为多对一，每条成绩恰好产出一行
// ==========================================

use crate::domain::report::{MarkFact, ReportQuery};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_builder::SqlQueryBuilder;
use rusqlite::{params_from_iter, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const FACT_SELECT: &str = r#"
    SELECT
        m.id, m.value, m.mark_date,
        st.id, st.first_name, st.last_name,
        g.id, g.name,
        th.id, th.first_name, th.last_name,
        sb.id, sb.name
    FROM marks m
    JOIN people st ON st.id = m.student_id
    JOIN people th ON th.id = m.teacher_id
    JOIN subjects sb ON sb.id = m.subject_id
    LEFT JOIN groups g ON g.id = st.group_id
"#;

/// 报表引擎的存储边界
///
/// 实现方需保证: 返回的每一行都满足 query 的日期区间与全部过滤条件，
/// 且同一 mark_id 只出现一次。
pub trait MarkFactSource: Send + Sync {
    fn load_facts(&self, query: &ReportQuery) -> RepositoryResult<Vec<MarkFact>>;
}

/// 基于 SQLite 的事实数据源
pub struct SqliteMarkFactSource {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteMarkFactSource {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }
}

impl MarkFactSource for SqliteMarkFactSource {
    fn load_facts(&self, query: &ReportQuery) -> RepositoryResult<Vec<MarkFact>> {
        let (sql, values) = SqlQueryBuilder::new(FACT_SELECT)
            .where_param("m.mark_date >= ?", query.date_from.format("%Y-%m-%d").to_string())
            .where_param("m.mark_date <= ?", query.date_to.format("%Y-%m-%d").to_string())
            .and_eq_if("st.group_id", query.group_id)
            .and_eq_if("m.student_id", query.student_id)
            .and_eq_if("m.subject_id", query.subject_id)
            .and_eq_if("m.teacher_id", query.teacher_id)
            .order_by("m.id")
            .build();

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let facts = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(MarkFact {
                    mark_id: row.get(0)?,
                    value: row.get(1)?,
                    mark_date: row.get(2)?,
                    student_id: row.get(3)?,
                    student_first_name: row.get(4)?,
                    student_last_name: row.get(5)?,
                    group_id: row.get(6)?,
                    group_name: row.get(7)?,
                    teacher_id: row.get(8)?,
                    teacher_first_name: row.get(9)?,
                    teacher_last_name: row.get(10)?,
                    subject_id: row.get(11)?,
                    subject_name: row.get(12)?,
                })
            })?
            .collect::<SqliteResult<Vec<MarkFact>>>()?;

        tracing::debug!(rows = facts.len(), "报表事实行加载完成");
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_with_schema;
    use chrono::NaiveDate;

    fn setup() -> SqliteMarkFactSource {
        let conn = open_in_memory_with_schema().unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO groups (id, name) VALUES (1, 'G1'), (2, 'G2');
            INSERT INTO subjects (id, name) VALUES (1, 'Math'), (2, 'Physics');
            INSERT INTO people (id, first_name, last_name, group_id, type) VALUES
                (1, 'Ivan', 'Petrov', 1, 'S'),
                (2, 'Anna', 'Andreeva', 2, 'S'),
                (3, 'Boris', 'Volkov', NULL, 'S'),
                (10, 'Olga', 'Sidorova', NULL, 'P'),
                (11, 'Petr', 'Ivanov', NULL, 'P');
            INSERT INTO marks (student_id, subject_id, teacher_id, value, mark_date) VALUES
                (1, 1, 10, 5, '2024-01-10'),
                (2, 1, 10, 3, '2024-01-12'),
                (3, 2, 11, 4, '2024-01-31'),
                (1, 2, 11, 2, '2024-02-01');
            "#,
        )
        .unwrap();
        SqliteMarkFactSource::new(Arc::new(Mutex::new(conn)))
    }

    fn jan() -> ReportQuery {
        ReportQuery::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let source = setup();
        let facts = source.load_facts(&jan()).unwrap();
        assert_eq!(facts.len(), 3);
        assert!(facts.iter().all(|f| f.mark_date.format("%m").to_string() == "01"));
    }

    #[test]
    fn test_groupless_student_kept_with_empty_group() {
        let source = setup();
        let facts = source.load_facts(&jan().with_student(3)).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].group_id, None);
        assert_eq!(facts[0].group_name, None);
        assert_eq!(facts[0].teacher_last_name, "Ivanov");
    }

    #[test]
    fn test_group_filter_uses_student_group() {
        let source = setup();
        let facts = source.load_facts(&jan().with_group(1)).unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].student_id, 1);
    }

    #[test]
    fn test_filters_compose_conjunctively() {
        let source = setup();
        let facts = source
            .load_facts(&jan().with_subject(1).with_teacher(10).with_student(2))
            .unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].value, 3);

        let none = source.load_facts(&jan().with_subject(2).with_teacher(10)).unwrap();
        assert!(none.is_empty());
    }
}
