// ==========================================
// 教务档案系统 - SQL 构建工具
// ==========================================
// 职责: 动态拼接 WHERE 条件，同时收集绑定参数
// 约束: 条件值一律走参数绑定，不拼接进 SQL 文本
// ==========================================

use rusqlite::types::Value;

/// SQL 查询构建器（流式 API）
///
/// # 示例
/// ```
/// use academic_records::repository::sql_builder::SqlQueryBuilder;
///
/// let (sql, params) = SqlQueryBuilder::new("SELECT * FROM marks m")
///     .where_param("m.mark_date >= ?", "2024-01-01".to_string())
///     .and_eq_if("m.student_id", Some(7))
///     .and_eq_if("m.teacher_id", None)
///     .order_by("m.id")
///     .build();
///
/// assert_eq!(sql, "SELECT * FROM marks m WHERE m.mark_date >= ? AND m.student_id = ? ORDER BY m.id");
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SqlQueryBuilder {
    select_clause: String,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    order_by_clause: Option<String>,
    limit_clause: Option<usize>,
}

impl SqlQueryBuilder {
    /// 创建新的 SQL 查询构建器
    pub fn new(select: &str) -> Self {
        Self {
            select_clause: select.to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_by_clause: None,
            limit_clause: None,
        }
    }

    /// 添加带一个占位符的 WHERE 条件
    pub fn where_param(mut self, condition: &str, value: impl Into<Value>) -> Self {
        self.where_clauses.push(condition.to_string());
        self.params.push(value.into());
        self
    }

    /// 值存在时添加等值条件 `column = ?`
    pub fn and_eq_if(mut self, column: &str, value: Option<i64>) -> Self {
        if let Some(v) = value {
            self.where_clauses.push(format!("{} = ?", column));
            self.params.push(Value::Integer(v));
        }
        self
    }

    /// 添加 ORDER BY 子句
    pub fn order_by(mut self, order: &str) -> Self {
        self.order_by_clause = Some(order.to_string());
        self
    }

    /// 添加 LIMIT 子句
    pub fn limit(mut self, n: usize) -> Self {
        self.limit_clause = Some(n);
        self
    }

    /// 构建最终的 SQL 语句与参数列表
    pub fn build(self) -> (String, Vec<Value>) {
        let mut sql = self.select_clause;

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(order) = &self.order_by_clause {
            sql.push_str(" ORDER BY ");
            sql.push_str(order);
        }

        if let Some(limit) = self.limit_clause {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_builder_basic() {
        let (sql, params) = SqlQueryBuilder::new("SELECT * FROM groups").build();
        assert_eq!(sql, "SELECT * FROM groups");
        assert!(params.is_empty());
    }

    #[test]
    fn test_sql_builder_and_eq_if_with_none() {
        let (sql, params) = SqlQueryBuilder::new("SELECT * FROM marks")
            .where_param("mark_date <= ?", "2024-12-31".to_string())
            .and_eq_if("subject_id", None)
            .order_by("id")
            .build();

        assert!(!sql.contains("subject_id"));
        assert_eq!(sql, "SELECT * FROM marks WHERE mark_date <= ? ORDER BY id");
        assert_eq!(params, vec![Value::Text("2024-12-31".to_string())]);
    }

    #[test]
    fn test_sql_builder_params_follow_clause_order() {
        let (sql, params) = SqlQueryBuilder::new("SELECT * FROM marks")
            .and_eq_if("student_id", Some(3))
            .and_eq_if("teacher_id", Some(9))
            .limit(5)
            .build();

        assert_eq!(
            sql,
            "SELECT * FROM marks WHERE student_id = ? AND teacher_id = ? LIMIT 5"
        );
        assert_eq!(params, vec![Value::Integer(3), Value::Integer(9)]);
    }
}
