// ==========================================
// 教务档案系统 - 成绩统计报表模型
// ==========================================
// 职责: 报表查询条件、联表事实行、分组维度、结果行
// ==========================================

use crate::domain::person::short_name;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// ReportQuery - 报表查询条件
// ==========================================

/// 报表查询条件
///
/// 日期区间为闭区间 [date_from, date_to]；可选过滤条件之间为 AND 关系。
/// group_id 匹配的是**学生**所在小组。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub teacher_id: Option<i64>,
}

impl ReportQuery {
    pub fn new(date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            date_from,
            date_to,
            group_id: None,
            student_id: None,
            subject_id: None,
            teacher_id: None,
        }
    }

    pub fn with_group(mut self, group_id: i64) -> Self {
        self.group_id = Some(group_id);
        self
    }

    pub fn with_student(mut self, student_id: i64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn with_subject(mut self, subject_id: i64) -> Self {
        self.subject_id = Some(subject_id);
        self
    }

    pub fn with_teacher(mut self, teacher_id: i64) -> Self {
        self.teacher_id = Some(teacher_id);
        self
    }

    /// 事实行是否满足全部条件
    pub fn matches(&self, fact: &MarkFact) -> bool {
        fact.mark_date >= self.date_from
            && fact.mark_date <= self.date_to
            && self.group_id.map_or(true, |g| fact.group_id == Some(g))
            && self.student_id.map_or(true, |s| fact.student_id == s)
            && self.subject_id.map_or(true, |s| fact.subject_id == s)
            && self.teacher_id.map_or(true, |t| fact.teacher_id == t)
    }
}

// ==========================================
// MarkFact - 联表后的成绩事实行
// ==========================================

/// 成绩 ⋈ 学生 ⋈ 教师 ⋈ 课程 ⟕ 小组
///
/// 每条成绩恰好对应一行（所有连接均为多对一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkFact {
    pub mark_id: i64,
    pub value: i32,
    pub mark_date: NaiveDate,
    pub student_id: i64,
    pub student_first_name: String,
    pub student_last_name: String,
    pub group_id: Option<i64>,
    pub group_name: Option<String>,
    pub teacher_id: i64,
    pub teacher_first_name: String,
    pub teacher_last_name: String,
    pub subject_id: i64,
    pub subject_name: String,
}

// ==========================================
// GroupingKey - 分组维度
// ==========================================

/// 分组维度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingKey {
    Group,
    Student,
    Subject,
    Teacher,
    Year,
}

/// 分区排序键
///
/// 同一次报表只会出现一种变体
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PartitionKey {
    /// (主排序, 次排序, 实体ID)
    Named(String, String, i64),
    Year(i32),
}

/// 事实行在某个维度下的归属
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub key: PartitionKey,
    pub id: Option<i64>,
    pub label: String,
}

impl GroupingKey {
    pub const ALL: [GroupingKey; 5] = [
        GroupingKey::Group,
        GroupingKey::Student,
        GroupingKey::Subject,
        GroupingKey::Teacher,
        GroupingKey::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupingKey::Group => "group",
            GroupingKey::Student => "student",
            GroupingKey::Subject => "subject",
            GroupingKey::Teacher => "teacher",
            GroupingKey::Year => "year",
        }
    }

    /// 提取事实行的分区
    ///
    /// 返回 None 表示该行不参与本维度（无小组的学生在 group 维度下被排除）
    pub fn partition_of(&self, fact: &MarkFact) -> Option<Partition> {
        match self {
            GroupingKey::Group => {
                let id = fact.group_id?;
                let name = fact.group_name.clone().unwrap_or_default();
                Some(Partition {
                    key: PartitionKey::Named(name.clone(), String::new(), id),
                    id: Some(id),
                    label: name,
                })
            }
            GroupingKey::Student => Some(Partition {
                key: PartitionKey::Named(
                    fact.student_last_name.clone(),
                    fact.student_first_name.clone(),
                    fact.student_id,
                ),
                id: Some(fact.student_id),
                label: short_name(&fact.student_last_name, &fact.student_first_name),
            }),
            GroupingKey::Subject => Some(Partition {
                key: PartitionKey::Named(fact.subject_name.clone(), String::new(), fact.subject_id),
                id: Some(fact.subject_id),
                label: fact.subject_name.clone(),
            }),
            GroupingKey::Teacher => Some(Partition {
                key: PartitionKey::Named(
                    fact.teacher_last_name.clone(),
                    fact.teacher_first_name.clone(),
                    fact.teacher_id,
                ),
                id: Some(fact.teacher_id),
                label: short_name(&fact.teacher_last_name, &fact.teacher_first_name),
            }),
            GroupingKey::Year => {
                let year = fact.mark_date.year();
                Some(Partition {
                    key: PartitionKey::Year(year),
                    id: None,
                    label: year.to_string(),
                })
            }
        }
    }

    /// 组装结果行（year 维度没有 id 字段）
    pub fn make_row(&self, partition: Partition, avg: f64, count: i64) -> AggregationRow {
        match self {
            GroupingKey::Year => AggregationRow::Year {
                key: partition.label,
                avg,
                count,
            },
            _ => AggregationRow::Entity {
                id: partition.id,
                name: partition.label,
                avg,
                count,
            },
        }
    }
}

impl fmt::Display for GroupingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        GroupingKey::ALL
            .into_iter()
            .find(|k| k.as_str() == raw)
            .ok_or_else(|| {
                format!(
                    "group_by 必须是以下之一: group, student, subject, teacher, year (实际: {})",
                    s.trim()
                )
            })
    }
}

// ==========================================
// AggregationRow - 报表结果行
// ==========================================

/// 报表结果行（非持久化投影）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AggregationRow {
    /// group / student / subject / teacher 维度
    Entity {
        id: Option<i64>,
        name: String,
        avg: f64,
        count: i64,
    },
    /// year 维度
    Year { key: String, avg: f64, count: i64 },
}

impl AggregationRow {
    pub fn id(&self) -> Option<i64> {
        match self {
            AggregationRow::Entity { id, .. } => *id,
            AggregationRow::Year { .. } => None,
        }
    }

    /// 显示名（year 维度为年份字符串）
    pub fn label(&self) -> &str {
        match self {
            AggregationRow::Entity { name, .. } => name,
            AggregationRow::Year { key, .. } => key,
        }
    }

    pub fn avg(&self) -> f64 {
        match self {
            AggregationRow::Entity { avg, .. } | AggregationRow::Year { avg, .. } => *avg,
        }
    }

    pub fn count(&self) -> i64 {
        match self {
            AggregationRow::Entity { count, .. } | AggregationRow::Year { count, .. } => *count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(group: Option<(i64, &str)>, date: NaiveDate) -> MarkFact {
        MarkFact {
            mark_id: 1,
            value: 4,
            mark_date: date,
            student_id: 10,
            student_first_name: "Ivan".to_string(),
            student_last_name: "Petrov".to_string(),
            group_id: group.map(|g| g.0),
            group_name: group.map(|g| g.1.to_string()),
            teacher_id: 20,
            teacher_first_name: "Olga".to_string(),
            teacher_last_name: "Sidorova".to_string(),
            subject_id: 30,
            subject_name: "Math".to_string(),
        }
    }

    #[test]
    fn test_grouping_key_parse() {
        assert_eq!("group".parse::<GroupingKey>(), Ok(GroupingKey::Group));
        assert_eq!(" YEAR ".parse::<GroupingKey>(), Ok(GroupingKey::Year));
        let err = "department".parse::<GroupingKey>().unwrap_err();
        assert!(err.contains("department"));
    }

    #[test]
    fn test_partition_labels() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let f = fact(Some((1, "G1")), d);

        let p = GroupingKey::Student.partition_of(&f).unwrap();
        assert_eq!(p.label, "Petrov Ivan");
        assert_eq!(p.id, Some(10));

        let p = GroupingKey::Teacher.partition_of(&f).unwrap();
        assert_eq!(p.label, "Sidorova Olga");

        let p = GroupingKey::Year.partition_of(&f).unwrap();
        assert_eq!(p.label, "2024");
        assert_eq!(p.id, None);
        assert_eq!(p.key, PartitionKey::Year(2024));
    }

    #[test]
    fn test_groupless_student_has_no_group_partition() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let f = fact(None, d);
        assert!(GroupingKey::Group.partition_of(&f).is_none());
        assert!(GroupingKey::Subject.partition_of(&f).is_some());
    }

    #[test]
    fn test_query_matches_student_group() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let f = fact(Some((1, "G1")), d);
        let q = ReportQuery::new(d, d).with_group(1);
        assert!(q.matches(&f));
        assert!(!ReportQuery::new(d, d).with_group(2).matches(&f));
        assert!(!ReportQuery::new(d, d).with_teacher(99).matches(&f));
        let next = d.succ_opt().unwrap();
        assert!(!ReportQuery::new(next, next).matches(&f));
    }

    #[test]
    fn test_year_row_serializes_without_id() {
        let row = GroupingKey::Year.make_row(
            Partition {
                key: PartitionKey::Year(2023),
                id: None,
                label: "2023".to_string(),
            },
            4.5,
            2,
        );
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json, serde_json::json!({"key": "2023", "avg": 4.5, "count": 2}));
    }
}
