// ==========================================
// 教务档案系统 - 成绩
// ==========================================
// 约束: 分值域 2..=5; 学生/教师/课程引用必须存在
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 最低分
pub const MARK_VALUE_MIN: i32 = 2;
/// 最高分
pub const MARK_VALUE_MAX: i32 = 5;

/// 成绩实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mark {
    pub id: i64,
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub value: i32,
    pub mark_date: NaiveDate,
}

/// 新建/更新成绩时提交的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkDraft {
    pub student_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub value: i32,
    pub mark_date: NaiveDate,
}

impl MarkDraft {
    pub fn value_in_range(&self) -> bool {
        (MARK_VALUE_MIN..=MARK_VALUE_MAX).contains(&self.value)
    }
}

/// 成绩册列表行（附带全名与课程名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkView {
    pub id: i64,
    pub value: i32,
    pub mark_date: NaiveDate,
    pub student_id: i64,
    pub teacher_id: i64,
    pub subject_id: i64,
    pub student_name: String,
    pub teacher_name: String,
    pub subject_name: String,
}
