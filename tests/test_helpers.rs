// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库 + 已装配的 AppState + 管理员/只读账户 + 数据构造
// ==========================================

#![allow(dead_code)]

use std::error::Error;

use academic_records::api::Actor;
use academic_records::app::AppState;
use academic_records::domain::{MarkDraft, PersonDraft, PersonKind, UserRole};
use chrono::NaiveDate;
use tempfile::NamedTempFile;

/// 集成测试环境
pub struct TestEnv {
    pub state: AppState,
    pub admin: Actor,
    pub reader: Actor,
    pub db_path: String,

    // 临时文件（确保生命周期）
    _temp_file: NamedTempFile,
}

impl TestEnv {
    /// 创建临时数据库，初始化 schema 并建立 admin / viewer 两个账户
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let temp_file = NamedTempFile::new()?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or("临时路径不是 UTF-8")?
            .to_string();

        let state = AppState::new(&db_path)?;
        state.auth_api.bootstrap_admin("admin", "admin-pw")?;
        let admin = state.auth_api.login("admin", "admin-pw")?;
        state
            .auth_api
            .create_user(&admin, "viewer", "viewer-pw", UserRole::User)?;
        let reader = state.auth_api.login("viewer", "viewer-pw")?;

        Ok(Self {
            state,
            admin,
            reader,
            db_path,
            _temp_file: temp_file,
        })
    }

    pub fn group(&self, name: &str) -> i64 {
        self.state
            .group_api
            .create_group(&self.admin, name)
            .expect("创建小组失败")
    }

    pub fn subject(&self, name: &str) -> i64 {
        self.state
            .subject_api
            .create_subject(&self.admin, name)
            .expect("创建科目失败")
    }

    pub fn student(&self, first: &str, last: &str, group_id: Option<i64>) -> i64 {
        self.state
            .person_api
            .create_person(&self.admin, &person_draft(first, last, PersonKind::Student, group_id))
            .expect("创建学生失败")
    }

    pub fn teacher(&self, first: &str, last: &str) -> i64 {
        self.state
            .person_api
            .create_person(&self.admin, &person_draft(first, last, PersonKind::Teacher, None))
            .expect("创建教师失败")
    }

    pub fn mark(&self, student_id: i64, subject_id: i64, teacher_id: i64, value: i32, date: &str) -> i64 {
        self.state
            .mark_api
            .create_mark(&self.admin, &mark_draft(student_id, subject_id, teacher_id, value, date))
            .expect("创建成绩失败")
    }
}

pub fn person_draft(first: &str, last: &str, kind: PersonKind, group_id: Option<i64>) -> PersonDraft {
    PersonDraft {
        first_name: first.to_string(),
        last_name: last.to_string(),
        father_name: None,
        kind,
        group_id,
    }
}

pub fn mark_draft(student_id: i64, subject_id: i64, teacher_id: i64, value: i32, date: &str) -> MarkDraft {
    MarkDraft {
        student_id,
        subject_id,
        teacher_id,
        value,
        mark_date: d(date),
    }
}

/// 解析 YYYY-MM-DD（测试数据专用）
pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("测试日期格式错误")
}
