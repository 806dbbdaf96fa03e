// ==========================================
// 教务档案系统 - 成绩册 API
// ==========================================
// 约束:
// - 分值 2..=5
// - student_id 指向学生, teacher_id 指向教师, subject_id 指向已存在课程
// ==========================================

use std::sync::Arc;

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_mark_value;
use crate::domain::mark::{MarkDraft, MarkView};
use crate::repository::mark_repo::{MarkRefIssue, MarkRepository, MarkWrite};

/// 成绩册API
pub struct MarkApi {
    mark_repo: Arc<MarkRepository>,
}

impl MarkApi {
    pub fn new(mark_repo: Arc<MarkRepository>) -> Self {
        Self { mark_repo }
    }

    /// 查询成绩册（按ID排序）
    pub fn list_marks(&self) -> ApiResult<Vec<MarkView>> {
        Ok(self.mark_repo.list_all()?)
    }

    /// 录入成绩，返回新ID
    pub fn create_mark(&self, actor: &Actor, draft: &MarkDraft) -> ApiResult<i64> {
        AuthorizationGate::guard(actor, "create_mark", || {
            validate_mark_value(draft.value)?;
            accept(self.mark_repo.insert_checked(draft)?)
        })
    }

    /// 修改成绩
    pub fn update_mark(&self, actor: &Actor, mark_id: i64, draft: &MarkDraft) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "update_mark", || {
            validate_mark_value(draft.value)?;
            accept(self.mark_repo.update_checked(mark_id, draft)?).map(|_| ())
        })
    }

    /// 删除成绩
    pub fn delete_mark(&self, actor: &Actor, mark_id: i64) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "delete_mark", || Ok(self.mark_repo.delete(mark_id)?))
    }
}

fn accept(outcome: MarkWrite) -> ApiResult<i64> {
    match outcome {
        MarkWrite::Written(id) => Ok(id),
        MarkWrite::Rejected(MarkRefIssue::MissingPerson(id)) => {
            Err(ApiError::NotFound(format!("Person(id={})不存在", id)))
        }
        MarkWrite::Rejected(MarkRefIssue::MissingSubject(id)) => {
            Err(ApiError::NotFound(format!("Subject(id={})不存在", id)))
        }
        MarkWrite::Rejected(MarkRefIssue::WrongKind {
            person_id,
            actual,
            expected,
        }) => Err(ApiError::InvalidArgument(format!(
            "Person(id={}) 类型为 {}，应为 {}",
            person_id, actual, expected
        ))),
    }
}
