// ==========================================
// 教务档案系统 - 人员登记 API
// ==========================================
// 约束:
// - 姓、名不能为空，空父称视为缺失
// - 教师不能归属小组
// - 学生的 group_id 必须指向已存在的小组
// - 已有成绩的人员不能变更类型
// ==========================================

use std::sync::Arc;

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_name;
use crate::domain::person::{PersonDraft, PersonView};
use crate::domain::types::PersonKind;
use crate::repository::group_repo::GroupRepository;
use crate::repository::person_repo::{PersonRepository, PersonUpdateOutcome};

/// 人员登记API
pub struct PersonApi {
    person_repo: Arc<PersonRepository>,
    group_repo: Arc<GroupRepository>,
}

impl PersonApi {
    pub fn new(person_repo: Arc<PersonRepository>, group_repo: Arc<GroupRepository>) -> Self {
        Self {
            person_repo,
            group_repo,
        }
    }

    /// 查询全部人员（按类型、姓、名排序）
    pub fn list_people(&self) -> ApiResult<Vec<PersonView>> {
        Ok(self.person_repo.list_all()?)
    }

    /// 查询全部学生
    pub fn list_students(&self) -> ApiResult<Vec<PersonView>> {
        Ok(self.person_repo.list_students()?)
    }

    /// 查询全部教师
    pub fn list_teachers(&self) -> ApiResult<Vec<PersonView>> {
        Ok(self.person_repo.list_teachers()?)
    }

    /// 新建人员，返回新ID
    pub fn create_person(&self, actor: &Actor, draft: &PersonDraft) -> ApiResult<i64> {
        AuthorizationGate::guard(actor, "create_person", || {
            let draft = self.validate(draft)?;
            Ok(self.person_repo.insert(&draft)?)
        })
    }

    /// 更新人员
    pub fn update_person(&self, actor: &Actor, person_id: i64, draft: &PersonDraft) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "update_person", || {
            let draft = self.validate(draft)?;
            match self.person_repo.update_unless_kind_locked(person_id, &draft)? {
                PersonUpdateOutcome::Updated => Ok(()),
                PersonUpdateOutcome::KindLocked { current, marks } => {
                    Err(ApiError::BusinessRuleViolation(format!(
                        "Person(id={}) 已有 {} 条成绩，不能由 {} 改为 {}",
                        person_id, marks, current, draft.kind
                    )))
                }
            }
        })
    }

    /// 删除人员（级联删除其作为学生或教师的全部成绩）
    pub fn delete_person(&self, actor: &Actor, person_id: i64) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "delete_person", || {
            Ok(self.person_repo.delete(person_id)?)
        })
    }

    fn validate(&self, draft: &PersonDraft) -> ApiResult<PersonDraft> {
        let draft = draft.normalized();
        require_name("名", &draft.first_name)?;
        require_name("姓", &draft.last_name)?;

        match (draft.kind, draft.group_id) {
            (PersonKind::Teacher, Some(_)) => {
                return Err(ApiError::InvalidArgument("教师不能归属小组".to_string()));
            }
            (PersonKind::Student, Some(group_id)) => {
                if self.group_repo.find_by_id(group_id)?.is_none() {
                    return Err(ApiError::NotFound(format!("Group(id={})不存在", group_id)));
                }
            }
            _ => {}
        }
        Ok(draft)
    }
}
