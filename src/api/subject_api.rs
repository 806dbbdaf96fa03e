// ==========================================
// 教务档案系统 - 课程登记 API
// ==========================================

use std::sync::Arc;

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::ApiResult;
use crate::api::validator::require_name;
use crate::domain::subject::Subject;
use crate::repository::subject_repo::SubjectRepository;

/// 课程登记API
pub struct SubjectApi {
    subject_repo: Arc<SubjectRepository>,
}

impl SubjectApi {
    pub fn new(subject_repo: Arc<SubjectRepository>) -> Self {
        Self { subject_repo }
    }

    /// 查询全部课程（按名称排序）
    pub fn list_subjects(&self) -> ApiResult<Vec<Subject>> {
        Ok(self.subject_repo.list_all()?)
    }

    pub fn create_subject(&self, actor: &Actor, name: &str) -> ApiResult<i64> {
        AuthorizationGate::guard(actor, "create_subject", || {
            let name = require_name("课程名称", name)?;
            Ok(self.subject_repo.insert(&name)?)
        })
    }

    pub fn update_subject(&self, actor: &Actor, subject_id: i64, name: &str) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "update_subject", || {
            let name = require_name("课程名称", name)?;
            Ok(self.subject_repo.update(subject_id, &name)?)
        })
    }

    /// 删除课程（级联删除其成绩）
    pub fn delete_subject(&self, actor: &Actor, subject_id: i64) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "delete_subject", || {
            Ok(self.subject_repo.delete(subject_id)?)
        })
    }
}
