// ==========================================
// 教务档案系统 - 小组登记 API
// ==========================================

use std::sync::Arc;

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::ApiResult;
use crate::api::validator::require_name;
use crate::domain::group::Group;
use crate::repository::group_repo::GroupRepository;

/// 小组登记API
pub struct GroupApi {
    group_repo: Arc<GroupRepository>,
}

impl GroupApi {
    pub fn new(group_repo: Arc<GroupRepository>) -> Self {
        Self { group_repo }
    }

    /// 查询全部小组（按名称排序）
    pub fn list_groups(&self) -> ApiResult<Vec<Group>> {
        Ok(self.group_repo.list_all()?)
    }

    /// 新建小组，返回新ID
    pub fn create_group(&self, actor: &Actor, name: &str) -> ApiResult<i64> {
        AuthorizationGate::guard(actor, "create_group", || {
            let name = require_name("小组名称", name)?;
            Ok(self.group_repo.insert(&name)?)
        })
    }

    /// 重命名小组
    pub fn update_group(&self, actor: &Actor, group_id: i64, name: &str) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "update_group", || {
            let name = require_name("小组名称", name)?;
            Ok(self.group_repo.update(group_id, &name)?)
        })
    }

    /// 删除小组（成员保留，group_id 置空）
    pub fn delete_group(&self, actor: &Actor, group_id: i64) -> ApiResult<()> {
        AuthorizationGate::guard(actor, "delete_group", || {
            Ok(self.group_repo.delete(group_id)?)
        })
    }
}
