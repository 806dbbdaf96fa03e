// ==========================================
// 教务档案系统 - 权限闸门
// ==========================================
// 角色模型: admin 可执行全部写操作; user 全局只读
// 约束: 所有写操作统一经过 AuthorizationGate::guard，在数据访问边界强制执行
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::types::UserRole;
use serde::{Deserialize, Serialize};

/// 已登录的操作者
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: i64,
    pub username: String,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, username: &str, role: UserRole) -> Self {
        Self {
            user_id,
            username: username.to_string(),
            role,
        }
    }
}

/// 权限闸门
pub struct AuthorizationGate;

impl AuthorizationGate {
    /// 纯谓词: 该角色能否修改数据（供展示层决定是否渲染编辑控件）
    pub fn can_mutate(role: UserRole) -> bool {
        matches!(role, UserRole::Admin)
    }

    /// 校验写权限
    pub fn require_mutation(actor: &Actor, action: &str) -> ApiResult<()> {
        if Self::can_mutate(actor.role) {
            return Ok(());
        }
        tracing::warn!(
            user = %actor.username,
            role = %actor.role,
            action = action,
            "拒绝写操作"
        );
        Err(ApiError::Unauthorized(format!(
            "用户 {} (角色: {}) 无权执行 {}",
            actor.username, actor.role, action
        )))
    }

    /// 写操作装饰器: 先校验权限，再执行 op
    pub fn guard<T>(actor: &Actor, action: &str, op: impl FnOnce() -> ApiResult<T>) -> ApiResult<T> {
        Self::require_mutation(actor, action)?;
        let result = op();
        match &result {
            Ok(_) => tracing::info!(user = %actor.username, action = action, "写操作完成"),
            Err(e) => tracing::warn!(user = %actor.username, action = action, error = %e, "写操作失败"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_can_mutate() {
        assert!(AuthorizationGate::can_mutate(UserRole::Admin));
        assert!(!AuthorizationGate::can_mutate(UserRole::User));
    }

    #[test]
    fn test_guard_skips_op_for_reader() {
        let called = Cell::new(false);
        let reader = Actor::new(2, "viewer", UserRole::User);
        let result = AuthorizationGate::guard(&reader, "delete_group", || {
            called.set(true);
            Ok(())
        });
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
        assert!(!called.get());
    }

    #[test]
    fn test_guard_runs_op_for_admin() {
        let admin = Actor::new(1, "dean", UserRole::Admin);
        let result = AuthorizationGate::guard(&admin, "create_group", || Ok(42));
        assert_eq!(result.unwrap(), 42);
    }
}
