// ==========================================
// 教务档案系统 - 登录与账户 API
// ==========================================
// 口令存储: SHA-256 十六进制摘要
// ==========================================

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_name;
use crate::domain::types::UserRole;
use crate::repository::user_repo::UserRepository;

/// 计算口令摘要
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// 登录与账户API
pub struct AuthApi {
    user_repo: Arc<UserRepository>,
}

impl AuthApi {
    pub fn new(user_repo: Arc<UserRepository>) -> Self {
        Self { user_repo }
    }

    /// 登录
    ///
    /// # 返回
    /// - Ok(Actor): 已认证的操作者
    /// - Err(Unauthorized): 用户不存在或口令错误（不区分两种情况）
    pub fn login(&self, username: &str, password: &str) -> ApiResult<Actor> {
        let username = username.trim();
        let user = self.user_repo.find_by_username(username)?;
        match user {
            Some(user) if user.password_hash == hash_password(password) => {
                tracing::info!(user = %user.username, role = %user.role, "登录成功");
                Ok(Actor::new(user.id, &user.username, user.role))
            }
            _ => {
                tracing::warn!(user = %username, "登录失败");
                Err(ApiError::Unauthorized("用户名或密码错误".to_string()))
            }
        }
    }

    /// 新建账户（仅管理员）
    pub fn create_user(
        &self,
        actor: &Actor,
        username: &str,
        password: &str,
        role: UserRole,
    ) -> ApiResult<i64> {
        AuthorizationGate::guard(actor, "create_user", || {
            let username = require_name("用户名", username)?;
            if password.is_empty() {
                return Err(ApiError::InvalidArgument("密码不能为空".to_string()));
            }
            Ok(self.user_repo.insert(&username, &hash_password(password), role)?)
        })
    }

    /// 初始化管理员账户
    ///
    /// # 返回
    /// - Some(id): 库中无任何账户，已创建管理员
    /// - None: 已存在账户，未做任何修改
    pub fn bootstrap_admin(&self, username: &str, password: &str) -> ApiResult<Option<i64>> {
        if self.user_repo.count()? > 0 {
            return Ok(None);
        }
        let username = require_name("用户名", username)?;
        if password.is_empty() {
            return Err(ApiError::InvalidArgument("密码不能为空".to_string()));
        }
        let id = self
            .user_repo
            .insert(&username, &hash_password(password), UserRole::Admin)?;
        tracing::info!(user = %username, "已创建初始管理员");
        Ok(Some(id))
    }
}
