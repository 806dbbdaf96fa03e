// ==========================================
// 教务档案系统 - 系统用户数据仓储
// ==========================================

use crate::domain::types::UserRole;
use crate::domain::user::AppUser;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex};

/// 用户仓储
/// 职责: 管理 app_users 表
pub struct UserRepository {
    conn: Arc<Mutex<Connection>>,
}

impl UserRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 按用户名查询
    pub fn find_by_username(&self, username: &str) -> RepositoryResult<Option<AppUser>> {
        let conn = self.get_conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, role FROM app_users WHERE username = ?1",
                params![username],
                |row| {
                    let role: String = row.get(3)?;
                    let role = role.parse::<UserRole>().map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(3, Type::Text, e.into())
                    })?;
                    Ok(AppUser {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        role,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// 新建用户，返回新ID
    pub fn insert(&self, username: &str, password_hash: &str, role: UserRole) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO app_users (username, password_hash, role) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role.as_str()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 用户总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM app_users", [], |row| row.get(0))?;
        Ok(n)
    }
}
