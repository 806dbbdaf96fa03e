// ==========================================
// 教务档案系统 - 小组数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 删除语义: people.group_id 由外键 ON DELETE SET NULL 置空
// ==========================================

use crate::domain::group::Group;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 小组仓储
/// 职责: 管理 groups 表的 CRUD 操作
pub struct GroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GroupRepository {
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

    /// 查询全部小组（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Group>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM groups ORDER BY name, id")?;
        let groups = stmt
            .query_map([], |row| {
                Ok(Group {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Group>>>()?;
        Ok(groups)
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Group>> {
        let conn = self.get_conn()?;
        let group = conn
            .query_row(
                "SELECT id, name FROM groups WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Group {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(group)
    }

    /// 新建小组，返回新ID
    pub fn insert(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO groups (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 重命名小组
    ///
    /// # 返回
    /// - Err(NotFound): 小组不存在
    pub fn update(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE groups SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Group", id));
        }
        Ok(())
    }

    /// 删除小组（成员的 group_id 置空，不删除人员）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM groups WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Group", id));
        }
        Ok(())
    }
}
