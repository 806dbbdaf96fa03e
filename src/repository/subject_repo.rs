// ==========================================
// 教务档案系统 - 课程数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 删除语义: 该课程的成绩由外键 ON DELETE CASCADE 级联删除
// ==========================================

use crate::domain::subject::Subject;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 课程仓储
/// 职责: 管理 subjects 表的 CRUD 操作
pub struct SubjectRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubjectRepository {
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

    /// 查询全部课程（按名称排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Subject>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare("SELECT id, name FROM subjects ORDER BY name, id")?;
        let subjects = stmt
            .query_map([], |row| {
                Ok(Subject {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<SqliteResult<Vec<Subject>>>()?;
        Ok(subjects)
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Subject>> {
        let conn = self.get_conn()?;
        let subject = conn
            .query_row(
                "SELECT id, name FROM subjects WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Subject {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(subject)
    }

    /// 新建课程，返回新ID
    pub fn insert(&self, name: &str) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute("INSERT INTO subjects (name) VALUES (?1)", params![name])?;
        Ok(conn.last_insert_rowid())
    }

    /// 重命名课程
    ///
    /// # 返回
    /// - Err(NotFound): 课程不存在
    pub fn update(&self, id: i64, name: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "UPDATE subjects SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Subject", id));
        }
        Ok(())
    }

    /// 删除课程（级联删除其成绩）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Subject", id));
        }
        Ok(())
    }
}
