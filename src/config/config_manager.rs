// ==========================================
// 教务档案系统 - 运行期配置管理器
// ==========================================
// 存储: config_kv 表 (key-value + scope, 仅使用 global)
// 职责: 报表默认时间窗、导出分隔符等可调参数
// ==========================================

use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// 配置键
pub mod config_keys {
    /// 报表默认时间窗（天），截止日为今天
    pub const REPORT_DEFAULT_WINDOW_DAYS: &str = "report.default_window_days";
    /// CSV 导出分隔符（单个 ASCII 字符）
    pub const EXPORT_CSV_DELIMITER: &str = "export.csv_delimiter";
}

pub const DEFAULT_REPORT_WINDOW_DAYS: i64 = 30;
pub const DEFAULT_CSV_DELIMITER: u8 = b';';

const GLOBAL_SCOPE: &str = "global";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 从已有连接创建 ConfigManager
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 读取 global scope 的配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let conn = self.get_conn()?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = ?1 AND key = ?2",
                params![GLOBAL_SCOPE, key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入（覆盖）global scope 的配置值
    pub fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![GLOBAL_SCOPE, key, value],
        )?;
        tracing::debug!(key, value, "配置已更新");
        Ok(())
    }

    /// 全部 global 配置快照（按键排序）
    pub fn snapshot(&self) -> RepositoryResult<BTreeMap<String, String>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = ?1 ORDER BY key")?;
        let rows = stmt
            .query_map(params![GLOBAL_SCOPE], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;
        Ok(rows)
    }

    /// 报表默认时间窗（天）
    ///
    /// 非法值（非正整数）回退到默认值并记录告警
    pub fn report_window_days(&self) -> RepositoryResult<i64> {
        let key = config_keys::REPORT_DEFAULT_WINDOW_DAYS;
        match self.get(key)? {
            None => Ok(DEFAULT_REPORT_WINDOW_DAYS),
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(days) if days > 0 => Ok(days),
                _ => {
                    tracing::warn!(key, value = %raw, "配置值无效, 使用默认值");
                    Ok(DEFAULT_REPORT_WINDOW_DAYS)
                }
            },
        }
    }

    /// CSV 导出分隔符
    pub fn csv_delimiter(&self) -> RepositoryResult<u8> {
        let key = config_keys::EXPORT_CSV_DELIMITER;
        match self.get(key)? {
            None => Ok(DEFAULT_CSV_DELIMITER),
            Some(raw) => match raw.as_bytes() {
                [b] if b.is_ascii() && !b.is_ascii_alphanumeric() && *b != b'"' => Ok(*b),
                _ => {
                    tracing::warn!(key, value = %raw, "配置值无效, 使用默认值");
                    Ok(DEFAULT_CSV_DELIMITER)
                }
            },
        }
    }
}
