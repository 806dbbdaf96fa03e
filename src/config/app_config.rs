// ==========================================
// 教务档案系统 - 启动配置
// ==========================================
// 格式: JSON 文件，例如
// {
//   "db_path": "/var/lib/academic-records/records.db",
//   "locale": "zh-CN",
//   "log_filter": "info,academic_records=debug",
//   "log_json": false
// }
// ==========================================

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "ACADEMIC_RECORDS_DB_PATH";

/// 启动配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置项无效: {0}")]
    Invalid(String),
}

/// 启动配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库文件路径（缺省时使用 get_default_db_path）
    #[serde(default = "get_default_db_path")]
    pub db_path: String,

    /// 界面语言（zh-CN / en）
    #[serde(default = "default_locale")]
    pub locale: String,

    /// 日志过滤器（RUST_LOG 优先）
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// 是否输出 JSON 格式日志
    #[serde(default)]
    pub log_json: bool,
}

fn default_locale() -> String {
    "zh-CN".to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: get_default_db_path(),
            locale: default_locale(),
            log_filter: default_log_filter(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载并校验
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: AppConfig =
            serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: display,
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_path.trim().is_empty() {
            return Err(ConfigError::Invalid("db_path 不能为空".to_string()));
        }
        self.ui_locale()?;
        Ok(())
    }

    /// 解析界面语言
    pub fn ui_locale(&self) -> Result<Locale, ConfigError> {
        self.locale.parse::<Locale>().map_err(ConfigError::Invalid)
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./academic_records.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("academic-records");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("academic_records.db");
        }
    }

    path.to_string_lossy().to_string()
}
