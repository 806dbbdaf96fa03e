// ==========================================
// 教务档案系统 - 配置层
// ==========================================
// 职责:
// - AppConfig: 启动配置（JSON 文件: 数据库路径、语言、日志）
// - ConfigManager: 运行期配置（config_kv 表, global scope）
// ==========================================

pub mod app_config;
pub mod config_manager;

// 重导出核心配置
pub use app_config::{get_default_db_path, AppConfig, ConfigError};
pub use config_manager::{config_keys, ConfigManager};
