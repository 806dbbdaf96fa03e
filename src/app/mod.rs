// ==========================================
// 教务档案系统 - 应用层
// ==========================================
// 职责: 装配共享状态，提供 JSON 命令边界（CLI 使用）
// ==========================================

pub mod commands;
pub mod state;

pub use state::{get_default_db_path, AppState};
