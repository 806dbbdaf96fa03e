// ==========================================
// 教务档案系统 - 系统用户
// ==========================================

use crate::domain::types::UserRole;

/// 系统用户
///
/// password_hash 为 SHA-256 十六进制摘要，不参与序列化输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
}
