// ==========================================
// 教务档案系统 - 课程
// ==========================================

use serde::{Deserialize, Serialize};

/// 课程（名称唯一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: i64,
    pub name: String,
}
