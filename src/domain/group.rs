// ==========================================
// 教务档案系统 - 学习小组
// ==========================================

use serde::{Deserialize, Serialize};

/// 学习小组（名称唯一）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
}
