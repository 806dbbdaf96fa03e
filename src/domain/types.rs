// ==========================================
// 教务档案系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 人员类型 (Person Kind)
// ==========================================
// 存储格式: 单字符代码 ('S' 学生 / 'P' 教师)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonKind {
    Student,
    Teacher,
}

impl PersonKind {
    /// 数据库中的单字符代码
    pub fn code(&self) -> &'static str {
        match self {
            PersonKind::Student => "S",
            PersonKind::Teacher => "P",
        }
    }

    /// 从数据库代码解析
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "S" => Some(PersonKind::Student),
            "P" => Some(PersonKind::Teacher),
            _ => None,
        }
    }
}

impl fmt::Display for PersonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonKind::Student => write!(f, "STUDENT"),
            PersonKind::Teacher => write!(f, "TEACHER"),
        }
    }
}

impl FromStr for PersonKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(kind) = PersonKind::from_code(raw) {
            return Ok(kind);
        }
        match raw.to_ascii_lowercase().as_str() {
            "student" => Ok(PersonKind::Student),
            "teacher" => Ok(PersonKind::Teacher),
            _ => Err(format!("未知的人员类型: {}", raw)),
        }
    }
}

// ==========================================
// 用户角色 (User Role)
// ==========================================
// 二元角色: admin 可写, user 只读
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    User,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::User => "user",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "user" => Ok(UserRole::User),
            other => Err(format!("未知的用户角色: {}", other)),
        }
    }
}
