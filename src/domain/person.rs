// ==========================================
// 教务档案系统 - 人员（学生/教师）
// ==========================================
// 约束: 教师不归属任何小组; 学生可以暂不分组
// ==========================================

use crate::domain::types::PersonKind;
use serde::{Deserialize, Serialize};

/// 人员实体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub kind: PersonKind,
    pub group_id: Option<i64>,
}

impl Person {
    /// 报表用短名: "姓 名"（不含父称）
    pub fn short_name(&self) -> String {
        short_name(&self.last_name, &self.first_name)
    }

    /// 全名: "姓 名 父称"，缺失部分跳过
    pub fn full_name(&self) -> String {
        full_name(&self.last_name, &self.first_name, self.father_name.as_deref())
    }
}

/// 新建/更新人员时提交的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub father_name: Option<String>,
    pub kind: PersonKind,
    #[serde(default)]
    pub group_id: Option<i64>,
}

impl PersonDraft {
    /// 去除首尾空白，空父称视为缺失
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            father_name: self
                .father_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            kind: self.kind,
            group_id: self.group_id,
        }
    }
}

/// 人员列表行（附带小组名称）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonView {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub father_name: Option<String>,
    pub kind: PersonKind,
    pub group_id: Option<i64>,
    pub group_name: Option<String>,
}

pub(crate) fn short_name(last_name: &str, first_name: &str) -> String {
    format!("{} {}", last_name, first_name)
}

pub(crate) fn full_name(last_name: &str, first_name: &str, father_name: Option<&str>) -> String {
    [Some(last_name), Some(first_name), father_name]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
