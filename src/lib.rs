// ==========================================
// 教务档案系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 教务办公室登记簿 + 成绩统计报表
// 权限模型: admin 读写 / user 只读
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 成绩统计
pub mod engine;

// 配置层 - 启动配置与运行期配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/schema）
pub mod db;

// 日志系统
pub mod logging;

// 性能观测（慢 SQL / 命令耗时）
pub mod perf;

// 国际化
pub mod i18n;

// API 层 - 业务接口与权限闸门
pub mod api;

// 报表导出（TXT / CSV）
pub mod export;

// 应用层 - 状态装配与命令边界
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{PersonKind, UserRole};

// 领域实体与报表投影
pub use domain::{
    AggregationRow, AppUser, Group, GroupingKey, Mark, MarkDraft, MarkFact, Person, PersonDraft,
    ReportQuery, Subject,
};

// 引擎
pub use engine::ReportEngine;

// API
pub use api::{
    Actor, ApiError, AuthApi, AuthorizationGate, GroupApi, MarkApi, PersonApi, ReportApi,
    ReportRequest, SubjectApi,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "教务档案系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
