// ==========================================
// 教务档案系统 - API 层
// ==========================================
// 职责: 业务校验、权限闸门、错误归一化
// 红线: 所有写操作经过 AuthorizationGate::guard
// ==========================================

pub mod auth_api;
pub mod authorization;
pub mod error;
pub mod group_api;
pub mod mark_api;
pub mod person_api;
pub mod report_api;
pub mod subject_api;
pub mod validator;

// 重导出核心类型
pub use auth_api::{hash_password, AuthApi};
pub use authorization::{Actor, AuthorizationGate};
pub use error::{ApiError, ApiResult};
pub use group_api::GroupApi;
pub use mark_api::MarkApi;
pub use person_api::PersonApi;
pub use report_api::{ReportApi, ReportRequest};
pub use subject_api::SubjectApi;
