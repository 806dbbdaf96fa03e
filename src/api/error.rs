// ==========================================
// 教务档案系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型，转换Repository/引擎错误为用户可读的错误消息
// 约束: 每个错误只在触发它的调用点向上抛出一次，不重试、不吞掉
// ==========================================

use crate::engine::report_engine::ReportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 引用的实体不存在
    #[error("资源未找到: {0}")]
    NotFound(String),

    /// 参数不合法（分组维度、日期顺序、分值范围等）
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    /// 存储连接/查询失败
    #[error("数据不可用: {0}")]
    DataUnavailable(String),

    /// 非管理员尝试修改数据，或登录失败
    #[error("无权限: {0}")]
    Unauthorized(String),

    /// 唯一约束等业务规则冲突
    #[error("业务规则违反: {0}")]
    BusinessRuleViolation(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}

impl ApiError {
    /// 前端/CLI 使用的稳定错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ApiError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::BusinessRuleViolation(_) => "BUSINESS_RULE_VIOLATION",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::DatabaseTransactionError(msg) => ApiError::DataUnavailable(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DataUnavailable(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("名称已存在: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::BusinessRuleViolation(format!("外键约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidArgument(msg),
        }
    }
}

// ==========================================
// 从 ReportError 转换
// ==========================================
impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        match err {
            ReportError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            ReportError::DataUnavailable(repo_err) => match ApiError::from(repo_err) {
                ApiError::NotFound(msg) => ApiError::DataUnavailable(msg),
                other => other,
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
