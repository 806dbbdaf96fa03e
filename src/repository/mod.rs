// ==========================================
// 教务档案系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod group_repo;
pub mod mark_repo;
pub mod person_repo;
pub mod report_repo;
pub mod sql_builder;
pub mod subject_repo;
pub mod user_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use group_repo::GroupRepository;
pub use mark_repo::MarkRepository;
pub use person_repo::PersonRepository;
pub use report_repo::{MarkFactSource, SqliteMarkFactSource};
pub use subject_repo::SubjectRepository;
pub use user_repo::UserRepository;
