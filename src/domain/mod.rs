// ==========================================
// 教务档案系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、报表投影
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod group;
pub mod mark;
pub mod person;
pub mod report;
pub mod subject;
pub mod types;
pub mod user;

// 重导出核心类型
pub use group::Group;
pub use mark::{Mark, MarkDraft, MarkView, MARK_VALUE_MAX, MARK_VALUE_MIN};
pub use person::{Person, PersonDraft, PersonView};
pub use report::{AggregationRow, GroupingKey, MarkFact, ReportQuery};
pub use subject::Subject;
pub use types::{PersonKind, UserRole};
pub use user::AppUser;
