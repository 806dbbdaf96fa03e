// ==========================================
// 教务档案系统 - 引擎层
// ==========================================
// 职责: 成绩统计（过滤、分区、计数、均值、排序）
// 红线: 引擎不直接访问数据库，经 MarkFactSource 注入
// ==========================================

pub mod report_engine;

pub use report_engine::{ReportEngine, ReportError, ReportResult};
