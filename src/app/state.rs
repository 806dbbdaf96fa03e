// ==========================================
// 教务档案系统 - 应用状态
// ==========================================
// 职责: 打开共享连接、初始化 schema、装配 Repository/Engine/API
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::api::{AuthApi, GroupApi, MarkApi, PersonApi, ReportApi, SubjectApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::engine::ReportEngine;
use crate::repository::{
    GroupRepository, MarkRepository, PersonRepository, SqliteMarkFactSource, SubjectRepository,
    UserRepository,
};

pub use crate::config::get_default_db_path;

/// 应用状态
///
/// 所有 API 共享同一个 Arc<Mutex<Connection>>
pub struct AppState {
    /// 数据库路径（内存库为 ":memory:"）
    pub db_path: String,

    pub group_api: Arc<GroupApi>,
    pub subject_api: Arc<SubjectApi>,
    pub person_api: Arc<PersonApi>,
    pub mark_api: Arc<MarkApi>,
    pub report_api: Arc<ReportApi>,
    pub auth_api: Arc<AuthApi>,

    /// 运行期配置（导出分隔符等）
    pub config: Arc<ConfigManager>,
}

impl AppState {
    /// 打开数据库文件并装配应用状态
    ///
    /// # 返回
    /// - Err(String): 数据库无法打开或 schema 初始化失败
    pub fn new(db_path: &str) -> Result<Self, String> {
        tracing::info!(db_path, "初始化AppState");

        let mut conn =
            open_sqlite_connection(db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::perf::install_slow_sql_log(&mut conn);
        init_schema(&conn).map_err(|e| format!("schema 初始化失败: {}", e))?;

        Ok(Self::assemble(db_path, Arc::new(Mutex::new(conn))))
    }

    /// 从已初始化 schema 的连接装配（测试使用内存库）
    pub fn from_connection(conn: Connection) -> Self {
        Self::assemble(":memory:", Arc::new(Mutex::new(conn)))
    }

    fn assemble(db_path: &str, conn: Arc<Mutex<Connection>>) -> Self {
        // ==========================================
        // Repository 层
        // ==========================================
        let group_repo = Arc::new(GroupRepository::new(conn.clone()));
        let subject_repo = Arc::new(SubjectRepository::new(conn.clone()));
        let person_repo = Arc::new(PersonRepository::new(conn.clone()));
        let mark_repo = Arc::new(MarkRepository::new(conn.clone()));
        let user_repo = Arc::new(UserRepository::new(conn.clone()));
        let config = Arc::new(ConfigManager::new(conn.clone()));

        // ==========================================
        // Engine 层
        // ==========================================
        let fact_source = Arc::new(SqliteMarkFactSource::new(conn));
        let report_engine = Arc::new(ReportEngine::new(fact_source));

        // ==========================================
        // API 层
        // ==========================================
        Self {
            db_path: db_path.to_string(),
            group_api: Arc::new(GroupApi::new(group_repo.clone())),
            subject_api: Arc::new(SubjectApi::new(subject_repo)),
            person_api: Arc::new(PersonApi::new(person_repo, group_repo)),
            mark_api: Arc::new(MarkApi::new(mark_repo)),
            report_api: Arc::new(ReportApi::new(report_engine, config.clone())),
            auth_api: Arc::new(AuthApi::new(user_repo)),
            config,
        }
    }
}
