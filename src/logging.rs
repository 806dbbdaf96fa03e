// ==========================================
// 日志系统初始化
// ==========================================
// 使用 tracing 和 tracing-subscriber
// 优先级: RUST_LOG > 配置文件 log_filter > info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志配置（取自 AppConfig）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub filter: String,
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器，覆盖配置文件
///   例如: RUST_LOG=debug 或 RUST_LOG=academic_records=trace
///
/// # 示例
/// ```no_run
/// use academic_records::logging::{self, LogConfig};
/// logging::init(&LogConfig::default());
/// ```
pub fn init(config: &LogConfig) {
    let filter = build_filter(config);

    // 日志写到 stderr，stdout 留给命令输出
    if config.json {
        let _ = fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// 初始化测试环境的日志系统
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
