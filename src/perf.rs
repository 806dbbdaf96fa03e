// ==========================================
// 教务档案系统 - 性能观测
// ==========================================
// 慢 SQL: rusqlite profile 回调，超过阈值记 warn（target: slow_sql）
// 命令耗时: PerfGuard 在 drop 时记 debug（target: perf）
// ==========================================

use rusqlite::Connection;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// 慢 SQL 阈值（毫秒），0 表示关闭
pub const SLOW_SQL_ENV: &str = "ACADEMIC_RECORDS_SLOW_SQL_MS";

const DEFAULT_SLOW_SQL_MS: u64 = 200;
const MAX_LOGGED_SQL_CHARS: usize = 300;

static SLOW_SQL_THRESHOLD_MS: AtomicU64 = AtomicU64::new(DEFAULT_SLOW_SQL_MS);

fn threshold_from_env() -> u64 {
    std::env::var(SLOW_SQL_ENV)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_SLOW_SQL_MS)
}

/// 为连接安装慢 SQL 日志
pub fn install_slow_sql_log(conn: &mut Connection) {
    let threshold = threshold_from_env();
    SLOW_SQL_THRESHOLD_MS.store(threshold, Ordering::Relaxed);

    if threshold == 0 {
        conn.profile(None);
        return;
    }
    conn.profile(Some(on_statement_profiled));
}

fn on_statement_profiled(sql: &str, duration: Duration) {
    let elapsed_ms = duration.as_millis() as u64;
    if elapsed_ms < SLOW_SQL_THRESHOLD_MS.load(Ordering::Relaxed) {
        return;
    }
    tracing::warn!(
        target: "slow_sql",
        elapsed_ms,
        sql = %compact_sql(sql),
        "slow sql"
    );
}

/// 折叠空白并截断，便于单行日志
fn compact_sql(sql: &str) -> String {
    let folded = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if folded.chars().count() <= MAX_LOGGED_SQL_CHARS {
        return folded;
    }
    let mut short: String = folded.chars().take(MAX_LOGGED_SQL_CHARS).collect();
    short.push('…');
    short
}

/// 命令耗时 Guard
///
/// ```ignore
/// let _perf = academic_records::perf::PerfGuard::new("cmd.avg_marks_analysis");
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        Self {
            op,
            start: Instant::now(),
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        tracing::debug!(target: "perf", op = self.op, elapsed_ms, "done");
    }
}
