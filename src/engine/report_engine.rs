// ==========================================
// 教务档案系统 - 成绩统计报表引擎
// ==========================================
// 职责: 按日期区间 + 可选过滤条件取成绩事实行，
//       按分组维度分区，计算每个分区的平均分与成绩条数
// 红线: Engine 不拼 SQL，只读不写，不缓存
// ==========================================

use crate::domain::report::{AggregationRow, GroupingKey, MarkFact, Partition, PartitionKey, ReportQuery};
use crate::repository::error::RepositoryError;
use crate::repository::report_repo::MarkFactSource;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// 报表引擎错误
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("数据不可用: {0}")]
    DataUnavailable(#[from] RepositoryError),
}

pub type ReportResult<T> = Result<T, ReportError>;

/// 分区累加器
struct Bucket {
    partition: Partition,
    sum: i64,
    count: i64,
}

// ==========================================
// ReportEngine - 报表引擎
// ==========================================
pub struct ReportEngine {
    source: Arc<dyn MarkFactSource>,
}

impl ReportEngine {
    /// 注入事实数据源（SQLite 实现或测试用内存实现）
    pub fn new(source: Arc<dyn MarkFactSource>) -> Self {
        Self { source }
    }

    /// 以字符串形式的分组维度计算平均分
    ///
    /// 未知维度返回 InvalidArgument，不返回部分结果
    pub fn compute_averages_by_name(
        &self,
        query: &ReportQuery,
        group_by: &str,
    ) -> ReportResult<Vec<AggregationRow>> {
        let key = group_by
            .parse::<GroupingKey>()
            .map_err(ReportError::InvalidArgument)?;
        self.compute_averages(query, key)
    }

    /// 计算平均分
    ///
    /// # 返回
    /// - group/subject: 按名称升序
    /// - student/teacher: 按 (姓, 名) 升序
    /// - year: 按年份数值升序
    /// - 候选集为空时返回空列表
    pub fn compute_averages(
        &self,
        query: &ReportQuery,
        group_by: GroupingKey,
    ) -> ReportResult<Vec<AggregationRow>> {
        if query.date_from > query.date_to {
            return Err(ReportError::InvalidArgument(format!(
                "起始日期 {} 晚于结束日期 {}",
                query.date_from, query.date_to
            )));
        }

        let facts = self.source.load_facts(query)?;
        let rows = aggregate(query, group_by, &facts);

        tracing::info!(
            group_by = %group_by,
            date_from = %query.date_from,
            date_to = %query.date_to,
            facts = facts.len(),
            rows = rows.len(),
            "成绩统计完成"
        );
        Ok(rows)
    }
}

/// 分区聚合
///
/// 数据源返回的行会按 query 再过滤一次，并按 mark_id 去重
fn aggregate(query: &ReportQuery, group_by: GroupingKey, facts: &[MarkFact]) -> Vec<AggregationRow> {
    let mut buckets: BTreeMap<PartitionKey, Bucket> = BTreeMap::new();
    let mut seen: HashSet<i64> = HashSet::with_capacity(facts.len());

    for fact in facts {
        if !query.matches(fact) {
            tracing::warn!(mark_id = fact.mark_id, "事实行不满足查询条件，已忽略");
            continue;
        }
        if !seen.insert(fact.mark_id) {
            tracing::warn!(mark_id = fact.mark_id, "重复的事实行，已忽略");
            continue;
        }
        let Some(partition) = group_by.partition_of(fact) else {
            continue;
        };

        let bucket = buckets
            .entry(partition.key.clone())
            .or_insert_with(|| Bucket {
                partition,
                sum: 0,
                count: 0,
            });
        bucket.sum += i64::from(fact.value);
        bucket.count += 1;
    }

    buckets
        .into_values()
        .map(|b| {
            let avg = b.sum as f64 / b.count as f64;
            group_by.make_row(b.partition, avg, b.count)
        })
        .collect()
}
