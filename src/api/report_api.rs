// ==========================================
// 教务档案系统 - 成绩统计 API
// ==========================================
// 职责: 展示层入口 avg_marks_analysis
// 流程: 请求校验 → ReportQuery → ReportEngine → AggregationRow 列表
// ==========================================

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::validate_date_range;
use crate::config::ConfigManager;
use crate::domain::report::{AggregationRow, GroupingKey, ReportQuery};
use crate::engine::report_engine::ReportEngine;

/// 统计请求（展示层传入的纯标量/可选值）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub student_id: Option<i64>,
    #[serde(default)]
    pub subject_id: Option<i64>,
    #[serde(default)]
    pub teacher_id: Option<i64>,
    /// group / student / subject / teacher / year
    pub group_by: String,
}

impl ReportRequest {
    pub fn new(date_from: NaiveDate, date_to: NaiveDate, group_by: &str) -> Self {
        Self {
            date_from,
            date_to,
            group_id: None,
            student_id: None,
            subject_id: None,
            teacher_id: None,
            group_by: group_by.to_string(),
        }
    }

    fn to_query(&self) -> ReportQuery {
        ReportQuery {
            date_from: self.date_from,
            date_to: self.date_to,
            group_id: self.group_id,
            student_id: self.student_id,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
        }
    }
}

/// 成绩统计API
pub struct ReportApi {
    engine: Arc<ReportEngine>,
    config: Arc<ConfigManager>,
}

impl ReportApi {
    pub fn new(engine: Arc<ReportEngine>, config: Arc<ConfigManager>) -> Self {
        Self { engine, config }
    }

    /// 平均分统计（只读，任何角色可调用）
    ///
    /// # 返回
    /// - Ok(rows): 按维度排序的统计行，无数据时为空列表
    /// - Err(InvalidArgument): 维度未知或起止日期倒置
    /// - Err(DataUnavailable): 存储不可用
    pub fn avg_marks_analysis(&self, request: &ReportRequest) -> ApiResult<Vec<AggregationRow>> {
        validate_date_range(request.date_from, request.date_to)?;
        let group_by = request
            .group_by
            .parse::<GroupingKey>()
            .map_err(ApiError::InvalidArgument)?;

        let rows = self.engine.compute_averages(&request.to_query(), group_by)?;
        Ok(rows)
    }

    /// 默认统计区间: [today - N天, today]，N 取自 report.default_window_days
    pub fn default_range(&self, today: NaiveDate) -> ApiResult<(NaiveDate, NaiveDate)> {
        let days = self.config.report_window_days()?;
        let from = Duration::try_days(days)
            .and_then(|window| today.checked_sub_signed(window))
            .ok_or_else(|| ApiError::InvalidArgument(format!("时间窗过大: {}天", days)))?;
        Ok((from, today))
    }
}
