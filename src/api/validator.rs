// ==========================================
// 教务档案系统 - 输入校验
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::mark::{MARK_VALUE_MAX, MARK_VALUE_MIN};
use chrono::NaiveDate;

/// 名称类字段: 去除首尾空白后不能为空
pub fn require_name(field: &str, value: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidArgument(format!("{}不能为空", field)));
    }
    Ok(trimmed.to_string())
}

/// 成绩分值必须在 2..=5
pub fn validate_mark_value(value: i32) -> ApiResult<()> {
    if (MARK_VALUE_MIN..=MARK_VALUE_MAX).contains(&value) {
        Ok(())
    } else {
        Err(ApiError::InvalidArgument(format!(
            "成绩必须在 {}..={} 之间 (实际: {})",
            MARK_VALUE_MIN, MARK_VALUE_MAX, value
        )))
    }
}

/// 起始日期不能晚于结束日期
pub fn validate_date_range(date_from: NaiveDate, date_to: NaiveDate) -> ApiResult<()> {
    if date_from > date_to {
        return Err(ApiError::InvalidArgument(format!(
            "起始日期 {} 不能晚于结束日期 {}",
            date_from, date_to
        )));
    }
    Ok(())
}

/// 解析 YYYY-MM-DD
pub fn parse_date(field: &str, raw: &str) -> ApiResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| {
        ApiError::InvalidArgument(format!("{}日期格式错误（应为YYYY-MM-DD）: {}", field, e))
    })
}
