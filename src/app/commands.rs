// ==========================================
// 教务档案系统 - 展示层命令
// ==========================================
// 约定: 入参为标量/JSON 字符串，出参为 JSON 字符串
// 错误: ApiError 在此处一次性转换为 {code, message} JSON
// ==========================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::authorization::{Actor, AuthorizationGate};
use crate::api::error::ApiError;
use crate::api::report_api::ReportRequest;
use crate::app::state::AppState;
use crate::domain::mark::MarkDraft;
use crate::domain::person::PersonDraft;
use crate::domain::report::{AggregationRow, GroupingKey};
use crate::export::{self, ExportError, ExportFormat};
use crate::perf::PerfGuard;

/// 错误响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 错误代码
    pub code: String,

    /// 错误消息
    pub message: String,
}

/// 将ApiError转换为JSON字符串
pub fn map_api_error(err: ApiError) -> String {
    let response = ErrorResponse {
        code: err.code().to_string(),
        message: err.to_string(),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| err.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("序列化失败: {}", e))
}

fn from_json<'a, T: Deserialize<'a>>(field: &str, raw: &'a str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| {
        map_api_error(ApiError::InvalidArgument(format!("{}格式错误: {}", field, e)))
    })
}

/// 会话信息（展示层据此决定是否渲染编辑控件）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub actor: Actor,
    pub can_mutate: bool,
}

// ==========================================
// 登录
// ==========================================

pub fn login(state: &AppState, username: &str, password: &str) -> Result<String, String> {
    let actor = state
        .auth_api
        .login(username, password)
        .map_err(map_api_error)?;
    let can_mutate = AuthorizationGate::can_mutate(actor.role);
    to_json(&SessionInfo { actor, can_mutate })
}

// ==========================================
// 登记簿查询（任何角色）
// ==========================================

pub fn list_groups(state: &AppState) -> Result<String, String> {
    to_json(&state.group_api.list_groups().map_err(map_api_error)?)
}

pub fn list_subjects(state: &AppState) -> Result<String, String> {
    to_json(&state.subject_api.list_subjects().map_err(map_api_error)?)
}

pub fn list_people(state: &AppState) -> Result<String, String> {
    to_json(&state.person_api.list_people().map_err(map_api_error)?)
}

pub fn list_students(state: &AppState) -> Result<String, String> {
    to_json(&state.person_api.list_students().map_err(map_api_error)?)
}

pub fn list_teachers(state: &AppState) -> Result<String, String> {
    to_json(&state.person_api.list_teachers().map_err(map_api_error)?)
}

pub fn list_marks(state: &AppState) -> Result<String, String> {
    to_json(&state.mark_api.list_marks().map_err(map_api_error)?)
}

// ==========================================
// 登记簿维护（仅管理员）
// ==========================================

pub fn create_group(state: &AppState, actor: &Actor, name: &str) -> Result<String, String> {
    let id = state
        .group_api
        .create_group(actor, name)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "id": id }))
}

pub fn update_group(
    state: &AppState,
    actor: &Actor,
    group_id: i64,
    name: &str,
) -> Result<String, String> {
    state
        .group_api
        .update_group(actor, group_id, name)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "updated": group_id }))
}

pub fn delete_group(state: &AppState, actor: &Actor, group_id: i64) -> Result<String, String> {
    state
        .group_api
        .delete_group(actor, group_id)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "deleted": group_id }))
}

pub fn create_subject(state: &AppState, actor: &Actor, name: &str) -> Result<String, String> {
    let id = state
        .subject_api
        .create_subject(actor, name)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "id": id }))
}

pub fn update_subject(
    state: &AppState,
    actor: &Actor,
    subject_id: i64,
    name: &str,
) -> Result<String, String> {
    state
        .subject_api
        .update_subject(actor, subject_id, name)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "updated": subject_id }))
}

pub fn delete_subject(state: &AppState, actor: &Actor, subject_id: i64) -> Result<String, String> {
    state
        .subject_api
        .delete_subject(actor, subject_id)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "deleted": subject_id }))
}

/// 新建人员（draft 为 PersonDraft JSON）
pub fn create_person(state: &AppState, actor: &Actor, draft_json: &str) -> Result<String, String> {
    let draft: PersonDraft = from_json("人员", draft_json)?;
    let id = state
        .person_api
        .create_person(actor, &draft)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "id": id }))
}

/// 更新人员（draft 为 PersonDraft JSON）
pub fn update_person(
    state: &AppState,
    actor: &Actor,
    person_id: i64,
    draft_json: &str,
) -> Result<String, String> {
    let draft: PersonDraft = from_json("人员", draft_json)?;
    state
        .person_api
        .update_person(actor, person_id, &draft)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "updated": person_id }))
}

pub fn delete_person(state: &AppState, actor: &Actor, person_id: i64) -> Result<String, String> {
    state
        .person_api
        .delete_person(actor, person_id)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "deleted": person_id }))
}

/// 新建成绩（draft 为 MarkDraft JSON）
pub fn create_mark(state: &AppState, actor: &Actor, draft_json: &str) -> Result<String, String> {
    let draft: MarkDraft = from_json("成绩", draft_json)?;
    let id = state
        .mark_api
        .create_mark(actor, &draft)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "id": id }))
}

/// 修改成绩（draft 为 MarkDraft JSON）
pub fn update_mark(
    state: &AppState,
    actor: &Actor,
    mark_id: i64,
    draft_json: &str,
) -> Result<String, String> {
    let draft: MarkDraft = from_json("成绩", draft_json)?;
    state
        .mark_api
        .update_mark(actor, mark_id, &draft)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "updated": mark_id }))
}

pub fn delete_mark(state: &AppState, actor: &Actor, mark_id: i64) -> Result<String, String> {
    state
        .mark_api
        .delete_mark(actor, mark_id)
        .map_err(map_api_error)?;
    to_json(&serde_json::json!({ "deleted": mark_id }))
}

// ==========================================
// 成绩统计
// ==========================================

/// 平均分统计（request 为 ReportRequest JSON），返回行列表 JSON
pub fn avg_marks_analysis(state: &AppState, request_json: &str) -> Result<String, String> {
    let _perf = PerfGuard::new("cmd.avg_marks_analysis");
    let request: ReportRequest = from_json("统计请求", request_json)?;
    let rows = state
        .report_api
        .avg_marks_analysis(&request)
        .map_err(map_api_error)?;
    to_json(&rows)
}

/// 渲染后的报表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReport {
    pub content: String,
    pub row_count: usize,
}

/// 统计并按格式渲染（json / txt / csv）
pub fn export_report(
    state: &AppState,
    request: &ReportRequest,
    format: &str,
) -> Result<RenderedReport, String> {
    let _perf = PerfGuard::new("cmd.export_report");
    let prepared = prepare_export(state, request, format)?;
    let content = export::render(
        prepared.format,
        prepared.group_by,
        &prepared.rows,
        prepared.delimiter,
    )
    .map_err(map_export_error)?;
    Ok(RenderedReport {
        content,
        row_count: prepared.rows.len(),
    })
}

/// 统计并写入文件，返回行数
pub fn export_report_to_file(
    state: &AppState,
    request: &ReportRequest,
    format: &str,
    path: &Path,
) -> Result<usize, String> {
    let _perf = PerfGuard::new("cmd.export_report_to_file");
    let prepared = prepare_export(state, request, format)?;
    export::write_to_path(
        path,
        prepared.format,
        prepared.group_by,
        &prepared.rows,
        prepared.delimiter,
    )
    .map_err(map_export_error)?;
    Ok(prepared.rows.len())
}

struct PreparedExport {
    format: ExportFormat,
    group_by: GroupingKey,
    rows: Vec<AggregationRow>,
    delimiter: u8,
}

fn prepare_export(
    state: &AppState,
    request: &ReportRequest,
    format: &str,
) -> Result<PreparedExport, String> {
    let format = format
        .parse::<ExportFormat>()
        .map_err(|e| map_api_error(ApiError::InvalidArgument(e.to_string())))?;
    let rows = state
        .report_api
        .avg_marks_analysis(request)
        .map_err(map_api_error)?;
    // 维度已在 avg_marks_analysis 中校验
    let group_by = request
        .group_by
        .parse::<GroupingKey>()
        .map_err(|e| map_api_error(ApiError::InvalidArgument(e)))?;
    let delimiter = state
        .config
        .csv_delimiter()
        .map_err(|e| map_api_error(e.into()))?;
    Ok(PreparedExport {
        format,
        group_by,
        rows,
        delimiter,
    })
}

fn map_export_error(err: ExportError) -> String {
    match err {
        ExportError::Io(e) => map_api_error(ApiError::DataUnavailable(e.to_string())),
        other => map_api_error(ApiError::InternalError(other.to_string())),
    }
}
