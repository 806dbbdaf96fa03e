// ==========================================
// 教务档案系统 - 命令行入口
// ==========================================
// 用法: academic-records <config.json> <command> [args…]
// 凭据: ACADEMIC_RECORDS_USER / ACADEMIC_RECORDS_PASSWORD
// 输出: 结果写 stdout，日志写 stderr
// ==========================================

use std::path::Path;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDate};

use academic_records::api::authorization::{Actor, AuthorizationGate};
use academic_records::api::report_api::ReportRequest;
use academic_records::api::validator;
use academic_records::app::{commands, AppState};
use academic_records::config::AppConfig;
use academic_records::i18n::{self, t, t_with_args};
use academic_records::logging::{self, LogConfig};

const USER_ENV: &str = "ACADEMIC_RECORDS_USER";
const PASSWORD_ENV: &str = "ACADEMIC_RECORDS_PASSWORD";

const MAINTENANCE_COMMANDS: &[&str] = &[
    "group-add",
    "group-rename",
    "group-rm",
    "subject-add",
    "subject-rename",
    "subject-rm",
    "person-add",
    "person-update",
    "person-rm",
    "mark-add",
    "mark-update",
    "mark-rm",
];

const USAGE: &str = "\
用法: academic-records <config.json> <command> [args…]

命令:
  init-db                        初始化数据库；无账户时用环境变量凭据创建管理员
  login                          校验凭据并输出会话信息
  groups | subjects | people | students | teachers | marks
                                 列出登记簿
  group-add <name> | group-rename <id> <name> | group-rm <id>
  subject-add <name> | subject-rename <id> <name> | subject-rm <id>
  person-add <json> | person-update <id> <json> | person-rm <id>
  mark-add <json> | mark-update <id> <json> | mark-rm <id>
                                 维护登记簿与成绩册（仅管理员）
                                 person json: {\"first_name\",\"last_name\",\"father_name\",\"kind\":\"STUDENT|TEACHER\",\"group_id\"}
                                 mark json: {\"student_id\",\"subject_id\",\"teacher_id\",\"value\",\"mark_date\"}
  report <group|student|subject|teacher|year>
         [--from YYYY-MM-DD] [--to YYYY-MM-DD]
         [--group ID] [--student ID] [--subject ID] [--teacher ID]
         [--format json|txt|csv] [--out PATH]
                                 平均分统计（缺省区间为最近 N 天）
  config-list                    列出运行期配置
  config-get <key>               读取运行期配置
  config-set <key> <value>       写入运行期配置（仅管理员）";

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 2 || args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = AppConfig::load(&args[0])?;
    logging::init(&LogConfig {
        filter: config.log_filter.clone(),
        json: config.log_json,
    });
    i18n::set_locale(config.ui_locale()?);

    tracing::info!(
        version = academic_records::VERSION,
        db_path = %config.db_path,
        "{} 启动",
        academic_records::APP_NAME
    );

    let state = AppState::new(&config.db_path).map_err(|e| anyhow!(e))?;
    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "init-db" => init_db(&state),
        "login" => {
            let (user, password) = credentials()?;
            println!("{}", commands::login(&state, &user, &password).map_err(|e| anyhow!(e))?);
            Ok(())
        }
        "groups" | "subjects" | "people" | "students" | "teachers" | "marks" => {
            authenticate(&state)?;
            let out = match command {
                "groups" => commands::list_groups(&state),
                "subjects" => commands::list_subjects(&state),
                "people" => commands::list_people(&state),
                "students" => commands::list_students(&state),
                "teachers" => commands::list_teachers(&state),
                _ => commands::list_marks(&state),
            }
            .map_err(|e| anyhow!(e))?;
            println!("{}", out);
            Ok(())
        }
        cmd if MAINTENANCE_COMMANDS.contains(&cmd) => {
            let actor = authenticate(&state)?;
            println!("{}", maintain(&state, &actor, cmd, rest)?);
            Ok(())
        }
        "report" => report(&state, rest),
        "config-list" => {
            authenticate(&state)?;
            println!("{}", serde_json::to_string_pretty(&state.config.snapshot()?)?);
            Ok(())
        }
        "config-get" => {
            authenticate(&state)?;
            let key = rest.first().context("缺少配置键")?;
            let value = state.config.get(key)?;
            println!("{}", value.unwrap_or_default());
            Ok(())
        }
        "config-set" => {
            let actor = authenticate(&state)?;
            let (key, value) = match rest {
                [key, value, ..] => (key, value),
                _ => bail!("用法: config-set <key> <value>"),
            };
            AuthorizationGate::guard(&actor, "config_set", || Ok(state.config.set(key, value)?))
                .map_err(|e| anyhow!(commands::map_api_error(e)))?;
            println!("{}", t("common.success"));
            Ok(())
        }
        other => bail!("未知命令: {}\n\n{}", other, USAGE),
    }
}

/// 登记簿/成绩册写操作，统一经 API 层授权
fn maintain(state: &AppState, actor: &Actor, command: &str, rest: &[String]) -> anyhow::Result<String> {
    let out = match (command, rest) {
        ("group-add", [name, ..]) => commands::create_group(state, actor, name),
        ("group-rename", [id, name, ..]) => {
            commands::update_group(state, actor, parse_id("id", id)?, name)
        }
        ("group-rm", [id, ..]) => commands::delete_group(state, actor, parse_id("id", id)?),
        ("subject-add", [name, ..]) => commands::create_subject(state, actor, name),
        ("subject-rename", [id, name, ..]) => {
            commands::update_subject(state, actor, parse_id("id", id)?, name)
        }
        ("subject-rm", [id, ..]) => commands::delete_subject(state, actor, parse_id("id", id)?),
        ("person-add", [json, ..]) => commands::create_person(state, actor, json),
        ("person-update", [id, json, ..]) => {
            commands::update_person(state, actor, parse_id("id", id)?, json)
        }
        ("person-rm", [id, ..]) => commands::delete_person(state, actor, parse_id("id", id)?),
        ("mark-add", [json, ..]) => commands::create_mark(state, actor, json),
        ("mark-update", [id, json, ..]) => {
            commands::update_mark(state, actor, parse_id("id", id)?, json)
        }
        ("mark-rm", [id, ..]) => commands::delete_mark(state, actor, parse_id("id", id)?),
        _ => bail!("{} 参数不足\n\n{}", command, USAGE),
    };
    out.map_err(|e| anyhow!(e))
}

fn credentials() -> anyhow::Result<(String, String)> {
    match (std::env::var(USER_ENV), std::env::var(PASSWORD_ENV)) {
        (Ok(user), Ok(password)) if !user.trim().is_empty() => Ok((user, password)),
        _ => bail!(t("auth.missing_credentials")),
    }
}

fn authenticate(state: &AppState) -> anyhow::Result<Actor> {
    let (user, password) = credentials()?;
    let actor = state
        .auth_api
        .login(&user, &password)
        .map_err(|e| anyhow!(commands::map_api_error(e)))?;
    if !AuthorizationGate::can_mutate(actor.role) {
        eprintln!("{}", t_with_args("auth.read_only", &[("user", &actor.username)]));
    }
    Ok(actor)
}

fn init_db(state: &AppState) -> anyhow::Result<()> {
    println!(
        "{}",
        t_with_args(
            "db.initialized",
            &[
                ("path", &state.db_path),
                ("version", &academic_records::db::CURRENT_SCHEMA_VERSION.to_string()),
            ],
        )
    );

    let Ok((user, password)) = credentials() else {
        return Ok(());
    };
    let created = state
        .auth_api
        .bootstrap_admin(&user, &password)
        .map_err(|e| anyhow!(commands::map_api_error(e)))?;
    match created {
        Some(_) => println!("{}", t_with_args("auth.bootstrap_done", &[("user", &user)])),
        None => println!("{}", t("auth.bootstrap_skipped")),
    }
    Ok(())
}

/// report 子命令参数
struct ReportArgs {
    request: ReportRequest,
    format: String,
    out: Option<String>,
}

fn parse_report_args(state: &AppState, rest: &[String], today: NaiveDate) -> anyhow::Result<ReportArgs> {
    let group_by = rest.first().context("缺少分组维度")?;
    let mut date_from: Option<NaiveDate> = None;
    let mut date_to: Option<NaiveDate> = None;
    let mut request = ReportRequest::new(today, today, group_by);
    let mut format = "json".to_string();
    let mut out = None;

    let mut iter = rest[1..].iter();
    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .with_context(|| format!("参数 {} 缺少取值", flag))?;
        match flag.as_str() {
            "--from" => date_from = Some(parse_date("起始", value)?),
            "--to" => date_to = Some(parse_date("结束", value)?),
            "--group" => request.group_id = Some(parse_id(flag, value)?),
            "--student" => request.student_id = Some(parse_id(flag, value)?),
            "--subject" => request.subject_id = Some(parse_id(flag, value)?),
            "--teacher" => request.teacher_id = Some(parse_id(flag, value)?),
            "--format" => format = value.clone(),
            "--out" => out = Some(value.clone()),
            other => bail!("未知参数: {}", other),
        }
    }

    let (default_from, default_to) = state
        .report_api
        .default_range(today)
        .map_err(|e| anyhow!(commands::map_api_error(e)))?;
    request.date_from = date_from.unwrap_or(default_from);
    request.date_to = date_to.unwrap_or(default_to);

    Ok(ReportArgs { request, format, out })
}

fn report(state: &AppState, rest: &[String]) -> anyhow::Result<()> {
    authenticate(state)?;
    let args = parse_report_args(state, rest, Local::now().date_naive())?;

    let row_count = match &args.out {
        Some(path) => {
            commands::export_report_to_file(state, &args.request, &args.format, Path::new(path))
                .map_err(|e| anyhow!(e))?
        }
        None => {
            let report = commands::export_report(state, &args.request, &args.format)
                .map_err(|e| anyhow!(e))?;
            print!("{}", report.content);
            report.row_count
        }
    };

    if row_count == 0 {
        eprintln!("{}", t("report.no_data"));
    } else {
        eprintln!(
            "{}",
            t_with_args("report.row_count", &[("count", &row_count.to_string())])
        );
    }
    if args.out.is_some() {
        println!("{}", t("common.success"));
    }
    Ok(())
}

fn parse_date(field: &str, raw: &str) -> anyhow::Result<NaiveDate> {
    validator::parse_date(field, raw).map_err(|e| anyhow!(commands::map_api_error(e)))
}

fn parse_id(flag: &str, raw: &str) -> anyhow::Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("参数 {} 需要整数ID: {}", flag, raw))
}
