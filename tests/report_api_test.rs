// ==========================================
// ReportApi 集成测试（SQLite 临时库）
// ==========================================
// 测试范围:
// 1. 五种分组维度的计数/均值/排序
// 2. 过滤条件（学生/小组/科目/教师）与日期闭区间
// 3. 参数校验: 未知维度、日期倒置
// 4. 读操作对只读账户开放
// ==========================================

mod test_helpers;

use academic_records::api::{ApiError, ReportRequest};
use academic_records::domain::AggregationRow;
use test_helpers::{d, TestEnv};

/// S1/S2 属于 G1，T1 在 2024-01 给出 Math 5 分和 3 分
struct Fixture {
    env: TestEnv,
    g1: i64,
    s1: i64,
    s2: i64,
    math: i64,
    t1: i64,
}

fn january_fixture() -> Fixture {
    let env = TestEnv::new().expect("无法创建测试环境");
    let g1 = env.group("G1");
    let math = env.subject("Math");
    let t1 = env.teacher("Tom", "Teach");
    let s1 = env.student("Alice", "Brown", Some(g1));
    let s2 = env.student("Bob", "Adams", Some(g1));
    env.mark(s1, math, t1, 5, "2024-01-10");
    env.mark(s2, math, t1, 3, "2024-01-12");
    Fixture { env, g1, s1, s2, math, t1 }
}

fn january(group_by: &str) -> ReportRequest {
    ReportRequest::new(d("2024-01-01"), d("2024-01-31"), group_by)
}

fn run(env: &TestEnv, request: &ReportRequest) -> Vec<AggregationRow> {
    env.state
        .report_api
        .avg_marks_analysis(request)
        .expect("统计失败")
}

// ==========================================
// 分组维度
// ==========================================

#[test]
fn test_group_dimension_average() {
    let f = january_fixture();
    let rows = run(&f.env, &january("group"));
    assert_eq!(
        rows,
        vec![AggregationRow::Entity {
            id: Some(f.g1),
            name: "G1".to_string(),
            avg: 4.0,
            count: 2,
        }]
    );
}

#[test]
fn test_student_dimension_sorted_by_last_then_first_name() {
    let f = january_fixture();
    let rows = run(&f.env, &january("student"));

    // 按 (姓, 名) 排序: Adams 在 Brown 之前
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id(), Some(f.s2));
    assert_eq!(rows[0].label(), "Adams Bob");
    assert_eq!((rows[0].avg(), rows[0].count()), (3.0, 1));
    assert_eq!(rows[1].id(), Some(f.s1));
    assert_eq!(rows[1].label(), "Brown Alice");
    assert_eq!((rows[1].avg(), rows[1].count()), (5.0, 1));
}

#[test]
fn test_year_dimension_keys_without_id() {
    let f = january_fixture();
    f.env.mark(f.s1, f.math, f.t1, 2, "2023-11-03");
    f.env.mark(f.s2, f.math, f.t1, 5, "2023-12-28");

    let request = ReportRequest::new(d("2023-01-01"), d("2024-12-31"), "year");
    let rows = run(&f.env, &request);
    assert_eq!(
        rows,
        vec![
            AggregationRow::Year {
                key: "2023".to_string(),
                avg: 3.5,
                count: 2,
            },
            AggregationRow::Year {
                key: "2024".to_string(),
                avg: 4.0,
                count: 2,
            },
        ]
    );

    // year 行序列化时不含 id
    let json = serde_json::to_value(&rows).unwrap();
    assert!(json[0].get("id").is_none());
    assert_eq!(json[0]["key"], "2023");
}

#[test]
fn test_student_filter_limits_subject_rows() {
    let f = january_fixture();
    let physics = f.env.subject("Physics");
    let history = f.env.subject("History");
    f.env.mark(f.s1, physics, f.t1, 4, "2024-01-20");
    // S2 的 History 成绩不属于 S1
    f.env.mark(f.s2, history, f.t1, 2, "2024-01-21");

    let mut request = january("subject");
    request.student_id = Some(f.s1);
    let rows = run(&f.env, &request);

    let labels: Vec<&str> = rows.iter().map(|r| r.label()).collect();
    assert_eq!(labels, vec!["Math", "Physics"]);
    assert_eq!(rows.iter().map(|r| r.count()).sum::<i64>(), 2);
}

#[test]
fn test_unknown_dimension_rejected() {
    let f = january_fixture();
    let result = f.env.state.report_api.avg_marks_analysis(&january("department"));
    assert!(matches!(result, Err(ApiError::InvalidArgument(_))));
}

// ==========================================
// 区间与过滤
// ==========================================

#[test]
fn test_date_range_is_inclusive() {
    let f = january_fixture();

    let single_day = ReportRequest::new(d("2024-01-10"), d("2024-01-10"), "subject");
    let rows = run(&f.env, &single_day);
    assert_eq!(rows.len(), 1);
    assert_eq!((rows[0].avg(), rows[0].count()), (5.0, 1));

    let empty = ReportRequest::new(d("2024-02-01"), d("2024-02-29"), "subject");
    assert!(run(&f.env, &empty).is_empty());
}

#[test]
fn test_reversed_range_rejected() {
    let f = january_fixture();
    let request = ReportRequest::new(d("2024-01-31"), d("2024-01-01"), "group");
    assert!(matches!(
        f.env.state.report_api.avg_marks_analysis(&request),
        Err(ApiError::InvalidArgument(_))
    ));
}

#[test]
fn test_teacher_and_group_filters() {
    let f = january_fixture();
    let t2 = f.env.teacher("Zoe", "Zed");
    let g2 = f.env.group("G2");
    let s3 = f.env.student("Carl", "Clark", Some(g2));
    f.env.mark(s3, f.math, t2, 2, "2024-01-15");

    let mut by_teacher = january("teacher");
    by_teacher.teacher_id = Some(t2);
    let rows = run(&f.env, &by_teacher);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id(), Some(t2));
    assert_eq!((rows[0].avg(), rows[0].count()), (2.0, 1));

    let mut by_group = january("student");
    by_group.group_id = Some(f.g1);
    let ids: Vec<Option<i64>> = run(&f.env, &by_group).iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![Some(f.s2), Some(f.s1)]);
}

#[test]
fn test_groupless_student_excluded_only_from_group_dimension() {
    let f = january_fixture();
    let loner = f.env.student("Lone", "Wolf", None);
    f.env.mark(loner, f.math, f.t1, 2, "2024-01-05");

    let groups = run(&f.env, &january("group"));
    assert_eq!(groups.iter().map(|r| r.count()).sum::<i64>(), 2);

    let subjects = run(&f.env, &january("subject"));
    assert_eq!(subjects.iter().map(|r| r.count()).sum::<i64>(), 3);
}

#[test]
fn test_partitions_cover_all_marks() {
    let f = january_fixture();
    let physics = f.env.subject("Physics");
    f.env.mark(f.s1, physics, f.t1, 4, "2024-01-22");
    f.env.mark(f.s2, physics, f.t1, 4, "2024-01-23");

    for group_by in ["group", "student", "subject", "teacher", "year"] {
        let rows = run(&f.env, &january(group_by));
        let total: i64 = rows.iter().map(|r| r.count()).sum();
        assert_eq!(total, 4, "维度 {} 的计数之和应等于成绩总数", group_by);

        let weighted: f64 = rows.iter().map(|r| r.avg() * r.count() as f64).sum();
        assert!((weighted - 16.0).abs() < 1e-9, "维度 {} 的加权和不一致", group_by);
    }
}

#[test]
fn test_repeated_calls_are_identical() {
    let f = january_fixture();
    let request = january("teacher");
    assert_eq!(run(&f.env, &request), run(&f.env, &request));
}

#[test]
fn test_reader_can_query_reports() {
    let f = january_fixture();
    // 统计是只读操作，不经过权限闸门
    assert_eq!(f.env.reader.role, academic_records::UserRole::User);
    assert_eq!(run(&f.env, &january("group")).len(), 1);
}

#[test]
fn test_deleting_subject_removes_its_marks_from_reports() {
    let f = january_fixture();
    let physics = f.env.subject("Physics");
    f.env.mark(f.s1, physics, f.t1, 2, "2024-01-25");
    assert_eq!(run(&f.env, &january("subject")).len(), 2);

    f.env
        .state
        .subject_api
        .delete_subject(&f.env.admin, physics)
        .unwrap();
    let rows = run(&f.env, &january("subject"));
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label(), "Math");
}
