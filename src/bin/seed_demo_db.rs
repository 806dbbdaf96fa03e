// Dev utility: create a demo database with groups, subjects, people and marks.
//
// Usage:
//   cargo run --bin seed_demo_db -- [db_path]
//
// Accounts: admin/admin (admin), viewer/viewer (read-only).
// Refuses to touch a database that already has accounts.

use academic_records::app::AppState;
use academic_records::domain::{MarkDraft, PersonDraft, PersonKind, UserRole};
use anyhow::{anyhow, bail};
use chrono::NaiveDate;

fn main() -> anyhow::Result<()> {
    academic_records::logging::init(&Default::default());

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "academic_records_demo.db".to_string());
    let state = AppState::new(&db_path).map_err(|e| anyhow!(e))?;

    if state.auth_api.bootstrap_admin("admin", "admin")?.is_none() {
        bail!("{} already has accounts, refusing to seed", db_path);
    }
    let admin = state.auth_api.login("admin", "admin")?;
    state
        .auth_api
        .create_user(&admin, "viewer", "viewer", UserRole::User)?;

    let groups = ["G1", "G2"]
        .iter()
        .map(|name| state.group_api.create_group(&admin, name))
        .collect::<Result<Vec<_>, _>>()?;
    let subjects = ["Math", "Physics", "Literature"]
        .iter()
        .map(|name| state.subject_api.create_subject(&admin, name))
        .collect::<Result<Vec<_>, _>>()?;

    let teachers = [("Ivan", "Petrov"), ("Olga", "Smirnova")]
        .iter()
        .map(|(first, last)| {
            state.person_api.create_person(
                &admin,
                &PersonDraft {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    father_name: None,
                    kind: PersonKind::Teacher,
                    group_id: None,
                },
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    let roster = [
        ("Anna", "Lee", Some(groups[0])),
        ("Boris", "Kim", Some(groups[0])),
        ("Chen", "Wu", Some(groups[1])),
        ("Dana", "Novak", Some(groups[1])),
        ("Egor", "Frolov", None),
    ];
    let mut students = Vec::new();
    for (first, last, group_id) in roster {
        students.push(state.person_api.create_person(
            &admin,
            &PersonDraft {
                first_name: first.to_string(),
                last_name: last.to_string(),
                father_name: None,
                kind: PersonKind::Student,
                group_id,
            },
        )?);
    }

    // Deterministic spread: two school years, four marks per student per subject.
    let dates = [
        NaiveDate::from_ymd_opt(2023, 10, 12),
        NaiveDate::from_ymd_opt(2023, 12, 5),
        NaiveDate::from_ymd_opt(2024, 2, 20),
        NaiveDate::from_ymd_opt(2024, 4, 9),
    ];
    let mut marks = 0usize;
    for (si, student_id) in students.iter().enumerate() {
        for (ji, subject_id) in subjects.iter().enumerate() {
            for (di, date) in dates.iter().enumerate() {
                let mark_date = date.ok_or_else(|| anyhow!("invalid demo date"))?;
                let value = 2 + ((si + ji * 2 + di) % 4) as i32;
                state.mark_api.create_mark(
                    &admin,
                    &MarkDraft {
                        student_id: *student_id,
                        subject_id: *subject_id,
                        teacher_id: teachers[(ji + di) % teachers.len()],
                        value,
                        mark_date,
                    },
                )?;
                marks += 1;
            }
        }
    }

    println!(
        "seeded {}: {} groups, {} subjects, {} teachers, {} students, {} marks",
        db_path,
        groups.len(),
        subjects.len(),
        teachers.len(),
        students.len(),
        marks
    );
    Ok(())
}
