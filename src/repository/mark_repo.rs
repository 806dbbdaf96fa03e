// ==========================================
// 教务档案系统 - 成绩数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（引用类型校验在 API 层）
// 存储: marks.mark_date 为 YYYY-MM-DD 文本（rusqlite chrono 特性）
// ==========================================

use crate::domain::mark::{Mark, MarkDraft, MarkView};
use crate::domain::person::full_name;
use crate::domain::types::PersonKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::person_repo::kind_at;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 成绩引用不成立的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkRefIssue {
    MissingPerson(i64),
    WrongKind {
        person_id: i64,
        actual: PersonKind,
        expected: PersonKind,
    },
    MissingSubject(i64),
}

/// 带引用检查的写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkWrite {
    Written(i64),
    Rejected(MarkRefIssue),
}

/// 成绩仓储
/// 职责: 管理 marks 表的 CRUD 操作
pub struct MarkRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MarkRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询成绩册（按ID排序，附带全名与课程名）
    pub fn list_all(&self) -> RepositoryResult<Vec<MarkView>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                m.id, m.value, m.mark_date, m.student_id, m.teacher_id, m.subject_id,
                st.last_name, st.first_name, st.father_name,
                th.last_name, th.first_name, th.father_name,
                sb.name
            FROM marks m
            JOIN people st ON st.id = m.student_id
            JOIN people th ON th.id = m.teacher_id
            JOIN subjects sb ON sb.id = m.subject_id
            ORDER BY m.id
            "#,
        )?;

        let marks = stmt
            .query_map([], |row| {
                let st_last: String = row.get(6)?;
                let st_first: String = row.get(7)?;
                let st_father: Option<String> = row.get(8)?;
                let th_last: String = row.get(9)?;
                let th_first: String = row.get(10)?;
                let th_father: Option<String> = row.get(11)?;
                Ok(MarkView {
                    id: row.get(0)?,
                    value: row.get(1)?,
                    mark_date: row.get(2)?,
                    student_id: row.get(3)?,
                    teacher_id: row.get(4)?,
                    subject_id: row.get(5)?,
                    student_name: full_name(&st_last, &st_first, st_father.as_deref()),
                    teacher_name: full_name(&th_last, &th_first, th_father.as_deref()),
                    subject_name: row.get(12)?,
                })
            })?
            .collect::<SqliteResult<Vec<MarkView>>>()?;

        Ok(marks)
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Mark>> {
        let conn = self.get_conn()?;
        let mark = conn
            .query_row(
                r#"
                SELECT id, student_id, subject_id, teacher_id, value, mark_date
                FROM marks
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Mark {
                        id: row.get(0)?,
                        student_id: row.get(1)?,
                        subject_id: row.get(2)?,
                        teacher_id: row.get(3)?,
                        value: row.get(4)?,
                        mark_date: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(mark)
    }

    /// 新建成绩（引用检查与插入在同一事务内完成）
    pub fn insert_checked(&self, draft: &MarkDraft) -> RepositoryResult<MarkWrite> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        if let Some(issue) = reference_issue(&tx, draft)? {
            return Ok(MarkWrite::Rejected(issue));
        }
        tx.execute(
            r#"
            INSERT INTO marks (student_id, subject_id, teacher_id, value, mark_date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                draft.student_id,
                draft.subject_id,
                draft.teacher_id,
                draft.value,
                draft.mark_date,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(MarkWrite::Written(id))
    }

    /// 更新成绩（存在性检查、引用检查与更新在同一事务内完成）
    ///
    /// # 返回
    /// - Err(NotFound): 成绩不存在
    pub fn update_checked(&self, id: i64, draft: &MarkDraft) -> RepositoryResult<MarkWrite> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        let exists = tx
            .query_row("SELECT 1 FROM marks WHERE id = ?1", params![id], |_| Ok(()))
            .optional()?;
        if exists.is_none() {
            return Err(RepositoryError::not_found("Mark", id));
        }
        if let Some(issue) = reference_issue(&tx, draft)? {
            return Ok(MarkWrite::Rejected(issue));
        }
        tx.execute(
            r#"
            UPDATE marks
            SET student_id = ?1, subject_id = ?2, teacher_id = ?3, value = ?4, mark_date = ?5
            WHERE id = ?6
            "#,
            params![
                draft.student_id,
                draft.subject_id,
                draft.teacher_id,
                draft.value,
                draft.mark_date,
                id,
            ],
        )?;
        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(MarkWrite::Written(id))
    }

    /// 删除成绩
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM marks WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Mark", id));
        }
        Ok(())
    }
}

/// 学生须为 S 类、教师须为 P 类、课程须存在
fn reference_issue(conn: &Connection, draft: &MarkDraft) -> RepositoryResult<Option<MarkRefIssue>> {
    for (person_id, expected) in [
        (draft.student_id, PersonKind::Student),
        (draft.teacher_id, PersonKind::Teacher),
    ] {
        let actual = conn
            .query_row(
                "SELECT type FROM people WHERE id = ?1",
                params![person_id],
                |row| kind_at(row, 0),
            )
            .optional()?;
        match actual {
            None => return Ok(Some(MarkRefIssue::MissingPerson(person_id))),
            Some(actual) if actual != expected => {
                return Ok(Some(MarkRefIssue::WrongKind {
                    person_id,
                    actual,
                    expected,
                }))
            }
            Some(_) => {}
        }
    }

    let subject = conn
        .query_row(
            "SELECT 1 FROM subjects WHERE id = ?1",
            params![draft.subject_id],
            |_| Ok(()),
        )
        .optional()?;
    if subject.is_none() {
        return Ok(Some(MarkRefIssue::MissingSubject(draft.subject_id)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_with_schema;
    use chrono::NaiveDate;

    fn setup() -> MarkRepository {
        let conn = open_in_memory_with_schema().unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO subjects (id, name) VALUES (1, 'Math');
            INSERT INTO people (id, first_name, last_name, father_name, type) VALUES (1, 'Ivan', 'Petrov', 'Sergeevich', 'S');
            INSERT INTO people (id, first_name, last_name, type) VALUES (2, 'Olga', 'Sidorova', 'P');
            "#,
        )
        .unwrap();
        MarkRepository::new(Arc::new(Mutex::new(conn)))
    }

    fn written(outcome: MarkWrite) -> i64 {
        match outcome {
            MarkWrite::Written(id) => id,
            other => panic!("expected Written, got {:?}", other),
        }
    }

    fn draft(value: i32) -> MarkDraft {
        MarkDraft {
            student_id: 1,
            subject_id: 1,
            teacher_id: 2,
            value,
            mark_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        }
    }

    #[test]
    fn test_insert_and_list_with_names() {
        let repo = setup();
        let id = written(repo.insert_checked(&draft(5)).unwrap());

        let marks = repo.list_all().unwrap();
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].id, id);
        assert_eq!(marks[0].student_name, "Petrov Ivan Sergeevich");
        assert_eq!(marks[0].teacher_name, "Sidorova Olga");
        assert_eq!(marks[0].subject_name, "Math");
        assert_eq!(marks[0].mark_date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
    }

    #[test]
    fn test_value_out_of_domain_rejected_by_check() {
        let repo = setup();
        assert!(matches!(
            repo.insert_checked(&draft(6)),
            Err(RepositoryError::ValidationError(_))
        ));
    }

    #[test]
    fn test_update_delete_missing() {
        let repo = setup();
        let id = written(repo.insert_checked(&draft(3)).unwrap());
        assert_eq!(repo.update_checked(id, &draft(4)).unwrap(), MarkWrite::Written(id));
        assert_eq!(repo.find_by_id(id).unwrap().unwrap().value, 4);

        repo.delete(id).unwrap();
        assert!(matches!(repo.delete(id), Err(RepositoryError::NotFound { .. })));
        assert!(matches!(
            repo.update_checked(id, &draft(4)),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_reference_kinds_checked_before_write() {
        let repo = setup();

        let mut swapped = draft(4);
        swapped.student_id = 2;
        swapped.teacher_id = 1;
        assert_eq!(
            repo.insert_checked(&swapped).unwrap(),
            MarkWrite::Rejected(MarkRefIssue::WrongKind {
                person_id: 2,
                actual: PersonKind::Teacher,
                expected: PersonKind::Student,
            })
        );

        let mut ghost = draft(4);
        ghost.teacher_id = 99;
        assert_eq!(
            repo.insert_checked(&ghost).unwrap(),
            MarkWrite::Rejected(MarkRefIssue::MissingPerson(99))
        );

        let mut no_subject = draft(4);
        no_subject.subject_id = 7;
        assert_eq!(
            repo.insert_checked(&no_subject).unwrap(),
            MarkWrite::Rejected(MarkRefIssue::MissingSubject(7))
        );
        assert!(repo.list_all().unwrap().is_empty());

        let id = written(repo.insert_checked(&draft(5)).unwrap());
        assert_eq!(
            repo.update_checked(id, &swapped).unwrap(),
            MarkWrite::Rejected(MarkRefIssue::WrongKind {
                person_id: 2,
                actual: PersonKind::Teacher,
                expected: PersonKind::Student,
            })
        );
        assert_eq!(repo.find_by_id(id).unwrap().unwrap().student_id, 1);
    }
}
