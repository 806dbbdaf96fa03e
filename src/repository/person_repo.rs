// ==========================================
// 教务档案系统 - 人员数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 删除语义: 作为学生或教师的成绩均由外键级联删除
// ==========================================

use crate::domain::person::{Person, PersonDraft, PersonView};
use crate::domain::types::PersonKind;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const VIEW_SELECT: &str = r#"
    SELECT p.id, p.first_name, p.last_name, p.father_name, p.type, p.group_id, g.name
    FROM people p
    LEFT JOIN groups g ON g.id = p.group_id
"#;

/// 带类型锁定检查的更新结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonUpdateOutcome {
    Updated,
    /// 已有成绩的人员不能变更类型
    KindLocked { current: PersonKind, marks: i64 },
}

/// 人员仓储
/// 职责: 管理 people 表的 CRUD 操作及与 groups 的名称连接
pub struct PersonRepository {
    conn: Arc<Mutex<Connection>>,
}

impl PersonRepository {
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

    /// 查询全部人员（按类型、姓、名排序）
    pub fn list_all(&self) -> RepositoryResult<Vec<PersonView>> {
        self.query_views(
            &format!("{} ORDER BY p.type, p.last_name, p.first_name, p.id", VIEW_SELECT),
            None,
        )
    }

    /// 查询全部学生（附带小组名称）
    pub fn list_students(&self) -> RepositoryResult<Vec<PersonView>> {
        self.query_views(
            &format!(
                "{} WHERE p.type = ?1 ORDER BY p.last_name, p.first_name, p.id",
                VIEW_SELECT
            ),
            Some(PersonKind::Student),
        )
    }

    /// 查询全部教师
    pub fn list_teachers(&self) -> RepositoryResult<Vec<PersonView>> {
        self.query_views(
            &format!(
                "{} WHERE p.type = ?1 ORDER BY p.last_name, p.first_name, p.id",
                VIEW_SELECT
            ),
            Some(PersonKind::Teacher),
        )
    }

    fn query_views(&self, sql: &str, kind: Option<PersonKind>) -> RepositoryResult<Vec<PersonView>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = match kind {
            Some(k) => stmt
                .query_map(params![k.code()], map_view)?
                .collect::<SqliteResult<Vec<PersonView>>>()?,
            None => stmt
                .query_map([], map_view)?
                .collect::<SqliteResult<Vec<PersonView>>>()?,
        };
        Ok(rows)
    }

    /// 按ID查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Person>> {
        let conn = self.get_conn()?;
        let person = conn
            .query_row(
                r#"
                SELECT id, first_name, last_name, father_name, type, group_id
                FROM people
                WHERE id = ?1
                "#,
                params![id],
                |row| {
                    Ok(Person {
                        id: row.get(0)?,
                        first_name: row.get(1)?,
                        last_name: row.get(2)?,
                        father_name: row.get(3)?,
                        kind: kind_at(row, 4)?,
                        group_id: row.get(5)?,
                    })
                },
            )
            .optional()?;
        Ok(person)
    }

    /// 新建人员，返回新ID
    pub fn insert(&self, draft: &PersonDraft) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO people (first_name, last_name, father_name, group_id, type)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                draft.first_name,
                draft.last_name,
                draft.father_name,
                draft.group_id,
                draft.kind.code(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 更新人员（读取当前类型、统计成绩、写入在同一事务内完成）
    ///
    /// # 返回
    /// - Ok(Updated): 已写入
    /// - Ok(KindLocked): 类型变更但已有成绩，未写入
    /// - Err(NotFound): 人员不存在
    pub fn update_unless_kind_locked(
        &self,
        id: i64,
        draft: &PersonDraft,
    ) -> RepositoryResult<PersonUpdateOutcome> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction().map_err(RepositoryError::transaction)?;

        let current = tx
            .query_row("SELECT type FROM people WHERE id = ?1", params![id], |row| {
                kind_at(row, 0)
            })
            .optional()?
            .ok_or_else(|| RepositoryError::not_found("Person", id))?;

        if current != draft.kind {
            let marks = marks_of(&tx, id)?;
            if marks > 0 {
                return Ok(PersonUpdateOutcome::KindLocked { current, marks });
            }
        }

        tx.execute(
            r#"
            UPDATE people
            SET first_name = ?1, last_name = ?2, father_name = ?3, group_id = ?4, type = ?5
            WHERE id = ?6
            "#,
            params![
                draft.first_name,
                draft.last_name,
                draft.father_name,
                draft.group_id,
                draft.kind.code(),
                id,
            ],
        )?;
        tx.commit().map_err(RepositoryError::transaction)?;
        Ok(PersonUpdateOutcome::Updated)
    }

    /// 该人员作为学生或教师出现的成绩条数
    pub fn count_marks(&self, id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        marks_of(&conn, id)
    }

    /// 删除人员（级联删除相关成绩）
    pub fn delete(&self, id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM people WHERE id = ?1", params![id])?;
        if affected == 0 {
            return Err(RepositoryError::not_found("Person", id));
        }
        Ok(())
    }
}

fn marks_of(conn: &Connection, id: i64) -> RepositoryResult<i64> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM marks WHERE student_id = ?1 OR teacher_id = ?1",
        params![id],
        |row| row.get(0),
    )?;
    Ok(n)
}

fn map_view(row: &Row<'_>) -> SqliteResult<PersonView> {
    Ok(PersonView {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        father_name: row.get(3)?,
        kind: kind_at(row, 4)?,
        group_id: row.get(5)?,
        group_name: row.get(6)?,
    })
}

/// 读取 type 列并解析为 PersonKind
pub(crate) fn kind_at(row: &Row<'_>, idx: usize) -> SqliteResult<PersonKind> {
    let code: String = row.get(idx)?;
    PersonKind::from_code(&code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("未知的人员类型代码: {}", code).into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory_with_schema;

    fn draft(first: &str, last: &str, kind: PersonKind, group_id: Option<i64>) -> PersonDraft {
        PersonDraft {
            first_name: first.to_string(),
            last_name: last.to_string(),
            father_name: None,
            kind,
            group_id,
        }
    }

    fn setup() -> (Arc<Mutex<Connection>>, PersonRepository) {
        let conn = Arc::new(Mutex::new(open_in_memory_with_schema().unwrap()));
        (conn.clone(), PersonRepository::new(conn))
    }

    #[test]
    fn test_listings_join_group_name() {
        let (conn, repo) = setup();
        conn.lock()
            .unwrap()
            .execute("INSERT INTO groups (id, name) VALUES (1, 'G1')", [])
            .unwrap();

        repo.insert(&draft("Ivan", "Petrov", PersonKind::Student, Some(1))).unwrap();
        repo.insert(&draft("Anna", "Andreeva", PersonKind::Student, None)).unwrap();
        repo.insert(&draft("Olga", "Sidorova", PersonKind::Teacher, None)).unwrap();

        let students = repo.list_students().unwrap();
        assert_eq!(students.len(), 2);
        assert_eq!(students[0].last_name, "Andreeva");
        assert_eq!(students[0].group_name, None);
        assert_eq!(students[1].group_name.as_deref(), Some("G1"));

        let teachers = repo.list_teachers().unwrap();
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].kind, PersonKind::Teacher);

        // 'P' < 'S'：教师排在学生之前
        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, PersonKind::Teacher);
    }

    #[test]
    fn test_update_and_find() {
        let (_conn, repo) = setup();
        let id = repo.insert(&draft("Ivan", "Petrov", PersonKind::Student, None)).unwrap();
        let mut d = draft("Ivan", "Petrov", PersonKind::Student, None);
        d.father_name = Some("Sergeevich".to_string());
        assert_eq!(
            repo.update_unless_kind_locked(id, &d).unwrap(),
            PersonUpdateOutcome::Updated
        );

        let p = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(p.father_name.as_deref(), Some("Sergeevich"));
        assert!(matches!(
            repo.update_unless_kind_locked(999, &d),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_kind_change_locked_once_marked() {
        let (conn, repo) = setup();
        let s = repo.insert(&draft("Ivan", "Petrov", PersonKind::Student, None)).unwrap();
        let t = repo.insert(&draft("Olga", "Sidorova", PersonKind::Teacher, None)).unwrap();

        // 无成绩时可以变更类型
        let as_teacher = draft("Ivan", "Petrov", PersonKind::Teacher, None);
        assert_eq!(
            repo.update_unless_kind_locked(s, &as_teacher).unwrap(),
            PersonUpdateOutcome::Updated
        );
        let as_student = draft("Ivan", "Petrov", PersonKind::Student, None);
        repo.update_unless_kind_locked(s, &as_student).unwrap();

        {
            let c = conn.lock().unwrap();
            c.execute("INSERT INTO subjects (id, name) VALUES (1, 'Math')", []).unwrap();
            c.execute(
                "INSERT INTO marks (student_id, subject_id, teacher_id, value, mark_date) VALUES (?1, 1, ?2, 4, '2024-01-10')",
                params![s, t],
            )
            .unwrap();
        }

        assert_eq!(
            repo.update_unless_kind_locked(s, &as_teacher).unwrap(),
            PersonUpdateOutcome::KindLocked {
                current: PersonKind::Student,
                marks: 1
            }
        );
        assert_eq!(repo.find_by_id(s).unwrap().unwrap().kind, PersonKind::Student);

        // 类型不变的修改不受影响
        let mut renamed = as_student.clone();
        renamed.first_name = "Ivan2".to_string();
        repo.update_unless_kind_locked(s, &renamed).unwrap();
        assert_eq!(repo.find_by_id(s).unwrap().unwrap().first_name, "Ivan2");
    }

    #[test]
    fn test_delete_person_cascades_marks_in_both_roles() {
        let (conn, repo) = setup();
        let s = repo.insert(&draft("Ivan", "Petrov", PersonKind::Student, None)).unwrap();
        let s2 = repo.insert(&draft("Anna", "Andreeva", PersonKind::Student, None)).unwrap();
        let t = repo.insert(&draft("Olga", "Sidorova", PersonKind::Teacher, None)).unwrap();
        {
            let c = conn.lock().unwrap();
            c.execute("INSERT INTO subjects (id, name) VALUES (1, 'Math')", []).unwrap();
            for student in [s, s2] {
                c.execute(
                    "INSERT INTO marks (student_id, subject_id, teacher_id, value, mark_date) VALUES (?1, 1, ?2, 4, '2024-01-10')",
                    params![student, t],
                )
                .unwrap();
            }
        }

        assert_eq!(repo.count_marks(s).unwrap(), 1);
        assert_eq!(repo.count_marks(t).unwrap(), 2);

        repo.delete(s).unwrap();
        let count = |c: &Connection| -> i64 {
            c.query_row("SELECT COUNT(*) FROM marks", [], |row| row.get(0)).unwrap()
        };
        assert_eq!(count(&conn.lock().unwrap()), 1);

        repo.delete(t).unwrap();
        assert_eq!(count(&conn.lock().unwrap()), 0);
    }
}
