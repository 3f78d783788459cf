//! Task repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Store habits, dailies and todos in one `tasks` table.
//! - Map per-kind details to nullable columns and back.
//!
//! # Invariants
//! - Write paths call `Task::validate()` before SQL mutations.
//! - Columns of other kinds are written as NULL.
//! - Read paths reject rows whose kind-specific columns are missing or
//!   unparseable instead of defaulting them.

use crate::model::strength::StrengthLadder;
use crate::model::task::{
    HabitKind, RepeatOn, RepeatPattern, RepeatUnit, Repeats, Task, TaskDetails, TaskId, TaskKind,
    TaskStatus,
};
use crate::model::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::{bool_to_int, parse_uuid_column};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    type,
    name,
    notes,
    strength,
    created_at,
    habit_type,
    status,
    repeats,
    repeat_on,
    repeat_interval,
    repeat_unit,
    due_date,
    is_completed
FROM tasks";

/// Query options for listing one user's tasks.
#[derive(Debug, Clone)]
pub struct TaskListQuery {
    pub user_id: UserId,
    pub kind: Option<TaskKind>,
}

/// Repository interface for task persistence.
pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

/// Flattened kind-specific columns.
#[derive(Default)]
struct DetailColumns {
    habit_type: Option<&'static str>,
    status: Option<&'static str>,
    repeats: Option<&'static str>,
    repeat_on: Option<&'static str>,
    repeat_interval: Option<u32>,
    repeat_unit: Option<&'static str>,
    due_date: Option<i64>,
    is_completed: Option<i64>,
}

impl DetailColumns {
    fn from_details(details: &TaskDetails) -> Self {
        match details {
            TaskDetails::Habit { kind, status } => Self {
                habit_type: Some(kind.as_str()),
                status: Some(status.as_str()),
                ..Self::default()
            },
            TaskDetails::Daily { status, repeat } => Self {
                status: Some(status.as_str()),
                repeats: Some(repeat.repeats.as_str()),
                repeat_on: Some(repeat.repeat_on.as_str()),
                repeat_interval: Some(repeat.interval),
                repeat_unit: Some(repeat.unit.as_str()),
                ..Self::default()
            },
            TaskDetails::Todo {
                due_date,
                is_completed,
            } => Self {
                due_date: Some(*due_date),
                is_completed: Some(bool_to_int(*is_completed)),
                ..Self::default()
            },
        }
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<TaskId> {
        task.validate()?;
        let columns = DetailColumns::from_details(&task.details);

        self.conn.execute(
            "INSERT INTO tasks (
                uuid,
                user_uuid,
                type,
                name,
                notes,
                strength,
                created_at,
                habit_type,
                status,
                repeats,
                repeat_on,
                repeat_interval,
                repeat_unit,
                due_date,
                is_completed
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                task.id.to_string(),
                task.user_id.to_string(),
                task.kind().as_str(),
                task.name.as_str(),
                task.notes.as_str(),
                task.strength.as_str(),
                task.created_at,
                columns.habit_type,
                columns.status,
                columns.repeats,
                columns.repeat_on,
                columns.repeat_interval,
                columns.repeat_unit,
                columns.due_date,
                columns.is_completed,
            ],
        )?;

        Ok(task.id)
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;
        let columns = DetailColumns::from_details(&task.details);

        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                type = ?2,
                name = ?3,
                notes = ?4,
                strength = ?5,
                habit_type = ?6,
                status = ?7,
                repeats = ?8,
                repeat_on = ?9,
                repeat_interval = ?10,
                repeat_unit = ?11,
                due_date = ?12,
                is_completed = ?13,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                task.id.to_string(),
                task.kind().as_str(),
                task.name.as_str(),
                task.notes.as_str(),
                task.strength.as_str(),
                columns.habit_type,
                columns.status,
                columns.repeats,
                columns.repeat_on,
                columns.repeat_interval,
                columns.repeat_unit,
                columns.due_date,
                columns.is_completed,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(task.id));
        }

        Ok(())
    }

    fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let row = self
            .conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE uuid = ?1;"),
                [id.to_string()],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?;

        row.transpose()
    }

    fn list_tasks(&self, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE user_uuid = ?");
        let mut bind_values = vec![Value::Text(query.user_id.to_string())];

        if let Some(kind) = query.kind {
            sql.push_str(" AND type = ?");
            bind_values.push(Value::Text(kind.as_str().to_string()));
        }
        sql.push_str(" ORDER BY created_at DESC, uuid ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tasks = Vec::new();

        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn delete_task(&self, id: TaskId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE uuid = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let type_text: String = row.get("type")?;
    let kind = TaskKind::parse(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid task type `{type_text}` in tasks.type"))
    })?;

    let strength_text: String = row.get("strength")?;
    let strength = StrengthLadder::parse(&strength_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid strength `{strength_text}` in tasks.strength"
        ))
    })?;

    let details = match kind {
        TaskKind::Habit => TaskDetails::Habit {
            kind: required_enum(row, "habit_type", HabitKind::parse)?,
            status: required_enum(row, "status", TaskStatus::parse)?,
        },
        TaskKind::Daily => TaskDetails::Daily {
            status: required_enum(row, "status", TaskStatus::parse)?,
            repeat: RepeatPattern {
                repeats: required_enum(row, "repeats", Repeats::parse)?,
                repeat_on: required_enum(row, "repeat_on", RepeatOn::parse)?,
                interval: required_value(row, "repeat_interval")?,
                unit: required_enum(row, "repeat_unit", RepeatUnit::parse)?,
            },
        },
        TaskKind::Todo => TaskDetails::Todo {
            due_date: required_value(row, "due_date")?,
            is_completed: match required_value::<i64>(row, "is_completed")? {
                0 => false,
                1 => true,
                other => {
                    return Err(RepoError::InvalidData(format!(
                        "invalid is_completed value `{other}` in tasks.is_completed"
                    )));
                }
            },
        },
    };

    let task = Task {
        id: parse_uuid_column(row, "uuid", "tasks.uuid")?,
        user_id: parse_uuid_column(row, "user_uuid", "tasks.user_uuid")?,
        name: row.get("name")?,
        notes: row.get("notes")?,
        strength,
        created_at: row.get("created_at")?,
        details,
    };
    task.validate()?;
    Ok(task)
}

fn required_value<T: rusqlite::types::FromSql>(row: &Row<'_>, column: &str) -> RepoResult<T> {
    row.get::<_, Option<T>>(column)?
        .ok_or_else(|| RepoError::InvalidData(format!("missing value in tasks.{column}")))
}

fn required_enum<T>(row: &Row<'_>, column: &str, parse: fn(&str) -> Option<T>) -> RepoResult<T> {
    let text: String = required_value(row, column)?;
    parse(&text)
        .ok_or_else(|| RepoError::InvalidData(format!("invalid value `{text}` in tasks.{column}")))
}
