//! Task use-case service.
//!
//! # Responsibility
//! - Create and list tasks for a user.
//! - Complete habits, dailies and todos on behalf of an actor, persisting the
//!   task and the actor's character in one unit of work.
//!
//! # Invariants
//! - A task owned by another user is reported as not found.
//! - Task and character are saved together or not at all.

use crate::config::ProgressionConfig;
use crate::engine::error::EngineResult;
use crate::engine::reward::{self, Completion};
use crate::model::character::Character;
use crate::model::task::{Task, TaskId, TaskKind};
use crate::model::UserId;
use crate::repo::character_repo::{CharacterRepository, SqliteCharacterRepository};
use crate::repo::task_repo::{SqliteTaskRepository, TaskListQuery, TaskRepository};
use crate::repo::unit_of_work::in_unit_of_work;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::log_failure;
use log::info;
use rusqlite::Connection;

type CompletionRule = fn(&Task, &Character, &ProgressionConfig) -> EngineResult<Completion>;

/// Use-case service for tasks and their rewards.
pub struct TaskService<'conn> {
    conn: &'conn Connection,
    config: ProgressionConfig,
}

impl<'conn> TaskService<'conn> {
    pub fn new(conn: &'conn Connection, config: ProgressionConfig) -> Self {
        Self { conn, config }
    }

    /// Stores a new task and returns its id.
    pub fn create_task(&self, task: &Task) -> ServiceResult<TaskId> {
        let id = SqliteTaskRepository::new(self.conn).create_task(task)?;
        info!(
            "event=task_create module=service status=ok task_id={} kind={}",
            id,
            task.kind().as_str()
        );
        Ok(id)
    }

    /// Lists one user's tasks, newest first.
    pub fn list_tasks(&self, user_id: UserId, kind: Option<TaskKind>) -> ServiceResult<Vec<Task>> {
        let query = TaskListQuery { user_id, kind };
        Ok(SqliteTaskRepository::new(self.conn).list_tasks(&query)?)
    }

    /// Deletes a task owned by `actor_id`.
    pub fn delete_task(&self, task_id: TaskId, actor_id: UserId) -> ServiceResult<()> {
        let result: ServiceResult<()> = in_unit_of_work(self.conn, |tx| {
            let tasks = SqliteTaskRepository::new(tx);
            match tasks.get_task(task_id)? {
                Some(task) if task.user_id == actor_id => Ok(tasks.delete_task(task_id)?),
                _ => Err(ServiceError::TaskNotFound(task_id)),
            }
        });

        match &result {
            Ok(()) => info!(
                "event=task_delete module=service status=ok task_id={} actor_id={}",
                task_id, actor_id
            ),
            Err(err) => log_failure("task_delete", task_id, err),
        }
        result
    }

    /// Records one habit occurrence for `actor_id`.
    pub fn complete_habit(
        &self,
        habit_id: TaskId,
        actor_id: UserId,
    ) -> ServiceResult<(Task, Character)> {
        self.complete("task_complete_habit", habit_id, actor_id, reward::complete_habit)
    }

    /// Completes a daily for `actor_id`.
    ///
    /// # Errors
    /// - `Engine(AlreadyCompleted)` when the daily is already completed.
    pub fn complete_daily(
        &self,
        daily_id: TaskId,
        actor_id: UserId,
    ) -> ServiceResult<(Task, Character)> {
        self.complete("task_complete_daily", daily_id, actor_id, reward::complete_daily)
    }

    /// Completes a todo for `actor_id`.
    ///
    /// # Errors
    /// - `Engine(AlreadyCompleted)` when the todo is already completed.
    pub fn complete_todo(
        &self,
        todo_id: TaskId,
        actor_id: UserId,
    ) -> ServiceResult<(Task, Character)> {
        self.complete("task_complete_todo", todo_id, actor_id, reward::complete_todo)
    }

    /// Completes any task with the rule of its own kind.
    pub fn complete_task(
        &self,
        task_id: TaskId,
        actor_id: UserId,
    ) -> ServiceResult<(Task, Character)> {
        self.complete("task_complete", task_id, actor_id, reward::complete_task)
    }

    fn complete(
        &self,
        event: &'static str,
        task_id: TaskId,
        actor_id: UserId,
        rule: CompletionRule,
    ) -> ServiceResult<(Task, Character)> {
        let result: ServiceResult<Completion> = in_unit_of_work(self.conn, |tx| {
            let tasks = SqliteTaskRepository::new(tx);
            let characters = SqliteCharacterRepository::new(tx);

            let task = tasks
                .get_task(task_id)?
                .filter(|task| task.user_id == actor_id)
                .ok_or(ServiceError::TaskNotFound(task_id))?;
            let character = characters
                .get_character_by_user(actor_id)?
                .ok_or(ServiceError::ActorNotRegistered(actor_id))?;

            let completion = rule(&task, &character, &self.config)?;
            tasks.update_task(&completion.task)?;
            characters.update_character(&completion.character)?;
            Ok(completion)
        });

        match result {
            Ok(completion) => {
                info!(
                    "event={} module=service status=ok task_id={} actor_id={} strength={} exp_gained={} hp_lost={} levels_gained={} exhausted={}",
                    event,
                    task_id,
                    actor_id,
                    completion.task.strength.as_str(),
                    completion.exp_gained,
                    completion.hp_lost,
                    completion.levels_gained,
                    completion.character.is_exhausted()
                );
                Ok((completion.task, completion.character))
            }
            Err(err) => {
                log_failure(event, task_id, &err);
                Err(err)
            }
        }
    }
}
