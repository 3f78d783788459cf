use habitrpg_core::db::open_db_in_memory;
use habitrpg_core::repo::task_repo::{SqliteTaskRepository, TaskRepository};
use habitrpg_core::{
    EngineError, HabitKind, PlayerService, ProgressionConfig, RepeatPattern, ServiceError,
    StrengthLadder, Task, TaskDetails, TaskKind, TaskService, TaskStatus,
};
use rusqlite::Connection;
use uuid::Uuid;

fn services(conn: &Connection) -> (PlayerService<'_>, TaskService<'_>) {
    (
        PlayerService::new(conn, ProgressionConfig::default()),
        TaskService::new(conn, ProgressionConfig::default()),
    )
}

#[test]
fn daily_completes_once_per_cycle() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    players.register(user).unwrap();
    let daily_id = tasks
        .create_task(&Task::daily(user, "Stretch", RepeatPattern::default()))
        .unwrap();

    let (task, character) = tasks.complete_daily(daily_id, user).unwrap();
    assert_eq!(character.current_exp, 15);
    assert_eq!(task.strength, StrengthLadder::Strong);
    assert!(matches!(
        task.details,
        TaskDetails::Daily {
            status: TaskStatus::Completed,
            ..
        }
    ));

    let err = tasks.complete_daily(daily_id, user).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::AlreadyCompleted(id)) if id == daily_id
    ));
    assert_eq!(players.character_of(user).unwrap().current_exp, 15);
}

#[test]
fn todo_reward_persists_task_and_character_together() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    players.register(user).unwrap();
    let todo_id = tasks
        .create_task(&Task::todo(user, "File taxes", 1_760_000_000_000))
        .unwrap();

    tasks.complete_todo(todo_id, user).unwrap();

    let stored = SqliteTaskRepository::new(&conn)
        .get_task(todo_id)
        .unwrap()
        .unwrap();
    assert!(matches!(
        stored.details,
        TaskDetails::Todo {
            is_completed: true,
            due_date: 1_760_000_000_000
        }
    ));
    assert_eq!(players.character_of(user).unwrap().current_exp, 20);

    let err = tasks.complete_todo(todo_id, user).unwrap_err();
    assert_eq!(err.code(), "already_completed");
}

#[test]
fn good_habit_is_repeatable_and_levels_up() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    players.register(user).unwrap();
    let habit_id = tasks
        .create_task(&Task::habit(user, "Drink water", HabitKind::Good))
        .unwrap();

    let mut last = None;
    for _ in 0..10 {
        last = Some(tasks.complete_habit(habit_id, user).unwrap());
    }
    let (task, character) = last.unwrap();
    assert_eq!(task.strength, StrengthLadder::Unbreakable);
    assert_eq!(character.current_level, 2);
    assert_eq!(character.current_exp, 0);
    assert_eq!(character.max_hp, 20);
}

#[test]
fn bad_habit_drains_hp_to_zero_and_rest_restores_it() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    let character_id = players.register(user).unwrap().character.id;
    let habit_id = tasks
        .create_task(&Task::habit(user, "Doomscroll", HabitKind::Bad))
        .unwrap();

    let (task, character) = tasks.complete_habit(habit_id, user).unwrap();
    assert_eq!(character.current_hp, 5);
    assert_eq!(task.strength, StrengthLadder::Weak);

    tasks.complete_habit(habit_id, user).unwrap();
    let (task, character) = tasks.complete_habit(habit_id, user).unwrap();
    assert_eq!(character.current_hp, 0);
    assert!(character.is_exhausted());
    assert_eq!(task.strength, StrengthLadder::Fragile);
    assert_eq!(character.current_exp, 0);

    let rested = players.restore(character_id).unwrap();
    assert_eq!(rested.current_hp, rested.max_hp);
}

#[test]
fn other_users_task_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let owner = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    players.register(owner).unwrap();
    players.register(intruder).unwrap();
    let daily_id = tasks
        .create_task(&Task::daily(owner, "Meditate", RepeatPattern::default()))
        .unwrap();

    let err = tasks.complete_daily(daily_id, intruder).unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound(id) if id == daily_id));
    assert_eq!(players.character_of(intruder).unwrap().current_exp, 0);
}

#[test]
fn unregistered_actor_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let (_, tasks) = services(&conn);
    let user = Uuid::new_v4();
    let habit_id = tasks
        .create_task(&Task::habit(user, "Read", HabitKind::Good))
        .unwrap();

    let err = tasks.complete_habit(habit_id, user).unwrap_err();
    assert!(matches!(err, ServiceError::ActorNotRegistered(id) if id == user));
}

#[test]
fn completion_rule_must_match_task_kind() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    players.register(user).unwrap();
    let habit_id = tasks
        .create_task(&Task::habit(user, "Walk", HabitKind::Good))
        .unwrap();

    let err = tasks.complete_daily(habit_id, user).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::WrongTaskKind {
            expected: TaskKind::Daily,
            actual: TaskKind::Habit,
            ..
        })
    ));
}

#[test]
fn list_tasks_filters_by_kind_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let (_, tasks) = services(&conn);
    let user = Uuid::new_v4();

    let mut older = Task::habit(user, "Older habit", HabitKind::Good);
    older.created_at = 1_000;
    let mut newer = Task::habit(user, "Newer habit", HabitKind::Bad);
    newer.created_at = 2_000;
    let mut todo = Task::todo(user, "Todo", 5_000);
    todo.created_at = 3_000;
    let foreign = Task::habit(Uuid::new_v4(), "Someone else", HabitKind::Good);
    for task in [&older, &newer, &todo, &foreign] {
        tasks.create_task(task).unwrap();
    }

    let habits = tasks.list_tasks(user, Some(TaskKind::Habit)).unwrap();
    let names: Vec<&str> = habits.iter().map(|task| task.name.as_str()).collect();
    assert_eq!(names, vec!["Newer habit", "Older habit"]);

    let all = tasks.list_tasks(user, None).unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, todo.id);
}

#[test]
fn invalid_task_is_rejected_before_insert() {
    let conn = open_db_in_memory().unwrap();
    let (_, tasks) = services(&conn);
    let user = Uuid::new_v4();

    let blank = Task::habit(user, "   ", HabitKind::Good);
    assert!(matches!(
        tasks.create_task(&blank).unwrap_err(),
        ServiceError::Repo(_)
    ));

    let long = Task::habit(user, "x".repeat(101), HabitKind::Good);
    assert!(tasks.create_task(&long).is_err());
    assert!(tasks.list_tasks(user, None).unwrap().is_empty());
}

#[test]
fn delete_task_checks_owner() {
    let conn = open_db_in_memory().unwrap();
    let (_, tasks) = services(&conn);
    let owner = Uuid::new_v4();
    let todo_id = tasks
        .create_task(&Task::todo(owner, "Call mom", 0))
        .unwrap();

    let err = tasks.delete_task(todo_id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound(_)));

    tasks.delete_task(todo_id, owner).unwrap();
    assert!(tasks.list_tasks(owner, None).unwrap().is_empty());
}

#[test]
fn complete_task_applies_the_rule_of_each_kind() {
    let conn = open_db_in_memory().unwrap();
    let (players, tasks) = services(&conn);
    let user = Uuid::new_v4();
    players.register(user).unwrap();
    let todo_id = tasks.create_task(&Task::todo(user, "Renew passport", 0)).unwrap();
    let habit_id = tasks
        .create_task(&Task::habit(user, "Skip lunch", HabitKind::Bad))
        .unwrap();

    let (todo, character) = tasks.complete_task(todo_id, user).unwrap();
    assert!(matches!(
        todo.details,
        TaskDetails::Todo {
            is_completed: true,
            ..
        }
    ));
    assert_eq!(character.current_exp, 20);

    let (habit, character) = tasks.complete_task(habit_id, user).unwrap();
    assert_eq!(habit.strength, StrengthLadder::Weak);
    assert_eq!(character.current_hp, 5);
    assert!(!character.is_exhausted());

    let err = tasks.complete_task(todo_id, user).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Engine(EngineError::AlreadyCompleted(id)) if id == todo_id
    ));
    let err = tasks.complete_task(todo_id, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ServiceError::TaskNotFound(id) if id == todo_id));
}
