//! Task completion rules.
//!
//! # Responsibility
//! - Apply the per-kind reward or penalty to the actor's character.
//! - Move the task along the strength ladder and set its terminal flag.
//!
//! # Invariants
//! - Habits are repeatable; dailies and todos complete once per cycle.
//! - A rejected completion changes neither the task nor the character.
//! - Only the task and the actor's character are touched.

use crate::config::ProgressionConfig;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::experience::gain_exp_with_levels;
use crate::model::character::Character;
use crate::model::task::{HabitKind, Task, TaskDetails, TaskKind, TaskStatus};

/// Result of one successful completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub task: Task,
    pub character: Character,
    pub exp_gained: u32,
    pub hp_lost: u32,
    pub levels_gained: u32,
}

/// Records one good or bad habit occurrence.
///
/// Good habits grant `good_habit_exp` and strengthen the habit. Bad habits
/// cost `bad_habit_hp_penalty` hp (floored at zero) and weaken it.
pub fn complete_habit(
    task: &Task,
    character: &Character,
    config: &ProgressionConfig,
) -> EngineResult<Completion> {
    let TaskDetails::Habit { kind, .. } = &task.details else {
        return Err(wrong_kind(task, TaskKind::Habit));
    };
    task.validate()?;

    match kind {
        HabitKind::Good => {
            let mut next_task = task.clone();
            next_task.strength = task.strength.increase();
            reward(next_task, character, config.good_habit_exp, config)
        }
        HabitKind::Bad => {
            character.validate()?;
            let mut next_character = character.clone();
            next_character.current_hp = character
                .current_hp
                .saturating_sub(config.bad_habit_hp_penalty);
            let mut next_task = task.clone();
            next_task.strength = task.strength.decrease();
            Ok(Completion {
                hp_lost: character.current_hp - next_character.current_hp,
                task: next_task,
                character: next_character,
                exp_gained: 0,
                levels_gained: 0,
            })
        }
    }
}

/// Completes a daily for the current cycle.
///
/// # Errors
/// - `AlreadyCompleted` when the daily status is already `completed`.
pub fn complete_daily(
    task: &Task,
    character: &Character,
    config: &ProgressionConfig,
) -> EngineResult<Completion> {
    let TaskDetails::Daily { status, repeat } = &task.details else {
        return Err(wrong_kind(task, TaskKind::Daily));
    };
    if *status == TaskStatus::Completed {
        return Err(EngineError::AlreadyCompleted(task.id));
    }
    task.validate()?;

    let mut next_task = task.clone();
    next_task.strength = task.strength.increase();
    next_task.details = TaskDetails::Daily {
        status: TaskStatus::Completed,
        repeat: *repeat,
    };
    reward(next_task, character, config.daily_exp, config)
}

/// Completes a todo.
///
/// # Errors
/// - `AlreadyCompleted` when the todo is already completed.
pub fn complete_todo(
    task: &Task,
    character: &Character,
    config: &ProgressionConfig,
) -> EngineResult<Completion> {
    let TaskDetails::Todo {
        due_date,
        is_completed,
    } = &task.details
    else {
        return Err(wrong_kind(task, TaskKind::Todo));
    };
    if *is_completed {
        return Err(EngineError::AlreadyCompleted(task.id));
    }
    task.validate()?;

    let mut next_task = task.clone();
    next_task.strength = task.strength.increase();
    next_task.details = TaskDetails::Todo {
        due_date: *due_date,
        is_completed: true,
    };
    reward(next_task, character, config.todo_exp, config)
}

/// Dispatches to the completion rule of the task's own kind.
pub fn complete_task(
    task: &Task,
    character: &Character,
    config: &ProgressionConfig,
) -> EngineResult<Completion> {
    match task.kind() {
        TaskKind::Habit => complete_habit(task, character, config),
        TaskKind::Daily => complete_daily(task, character, config),
        TaskKind::Todo => complete_todo(task, character, config),
    }
}

fn reward(
    task: Task,
    character: &Character,
    exp: u32,
    config: &ProgressionConfig,
) -> EngineResult<Completion> {
    let (next_character, levels_gained) =
        gain_exp_with_levels(character, i64::from(exp), config)?;
    Ok(Completion {
        levels_gained,
        task,
        character: next_character,
        exp_gained: exp,
        hp_lost: 0,
    })
}

fn wrong_kind(task: &Task, expected: TaskKind) -> EngineError {
    EngineError::WrongTaskKind {
        task_id: task.id,
        expected,
        actual: task.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::{complete_daily, complete_habit, complete_task, complete_todo};
    use crate::config::ProgressionConfig;
    use crate::engine::error::EngineError;
    use crate::model::character::Character;
    use crate::model::strength::StrengthLadder;
    use crate::model::task::{HabitKind, RepeatPattern, Task, TaskDetails, TaskKind, TaskStatus};
    use uuid::Uuid;

    fn setup() -> (Uuid, Character) {
        let user = Uuid::new_v4();
        (user, Character::new(user))
    }

    #[test]
    fn good_habit_grants_exp_and_strength() {
        let (user, character) = setup();
        let habit = Task::habit(user, "stretch", HabitKind::Good);

        let done = complete_habit(&habit, &character, &ProgressionConfig::default()).unwrap();

        assert_eq!(done.exp_gained, 10);
        assert_eq!(done.character.current_exp, 10);
        assert_eq!(done.task.strength, StrengthLadder::Strong);
        assert_eq!(done.task.details, habit.details);
    }

    #[test]
    fn bad_habit_costs_hp_floored_at_zero_and_repeats() {
        let (user, mut character) = setup();
        character.current_hp = 7;
        let mut habit = Task::habit(user, "doomscroll", HabitKind::Bad);
        let config = ProgressionConfig::default();

        let first = complete_habit(&habit, &character, &config).unwrap();
        assert_eq!(first.character.current_hp, 2);
        assert_eq!(first.hp_lost, 5);
        assert_eq!(first.character.current_exp, 0);
        assert_eq!(first.task.strength, StrengthLadder::Weak);

        habit = first.task;
        let second = complete_habit(&habit, &first.character, &config).unwrap();
        assert_eq!(second.character.current_hp, 0);
        assert_eq!(second.hp_lost, 2);
        assert_eq!(second.task.strength, StrengthLadder::Fragile);

        let third = complete_habit(&second.task, &second.character, &config).unwrap();
        assert_eq!(third.character.current_hp, 0);
        assert_eq!(third.task.strength, StrengthLadder::Fragile);
    }

    #[test]
    fn daily_completes_once() {
        let (user, character) = setup();
        let daily = Task::daily(user, "water plants", RepeatPattern::default());
        let config = ProgressionConfig::default();

        let done = complete_daily(&daily, &character, &config).unwrap();
        assert_eq!(done.character.current_exp, 15);
        assert!(matches!(
            done.task.details,
            TaskDetails::Daily {
                status: TaskStatus::Completed,
                ..
            }
        ));

        let err = complete_daily(&done.task, &done.character, &config).unwrap_err();
        assert_eq!(err, EngineError::AlreadyCompleted(daily.id));
    }

    #[test]
    fn todo_completes_once() {
        let (user, character) = setup();
        let todo = Task::todo(user, "file taxes", 1_900_000_000_000);
        let config = ProgressionConfig::default();

        let done = complete_todo(&todo, &character, &config).unwrap();
        assert_eq!(done.exp_gained, 20);
        assert_eq!(done.task.strength, StrengthLadder::Strong);

        let err = complete_todo(&done.task, &done.character, &config).unwrap_err();
        assert_eq!(err, EngineError::AlreadyCompleted(todo.id));
    }

    #[test]
    fn reward_can_level_up_actor() {
        let (user, mut character) = setup();
        character.current_exp = 90;
        let todo = Task::todo(user, "ship release", 0);

        let done = complete_todo(&todo, &character, &ProgressionConfig::default()).unwrap();
        assert_eq!(done.levels_gained, 1);
        assert_eq!(done.character.current_level, 2);
        assert_eq!(done.character.current_exp, 10);
    }

    #[test]
    fn mismatched_rule_is_rejected() {
        let (user, character) = setup();
        let todo = Task::todo(user, "todo", 0);
        let err = complete_daily(&todo, &character, &ProgressionConfig::default()).unwrap_err();
        assert_eq!(
            err,
            EngineError::WrongTaskKind {
                task_id: todo.id,
                expected: TaskKind::Daily,
                actual: TaskKind::Todo,
            }
        );
    }

    #[test]
    fn dispatch_uses_task_kind() {
        let (user, character) = setup();
        let daily = Task::daily(user, "journal", RepeatPattern::default());
        let done = complete_task(&daily, &character, &ProgressionConfig::default()).unwrap();
        assert_eq!(done.exp_gained, 15);
    }
}
