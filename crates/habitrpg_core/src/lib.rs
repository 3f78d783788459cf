//! Progression and economy engine for HabitRPG.
//! This crate is the single source of truth for leveling, rewards and estate
//! production rules.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{LevelCurve, ProgressionConfig, DAY_MS};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use engine::error::{EngineError, EngineResult};
pub use engine::experience::exp_required_for_level;
pub use engine::production::ResourceYield;
pub use engine::reward::Completion;
pub use engine::stats::StatAllocation;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::character::{Character, CharacterId};
pub use model::estate::{Building, Estate, EstateId};
pub use model::strength::StrengthLadder;
pub use model::task::{
    HabitKind, RepeatOn, RepeatPattern, RepeatUnit, Repeats, Task, TaskDetails, TaskId, TaskKind,
    TaskStatus,
};
pub use model::validation::ModelValidationError;
pub use model::{now_epoch_ms, UserId};
pub use repo::error::{RepoError, RepoResult};
pub use service::error::{ServiceError, ServiceResult};
pub use service::estate_service::{BatchReport, EstateService};
pub use service::player_service::{Player, PlayerService};
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
