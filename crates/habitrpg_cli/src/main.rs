//! Operator CLI for the progression store.
//!
//! Registers players, records task completions, inspects their state and
//! runs the daily production batch. An external scheduler is expected to call `habitrpg produce` once
//! every 24 hours.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use habitrpg_core::{
    core_version, default_log_level, init_logging, now_epoch_ms, open_db, Building,
    EstateService, HabitKind, PlayerService, ProgressionConfig, RepeatPattern, StatAllocation,
    Task, TaskId, TaskKind, TaskService, UserId,
};
use log::info;
use std::path::{Path, PathBuf};

/// HabitRPG progression engine
#[derive(Parser)]
#[command(name = "habitrpg", version = core_version(), about = "Progression and economy engine", long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "HABITRPG_DB", value_name = "FILE", default_value = "habitrpg.db")]
    db: PathBuf,

    /// Absolute directory for rotating log files; logging is off when unset
    #[arg(long, env = "HABITRPG_LOG_DIR", value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "HABITRPG_LOG_LEVEL", default_value = default_log_level())]
    log_level: String,

    /// JSON file overriding progression constants
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the character and estate of a user
    Register {
        #[arg(value_name = "USER_ID")]
        user: UserId,
    },

    /// Print a user's character and estate as JSON
    Show {
        #[arg(value_name = "USER_ID")]
        user: UserId,
    },

    /// Grant experience to a user's character
    GainExp {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },

    /// Spend unallocated stat points
    Allocate {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        strength: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        dexterity: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        intelligence: i64,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        vigor: i64,
    },

    /// Set one building level on a user's estate
    Build {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        /// house|sawmill|quarry|iron_mine|healing_pool|training_buddy
        building: String,
        level: u32,
    },

    /// Add a task for a user and print its id
    AddTask {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        /// habit|daily|todo
        kind: String,
        name: String,
        /// Record the habit as a bad one
        #[arg(long)]
        bad: bool,
        /// Todo due date in epoch milliseconds
        #[arg(long, default_value_t = 0)]
        due_ms: i64,
    },

    /// Print a user's tasks as JSON, newest first
    Tasks {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        /// Only list tasks of this kind
        #[arg(long)]
        kind: Option<String>,
    },

    /// Complete a task on behalf of its owner
    Complete {
        #[arg(value_name = "USER_ID")]
        user: UserId,
        #[arg(value_name = "TASK_ID")]
        task: TaskId,
    },

    /// Run the daily production batch over every estate
    Produce {
        /// Batch timestamp in epoch milliseconds (defaults to now)
        #[arg(long)]
        now_ms: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(dir) = &cli.log_dir {
        let dir = dir
            .to_str()
            .ok_or_else(|| anyhow!("log dir is not valid UTF-8: {}", dir.display()))?;
        init_logging(&cli.log_level, dir).map_err(|err| anyhow!(err))?;
    }

    let config = load_config(cli.config.as_deref())?;
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    info!(
        "event=cli_start module=cli status=ok db={} core_version={}",
        cli.db.display(),
        core_version()
    );

    let services = Services {
        players: PlayerService::new(&conn, config.clone()),
        tasks: TaskService::new(&conn, config.clone()),
        estates: EstateService::new(&conn, config),
    };
    run(cli.command, &services)
}

struct Services<'conn> {
    players: PlayerService<'conn>,
    tasks: TaskService<'conn>,
    estates: EstateService<'conn>,
}

fn run(command: Command, services: &Services<'_>) -> Result<()> {
    let Services {
        players,
        tasks,
        estates,
    } = services;
    match command {
        Command::Register { user } => {
            let player = players.register(user)?;
            println!("{}", serde_json::to_string_pretty(&player.character)?);
            println!("{}", serde_json::to_string_pretty(&player.estate)?);
        }
        Command::Show { user } => {
            let character = players.character_of(user)?;
            let estate = estates.estate_of(user)?;
            println!("{}", serde_json::to_string_pretty(&character)?);
            println!("{}", serde_json::to_string_pretty(&estate)?);
        }
        Command::GainExp { user, amount } => {
            let character = players.character_of(user)?;
            let updated = players.gain_exp(character.id, amount)?;
            println!(
                "level={} exp={} hp={}/{}",
                updated.current_level, updated.current_exp, updated.current_hp, updated.max_hp
            );
        }
        Command::Allocate {
            user,
            strength,
            dexterity,
            intelligence,
            vigor,
        } => {
            let character = players.character_of(user)?;
            let allocation = StatAllocation {
                strength,
                dexterity,
                intelligence,
                vigor,
            };
            let updated = players.allocate_stats(character.id, &allocation)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Command::Build {
            user,
            building,
            level,
        } => {
            let Some(building) = Building::parse(&building) else {
                bail!("unknown building `{building}`");
            };
            let estate = estates.estate_of(user)?;
            let updated = estates.set_building_level(estate.id, building, level)?;
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        Command::AddTask {
            user,
            kind,
            name,
            bad,
            due_ms,
        } => {
            let task = match parse_kind(&kind)? {
                TaskKind::Habit => {
                    let habit = if bad { HabitKind::Bad } else { HabitKind::Good };
                    Task::habit(user, name, habit)
                }
                TaskKind::Daily => Task::daily(user, name, RepeatPattern::default()),
                TaskKind::Todo => Task::todo(user, name, due_ms),
            };
            println!("{}", tasks.create_task(&task)?);
        }
        Command::Tasks { user, kind } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            println!("{}", serde_json::to_string_pretty(&tasks.list_tasks(user, kind)?)?);
        }
        Command::Complete { user, task } => {
            let (task, character) = tasks.complete_task(task, user)?;
            println!(
                "{} strength={} level={} exp={} hp={}/{}",
                task.id,
                task.strength.as_str(),
                character.current_level,
                character.current_exp,
                character.current_hp,
                character.max_hp
            );
            if character.is_exhausted() {
                println!("character is exhausted; rest to restore hp");
            }
        }
        Command::Produce { now_ms } => {
            let now = now_ms.unwrap_or_else(now_epoch_ms);
            let report = estates.run_daily_production_batch(now)?;
            for (estate_id, outcome) in &report {
                match outcome {
                    Ok(estate) => println!(
                        "{estate_id} ok wood={} iron={} stone={}",
                        estate.wood, estate.iron, estate.stone
                    ),
                    Err(err) => println!("{estate_id} {} {err}", err.code()),
                }
            }
            let failed = report
                .values()
                .filter(|outcome| matches!(outcome, Err(err) if !err.is_user_facing()))
                .count();
            if failed > 0 {
                bail!("{failed} estate(s) failed during production");
            }
        }
    }

    Ok(())
}

fn parse_kind(raw: &str) -> Result<TaskKind> {
    TaskKind::parse(raw).ok_or_else(|| anyhow!("unknown task kind `{raw}`"))
}

fn load_config(path: Option<&Path>) -> Result<ProgressionConfig> {
    let Some(path) = path else {
        return Ok(ProgressionConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid config {}", path.display()))
}
