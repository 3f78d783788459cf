//! Player use-case service.
//!
//! # Responsibility
//! - Register the character and estate of a new user.
//! - Apply experience, stat allocation and rest to a stored character.
//!
//! # Invariants
//! - Every mutation is one load-compute-save inside a unit of work.
//! - A failed engine call leaves the stored character untouched.

use crate::config::ProgressionConfig;
use crate::engine::error::EngineResult;
use crate::engine::production::recompute_bonuses;
use crate::engine::stats::StatAllocation;
use crate::engine::{experience, stats};
use crate::model::character::{Character, CharacterId};
use crate::model::estate::Estate;
use crate::model::UserId;
use crate::repo::character_repo::{CharacterRepository, SqliteCharacterRepository};
use crate::repo::estate_repo::{EstateRepository, SqliteEstateRepository};
use crate::repo::unit_of_work::in_unit_of_work;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::log_failure;
use log::info;
use rusqlite::Connection;

/// Records created for a newly registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub character: Character,
    pub estate: Estate,
}

/// Use-case service for character progression.
pub struct PlayerService<'conn> {
    conn: &'conn Connection,
    config: ProgressionConfig,
}

impl<'conn> PlayerService<'conn> {
    pub fn new(conn: &'conn Connection, config: ProgressionConfig) -> Self {
        Self { conn, config }
    }

    /// Creates the character and estate of `user_id` together.
    ///
    /// # Errors
    /// - `AlreadyRegistered` when the user already owns a character.
    pub fn register(&self, user_id: UserId) -> ServiceResult<Player> {
        let result: ServiceResult<Player> = in_unit_of_work(self.conn, |tx| {
            let characters = SqliteCharacterRepository::new(tx);
            let estates = SqliteEstateRepository::new(tx);
            if characters.get_character_by_user(user_id)?.is_some()
                || estates.get_estate_by_user(user_id)?.is_some()
            {
                return Err(ServiceError::AlreadyRegistered(user_id));
            }

            let character = Character::new(user_id);
            let estate = recompute_bonuses(&Estate::new(user_id))?;
            characters.create_character(&character)?;
            estates.create_estate(&estate)?;
            Ok(Player { character, estate })
        });

        match &result {
            Ok(player) => info!(
                "event=player_register module=service status=ok user_id={} character_id={} estate_id={}",
                user_id, player.character.id, player.estate.id
            ),
            Err(err) => log_failure("player_register", user_id, err),
        }
        result
    }

    /// Loads one character by id.
    pub fn character(&self, character_id: CharacterId) -> ServiceResult<Character> {
        SqliteCharacterRepository::new(self.conn)
            .get_character(character_id)?
            .ok_or(ServiceError::CharacterNotFound(character_id))
    }

    /// Loads the character owned by `user_id`.
    pub fn character_of(&self, user_id: UserId) -> ServiceResult<Character> {
        SqliteCharacterRepository::new(self.conn)
            .get_character_by_user(user_id)?
            .ok_or(ServiceError::ActorNotRegistered(user_id))
    }

    /// Grants experience and applies resulting level-ups.
    ///
    /// # Errors
    /// - `Engine(InvalidAmount)` when `amount < 0`.
    pub fn gain_exp(&self, character_id: CharacterId, amount: i64) -> ServiceResult<Character> {
        self.mutate("character_gain_exp", character_id, |character, config| {
            experience::gain_exp(character, amount, config)
        })
    }

    /// Spends unallocated stat points.
    ///
    /// # Errors
    /// - `Engine(NegativeAllocation | EmptyAllocation | InsufficientPoints)`.
    pub fn allocate_stats(
        &self,
        character_id: CharacterId,
        allocation: &StatAllocation,
    ) -> ServiceResult<Character> {
        self.mutate("character_allocate", character_id, |character, config| {
            stats::allocate(character, allocation, config)
        })
    }

    /// Refills hp and mana.
    pub fn restore(&self, character_id: CharacterId) -> ServiceResult<Character> {
        self.mutate("character_restore", character_id, |character, _| {
            stats::restore(character)
        })
    }

    fn mutate(
        &self,
        event: &'static str,
        character_id: CharacterId,
        apply: impl FnOnce(&Character, &ProgressionConfig) -> EngineResult<Character>,
    ) -> ServiceResult<Character> {
        let result: ServiceResult<Character> = in_unit_of_work(self.conn, |tx| {
            let characters = SqliteCharacterRepository::new(tx);
            let current = characters
                .get_character(character_id)?
                .ok_or(ServiceError::CharacterNotFound(character_id))?;
            let next = apply(&current, &self.config)?;
            characters.update_character(&next)?;
            Ok(next)
        });

        match &result {
            Ok(character) => info!(
                "event={} module=service status=ok character_id={} level={} exp={} hp={}/{} unallocated={}",
                event,
                character_id,
                character.current_level,
                character.current_exp,
                character.current_hp,
                character.max_hp,
                character.unallocated_stat_points
            ),
            Err(err) => log_failure(event, character_id, err),
        }
        result
    }
}
