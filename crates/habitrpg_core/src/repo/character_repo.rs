//! Character repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load the one character owned by each user.
//!
//! # Invariants
//! - Write paths call `Character::validate()` before SQL mutations.
//! - Read paths reject rows that fail decoding or validation.

use crate::model::character::{Character, CharacterId};
use crate::model::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::{exp_from_db, exp_to_db, parse_uuid_column};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const CHARACTER_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    current_hp,
    max_hp,
    current_mana,
    max_mana,
    current_exp,
    current_level,
    strength,
    dexterity,
    intelligence,
    vigor,
    unallocated_stat_points
FROM characters";

/// Repository interface for character persistence.
pub trait CharacterRepository {
    fn create_character(&self, character: &Character) -> RepoResult<CharacterId>;
    fn update_character(&self, character: &Character) -> RepoResult<()>;
    fn get_character(&self, id: CharacterId) -> RepoResult<Option<Character>>;
    fn get_character_by_user(&self, user_id: UserId) -> RepoResult<Option<Character>>;
}

/// SQLite-backed character repository.
pub struct SqliteCharacterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCharacterRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_where(&self, column: &str, id: Uuid) -> RepoResult<Option<Character>> {
        let row = self
            .conn
            .query_row(
                &format!("{CHARACTER_SELECT_SQL} WHERE {column} = ?1;"),
                [id.to_string()],
                |row| Ok(parse_character_row(row)),
            )
            .optional()?;

        row.transpose()
    }
}

impl CharacterRepository for SqliteCharacterRepository<'_> {
    fn create_character(&self, character: &Character) -> RepoResult<CharacterId> {
        character.validate()?;

        self.conn.execute(
            "INSERT INTO characters (
                uuid,
                user_uuid,
                current_hp,
                max_hp,
                current_mana,
                max_mana,
                current_exp,
                current_level,
                strength,
                dexterity,
                intelligence,
                vigor,
                unallocated_stat_points
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
            params![
                character.id.to_string(),
                character.user_id.to_string(),
                character.current_hp,
                character.max_hp,
                character.current_mana,
                character.max_mana,
                exp_to_db(character.current_exp)?,
                character.current_level,
                character.strength,
                character.dexterity,
                character.intelligence,
                character.vigor,
                character.unallocated_stat_points,
            ],
        )?;

        Ok(character.id)
    }

    fn update_character(&self, character: &Character) -> RepoResult<()> {
        character.validate()?;

        let changed = self.conn.execute(
            "UPDATE characters
             SET
                current_hp = ?2,
                max_hp = ?3,
                current_mana = ?4,
                max_mana = ?5,
                current_exp = ?6,
                current_level = ?7,
                strength = ?8,
                dexterity = ?9,
                intelligence = ?10,
                vigor = ?11,
                unallocated_stat_points = ?12,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                character.id.to_string(),
                character.current_hp,
                character.max_hp,
                character.current_mana,
                character.max_mana,
                exp_to_db(character.current_exp)?,
                character.current_level,
                character.strength,
                character.dexterity,
                character.intelligence,
                character.vigor,
                character.unallocated_stat_points,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(character.id));
        }

        Ok(())
    }

    fn get_character(&self, id: CharacterId) -> RepoResult<Option<Character>> {
        self.get_where("uuid", id)
    }

    fn get_character_by_user(&self, user_id: UserId) -> RepoResult<Option<Character>> {
        self.get_where("user_uuid", user_id)
    }
}

fn parse_character_row(row: &Row<'_>) -> RepoResult<Character> {
    let character = Character {
        id: parse_uuid_column(row, "uuid", "characters.uuid")?,
        user_id: parse_uuid_column(row, "user_uuid", "characters.user_uuid")?,
        current_hp: row.get("current_hp")?,
        max_hp: row.get("max_hp")?,
        current_mana: row.get("current_mana")?,
        max_mana: row.get("max_mana")?,
        current_exp: exp_from_db(row.get("current_exp")?)?,
        current_level: row.get("current_level")?,
        strength: row.get("strength")?,
        dexterity: row.get("dexterity")?,
        intelligence: row.get("intelligence")?,
        vigor: row.get("vigor")?,
        unallocated_stat_points: row.get("unallocated_stat_points")?,
    };
    character.validate()?;
    Ok(character)
}
