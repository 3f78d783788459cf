//! Estate repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist and load per-user estates.
//! - Enumerate estates for the daily production batch.
//!
//! # Invariants
//! - Write paths call `Estate::validate()` before SQL mutations.
//! - Read paths reject rows that fail decoding or validation.
//! - `list_estate_ids` is ordered by estate id for deterministic batches and
//!   decodes each id on its own, so one bad row never hides the others.

use crate::model::estate::{Estate, EstateId};
use crate::model::UserId;
use crate::repo::error::{RepoError, RepoResult};
use crate::repo::parse_uuid_column;
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

const ESTATE_SELECT_SQL: &str = "SELECT
    uuid,
    user_uuid,
    house,
    sawmill,
    quarry,
    iron_mine,
    healing_pool,
    training_buddy,
    wood,
    iron,
    stone,
    bonus_hp,
    bonus_exp,
    bonus_wood,
    bonus_iron,
    bonus_stone,
    last_production_at
FROM estates";

/// Repository interface for estate persistence.
pub trait EstateRepository {
    fn create_estate(&self, estate: &Estate) -> RepoResult<EstateId>;
    fn update_estate(&self, estate: &Estate) -> RepoResult<()>;
    fn get_estate(&self, id: EstateId) -> RepoResult<Option<Estate>>;
    fn get_estate_by_user(&self, user_id: UserId) -> RepoResult<Option<Estate>>;
    /// Every stored estate id; an undecodable id is reported in place.
    fn list_estate_ids(&self) -> RepoResult<Vec<RepoResult<EstateId>>>;
}

/// SQLite-backed estate repository.
pub struct SqliteEstateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEstateRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn get_where(&self, column: &str, id: Uuid) -> RepoResult<Option<Estate>> {
        let row = self
            .conn
            .query_row(
                &format!("{ESTATE_SELECT_SQL} WHERE {column} = ?1;"),
                [id.to_string()],
                |row| Ok(parse_estate_row(row)),
            )
            .optional()?;

        row.transpose()
    }
}

impl EstateRepository for SqliteEstateRepository<'_> {
    fn create_estate(&self, estate: &Estate) -> RepoResult<EstateId> {
        estate.validate()?;

        self.conn.execute(
            "INSERT INTO estates (
                uuid,
                user_uuid,
                house,
                sawmill,
                quarry,
                iron_mine,
                healing_pool,
                training_buddy,
                wood,
                iron,
                stone,
                bonus_hp,
                bonus_exp,
                bonus_wood,
                bonus_iron,
                bonus_stone,
                last_production_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17);",
            params![
                estate.id.to_string(),
                estate.user_id.to_string(),
                estate.house,
                estate.sawmill,
                estate.quarry,
                estate.iron_mine,
                estate.healing_pool,
                estate.training_buddy,
                estate.wood,
                estate.iron,
                estate.stone,
                estate.bonus_hp,
                estate.bonus_exp,
                estate.bonus_wood,
                estate.bonus_iron,
                estate.bonus_stone,
                estate.last_production_at,
            ],
        )?;

        Ok(estate.id)
    }

    fn update_estate(&self, estate: &Estate) -> RepoResult<()> {
        estate.validate()?;

        let changed = self.conn.execute(
            "UPDATE estates
             SET
                house = ?2,
                sawmill = ?3,
                quarry = ?4,
                iron_mine = ?5,
                healing_pool = ?6,
                training_buddy = ?7,
                wood = ?8,
                iron = ?9,
                stone = ?10,
                bonus_hp = ?11,
                bonus_exp = ?12,
                bonus_wood = ?13,
                bonus_iron = ?14,
                bonus_stone = ?15,
                last_production_at = ?16,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                estate.id.to_string(),
                estate.house,
                estate.sawmill,
                estate.quarry,
                estate.iron_mine,
                estate.healing_pool,
                estate.training_buddy,
                estate.wood,
                estate.iron,
                estate.stone,
                estate.bonus_hp,
                estate.bonus_exp,
                estate.bonus_wood,
                estate.bonus_iron,
                estate.bonus_stone,
                estate.last_production_at,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(estate.id));
        }

        Ok(())
    }

    fn get_estate(&self, id: EstateId) -> RepoResult<Option<Estate>> {
        self.get_where("uuid", id)
    }

    fn get_estate_by_user(&self, user_id: UserId) -> RepoResult<Option<Estate>> {
        self.get_where("user_uuid", user_id)
    }

    fn list_estate_ids(&self) -> RepoResult<Vec<RepoResult<EstateId>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT uuid FROM estates ORDER BY uuid ASC;")?;
        let mut rows = stmt.query([])?;
        let mut ids = Vec::new();

        while let Some(row) = rows.next()? {
            ids.push(parse_uuid_column(row, "uuid", "estates.uuid"));
        }

        Ok(ids)
    }
}

fn parse_estate_row(row: &Row<'_>) -> RepoResult<Estate> {
    let estate = Estate {
        id: parse_uuid_column(row, "uuid", "estates.uuid")?,
        user_id: parse_uuid_column(row, "user_uuid", "estates.user_uuid")?,
        house: row.get("house")?,
        sawmill: row.get("sawmill")?,
        quarry: row.get("quarry")?,
        iron_mine: row.get("iron_mine")?,
        healing_pool: row.get("healing_pool")?,
        training_buddy: row.get("training_buddy")?,
        wood: row.get("wood")?,
        iron: row.get("iron")?,
        stone: row.get("stone")?,
        bonus_hp: row.get("bonus_hp")?,
        bonus_exp: row.get("bonus_exp")?,
        bonus_wood: row.get("bonus_wood")?,
        bonus_iron: row.get("bonus_iron")?,
        bonus_stone: row.get("bonus_stone")?,
        last_production_at: row.get("last_production_at")?,
    };
    estate.validate()?;
    Ok(estate)
}
