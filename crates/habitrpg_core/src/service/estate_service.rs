//! Estate use-case service and the daily production batch.
//!
//! # Responsibility
//! - Run production, bonus recomputation and building changes on stored
//!   estates.
//! - Drive the scheduled production batch over every estate.
//!
//! # Invariants
//! - Each estate is processed in its own unit of work; one failure never
//!   rolls back another estate.
//! - Estates are visited in ascending id order.

use crate::config::ProgressionConfig;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::production;
use crate::model::estate::{Building, Estate, EstateId};
use crate::model::UserId;
use crate::repo::estate_repo::{EstateRepository, SqliteEstateRepository};
use crate::repo::unit_of_work::in_unit_of_work;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::log_failure;
use log::info;
use rusqlite::Connection;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Per-estate outcome of one batch run.
pub type BatchReport = BTreeMap<EstateId, ServiceResult<Estate>>;

/// Use-case service for estates.
pub struct EstateService<'conn> {
    conn: &'conn Connection,
    config: ProgressionConfig,
}

impl<'conn> EstateService<'conn> {
    pub fn new(conn: &'conn Connection, config: ProgressionConfig) -> Self {
        Self { conn, config }
    }

    /// Loads one estate by id.
    pub fn estate(&self, estate_id: EstateId) -> ServiceResult<Estate> {
        SqliteEstateRepository::new(self.conn)
            .get_estate(estate_id)?
            .ok_or(ServiceError::EstateNotFound(estate_id))
    }

    /// Loads the estate owned by `user_id`.
    pub fn estate_of(&self, user_id: UserId) -> ServiceResult<Estate> {
        SqliteEstateRepository::new(self.conn)
            .get_estate_by_user(user_id)?
            .ok_or(ServiceError::ActorNotRegistered(user_id))
    }

    /// Produces resources for one estate at `now` (epoch ms).
    ///
    /// # Errors
    /// - `Engine(ProductionAlreadyDone)` inside the production interval;
    ///   stocks stay unchanged.
    pub fn produce(&self, estate_id: EstateId, now: i64) -> ServiceResult<Estate> {
        self.mutate("estate_produce", estate_id, |estate, config| {
            production::produce(estate, now, config)
        })
    }

    /// Recomputes hp and exp bonuses from current building levels.
    pub fn recompute_bonuses(&self, estate_id: EstateId) -> ServiceResult<Estate> {
        self.mutate("estate_recompute_bonuses", estate_id, |estate, _| {
            production::recompute_bonuses(estate)
        })
    }

    /// Sets one building level, then recomputes bonuses.
    pub fn set_building_level(
        &self,
        estate_id: EstateId,
        building: Building,
        level: u32,
    ) -> ServiceResult<Estate> {
        self.mutate("estate_set_building", estate_id, |estate, _| {
            production::set_building_level(estate, building, level)
        })
    }

    /// Runs production for every stored estate at `now`.
    ///
    /// Estates still inside their interval are reported as
    /// `ProductionAlreadyDone` and left untouched; other estates proceed.
    /// A row whose id cannot be decoded has no report key; it is logged,
    /// counted as failed and skipped.
    ///
    /// # Errors
    /// - Returns `Err` only when the estate list itself cannot be read.
    pub fn run_daily_production_batch(&self, now: i64) -> ServiceResult<BatchReport> {
        let ids = match SqliteEstateRepository::new(self.conn).list_estate_ids() {
            Ok(ids) => ids,
            Err(err) => {
                let err = ServiceError::from(err);
                log_failure("production_batch", Uuid::nil(), &err);
                return Err(err);
            }
        };

        info!(
            "event=production_batch module=service status=start now={} estates={}",
            now,
            ids.len()
        );

        let mut report = BatchReport::new();
        let mut produced = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;
        for id in ids {
            let id = match id {
                Ok(id) => id,
                Err(err) => {
                    let err = ServiceError::from(err);
                    log_failure("production_batch_estate", Uuid::nil(), &err);
                    failed += 1;
                    continue;
                }
            };
            let outcome = self.produce(id, now);
            match &outcome {
                Ok(_) => produced += 1,
                Err(ServiceError::Engine(EngineError::ProductionAlreadyDone { .. })) => {
                    skipped += 1
                }
                Err(_) => failed += 1,
            }
            report.insert(id, outcome);
        }

        info!(
            "event=production_batch module=service status=ok now={} total={} produced={} skipped={} failed={}",
            now,
            produced + skipped + failed,
            produced,
            skipped,
            failed
        );
        Ok(report)
    }

    fn mutate(
        &self,
        event: &'static str,
        estate_id: EstateId,
        apply: impl FnOnce(&Estate, &ProgressionConfig) -> EngineResult<Estate>,
    ) -> ServiceResult<Estate> {
        let result: ServiceResult<Estate> = in_unit_of_work(self.conn, |tx| {
            let estates = SqliteEstateRepository::new(tx);
            let current = estates
                .get_estate(estate_id)?
                .ok_or(ServiceError::EstateNotFound(estate_id))?;
            let next = apply(&current, &self.config)?;
            estates.update_estate(&next)?;
            Ok(next)
        });

        match &result {
            Ok(estate) => info!(
                "event={} module=service status=ok estate_id={} wood={} iron={} stone={} bonus_hp={} bonus_exp={}",
                event,
                estate_id,
                estate.wood,
                estate.iron,
                estate.stone,
                estate.bonus_hp,
                estate.bonus_exp
            ),
            Err(err) => log_failure(event, estate_id, err),
        }
        result
    }
}
