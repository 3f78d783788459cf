//! Core use-case services.
//!
//! # Responsibility
//! - Wrap each engine rule in a load-compute-save unit of work.
//! - Keep callers (CLI, scheduler) decoupled from storage details.
//!
//! # Invariants
//! - Services take ids, never pre-loaded records.
//! - Every failure is logged once with a stable `error_code`.

pub mod error;
pub mod estate_service;
pub mod player_service;
pub mod task_service;

use error::ServiceError;
use log::{error, warn};
use uuid::Uuid;

pub(crate) fn log_failure(event: &str, subject: Uuid, err: &ServiceError) {
    if err.is_user_facing() {
        warn!(
            "event={} module=service status=error subject={} error_code={} error={}",
            event,
            subject,
            err.code(),
            err
        );
    } else {
        error!(
            "event={} module=service status=error subject={} error_code={} error={}",
            event,
            subject,
            err.code(),
            err
        );
    }
}
