//! Service-level error type.

use crate::engine::error::EngineError;
use crate::model::character::CharacterId;
use crate::model::estate::EstateId;
use crate::model::task::TaskId;
use crate::model::UserId;
use crate::repo::error::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure of one id-based service operation.
///
/// Any error rolls back the surrounding unit of work.
#[derive(Debug)]
pub enum ServiceError {
    Engine(EngineError),
    Repo(RepoError),
    CharacterNotFound(CharacterId),
    /// The user has no character yet.
    ActorNotRegistered(UserId),
    EstateNotFound(EstateId),
    /// Missing, or owned by another user.
    TaskNotFound(TaskId),
    AlreadyRegistered(UserId),
}

impl ServiceError {
    /// Stable machine-readable code used in logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Engine(err) => err.code(),
            Self::Repo(err) => err.code(),
            Self::CharacterNotFound(_) => "character_not_found",
            Self::ActorNotRegistered(_) => "actor_not_registered",
            Self::EstateNotFound(_) => "estate_not_found",
            Self::TaskNotFound(_) => "task_not_found",
            Self::AlreadyRegistered(_) => "already_registered",
        }
    }

    /// Returns whether the caller caused the failure (a 4xx-style outcome)
    /// rather than storage or corrupt data.
    pub fn is_user_facing(&self) -> bool {
        match self {
            Self::Engine(EngineError::CorruptState(_)) | Self::Repo(_) => false,
            Self::Engine(_)
            | Self::CharacterNotFound(_)
            | Self::ActorNotRegistered(_)
            | Self::EstateNotFound(_)
            | Self::TaskNotFound(_)
            | Self::AlreadyRegistered(_) => true,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::CharacterNotFound(id) => write!(f, "character not found: {id}"),
            Self::ActorNotRegistered(id) => write!(f, "user has no character: {id}"),
            Self::EstateNotFound(id) => write!(f, "estate not found: {id}"),
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::AlreadyRegistered(id) => write!(f, "user already registered: {id}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EngineError> for ServiceError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Repo(value.into())
    }
}
