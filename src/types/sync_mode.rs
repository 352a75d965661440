//! Sync modes and the login events derived from them.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::MapperError;

/// Policy controlling whether later federated logins re-apply or revoke a
/// mapper's effect.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMode {
    /// Only the first login of a federated user applies the mapper.
    Import,
    /// Returning logins may only remove membership, never add it.
    Legacy,
    /// Every login converges membership toward the current match.
    Force,
    /// Use the default configured for the identity provider / realm.
    #[default]
    Inherit,
}

impl SyncMode {
    /// Resolve `Inherit` against the collaborator's default.
    pub fn resolve(self, default: SyncMode) -> Result<SyncMode, MapperError> {
        match (self, default) {
            (SyncMode::Inherit, SyncMode::Inherit) => Err(MapperError::MalformedConfig(
                "realm default sync mode cannot be INHERIT".to_string(),
            )),
            (SyncMode::Inherit, default) => Ok(default),
            (mode, _) => Ok(mode),
        }
    }
}

/// Whether the user is federated for the first time or is returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum LoginKind {
    FirstLogin,
    Returning,
}

/// The trigger a mapper receives from the authentication pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, Display, AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncEvent {
    /// First federation of this user.
    ImportNew,
    /// Returning login under `FORCE`.
    Update,
    /// Returning login under `LEGACY`.
    UpdateLegacy,
}

impl SyncEvent {
    /// The event fired for a login under an already resolved sync mode, or
    /// `None` when the mapper does not run at all.
    pub fn for_login(login: LoginKind, mode: SyncMode) -> Result<Option<SyncEvent>, MapperError> {
        match (login, mode) {
            (_, SyncMode::Inherit) => Err(MapperError::MalformedConfig(
                "sync mode INHERIT must be resolved before dispatch".to_string(),
            )),
            (LoginKind::FirstLogin, _) => Ok(Some(SyncEvent::ImportNew)),
            (LoginKind::Returning, SyncMode::Import) => Ok(None),
            (LoginKind::Returning, SyncMode::Force) => Ok(Some(SyncEvent::Update)),
            (LoginKind::Returning, SyncMode::Legacy) => Ok(Some(SyncEvent::UpdateLegacy)),
        }
    }
}
