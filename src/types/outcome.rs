//! Results of evaluating group mappers.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use strum_macros::AsRefStr;
use utoipa::ToSchema;

use crate::error::MapperError;

use super::sync_mode::SyncEvent;

/// What a mapper does to the user's membership of its group.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MembershipAction {
    Join,
    Leave,
    NoOp,
}

impl Display for MembershipAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_ref())
    }
}

/// Match result of one mapper against a principal context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub mapper: String,
    pub matched: Result<bool, MapperError>,
}

/// What happened to one mapper during a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RuleOutcome {
    /// The mapper ran; `action` was applied to `group`.
    Applied {
        mapper: String,
        group: String,
        event: SyncEvent,
        matched: bool,
        action: MembershipAction,
    },
    /// The sync mode does not run the mapper on this login.
    Skipped { mapper: String },
    /// The mapper failed; membership was left untouched.
    Failed { mapper: String, error: MapperError },
}

impl RuleOutcome {
    pub fn mapper(&self) -> &str {
        match self {
            RuleOutcome::Applied { mapper, .. }
            | RuleOutcome::Skipped { mapper }
            | RuleOutcome::Failed { mapper, .. } => mapper,
        }
    }

    /// The applied action; `NoOp` for skipped and failed mappers.
    pub fn action(&self) -> MembershipAction {
        match self {
            RuleOutcome::Applied { action, .. } => *action,
            RuleOutcome::Skipped { .. } | RuleOutcome::Failed { .. } => MembershipAction::NoOp,
        }
    }

    pub fn error(&self) -> Option<&MapperError> {
        match self {
            RuleOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl Display for RuleOutcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RuleOutcome::Applied {
                mapper,
                group,
                event,
                matched,
                action,
            } => write!(f, "{mapper}: {event} matched={matched} -> {action} {group}"),
            RuleOutcome::Skipped { mapper } => write!(f, "{mapper}: skipped"),
            RuleOutcome::Failed { mapper, error } => write!(f, "{mapper}: failed ({error})"),
        }
    }
}

/// Version metadata of the loaded mapper set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
pub struct ConfigVersion {
    /// SHA-256 of the canonical JSON form of the mapper representations.
    /// Equal for the same mappers whether they were loaded from text or
    /// passed as models.
    pub hash: String,
    /// Number of mappers in the set, failing ones included.
    pub mappers: usize,
}

impl Display for ConfigVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({} mappers)", self.hash, self.mappers)
    }
}
