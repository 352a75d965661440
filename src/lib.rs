//! Group-assignment mappers for identity brokering.
//!
//! When a user logs in through an external OIDC or SAML identity provider,
//! the mappers attached to that provider decide, from the asserted claims or
//! attributes, whether the local user joins, leaves, or keeps their
//! membership of a local group. [`MapperEngine`] holds the mappers of one
//! identity provider and runs them for each login against the realm and user
//! collaborators ([`RealmGroups`], [`UserBinding`]).

pub use engine::MapperEngine;
pub use error::MapperError;
pub use loader::load_mapper_models;
pub use traits::{RealmGroups, UserBinding};
pub use types::{
    AttributeStatement, ClaimSourceKind, ConfigVersion, GroupPath, GroupRef, KeyValuePair,
    LoginKind, MapperConfig, MapperKind, MapperModel, MapperProviderId, MembershipAction,
    PrincipalContext, ProviderDescriptor, RuleMatch, RuleOutcome, SamlAttribute, SyncEvent,
    SyncMode, descriptors, keys,
};

pub mod claim_path;
mod engine;
mod error;
mod loader;
mod mapper;
pub mod matcher;
pub mod membership;
pub mod metrics;
pub mod saml_attributes;
mod timers;
mod traits;
pub mod types;

#[cfg(test)]
mod tests;
