//! Data model for group mappers.
//!
//! Canonical string forms:
//! - Group path: `/Parent/Child`, absolute and slash-delimited
//! - Sync mode: `IMPORT`, `LEGACY`, `FORCE`, `INHERIT`
//! - Mapper id: `oidc-group-idp-mapper`, `oidc-advanced-group-idp-mapper`,
//!   `saml-group-idp-mapper`, `saml-advanced-group-idp-mapper`

mod group;
mod mapper_config;
mod outcome;
mod principal_context;
mod provider;
mod sync_mode;

pub use group::{GroupPath, GroupRef};
pub use mapper_config::{KeyValuePair, MapperConfig, MapperKind, MapperModel};
pub use outcome::{ConfigVersion, MembershipAction, RuleMatch, RuleOutcome};
pub use principal_context::{
    AttributeStatement, ClaimSource, ClaimSourceKind, PrincipalContext, SamlAttribute,
};
pub use provider::{
    ConfigProperty, MapperProviderId, PropertyType, ProviderDescriptor, descriptors,
};
pub use sync_mode::{LoginKind, SyncEvent, SyncMode};

/// Config keys and identity provider type names used by the persisted
/// mapper representation.
pub mod keys {
    pub use super::provider::{
        ARE_ATTRIBUTE_VALUES_REGEX, ARE_CLAIM_VALUES_REGEX, ATTRIBUTE_FRIENDLY_NAME,
        ATTRIBUTE_NAME, ATTRIBUTE_VALUE, ATTRIBUTES, CLAIM, CLAIM_VALUE, CLAIMS, DISPLAY_CATEGORY,
        GROUP, KEYCLOAK_OIDC_PROVIDER, OIDC_PROVIDER, SAML_PROVIDER, SYNC_MODE,
    };
}
