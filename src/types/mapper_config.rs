//! Mapper rules and their persisted representation.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::MapperError;

use super::group::GroupPath;
use super::provider::{self, MapperProviderId};
use super::sync_mode::SyncMode;

/// One `{key, value}` entry of a multi-claim or multi-attribute rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValuePair {
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Display for KeyValuePair {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// The four rule variants and their variant-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapperKind {
    SingleClaim {
        claim: String,
        value: String,
    },
    MultiClaim {
        claims: Vec<KeyValuePair>,
        values_are_regex: bool,
    },
    SingleAttribute {
        name: String,
        friendly_name: String,
        value: String,
    },
    MultiAttribute {
        attributes: Vec<KeyValuePair>,
        values_are_regex: bool,
    },
}

impl MapperKind {
    pub fn provider_id(&self) -> MapperProviderId {
        match self {
            MapperKind::SingleClaim { .. } => MapperProviderId::ClaimToGroup,
            MapperKind::MultiClaim { .. } => MapperProviderId::AdvancedClaimToGroup,
            MapperKind::SingleAttribute { .. } => MapperProviderId::AttributeToGroup,
            MapperKind::MultiAttribute { .. } => MapperProviderId::AdvancedAttributeToGroup,
        }
    }
}

impl Display for MapperKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MapperKind::SingleClaim { claim, value } => write!(f, "claim {claim}={value}"),
            MapperKind::MultiClaim {
                claims,
                values_are_regex,
            } => write!(
                f,
                "claims [{}]{}",
                claims.iter().join(", "),
                if *values_are_regex { " (regex)" } else { "" }
            ),
            MapperKind::SingleAttribute {
                name,
                friendly_name,
                value,
            } => write!(f, "attribute {name}|{friendly_name}={value}"),
            MapperKind::MultiAttribute {
                attributes,
                values_are_regex,
            } => write!(
                f,
                "attributes [{}]{}",
                attributes.iter().join(", "),
                if *values_are_regex { " (regex)" } else { "" }
            ),
        }
    }
}

/// A validated group-mapper rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: MapperKind,
    pub group: GroupPath,
    #[serde(default)]
    pub sync_mode: SyncMode,
}

impl MapperConfig {
    pub fn new(name: impl Into<String>, kind: MapperKind, group: GroupPath, sync_mode: SyncMode) -> Self {
        MapperConfig {
            name: name.into(),
            kind,
            group,
            sync_mode,
        }
    }

    pub fn provider_id(&self) -> MapperProviderId {
        self.kind.provider_id()
    }

    /// Build a rule from its persisted representation.
    pub fn from_model(model: &MapperModel) -> Result<Self, MapperError> {
        let provider_id = MapperProviderId::from_str(&model.identity_provider_mapper).map_err(|_| {
            MapperError::MalformedConfig(format!(
                "mapper '{}': unknown mapper type '{}'",
                model.name, model.identity_provider_mapper
            ))
        })?;
        let config = &model.config;
        let malformed = |detail: String| MapperError::MalformedConfig(format!("mapper '{}': {detail}", model.name));

        let group = match config.get(provider::GROUP).map(|g| g.trim()) {
            None | Some("") => return Err(malformed(format!("missing '{}'", provider::GROUP))),
            Some(group) => GroupPath::from_str(group).map_err(|e| malformed(e.to_string()))?,
        };

        let sync_mode = match config.get(provider::SYNC_MODE) {
            None => SyncMode::Inherit,
            Some(mode) => SyncMode::from_str(mode)
                .map_err(|_| malformed(format!("unknown sync mode '{mode}'")))?,
        };

        let string = |key: &str| config.get(key).cloned().unwrap_or_default();

        let kind = match provider_id {
            MapperProviderId::ClaimToGroup => MapperKind::SingleClaim {
                claim: string(provider::CLAIM),
                value: string(provider::CLAIM_VALUE),
            },
            MapperProviderId::AdvancedClaimToGroup => MapperKind::MultiClaim {
                claims: parse_pairs(config.get(provider::CLAIMS))
                    .map_err(|e| malformed(format!("'{}': {e}", provider::CLAIMS)))?,
                values_are_regex: parse_flag(config.get(provider::ARE_CLAIM_VALUES_REGEX)),
            },
            MapperProviderId::AttributeToGroup => MapperKind::SingleAttribute {
                name: string(provider::ATTRIBUTE_NAME),
                friendly_name: string(provider::ATTRIBUTE_FRIENDLY_NAME),
                value: string(provider::ATTRIBUTE_VALUE),
            },
            MapperProviderId::AdvancedAttributeToGroup => MapperKind::MultiAttribute {
                attributes: parse_pairs(config.get(provider::ATTRIBUTES))
                    .map_err(|e| malformed(format!("'{}': {e}", provider::ATTRIBUTES)))?,
                values_are_regex: parse_flag(config.get(provider::ARE_ATTRIBUTE_VALUES_REGEX)),
            },
        };

        Ok(MapperConfig::new(model.name.clone(), kind, group, sync_mode))
    }

    /// The persisted representation of this rule.
    pub fn to_model(&self) -> MapperModel {
        let mut config = BTreeMap::new();
        config.insert(provider::GROUP.to_string(), self.group.to_string());
        config.insert(provider::SYNC_MODE.to_string(), self.sync_mode.to_string());
        let mut put = |key: &str, value: String| {
            config.insert(key.to_string(), value);
        };
        match &self.kind {
            MapperKind::SingleClaim { claim, value } => {
                put(provider::CLAIM, claim.clone());
                put(provider::CLAIM_VALUE, value.clone());
            }
            MapperKind::MultiClaim {
                claims,
                values_are_regex,
            } => {
                put(provider::CLAIMS, render_pairs(claims));
                put(provider::ARE_CLAIM_VALUES_REGEX, values_are_regex.to_string());
            }
            MapperKind::SingleAttribute {
                name,
                friendly_name,
                value,
            } => {
                put(provider::ATTRIBUTE_NAME, name.clone());
                put(provider::ATTRIBUTE_FRIENDLY_NAME, friendly_name.clone());
                put(provider::ATTRIBUTE_VALUE, value.clone());
            }
            MapperKind::MultiAttribute {
                attributes,
                values_are_regex,
            } => {
                put(provider::ATTRIBUTES, render_pairs(attributes));
                put(provider::ARE_ATTRIBUTE_VALUES_REGEX, values_are_regex.to_string());
            }
        }
        MapperModel {
            name: self.name.clone(),
            identity_provider_mapper: self.provider_id().to_string(),
            config,
        }
    }
}

impl Display for MapperConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} [{}] {} -> {} ({})",
            self.name,
            self.provider_id(),
            self.kind,
            self.group,
            self.sync_mode
        )
    }
}

/// A mapper as the collaborator persists it: a provider id plus a flat
/// string-to-string config map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapperModel {
    pub name: String,
    pub identity_provider_mapper: String,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
}

impl MapperModel {
    pub fn new(name: impl Into<String>, provider_id: MapperProviderId) -> Self {
        MapperModel {
            name: name.into(),
            identity_provider_mapper: provider_id.to_string(),
            config: BTreeMap::new(),
        }
    }

    /// Set one config entry and return the updated model.
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }
}

/// Parse the JSON array of `{key, value}` objects stored for a map property.
/// Order and duplicate keys are preserved; an absent or blank entry is empty.
fn parse_pairs(raw: Option<&String>) -> Result<Vec<KeyValuePair>, serde_json::Error> {
    match raw.map(|r| r.trim()) {
        None | Some("") => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw),
    }
}

fn render_pairs(pairs: &[KeyValuePair]) -> String {
    serde_json::to_string(pairs).unwrap_or_else(|_| "[]".to_string())
}

fn parse_flag(raw: Option<&String>) -> bool {
    raw.is_some_and(|r| r.trim().eq_ignore_ascii_case("true"))
}
