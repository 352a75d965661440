//! Stable identifiers and administration metadata of the group mappers.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use super::sync_mode::SyncMode;

/// Config key of the target group path, shared by every mapper.
pub const GROUP: &str = "group";
/// Config key of the mapper's sync mode.
pub const SYNC_MODE: &str = "syncMode";
pub const CLAIM: &str = "claim";
pub const CLAIM_VALUE: &str = "claim.value";
pub const CLAIMS: &str = "claims";
pub const ARE_CLAIM_VALUES_REGEX: &str = "are.claim.values.regex";
pub const ATTRIBUTE_NAME: &str = "attribute.name";
pub const ATTRIBUTE_FRIENDLY_NAME: &str = "attribute.friendly.name";
pub const ATTRIBUTE_VALUE: &str = "attribute.value";
pub const ATTRIBUTES: &str = "attributes";
pub const ARE_ATTRIBUTE_VALUES_REGEX: &str = "are.attribute.values.regex";

pub const DISPLAY_CATEGORY: &str = "Group Importer";

/// Identity provider types the mappers can be attached to.
pub const KEYCLOAK_OIDC_PROVIDER: &str = "keycloak-oidc";
pub const OIDC_PROVIDER: &str = "oidc";
pub const SAML_PROVIDER: &str = "saml";

const OIDC_COMPATIBLE: &[&str] = &[KEYCLOAK_OIDC_PROVIDER, OIDC_PROVIDER];
const SAML_COMPATIBLE: &[&str] = &[SAML_PROVIDER];

const CLAIM_PATH_HELP: &str = "You can reference nested claims using a '.', i.e. 'address.locality'. To use dot (.) literally, escape it with backslash (\\.)";

/// The stable provider id of each mapper.
#[derive(
    Debug,
    Clone,
    Copy,
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
pub enum MapperProviderId {
    #[serde(rename = "oidc-group-idp-mapper")]
    #[strum(serialize = "oidc-group-idp-mapper")]
    ClaimToGroup,
    #[serde(rename = "oidc-advanced-group-idp-mapper")]
    #[strum(serialize = "oidc-advanced-group-idp-mapper")]
    AdvancedClaimToGroup,
    #[serde(rename = "saml-group-idp-mapper")]
    #[strum(serialize = "saml-group-idp-mapper")]
    AttributeToGroup,
    #[serde(rename = "saml-advanced-group-idp-mapper")]
    #[strum(serialize = "saml-advanced-group-idp-mapper")]
    AdvancedAttributeToGroup,
}

impl MapperProviderId {
    /// Administration metadata for this mapper.
    pub fn descriptor(self) -> &'static ProviderDescriptor {
        DESCRIPTORS
            .iter()
            .find(|descriptor| descriptor.id == self)
            .unwrap_or(&DESCRIPTORS[0])
    }

    /// Identity provider types this mapper can be attached to.
    pub fn compatible_providers(self) -> &'static [&'static str] {
        match self {
            MapperProviderId::ClaimToGroup | MapperProviderId::AdvancedClaimToGroup => {
                OIDC_COMPATIBLE
            }
            MapperProviderId::AttributeToGroup | MapperProviderId::AdvancedAttributeToGroup => {
                SAML_COMPATIBLE
            }
        }
    }

    pub fn is_compatible_with(self, provider_type: &str) -> bool {
        self.compatible_providers().contains(&provider_type)
    }

    /// Every mapper accepts every sync mode, `INHERIT` included.
    pub fn supports_sync_mode(self, _mode: SyncMode) -> bool {
        true
    }
}

/// Widget type of a config property in the administration UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum PropertyType {
    String,
    Boolean,
    Map,
}

/// One configurable property of a mapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfigProperty {
    pub name: String,
    pub label: String,
    pub help_text: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

impl ConfigProperty {
    fn new(name: &str, label: &str, help_text: &str, property_type: PropertyType) -> Self {
        ConfigProperty {
            name: name.to_string(),
            label: label.to_string(),
            help_text: help_text.to_string(),
            property_type,
        }
    }
}

/// What a mapper advertises to the administration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ProviderDescriptor {
    pub id: MapperProviderId,
    pub display_category: String,
    pub display_type: String,
    pub help_text: String,
    pub compatible_providers: Vec<String>,
    pub config_properties: Vec<ConfigProperty>,
}

static DESCRIPTORS: Lazy<Vec<ProviderDescriptor>> = Lazy::new(|| {
    MapperProviderId::iter()
        .map(|id| ProviderDescriptor {
            id,
            display_category: DISPLAY_CATEGORY.to_string(),
            display_type: display_type(id).to_string(),
            help_text: help_text(id).to_string(),
            compatible_providers: id
                .compatible_providers()
                .iter()
                .map(|p| p.to_string())
                .collect(),
            config_properties: config_properties(id),
        })
        .collect()
});

/// Descriptors of all four group mappers.
pub fn descriptors() -> &'static [ProviderDescriptor] {
    &DESCRIPTORS
}

fn display_type(id: MapperProviderId) -> &'static str {
    match id {
        MapperProviderId::ClaimToGroup => "Claim to Group",
        MapperProviderId::AdvancedClaimToGroup => "Advanced Claim to Group",
        MapperProviderId::AttributeToGroup => "SAML Attribute to Group",
        MapperProviderId::AdvancedAttributeToGroup => "Advanced Attribute to Group",
    }
}

fn help_text(id: MapperProviderId) -> &'static str {
    match id {
        MapperProviderId::ClaimToGroup => {
            "If the claim exists and has the required value, the user will become a member of the specified group."
        }
        MapperProviderId::AdvancedClaimToGroup => {
            "If all claims exist and have the required values, the user will become a member of the specified group."
        }
        MapperProviderId::AttributeToGroup => {
            "If an attribute exists and has the required value, the user will become a member of the specified group."
        }
        MapperProviderId::AdvancedAttributeToGroup => {
            "If all attributes exist and have the required values, the user will become a member of the specified group."
        }
    }
}

fn group_property(condition: &str) -> ConfigProperty {
    ConfigProperty::new(
        GROUP,
        "Group Path",
        &format!(
            "Group to join if {condition}. Use the full group path. Ex. '/ParentGroup/ChildGroup' or '/TopLevelGroup'."
        ),
        PropertyType::String,
    )
}

fn config_properties(id: MapperProviderId) -> Vec<ConfigProperty> {
    match id {
        MapperProviderId::ClaimToGroup => vec![
            ConfigProperty::new(
                CLAIM,
                "Claim",
                &format!("Name of claim to search for in token. {CLAIM_PATH_HELP}"),
                PropertyType::String,
            ),
            ConfigProperty::new(
                CLAIM_VALUE,
                "Claim Value",
                "Value the claim must have.  If the claim is an array, then the value must be contained in the array.",
                PropertyType::String,
            ),
            group_property("claim is present"),
        ],
        MapperProviderId::AdvancedClaimToGroup => vec![
            ConfigProperty::new(
                CLAIMS,
                "Claims",
                &format!("Name and value of the claims to search for in token. {CLAIM_PATH_HELP}"),
                PropertyType::Map,
            ),
            ConfigProperty::new(
                ARE_CLAIM_VALUES_REGEX,
                "Regex Claim Values",
                "If enabled claim values are interpreted as regular expressions.",
                PropertyType::Boolean,
            ),
            group_property("all claims with specified values are present"),
        ],
        MapperProviderId::AttributeToGroup => vec![
            ConfigProperty::new(
                ATTRIBUTE_NAME,
                "Attribute Name",
                "Name of attribute to search for in assertion.  You can leave this blank and specify a friendly name instead.",
                PropertyType::String,
            ),
            ConfigProperty::new(
                ATTRIBUTE_FRIENDLY_NAME,
                "Friendly Name",
                "Friendly name of attribute to search for in assertion.  You can leave this blank and specify a name instead.",
                PropertyType::String,
            ),
            ConfigProperty::new(
                ATTRIBUTE_VALUE,
                "Attribute Value",
                "Value the attribute must have.  If the attribute is an array, then the value must be contained in the array.",
                PropertyType::String,
            ),
            group_property("attribute is present"),
        ],
        MapperProviderId::AdvancedAttributeToGroup => vec![
            ConfigProperty::new(
                ATTRIBUTES,
                "Attributes",
                "Name and (regex) value of the attributes to search for in token.  The configured name of an attribute is searched in SAML attribute name and attribute friendly name fields. Every given attribute description must be met to join the group. If the attribute is an array, then the value must be contained in the array. If an attribute can be found several times, then one match is sufficient.",
                PropertyType::Map,
            ),
            ConfigProperty::new(
                ARE_ATTRIBUTE_VALUES_REGEX,
                "Regex Attribute Values",
                "If enabled attribute values are interpreted as regular expressions.",
                PropertyType::Boolean,
            ),
            group_property("all attributes with specified values are present"),
        ],
    }
}
