//! Identity assertions carried by one federated authentication event.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::Display;

use crate::claim_path;

/// Where a set of OIDC claims came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ClaimSourceKind {
    AccessToken,
    IdToken,
    UserInfo,
}

/// One claims payload, e.g. the ID token's claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSource {
    pub kind: ClaimSourceKind,
    pub claims: Map<String, Value>,
}

/// A single SAML attribute: a name, an optional friendly name, and its values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SamlAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl SamlAttribute {
    pub fn new<I, V>(name: impl Into<String>, friendly_name: Option<&str>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        SamlAttribute {
            name: name.into(),
            friendly_name: friendly_name.map(str::to_string),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// An attribute statement of a SAML assertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeStatement(Vec<SamlAttribute>);

impl AttributeStatement {
    pub fn new(attributes: Vec<SamlAttribute>) -> Self {
        AttributeStatement(attributes)
    }

    pub fn attributes(&self) -> &[SamlAttribute] {
        &self.0
    }
}

/// Everything the identity provider asserted about the user for one login.
///
/// Claim sources are consulted in insertion order; use the `with_*` builders
/// in the order access token, ID token, userinfo. `attribute_statements` is
/// `None` when the assertion carried no attribute statements at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalContext {
    #[serde(default)]
    claim_sources: Vec<ClaimSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_statements: Option<Vec<AttributeStatement>>,
}

impl PrincipalContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context holding a single set of claims, treated as ID-token claims.
    ///
    /// Non-object values produce an empty claim set.
    pub fn from_claims(claims: Value) -> Self {
        Self::new().with_id_token(claims)
    }

    /// Context holding only SAML attribute statements.
    pub fn from_attribute_statements(statements: Vec<AttributeStatement>) -> Self {
        Self::new().with_attribute_statements(statements)
    }

    pub fn with_access_token(self, claims: Value) -> Self {
        self.with_claim_source(ClaimSourceKind::AccessToken, claims)
    }

    pub fn with_id_token(self, claims: Value) -> Self {
        self.with_claim_source(ClaimSourceKind::IdToken, claims)
    }

    pub fn with_userinfo(self, claims: Value) -> Self {
        self.with_claim_source(ClaimSourceKind::UserInfo, claims)
    }

    /// Add a claim source consulted after the ones already present.
    pub fn with_claim_source(mut self, kind: ClaimSourceKind, claims: Value) -> Self {
        let claims = match claims {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.claim_sources.push(ClaimSource { kind, claims });
        self
    }

    /// Append attribute statements in assertion order.
    pub fn with_attribute_statements(mut self, statements: Vec<AttributeStatement>) -> Self {
        self.attribute_statements
            .get_or_insert_with(Vec::new)
            .extend(statements);
        self
    }

    pub fn claim_sources(&self) -> &[ClaimSource] {
        &self.claim_sources
    }

    pub fn attribute_statements(&self) -> Option<&[AttributeStatement]> {
        self.attribute_statements.as_deref()
    }

    /// Resolve a dotted claim path against every claim source in order; the
    /// first non-null value wins.
    pub fn claim(&self, path: &str) -> Option<&Value> {
        let segments = claim_path::split_claim_path(path);
        self.claim_sources
            .iter()
            .find_map(|source| claim_path::resolve_segments(&source.claims, segments.as_slice()))
    }
}
