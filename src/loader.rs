use sha2::{Digest, Sha256};

use crate::error::MapperError;
use crate::types::MapperModel;

/// Parse the persisted representation of a mapper set: a JSON array of
/// `{ "name", "identityProviderMapper", "config" }` objects.
///
/// Only the JSON shape is checked here; the settings of each mapper are
/// validated when the engine builds its rules.
///
/// Example:
/// ```rust
/// use idp_group_mappers::load_mapper_models;
/// let text = r#"[
///     {
///         "name": "staff",
///         "identityProviderMapper": "saml-group-idp-mapper",
///         "config": { "attribute.name": "Role", "attribute.value": "staff", "group": "/Staff" }
///     }
/// ]"#;
/// let models = load_mapper_models(text).unwrap();
/// assert_eq!(models.len(), 1);
/// assert_eq!(models[0].config["group"], "/Staff");
/// ```
pub fn load_mapper_models(text: &str) -> Result<Vec<MapperModel>, MapperError> {
    Ok(serde_json::from_str(text)?)
}

/// Hex-encoded SHA-256 of the canonical JSON form of a mapper set.
///
/// The hash depends only on the mappers, never on the layout of the text
/// they were read from.
pub fn models_hash(models: &[MapperModel]) -> Result<String, MapperError> {
    Ok(source_hash(&serde_json::to_string(models)?))
}

fn source_hash(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}
