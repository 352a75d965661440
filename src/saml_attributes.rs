//! Attribute lookup over SAML attribute statements.

use serde_json::Value;

use crate::types::{AttributeStatement, SamlAttribute};

/// All values of the attributes whose name or friendly name equals `key`.
///
/// Repeated attributes are treated as one attribute with several values:
/// values keep their order within a statement and statements are
/// concatenated in assertion order.
pub fn attribute_values<'a>(statements: &'a [AttributeStatement], key: &str) -> Vec<&'a Value> {
    collect_values(statements, |attribute| {
        attribute.name == key || attribute.friendly_name.as_deref() == Some(key)
    })
}

/// Values of the attributes selected by name and friendly name together.
///
/// Blank selectors are ignored; any other selector must equal the
/// corresponding attribute field exactly, surrounding whitespace included.
/// With both selectors blank nothing is selected.
pub fn attribute_values_by_names<'a>(
    statements: &'a [AttributeStatement],
    name: &str,
    friendly_name: &str,
) -> Vec<&'a Value> {
    let name = Some(name).filter(|n| !n.trim().is_empty());
    let friendly_name = Some(friendly_name).filter(|n| !n.trim().is_empty());
    if name.is_none() && friendly_name.is_none() {
        return Vec::new();
    }
    collect_values(statements, |attribute| {
        name.is_none_or(|n| attribute.name == n)
            && friendly_name.is_none_or(|f| attribute.friendly_name.as_deref() == Some(f))
    })
}

fn collect_values<'a, F>(statements: &'a [AttributeStatement], mut selects: F) -> Vec<&'a Value>
where
    F: FnMut(&SamlAttribute) -> bool,
{
    statements
        .iter()
        .flat_map(|statement| statement.attributes())
        .filter(|attribute| selects(attribute))
        .flat_map(|attribute| attribute.values.iter())
        .collect()
}
