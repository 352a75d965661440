//! Dotted claim paths into nested OIDC claim payloads.
//!
//! Segments are separated by unescaped dots. A backslash escapes the
//! character that follows it, so `\.` is a literal dot inside a key and `\\`
//! a literal backslash. A trailing lone backslash is kept as-is.
//!
//! ```rust
//! use idp_group_mappers::claim_path::split_claim_path;
//!
//! assert_eq!(split_claim_path("address.locality"), vec!["address", "locality"]);
//! assert_eq!(split_claim_path(r"address\.locality.city"), vec!["address.locality", "city"]);
//! ```

use serde_json::{Map, Value};

const SEPARATOR: char = '.';
const ESCAPE: char = '\\';

/// Split a claim path into its key segments, honoring escapes.
pub fn split_claim_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(escaped) => current.push(escaped),
                None => current.push(ESCAPE),
            },
            SEPARATOR => segments.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }
    segments.push(current);
    segments
}

/// Resolve a claim path against a claims object.
///
/// Returns `None` when any segment is missing, when an intermediate node is
/// not an object (arrays are never indexed), or when the final value is
/// JSON `null`.
pub fn resolve_claim<'a>(claims: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    resolve_segments(claims, split_claim_path(path).as_slice())
}

/// Resolve already split segments; see [`resolve_claim`].
pub fn resolve_segments<'a, S: AsRef<str>>(
    claims: &'a Map<String, Value>,
    segments: &[S],
) -> Option<&'a Value> {
    let (last, parents) = segments.split_last()?;
    let mut node = claims;
    for segment in parents {
        node = node.get(segment.as_ref())?.as_object()?;
    }
    node.get(last.as_ref()).filter(|value| !value.is_null())
}
