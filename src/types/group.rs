//! Group paths and resolved group handles.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MapperError;

/// An absolute, slash-delimited group path (e.g. `/Parent/Child`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct GroupPath(String);

impl GroupPath {
    /// The path as configured, including the leading slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The group names from the top-level group down to the target group.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Name of the target group, i.e. the last path segment.
    pub fn name(&self) -> &str {
        self.segments().last().unwrap_or_default()
    }

    /// Path of the enclosing group, or `None` for a top-level group.
    pub fn parent(&self) -> Option<GroupPath> {
        let segments: Vec<&str> = self.segments().collect();
        if segments.len() < 2 {
            return None;
        }
        Some(GroupPath(format!("/{}", segments[..segments.len() - 1].join("/"))))
    }
}

impl Display for GroupPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupPath {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.starts_with('/') {
            return Err(MapperError::InvalidFormat(format!(
                "Failed to parse group path '{s}': expected an absolute path such as '/ParentGroup/ChildGroup' or '/TopLevelGroup'"
            )));
        }
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
        if segments.is_empty() {
            return Err(MapperError::InvalidFormat(format!(
                "Failed to parse group path '{s}': no group name given"
            )));
        }
        Ok(GroupPath(format!("/{}", segments.join("/"))))
    }
}

impl TryFrom<String> for GroupPath {
    type Error = MapperError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GroupPath> for String {
    fn from(value: GroupPath) -> Self {
        value.0
    }
}

/// A group resolved through the realm collaborator.
///
/// Obtained per evaluation and never cached across authentication events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GroupRef {
    id: String,
    path: GroupPath,
}

impl GroupRef {
    pub fn new(id: impl Into<String>, path: GroupPath) -> Self {
        GroupRef {
            id: id.into(),
            path,
        }
    }

    /// Storage identifier assigned by the realm.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &GroupPath {
        &self.path
    }
}

impl Display for GroupRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} ({})", self.path, self.id)
    }
}
