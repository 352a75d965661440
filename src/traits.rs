use crate::types::{GroupPath, GroupRef, SyncMode};

/// The local realm, as far as group mappers need it.
pub trait RealmGroups {
    /// Look up a group by its full path, e.g. `/Parent/Child`.
    fn find_group_by_path(&self, path: &GroupPath) -> Option<GroupRef>;

    /// Sync mode used by mappers configured with `INHERIT`.
    fn default_sync_mode(&self) -> SyncMode {
        SyncMode::Legacy
    }
}

/// The local user being federated.
///
/// Both operations are idempotent and synchronized by the implementation;
/// mappers issue them whenever their decision table says so.
pub trait UserBinding {
    fn join_group(&self, group: &GroupRef);

    fn leave_group(&self, group: &GroupRef);
}
