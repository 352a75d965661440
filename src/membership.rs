//! The membership state machine shared by all group mappers.

use tracing::info;

use crate::error::MapperError;
use crate::traits::{RealmGroups, UserBinding};
use crate::types::{GroupPath, MembershipAction, SyncEvent};

/// The action a mapper takes for `event` given whether its rule matched.
///
/// | event        | matched | not matched |
/// |--------------|---------|-------------|
/// | ImportNew    | Join    | NoOp        |
/// | Update       | Join    | Leave       |
/// | UpdateLegacy | NoOp    | Leave       |
pub fn decide(event: SyncEvent, matched: bool) -> MembershipAction {
    match (event, matched) {
        (SyncEvent::ImportNew, true) | (SyncEvent::Update, true) => MembershipAction::Join,
        (SyncEvent::ImportNew, false) | (SyncEvent::UpdateLegacy, true) => MembershipAction::NoOp,
        (SyncEvent::Update, false) | (SyncEvent::UpdateLegacy, false) => MembershipAction::Leave,
    }
}

/// Carry out `action` on the user's membership of `group`.
///
/// The group is only looked up when there is something to do, so a missing
/// group fails a `Join` or `Leave` but never a `NoOp`.
pub fn apply<R, U>(
    action: MembershipAction,
    group: &GroupPath,
    realm: &R,
    user: &U,
) -> Result<MembershipAction, MapperError>
where
    R: RealmGroups + ?Sized,
    U: UserBinding + ?Sized,
{
    if action == MembershipAction::NoOp {
        return Ok(action);
    }

    let group_ref = realm
        .find_group_by_path(group)
        .ok_or_else(|| MapperError::GroupNotFound(group.to_string()))?;

    match action {
        MembershipAction::Join => user.join_group(&group_ref),
        MembershipAction::Leave => user.leave_group(&group_ref),
        MembershipAction::NoOp => {}
    }

    info!(
        event = "Membership",
        phase = "Apply",
        action = action.as_ref(),
        group = group_ref.to_string()
    );

    Ok(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::fixtures::{InMemoryRealm, RecordingUser};
    use std::str::FromStr;
    use yare::parameterized;

    #[parameterized(
        import_match = { SyncEvent::ImportNew, true, MembershipAction::Join },
        import_miss = { SyncEvent::ImportNew, false, MembershipAction::NoOp },
        update_match = { SyncEvent::Update, true, MembershipAction::Join },
        update_miss = { SyncEvent::Update, false, MembershipAction::Leave },
        legacy_match = { SyncEvent::UpdateLegacy, true, MembershipAction::NoOp },
        legacy_miss = { SyncEvent::UpdateLegacy, false, MembershipAction::Leave },
    )]
    fn test_decide(event: SyncEvent, matched: bool, expected: MembershipAction) {
        assert_eq!(decide(event, matched), expected);
    }

    #[test]
    fn test_apply_join_and_leave() {
        let realm = InMemoryRealm::with_groups(&["/Parent/Child"]);
        let user = RecordingUser::default();
        let group = GroupPath::from_str("/Parent/Child").unwrap();

        assert_eq!(
            apply(MembershipAction::Join, &group, &realm, &user).unwrap(),
            MembershipAction::Join
        );
        assert!(user.is_member_of("/Parent/Child"));

        assert_eq!(
            apply(MembershipAction::Leave, &group, &realm, &user).unwrap(),
            MembershipAction::Leave
        );
        assert!(!user.is_member_of("/Parent/Child"));
    }

    #[test]
    fn test_apply_missing_group() {
        let realm = InMemoryRealm::with_groups(&[]);
        let user = RecordingUser::default();
        let group = GroupPath::from_str("/Nope").unwrap();

        let result = apply(MembershipAction::Join, &group, &realm, &user);
        assert_eq!(result, Err(MapperError::GroupNotFound("/Nope".to_string())));
        assert_eq!(user.calls(), 0);
    }

    #[test]
    fn test_apply_noop_never_resolves_group() {
        let realm = InMemoryRealm::with_groups(&[]);
        let user = RecordingUser::default();
        let group = GroupPath::from_str("/Nope").unwrap();

        assert_eq!(
            apply(MembershipAction::NoOp, &group, &realm, &user).unwrap(),
            MembershipAction::NoOp
        );
        assert_eq!(realm.lookups(), 0);
        assert_eq!(user.calls(), 0);
    }
}
