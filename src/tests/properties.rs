use serde_json::{Map, Value, json};
use yare::parameterized;

use crate::claim_path::{resolve_claim, split_claim_path};
use crate::membership;
use crate::tests::fixtures::{InMemoryRealm, RecordingUser};
use crate::types::{GroupPath, MembershipAction, SyncEvent};
use crate::{MapperConfig, MapperEngine, MapperModel, MapperProviderId, PrincipalContext};

fn escape(key: &str) -> String {
    key.replace('\\', "\\\\").replace('.', "\\.")
}

#[parameterized(
    url = { "https://example.com/claims/roles" },
    dotted = { "address.locality" },
    many_dots = { "a.b.c.d" },
    backslash = { "domain\\user" },
    trailing_dot = { "version." },
)]
fn test_escaped_key_is_never_split(key: &str) {
    let escaped = escape(key);
    assert_eq!(split_claim_path(&escaped), vec![key.to_string()]);

    let mut claims = Map::new();
    claims.insert(key.to_string(), json!("found"));
    assert_eq!(resolve_claim(&claims, &escaped), Some(&json!("found")));
}

#[test]
fn test_escaped_segments_nest() {
    let path = format!("{}.{}", escape("a.b"), escape("c.d"));
    assert_eq!(split_claim_path(&path), vec!["a.b", "c.d"]);
}

#[test]
fn test_evaluation_is_pure_across_contexts() {
    let engine = MapperEngine::new(
        "oidc",
        vec![
            MapperModel::new("groups", MapperProviderId::ClaimToGroup)
                .with_config("claim", "groups")
                .with_config("claim.value", "admins")
                .with_config("group", "/Admins"),
            MapperModel::new("regex", MapperProviderId::AdvancedClaimToGroup)
                .with_config("claims", r#"[{"key":"email","value":".*@example\\.com"}]"#)
                .with_config("are.claim.values.regex", "TRUE")
                .with_config("group", "/Example"),
        ],
    )
    .unwrap();

    let contexts: Vec<Value> = vec![
        json!({}),
        json!({ "groups": ["admins"], "email": "alice@example.com" }),
        json!({ "groups": "admins", "email": "bob@example.org" }),
        json!({ "groups": null, "email": ["x@example.com"] }),
        json!({ "groups": { "admins": true } }),
    ];

    for claims in contexts {
        let ctx = PrincipalContext::from_claims(claims.clone());
        let first = engine.evaluate(&ctx).unwrap();
        let second = engine.evaluate(&ctx).unwrap();
        assert_eq!(first, second, "{claims}");
    }
}

#[test]
fn test_join_and_leave_are_idempotent() {
    let realm = InMemoryRealm::with_groups(&["/Staff"]);
    let group: GroupPath = "/Staff".parse().unwrap();

    let once = RecordingUser::default();
    membership::apply(MembershipAction::Join, &group, &realm, &once).unwrap();

    let twice = RecordingUser::default();
    membership::apply(MembershipAction::Join, &group, &realm, &twice).unwrap();
    membership::apply(MembershipAction::Join, &group, &realm, &twice).unwrap();
    assert_eq!(once.groups(), twice.groups());

    membership::apply(MembershipAction::Leave, &group, &realm, &once).unwrap();
    membership::apply(MembershipAction::Leave, &group, &realm, &twice).unwrap();
    membership::apply(MembershipAction::Leave, &group, &realm, &twice).unwrap();
    assert_eq!(once.groups(), twice.groups());
    assert!(twice.groups().is_empty());
}

#[test]
fn test_vacuous_match_follows_decision_table() {
    let config = MapperConfig::from_model(
        &MapperModel::new("empty", MapperProviderId::AdvancedAttributeToGroup)
            .with_config("attributes", "[]")
            .with_config("group", "/Staff"),
    )
    .unwrap();
    let matched = config.matches(&PrincipalContext::new()).unwrap();
    assert!(matched);
    assert_eq!(membership::decide(SyncEvent::ImportNew, matched), MembershipAction::Join);
    assert_eq!(membership::decide(SyncEvent::Update, matched), MembershipAction::Join);
    assert_eq!(membership::decide(SyncEvent::UpdateLegacy, matched), MembershipAction::NoOp);
}

#[test]
fn test_model_survives_config_round_trip() {
    let model = MapperModel::new("advanced", MapperProviderId::AdvancedClaimToGroup)
        .with_config("claims", r#"[{"key":"a","value":"1"},{"key":"a","value":"2"}]"#)
        .with_config("are.claim.values.regex", "false")
        .with_config("group", "/Parent/Child")
        .with_config("syncMode", "LEGACY");
    let config = MapperConfig::from_model(&model).unwrap();
    assert_eq!(MapperConfig::from_model(&config.to_model()).unwrap(), config);
}
