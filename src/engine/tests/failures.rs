#[test]
fn test_missing_group_fails_only_that_rule() {
    let mut missing = advanced_claim_model("missing", &[("a", "value 1")], false, SyncMode::Force);
    missing.config.insert("group".to_string(), "/Nope".to_string());
    let engine = oidc_engine(vec![
        missing,
        advanced_claim_model("present", &[("a", "value 1")], false, SyncMode::Force),
    ]);
    let user = RecordingUser::default();

    let outcomes = engine
        .on_login(LoginKind::FirstLogin, &ab_claims("value 1", ""), &realm(), &user)
        .unwrap();
    assert_eq!(
        outcomes[0],
        RuleOutcome::Failed {
            mapper: "missing".to_string(),
            error: MapperError::GroupNotFound("/Nope".to_string()),
        }
    );
    assert_eq!(outcomes[1].action(), MembershipAction::Join);
    assert_eq!(user.groups(), vec![GROUP.to_string()]);
}

#[test]
fn test_missing_group_is_not_resolved_without_action() {
    let mut model = advanced_claim_model("missing", &[("a", "value 1")], false, SyncMode::Import);
    model.config.insert("group".to_string(), "/Nope".to_string());
    let engine = oidc_engine(vec![model]);
    let realm = realm();

    let outcomes = engine
        .on_login(LoginKind::FirstLogin, &ab_claims("other", ""), &realm, &RecordingUser::default())
        .unwrap();
    assert_eq!(outcomes[0].action(), MembershipAction::NoOp);
    assert!(outcomes[0].error().is_none());
    assert_eq!(realm.lookups(), 0);
}

#[parameterized(
    unclosed = { "(unclosed" },
    closes_anchor_group = { "value)( 1" },
    escapes_anchor_as_alternation = { "x)|(.*" },
)]
fn test_bad_regex_fails_rule_and_leaves_membership(pattern: &str) {
    let engine = oidc_engine(vec![advanced_claim_model(
        "bad-regex",
        &[("a", pattern)],
        true,
        SyncMode::Force,
    )]);
    let user = RecordingUser::member_of(&[GROUP]);

    let outcomes = engine
        .on_login(LoginKind::Returning, &ab_claims("value 1", ""), &realm(), &user)
        .unwrap();
    assert!(matches!(outcomes[0].error(), Some(MapperError::BadRegex(_))));
    assert_joined(&user);
    assert_eq!(user.calls(), 0);
}

#[parameterized(
    closes_anchor_group = { "value)( 1" },
    escapes_anchor_as_alternation = { "x)|(.*" },
)]
fn test_unbalanced_regex_never_joins(pattern: &str) {
    let engine = oidc_engine(vec![advanced_claim_model(
        "unbalanced",
        &[("a", pattern)],
        true,
        SyncMode::Force,
    )]);
    let user = RecordingUser::default();

    let outcomes = engine
        .on_login(LoginKind::FirstLogin, &ab_claims("value 1", "anything"), &realm(), &user)
        .unwrap();
    assert!(matches!(outcomes[0].error(), Some(MapperError::BadRegex(_))));
    assert_not_joined(&user);
    assert_eq!(user.calls(), 0);
}

#[parameterized(
    unknown_mapper = { "hardcoded-group-idp-mapper", "oidc", "unknown mapper type" },
    saml_mapper_on_oidc = { "saml-advanced-group-idp-mapper", "oidc", "cannot be attached to 'oidc'" },
    oidc_mapper_on_saml = { "oidc-advanced-group-idp-mapper", "saml", "cannot be attached to 'saml'" },
)]
fn test_unusable_mapper_is_kept_as_failing_rule(mapper_type: &str, provider_type: &str, message: &str) {
    let model = MapperModel {
        name: "unusable".to_string(),
        identity_provider_mapper: mapper_type.to_string(),
        config: [("group".to_string(), GROUP.to_string())].into_iter().collect(),
    };
    let engine = MapperEngine::new(provider_type, vec![model]).unwrap();
    assert_eq!(engine.current_version().unwrap().mappers, 1);
    assert!(engine.mappers().unwrap().is_empty());

    let outcomes = engine
        .on_login(LoginKind::FirstLogin, &PrincipalContext::new(), &realm(), &RecordingUser::default())
        .unwrap();
    match &outcomes[0] {
        RuleOutcome::Failed {
            error: MapperError::MalformedConfig(msg),
            ..
        } => assert!(msg.contains(message), "{msg}"),
        other => panic!("Expected MalformedConfig, got {other:?}"),
    }
}

#[test]
fn test_keycloak_oidc_accepts_claim_mappers() {
    let engine = MapperEngine::new(
        "keycloak-oidc",
        vec![advanced_claim_model("advanced", &[("a", "value 1")], false, SyncMode::Force)],
    )
    .unwrap();
    assert_eq!(engine.mappers().unwrap().len(), 1);
}

#[test]
fn test_invalid_json_is_load_error() {
    let result = MapperEngine::new_from_str("oidc", "{ not json");
    assert!(matches!(result, Err(MapperError::LoadError(_))));
}

#[test]
fn test_failures_are_logged() {
    let logs = capture_logs(|| {
        let engine = oidc_engine(vec![advanced_claim_model(
            "bad-regex",
            &[("a", "(unclosed")],
            true,
            SyncMode::Force,
        )]);
        engine
            .on_login(LoginKind::FirstLogin, &ab_claims("value 1", ""), &realm(), &RecordingUser::default())
            .unwrap();
    });
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("mapper=\"bad-regex\""), "{logs}");
    assert!(logs.contains("invalid regular expression"), "{logs}");
}

#[test]
fn test_joins_are_logged() {
    let logs = capture_logs(|| {
        let engine = sync_mode_engine(SyncMode::Force);
        engine
            .on_login(LoginKind::FirstLogin, &ab_claims("value 1", ""), &realm(), &RecordingUser::default())
            .unwrap();
    });
    assert!(logs.contains("event=\"Membership\""), "{logs}");
    assert!(logs.contains("action=\"join\""), "{logs}");
    assert!(logs.contains("event=\"Mapper\""), "{logs}");
}
