use super::*;
use crate::tests::fixtures::{InMemoryRealm, RecordingUser};
use crate::types::{
    AttributeStatement, KeyValuePair, MapperProviderId, MembershipAction, SamlAttribute,
};
use insta::assert_json_snapshot;
use serde_json::json;
use yare::parameterized;


const GROUP: &str = "/Parent/Child";

#[derive(Clone)]
struct SharedLogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

struct SharedLogWriter(Arc<std::sync::Mutex<Vec<u8>>>);

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SharedLogBuffer {
    type Writer = SharedLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SharedLogWriter(Arc::clone(&self.0))
    }
}

impl std::io::Write for SharedLogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber on this thread and return its logs.
fn capture_logs<F: FnOnce()>(f: F) -> String {
    let buffer = SharedLogBuffer(Arc::new(std::sync::Mutex::new(Vec::new())));
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(buffer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        tracing::callsite::rebuild_interest_cache();
        f();
    });
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}

fn pairs_json(pairs: &[(&str, &str)]) -> String {
    let pairs: Vec<KeyValuePair> = pairs.iter().map(|(k, v)| KeyValuePair::new(*k, *v)).collect();
    serde_json::to_string(&pairs).unwrap()
}

fn advanced_claim_model(name: &str, pairs: &[(&str, &str)], regex: bool, mode: SyncMode) -> MapperModel {
    MapperModel::new(name, MapperProviderId::AdvancedClaimToGroup)
        .with_config("claims", pairs_json(pairs))
        .with_config("are.claim.values.regex", regex.to_string())
        .with_config("group", GROUP)
        .with_config("syncMode", mode.to_string())
}

fn advanced_attribute_model(name: &str, pairs: &[(&str, &str)], mode: SyncMode) -> MapperModel {
    MapperModel::new(name, MapperProviderId::AdvancedAttributeToGroup)
        .with_config("attributes", pairs_json(pairs))
        .with_config("are.attribute.values.regex", "false")
        .with_config("group", GROUP)
        .with_config("syncMode", mode.to_string())
}

fn oidc_engine(models: Vec<MapperModel>) -> MapperEngine {
    MapperEngine::new("oidc", models).expect("mappers should load")
}

fn realm() -> InMemoryRealm {
    InMemoryRealm::with_groups(&[GROUP, "/Parent", "/Staff"])
}

fn ab_claims(a: &str, b: &str) -> PrincipalContext {
    PrincipalContext::from_claims(json!({ "a": a, "b": b }))
}

fn assert_joined(user: &RecordingUser) {
    assert!(user.is_member_of(GROUP), "expected membership of {GROUP}");
}

fn assert_not_joined(user: &RecordingUser) {
    assert!(!user.is_member_of(GROUP), "unexpected membership of {GROUP}");
}

include!("scenarios.rs");
include!("sync_modes.rs");
include!("failures.rs");
