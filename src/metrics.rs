//! Vendor-agnostic metrics collection via a pluggable sink.
//!
//! The engine reports every evaluated mapper and every reload to a global
//! [`MetricsSink`]. Nothing is recorded until a sink is installed with
//! [`set_sink`], so consumers pick their own backend (Prometheus,
//! OpenTelemetry, plain logs) without this crate depending on any of them.
//!
//! ```ignore
//! use idp_group_mappers::MembershipAction;
//! use idp_group_mappers::metrics::{MetricsSink, ReloadStats, RuleStats};
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::Arc;
//!
//! struct JoinCounter {
//!     joins: AtomicU64,
//! }
//!
//! impl MetricsSink for JoinCounter {
//!     fn on_rule(&self, stats: &RuleStats) {
//!         if stats.action == MembershipAction::Join {
//!             self.joins.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn on_reload(&self, stats: &ReloadStats) {
//!         eprintln!("mapper set {} loaded", stats.version);
//!     }
//! }
//!
//! idp_group_mappers::metrics::set_sink(Arc::new(JoinCounter { joins: AtomicU64::new(0) }));
//! ```

use serde::Serialize;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, SystemTime};
use tracing::warn;

use crate::types::{ConfigVersion, MembershipAction, RuleOutcome, SyncEvent};

/// One mapper evaluated during a login, passed to [`MetricsSink::on_rule`].
#[derive(Debug, Clone, Serialize)]
pub struct RuleStats {
    /// Mapper name.
    pub mapper: String,
    /// The event the mapper handled; `None` when it was skipped or failed
    /// before dispatch.
    pub event: Option<SyncEvent>,
    /// The membership change carried out.
    pub action: MembershipAction,
    /// Whether the mapper failed.
    pub failed: bool,
    /// Time spent matching and applying.
    pub duration: Duration,
}

impl RuleStats {
    pub(crate) fn from_outcome(outcome: &RuleOutcome, duration: Duration) -> Self {
        let event = match outcome {
            RuleOutcome::Applied { event, .. } => Some(*event),
            RuleOutcome::Skipped { .. } | RuleOutcome::Failed { .. } => None,
        };
        RuleStats {
            mapper: outcome.mapper().to_string(),
            event,
            action: outcome.action(),
            failed: outcome.error().is_some(),
            duration,
        }
    }
}

/// A completed reload of the mapper set.
#[derive(Debug, Clone, Serialize)]
pub struct ReloadStats {
    /// Time when the reload completed.
    pub reload_time: SystemTime,
    /// Version of the mapper set now in effect.
    pub version: ConfigVersion,
}

/// Consumer of engine metrics.
///
/// Called synchronously from `MapperEngine`, possibly from many threads at
/// once. Implementations must not block.
pub trait MetricsSink: Send + Sync {
    fn on_rule(&self, stats: &RuleStats);

    fn on_reload(&self, stats: &ReloadStats);

    /// Called once per login with the time spent on all mappers.
    fn on_login(&self, _mappers: usize, _duration: Duration) {}
}

static SINK: OnceLock<Arc<dyn MetricsSink>> = OnceLock::new();

fn with_sink<F: FnOnce(&dyn MetricsSink)>(f: F) {
    if let Some(sink) = SINK.get() {
        f(sink.as_ref());
    }
}

/// Install the global metrics sink.
///
/// Only the first call takes effect; install the sink at startup.
pub fn set_sink(sink: Arc<dyn MetricsSink>) {
    if SINK.set(sink).is_err() {
        warn!(
            "Metrics sink was already initialized. Ignoring subsequent set_sink call. Set the sink before the first login."
        );
    }
}

pub(crate) fn record_rule(outcome: &RuleOutcome, duration: Duration) {
    with_sink(|sink| sink.on_rule(&RuleStats::from_outcome(outcome, duration)));
}

pub(crate) fn record_login(mappers: usize, duration: Duration) {
    with_sink(|sink| sink.on_login(mappers, duration));
}

pub(crate) fn record_reload(version: ConfigVersion) {
    with_sink(|sink| {
        sink.on_reload(&ReloadStats {
            reload_time: SystemTime::now(),
            version,
        })
    });
}
