use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::timers::PhaseTimer;
use crate::traits::{RealmGroups, UserBinding};
use crate::types::{
    ConfigVersion, LoginKind, MapperConfig, MapperModel, PrincipalContext, RuleMatch, RuleOutcome,
    SyncEvent, SyncMode,
};
use crate::{error::MapperError, loader, metrics};

use tracing::{debug, info, warn};

/// A loaded mapper. Mappers that fail validation stay in the set, in their
/// configured position, and fail every login they take part in.
#[derive(Debug, Clone)]
struct RuleSlot {
    name: String,
    rule: Result<MapperConfig, MapperError>,
}

#[derive(Debug)]
struct MapperSet {
    rules: Vec<RuleSlot>,
    version: ConfigVersion,
}

impl MapperSet {
    fn compile(provider_type: &str, models: &[MapperModel], hash: String) -> Self {
        let rules: Vec<RuleSlot> = models
            .iter()
            .map(|model| compile_rule(provider_type, model))
            .collect();
        let version = ConfigVersion {
            hash,
            mappers: rules.len(),
        };
        MapperSet { rules, version }
    }
}

fn compile_rule(provider_type: &str, model: &MapperModel) -> RuleSlot {
    let rule = MapperConfig::from_model(model).and_then(|config| {
        if config.provider_id().is_compatible_with(provider_type) {
            Ok(config)
        } else {
            Err(MapperError::MalformedConfig(format!(
                "mapper '{}': {} cannot be attached to '{provider_type}' identity providers",
                model.name,
                config.provider_id()
            )))
        }
    });

    match &rule {
        Ok(config) => debug!(event = "Load", phase = "Compile", mapper = config.to_string()),
        Err(e) => warn!(
            event = "Load",
            phase = "Compile",
            mapper = model.name.as_str(),
            error = e.to_string()
        ),
    }

    RuleSlot {
        name: model.name.clone(),
        rule,
    }
}

/// The main engine handle. Cloneable and thread-safe.
///
/// Holds the group mappers attached to one identity provider, in configured
/// order, and runs them for each federated login.
#[derive(Clone)]
pub struct MapperEngine {
    provider_type: Arc<str>,
    inner: Arc<RwLock<MapperSet>>,
}

impl MapperEngine {
    /// Build an engine for an identity provider of type `provider_type`
    /// (`oidc`, `keycloak-oidc`, `saml`) from the persisted mapper set.
    pub fn new_from_str(provider_type: &str, text: &str) -> Result<Self, MapperError> {
        let models = loader::load_mapper_models(text)?;
        Self::new(provider_type, models)
    }

    pub fn new(provider_type: &str, models: Vec<MapperModel>) -> Result<Self, MapperError> {
        let hash = loader::models_hash(&models)?;
        let set = MapperSet::compile(provider_type, &models, hash);
        Ok(Self::from_set(provider_type, set))
    }

    fn from_set(provider_type: &str, set: MapperSet) -> Self {
        info!(
            event = "Load",
            phase = "Ready",
            provider_type,
            version = set.version.to_string()
        );
        MapperEngine {
            provider_type: Arc::from(provider_type),
            inner: Arc::new(RwLock::new(set)),
        }
    }

    pub fn provider_type(&self) -> &str {
        &self.provider_type
    }

    /// Replace the mapper set. On error the current set stays in effect.
    pub fn reload_from_str(&self, text: &str) -> Result<(), MapperError> {
        let models = loader::load_mapper_models(text)?;
        self.reload(models)
    }

    pub fn reload(&self, models: Vec<MapperModel>) -> Result<(), MapperError> {
        let hash = loader::models_hash(&models)?;
        let set = MapperSet::compile(&self.provider_type, &models, hash);
        self.swap(set)
    }

    fn swap(&self, set: MapperSet) -> Result<(), MapperError> {
        let version = set.version.clone();
        *self.inner.write()? = set;
        info!(event = "Reload", phase = "Swap", version = version.to_string());
        metrics::record_reload(version);
        Ok(())
    }

    pub fn current_version(&self) -> Result<ConfigVersion, MapperError> {
        Ok(self.inner.read()?.version.clone())
    }

    /// The mappers that passed validation, in configured order.
    pub fn mappers(&self) -> Result<Vec<MapperConfig>, MapperError> {
        let guard = self.inner.read()?;
        Ok(guard
            .rules
            .iter()
            .filter_map(|slot| slot.rule.as_ref().ok().cloned())
            .collect())
    }

    /// Match every mapper against `ctx` without touching any membership.
    pub fn evaluate(&self, ctx: &PrincipalContext) -> Result<Vec<RuleMatch>, MapperError> {
        let guard = self.inner.read()?;
        Ok(guard
            .rules
            .iter()
            .map(|slot| RuleMatch {
                mapper: slot.name.clone(),
                matched: slot
                    .rule
                    .as_ref()
                    .map_err(Clone::clone)
                    .and_then(|rule| rule.matches(ctx)),
            })
            .collect())
    }

    /// Run every mapper for one federated login, in configured order.
    ///
    /// A failing mapper neither joins nor leaves its group; it is reported
    /// as [`RuleOutcome::Failed`] and the remaining mappers still run.
    pub fn on_login<R, U>(
        &self,
        login: LoginKind,
        ctx: &PrincipalContext,
        realm: &R,
        user: &U,
    ) -> Result<Vec<RuleOutcome>, MapperError>
    where
        R: RealmGroups + ?Sized,
        U: UserBinding + ?Sized,
    {
        let guard = self.inner.read()?;
        let default_mode = realm.default_sync_mode();

        debug!(
            event = "Login",
            phase = "Start",
            login = login.to_string(),
            mappers = guard.rules.len(),
            version = guard.version.hash.as_str()
        );

        let mut total = Duration::ZERO;
        let mut outcomes = Vec::with_capacity(guard.rules.len());
        for slot in &guard.rules {
            let mut elapsed = Duration::ZERO;
            let outcome = {
                let _timer = PhaseTimer::new(&mut elapsed);
                run_rule(slot, login, default_mode, ctx, realm, user)
            };
            total += elapsed;

            if let RuleOutcome::Failed { mapper, error } = &outcome {
                warn!(
                    event = "Login",
                    phase = "Mapper",
                    mapper = mapper.as_str(),
                    error = error.to_string()
                );
            }

            metrics::record_rule(&outcome, elapsed);
            outcomes.push(outcome);
        }

        metrics::record_login(outcomes.len(), total);
        Ok(outcomes)
    }
}

fn run_rule<R, U>(
    slot: &RuleSlot,
    login: LoginKind,
    default_mode: SyncMode,
    ctx: &PrincipalContext,
    realm: &R,
    user: &U,
) -> RuleOutcome
where
    R: RealmGroups + ?Sized,
    U: UserBinding + ?Sized,
{
    let dispatch = || -> Result<RuleOutcome, MapperError> {
        let rule = slot.rule.as_ref().map_err(Clone::clone)?;
        let mode = rule.sync_mode.resolve(default_mode)?;
        let Some(event) = SyncEvent::for_login(login, mode)? else {
            return Ok(RuleOutcome::Skipped {
                mapper: slot.name.clone(),
            });
        };
        let (matched, action) = rule.handle(event, ctx, realm, user)?;
        Ok(RuleOutcome::Applied {
            mapper: slot.name.clone(),
            group: rule.group.to_string(),
            event,
            matched,
            action,
        })
    };

    dispatch().unwrap_or_else(|error| RuleOutcome::Failed {
        mapper: slot.name.clone(),
        error,
    })
}

#[cfg(test)]
mod tests;
