//! Rule evaluation for the four group-mapper variants.

use tracing::debug;

use crate::error::MapperError;
use crate::matcher::{MatchMode, Matcher};
use crate::membership;
use crate::saml_attributes::{attribute_values, attribute_values_by_names};
use crate::traits::{RealmGroups, UserBinding};
use crate::types::{KeyValuePair, MapperConfig, MapperKind, MembershipAction, PrincipalContext, SyncEvent};

impl MapperConfig {
    /// Whether the principal satisfies this rule.
    ///
    /// Absent claims and attributes are plain non-matches. The only error is
    /// an invalid regular expression, which is reported even when an earlier
    /// pair already failed to match.
    pub fn matches(&self, ctx: &PrincipalContext) -> Result<bool, MapperError> {
        let matched = match &self.kind {
            MapperKind::SingleClaim { claim, value } => {
                if claim.is_empty() || value.is_empty() {
                    false
                } else {
                    ctx.claim(claim)
                        .is_some_and(|found| Matcher::Literal(value.clone()).matches(found))
                }
            }
            MapperKind::MultiClaim {
                claims,
                values_are_regex,
            } => {
                let matchers = compile_pairs(claims, MatchMode::from_regex_flag(*values_are_regex))?;
                matchers.iter().all(|(pair, matcher)| {
                    ctx.claim(&pair.key)
                        .is_some_and(|found| matcher.matches(found))
                })
            }
            MapperKind::SingleAttribute {
                name,
                friendly_name,
                value,
            } => match ctx.attribute_statements() {
                Some(statements) if !value.is_empty() => {
                    Matcher::Literal(value.clone())
                        .matches_any(attribute_values_by_names(statements, name, friendly_name))
                }
                _ => false,
            },
            MapperKind::MultiAttribute {
                attributes,
                values_are_regex,
            } => {
                let matchers =
                    compile_pairs(attributes, MatchMode::from_regex_flag(*values_are_regex))?;
                if matchers.is_empty() {
                    true
                } else {
                    match ctx.attribute_statements() {
                        Some(statements) if !statements.is_empty() => {
                            matchers.iter().all(|(pair, matcher)| {
                                matcher.matches_any(attribute_values(statements, &pair.key))
                            })
                        }
                        _ => false,
                    }
                }
            }
        };

        debug!(
            event = "Mapper",
            phase = "Match",
            mapper = self.name.as_str(),
            kind = self.provider_id().as_ref(),
            matched
        );

        Ok(matched)
    }

    /// Evaluate the rule for `event` and apply the resulting membership change.
    pub fn handle<R, U>(
        &self,
        event: SyncEvent,
        ctx: &PrincipalContext,
        realm: &R,
        user: &U,
    ) -> Result<(bool, MembershipAction), MapperError>
    where
        R: RealmGroups + ?Sized,
        U: UserBinding + ?Sized,
    {
        let matched = self.matches(ctx)?;
        let action = membership::decide(event, matched);
        let applied = membership::apply(action, &self.group, realm, user)?;
        Ok((matched, applied))
    }
}

fn compile_pairs(
    pairs: &[KeyValuePair],
    mode: MatchMode,
) -> Result<Vec<(&KeyValuePair, Matcher)>, MapperError> {
    pairs
        .iter()
        .map(|pair| Ok((pair, Matcher::new(&pair.value, mode)?)))
        .collect()
}
