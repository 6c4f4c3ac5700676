use std::fmt;
use std::sync::Arc;

use super::error::EffectError;
use super::raw::RawValue;
use super::record::InputRecord;

type EffectFn = dyn Fn(&InputRecord) -> Result<Vec<Effect>, EffectError> + Send + Sync;

/// One processing directive produced by a matching rule.
///
/// The engine never interprets `kind` or `value`; consumers do.
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    kind: String,
    value: RawValue,
}

impl Effect {
    pub fn new(kind: impl Into<String>, value: impl Into<RawValue>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn value(&self) -> &RawValue {
        &self.value
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.kind, self.value)
    }
}

/// Where a rule's effects come from: fixed at compile time, or computed from
/// the record when the rule matches.
#[derive(Clone)]
pub enum EffectSource {
    Static(Effect),
    Computed(Arc<EffectFn>),
}

impl EffectSource {
    pub fn computed(
        f: impl Fn(&InputRecord) -> Result<Vec<Effect>, EffectError> + Send + Sync + 'static,
    ) -> Self {
        EffectSource::Computed(Arc::new(f))
    }

    /// Append this source's effects for `record` to `out`.
    pub(crate) fn emit(&self, record: &InputRecord, out: &mut Vec<Effect>) -> Result<(), EffectError> {
        match self {
            EffectSource::Static(effect) => out.push(effect.clone()),
            EffectSource::Computed(f) => out.extend(f(record)?),
        }
        Ok(())
    }
}

impl From<Effect> for EffectSource {
    fn from(effect: Effect) -> Self {
        EffectSource::Static(effect)
    }
}

impl fmt::Debug for EffectSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectSource::Static(effect) => f.debug_tuple("Static").field(effect).finish(),
            EffectSource::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}
