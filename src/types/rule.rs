use super::condition::Condition;
use super::effect::{Effect, EffectSource};
use super::error::PredicateError;
use super::raw::RawValue;
use super::record::InputRecord;

/// A [`Condition`] bound to one attribute of the [`InputRecord`].
///
/// `property` is a segment path; most conditions use a single segment such as
/// `resource`, object matchers use nested ones like `["descriptionData", "type"]`.
#[derive(Debug, Clone)]
pub struct RuleCondition {
    property: Vec<String>,
    condition: Condition,
}

impl RuleCondition {
    /// Bind to a top-level attribute.
    pub fn new(attribute: impl Into<String>, condition: Condition) -> Self {
        Self {
            property: vec![attribute.into()],
            condition,
        }
    }

    /// Bind to a nested attribute path.
    #[must_use]
    pub fn nested(property: Vec<String>, condition: Condition) -> Self {
        Self {
            property,
            condition,
        }
    }

    #[must_use]
    pub fn property(&self) -> &[String] {
        &self.property
    }

    #[must_use]
    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    /// Present attributes are tested; absent ones fall back to `match_when_empty`
    /// without invoking the condition.
    pub(crate) fn matches(&self, record: &InputRecord) -> Result<bool, PredicateError> {
        match record.get_path(&self.property) {
            Some(value) => self.condition.test(value),
            None => Ok(self.condition.match_when_empty()),
        }
    }
}

/// In-progress rule handed to [`RuleKeyHandler`](crate::RuleKeyHandler)s.
#[derive(Debug, Default)]
pub struct RuleBuilder {
    conditions: Vec<RuleCondition>,
    effects: Vec<EffectSource>,
}

impl RuleBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn add_condition(&mut self, condition: RuleCondition) {
        self.conditions.push(condition);
    }

    pub fn add_effect(&mut self, effect: impl Into<EffectSource>) {
        self.effects.push(effect.into());
    }

    /// Convenience for the common static case.
    pub fn add_static(&mut self, kind: &str, value: impl Into<RawValue>) {
        self.effects.push(EffectSource::Static(Effect::new(kind, value)));
    }

    #[must_use]
    pub fn conditions(&self) -> &[RuleCondition] {
        &self.conditions
    }

    #[must_use]
    pub fn effects(&self) -> &[EffectSource] {
        &self.effects
    }

    pub(crate) fn finish(
        self,
        path: String,
        rules: Option<Vec<CompiledRule>>,
        one_of: Option<Vec<CompiledRule>>,
    ) -> CompiledRule {
        CompiledRule {
            path,
            conditions: self.conditions,
            effects: self.effects,
            rules,
            one_of,
        }
    }
}

/// A rule after compilation: conditions (implicit AND), effects in
/// declaration order, and optional child lists.
///
/// `rules` children are all tried; `one_of` children are tried in order until
/// the first one matches.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub(crate) path: String,
    pub(crate) conditions: Vec<RuleCondition>,
    pub(crate) effects: Vec<EffectSource>,
    pub(crate) rules: Option<Vec<CompiledRule>>,
    pub(crate) one_of: Option<Vec<CompiledRule>>,
}

impl CompiledRule {
    /// Location of this rule in the source rule set, e.g. `ruleSet[0].oneOf[2]`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn conditions(&self) -> &[RuleCondition] {
        &self.conditions
    }

    #[must_use]
    pub fn effects(&self) -> &[EffectSource] {
        &self.effects
    }

    #[must_use]
    pub fn rules(&self) -> Option<&[CompiledRule]> {
        self.rules.as_deref()
    }

    #[must_use]
    pub fn one_of(&self) -> Option<&[CompiledRule]> {
        self.one_of.as_deref()
    }
}
