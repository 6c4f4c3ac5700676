use crate::handler::{RuleContext, RuleKeyHandler};
use crate::{CompileError, Effect};

/// Emits the raw value of one rule key as a static effect.
#[derive(Debug, Clone)]
pub struct BasicEffect {
    rule_key: String,
    effect_kind: String,
}

impl BasicEffect {
    pub fn new(rule_key: impl Into<String>, effect_kind: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.into(),
            effect_kind: effect_kind.into(),
        }
    }

    pub fn same(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key)
    }
}

impl RuleKeyHandler for BasicEffect {
    fn name(&self) -> &str {
        &self.rule_key
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
        if let Some(value) = ctx.take(&self.rule_key) {
            ctx.add_effect(Effect::new(self.effect_kind.as_str(), value.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputRecord, RawObject, RawValue, RuleSetCompiler};

    #[test]
    fn emits_raw_value_under_kind() {
        let ruleset = RuleSetCompiler::new()
            .handler(BasicEffect::new("sideEffects", "side-effects"))
            .compile(&[RawObject::new().with("sideEffects", false).into()])
            .unwrap();
        let effects = ruleset.exec(&InputRecord::new()).unwrap();
        assert_eq!(effects, vec![Effect::new("side-effects", false)]);
    }

    #[test]
    fn object_values_pass_through() {
        let parser = RawObject::new().with("javascript", RawObject::new().with("url", "relative"));
        let ruleset = RuleSetCompiler::new()
            .handler(BasicEffect::same("parser"))
            .compile(&[RawObject::new().with("parser", parser.clone()).into()])
            .unwrap();
        let effects = ruleset.exec(&InputRecord::new()).unwrap();
        assert_eq!(effects[0].value(), &RawValue::Object(parser));
    }
}
