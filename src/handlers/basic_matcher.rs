use crate::handler::{RuleContext, RuleKeyHandler};
use crate::{CompileError, RuleCondition, compile_condition};

/// Turns one rule key into a condition on one record attribute.
///
/// `exclude` is the inverted form of `include`: both test `resource`, but an
/// inverted matcher negates the test and the absent-value behavior.
#[derive(Debug, Clone)]
pub struct BasicMatcher {
    rule_key: String,
    data_property: String,
    inverted: bool,
}

impl BasicMatcher {
    pub fn new(rule_key: impl Into<String>, data_property: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.into(),
            data_property: data_property.into(),
            inverted: false,
        }
    }

    /// Rule key and attribute share a name.
    pub fn same(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key)
    }

    #[must_use]
    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }
}

impl RuleKeyHandler for BasicMatcher {
    fn name(&self) -> &str {
        &self.rule_key
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
        let Some(value) = ctx.take(&self.rule_key) else {
            return Ok(());
        };
        let condition = compile_condition(&ctx.key_path(&self.rule_key), value)?;
        let condition = if self.inverted {
            condition.negate()
        } else {
            condition
        };
        ctx.add_condition(RuleCondition::new(self.data_property.as_str(), condition));
        Ok(())
    }
}
