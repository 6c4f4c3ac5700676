use crate::handler::{RuleContext, RuleKeyHandler};
use crate::{CompileError, RuleCondition, compile_condition};

/// Turns an object-valued rule key into one condition per property, each bound
/// under `data_property`. Property names are split on `.` to reach nested data,
/// so `{ descriptionData: { "exports.import": ... } }` tests
/// `descriptionData.exports.import`.
#[derive(Debug, Clone)]
pub struct ObjectMatcher {
    rule_key: String,
    data_property: String,
}

impl ObjectMatcher {
    pub fn new(rule_key: impl Into<String>, data_property: impl Into<String>) -> Self {
        Self {
            rule_key: rule_key.into(),
            data_property: data_property.into(),
        }
    }

    pub fn same(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::new(key.clone(), key)
    }
}

impl RuleKeyHandler for ObjectMatcher {
    fn name(&self) -> &str {
        &self.rule_key
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
        let Some(value) = ctx.take(&self.rule_key) else {
            return Ok(());
        };
        let key_path = ctx.key_path(&self.rule_key);
        let Some(obj) = value.as_object() else {
            return Err(CompileError::UnexpectedType {
                path: key_path,
                expected: "object",
                found: value.type_name(),
                value: value.clone(),
            });
        };
        for (property, raw) in obj.iter() {
            let condition = compile_condition(&format!("{key_path}.{property}"), raw)?;
            let mut path = vec![self.data_property.clone()];
            path.extend(property.split('.').map(str::to_owned));
            ctx.add_condition(RuleCondition::nested(path, condition));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputRecord, RawObject, RawValue, RuleSetCompiler};

    fn compiler() -> RuleSetCompiler {
        RuleSetCompiler::new()
            .handler(ObjectMatcher::same("descriptionData"))
            .handler(crate::handlers::BasicEffect::same("type"))
    }

    #[test]
    fn matches_nested_description_data() {
        let ruleset = compiler()
            .compile(&[RawObject::new()
                .with(
                    "descriptionData",
                    RawObject::new()
                        .with("type", "module")
                        .with("exports.import", "./"),
                )
                .with("type", "javascript/esm")
                .into()])
            .unwrap();

        let esm = InputRecord::new()
            .set("descriptionData.type", "module")
            .set("descriptionData.exports.import", "./index.mjs");
        let cjs = InputRecord::new().set("descriptionData.type", "commonjs");
        assert_eq!(ruleset.exec(&esm).unwrap().len(), 1);
        assert!(ruleset.exec(&cjs).unwrap().is_empty());

        let condition = &ruleset.rules()[0].conditions()[1];
        assert_eq!(condition.property(), ["descriptionData", "exports", "import"]);
    }

    #[test]
    fn requires_object() {
        let err = compiler()
            .compile(&[RawObject::new().with("descriptionData", "module").into()])
            .unwrap_err();
        assert!(matches!(
            err,
            CompileError::UnexpectedType { expected: "object", .. }
        ));
    }

    #[test]
    fn property_errors_name_the_property() {
        let err = compiler()
            .compile(&[RawObject::new()
                .with("descriptionData", RawObject::new().with("type", RawValue::Null))
                .into()])
            .unwrap_err();
        assert_eq!(err.path(), "ruleSet[0].descriptionData.type");
    }
}
