use std::fmt;

use super::effect::Effect;
use super::error::{CompileError, ExecError};
use super::raw::RawValue;
use super::record::InputRecord;
use super::references::ReferenceRegistry;
use super::report::ExecReport;
use super::rule::CompiledRule;
use crate::handler::RuleKeyHandler;

/// Compiles raw rule sets using a fixed, ordered list of key handlers.
///
/// # Example
///
/// ```
/// use rulesift::{InputRecord, RawObject, RawValue, RuleSetCompiler};
///
/// let ruleset = RuleSetCompiler::with_module_defaults()
///     .compile(&[RawObject::new()
///         .with("test", RawValue::pattern(r"\.json$").unwrap())
///         .with("type", "json")
///         .into()])
///     .unwrap();
///
/// let effects = ruleset
///     .exec(&InputRecord::new().set("resource", "/data/a.json"))
///     .unwrap();
/// assert_eq!(effects[0].kind(), "type");
/// ```
#[derive(Default)]
pub struct RuleSetCompiler {
    handlers: Vec<Box<dyn RuleKeyHandler>>,
}

impl RuleSetCompiler {
    /// A compiler that only understands `rules` and `oneOf`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler with the built-in module-rule handlers registered
    /// (`test`, `include`, `exclude`, `type`, `use`, `loader`, ...).
    #[must_use]
    pub fn with_module_defaults() -> Self {
        Self {
            handlers: crate::handlers::module_rule_handlers(),
        }
    }

    /// Register a handler after the ones already present.
    #[must_use]
    pub fn handler(mut self, handler: impl RuleKeyHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Names of registered handlers, in invocation order.
    #[must_use]
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    /// Compile a list of raw rules into an immutable `RuleSet`.
    ///
    /// # Errors
    ///
    /// Returns the first [`CompileError`] encountered; nothing is returned on failure.
    pub fn compile(&self, raw: &[RawValue]) -> Result<RuleSet, CompileError> {
        let mut references = ReferenceRegistry::new();
        let rules = crate::compile::compile_rules("ruleSet", raw, &self.handlers, &mut references)?;
        tracing::debug!(
            rules = rules.len(),
            references = references.len(),
            "compiled rule set"
        );
        Ok(RuleSet { rules, references })
    }

    /// Parse a JSON rule list and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`Error`](crate::Error) on parse or compile failure.
    #[cfg(feature = "serde")]
    pub fn compile_json(&self, input: &str) -> Result<RuleSet, crate::Error> {
        let raw: Vec<RawValue> = serde_json::from_str(input)?;
        Ok(self.compile(&raw)?)
    }
}

impl fmt::Debug for RuleSetCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSetCompiler")
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// A compiled, immutable rule set. Thread-safe and designed to live behind `Arc`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<CompiledRule>,
    pub(crate) references: ReferenceRegistry,
}

impl RuleSet {
    /// Classify one candidate resource.
    ///
    /// Every top-level rule is tried in order; the effects of all matching
    /// rules are returned in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError`] only when a user predicate or effect callback fails.
    pub fn exec(&self, record: &InputRecord) -> Result<Vec<Effect>, ExecError> {
        crate::evaluate::exec(&self.rules, record)
    }

    /// Classify with diagnostics: which rules matched, how many were visited,
    /// and how long it took.
    ///
    /// # Errors
    ///
    /// Same as [`exec`](Self::exec).
    pub fn exec_detailed(&self, record: &InputRecord) -> Result<ExecReport, ExecError> {
        crate::evaluate::exec_detailed(&self.rules, record)
    }

    /// Values captured during compilation, such as loader options by ident.
    #[must_use]
    pub fn references(&self) -> &ReferenceRegistry {
        &self.references
    }

    /// Top-level compiled rules, in declaration order.
    #[must_use]
    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RuleSet({} rules, {} references)",
            self.rules.len(),
            self.references.len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawObject;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn ruleset_is_send_sync() {
        assert_send_sync::<RuleSet>();
        assert_send_sync::<RuleSetCompiler>();
    }

    #[test]
    fn bare_compiler_accepts_structural_keys_only() {
        let compiler = RuleSetCompiler::new();
        let ok = compiler.compile(&[RawObject::new()
            .with("rules", RawValue::List(vec![]))
            .with("oneOf", RawValue::List(vec![]))
            .into()]);
        assert!(ok.is_ok());

        let err = compiler
            .compile(&[RawObject::new().with("test", "a").into()])
            .unwrap_err();
        assert!(matches!(err, CompileError::UnknownProperties { .. }));
    }

    #[test]
    fn falsy_entries_are_skipped() {
        let ruleset = RuleSetCompiler::new()
            .compile(&[
                RawValue::Null,
                RawObject::new().into(),
                RawValue::Bool(false),
            ])
            .unwrap();
        assert_eq!(ruleset.rules().len(), 1);
        assert_eq!(ruleset.rules()[0].path(), "ruleSet[1]");
    }

    #[test]
    fn display() {
        let ruleset = RuleSetCompiler::new()
            .compile(&[RawObject::new().into()])
            .unwrap();
        assert_eq!(ruleset.to_string(), "RuleSet(1 rules, 0 references)");
    }

    #[test]
    fn default_handler_order() {
        let compiler = RuleSetCompiler::with_module_defaults();
        let names = compiler.handler_names();
        assert_eq!(names.first(), Some(&"test"));
        assert_eq!(names.last(), Some(&"use"));
    }
}
