//! Built-in handlers for the bundler's module-rule dialect.

mod basic_effect;
mod basic_matcher;
mod object_matcher;
mod use_effect;

pub use basic_effect::BasicEffect;
pub use basic_matcher::BasicMatcher;
pub use object_matcher::ObjectMatcher;
pub use use_effect::UseEffect;

use crate::handler::RuleKeyHandler;

/// The handler set used for module rules, in registration order.
#[must_use]
pub fn module_rule_handlers() -> Vec<Box<dyn RuleKeyHandler>> {
    vec![
        Box::new(BasicMatcher::new("test", "resource")),
        Box::new(BasicMatcher::same("scheme")),
        Box::new(BasicMatcher::same("mimetype")),
        Box::new(BasicMatcher::same("dependency")),
        Box::new(BasicMatcher::new("include", "resource")),
        Box::new(BasicMatcher::new("exclude", "resource").inverted()),
        Box::new(BasicMatcher::same("resource")),
        Box::new(BasicMatcher::same("resourceQuery")),
        Box::new(BasicMatcher::same("resourceFragment")),
        Box::new(BasicMatcher::same("realResource")),
        Box::new(BasicMatcher::same("issuer")),
        Box::new(BasicMatcher::same("compiler")),
        Box::new(BasicMatcher::same("issuerLayer")),
        Box::new(ObjectMatcher::new("with", "attributes")),
        Box::new(ObjectMatcher::same("descriptionData")),
        Box::new(BasicEffect::same("type")),
        Box::new(BasicEffect::same("sideEffects")),
        Box::new(BasicEffect::same("parser")),
        Box::new(BasicEffect::same("resolve")),
        Box::new(BasicEffect::same("generator")),
        Box::new(BasicEffect::same("layer")),
        Box::new(UseEffect),
    ]
}
