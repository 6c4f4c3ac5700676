mod compile;
mod error;
mod evaluate;
pub mod handler;
pub mod handlers;
#[cfg(feature = "serde")]
mod serial;
mod types;

pub use compile::compile_condition;
pub use error::Error;
pub use handler::{RuleContext, RuleKeyHandler, UnhandledKeys};
pub use types::{
    Callback, CompileError, CompiledRule, Condition, Effect, EffectError, EffectSource, ExecError,
    ExecReport, InputRecord, Predicate, PredicateError, RawObject, RawValue, ReferenceRegistry,
    RuleBuilder, RuleCondition, RuleSet, RuleSetCompiler,
};
