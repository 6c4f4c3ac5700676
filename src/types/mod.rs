mod condition;
mod effect;
mod error;
mod raw;
mod record;
mod references;
mod report;
mod rule;
mod ruleset;

pub use condition::Condition;
pub use effect::{Effect, EffectSource};
pub use error::{CompileError, EffectError, ExecError, PredicateError};
pub use raw::{Callback, Predicate, RawObject, RawValue};
pub use record::InputRecord;
pub use references::ReferenceRegistry;
pub use report::ExecReport;
pub use rule::{CompiledRule, RuleBuilder, RuleCondition};
pub use ruleset::{RuleSet, RuleSetCompiler};
