use thiserror::Error;

use crate::{CompileError, ExecError};

/// Unified error type covering configuration parsing, compilation and
/// classification.
///
/// Returned by convenience methods like
/// [`RuleSetCompiler::compile_json()`](crate::RuleSetCompiler), and handy for
/// callers that compile and classify in one place.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(feature = "serde")]
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Exec(#[from] ExecError),
}
