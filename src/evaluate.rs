use std::time::Instant;

use crate::{CompiledRule, Effect, ExecError, ExecReport, InputRecord};

/// Collected while walking the tree for a detailed report.
#[derive(Debug, Default)]
struct Trace {
    matched: Vec<String>,
    visited: usize,
}

pub(crate) fn exec(rules: &[CompiledRule], data: &InputRecord) -> Result<Vec<Effect>, ExecError> {
    let mut effects = Vec::new();
    // Top-level rules are independent of each other, like a `rules` list.
    for rule in rules {
        exec_rule(data, rule, &mut effects, None)?;
    }
    Ok(effects)
}

pub(crate) fn exec_detailed(
    rules: &[CompiledRule],
    data: &InputRecord,
) -> Result<ExecReport, ExecError> {
    let start = Instant::now();
    let mut effects = Vec::new();
    let mut trace = Trace::default();
    for rule in rules {
        exec_rule(data, rule, &mut effects, Some(&mut trace))?;
    }
    Ok(ExecReport::new(
        effects,
        trace.matched,
        trace.visited,
        start.elapsed(),
    ))
}

fn exec_rule(
    data: &InputRecord,
    rule: &CompiledRule,
    effects: &mut Vec<Effect>,
    mut trace: Option<&mut Trace>,
) -> Result<bool, ExecError> {
    if let Some(t) = trace.as_deref_mut() {
        t.visited += 1;
    }
    for condition in &rule.conditions {
        if !condition.matches(data)? {
            return Ok(false);
        }
    }

    tracing::trace!(path = %rule.path, "rule matched");
    if let Some(t) = trace.as_deref_mut() {
        t.matched.push(rule.path.clone());
    }

    for effect in &rule.effects {
        effect.emit(data, effects)?;
    }

    if let Some(children) = &rule.rules {
        for child in children {
            exec_rule(data, child, effects, trace.as_deref_mut())?;
        }
    }

    if let Some(children) = &rule.one_of {
        for child in children {
            if exec_rule(data, child, effects, trace.as_deref_mut())? {
                break;
            }
        }
    }

    Ok(true)
}
