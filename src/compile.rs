use crate::handler::{RuleContext, RuleKeyHandler, UnhandledKeys};
use crate::{CompileError, CompiledRule, Condition, RawObject, RawValue, ReferenceRegistry, RuleBuilder};

/// Compile a raw condition found at `path`.
///
/// Strings match by prefix, patterns by regex search, predicates by calling
/// them; lists are an OR; objects combine `and`/`or`/`not` with an implicit AND.
///
/// # Errors
///
/// Returns [`CompileError`] for falsy or unsupported values, unknown
/// combinator keys, non-list `and`/`or`, objects without any usable key, and
/// predicates that fail when probed with `""`.
pub fn compile_condition(path: &str, raw: &RawValue) -> Result<Condition, CompileError> {
    // Strings come first: "" is falsy but is a valid "match everything" prefix.
    if let RawValue::String(s) = raw {
        return Ok(Condition::prefix(s.as_str()));
    }
    if !raw.is_truthy() {
        return Err(CompileError::FalsyCondition {
            path: path.to_owned(),
            value: raw.clone(),
        });
    }
    match raw {
        RawValue::Pattern(re) => Ok(Condition::pattern(re.clone())),
        RawValue::Predicate(p) => {
            let match_when_empty = p.call("").map_err(|source| CompileError::PredicateProbe {
                path: path.to_owned(),
                source,
            })?;
            Ok(Condition::predicate(p.clone(), match_when_empty))
        }
        RawValue::List(items) => {
            let conditions = items
                .iter()
                .enumerate()
                .map(|(i, item)| compile_condition(&format!("{path}[{i}]"), item))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Condition::any(conditions))
        }
        RawValue::Object(obj) => compile_condition_object(path, raw, obj),
        other => Err(CompileError::UnexpectedType {
            path: path.to_owned(),
            expected: "condition",
            found: other.type_name(),
            value: other.clone(),
        }),
    }
}

fn compile_condition_object(
    path: &str,
    raw: &RawValue,
    obj: &RawObject,
) -> Result<Condition, CompileError> {
    let mut conditions = Vec::new();
    for (key, value) in obj.iter() {
        match key {
            "and" | "or" => {
                if !value.is_truthy() {
                    continue;
                }
                let sub_path = format!("{path}.{key}");
                let Some(items) = value.as_list() else {
                    return Err(CompileError::ExpectedArray {
                        path: sub_path,
                        value: value.clone(),
                    });
                };
                let compiled = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| compile_condition(&format!("{sub_path}[{i}]"), item))
                    .collect::<Result<Vec<_>, _>>()?;
                conditions.push(if key == "and" {
                    Condition::all(compiled)
                } else {
                    Condition::any(compiled)
                });
            }
            "not" => {
                if !value.is_truthy() {
                    continue;
                }
                conditions.push(compile_condition(&format!("{path}.not"), value)?.negate());
            }
            _ => {
                return Err(CompileError::UnknownConditionKey {
                    path: format!("{path}.{key}"),
                    key: key.to_owned(),
                    value: value.clone(),
                });
            }
        }
    }
    if conditions.is_empty() {
        return Err(CompileError::EmptyCondition {
            path: path.to_owned(),
            value: raw.clone(),
        });
    }
    Ok(Condition::all(conditions))
}

/// Compile a list of raw rules found at `path`. Falsy entries are skipped;
/// indices in diagnostics refer to positions in the original list.
pub(crate) fn compile_rules(
    path: &str,
    list: &[RawValue],
    handlers: &[Box<dyn RuleKeyHandler>],
    references: &mut ReferenceRegistry,
) -> Result<Vec<CompiledRule>, CompileError> {
    let mut compiled = Vec::with_capacity(list.len());
    for (i, raw) in list.iter().enumerate() {
        if !raw.is_truthy() {
            continue;
        }
        compiled.push(compile_rule(format!("{path}[{i}]"), raw, handlers, references)?);
    }
    Ok(compiled)
}

fn compile_rule(
    path: String,
    raw: &RawValue,
    handlers: &[Box<dyn RuleKeyHandler>],
    references: &mut ReferenceRegistry,
) -> Result<CompiledRule, CompileError> {
    let Some(obj) = raw.as_object() else {
        return Err(CompileError::RuleNotObject {
            path,
            found: raw.type_name(),
            value: raw.clone(),
        });
    };

    let mut unhandled = UnhandledKeys::of(obj);
    let mut builder = RuleBuilder::new();
    for handler in handlers {
        let mut ctx = RuleContext::new(&path, obj, &mut unhandled, &mut builder, references);
        handler.apply(&mut ctx)?;
    }

    let rules = match (unhandled.remove("rules"), obj.get("rules")) {
        (true, Some(value)) => Some(compile_children(&path, "rules", value, handlers, references)?),
        _ => None,
    };
    let one_of = match (unhandled.remove("oneOf"), obj.get("oneOf")) {
        (true, Some(value)) => Some(compile_children(&path, "oneOf", value, handlers, references)?),
        _ => None,
    };

    if !unhandled.is_empty() {
        return Err(CompileError::UnknownProperties {
            path,
            keys: unhandled.into_vec(),
            value: raw.clone(),
        });
    }

    tracing::trace!(
        path = %path,
        conditions = builder.conditions().len(),
        effects = builder.effects().len(),
        "compiled rule"
    );
    Ok(builder.finish(path, rules, one_of))
}

fn compile_children(
    path: &str,
    key: &str,
    value: &RawValue,
    handlers: &[Box<dyn RuleKeyHandler>],
    references: &mut ReferenceRegistry,
) -> Result<Vec<CompiledRule>, CompileError> {
    let sub_path = format!("{path}.{key}");
    match value.as_list() {
        Some(items) => compile_rules(&sub_path, items, handlers, references),
        None => Err(CompileError::ExpectedArray {
            path: sub_path,
            value: value.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Predicate, PredicateError};

    fn cond(raw: impl Into<RawValue>) -> Condition {
        compile_condition("c", &raw.into()).unwrap()
    }

    fn err(raw: impl Into<RawValue>) -> CompileError {
        compile_condition("c", &raw.into()).unwrap_err()
    }

    #[test]
    fn string_is_prefix() {
        let c = cond("/src");
        assert!(c.test("/src/a.js").unwrap());
        assert!(!c.test("/lib/a.js").unwrap());
        assert!(!c.match_when_empty());
        assert!(cond("").match_when_empty());
    }

    #[test]
    fn pattern_probes_empty() {
        let c = cond(RawValue::pattern(r"\.m?js$").unwrap());
        assert!(c.test("a.mjs").unwrap());
        assert!(!c.match_when_empty());
        assert!(cond(RawValue::pattern(".*").unwrap()).match_when_empty());
    }

    #[test]
    fn predicate_probed_once_at_compile_time() {
        let c = cond(RawValue::predicate(|v| v.is_empty() || v.ends_with(".ts")));
        assert!(c.match_when_empty());
        assert!(c.test("a.ts").unwrap());
        assert!(!c.test("a.js").unwrap());
    }

    #[test]
    fn failing_probe_is_compile_error() {
        let raw = RawValue::Predicate(Predicate::new(|_| Err(PredicateError::new("boom"))));
        let e = compile_condition("ruleSet[0].test", &raw).unwrap_err();
        assert!(matches!(
            &e,
            CompileError::PredicateProbe { path, .. } if path == "ruleSet[0].test"
        ));
    }

    #[test]
    fn list_is_or() {
        let c = cond(vec!["a", "b"]);
        assert!(c.test("b1").unwrap());
        assert!(!c.test("c1").unwrap());
    }

    #[test]
    fn empty_list_never_matches() {
        let c = cond(RawValue::List(vec![]));
        assert!(!c.match_when_empty());
        assert!(!c.test("").unwrap());
    }

    #[test]
    fn object_combinators() {
        let c = cond(
            RawObject::new()
                .with("and", vec!["/src", "/src/app"])
                .with("not", RawValue::pattern(r"\.test\.").unwrap()),
        );
        assert!(c.test("/src/app/a.js").unwrap());
        assert!(!c.test("/src/app/a.test.js").unwrap());
        assert!(!c.test("/src/lib/a.js").unwrap());

        let c = cond(RawObject::new().with("or", vec!["a", "b"]));
        assert!(c.test("bx").unwrap());
    }

    #[test]
    fn not_flips_match_when_empty() {
        let c = cond(RawObject::new().with("not", "a"));
        assert!(c.match_when_empty());
        assert!(!c.test("abc").unwrap());
    }

    #[test]
    fn falsy_is_rejected() {
        assert!(matches!(err(RawValue::Null), CompileError::FalsyCondition { .. }));
        assert!(matches!(err(false), CompileError::FalsyCondition { .. }));
        assert!(matches!(err(0_i64), CompileError::FalsyCondition { .. }));
    }

    #[test]
    fn unsupported_type_is_rejected() {
        assert!(matches!(
            err(true),
            CompileError::UnexpectedType { found: "boolean", .. }
        ));
        assert!(matches!(
            err(RawValue::callback(|_| Ok(RawValue::Null))),
            CompileError::UnexpectedType { found: "function", .. }
        ));
    }

    #[test]
    fn unknown_combinator_key_names_the_key() {
        let e = err(RawObject::new().with("and", vec!["a"]).with("xor", "b"));
        match e {
            CompileError::UnknownConditionKey { key, path, .. } => {
                assert_eq!(key, "xor");
                assert_eq!(path, "c.xor");
            }
            other => panic!("expected UnknownConditionKey, got {other:?}"),
        }
    }

    #[test]
    fn and_requires_list() {
        let e = err(RawObject::new().with("and", "a"));
        assert!(matches!(e, CompileError::ExpectedArray { path, .. } if path == "c.and"));
    }

    #[test]
    fn empty_object_is_rejected() {
        assert!(matches!(
            err(RawObject::new()),
            CompileError::EmptyCondition { .. }
        ));
        assert!(matches!(
            err(RawObject::new().with("not", RawValue::Null)),
            CompileError::EmptyCondition { .. }
        ));
    }

    #[test]
    fn empty_string_under_not_is_skipped() {
        assert!(matches!(
            err(RawObject::new().with("not", "")),
            CompileError::EmptyCondition { .. }
        ));
        let c = cond(RawObject::new().with("not", "").with("or", vec!["a"]));
        assert!(c.test("abc").unwrap());
        assert!(!c.match_when_empty());
    }

    #[test]
    fn nested_paths_in_diagnostics() {
        let raw: RawValue = RawObject::new()
            .with("or", vec![RawValue::from("a"), RawValue::Object(RawObject::new())])
            .into();
        let e = compile_condition("ruleSet[0].test", &raw).unwrap_err();
        assert_eq!(e.path(), "ruleSet[0].test.or[1]");
    }
}
