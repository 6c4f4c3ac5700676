use crate::handler::{RuleContext, RuleKeyHandler};
use crate::{
    Callback, CompileError, Effect, EffectError, EffectSource, RawObject, RawValue,
    ReferenceRegistry,
};

/// Ident given to object options produced at exec time. The registry is frozen
/// by then, so these options cannot be looked up by ident.
const MISSING_IDENT: &str = "[[missing ident]]";

/// Handles the loader keys: `use`, `loader`, `options` and `enforce`.
///
/// Each loader becomes one `use` effect (or `use-pre`/`use-post` with
/// `enforce`) whose value is an object with `loader`, and `options`/`ident`
/// when present. Object options are captured in the reference registry under
/// their ident.
#[derive(Debug, Clone, Copy, Default)]
pub struct UseEffect;

impl RuleKeyHandler for UseEffect {
    fn name(&self) -> &str {
        "use"
    }

    fn apply(&self, ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
        if ctx.is_unhandled("use") {
            apply_use(ctx)?;
        }
        if ctx.is_unhandled("loader") {
            apply_loader(ctx)?;
        }
        Ok(())
    }
}

fn effect_kind(ctx: &RuleContext<'_>) -> Result<String, CompileError> {
    match ctx.raw().get("enforce") {
        None => Ok("use".to_owned()),
        Some(RawValue::String(stage)) if !stage.is_empty() => Ok(format!("use-{stage}")),
        Some(value) if !value.is_truthy() => Ok("use".to_owned()),
        Some(value) => Err(CompileError::UnexpectedType {
            path: ctx.key_path("enforce"),
            expected: "string",
            found: value.type_name(),
            value: value.clone(),
        }),
    }
}

fn apply_use(ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
    let kind = effect_kind(ctx)?;
    let Some(value) = ctx.take("use") else {
        return Ok(());
    };
    ctx.consume("enforce");

    for conflicting in ["loader", "options"] {
        if ctx.is_unhandled(conflicting) {
            return Err(CompileError::InvalidProperty {
                path: ctx.key_path(conflicting),
                message: format!(
                    "a rule must not have a '{conflicting}' property when it has a 'use' property"
                ),
                value: ctx.raw().get(conflicting).cloned().unwrap_or(RawValue::Null),
            });
        }
    }

    let use_path = ctx.key_path("use");
    match value {
        RawValue::Callback(callback) => {
            ctx.add_effect(dynamic_effect(kind, use_path, callback.clone()));
        }
        RawValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                if item.is_truthy() {
                    add_entry(ctx, &kind, &format!("{use_path}[{i}]"), item)?;
                }
            }
        }
        item => add_entry(ctx, &kind, &use_path, item)?,
    }
    Ok(())
}

fn add_entry(
    ctx: &mut RuleContext<'_>,
    kind: &str,
    path: &str,
    item: &RawValue,
) -> Result<(), CompileError> {
    if let RawValue::Callback(callback) = item {
        ctx.add_effect(dynamic_effect(kind.to_owned(), path.to_owned(), callback.clone()));
        return Ok(());
    }
    let effect = entry_effect(kind, path, item, Some(ctx.references())).map_err(|message| {
        CompileError::InvalidProperty {
            path: path.to_owned(),
            message,
            value: item.clone(),
        }
    })?;
    ctx.add_effect(effect);
    Ok(())
}

/// A callback's result is expanded when the rule matches: a single entry or a
/// list of entries, falsy list entries skipped.
fn dynamic_effect(kind: String, path: String, callback: Callback) -> EffectSource {
    EffectSource::computed(move |data| {
        let value = callback.call(data)?;
        let items: Vec<&RawValue> = match &value {
            RawValue::List(items) => items.iter().filter(|i| i.is_truthy()).collect(),
            single => vec![single],
        };
        items
            .into_iter()
            .map(|item| {
                entry_effect(&kind, MISSING_IDENT, item, None)
                    .map_err(|message| EffectError::new(format!("{message} (at {path}: {item})")))
            })
            .collect()
    })
}

fn entry_effect(
    kind: &str,
    default_ident: &str,
    item: &RawValue,
    references: Option<&mut ReferenceRegistry>,
) -> Result<Effect, String> {
    match item {
        RawValue::String(loader) => Ok(Effect::new(
            kind,
            RawObject::new().with("loader", loader.as_str()),
        )),
        RawValue::Object(entry) => {
            let options = entry.get("options");
            let mut ident = entry.get("ident").and_then(RawValue::as_str).map(str::to_owned);
            match options {
                Some(opts @ RawValue::Object(_)) => {
                    let ident = ident.get_or_insert_with(|| default_ident.to_owned());
                    if let Some(references) = references {
                        references.insert(ident, opts.clone());
                    }
                }
                Some(RawValue::String(name)) => ident = Some(name.clone()),
                _ => {}
            }

            let mut value = RawObject::new();
            if let Some(loader) = entry.get("loader") {
                value.insert("loader", loader.clone());
            }
            if let Some(options) = options {
                value.insert("options", options.clone());
            }
            if let Some(ident) = ident {
                value.insert("ident", RawValue::String(ident));
            }
            Ok(Effect::new(kind, value))
        }
        other => Err(format!(
            "unexpected {} in loader entry; expected a loader string or object",
            other.type_name()
        )),
    }
}

fn apply_loader(ctx: &mut RuleContext<'_>) -> Result<(), CompileError> {
    let kind = effect_kind(ctx)?;
    let loader_path = ctx.key_path("loader");
    let Some(loader) = ctx.take("loader") else {
        return Ok(());
    };
    let options = ctx.take("options");
    ctx.consume("enforce");

    let Some(name) = loader.as_str() else {
        return Err(CompileError::UnexpectedType {
            path: loader_path,
            expected: "string",
            found: loader.type_name(),
            value: loader.clone(),
        });
    };
    if name.contains('!') {
        return Err(CompileError::InvalidProperty {
            path: loader_path,
            message: "'!'-separated loader lists are not supported; use the 'use' property with a list".into(),
            value: loader.clone(),
        });
    }
    if name.contains('?') {
        return Err(CompileError::InvalidProperty {
            path: loader_path,
            message: "query arguments on 'loader' are not supported; use the 'options' property"
                .into(),
            value: loader.clone(),
        });
    }

    let mut value = RawObject::new().with("loader", name);
    if let Some(options) = options {
        value.insert("options", options.clone());
        if let RawValue::Object(_) = options {
            let ident = ctx.path();
            ctx.references().insert(ident, options.clone());
            value.insert("ident", RawValue::from(ident));
        }
    }
    ctx.add_effect(Effect::new(kind, value));
    Ok(())
}
