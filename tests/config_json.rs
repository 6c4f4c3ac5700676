#![cfg(feature = "serde")]

use rulesift::{CompileError, Effect, Error, InputRecord, RawObject, RuleSetCompiler};

const CONFIG: &str = r#"[
    {
        "test": "/app/src",
        "exclude": ["/app/src/vendor", "/app/src/generated"],
        "use": [
            "babel-loader",
            { "loader": "eslint-loader", "options": { "fix": true } }
        ],
        "enforce": "pre"
    },
    null,
    {
        "descriptionData": { "type": "module" },
        "type": "javascript/esm"
    }
]"#;

#[test]
fn compile_from_json() {
    let ruleset = RuleSetCompiler::with_module_defaults()
        .compile_json(CONFIG)
        .unwrap();
    assert_eq!(ruleset.rules().len(), 2);
    assert_eq!(ruleset.rules()[1].path(), "ruleSet[2]");

    let record = InputRecord::new()
        .set("resource", "/app/src/main.js")
        .set("descriptionData.type", "module");
    let effects = ruleset.exec(&record).unwrap();
    assert_eq!(
        effects,
        vec![
            Effect::new("use-pre", RawObject::new().with("loader", "babel-loader")),
            Effect::new(
                "use-pre",
                RawObject::new()
                    .with("loader", "eslint-loader")
                    .with("options", RawObject::new().with("fix", true))
                    .with("ident", "ruleSet[0].use[1]"),
            ),
            Effect::new("type", "javascript/esm"),
        ]
    );
    assert!(ruleset.references().contains("ruleSet[0].use[1]"));

    let vendored = InputRecord::new().set("resource", "/app/src/vendor/lib.js");
    assert!(ruleset.exec(&vendored).unwrap().is_empty());
}

#[test]
fn malformed_json_is_json_error() {
    let err = RuleSetCompiler::with_module_defaults()
        .compile_json("[{")
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn compile_errors_surface_through_crate_error() {
    let err = RuleSetCompiler::with_module_defaults()
        .compile_json(r#"[{"test": "/src", "loaders": ["x"]}]"#)
        .unwrap_err();
    match err {
        Error::Compile(CompileError::UnknownProperties { keys, .. }) => {
            assert_eq!(keys, ["loaders"]);
        }
        other => panic!("unexpected error {other:?}"),
    }
}
