use rulesift::{InputRecord, RawObject, RawValue, RuleSetCompiler};

fn main() {
    // Define module rules
    let rules: Vec<RawValue> = vec![
        RawObject::new()
            .with("test", RawValue::pattern(r"\.css$").expect("valid pattern"))
            .with(
                "use",
                vec![
                    RawValue::from("style-loader"),
                    RawObject::new()
                        .with("loader", "css-loader")
                        .with("options", RawObject::new().with("modules", true))
                        .into(),
                ],
            )
            .into(),
        RawObject::new()
            .with("test", RawValue::pattern(r"\.png$").expect("valid pattern"))
            .with(
                "oneOf",
                vec![
                    RawObject::new()
                        .with("resourceQuery", "?inline")
                        .with("type", "asset/inline"),
                    RawObject::new().with("type", "asset/resource"),
                ],
            )
            .into(),
    ];

    let ruleset = RuleSetCompiler::with_module_defaults()
        .compile(&rules)
        .expect("failed to compile rule set");

    println!("{ruleset}");

    // Classify a few resources
    for (resource, query) in [
        ("/src/app.css", None),
        ("/src/logo.png", Some("?inline")),
        ("/src/hero.png", None),
        ("/src/main.rs", None),
    ] {
        let mut record = InputRecord::new().set("resource", resource);
        if let Some(query) = query {
            record.insert("resourceQuery", query.to_owned());
        }
        let report = ruleset.exec_detailed(&record).expect("classification failed");
        println!("{resource}{}: {report}", query.unwrap_or(""));
        for effect in report.effects() {
            println!("  {effect}");
        }
    }
}
