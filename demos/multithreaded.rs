use std::sync::Arc;
use std::thread;

use rulesift::{InputRecord, RawObject, RawValue, RuleSetCompiler};

fn main() {
    let ruleset = Arc::new(
        RuleSetCompiler::with_module_defaults()
            .compile(&[
                RawObject::new()
                    .with("test", RawValue::pattern(r"\.m?js$").expect("valid pattern"))
                    .with("exclude", "/project/node_modules")
                    .with("use", "babel-loader")
                    .into(),
                RawObject::new()
                    .with("descriptionData", RawObject::new().with("type", "module"))
                    .with("type", "javascript/esm")
                    .into(),
            ])
            .expect("failed to compile rule set"),
    );

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let rs = Arc::clone(&ruleset);
            thread::spawn(move || {
                let dir = if i % 2 == 0 { "src" } else { "node_modules/dep" };
                let record = InputRecord::new()
                    .set("resource", format!("/project/{dir}/file{i}.mjs"))
                    .set("descriptionData.type", "module");

                let effects = rs.exec(&record);
                println!("Thread {i}: {effects:?}");
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
}
