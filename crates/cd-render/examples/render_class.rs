//! Analyze class source files and print the rendered block content.
//!
//! Usage: `cargo run --example render_class -- path/to/Class.ts ...`
//! With no arguments a built-in demo class is used. Set `RUST_LOG=debug`
//! for store/extraction tracing.

use cd_core::{Attribute, ClassInfo, DiagramStore, Surface, analyze};
use cd_render::{Scene, SelectionView, Theme, paint_scene};
use std::env;
use std::fs;

fn main() {
    env_logger::init();

    let mut store = DiagramStore::new(Surface::default());
    let mut added = 0;
    for path in env::args().skip(1) {
        let source = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("SKIP {path}: {e}");
                continue;
            }
        };
        match analyze(&source) {
            Ok(info) => {
                println!("✓ {} ({path})", info.name);
                store.add_block(info);
                added += 1;
            }
            Err(e) => eprintln!("{path}: {e}"),
        }
    }
    if added == 0 {
        store.add_block(demo_class());
    }
    store.add_arrow();

    let mut scene = Scene::new();
    paint_scene(&mut scene, &store, SelectionView::default(), &Theme::light());

    println!("\n{} paint ops", scene.ops().len());
    for line in scene.texts() {
        println!("  {line}");
    }
}

fn demo_class() -> ClassInfo {
    let mut info = ClassInfo::named("Greeter");
    info.properties
        .push(Attribute::property("greeting", "string").with_modifier("private"));
    let mut greet = Attribute::method("greet", "string").with_modifier("public");
    greet.parameters = Some(vec!["string".into()]);
    info.methods.push(greet);
    info
}
