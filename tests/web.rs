//! 浏览器环境下的冒烟测试，使用 `wasm-pack test --headless --firefox` 运行。

#![cfg(target_arch = "wasm32")]

use dungeon_cards::DungeonEngine;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn engine_walks_from_map_into_combat() {
    let mut engine = DungeonEngine::new(Some(7), None).expect("engine builds");

    let json = engine
        .choose_map_event("combat")
        .expect("combat is always offered");
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["snapshot"]["phase"], "Combat");
    assert_eq!(value["snapshot"]["hand"].as_array().map(Vec::len), Some(5));

    assert!(engine.rest_heal().is_err(), "rest is not valid during combat");
    engine.flee().expect("flee back to the map");
}

#[wasm_bindgen_test]
fn config_json_overrides_defaults() {
    let engine = DungeonEngine::new(Some(1), Some(r#"{ "starting_hp": 70 }"#.into()))
        .expect("engine builds");
    let snapshot: serde_json::Value =
        serde_json::from_str(&engine.snapshot_json().expect("snapshot")).expect("valid json");
    assert_eq!(snapshot["player"]["hp"], 70);
    assert_eq!(snapshot["player"]["max_hp"], 70);
}
