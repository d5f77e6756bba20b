pub mod game;
pub mod utils;

use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub use game::{
    all_cards, monsters_for_floor, starter_deck, Card, CardKind, Encounter, EncounterStatus,
    ErrorCategory, EventKind, GameEvent, IntegrityError, Monster, Phase, PhaseKind, Player,
    RuleEngine, RuleError, RuleResolution, RunConfig, RunSnapshot, RunState,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    utils::log(&format!("rule error: {error}"));
    to_value(&error).unwrap_or_else(|serialize_err| JsValue::from_str(&serialize_err.to_string()))
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn make_resolution_json(state: &RunState, events: Vec<GameEvent>) -> Result<String, JsValue> {
    serde_json::to_string(&RuleResolution::new(state, events)).map_err(serde_to_js_error)
}

/// 表现层持有的一局游戏：状态与唯一随机源。
#[wasm_bindgen]
pub struct DungeonEngine {
    state: RunState,
    engine: RuleEngine<SmallRng>,
}

#[wasm_bindgen]
impl DungeonEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: Option<u64>, config_json: Option<String>) -> Result<DungeonEngine, JsValue> {
        let config = match config_json {
            Some(json) => RunConfig::from_json(&json).map_err(serde_to_js_error)?,
            None => RunConfig::default(),
        };
        let mut engine = match seed {
            Some(seed) => RuleEngine::new(SmallRng::seed_from_u64(seed)),
            None => RuleEngine::from_entropy(),
        };
        let state = engine.start_run(config);
        Ok(DungeonEngine { state, engine })
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&RunSnapshot::from_state(&self.state)).map_err(serde_to_js_error)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: RunState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        state
            .integrity_check()
            .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))?;
        self.state = state;
        Ok(())
    }

    pub fn choose_map_event(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind = EventKind::from_str(kind).map_err(serde_to_js_error)?;
        let events = self
            .engine
            .choose_map_event(&mut self.state, kind)
            .map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn play_card(&mut self, index: usize) -> Result<String, JsValue> {
        let events = self
            .engine
            .play_card(&mut self.state, index)
            .map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn end_turn(&mut self) -> Result<String, JsValue> {
        let events = self.engine.end_turn(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn flee(&mut self) -> Result<String, JsValue> {
        let events = self.engine.flee(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn treasure_take_gold(&mut self) -> Result<String, JsValue> {
        let events = self
            .engine
            .treasure_take_gold(&mut self.state)
            .map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn treasure_take_card(&mut self) -> Result<String, JsValue> {
        let events = self
            .engine
            .treasure_take_card(&mut self.state)
            .map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn rest_heal(&mut self) -> Result<String, JsValue> {
        let events = self.engine.rest_heal(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn rest_upgrade(&mut self) -> Result<String, JsValue> {
        let events = self
            .engine
            .rest_upgrade(&mut self.state)
            .map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn leave_shop(&mut self) -> Result<String, JsValue> {
        let events = self.engine.leave_shop(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }

    pub fn restart(&mut self) -> Result<String, JsValue> {
        let events = self.engine.restart(&mut self.state).map_err(to_js_error)?;
        make_resolution_json(&self.state, events)
    }
}

#[wasm_bindgen(js_name = "allCards")]
pub fn all_cards_js() -> Result<JsValue, JsValue> {
    to_value(&all_cards()).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "starterDeck")]
pub fn starter_deck_js() -> Result<JsValue, JsValue> {
    to_value(&starter_deck()).map_err(JsValue::from)
}

/// 按楼层生成怪物名单；`seed` 只影响卡牌掉落。
#[wasm_bindgen(js_name = "monstersForFloor")]
pub fn monsters_for_floor_js(floor: u32, seed: u64) -> Result<JsValue, JsValue> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let config = RunConfig::default();
    to_value(&monsters_for_floor(floor, config.card_reward_chance, &mut rng)).map_err(JsValue::from)
}

#[wasm_bindgen(js_name = "validateState")]
pub fn validate_state(state: JsValue) -> Result<(), JsValue> {
    let state: RunState = from_value(state).map_err(JsValue::from)?;
    state
        .integrity_check()
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))?;
    Ok(())
}
