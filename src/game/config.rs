use serde::{Deserialize, Serialize};

const DEFAULT_STARTING_HP: i32 = 50;
const DEFAULT_MAX_ENERGY: u32 = 3;
const DEFAULT_STARTING_GOLD: i32 = 50;
const DEFAULT_HAND_SIZE: usize = 5;
const DEFAULT_MIN_DECK_SIZE: usize = 5;
const DEFAULT_REST_HEAL: i32 = 20;
const DEFAULT_TREASURE_GOLD_MIN: i32 = 25;
const DEFAULT_TREASURE_GOLD_MAX: i32 = 50;
const DEFAULT_CARD_REWARD_CHANCE: f64 = 0.3;
const DEFAULT_SHOP_INTERVAL: u32 = 5;

/// 一局游戏的可调参数，缺省字段使用默认值。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub starting_hp: i32,
    pub max_energy: u32,
    pub starting_gold: i32,
    pub hand_size: usize,
    pub min_deck_size: usize,
    pub rest_heal: i32,
    pub treasure_gold_min: i32,
    pub treasure_gold_max: i32,
    pub card_reward_chance: f64,
    pub shop_interval: u32,
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 商店只在 `shop_interval` 的整数倍楼层出现。
    pub fn shop_available(&self, floor: u32) -> bool {
        self.shop_interval > 0 && floor % self.shop_interval == 0
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            starting_hp: DEFAULT_STARTING_HP,
            max_energy: DEFAULT_MAX_ENERGY,
            starting_gold: DEFAULT_STARTING_GOLD,
            hand_size: DEFAULT_HAND_SIZE,
            min_deck_size: DEFAULT_MIN_DECK_SIZE,
            rest_heal: DEFAULT_REST_HEAL,
            treasure_gold_min: DEFAULT_TREASURE_GOLD_MIN,
            treasure_gold_max: DEFAULT_TREASURE_GOLD_MAX,
            card_reward_chance: DEFAULT_CARD_REWARD_CHANCE,
            shop_interval: DEFAULT_SHOP_INTERVAL,
        }
    }
}
