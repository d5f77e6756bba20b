use std::fmt;

use serde::{Deserialize, Serialize};

use super::cards::{starter_deck, Card};
use super::combat::Encounter;
use super::config::RunConfig;

/// 玩家状态，包括牌组与当前手牌。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub hp: i32,
    pub max_hp: i32,
    pub energy: u32,
    pub max_energy: u32,
    pub gold: i32,
    #[serde(default)]
    pub block: i32,
    pub deck: Vec<Card>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hand: Vec<Card>,
}

impl Player {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            hp: config.starting_hp,
            max_hp: config.starting_hp,
            energy: config.max_energy,
            max_energy: config.max_energy,
            gold: config.starting_gold,
            block: 0,
            deck: starter_deck(),
            hand: Vec::new(),
        }
    }

    /// 回复生命，不超过上限。返回实际回复量。
    pub fn heal(&mut self, amount: i32) -> i32 {
        let healed = amount.min(self.max_hp - self.hp).max(0);
        self.hp += healed;
        healed
    }

    pub fn refresh_resources(&mut self) {
        self.energy = self.max_energy;
        self.block = 0;
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}

/// 地图上可选的事件类型。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventKind {
    Combat,
    Treasure,
    Rest,
    Shop,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown map event: {0}")]
pub struct UnknownEventKind(pub String);

impl std::str::FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "combat" => Ok(EventKind::Combat),
            "treasure" => Ok(EventKind::Treasure),
            "rest" => Ok(EventKind::Rest),
            "shop" => Ok(EventKind::Shop),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

/// 游戏阶段。只有 `Combat` 持有当前遭遇（以及其中的怪物）。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum Phase {
    Map,
    Combat(Encounter),
    Treasure,
    Rest,
    Shop,
    GameOver,
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::Map => PhaseKind::Map,
            Phase::Combat(_) => PhaseKind::Combat,
            Phase::Treasure => PhaseKind::Treasure,
            Phase::Rest => PhaseKind::Rest,
            Phase::Shop => PhaseKind::Shop,
            Phase::GameOver => PhaseKind::GameOver,
        }
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        match self {
            Phase::Combat(encounter) => Some(encounter),
            _ => None,
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::Map
    }
}

/// 不带数据的阶段标签，用于错误与快照。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PhaseKind {
    Map,
    Combat,
    Treasure,
    Rest,
    Shop,
    GameOver,
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 游戏事件流。`Display` 即战斗日志中的文本。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    RunStarted {
        hp: i32,
        gold: i32,
    },
    EventOffered {
        kind: EventKind,
    },
    EncounterStarted {
        monster: String,
        hp: i32,
        attack: i32,
    },
    HandDrawn {
        size: usize,
    },
    NotEnoughEnergy {
        card: String,
        required: u32,
        available: u32,
    },
    CardPlayed {
        card: String,
        cost: u32,
    },
    DamageDealt {
        card: String,
        amount: i32,
    },
    BlockGained {
        amount: i32,
    },
    Healed {
        amount: i32,
    },
    MonsterDefeated {
        monster: String,
        gold: i32,
    },
    CardRewarded {
        card: String,
    },
    FloorAdvanced {
        floor: u32,
    },
    MonsterAttacked {
        monster: String,
        damage: i32,
        absorbed: i32,
    },
    PlayerDefeated {
        monster: String,
        floor: u32,
    },
    TurnEnded,
    Fled {
        monster: String,
    },
    GoldFound {
        amount: i32,
    },
    CardAcquired {
        card: String,
    },
    Rested {
        amount: i32,
    },
    CardRemoved {
        card: String,
    },
    UpgradeSkipped {
        deck_size: usize,
    },
    ShopEntered,
    ShopLeft,
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::RunStarted { hp, gold } => {
                write!(f, "A new run begins with {hp} HP and {gold} gold")
            }
            GameEvent::EventOffered { kind } => write!(f, "The path ahead leads to {kind:?}"),
            GameEvent::EncounterStarted { monster, hp, .. } => {
                write!(f, "{monster} appears with {hp} HP!")
            }
            GameEvent::HandDrawn { size } => write!(f, "Drew {size} cards"),
            GameEvent::NotEnoughEnergy { .. } => f.write_str("Not enough energy!"),
            GameEvent::CardPlayed { card, cost } => write!(f, "Played {card} ({cost} energy)"),
            GameEvent::DamageDealt { card, amount } => write!(f, "{card} deals {amount} damage!"),
            GameEvent::BlockGained { amount } => write!(f, "Gained {amount} block!"),
            GameEvent::Healed { amount } => write!(f, "Healed {amount} HP!"),
            GameEvent::MonsterDefeated { monster, .. } => write!(f, "{monster} defeated!"),
            GameEvent::CardRewarded { card } => write!(f, "Gained {card}!"),
            GameEvent::FloorAdvanced { floor } => write!(f, "Descended to floor {floor}"),
            GameEvent::MonsterAttacked {
                monster, damage, ..
            } => write!(f, "{monster} attacks for {damage} damage!"),
            GameEvent::PlayerDefeated { monster, floor } => {
                write!(f, "Slain by {monster} on floor {floor}")
            }
            GameEvent::TurnEnded => f.write_str("Turn ended"),
            GameEvent::Fled { monster } => write!(f, "Fled from {monster}"),
            GameEvent::GoldFound { amount } => write!(f, "Found {amount} gold!"),
            GameEvent::CardAcquired { card } => write!(f, "Gained {card}!"),
            GameEvent::Rested { amount } => write!(f, "Healed {amount} HP!"),
            GameEvent::CardRemoved { card } => write!(f, "Removed {card} from deck!"),
            GameEvent::UpgradeSkipped { .. } => f.write_str("Deck too small to remove cards!"),
            GameEvent::ShopEntered => f.write_str("The shop is closed for now"),
            GameEvent::ShopLeft => f.write_str("Left the shop"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    NegativeGold { value: i32 },
    NegativeBlock { value: i32 },
    HealthOutOfRange { value: i32, max: i32 },
    EnergyOutOfRange { value: u32, max: u32 },
    HandTooLarge { size: usize, limit: usize },
    EmptyDeck,
    HandCardNotInDeck { card: String },
}

impl fmt::Display for IntegrityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityError::NegativeGold { value } => write!(f, "gold is negative ({value})"),
            IntegrityError::NegativeBlock { value } => write!(f, "block is negative ({value})"),
            IntegrityError::HealthOutOfRange { value, max } => {
                write!(f, "hp {value} outside 0..={max}")
            }
            IntegrityError::EnergyOutOfRange { value, max } => {
                write!(f, "energy {value} exceeds max {max}")
            }
            IntegrityError::HandTooLarge { size, limit } => {
                write!(f, "hand holds {size} cards, limit is {limit}")
            }
            IntegrityError::EmptyDeck => f.write_str("deck is empty"),
            IntegrityError::HandCardNotInDeck { card } => {
                write!(f, "hand card {card} has no copy in the deck")
            }
        }
    }
}

/// 一局游戏的全部可变状态，由规则引擎独占并顺序修改。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunState {
    #[serde(default)]
    pub config: RunConfig,
    pub player: Player,
    pub floor: u32,
    #[serde(default)]
    pub phase: Phase,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub combat_log: Vec<GameEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offered_event: Option<EventKind>,
}

impl RunState {
    pub fn new(config: RunConfig) -> Self {
        Self {
            player: Player::new(&config),
            config,
            floor: 1,
            phase: Phase::Map,
            combat_log: Vec::new(),
            offered_event: None,
        }
    }

    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    pub fn record_events(&mut self, events: &[GameEvent]) {
        self.combat_log.extend_from_slice(events);
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        let player = &self.player;
        if player.gold < 0 {
            return Err(IntegrityError::NegativeGold { value: player.gold });
        }
        if player.block < 0 {
            return Err(IntegrityError::NegativeBlock {
                value: player.block,
            });
        }
        if player.hp < 0 || player.hp > player.max_hp {
            return Err(IntegrityError::HealthOutOfRange {
                value: player.hp,
                max: player.max_hp,
            });
        }
        if player.energy > player.max_energy {
            return Err(IntegrityError::EnergyOutOfRange {
                value: player.energy,
                max: player.max_energy,
            });
        }
        if player.hand.len() > self.config.hand_size {
            return Err(IntegrityError::HandTooLarge {
                size: player.hand.len(),
                limit: self.config.hand_size,
            });
        }
        if player.deck.is_empty() {
            return Err(IntegrityError::EmptyDeck);
        }

        for card in &player.hand {
            let in_hand = player.hand.iter().filter(|other| *other == card).count();
            let in_deck = player.deck.iter().filter(|other| *other == card).count();
            if in_hand > in_deck {
                return Err(IntegrityError::HandCardNotInDeck {
                    card: card.name.clone(),
                });
            }
        }

        Ok(())
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}
