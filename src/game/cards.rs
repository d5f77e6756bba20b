use std::fmt;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardKind {
    Attack,
    Defense,
    Heal,
    Utility,
}

impl fmt::Display for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CardKind::Attack => "Attack",
            CardKind::Defense => "Defense",
            CardKind::Heal => "Heal",
            CardKind::Utility => "Utility",
        };
        f.write_str(label)
    }
}

/// 卡牌模板。加入牌组或作为奖励时按值复制。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Card {
    pub name: String,
    pub kind: CardKind,
    pub cost: u32,
    #[serde(default)]
    pub damage: i32,
    #[serde(default)]
    pub block: i32,
    #[serde(default)]
    pub heal: i32,
    #[serde(default)]
    pub description: String,
}

impl Card {
    pub fn new(name: impl Into<String>, kind: CardKind, cost: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            cost,
            damage: 0,
            block: 0,
            heal: 0,
            description: String::new(),
        }
    }

    pub fn attack(name: impl Into<String>, cost: u32, damage: i32) -> Self {
        Self::new(name, CardKind::Attack, cost)
            .with_damage(damage)
            .with_description(format!("Deal {damage} damage"))
    }

    pub fn defense(name: impl Into<String>, cost: u32, block: i32) -> Self {
        Self::new(name, CardKind::Defense, cost)
            .with_block(block)
            .with_description(format!("Gain {block} block"))
    }

    pub fn heal(name: impl Into<String>, cost: u32, heal: i32) -> Self {
        Self::new(name, CardKind::Heal, cost)
            .with_heal(heal)
            .with_description(format!("Restore {heal} HP"))
    }

    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_block(mut self, block: i32) -> Self {
        self.block = block;
        self
    }

    pub fn with_heal(mut self, heal: i32) -> Self {
        self.heal = heal;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

static DISCOVERABLE_CARDS: Lazy<Vec<Card>> = Lazy::new(|| {
    vec![
        Card::attack("Fireball", 2, 12),
        Card::attack("Lightning Bolt", 1, 8),
        Card::defense("Shield Wall", 2, 12),
        Card::defense("Iron Skin", 1, 8),
        Card::heal("Potion", 1, 5),
        Card::heal("Greater Heal", 3, 15),
        Card::attack("Power Strike", 3, 18),
        Card::attack("Quick Strike", 0, 3),
        Card::defense("Barrier", 3, 20),
        Card::heal("Regeneration", 2, 10),
    ]
});

static STARTER_DECK: Lazy<Vec<Card>> = Lazy::new(|| {
    let strike = Card::attack("Strike", 1, 6);
    let defend = Card::defense("Defend", 1, 5);
    let heal = Card::heal("Heal", 2, 8);

    let mut deck = vec![strike; 4];
    deck.extend(std::iter::repeat(defend).take(3));
    deck.push(heal);
    deck
});

/// 可在宝箱与怪物掉落中获得的全部卡牌。
pub fn all_cards() -> Vec<Card> {
    DISCOVERABLE_CARDS.clone()
}

/// 新一局开始时的 8 张初始牌组。
pub fn starter_deck() -> Vec<Card> {
    STARTER_DECK.clone()
}

pub fn random_card<R: Rng + ?Sized>(rng: &mut R) -> Card {
    DISCOVERABLE_CARDS[rng.gen_range(0..DISCOVERABLE_CARDS.len())].clone()
}
