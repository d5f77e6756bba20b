use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards::Card;
use super::monsters::Monster;
use super::state::{GameEvent, Player};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EffectTarget {
    Monster,
    Player,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum EffectKind {
    Damage { amount: i32 },
    Block { amount: i32 },
    Heal { amount: i32 },
}

impl EffectKind {
    pub fn target(&self) -> EffectTarget {
        match self {
            EffectKind::Damage { .. } => EffectTarget::Monster,
            EffectKind::Block { .. } | EffectKind::Heal { .. } => EffectTarget::Player,
        }
    }

    /// 应用单个效果。伤害不做下限截断，怪物 hp 可以暂时为负。
    pub fn apply(&self, source: &Card, player: &mut Player, monster: &mut Monster) -> GameEvent {
        match *self {
            EffectKind::Damage { amount } => {
                monster.hp -= amount;
                debug!(card = %source.name, amount, monster_hp = monster.hp, "damage applied");
                GameEvent::DamageDealt {
                    card: source.name.clone(),
                    amount,
                }
            }
            EffectKind::Block { amount } => {
                player.block += amount;
                debug!(card = %source.name, amount, block = player.block, "block gained");
                GameEvent::BlockGained { amount }
            }
            EffectKind::Heal { amount } => {
                let healed = player.heal(amount);
                debug!(card = %source.name, healed, hp = player.hp, "heal applied");
                GameEvent::Healed { amount: healed }
            }
        }
    }
}

/// 卡牌上所有非零效果，固定按 伤害、格挡、治疗 的顺序结算。
pub fn effects_of(card: &Card) -> Vec<EffectKind> {
    let mut effects = Vec::new();
    if card.damage > 0 {
        effects.push(EffectKind::Damage {
            amount: card.damage,
        });
    }
    if card.block > 0 {
        effects.push(EffectKind::Block { amount: card.block });
    }
    if card.heal > 0 {
        effects.push(EffectKind::Heal { amount: card.heal });
    }
    effects
}

pub fn apply_card(card: &Card, player: &mut Player, monster: &mut Monster) -> Vec<GameEvent> {
    effects_of(card)
        .iter()
        .map(|effect| effect.apply(card, player, monster))
        .collect()
}
