use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::deck::{deck_summary, DeckEntry};
use super::state::{EventKind, PhaseKind, RunState};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerView {
    pub hp: i32,
    pub max_hp: i32,
    pub energy: u32,
    pub max_energy: u32,
    pub gold: i32,
    pub block: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonsterView {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSnapshot {
    pub player: PlayerView,
    pub floor: u32,
    pub phase: PhaseKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monster: Option<MonsterView>,
    pub hand: Vec<Card>,
    pub combat_log: Vec<String>,
    pub deck: Vec<DeckEntry>,
    pub deck_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offered_event: Option<EventKind>,
}

impl RunSnapshot {
    pub fn from_state(state: &RunState) -> Self {
        let player = &state.player;
        let monster = state.phase.encounter().map(|encounter| MonsterView {
            name: encounter.monster.name.clone(),
            hp: encounter.monster.hp,
            max_hp: encounter.monster.max_hp,
            attack: encounter.monster.attack,
            description: encounter.monster.description.clone(),
        });

        Self {
            player: PlayerView {
                hp: player.hp,
                max_hp: player.max_hp,
                energy: player.energy,
                max_energy: player.max_energy,
                gold: player.gold,
                block: player.block,
            },
            floor: state.floor,
            phase: state.phase.kind(),
            monster,
            hand: player.hand.clone(),
            combat_log: state.combat_log.iter().map(ToString::to_string).collect(),
            deck: deck_summary(&player.deck),
            deck_size: player.deck.len(),
            offered_event: state.offered_event,
        }
    }
}
