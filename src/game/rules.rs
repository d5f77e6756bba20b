use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{
    cards::random_card,
    combat::{Encounter, EncounterStatus},
    config::RunConfig,
    deck::{add_card_to_deck, draw_hand, trim_deck},
    monsters::monsters_for_floor,
    snapshot::RunSnapshot,
    state::{EventKind, GameEvent, IntegrityError, Phase, PhaseKind, RunState},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorCategory {
    InvalidIntent,
    InsufficientResources,
    InvariantViolation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(tag = "type")]
pub enum RuleError {
    #[error("intent requires the {expected} phase, but the run is in {actual}")]
    InvalidPhase {
        expected: PhaseKind,
        actual: PhaseKind,
    },
    #[error("no card at hand index {index} (hand holds {hand_size})")]
    HandIndexOutOfRange { index: usize, hand_size: usize },
    #[error("no shop on floor {floor}")]
    ShopUnavailable { floor: u32 },
    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: u32, available: u32 },
    #[error("deck of {size} cards cannot shrink below {minimum}")]
    DeckTooSmall { size: usize, minimum: usize },
    #[error("state integrity violated: {error}")]
    IntegrityViolation { error: IntegrityError },
}

impl RuleError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RuleError::InvalidPhase { .. }
            | RuleError::HandIndexOutOfRange { .. }
            | RuleError::ShopUnavailable { .. } => ErrorCategory::InvalidIntent,
            RuleError::InsufficientEnergy { .. } | RuleError::DeckTooSmall { .. } => {
                ErrorCategory::InsufficientResources
            }
            RuleError::IntegrityViolation { .. } => ErrorCategory::InvariantViolation,
        }
    }

    /// 资源不足与状态校验失败不算致命错误，表现层应提示玩家后继续。
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::InvalidIntent
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleResolution {
    pub snapshot: RunSnapshot,
    pub events: Vec<GameEvent>,
}

impl RuleResolution {
    pub fn new(state: &RunState, events: Vec<GameEvent>) -> Self {
        Self {
            snapshot: RunSnapshot::from_state(state),
            events,
        }
    }
}

/// 一局游戏的状态机。持有唯一的随机源，所有意图都经过这里。
pub struct RuleEngine<R: Rng = SmallRng> {
    rng: R,
}

impl RuleEngine<SmallRng> {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_entropy())
    }
}

impl<R: Rng> RuleEngine<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn ensure_phase(state: &RunState, expected: PhaseKind) -> Result<(), RuleError> {
        let actual = state.phase.kind();
        if actual != expected {
            warn!(%expected, %actual, "intent rejected in wrong phase");
            return Err(RuleError::InvalidPhase { expected, actual });
        }
        Ok(())
    }

    fn ensure_integrity(state: &RunState) -> Result<(), RuleError> {
        state.integrity_check().map_err(|error| {
            warn!(%error, "state integrity check failed");
            RuleError::IntegrityViolation { error }
        })
    }

    fn precheck(state: &RunState, expected: PhaseKind) -> Result<(), RuleError> {
        Self::ensure_integrity(state)?;
        Self::ensure_phase(state, expected)
    }

    /// 地图上展示的事件：在战斗、宝箱、休息中均匀抽取，商店楼层额外加入商店。
    pub fn roll_event(&mut self, config: &RunConfig, floor: u32) -> EventKind {
        let mut pool = vec![EventKind::Combat, EventKind::Treasure, EventKind::Rest];
        if config.shop_available(floor) {
            pool.push(EventKind::Shop);
        }
        pool[self.rng.gen_range(0..pool.len())]
    }

    fn return_to_map(&mut self, state: &mut RunState) -> GameEvent {
        state.phase = Phase::Map;
        let kind = self.roll_event(&state.config, state.floor);
        state.offered_event = Some(kind);
        GameEvent::EventOffered { kind }
    }

    pub fn start_run(&mut self, config: RunConfig) -> RunState {
        let mut state = RunState::new(config);
        self.return_to_map(&mut state);
        info!(
            hp = state.player.hp,
            gold = state.player.gold,
            "run started"
        );
        state
    }

    pub fn choose_map_event(
        &mut self,
        state: &mut RunState,
        kind: EventKind,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Map)?;

        match kind {
            EventKind::Combat => {
                let mut roster = monsters_for_floor(
                    state.floor,
                    state.config.card_reward_chance,
                    &mut self.rng,
                );
                let pick = self.rng.gen_range(0..roster.len());
                let monster = roster.swap_remove(pick);
                Ok(self.start_encounter(state, Encounter::new(monster)))
            }
            EventKind::Treasure => {
                state.phase = Phase::Treasure;
                Ok(Vec::new())
            }
            EventKind::Rest => {
                state.phase = Phase::Rest;
                Ok(Vec::new())
            }
            EventKind::Shop => {
                if !state.config.shop_available(state.floor) {
                    warn!(floor = state.floor, "shop chosen off a shop floor");
                    return Err(RuleError::ShopUnavailable { floor: state.floor });
                }
                state.phase = Phase::Shop;
                Ok(vec![GameEvent::ShopEntered])
            }
        }
    }

    /// 进入一场已确定怪物的遭遇：清空战斗日志并抽起手牌。
    pub fn start_encounter(&mut self, state: &mut RunState, encounter: Encounter) -> Vec<GameEvent> {
        info!(
            floor = state.floor,
            monster = %encounter.monster.name,
            hp = encounter.monster.hp,
            "encounter started"
        );
        let mut events = vec![GameEvent::EncounterStarted {
            monster: encounter.monster.name.clone(),
            hp: encounter.monster.hp,
            attack: encounter.monster.attack,
        }];

        state.combat_log.clear();
        state.offered_event = None;
        state.player.hand = draw_hand(&state.player.deck, state.config.hand_size, &mut self.rng);
        events.push(GameEvent::HandDrawn {
            size: state.player.hand.len(),
        });
        state.phase = Phase::Combat(encounter);
        state.record_events(&events);
        events
    }

    pub fn play_card(
        &mut self,
        state: &mut RunState,
        index: usize,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Combat)?;

        let actual = state.phase.kind();
        let Phase::Combat(encounter) = &mut state.phase else {
            return Err(RuleError::InvalidPhase {
                expected: PhaseKind::Combat,
                actual,
            });
        };

        let mut events = match encounter.play_card(&mut state.player, index) {
            Ok(events) => events,
            Err(RuleError::InsufficientEnergy {
                required,
                available,
            }) => {
                let card = state
                    .player
                    .hand
                    .get(index)
                    .map(|card| card.name.clone())
                    .unwrap_or_default();
                warn!(%card, required, available, "card rejected for energy");
                state.combat_log.push(GameEvent::NotEnoughEnergy {
                    card,
                    required,
                    available,
                });
                return Err(RuleError::InsufficientEnergy {
                    required,
                    available,
                });
            }
            Err(error) => {
                warn!(%error, "card play rejected");
                return Err(error);
            }
        };

        if encounter.status == EncounterStatus::Won {
            events.extend(self.finish_victory(state));
        }
        state.record_events(&events);
        Ok(events)
    }

    fn finish_victory(&mut self, state: &mut RunState) -> Vec<GameEvent> {
        state.floor = state.floor.saturating_add(1);
        state.player.hand.clear();
        info!(floor = state.floor, "floor advanced");

        let mut events = vec![GameEvent::FloorAdvanced { floor: state.floor }];
        events.push(self.return_to_map(state));
        events
    }

    pub fn end_turn(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Combat)?;

        let hand_size = state.config.hand_size;
        let floor = state.floor;
        let actual = state.phase.kind();
        let Phase::Combat(encounter) = &mut state.phase else {
            return Err(RuleError::InvalidPhase {
                expected: PhaseKind::Combat,
                actual,
            });
        };

        let mut events = encounter.end_turn(&mut state.player, hand_size, &mut self.rng);

        if encounter.status == EncounterStatus::Lost {
            let monster = encounter.monster.name.clone();
            info!(floor, %monster, "player defeated");
            events.push(GameEvent::PlayerDefeated { monster, floor });
            state.phase = Phase::GameOver;
        }

        state.record_events(&events);
        Ok(events)
    }

    pub fn flee(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Combat)?;

        let actual = state.phase.kind();
        let Phase::Combat(encounter) = &mut state.phase else {
            return Err(RuleError::InvalidPhase {
                expected: PhaseKind::Combat,
                actual,
            });
        };
        let mut events = vec![encounter.flee()];
        info!(monster = %encounter.monster.name, "fled encounter");

        state.player.hand.clear();
        events.push(self.return_to_map(state));
        state.record_events(&events);
        Ok(events)
    }

    pub fn treasure_take_gold(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Treasure)?;

        let (low, high) = (state.config.treasure_gold_min, state.config.treasure_gold_max);
        let amount = self.rng.gen_range(low.min(high)..=high.max(low));
        state.player.gold = state.player.gold.saturating_add(amount);
        info!(amount, gold = state.player.gold, "treasure gold taken");

        Ok(vec![
            GameEvent::GoldFound { amount },
            self.return_to_map(state),
        ])
    }

    pub fn treasure_take_card(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Treasure)?;

        let card = random_card(&mut self.rng);
        let event = GameEvent::CardAcquired {
            card: card.name.clone(),
        };
        info!(card = %card.name, "treasure card taken");
        add_card_to_deck(&mut state.player.deck, card);

        Ok(vec![event, self.return_to_map(state)])
    }

    pub fn rest_heal(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Rest)?;

        let amount = state.player.heal(state.config.rest_heal);
        info!(amount, hp = state.player.hp, "rested");

        Ok(vec![GameEvent::Rested { amount }, self.return_to_map(state)])
    }

    /// 休息点移除一张随机卡牌；牌组已到下限时仅报告，不视为错误。
    pub fn rest_upgrade(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Rest)?;

        let event = match trim_deck(
            &mut state.player.deck,
            state.config.min_deck_size,
            &mut self.rng,
        ) {
            Ok(card) => {
                info!(card = %card.name, deck = state.player.deck.len(), "card removed");
                GameEvent::CardRemoved { card: card.name }
            }
            Err(RuleError::DeckTooSmall { size, .. }) => {
                info!(deck = size, "deck at minimum, nothing removed");
                GameEvent::UpgradeSkipped { deck_size: size }
            }
            Err(error) => return Err(error),
        };

        Ok(vec![event, self.return_to_map(state)])
    }

    pub fn leave_shop(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::precheck(state, PhaseKind::Shop)?;
        Ok(vec![GameEvent::ShopLeft, self.return_to_map(state)])
    }

    pub fn restart(&mut self, state: &mut RunState) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_phase(state, PhaseKind::GameOver)?;

        info!(floor = state.floor, "run restarted");
        *state = self.start_run(state.config.clone());
        let mut events = vec![GameEvent::RunStarted {
            hp: state.player.hp,
            gold: state.player.gold,
        }];
        events.extend(state.offered_event.map(|kind| GameEvent::EventOffered { kind }));
        Ok(events)
    }
}
