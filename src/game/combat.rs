use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::deck::{add_card_to_deck, draw_hand, remove_from_hand};
use super::effects::apply_card;
use super::monsters::Monster;
use super::rules::RuleError;
use super::state::{GameEvent, Player};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EncounterStatus {
    Active,
    Won,
    Lost,
    Fled,
}

impl Default for EncounterStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// 一次遭遇。怪物只存在于遭遇内部，遭遇结束即被丢弃。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Encounter {
    pub monster: Monster,
    #[serde(default)]
    pub status: EncounterStatus,
}

impl Encounter {
    pub fn new(monster: Monster) -> Self {
        Self {
            monster,
            status: EncounterStatus::Active,
        }
    }

    /// 打出手牌中第 `index` 张牌。能量不足时只返回错误，不修改任何状态。
    pub fn play_card(
        &mut self,
        player: &mut Player,
        index: usize,
    ) -> Result<Vec<GameEvent>, RuleError> {
        let card = player
            .hand
            .get(index)
            .cloned()
            .ok_or(RuleError::HandIndexOutOfRange {
                index,
                hand_size: player.hand.len(),
            })?;

        if player.energy < card.cost {
            return Err(RuleError::InsufficientEnergy {
                required: card.cost,
                available: player.energy,
            });
        }

        player.energy -= card.cost;
        let mut events = vec![GameEvent::CardPlayed {
            card: card.name.clone(),
            cost: card.cost,
        }];
        events.extend(apply_card(&card, player, &mut self.monster));
        remove_from_hand(&mut player.hand, index)?;

        if self.monster.is_defeated() {
            events.extend(self.claim_rewards(player));
        }

        Ok(events)
    }

    fn claim_rewards(&mut self, player: &mut Player) -> Vec<GameEvent> {
        self.status = EncounterStatus::Won;
        player.gold = player.gold.saturating_add(self.monster.gold_reward);
        info!(
            monster = %self.monster.name,
            gold = self.monster.gold_reward,
            "monster defeated"
        );

        let mut events = vec![GameEvent::MonsterDefeated {
            monster: self.monster.name.clone(),
            gold: self.monster.gold_reward,
        }];
        if let Some(card) = self.monster.card_reward.take() {
            events.push(GameEvent::CardRewarded {
                card: card.name.clone(),
            });
            add_card_to_deck(&mut player.deck, card);
        }
        events
    }

    /// 怪物攻击。格挡按怪物攻击力整体扣减，最低为 0。
    pub fn monster_turn(&mut self, player: &mut Player) -> Option<GameEvent> {
        if self.monster.hp <= 0 {
            return None;
        }

        let attack = self.monster.attack;
        let damage = (attack - player.block).max(0);
        let absorbed = attack - damage;
        player.hp = (player.hp - damage).max(0);
        player.block = (player.block - attack).max(0);
        debug!(
            monster = %self.monster.name,
            damage,
            absorbed,
            hp = player.hp,
            "monster attacked"
        );

        if player.is_dead() {
            self.status = EncounterStatus::Lost;
        }

        Some(GameEvent::MonsterAttacked {
            monster: self.monster.name.clone(),
            damage,
            absorbed,
        })
    }

    /// 怪物反击、重置能量与格挡、重新抽牌，顺序固定，即使玩家已经倒下。
    pub fn end_turn<R: Rng + ?Sized>(
        &mut self,
        player: &mut Player,
        hand_size: usize,
        rng: &mut R,
    ) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::TurnEnded];
        events.extend(self.monster_turn(player));

        player.refresh_resources();
        player.hand = draw_hand(&player.deck, hand_size, rng);
        events.push(GameEvent::HandDrawn {
            size: player.hand.len(),
        });
        events
    }

    pub fn flee(&mut self) -> GameEvent {
        self.status = EncounterStatus::Fled;
        GameEvent::Fled {
            monster: self.monster.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{starter_deck, Card};
    use crate::game::config::RunConfig;
    use crate::game::monsters::base_monsters;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn goblin_fight() -> (Player, Encounter) {
        let mut player = Player::new(&RunConfig::default());
        player.hand = starter_deck()[..5].to_vec();
        let goblin = base_monsters().remove(0).scaled(1);
        (player, Encounter::new(goblin))
    }

    #[test]
    fn insufficient_energy_changes_nothing() {
        let (mut player, mut encounter) = goblin_fight();
        player.energy = 0;
        let before = (player.clone(), encounter.clone());

        let result = encounter.play_card(&mut player, 0);

        assert_eq!(
            result,
            Err(RuleError::InsufficientEnergy {
                required: 1,
                available: 0
            })
        );
        assert_eq!((player, encounter), before);
    }

    #[test]
    fn lethal_card_awards_gold_and_card() {
        let (mut player, mut encounter) = goblin_fight();
        encounter.monster.hp = 6;
        encounter.monster.card_reward = Some(Card::attack("Fireball", 2, 12));
        let gold_before = player.gold;

        let events = encounter
            .play_card(&mut player, 0)
            .expect("strike should resolve");

        assert_eq!(encounter.status, EncounterStatus::Won);
        assert_eq!(player.gold, gold_before + encounter.monster.gold_reward);
        assert_eq!(player.deck.len(), 9);
        assert_eq!(player.deck.last().map(|card| card.name.as_str()), Some("Fireball"));
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::CardRewarded { card } if card == "Fireball")));
    }

    #[test]
    fn gold_reward_saturates_at_max() {
        let (mut player, mut encounter) = goblin_fight();
        encounter.monster = encounter.monster.scaled(u32::MAX);
        encounter.monster.hp = 1;
        player.gold = 100;

        encounter
            .play_card(&mut player, 0)
            .expect("strike should resolve");

        assert_eq!(encounter.status, EncounterStatus::Won);
        assert_eq!(player.gold, i32::MAX);
    }

    #[test]
    fn block_depletes_by_full_attack() {
        let (mut player, mut encounter) = goblin_fight();
        encounter.monster.attack = 7;
        player.block = 10;

        let event = encounter.monster_turn(&mut player).expect("monster is alive");

        assert_eq!(player.hp, 50);
        assert_eq!(player.block, 3);
        assert_eq!(
            event,
            GameEvent::MonsterAttacked {
                monster: "Goblin".into(),
                damage: 0,
                absorbed: 7
            }
        );
    }

    #[test]
    fn dead_monster_does_not_retaliate() {
        let (mut player, mut encounter) = goblin_fight();
        encounter.monster.hp = 0;
        assert!(encounter.monster_turn(&mut player).is_none());
        assert_eq!(player.hp, 50);
    }

    #[test]
    fn end_turn_redraws_even_after_death() {
        let (mut player, mut encounter) = goblin_fight();
        player.hp = 3;
        player.energy = 0;
        player.block = 2;
        let mut rng = SmallRng::seed_from_u64(9);

        let events = encounter.end_turn(&mut player, 5, &mut rng);

        assert_eq!(encounter.status, EncounterStatus::Lost);
        assert_eq!(player.hp, 0);
        assert_eq!(player.energy, player.max_energy);
        assert_eq!(player.block, 0);
        assert_eq!(player.hand.len(), 5);
        assert_eq!(events.last(), Some(&GameEvent::HandDrawn { size: 5 }));
    }

    #[test]
    fn flee_grants_nothing() {
        let (player, mut encounter) = goblin_fight();
        let event = encounter.flee();
        assert_eq!(encounter.status, EncounterStatus::Fled);
        assert_eq!(event, GameEvent::Fled { monster: "Goblin".into() });
        assert_eq!(player.gold, 50);
    }

    proptest! {
        #[test]
        fn retaliation_arithmetic(attack in 0i32..40, block in 0i32..40, hp in 1i32..60) {
            let (mut player, mut encounter) = goblin_fight();
            encounter.monster.attack = attack;
            player.max_hp = 60;
            player.hp = hp;
            player.block = block;

            let event = encounter.monster_turn(&mut player);

            let expected = (attack - block).max(0);
            prop_assert!(player.block >= 0);
            prop_assert_eq!(player.block, (block - attack).max(0));
            prop_assert_eq!(player.hp, (hp - expected).max(0));
            let dealt = match event {
                Some(GameEvent::MonsterAttacked { damage, .. }) => damage,
                _ => -1,
            };
            prop_assert_eq!(dealt, expected);
        }

        #[test]
        fn unaffordable_cards_are_rejected(energy in 0u32..3, cost in 0u32..6) {
            prop_assume!(cost > energy);
            let (mut player, mut encounter) = goblin_fight();
            player.energy = energy;
            player.hand[0] = Card::attack("Costly", cost, 9);
            let before = (player.clone(), encounter.clone());

            let result = encounter.play_card(&mut player, 0);

            prop_assert!(
                matches!(result, Err(RuleError::InsufficientEnergy { .. })),
                "expected insufficient energy"
            );
            prop_assert_eq!((player, encounter), before);
        }
    }
}
