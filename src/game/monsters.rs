use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cards::{random_card, Card};

const HP_PER_FLOOR: i32 = 5;
const ATTACK_PER_FLOOR: i32 = 2;
const GOLD_PER_FLOOR: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Monster {
    pub name: String,
    pub description: String,
    pub hp: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub gold_reward: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_reward: Option<Card>,
}

impl Monster {
    pub fn new(
        name: impl Into<String>,
        hp: i32,
        attack: i32,
        description: impl Into<String>,
        gold_reward: i32,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            hp,
            max_hp: hp,
            attack,
            gold_reward,
            card_reward: None,
        }
    }

    /// 按楼层放大基础属性；缩放后的 hp 同时成为新的上限。极高楼层饱和在 `i32::MAX`。
    pub fn scaled(mut self, floor: u32) -> Self {
        let floor = i32::try_from(floor).unwrap_or(i32::MAX);
        self.hp = self.hp.saturating_add(HP_PER_FLOOR.saturating_mul(floor));
        self.max_hp = self.hp;
        self.attack = self
            .attack
            .saturating_add(ATTACK_PER_FLOOR.saturating_mul(floor));
        self.gold_reward = self
            .gold_reward
            .saturating_add(GOLD_PER_FLOOR.saturating_mul(floor));
        self
    }

    pub fn with_card_reward(mut self, card: Card) -> Self {
        self.card_reward = Some(card);
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0
    }
}

static BASE_MONSTERS: Lazy<Vec<Monster>> = Lazy::new(|| {
    vec![
        Monster::new("Goblin", 20, 5, "A small but vicious creature", 15),
        Monster::new("Orc", 35, 8, "A brutish warrior", 25),
        Monster::new("Skeleton", 25, 6, "Animated bones", 20),
        Monster::new("Spider", 15, 4, "Eight-legged horror", 12),
        Monster::new("Bandit", 30, 7, "A desperate criminal", 22),
    ]
});

pub fn base_monsters() -> Vec<Monster> {
    BASE_MONSTERS.clone()
}

/// 生成某一层的怪物名单。属性缩放是确定的，只有卡牌掉落依赖 `rng`。
pub fn monsters_for_floor<R: Rng + ?Sized>(
    floor: u32,
    reward_chance: f64,
    rng: &mut R,
) -> Vec<Monster> {
    let chance = if reward_chance.is_nan() {
        0.0
    } else {
        reward_chance.clamp(0.0, 1.0)
    };
    BASE_MONSTERS
        .iter()
        .cloned()
        .map(|monster| {
            let monster = monster.scaled(floor);
            if rng.gen_bool(chance) {
                monster.with_card_reward(random_card(&mut *rng))
            } else {
                monster
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::all_cards;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn find<'a>(roster: &'a [Monster], name: &str) -> &'a Monster {
        roster
            .iter()
            .find(|monster| monster.name == name)
            .expect("monster should be in roster")
    }

    #[test]
    fn floor_three_goblin_is_scaled() {
        let mut rng = SmallRng::seed_from_u64(3);
        let roster = monsters_for_floor(3, 0.3, &mut rng);
        assert_eq!(roster.len(), 5);

        let goblin = find(&roster, "Goblin");
        assert_eq!(goblin.hp, 35);
        assert_eq!(goblin.max_hp, 35);
        assert_eq!(goblin.attack, 11);
        assert_eq!(goblin.gold_reward, 30);
    }

    #[test]
    fn scaling_ignores_seed() {
        for seed in 0..20 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let roster = monsters_for_floor(1, 0.3, &mut rng);
            let orc = find(&roster, "Orc");
            assert_eq!((orc.hp, orc.max_hp, orc.attack, orc.gold_reward), (40, 40, 10, 30));
        }
    }

    #[test]
    fn reward_chance_bounds() {
        let mut rng = SmallRng::seed_from_u64(5);
        let none = monsters_for_floor(2, 0.0, &mut rng);
        assert!(none.iter().all(|monster| monster.card_reward.is_none()));

        let catalog = all_cards();
        let all = monsters_for_floor(2, 1.0, &mut rng);
        for monster in &all {
            let reward = monster
                .card_reward
                .as_ref()
                .expect("guaranteed reward");
            assert!(catalog.contains(reward));
        }
    }

    #[test]
    fn default_reward_chance_holds_over_many_rosters() {
        let mut rng = SmallRng::seed_from_u64(2000);
        let mut rewarded = 0usize;
        let mut total = 0usize;
        for _ in 0..2000 {
            let roster = monsters_for_floor(1, 0.3, &mut rng);
            total += roster.len();
            rewarded += roster
                .iter()
                .filter(|monster| monster.card_reward.is_some())
                .count();
        }
        let rate = rewarded as f64 / total as f64;
        assert!((0.27..=0.33).contains(&rate), "reward rate {rate}");
    }

    #[test]
    fn huge_floors_saturate_instead_of_wrapping() {
        let mut rng = SmallRng::seed_from_u64(0);
        let roster = monsters_for_floor(500_000_000, 0.3, &mut rng);
        let goblin = find(&roster, "Goblin");
        assert_eq!((goblin.hp, goblin.max_hp), (i32::MAX, i32::MAX));
        assert_eq!(goblin.attack, 1_000_000_005);
        assert_eq!(goblin.gold_reward, i32::MAX);

        for monster in monsters_for_floor(u32::MAX, 0.3, &mut rng) {
            assert_eq!(monster.hp, i32::MAX);
            assert_eq!(monster.attack, i32::MAX);
            assert_eq!(monster.gold_reward, i32::MAX);
        }
    }

    #[test]
    fn defeat_threshold_is_zero() {
        let mut spider = base_monsters().remove(3);
        spider.hp = 1;
        assert!(!spider.is_defeated());
        spider.hp = 0;
        assert!(spider.is_defeated());
        spider.hp = -4;
        assert!(spider.is_defeated());
    }
}
