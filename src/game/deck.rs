use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cards::Card;
use super::rules::RuleError;

/// 按名称聚合的牌组条目，顺序与该名称第一次出现的位置一致。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeckEntry {
    pub name: String,
    pub count: usize,
}

pub fn draw_hand<R: Rng + ?Sized>(deck: &[Card], hand_size: usize, rng: &mut R) -> Vec<Card> {
    let mut pool = deck.to_vec();
    let amount = hand_size.min(pool.len());
    let (drawn, _) = pool.partial_shuffle(rng, amount);
    debug!(drawn = drawn.len(), deck = deck.len(), "hand drawn");
    drawn.to_vec()
}

pub fn remove_from_hand(hand: &mut Vec<Card>, index: usize) -> Result<Card, RuleError> {
    if index >= hand.len() {
        return Err(RuleError::HandIndexOutOfRange {
            index,
            hand_size: hand.len(),
        });
    }
    Ok(hand.remove(index))
}

pub fn add_card_to_deck(deck: &mut Vec<Card>, card: Card) {
    deck.push(card);
}

pub fn remove_random_from_deck<R: Rng + ?Sized>(deck: &mut Vec<Card>, rng: &mut R) -> Option<Card> {
    if deck.is_empty() {
        return None;
    }
    let index = rng.gen_range(0..deck.len());
    Some(deck.remove(index))
}

/// 只有牌组大于 `min_size` 时才移除一张随机卡牌。
pub fn trim_deck<R: Rng + ?Sized>(
    deck: &mut Vec<Card>,
    min_size: usize,
    rng: &mut R,
) -> Result<Card, RuleError> {
    if deck.len() <= min_size {
        return Err(RuleError::DeckTooSmall {
            size: deck.len(),
            minimum: min_size,
        });
    }
    remove_random_from_deck(deck, rng).ok_or(RuleError::DeckTooSmall {
        size: 0,
        minimum: min_size,
    })
}

pub fn deck_summary(deck: &[Card]) -> Vec<DeckEntry> {
    let mut entries: Vec<DeckEntry> = Vec::new();
    for card in deck {
        match entries.iter_mut().find(|entry| entry.name == card.name) {
            Some(entry) => entry.count += 1,
            None => entries.push(DeckEntry {
                name: card.name.clone(),
                count: 1,
            }),
        }
    }
    entries
}
