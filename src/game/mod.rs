pub mod cards;
pub mod combat;
pub mod config;
pub mod deck;
pub mod effects;
pub mod monsters;
pub mod rules;
pub mod snapshot;
pub mod state;


pub use cards::{all_cards, random_card, starter_deck, Card, CardKind};
pub use combat::{Encounter, EncounterStatus};
pub use config::RunConfig;
pub use deck::{
    add_card_to_deck, deck_summary, draw_hand, remove_from_hand, remove_random_from_deck,
    trim_deck, DeckEntry,
};
pub use effects::{apply_card, effects_of, EffectKind, EffectTarget};
pub use monsters::{base_monsters, monsters_for_floor, Monster};
pub use rules::{ErrorCategory, RuleEngine, RuleError, RuleResolution};
pub use snapshot::{MonsterView, PlayerView, RunSnapshot};
pub use state::{
    EventKind, GameEvent, IntegrityError, Phase, PhaseKind, Player, RunState, UnknownEventKind,
};
