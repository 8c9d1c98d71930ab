//! Game mechanics engine for Dungeon Master.
//!
//! Provides the dice-notation evaluator shared by every random draw in the
//! game, the turn-based combat resolver, and the party character sheet that
//! feeds combat. Every function that consumes entropy takes the random
//! source as an argument, so a seeded generator reproduces a fight exactly.

pub mod combat;
pub mod dice;
pub mod error;
pub mod sheet;

pub use combat::{
    CombatConfig, CombatEvent, CombatOutcome, Combatant, FirstLiving, Side, TargetPolicy,
};
pub use dice::{DiceExpression, DiceRoll, DieRoller};
pub use error::{MechError, MechResult};
pub use sheet::{Ability, AbilityScores, CharacterSheet};
