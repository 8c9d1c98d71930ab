//! Initiative: who acts in what order.

use serde::{Deserialize, Serialize};

use super::{Combatant, Side};
use crate::dice::{DiceExpression, DieRoller};

/// One slot in the initiative order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    /// Which side the combatant fights for.
    pub side: Side,
    /// Index of the combatant in its side's list.
    pub index: usize,
    /// Display name at the time initiative was rolled.
    pub name: String,
    /// The d20 face rolled.
    pub roll: u32,
}

impl std::fmt::Display for InitiativeEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.name, self.side, self.roll)
    }
}

/// Roll `1d20` for every combatant and sort the results.
///
/// Everyone rolls, living or not, party first and then enemies, each in list
/// order. Higher rolls act first. Equal rolls put the party ahead of the
/// enemies and otherwise keep list order.
pub fn roll_initiative<R: DieRoller + ?Sized>(
    party: &[Combatant],
    enemies: &[Combatant],
    roller: &mut R,
) -> Vec<InitiativeEntry> {
    let mut order: Vec<InitiativeEntry> = party
        .iter()
        .enumerate()
        .map(|(index, c)| (Side::Party, index, c))
        .chain(
            enemies
                .iter()
                .enumerate()
                .map(|(index, c)| (Side::Enemies, index, c)),
        )
        .map(|(side, index, combatant)| {
            let roll = DiceExpression::D20.evaluate(roller).first_face();
            tracing::debug!(name = %combatant.name, %side, roll, "initiative");
            InitiativeEntry {
                side,
                index,
                name: combatant.name.clone(),
                roll,
            }
        })
        .collect();

    order.sort_by(|a, b| {
        b.roll
            .cmp(&a.roll)
            .then(a.side.cmp(&b.side))
            .then(a.index.cmp(&b.index))
    });
    order
}
