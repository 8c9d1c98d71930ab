//! Dice roll results and the entropy seam used to produce them.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::DiceExpression;

/// Anything that can produce a face value for a single die.
///
/// Every [`rand::Rng`] is a roller. Tests substitute loaded dice to force
/// particular faces.
pub trait DieRoller {
    /// Roll one die, returning a value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<R: Rng + ?Sized> DieRoller for R {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.random_range(1..=sides)
    }
}

/// The result of evaluating a dice expression once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    /// The expression that was rolled.
    pub expression: DiceExpression,
    /// Individual die faces, in roll order.
    pub rolls: Vec<u32>,
    /// Sum of the faces plus the modifier. May be negative.
    pub total: i64,
}

impl DiceRoll {
    /// The first die face, or 0 if nothing was rolled.
    pub fn first_face(&self) -> u32 {
        self.rolls.first().copied().unwrap_or(0)
    }

    /// Whether every die landed on its highest face.
    pub fn is_max(&self) -> bool {
        self.rolls.iter().all(|&face| face == self.expression.sides())
    }

    /// The total floored at zero and narrowed to `i32`.
    pub fn non_negative(&self) -> i32 {
        i32::try_from(self.total.max(0)).unwrap_or(i32::MAX)
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let values: Vec<String> = self.rolls.iter().map(|v| v.to_string()).collect();
        let modifier = self.expression.modifier();
        match modifier {
            0 => write!(f, "[{}] = {}", values.join(", "), self.total),
            m if m > 0 => write!(f, "[{}] +{m} = {}", values.join(", "), self.total),
            m => write!(f, "[{}] {m} = {}", values.join(", "), self.total),
        }
    }
}
