//! Dice notation, parsing, and rolling.
//!
//! A [`DiceExpression`] is the `count`/`sides`/`modifier` triple behind
//! strings like `"d20"`, `"2d6+3"` or `"3d4-1"`. Expressions are parsed once
//! and re-rolled on every evaluation; the random source is always supplied
//! by the caller.

pub mod notation;
pub mod roll;

pub use notation::parse;
pub use roll::{DiceRoll, DieRoller};

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// Upper bound on the number of dice a single expression may roll.
pub const MAX_DICE: u32 = 10_000;

/// A parsed dice expression: roll `count` dice with `sides` faces and add
/// `modifier` to the sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceExpression {
    count: u32,
    sides: u32,
    modifier: i32,
}

impl DiceExpression {
    /// A single twenty-sided die, used for initiative and to-hit checks.
    pub const D20: Self = Self {
        count: 1,
        sides: 20,
        modifier: 0,
    };

    /// Build an expression from its parts.
    ///
    /// `count` must be in `1..=MAX_DICE` and `sides` at least 1 (`1d1` is
    /// the degenerate die that always shows 1).
    pub fn new(count: u32, sides: u32, modifier: i32) -> MechResult<Self> {
        let notation = || format_notation(count, sides, modifier);
        if count == 0 {
            return Err(MechError::malformed(&notation(), "dice count must be positive"));
        }
        if count > MAX_DICE {
            return Err(MechError::malformed(
                &notation(),
                format!("at most {MAX_DICE} dice may be rolled at once"),
            ));
        }
        if sides == 0 {
            return Err(MechError::malformed(&notation(), "die sides must be positive"));
        }
        Ok(Self {
            count,
            sides,
            modifier,
        })
    }

    /// Number of dice rolled.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Faces on each die.
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Flat amount added to the sum of the dice.
    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// The same dice with `delta` added to the modifier.
    pub fn with_bonus(self, delta: i32) -> Self {
        Self {
            modifier: self.modifier.saturating_add(delta),
            ..self
        }
    }

    /// Smallest possible total (every die shows 1).
    pub fn min_total(&self) -> i64 {
        i64::from(self.count) + i64::from(self.modifier)
    }

    /// Largest possible total (every die shows its highest face).
    pub fn max_total(&self) -> i64 {
        i64::from(self.count) * i64::from(self.sides) + i64::from(self.modifier)
    }

    /// Roll every die and add the modifier.
    ///
    /// The total is returned as-is, so a large negative modifier can make it
    /// negative; callers that need a floor apply it themselves.
    pub fn evaluate<R: DieRoller + ?Sized>(&self, roller: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| roller.roll_die(self.sides))
            .collect();
        let sum: i64 = rolls.iter().map(|&face| i64::from(face)).sum();
        let total = sum + i64::from(self.modifier);
        tracing::trace!(expression = %self, ?rolls, total, "rolled dice");
        DiceRoll {
            expression: *self,
            rolls,
            total,
        }
    }
}

impl std::fmt::Display for DiceExpression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_notation(self.count, self.sides, self.modifier))
    }
}

impl std::str::FromStr for DiceExpression {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

impl TryFrom<String> for DiceExpression {
    type Error = MechError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse(&value)
    }
}

impl From<DiceExpression> for String {
    fn from(expr: DiceExpression) -> Self {
        expr.to_string()
    }
}

fn format_notation(count: u32, sides: u32, modifier: i32) -> String {
    match modifier {
        0 => format!("{count}d{sides}"),
        m if m > 0 => format!("{count}d{sides}+{m}"),
        m => format!("{count}d{sides}{m}"),
    }
}
