//! Combat events and target selection.

use serde::{Deserialize, Serialize};

use super::{Combatant, Side};

/// Identifies a combatant by side and list position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fighter {
    /// Side the combatant fights for.
    pub side: Side,
    /// Index in that side's list.
    pub index: usize,
    /// Display name.
    pub name: String,
}

/// Everything that happened during one attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackReport {
    /// Round in which the attack happened (1-based).
    pub round: u32,
    /// Who attacked.
    pub attacker: Fighter,
    /// Who was attacked.
    pub target: Fighter,
    /// The d20 face of the to-hit check.
    pub to_hit_roll: u32,
    /// The d20 face plus the attacker's attack bonus.
    pub to_hit_total: i64,
    /// The target's defense the total was compared against.
    pub defense: i32,
    /// Whether the attack landed.
    pub hit: bool,
    /// Damage dice faces (empty on a miss).
    pub damage_rolls: Vec<u32>,
    /// Hit points actually removed from the target.
    pub damage: i32,
    /// Target hit points after the attack.
    pub target_hit_points: i32,
}

/// A recorded combat event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A living combatant attacked.
    Attack(AttackReport),
    /// A downed combatant's turn came up and was passed over.
    Skipped {
        /// Round in which the turn was skipped.
        round: u32,
        /// The downed combatant.
        fighter: Fighter,
    },
}

impl CombatEvent {
    /// Round this event belongs to.
    pub fn round(&self) -> u32 {
        match self {
            Self::Attack(report) => report.round,
            Self::Skipped { round, .. } => *round,
        }
    }

    /// Whether this event downed its target.
    pub fn is_knockout(&self) -> bool {
        matches!(self, Self::Attack(r) if r.hit && r.target_hit_points == 0)
    }
}

impl std::fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attack(r) => {
                write!(
                    f,
                    "{} attacks {} (rolled {}, total {} vs defense {}): ",
                    r.attacker.name, r.target.name, r.to_hit_roll, r.to_hit_total, r.defense
                )?;
                if !r.hit {
                    return write!(f, "miss");
                }
                write!(f, "hit for {} damage", r.damage)?;
                if r.target_hit_points == 0 {
                    write!(f, ", {} falls", r.target.name)
                } else {
                    write!(f, ", {} has {} HP left", r.target.name, r.target_hit_points)
                }
            }
            Self::Skipped { fighter, .. } => write!(f, "{} is down, turn skipped", fighter.name),
        }
    }
}

/// How a combatant picks whom to attack.
///
/// The resolver asks the acting side's policy each turn. Returning `None`, or
/// the index of an opponent that is already down, falls back to the first
/// living opponent.
pub trait TargetPolicy {
    /// Pick the index into `opponents` to attack.
    fn choose_target(&mut self, attacker: &Combatant, opponents: &[Combatant]) -> Option<usize>;
}

/// Always attacks the first living opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLiving;

impl TargetPolicy for FirstLiving {
    fn choose_target(&mut self, _attacker: &Combatant, opponents: &[Combatant]) -> Option<usize> {
        first_living(opponents)
    }
}

/// Index of the first combatant still standing.
pub fn first_living(combatants: &[Combatant]) -> Option<usize> {
    combatants.iter().position(Combatant::is_alive)
}

impl<F> TargetPolicy for F
where
    F: FnMut(&Combatant, &[Combatant]) -> Option<usize>,
{
    fn choose_target(&mut self, attacker: &Combatant, opponents: &[Combatant]) -> Option<usize> {
        self(attacker, opponents)
    }
}
