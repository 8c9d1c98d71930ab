//! Turn-based combat between the party and a group of enemies.
//!
//! [`run`] rolls initiative, then walks the initiative order round after
//! round. Every living combatant attacks one opponent per round with a
//! `1d20 + attack_bonus` check against the target's defense; a hit deals the
//! attacker's damage dice. The fight ends the moment one side has nobody
//! left standing.

pub mod action;
pub mod initiative;

pub use action::{AttackReport, CombatEvent, Fighter, FirstLiving, TargetPolicy, first_living};
pub use initiative::{InitiativeEntry, roll_initiative};

use serde::{Deserialize, Serialize};

use crate::dice::{DiceExpression, DieRoller};

/// One of the two opposing sides in a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    /// The player characters.
    Party,
    /// The encounter's enemies.
    Enemies,
}

impl Side {
    /// The side this one fights against.
    pub fn opponent(self) -> Self {
        match self {
            Self::Party => Self::Enemies,
            Self::Enemies => Self::Party,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Party => write!(f, "party"),
            Self::Enemies => write!(f, "enemies"),
        }
    }
}

/// A participant in combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    /// Display name.
    pub name: String,
    hit_points: i32,
    max_hit_points: i32,
    /// Added to the d20 of every to-hit check.
    pub attack_bonus: i32,
    /// To-hit total an attacker must meet or beat.
    pub defense: i32,
    /// Dice rolled for damage on a hit.
    pub damage: DiceExpression,
}

impl Combatant {
    /// Create a combatant at full health. Negative hit points become 0.
    pub fn new(
        name: impl Into<String>,
        hit_points: i32,
        attack_bonus: i32,
        defense: i32,
        damage: DiceExpression,
    ) -> Self {
        let hit_points = hit_points.max(0);
        Self {
            name: name.into(),
            hit_points,
            max_hit_points: hit_points,
            attack_bonus,
            defense,
            damage,
        }
    }

    /// Current hit points, never below 0.
    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    /// Hit points at full health.
    pub fn max_hit_points(&self) -> i32 {
        self.max_hit_points
    }

    /// A combatant is alive while it has hit points left.
    pub fn is_alive(&self) -> bool {
        self.hit_points > 0
    }

    /// Remove up to `amount` hit points, stopping at 0. Negative amounts do
    /// nothing. Returns the hit points actually removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let applied = amount.clamp(0, self.hit_points);
        self.hit_points -= applied;
        applied
    }

}

/// Knobs for a combat run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatConfig {
    /// Stop after this many full rounds with no winner. `Some(0)` ends the
    /// fight right after initiative. `None` fights to the end.
    pub max_rounds: Option<u32>,
}

impl CombatConfig {
    /// Stop a fight that is still undecided after `rounds` rounds.
    pub fn with_round_cap(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }
}

/// The result of a finished combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// The side left standing. `None` only when the round cap stopped the
    /// fight.
    pub victor: Option<Side>,
    /// Rounds fought; the round in which the fight ended counts.
    pub rounds_elapsed: u32,
    /// The initiative order that was rolled.
    pub initiative: Vec<InitiativeEntry>,
    /// Every turn, in order.
    pub log: Vec<CombatEvent>,
}

impl CombatOutcome {
    /// Total damage dealt by one side over the whole fight.
    pub fn damage_dealt_by(&self, side: Side) -> i64 {
        self.log
            .iter()
            .filter_map(|event| match event {
                CombatEvent::Attack(r) if r.attacker.side == side => Some(i64::from(r.damage)),
                _ => None,
            })
            .sum()
    }
}

/// Where the fight currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Initiative,
    Turn { side: Side, index: usize },
    Victory(Side),
    Halted,
}

/// Mutable state of a fight in progress.
struct Combat<'a> {
    party: &'a mut [Combatant],
    enemies: &'a mut [Combatant],
    round: u32,
    /// Index into `order` of the slot currently acting.
    turn_index: usize,
    order: Vec<InitiativeEntry>,
    log: Vec<CombatEvent>,
}

impl<'a> Combat<'a> {
    fn new(party: &'a mut [Combatant], enemies: &'a mut [Combatant]) -> Self {
        Self {
            party,
            enemies,
            round: 0,
            turn_index: 0,
            order: Vec::new(),
            log: Vec::new(),
        }
    }

    fn side(&self, side: Side) -> &[Combatant] {
        match side {
            Side::Party => &*self.party,
            Side::Enemies => &*self.enemies,
        }
    }

    /// The side with nobody left standing, party checked first.
    fn defeated_side(&self) -> Option<Side> {
        [Side::Party, Side::Enemies]
            .into_iter()
            .find(|&side| first_living(self.side(side)).is_none())
    }

    fn current_slot(&self) -> Phase {
        let entry = &self.order[self.turn_index];
        Phase::Turn {
            side: entry.side,
            index: entry.index,
        }
    }

    /// Advance to the next slot. Returns true if a new round started.
    fn next_turn(&mut self) -> bool {
        self.turn_index += 1;
        if self.turn_index >= self.order.len() {
            self.turn_index = 0;
            self.round += 1;
            true
        } else {
            false
        }
    }

    fn take_turn<R, P, E>(
        &mut self,
        side: Side,
        index: usize,
        party_policy: &mut P,
        enemy_policy: &mut E,
        roller: &mut R,
    ) where
        R: DieRoller + ?Sized,
        P: TargetPolicy + ?Sized,
        E: TargetPolicy + ?Sized,
    {
        let round = self.round;
        let (own, foes) = match side {
            Side::Party => (&*self.party, &mut *self.enemies),
            Side::Enemies => (&*self.enemies, &mut *self.party),
        };
        let attacker = &own[index];
        let me = Fighter {
            side,
            index,
            name: attacker.name.clone(),
        };

        if !attacker.is_alive() {
            tracing::debug!(round, name = %me.name, "turn skipped");
            self.log.push(CombatEvent::Skipped { round, fighter: me });
            return;
        }

        let chosen = match side {
            Side::Party => party_policy.choose_target(attacker, foes),
            Side::Enemies => enemy_policy.choose_target(attacker, foes),
        };
        let target_index = match chosen {
            Some(i) if foes.get(i).is_some_and(Combatant::is_alive) => i,
            _ => match first_living(foes) {
                Some(i) => i,
                None => return,
            },
        };

        let check = DiceExpression::D20.evaluate(roller);
        let to_hit_roll = check.first_face();
        let to_hit_total = check.total + i64::from(attacker.attack_bonus);
        let target = &mut foes[target_index];
        let hit = to_hit_total >= i64::from(target.defense);

        let (damage_rolls, damage) = if hit {
            let roll = attacker.damage.evaluate(roller);
            let dealt = target.take_damage(roll.non_negative());
            (roll.rolls, dealt)
        } else {
            (Vec::new(), 0)
        };

        let report = AttackReport {
            round,
            attacker: me,
            target: Fighter {
                side: side.opponent(),
                index: target_index,
                name: target.name.clone(),
            },
            to_hit_roll,
            to_hit_total,
            defense: target.defense,
            hit,
            damage_rolls,
            damage,
            target_hit_points: target.hit_points(),
        };
        tracing::debug!(round, "{}", CombatEvent::Attack(report.clone()));
        self.log.push(CombatEvent::Attack(report));
    }
}

/// Fight until one side is down, everyone attacking the first living
/// opponent.
pub fn run<R: DieRoller + ?Sized>(
    party: &mut [Combatant],
    enemies: &mut [Combatant],
    roller: &mut R,
) -> CombatOutcome {
    run_with(
        party,
        enemies,
        &mut FirstLiving,
        &mut FirstLiving,
        &CombatConfig::default(),
        roller,
    )
}

/// Fight with a target policy per side and an optional round cap.
///
/// Hit points are updated in place, so wounds carry over to the caller.
pub fn run_with<R, P, E>(
    party: &mut [Combatant],
    enemies: &mut [Combatant],
    party_policy: &mut P,
    enemy_policy: &mut E,
    config: &CombatConfig,
    roller: &mut R,
) -> CombatOutcome
where
    R: DieRoller + ?Sized,
    P: TargetPolicy + ?Sized,
    E: TargetPolicy + ?Sized,
{
    let mut combat = Combat::new(party, enemies);
    let mut phase = Phase::Initiative;

    let victor = loop {
        phase = match phase {
            Phase::Initiative => {
                combat.order = roll_initiative(&*combat.party, &*combat.enemies, roller);
                match combat.defeated_side() {
                    Some(loser) => Phase::Victory(loser.opponent()),
                    None if config.max_rounds == Some(0) => Phase::Halted,
                    None => {
                        combat.round = 1;
                        combat.current_slot()
                    }
                }
            }
            Phase::Turn { side, index } => {
                combat.take_turn(side, index, party_policy, enemy_policy, roller);
                if let Some(loser) = combat.defeated_side() {
                    Phase::Victory(loser.opponent())
                } else if combat.next_turn()
                    && config.max_rounds.is_some_and(|cap| combat.round > cap)
                {
                    combat.round -= 1;
                    Phase::Halted
                } else {
                    combat.current_slot()
                }
            }
            Phase::Victory(side) => break Some(side),
            Phase::Halted => {
                tracing::warn!(rounds = combat.round, "combat stopped at round cap");
                break None;
            }
        };
    };

    tracing::info!(
        victor = %victor.map_or_else(|| "none".to_string(), |s| s.to_string()),
        rounds = combat.round,
        turns = combat.log.len(),
        "combat finished"
    );

    CombatOutcome {
        victor,
        rounds_elapsed: combat.round,
        initiative: combat.order,
        log: combat.log,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::parse;
    use crate::dice::roll::testing::{MaxFace, MinFace, Scripted};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn fighter(name: &str, hp: i32, attack: i32, defense: i32, damage: &str) -> Combatant {
        Combatant::new(name, hp, attack, defense, parse(damage).unwrap())
    }

    fn attacks(outcome: &CombatOutcome) -> Vec<&AttackReport> {
        outcome
            .log
            .iter()
            .filter_map(|e| match e {
                CombatEvent::Attack(r) => Some(r),
                CombatEvent::Skipped { .. } => None,
            })
            .collect()
    }

    #[test]
    fn combatant_hit_points_clamp() {
        let mut c = fighter("Lyra", 5, 0, 10, "1d6");
        assert_eq!(c.take_damage(3), 3);
        assert_eq!(c.take_damage(10), 2);
        assert_eq!(c.hit_points(), 0);
        assert!(!c.is_alive());
        assert_eq!(c.take_damage(-4), 0);
        assert_eq!(c.max_hit_points(), 5);
        assert_eq!(fighter("Ghost", -3, 0, 10, "1d4").hit_points(), 0);
    }

    #[test]
    fn decisive_blow_wins_in_one_round() {
        for seed in 0..50 {
            let mut party = vec![fighter("Hero", 1, 100, 100, "1d4")];
            let mut enemies = vec![fighter("Rat", 1, -100, 1, "1d2")];
            let mut rng = StdRng::seed_from_u64(seed);
            let outcome = run(&mut party, &mut enemies, &mut rng);
            assert_eq!(outcome.victor, Some(Side::Party), "seed {seed}");
            assert_eq!(outcome.rounds_elapsed, 1, "seed {seed}");
            assert!(!enemies[0].is_alive());
            assert!(party[0].is_alive());
        }
    }

    #[test]
    fn same_seed_same_log() {
        let build = || {
            (
                vec![
                    fighter("Lyra", 12, 4, 14, "1d8+2"),
                    fighter("Borin", 15, 3, 16, "1d10"),
                ],
                vec![
                    fighter("Goblin", 7, 4, 13, "1d6+2"),
                    fighter("Goblin", 7, 4, 13, "1d6+2"),
                    fighter("Wolf", 11, 4, 13, "2d4+2"),
                ],
            )
        };
        let (mut p1, mut e1) = build();
        let (mut p2, mut e2) = build();
        let a = run(&mut p1, &mut e1, &mut StdRng::seed_from_u64(2024));
        let b = run(&mut p2, &mut e2, &mut StdRng::seed_from_u64(2024));
        assert_eq!(a, b);
        assert_eq!(p1, p2);
        assert!(a.victor.is_some());
    }

    #[test]
    fn hit_on_equal_defense() {
        // Initiative 20 for the hero, 1 for the target; then to-hit 10 + 3 = 13.
        let mut party = vec![fighter("Hero", 10, 3, 10, "1d6")];
        let mut enemies = vec![fighter("Dummy", 4, 0, 13, "1d4")];
        let outcome = run(&mut party, &mut enemies, &mut Scripted::new(&[20, 1, 10, 6]));
        let first = attacks(&outcome)[0];
        assert_eq!(first.attacker.name, "Hero");
        assert_eq!(first.to_hit_total, 13);
        assert!(first.hit);
        assert_eq!(first.damage, 4);
        assert_eq!(first.target_hit_points, 0);
        assert_eq!(outcome.victor, Some(Side::Party));
    }

    #[test]
    fn miss_below_defense() {
        // Hero misses (9 + 3 < 13); the dummy then hits for 1d4 = 4 and wins.
        let mut party = vec![fighter("Hero", 4, 3, 10, "1d6")];
        let mut enemies = vec![fighter("Dummy", 4, 0, 13, "1d4")];
        let outcome = run(
            &mut party,
            &mut enemies,
            &mut Scripted::new(&[20, 1, 9, 15, 4]),
        );
        let log = attacks(&outcome);
        assert!(!log[0].hit);
        assert_eq!(log[0].damage, 0);
        assert!(log[0].damage_rolls.is_empty());
        assert!(log[1].hit);
        assert_eq!(outcome.victor, Some(Side::Enemies));
        assert_eq!(party[0].hit_points(), 0);
    }

    #[test]
    fn negative_damage_is_floored() {
        let mut party = vec![fighter("Weakling", 10, 50, 100, "1d4-10")];
        let mut enemies = vec![fighter("Wall", 5, -100, 1, "1d4")];
        let outcome = run_with(
            &mut party,
            &mut enemies,
            &mut FirstLiving,
            &mut FirstLiving,
            &CombatConfig::default().with_round_cap(3),
            &mut MaxFace,
        );
        assert_eq!(outcome.victor, None);
        assert_eq!(outcome.rounds_elapsed, 3);
        assert!(attacks(&outcome).iter().all(|r| r.damage == 0));
        assert_eq!(enemies[0].hit_points(), 5);
    }

    #[test]
    fn round_cap_zero_halts_before_any_turn() {
        let mut party = vec![fighter("Lyra", 10, 100, 100, "1d4")];
        let mut enemies = vec![fighter("Goblin", 1, -100, 1, "1d4")];
        let outcome = run_with(
            &mut party,
            &mut enemies,
            &mut FirstLiving,
            &mut FirstLiving,
            &CombatConfig::default().with_round_cap(0),
            &mut MaxFace,
        );
        assert_eq!(outcome.victor, None);
        assert_eq!(outcome.rounds_elapsed, 0);
        assert!(outcome.log.is_empty());
        assert_eq!(outcome.initiative.len(), 2);
        assert!(enemies[0].is_alive());
    }

    #[test]
    fn round_cap_one_plays_exactly_one_round() {
        let mut party = vec![fighter("Lyra", 10, -100, 100, "1d4")];
        let mut enemies = vec![fighter("Goblin", 10, -100, 100, "1d4")];
        let outcome = run_with(
            &mut party,
            &mut enemies,
            &mut FirstLiving,
            &mut FirstLiving,
            &CombatConfig::default().with_round_cap(1),
            &mut MinFace,
        );
        assert_eq!(outcome.victor, None);
        assert_eq!(outcome.rounds_elapsed, 1);
        assert_eq!(outcome.log.len(), 2);
        assert!(outcome.log.iter().all(|e| e.round() == 1));
    }

    #[test]
    fn dead_combatants_are_skipped() {
        let mut party = vec![
            fighter("Fallen", 0, 0, 10, "1d4"),
            fighter("Lyra", 20, 100, 100, "1d4"),
        ];
        let mut enemies = vec![fighter("Ogre", 30, -100, 1, "1d4")];
        let outcome = run(&mut party, &mut enemies, &mut MinFace);
        let skipped = outcome
            .log
            .iter()
            .filter(|e| matches!(e, CombatEvent::Skipped { fighter, .. } if fighter.name == "Fallen"))
            .count();
        assert_eq!(skipped as u32, outcome.rounds_elapsed);
        assert_eq!(outcome.victor, Some(Side::Party));
    }

    #[test]
    fn targets_first_living_opponent() {
        let mut party = vec![fighter("Lyra", 20, 100, 100, "1d1+2")];
        let mut enemies = vec![
            fighter("First", 2, -100, 1, "1d4"),
            fighter("Second", 2, -100, 1, "1d4"),
        ];
        let outcome = run(&mut party, &mut enemies, &mut MinFace);
        let targets: Vec<&str> = attacks(&outcome)
            .iter()
            .filter(|r| r.attacker.side == Side::Party)
            .map(|r| r.target.name.as_str())
            .collect();
        assert_eq!(targets, ["First", "Second"]);
        assert_eq!(outcome.victor, Some(Side::Party));
        assert_eq!(outcome.rounds_elapsed, 2);
    }

    #[test]
    fn party_policy_is_consulted() {
        let mut party = vec![fighter("Lyra", 20, 100, 100, "1d1+2")];
        let mut enemies = vec![
            fighter("First", 2, -100, 1, "1d4"),
            fighter("Second", 2, -100, 1, "1d4"),
        ];
        let mut last_living =
            |_: &Combatant, foes: &[Combatant]| foes.iter().rposition(Combatant::is_alive);
        let outcome = run_with(
            &mut party,
            &mut enemies,
            &mut last_living,
            &mut FirstLiving,
            &CombatConfig::default(),
            &mut MinFace,
        );
        let first = attacks(&outcome)
            .into_iter()
            .find(|r| r.attacker.side == Side::Party)
            .unwrap();
        assert_eq!(first.target.name, "Second");
    }

    #[test]
    fn invalid_policy_choice_falls_back() {
        let mut party = vec![fighter("Lyra", 20, 100, 100, "1d1+2")];
        let mut enemies = vec![fighter("Only", 2, -100, 1, "1d4")];
        let mut nonsense = |_: &Combatant, _: &[Combatant]| Some(99_usize);
        let outcome = run_with(
            &mut party,
            &mut enemies,
            &mut nonsense,
            &mut FirstLiving,
            &CombatConfig::default(),
            &mut MinFace,
        );
        assert_eq!(outcome.victor, Some(Side::Party));
    }

    #[test]
    fn empty_side_ends_immediately() {
        let mut party = vec![fighter("Lyra", 10, 0, 10, "1d4")];
        let outcome = run(&mut party, &mut [], &mut MinFace);
        assert_eq!(outcome.victor, Some(Side::Party));
        assert_eq!(outcome.rounds_elapsed, 0);
        assert!(outcome.log.is_empty());

        let mut downed = vec![fighter("Fallen", 0, 0, 10, "1d4")];
        let mut enemies = vec![fighter("Goblin", 5, 0, 10, "1d4")];
        let outcome = run(&mut downed, &mut enemies, &mut MinFace);
        assert_eq!(outcome.victor, Some(Side::Enemies));
    }

    #[test]
    fn initiative_order_is_reported() {
        let mut party = vec![fighter("Lyra", 10, 100, 100, "1d4")];
        let mut enemies = vec![fighter("Goblin", 1, -100, 1, "1d4")];
        let outcome = run(&mut party, &mut enemies, &mut Scripted::new(&[5, 17]));
        assert_eq!(outcome.initiative.len(), 2);
        assert_eq!(outcome.initiative[0].name, "Goblin");
        assert_eq!(outcome.initiative[0].roll, 17);
    }

    #[test]
    fn damage_totals_by_side() {
        let mut party = vec![fighter("Lyra", 10, 100, 100, "1d1+2")];
        let mut enemies = vec![fighter("Goblin", 5, -100, 1, "1d4")];
        let outcome = run(&mut party, &mut enemies, &mut MinFace);
        assert_eq!(outcome.damage_dealt_by(Side::Party), 5);
        assert_eq!(outcome.damage_dealt_by(Side::Enemies), 0);
    }

    #[test]
    fn outcome_serializes() {
        let mut party = vec![fighter("Lyra", 10, 100, 100, "1d4")];
        let mut enemies = vec![fighter("Goblin", 1, -100, 1, "1d4")];
        let outcome = run(&mut party, &mut enemies, &mut MinFace);
        let json = serde_json::to_string(&outcome).unwrap();
        let back: CombatOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
    }
}
