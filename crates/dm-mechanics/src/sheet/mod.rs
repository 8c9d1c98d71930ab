//! Party character sheets with d20-style ability scores.
//!
//! A sheet keeps the six ability scores, level and hit points of a player
//! character and derives the handful of numbers combat needs from them.

use serde::{Deserialize, Serialize};

use crate::combat::Combatant;
use crate::dice::DiceExpression;
use crate::error::{MechError, MechResult};

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// Strength.
    Str,
    /// Dexterity.
    Dex,
    /// Constitution.
    Con,
    /// Intelligence.
    Int,
    /// Wisdom.
    Wis,
    /// Charisma.
    Cha,
}

impl Ability {
    /// All abilities in canonical order (STR to CHA).
    pub const ALL: [Self; 6] = [
        Self::Str,
        Self::Dex,
        Self::Con,
        Self::Int,
        Self::Wis,
        Self::Cha,
    ];
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Str => "STR",
            Self::Dex => "DEX",
            Self::Con => "CON",
            Self::Int => "INT",
            Self::Wis => "WIS",
            Self::Cha => "CHA",
        };
        f.write_str(label)
    }
}

/// The standard d20 modifier for a raw ability score: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

fn default_score() -> i32 {
    10
}

/// Raw scores for all six abilities. Missing scores default to 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    /// Strength.
    #[serde(default = "default_score")]
    pub str: i32,
    /// Dexterity.
    #[serde(default = "default_score")]
    pub dex: i32,
    /// Constitution.
    #[serde(default = "default_score")]
    pub con: i32,
    /// Intelligence.
    #[serde(default = "default_score")]
    pub int: i32,
    /// Wisdom.
    #[serde(default = "default_score")]
    pub wis: i32,
    /// Charisma.
    #[serde(default = "default_score")]
    pub cha: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            str: 10,
            dex: 10,
            con: 10,
            int: 10,
            wis: 10,
            cha: 10,
        }
    }
}

impl AbilityScores {
    /// The raw score for one ability.
    pub fn score(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    /// The modifier for one ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.score(ability))
    }
}

fn default_level() -> u32 {
    1
}

/// A player character's mechanical state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Character name.
    pub name: String,
    /// Character level, at least 1.
    #[serde(default = "default_level")]
    pub level: u32,
    /// Ability scores.
    #[serde(default)]
    pub abilities: AbilityScores,
    /// Hit points at full health.
    pub max_hp: i32,
    /// Weapon damage before the strength modifier.
    pub weapon: DiceExpression,
}

impl CharacterSheet {
    /// A level-1 character with average abilities.
    pub fn new(name: impl Into<String>, max_hp: i32, weapon: DiceExpression) -> Self {
        Self {
            name: name.into(),
            level: 1,
            abilities: AbilityScores::default(),
            max_hp,
            weapon,
        }
    }

    /// Set the ability scores.
    pub fn with_abilities(mut self, abilities: AbilityScores) -> Self {
        self.abilities = abilities;
        self
    }

    /// Set the level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Check that the sheet can take part in combat.
    pub fn validate(&self) -> MechResult<()> {
        if self.level == 0 {
            return Err(MechError::InvalidSheet(format!(
                "{}: level must be at least 1",
                self.name
            )));
        }
        if self.max_hp <= 0 {
            return Err(MechError::InvalidSheet(format!(
                "{}: max_hp must be positive",
                self.name
            )));
        }
        Ok(())
    }

    /// Proficiency bonus by level: +2 at level 1, one more every four levels.
    pub fn proficiency_bonus(&self) -> i32 {
        let level = i32::try_from(self.level.max(1)).unwrap_or(i32::MAX);
        2 + (level - 1) / 4
    }

    /// Initiative modifier (the dexterity modifier).
    pub fn initiative_modifier(&self) -> i32 {
        self.abilities.modifier(Ability::Dex)
    }

    /// Proficiency plus strength.
    pub fn attack_bonus(&self) -> i32 {
        self.proficiency_bonus() + self.abilities.modifier(Ability::Str)
    }

    /// Ten plus dexterity.
    pub fn defense(&self) -> i32 {
        10 + self.abilities.modifier(Ability::Dex)
    }

    /// Weapon dice plus the strength modifier.
    pub fn damage(&self) -> DiceExpression {
        self.weapon.with_bonus(self.abilities.modifier(Ability::Str))
    }

    /// A fresh combatant at full health built from this sheet.
    pub fn to_combatant(&self) -> MechResult<Combatant> {
        self.validate()?;
        Ok(Combatant::new(
            self.name.clone(),
            self.max_hp,
            self.attack_bonus(),
            self.defense(),
            self.damage(),
        ))
    }
}

impl std::fmt::Display for CharacterSheet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let abilities: Vec<String> = Ability::ALL
            .iter()
            .map(|&a| {
                format!(
                    "{a}:{}({:+})",
                    self.abilities.score(a),
                    self.abilities.modifier(a)
                )
            })
            .collect();
        write!(
            f,
            "{} L{} | HP:{} | {}",
            self.name,
            self.level,
            self.max_hp,
            abilities.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::parse;

    fn lyra() -> CharacterSheet {
        CharacterSheet::new("Lyra", 12, parse("1d8").unwrap()).with_abilities(AbilityScores {
            str: 14,
            dex: 15,
            ..AbilityScores::default()
        })
    }

    #[test]
    fn modifiers_round_down() {
        assert_eq!(ability_modifier(10), 0);
        assert_eq!(ability_modifier(11), 0);
        assert_eq!(ability_modifier(12), 1);
        assert_eq!(ability_modifier(9), -1);
        assert_eq!(ability_modifier(8), -1);
        assert_eq!(ability_modifier(3), -4);
        assert_eq!(ability_modifier(20), 5);
    }

    #[test]
    fn proficiency_by_level() {
        let sheet = lyra();
        assert_eq!(sheet.proficiency_bonus(), 2);
        assert_eq!(sheet.clone().with_level(4).proficiency_bonus(), 2);
        assert_eq!(sheet.clone().with_level(5).proficiency_bonus(), 3);
        assert_eq!(sheet.clone().with_level(9).proficiency_bonus(), 4);
        assert_eq!(sheet.with_level(17).proficiency_bonus(), 6);
    }

    #[test]
    fn derived_combat_numbers() {
        let sheet = lyra();
        assert_eq!(sheet.attack_bonus(), 4);
        assert_eq!(sheet.defense(), 12);
        assert_eq!(sheet.initiative_modifier(), 2);
        assert_eq!(sheet.damage().to_string(), "1d8+2");

        let c = sheet.to_combatant().unwrap();
        assert_eq!(c.name, "Lyra");
        assert_eq!(c.hit_points(), 12);
        assert_eq!(c.attack_bonus, 4);
        assert_eq!(c.defense, 12);
    }

    #[test]
    fn invalid_sheets_rejected() {
        assert!(lyra().with_level(0).to_combatant().is_err());
        let mut sheet = lyra();
        sheet.max_hp = 0;
        assert!(matches!(sheet.validate(), Err(MechError::InvalidSheet(_))));
    }

    #[test]
    fn display_lists_abilities() {
        let text = lyra().to_string();
        assert!(text.starts_with("Lyra L1 | HP:12 | STR:14(+2), DEX:15(+2)"));
        assert!(text.ends_with("CHA:10(+0)"));
    }

    #[test]
    fn deserialize_with_defaults() {
        let sheet: CharacterSheet = serde_json::from_str(
            r#"{ "name": "Borin", "max_hp": 15, "weapon": "1d10", "abilities": { "str": 16 } }"#,
        )
        .unwrap();
        assert_eq!(sheet.level, 1);
        assert_eq!(sheet.abilities.str, 16);
        assert_eq!(sheet.abilities.dex, 10);
        assert_eq!(sheet.damage().to_string(), "1d10+3");
    }
}
