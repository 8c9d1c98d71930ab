//! Story blocks: the narrative units a campaign is stitched from.

use serde::{Deserialize, Serialize};

use dm_mechanics::{Combatant, DiceExpression};

/// What part a block plays in a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Opens the campaign.
    Intro,
    /// A fight.
    Encounter,
    /// A non-combat happening.
    Event,
    /// Closes the campaign.
    Resolution,
}

impl BlockType {
    /// All block types in campaign order.
    pub const ALL: [Self; 4] = [Self::Intro, Self::Encounter, Self::Event, Self::Resolution];

    /// Whether blocks of this type may appear between intro and resolution.
    pub fn is_middle(self) -> bool {
        matches!(self, Self::Encounter | Self::Event)
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intro => write!(f, "intro"),
            Self::Encounter => write!(f, "encounter"),
            Self::Event => write!(f, "event"),
            Self::Resolution => write!(f, "resolution"),
        }
    }
}

/// Stat block for the enemies of an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    /// Enemy name.
    pub name: String,
    /// Starting hit points.
    pub hit_points: i32,
    /// Added to the d20 of every to-hit check.
    pub attack_bonus: i32,
    /// To-hit total an attacker must meet or beat.
    pub defense: i32,
    /// Damage dice, written in dice notation in campaign files.
    pub damage: DiceExpression,
}

impl EnemyTemplate {
    /// A fresh combatant built from this template.
    pub fn spawn(&self, name: impl Into<String>) -> Combatant {
        Combatant::new(
            name,
            self.hit_points,
            self.attack_bonus,
            self.defense,
            self.damage,
        )
    }
}

fn one() -> u32 {
    1
}

/// The fight an encounter block stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// The enemy stat block.
    pub enemy: EnemyTemplate,
    /// How many copies of the enemy appear.
    #[serde(default = "one")]
    pub count: u32,
}

impl Encounter {
    /// Spawn the enemies. Copies are numbered when there is more than one.
    pub fn enemies(&self) -> Vec<Combatant> {
        if self.count == 1 {
            return vec![self.enemy.spawn(self.enemy.name.clone())];
        }
        (1..=self.count)
            .map(|n| self.enemy.spawn(format!("{} {n}", self.enemy.name)))
            .collect()
    }
}

/// Type tag plus any type-specific data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockKind {
    /// Opens the campaign.
    Intro,
    /// A fight against the given enemies.
    Encounter(Encounter),
    /// A non-combat happening.
    Event,
    /// Closes the campaign.
    Resolution,
}

fn default_difficulty() -> u8 {
    1
}

/// One narrative unit of a campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryBlock {
    /// Unique identifier within the content set.
    #[serde(rename = "id")]
    pub identifier: String,
    /// Optional heading for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Narration text.
    pub description: String,
    /// Difficulty on a 1-10 scale.
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    /// Block type and type-specific data.
    #[serde(flatten)]
    pub kind: BlockKind,
}

impl StoryBlock {
    /// Create a block with difficulty 1 and no title.
    pub fn new(identifier: impl Into<String>, kind: BlockKind, description: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            title: None,
            description: description.into(),
            difficulty: 1,
            kind,
        }
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: u8) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The block's type tag.
    pub fn block_type(&self) -> BlockType {
        match self.kind {
            BlockKind::Intro => BlockType::Intro,
            BlockKind::Encounter(_) => BlockType::Encounter,
            BlockKind::Event => BlockType::Event,
            BlockKind::Resolution => BlockType::Resolution,
        }
    }

    /// The encounter this block stages, if it is an encounter.
    pub fn encounter(&self) -> Option<&Encounter> {
        match &self.kind {
            BlockKind::Encounter(encounter) => Some(encounter),
            _ => None,
        }
    }

    /// The title, or the identifier when there is none.
    pub fn heading(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.identifier)
    }
}
