//! Campaign files: story content plus the adventuring party.
//!
//! A campaign file is JSON with a name, a list of story blocks and a list of
//! party character sheets. [`validate_library`] checks a loaded file for
//! content that would make campaigns fail to build or fights never end.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dm_mechanics::{CharacterSheet, Combatant};

use crate::block::{BlockType, StoryBlock};
use crate::error::{StoryError, StoryResult};
use crate::pool::BlockPools;

/// Everything a campaign file contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryLibrary {
    /// Campaign name.
    pub name: String,
    /// Story content.
    #[serde(default)]
    pub blocks: Vec<StoryBlock>,
    /// The adventuring party.
    #[serde(default)]
    pub party: Vec<CharacterSheet>,
}

impl StoryLibrary {
    /// An empty library.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            blocks: Vec::new(),
            party: Vec::new(),
        }
    }

    /// Parse a campaign from JSON text.
    pub fn from_json(text: &str) -> StoryResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a campaign file.
    pub fn load(path: &Path) -> StoryResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| StoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let library = Self::from_json(&text)?;
        tracing::debug!(
            path = %path.display(),
            blocks = library.blocks.len(),
            party = library.party.len(),
            "loaded campaign file"
        );
        Ok(library)
    }

    /// Pretty-printed JSON for writing back to disk.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The blocks grouped by type.
    pub fn pools(&self) -> BlockPools<'_> {
        self.blocks.iter().collect()
    }

    /// Fresh combatants for every party member.
    pub fn party_combatants(&self) -> StoryResult<Vec<Combatant>> {
        self.party
            .iter()
            .map(|sheet| sheet.to_combatant().map_err(StoryError::from))
            .collect()
    }

    /// Number of blocks of one type.
    pub fn count(&self, block_type: BlockType) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.block_type() == block_type)
            .count()
    }
}

/// A warning or error found while checking a campaign file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// What the issue is about: a block, a party member, or the campaign.
    pub subject: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.subject, self.message)
    }
}

/// Check a campaign file.
///
/// Errors mean campaigns cannot be built or played as written. Warnings flag
/// content that works but is probably a mistake.
pub fn validate_library(library: &StoryLibrary) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let campaign = format!("campaign '{}'", library.name);

    let mut seen = HashSet::new();
    for block in &library.blocks {
        validate_block(block, &mut seen, &mut issues);
    }

    for (block_type, label) in [
        (BlockType::Intro, "intro"),
        (BlockType::Resolution, "resolution"),
    ] {
        if library.count(block_type) == 0 {
            issues.push(ValidationIssue::error(
                &campaign,
                format!("no {label} blocks"),
            ));
        }
    }
    if library.count(BlockType::Encounter) + library.count(BlockType::Event) == 0 {
        issues.push(ValidationIssue::warning(
            &campaign,
            "no encounter or event blocks, only an empty middle can be built",
        ));
    }

    if library.party.is_empty() {
        issues.push(ValidationIssue::warning(&campaign, "party is empty"));
    }
    for sheet in &library.party {
        let subject = format!("party '{}'", sheet.name);
        if let Err(e) = sheet.validate() {
            issues.push(ValidationIssue::error(&subject, e.to_string()));
        }
        if sheet.damage().max_total() <= 0 {
            issues.push(ValidationIssue::warning(
                &subject,
                format!("can never deal damage ({})", sheet.damage()),
            ));
        }
    }

    issues
}

fn validate_block<'a>(
    block: &'a StoryBlock,
    seen: &mut HashSet<&'a str>,
    issues: &mut Vec<ValidationIssue>,
) {
    let subject = format!("block '{}'", block.identifier);

    if !seen.insert(block.identifier.as_str()) {
        issues.push(ValidationIssue::error(&subject, "duplicate identifier"));
    }
    if !(1..=10).contains(&block.difficulty) {
        issues.push(ValidationIssue::warning(
            &subject,
            format!("difficulty {} is outside 1-10", block.difficulty),
        ));
    }

    let Some(encounter) = block.encounter() else {
        return;
    };
    let enemy = &encounter.enemy;
    if encounter.count == 0 {
        issues.push(ValidationIssue::error(&subject, "encounter has no enemies (count 0)"));
    }
    if enemy.hit_points <= 0 {
        issues.push(ValidationIssue::error(
            &subject,
            format!("{} has {} hit points", enemy.name, enemy.hit_points),
        ));
    }
    if enemy.damage.max_total() <= 0 {
        issues.push(ValidationIssue::error(
            &subject,
            format!("{} can never deal damage ({})", enemy.name, enemy.damage),
        ));
    }
}
