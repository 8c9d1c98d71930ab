//! Configuration for building and playing a campaign.

use dm_mechanics::CombatConfig;

use crate::error::{StoryError, StoryResult};

/// Longest middle a campaign may ask for.
pub const MAX_MIDDLE_LENGTH: u32 = 1_000;

/// Configuration for a campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignConfig {
    /// RNG seed for reproducible playthroughs.
    pub seed: u64,
    /// Fewest blocks between intro and resolution.
    pub min_middle_length: u32,
    /// Most blocks between intro and resolution.
    pub max_middle_length: u32,
    /// Chance (0-1) that a middle slot is an encounter rather than an event.
    pub encounter_ratio: f64,
    /// Settings for every encounter in the campaign.
    pub combat: CombatConfig,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            min_middle_length: 3,
            max_middle_length: 5,
            encounter_ratio: 0.5,
            combat: CombatConfig::default(),
        }
    }
}

impl CampaignConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the middle length range (inclusive).
    pub fn with_middle_length(mut self, min: u32, max: u32) -> Self {
        self.min_middle_length = min;
        self.max_middle_length = max;
        self
    }

    /// Set the encounter ratio (clamped to 0-1, NaN counts as 0.5).
    pub fn with_encounter_ratio(mut self, ratio: f64) -> Self {
        self.encounter_ratio = if ratio.is_nan() {
            0.5
        } else {
            ratio.clamp(0.0, 1.0)
        };
        self
    }

    /// Stop undecided encounters after `rounds` rounds.
    pub fn with_round_cap(mut self, rounds: u32) -> Self {
        self.combat = self.combat.with_round_cap(rounds);
        self
    }

    /// Reject inconsistent settings.
    pub fn validate(&self) -> StoryResult<()> {
        if self.min_middle_length > self.max_middle_length {
            return Err(StoryError::InvalidConfig(format!(
                "middle length minimum {} exceeds maximum {}",
                self.min_middle_length, self.max_middle_length
            )));
        }
        if self.max_middle_length > MAX_MIDDLE_LENGTH {
            return Err(StoryError::InvalidConfig(format!(
                "middle length maximum {} exceeds the limit of {MAX_MIDDLE_LENGTH}",
                self.max_middle_length
            )));
        }
        if !(0.0..=1.0).contains(&self.encounter_ratio) {
            return Err(StoryError::InvalidConfig(format!(
                "encounter ratio {} is outside 0-1",
                self.encounter_ratio
            )));
        }
        Ok(())
    }
}
