//! Campaign engine for Dungeon Master.
//!
//! Loads story content and the party from campaign files, sequences random
//! campaigns (one intro, a mix of encounters and events, one resolution),
//! and plays them through, handing every encounter to the combat resolver.

pub mod adventure;
pub mod block;
pub mod campaign;
pub mod config;
pub mod error;
pub mod library;
pub mod pool;
pub mod sequencer;

pub use adventure::{Adventure, Chapter, Ending, Progress};
pub use block::{BlockKind, BlockType, Encounter, EnemyTemplate, StoryBlock};
pub use campaign::{Campaign, Step};
pub use config::{CampaignConfig, MAX_MIDDLE_LENGTH};
pub use error::{PoolKind, StoryError, StoryResult};
pub use library::{StoryLibrary, ValidationIssue, validate_library};
pub use pool::BlockPools;
pub use sequencer::build;
