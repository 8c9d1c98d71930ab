pub mod check;
pub mod init;
pub mod outline;
pub mod play;
pub mod roll;

use std::path::Path;

use dm_story::{BlockType, StoryBlock, StoryLibrary};

/// Load a campaign file, turning errors into CLI messages.
fn load(file: &Path) -> Result<StoryLibrary, String> {
    StoryLibrary::load(file).map_err(|e| e.to_string())
}

/// Short enemy summary for an encounter block ("2x Goblin"), or "-".
fn enemy_summary(block: &StoryBlock) -> String {
    match block.encounter() {
        Some(encounter) => format!("{}x {}", encounter.count, encounter.enemy.name),
        None => "-".to_string(),
    }
}

/// Block counts per type, e.g. "1 intro, 2 encounter, 1 event, 1 resolution".
fn block_breakdown(library: &StoryLibrary) -> String {
    BlockType::ALL
        .iter()
        .map(|&t| format!("{} {t}", library.count(t)))
        .collect::<Vec<_>>()
        .join(", ")
}
