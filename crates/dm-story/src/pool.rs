//! Story blocks grouped by type.

use crate::block::{BlockType, StoryBlock};

/// Borrowed story blocks grouped into one pool per block type.
///
/// Blocks keep the order they were added in, so a given content set and seed
/// always produce the same campaign.
#[derive(Debug, Clone, Default)]
pub struct BlockPools<'a> {
    intro: Vec<&'a StoryBlock>,
    encounter: Vec<&'a StoryBlock>,
    event: Vec<&'a StoryBlock>,
    resolution: Vec<&'a StoryBlock>,
}

impl<'a> BlockPools<'a> {
    /// Empty pools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a block to the pool for its type.
    pub fn insert(&mut self, block: &'a StoryBlock) {
        self.pool_mut(block.block_type()).push(block);
    }

    /// The blocks of one type.
    pub fn pool(&self, block_type: BlockType) -> &[&'a StoryBlock] {
        match block_type {
            BlockType::Intro => &self.intro,
            BlockType::Encounter => &self.encounter,
            BlockType::Event => &self.event,
            BlockType::Resolution => &self.resolution,
        }
    }

    fn pool_mut(&mut self, block_type: BlockType) -> &mut Vec<&'a StoryBlock> {
        match block_type {
            BlockType::Intro => &mut self.intro,
            BlockType::Encounter => &mut self.encounter,
            BlockType::Event => &mut self.event,
            BlockType::Resolution => &mut self.resolution,
        }
    }

    /// Total number of blocks across all pools.
    pub fn len(&self) -> usize {
        BlockType::ALL.iter().map(|&t| self.pool(t).len()).sum()
    }

    /// Whether every pool is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<'a> FromIterator<&'a StoryBlock> for BlockPools<'a> {
    fn from_iter<I: IntoIterator<Item = &'a StoryBlock>>(iter: I) -> Self {
        let mut pools = Self::new();
        for block in iter {
            pools.insert(block);
        }
        pools
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    #[test]
    fn blocks_land_in_their_pool() {
        let blocks = vec![
            StoryBlock::new("mouth", BlockKind::Intro, ""),
            StoryBlock::new("rest", BlockKind::Event, ""),
            StoryBlock::new("echo", BlockKind::Event, ""),
            StoryBlock::new("hoard", BlockKind::Resolution, ""),
        ];
        let pools: BlockPools<'_> = blocks.iter().collect();
        assert_eq!(pools.len(), 4);
        assert_eq!(pools.pool(BlockType::Intro).len(), 1);
        assert!(pools.pool(BlockType::Encounter).is_empty());
        let events: Vec<&str> = pools
            .pool(BlockType::Event)
            .iter()
            .map(|b| b.identifier.as_str())
            .collect();
        assert_eq!(events, ["rest", "echo"]);
    }

    #[test]
    fn empty_pools() {
        let pools = BlockPools::new();
        assert!(pools.is_empty());
        assert!(pools.pool(BlockType::Resolution).is_empty());
    }
}
