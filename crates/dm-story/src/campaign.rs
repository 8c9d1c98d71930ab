//! A built campaign and the cursor that walks it.

use crate::block::StoryBlock;

/// What [`Campaign::next_block`] hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    /// The next block in order.
    Block(&'a StoryBlock),
    /// Every block has been handed out.
    EndOfCampaign,
}

/// An ordered sequence of story blocks: one intro, the middle, one resolution.
#[derive(Debug, Clone)]
pub struct Campaign<'a> {
    blocks: Vec<&'a StoryBlock>,
    cursor: usize,
    fallback_draws: usize,
}

impl<'a> Campaign<'a> {
    pub(crate) fn new(blocks: Vec<&'a StoryBlock>, fallback_draws: usize) -> Self {
        Self {
            blocks,
            cursor: 0,
            fallback_draws,
        }
    }

    /// Hand out the next block and advance. Once the end is reached every
    /// further call returns [`Step::EndOfCampaign`].
    pub fn next_block(&mut self) -> Step<'a> {
        match self.blocks.get(self.cursor) {
            Some(&block) => {
                self.cursor += 1;
                Step::Block(block)
            }
            None => Step::EndOfCampaign,
        }
    }

    /// The block the next call to [`Campaign::next_block`] would return.
    pub fn peek(&self) -> Option<&'a StoryBlock> {
        self.blocks.get(self.cursor).copied()
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[&'a StoryBlock] {
        &self.blocks
    }

    /// Number of blocks, intro and resolution included.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false for a built campaign, which holds at least intro and
    /// resolution.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// How many blocks have been handed out.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// How many blocks are left.
    pub fn remaining(&self) -> usize {
        self.blocks.len() - self.cursor
    }

    /// Middle draws that had to refill an exhausted pool.
    pub fn fallback_draws(&self) -> usize {
        self.fallback_draws
    }
}

impl<'a> Iterator for Campaign<'a> {
    type Item = &'a StoryBlock;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_block() {
            Step::Block(block) => Some(block),
            Step::EndOfCampaign => None,
        }
    }
}

impl std::iter::FusedIterator for Campaign<'_> {}
