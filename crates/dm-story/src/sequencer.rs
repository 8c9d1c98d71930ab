//! Campaign sequencing: intro, a random middle, resolution.
//!
//! Middle slots draw from the encounter and event pools without replacement.
//! A pool that runs dry is refilled and drawn from again, and the refill
//! avoids placing the same block twice in a row whenever the pool has any
//! other block to offer.

use rand::Rng;

use crate::block::{BlockType, StoryBlock};
use crate::campaign::Campaign;
use crate::config::CampaignConfig;
use crate::error::{PoolKind, StoryError, StoryResult};
use crate::pool::BlockPools;

/// Indices of a pool not yet drawn this cycle.
struct Bag {
    remaining: Vec<usize>,
}

impl Bag {
    fn full(len: usize) -> Self {
        Self {
            remaining: (0..len).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    fn refill(&mut self, len: usize) {
        self.remaining = (0..len).collect();
    }

    /// Draw one index uniformly, skipping `avoid` if anything else is left.
    fn draw<R: Rng + ?Sized>(&mut self, avoid: Option<usize>, rng: &mut R) -> usize {
        let eligible: Vec<usize> = (0..self.remaining.len())
            .filter(|&slot| Some(self.remaining[slot]) != avoid)
            .collect();
        let slot = if eligible.is_empty() {
            rng.random_range(0..self.remaining.len())
        } else {
            eligible[rng.random_range(0..eligible.len())]
        };
        self.remaining.swap_remove(slot)
    }
}

fn pick_one<'a, R: Rng + ?Sized>(
    pools: &BlockPools<'a>,
    block_type: BlockType,
    missing: PoolKind,
    rng: &mut R,
) -> StoryResult<&'a StoryBlock> {
    let pool = pools.pool(block_type);
    if pool.is_empty() {
        return Err(StoryError::EmptyPool(missing));
    }
    Ok(pool[rng.random_range(0..pool.len())])
}

/// Build a campaign from the pools.
///
/// Randomness is consumed in a fixed order: intro, resolution, middle length,
/// then one type choice and one draw per middle slot. The same pools, config
/// and RNG state always give the same campaign.
pub fn build<'a, R: Rng + ?Sized>(
    pools: &BlockPools<'a>,
    config: &CampaignConfig,
    rng: &mut R,
) -> StoryResult<Campaign<'a>> {
    config.validate()?;

    let intro = pick_one(pools, BlockType::Intro, PoolKind::Intro, rng)?;
    let resolution = pick_one(pools, BlockType::Resolution, PoolKind::Resolution, rng)?;
    let length = rng.random_range(config.min_middle_length..=config.max_middle_length);

    let encounters = pools.pool(BlockType::Encounter);
    let events = pools.pool(BlockType::Event);
    if length > 0 && encounters.is_empty() && events.is_empty() {
        return Err(StoryError::EmptyPool(PoolKind::Middle));
    }

    let mut encounter_bag = Bag::full(encounters.len());
    let mut event_bag = Bag::full(events.len());
    let mut previous: Option<(BlockType, usize)> = None;
    let mut fallback_draws = 0;
    let mut blocks = Vec::with_capacity(length as usize + 2);
    blocks.push(intro);

    for slot in 0..length {
        let block_type = match (encounters.is_empty(), events.is_empty()) {
            (false, true) => BlockType::Encounter,
            (true, false) => BlockType::Event,
            _ if rng.random_bool(config.encounter_ratio) => BlockType::Encounter,
            _ => BlockType::Event,
        };
        let (pool, bag) = match block_type {
            BlockType::Encounter => (encounters, &mut encounter_bag),
            _ => (events, &mut event_bag),
        };

        if bag.is_empty() {
            tracing::warn!(%block_type, slot, "pool exhausted, refilling");
            bag.refill(pool.len());
            fallback_draws += 1;
        }
        let avoid = previous.and_then(|(t, index)| (t == block_type).then_some(index));
        let index = bag.draw(avoid, rng);
        tracing::debug!(slot, %block_type, id = %pool[index].identifier, "drew middle block");

        previous = Some((block_type, index));
        blocks.push(pool[index]);
    }
    blocks.push(resolution);

    tracing::info!(
        blocks = blocks.len(),
        middle = length,
        fallback_draws,
        "campaign built"
    );
    Ok(Campaign::new(blocks, fallback_draws))
}
