//! Playing a campaign through.
//!
//! `Adventure` owns the seeded RNG and the party for a whole playthrough.
//! Each call to [`Adventure::advance`] hands out one chapter: a scene to
//! narrate or a finished battle. It does no I/O; front ends decide how to
//! present chapters and where party targeting decisions come from.

use rand::SeedableRng;
use rand::rngs::StdRng;

use dm_mechanics::combat::{self, CombatConfig, CombatOutcome, Combatant, FirstLiving, Side, TargetPolicy};

use crate::block::{BlockKind, StoryBlock};
use crate::campaign::{Campaign, Step};
use crate::config::CampaignConfig;
use crate::error::StoryResult;
use crate::library::StoryLibrary;
use crate::pool::BlockPools;
use crate::sequencer;

/// How a playthrough ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// Every block was played and the party survived.
    Victory,
    /// The whole party fell.
    Defeat,
}

/// One step of a playthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chapter<'a> {
    /// An intro, event or resolution to narrate.
    Scene(&'a StoryBlock),
    /// An encounter and the fight it led to.
    Battle {
        /// The encounter block.
        block: &'a StoryBlock,
        /// How the fight went.
        outcome: CombatOutcome,
    },
}

impl<'a> Chapter<'a> {
    /// The block this chapter played.
    pub fn block(&self) -> &'a StoryBlock {
        match self {
            Self::Scene(block) | Self::Battle { block, .. } => block,
        }
    }
}

/// What [`Adventure::advance`] produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress<'a> {
    /// The next chapter.
    Chapter(Chapter<'a>),
    /// The playthrough is over. Repeats on every further call.
    Finished(Ending),
}

/// A playthrough of one campaign with one party.
pub struct Adventure<'a> {
    campaign: Campaign<'a>,
    party: Vec<Combatant>,
    combat: CombatConfig,
    rng: StdRng,
    ending: Option<Ending>,
    battles_won: u32,
}

impl<'a> Adventure<'a> {
    /// Build a campaign from the pools and get the party ready.
    pub fn new(
        pools: &BlockPools<'a>,
        party: Vec<Combatant>,
        config: &CampaignConfig,
    ) -> StoryResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let campaign = sequencer::build(pools, config, &mut rng)?;
        Ok(Self {
            campaign,
            party,
            combat: config.combat.clone(),
            rng,
            ending: None,
            battles_won: 0,
        })
    }

    /// Build a campaign from a loaded campaign file and its party.
    pub fn from_library(library: &'a StoryLibrary, config: &CampaignConfig) -> StoryResult<Self> {
        Self::new(&library.pools(), library.party_combatants()?, config)
    }

    /// The campaign being played.
    pub fn campaign(&self) -> &Campaign<'a> {
        &self.campaign
    }

    /// The party, with current hit points.
    pub fn party(&self) -> &[Combatant] {
        &self.party
    }

    /// How the playthrough ended, once it has.
    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    /// Fights the party won so far.
    pub fn battles_won(&self) -> u32 {
        self.battles_won
    }

    /// Play the next block, with the party attacking the first living enemy.
    pub fn advance(&mut self) -> Progress<'a> {
        self.advance_with(&mut FirstLiving)
    }

    /// Play the next block, asking `party_policy` whom each party member
    /// attacks. Enemies always attack the first living party member.
    pub fn advance_with<P: TargetPolicy + ?Sized>(&mut self, party_policy: &mut P) -> Progress<'a> {
        if let Some(ending) = self.ending {
            return Progress::Finished(ending);
        }

        let block = match self.campaign.next_block() {
            Step::Block(block) => block,
            Step::EndOfCampaign => return self.finish(Ending::Victory),
        };

        let chapter = match &block.kind {
            BlockKind::Intro | BlockKind::Event | BlockKind::Resolution => Chapter::Scene(block),
            BlockKind::Encounter(encounter) => {
                let mut enemies = encounter.enemies();
                tracing::debug!(id = %block.identifier, enemies = enemies.len(), "encounter begins");
                let outcome = combat::run_with(
                    &mut self.party,
                    &mut enemies,
                    party_policy,
                    &mut FirstLiving,
                    &self.combat,
                    &mut self.rng,
                );
                match outcome.victor {
                    Some(Side::Party) => self.battles_won += 1,
                    Some(Side::Enemies) => self.ending = Some(Ending::Defeat),
                    None => tracing::info!(id = %block.identifier, "party disengages from a stalled fight"),
                }
                Chapter::Battle { block, outcome }
            }
        };
        Progress::Chapter(chapter)
    }

    /// Play every remaining block and return the chapters and the ending.
    pub fn play_to_end(&mut self) -> (Vec<Chapter<'a>>, Ending) {
        let mut chapters = Vec::new();
        loop {
            match self.advance() {
                Progress::Chapter(chapter) => chapters.push(chapter),
                Progress::Finished(ending) => return (chapters, ending),
            }
        }
    }

    fn finish(&mut self, ending: Ending) -> Progress<'a> {
        tracing::info!(?ending, battles_won = self.battles_won, "adventure over");
        self.ending = Some(ending);
        Progress::Finished(ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Encounter, EnemyTemplate};
    use dm_mechanics::DiceExpression;

    fn dice(text: &str) -> DiceExpression {
        text.parse().unwrap()
    }

    fn fight(id: &str, hit_points: i32, attack_bonus: i32, damage: &str) -> StoryBlock {
        StoryBlock::new(
            id,
            BlockKind::Encounter(Encounter {
                enemy: EnemyTemplate {
                    name: "Goblin".to_string(),
                    hit_points,
                    attack_bonus,
                    defense: 12,
                    damage: dice(damage),
                },
                count: 2,
            }),
            "",
        )
    }

    fn content(enemy_hp: i32, enemy_attack: i32, enemy_damage: &str) -> Vec<StoryBlock> {
        vec![
            StoryBlock::new("mouth", BlockKind::Intro, ""),
            fight("goblins", enemy_hp, enemy_attack, enemy_damage),
            StoryBlock::new("rest", BlockKind::Event, ""),
            StoryBlock::new("hoard", BlockKind::Resolution, ""),
        ]
    }

    fn hero() -> Combatant {
        Combatant::new("Hero", 500, 40, 100, dice("4d6+30"))
    }

    fn weakling() -> Combatant {
        Combatant::new("Weakling", 1, -100, 0, dice("1d4"))
    }

    #[test]
    fn victory_after_every_block() {
        let owned = content(7, 0, "1d4");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default().with_middle_length(3, 3);
        let mut adventure = Adventure::new(&pools, vec![hero()], &config).unwrap();
        let total = adventure.campaign().len();

        let (chapters, ending) = adventure.play_to_end();
        assert_eq!(ending, Ending::Victory);
        assert_eq!(chapters.len(), total);
        assert!(matches!(chapters[0], Chapter::Scene(b) if b.identifier == "mouth"));
        assert_eq!(chapters[total - 1].block().identifier, "hoard");

        let battles = chapters
            .iter()
            .filter(|c| matches!(c, Chapter::Battle { .. }))
            .count();
        assert_eq!(adventure.battles_won() as usize, battles);
        assert_eq!(adventure.ending(), Some(Ending::Victory));
    }

    #[test]
    fn finished_is_idempotent() {
        let owned = content(7, 0, "1d4");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default().with_middle_length(0, 0);
        let mut adventure = Adventure::new(&pools, vec![hero()], &config).unwrap();
        assert!(matches!(adventure.advance(), Progress::Chapter(Chapter::Scene(_))));
        assert!(matches!(adventure.advance(), Progress::Chapter(Chapter::Scene(_))));
        for _ in 0..3 {
            assert_eq!(adventure.advance(), Progress::Finished(Ending::Victory));
        }
    }

    #[test]
    fn party_wipe_ends_in_defeat() {
        let owned = content(1000, 50, "10d10");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default()
            .with_middle_length(2, 2)
            .with_encounter_ratio(1.0);
        let mut adventure = Adventure::new(&pools, vec![weakling()], &config).unwrap();

        assert!(matches!(adventure.advance(), Progress::Chapter(Chapter::Scene(_))));
        let Progress::Chapter(Chapter::Battle { outcome, .. }) = adventure.advance() else {
            panic!("expected a battle");
        };
        assert_eq!(outcome.victor, Some(Side::Enemies));
        assert_eq!(adventure.party()[0].hit_points(), 0);
        assert_eq!(adventure.advance(), Progress::Finished(Ending::Defeat));
        assert_eq!(adventure.advance(), Progress::Finished(Ending::Defeat));
        assert_eq!(adventure.campaign().remaining(), 2);
    }

    #[test]
    fn wounds_carry_between_battles() {
        let owned = content(30, 30, "1d4+1");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default()
            .with_middle_length(2, 2)
            .with_encounter_ratio(1.0);
        let exposed_hero = Combatant::new("Hero", 500, 40, 20, dice("4d6+30"));
        let mut adventure = Adventure::new(&pools, vec![exposed_hero], &config).unwrap();
        let (chapters, ending) = adventure.play_to_end();
        assert_eq!(ending, Ending::Victory);

        let taken: i64 = chapters
            .iter()
            .filter_map(|c| match c {
                Chapter::Battle { outcome, .. } => Some(outcome.damage_dealt_by(Side::Enemies)),
                Chapter::Scene(_) => None,
            })
            .sum();
        assert!(taken > 0);
        assert_eq!(i64::from(adventure.party()[0].hit_points()), 500 - taken);
    }

    #[test]
    fn same_seed_same_playthrough() {
        let owned = content(9, 3, "1d6");
        let pools: BlockPools<'_> = owned.iter().collect();
        let party = vec![
            Combatant::new("Lyra", 12, 4, 12, dice("1d8+2")),
            Combatant::new("Borin", 15, 5, 11, dice("1d10+3")),
        ];
        let config = CampaignConfig::default().with_seed(99);
        let a = Adventure::new(&pools, party.clone(), &config).unwrap().play_to_end();
        let b = Adventure::new(&pools, party, &config).unwrap().play_to_end();
        assert_eq!(a, b);
    }

    #[test]
    fn party_policy_consulted() {
        let owned = content(7, 0, "1d4");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default()
            .with_middle_length(1, 1)
            .with_encounter_ratio(1.0);
        let mut adventure = Adventure::new(&pools, vec![hero()], &config).unwrap();
        let mut asked = 0;
        let mut last_living = |_: &Combatant, foes: &[Combatant]| {
            asked += 1;
            foes.iter().rposition(Combatant::is_alive)
        };
        adventure.advance_with(&mut last_living);
        let Progress::Chapter(Chapter::Battle { outcome, .. }) = adventure.advance_with(&mut last_living) else {
            panic!("expected a battle");
        };
        assert!(asked >= 2);
        let dm_mechanics::CombatEvent::Attack(first) = outcome
            .log
            .iter()
            .find(|e| matches!(e, dm_mechanics::CombatEvent::Attack(r) if r.attacker.side == Side::Party))
            .unwrap()
        else {
            panic!("expected an attack");
        };
        assert_eq!(first.target.name, "Goblin 2");
    }

    #[test]
    fn stalled_fight_does_not_end_the_adventure() {
        let owned = content(1000, -100, "1d4");
        let pools: BlockPools<'_> = owned.iter().collect();
        let config = CampaignConfig::default()
            .with_middle_length(1, 1)
            .with_encounter_ratio(1.0)
            .with_round_cap(3);
        let stalled_hero = Combatant::new("Hero", 10, -100, 100, dice("1d4"));
        let mut adventure = Adventure::new(&pools, vec![stalled_hero], &config).unwrap();
        let (chapters, ending) = adventure.play_to_end();
        assert_eq!(ending, Ending::Victory);
        let Chapter::Battle { outcome, .. } = &chapters[1] else {
            panic!("expected a battle");
        };
        assert_eq!(outcome.victor, None);
        assert_eq!(outcome.rounds_elapsed, 3);
        assert_eq!(adventure.battles_won(), 0);
    }

    #[test]
    fn from_library_uses_the_party() {
        let mut library = StoryLibrary::new("Caves");
        library.blocks = content(7, 0, "1d4");
        library.party = vec![dm_mechanics::CharacterSheet::new("Lyra", 12, dice("1d8"))];
        let adventure = Adventure::from_library(&library, &CampaignConfig::default()).unwrap();
        assert_eq!(adventure.party().len(), 1);
        assert_eq!(adventure.party()[0].name, "Lyra");
        assert!(adventure.ending().is_none());
    }
}
