use std::fs;
use std::path::PathBuf;

use dm_mechanics::{AbilityScores, CharacterSheet, DiceExpression, MechError};
use dm_story::{BlockKind, Encounter, EnemyTemplate, StoryBlock, StoryLibrary};

pub fn run(name: &str) -> Result<(), String> {
    let path = if name.ends_with(".json") {
        PathBuf::from(name)
    } else {
        PathBuf::from(format!("{name}.json"))
    };

    if path.exists() {
        return Err(format!("file '{}' already exists", path.display()));
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    let library = starter(&stem).map_err(|e| e.to_string())?;
    let json = library.to_json().map_err(|e| e.to_string())?;
    fs::write(&path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;

    println!("Created campaign '{stem}' in {}", path.display());
    println!("  {} story blocks, {} party members", library.blocks.len(), library.party.len());
    println!();
    println!("Get started:");
    println!("  dm check {}      # Validate the file", path.display());
    println!("  dm outline {}    # Preview a campaign", path.display());
    println!("  dm play {}       # Play it through", path.display());

    Ok(())
}

fn dice(notation: &str) -> Result<DiceExpression, MechError> {
    notation.parse()
}

fn enemy(
    name: &str,
    hit_points: i32,
    attack_bonus: i32,
    defense: i32,
    damage: &str,
) -> Result<EnemyTemplate, MechError> {
    Ok(EnemyTemplate {
        name: name.to_string(),
        hit_points,
        attack_bonus,
        defense,
        damage: dice(damage)?,
    })
}

fn fight(
    id: &str,
    title: &str,
    difficulty: u8,
    enemy: EnemyTemplate,
    count: u32,
    description: &str,
) -> StoryBlock {
    StoryBlock::new(id, BlockKind::Encounter(Encounter { enemy, count }), description)
        .with_title(title)
        .with_difficulty(difficulty)
}

fn scene(id: &str, title: &str, kind: BlockKind, difficulty: u8, description: &str) -> StoryBlock {
    StoryBlock::new(id, kind, description)
        .with_title(title)
        .with_difficulty(difficulty)
}

/// The goblin caves: a small campaign that exercises every block type.
fn starter(name: &str) -> Result<StoryLibrary, MechError> {
    let goblin = enemy("Goblin", 7, 4, 13, "1d6+2")?;
    let mut library = StoryLibrary::new(name);

    library.blocks = vec![
        scene(
            "cave-mouth",
            "The Cave Mouth",
            BlockKind::Intro,
            1,
            "You stand before the mouth of a dank cave. A foul goblin smell wafts out. \
             Your adventure begins!",
        ),
        scene(
            "collapsed-road",
            "The Collapsed Road",
            BlockKind::Intro,
            1,
            "The mountain road ends in a rockslide. Beyond it, a crack in the cliff \
             glows with goblin torchlight.",
        ),
        fight(
            "goblin-pair",
            "Rusty Blades",
            3,
            goblin.clone(),
            2,
            "A pair of goblins shriek and draw rusty blades.",
        ),
        fight(
            "goblin-sentry",
            "The Sentry",
            2,
            goblin,
            1,
            "A lone goblin sentry dozes against the wall, then startles awake.",
        ),
        fight(
            "cave-wolves",
            "Wolves in the Dark",
            4,
            enemy("Wolf", 11, 4, 13, "2d4+2")?,
            2,
            "Yellow eyes glint in the dark. The goblins keep wolves.",
        ),
        fight(
            "bugbear",
            "The Bugbear",
            6,
            enemy("Bugbear", 27, 4, 16, "2d8+2")?,
            1,
            "A hulking bugbear ducks under the arch, morningstar in hand.",
        ),
        scene(
            "dripping-hall",
            "The Dripping Hall",
            BlockKind::Event,
            1,
            "Water drips from a thousand stalactites. You catch your breath.",
        ),
        scene(
            "old-shrine",
            "A Forgotten Shrine",
            BlockKind::Event,
            2,
            "Someone carved a shrine here long before the goblins came. The candles \
             are still warm.",
        ),
        scene(
            "treasure",
            "The Hoard",
            BlockKind::Resolution,
            1,
            "The chamber glitters with coins. You have cleared the cave!",
        ),
        scene(
            "daylight",
            "Daylight",
            BlockKind::Resolution,
            1,
            "A shaft of sunlight leads up and out. The caves fall silent behind you.",
        ),
    ];

    library.party = vec![
        CharacterSheet::new("Lyra", 12, dice("1d8")?).with_abilities(AbilityScores {
            str: 14,
            dex: 15,
            con: 13,
            ..AbilityScores::default()
        }),
        CharacterSheet::new("Borin", 15, dice("1d10")?).with_abilities(AbilityScores {
            str: 16,
            dex: 10,
            con: 15,
            ..AbilityScores::default()
        }),
    ];

    Ok(library)
}
