use std::path::Path;

use comfy_table::{ContentArrangement, Table};
use rand::SeedableRng;
use rand::rngs::StdRng;

use dm_story::CampaignConfig;

pub fn run(file: &Path, config: &CampaignConfig) -> Result<(), String> {
    let library = super::load(file)?;
    let pools = library.pools();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let campaign = dm_story::build(&pools, config, &mut rng).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Type", "Id", "Title", "Difficulty", "Enemies"]);

    for (n, block) in campaign.blocks().iter().enumerate() {
        table.add_row(vec![
            (n + 1).to_string(),
            block.block_type().to_string(),
            block.identifier.clone(),
            block.title.clone().unwrap_or_else(|| "-".to_string()),
            block.difficulty.to_string(),
            super::enemy_summary(block),
        ]);
    }

    println!("  Campaign '{}' (seed {})", library.name, config.seed);
    println!("{table}");
    println!();
    println!("  {} blocks", campaign.len());
    if campaign.fallback_draws() > 0 {
        println!(
            "  {} middle draws reused blocks after their pool ran out",
            campaign.fallback_draws()
        );
    }

    Ok(())
}
