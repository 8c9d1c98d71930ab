//! CLI frontend for the Dungeon Master campaign engine.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use dm_story::CampaignConfig;

#[derive(Parser)]
#[command(
    name = "dm",
    about = "Dungeon Master: random campaigns, dice, and turn-based combat",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Flags that shape how a campaign is sequenced.
#[derive(Args)]
struct CampaignArgs {
    /// RNG seed for a reproducible campaign
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Fewest blocks between intro and resolution
    #[arg(long, default_value = "3")]
    min: u32,

    /// Most blocks between intro and resolution
    #[arg(long, default_value = "5")]
    max: u32,

    /// Chance (0-1) that a middle block is an encounter
    #[arg(long, default_value = "0.5")]
    ratio: f64,
}

impl CampaignArgs {
    fn config(&self) -> CampaignConfig {
        CampaignConfig::default()
            .with_seed(self.seed)
            .with_middle_length(self.min, self.max)
            .with_encounter_ratio(self.ratio)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Roll dice written in notation like 2d6+3
    Roll {
        /// Dice expression
        #[arg(allow_hyphen_values = true)]
        expression: String,

        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Number of times to roll
        #[arg(short = 'n', long, default_value = "1")]
        times: u32,
    },

    /// Write a starter campaign file
    Init {
        /// Campaign name; the file is written to <name>.json
        name: String,
    },

    /// Load a campaign file and report problems
    Check {
        /// Campaign file
        file: PathBuf,
    },

    /// Sequence a campaign and print its blocks without playing it
    Outline {
        /// Campaign file
        file: PathBuf,

        #[command(flatten)]
        campaign: CampaignArgs,
    },

    /// Play a campaign through
    Play {
        /// Campaign file
        file: PathBuf,

        #[command(flatten)]
        campaign: CampaignArgs,

        /// Stop fights still undecided after this many rounds
        #[arg(long)]
        round_cap: Option<u32>,

        /// Choose party targets yourself
        #[arg(short, long)]
        interactive: bool,
    },
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Roll {
            expression,
            seed,
            times,
        } => commands::roll::run(&expression, seed, times),
        Commands::Init { name } => commands::init::run(&name),
        Commands::Check { file } => commands::check::run(&file),
        Commands::Outline { file, campaign } => commands::outline::run(&file, &campaign.config()),
        Commands::Play {
            file,
            campaign,
            round_cap,
            interactive,
        } => {
            let mut config = campaign.config();
            if let Some(rounds) = round_cap {
                config = config.with_round_cap(rounds);
            }
            commands::play::run(&file, &config, interactive)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
