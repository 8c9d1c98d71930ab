use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use dm_mechanics::{CombatEvent, CombatOutcome, Combatant, Side, TargetPolicy};
use dm_story::{Adventure, CampaignConfig, Chapter, Ending, Progress, StoryBlock};

pub fn run(file: &Path, config: &CampaignConfig, interactive: bool) -> Result<(), String> {
    let library = super::load(file)?;
    let mut adventure =
        Adventure::from_library(&library, config).map_err(|e| format!("cannot start campaign: {e}"))?;

    println!("  {} {}", "Campaign".bold(), library.name.bold());
    println!(
        "  {} blocks | Seed: {}",
        adventure.campaign().len(),
        config.seed
    );
    println!("  Party: {}", party_status(adventure.party()));
    println!();

    let mut prompt = interactive.then(|| Prompt::new(io::stdin().lock()));

    loop {
        let progress = match prompt.as_mut() {
            Some(p) => adventure.advance_with(p),
            None => adventure.advance(),
        };
        match progress {
            Progress::Chapter(chapter) => narrate(&chapter, adventure.party()),
            Progress::Finished(ending) => {
                print_ending(ending, &library.name, &adventure);
                break;
            }
        }

        let upcoming = match adventure.ending() {
            None => adventure.campaign().peek(),
            Some(_) => None,
        };
        if let (Some(p), Some(next)) = (prompt.as_mut(), upcoming) {
            println!("  {} {}", "Next:".dimmed(), next.heading().dimmed());
            if !p.keep_going()? {
                println!("  You leave the campaign behind.");
                break;
            }
        }
    }

    Ok(())
}

fn narrate(chapter: &Chapter<'_>, party: &[Combatant]) {
    let block = chapter.block();
    print_heading(block);

    if let Chapter::Battle { outcome, .. } = chapter {
        print_battle(block, outcome);
        println!("  Party: {}", party_status(party));
    }
    println!();
}

fn print_heading(block: &StoryBlock) {
    println!("  {}", block.heading().bold().underline());
    for line in block.description.lines() {
        println!("  {}", line.trim());
    }
}

fn print_battle(block: &StoryBlock, outcome: &CombatOutcome) {
    println!("  {} {}", "Enemies:".bold(), super::enemy_summary(block));
    let order: Vec<String> = outcome.initiative.iter().map(ToString::to_string).collect();
    println!("  {} {}", "Initiative:".bold(), order.join(", "));

    let mut round = 0;
    for event in &outcome.log {
        if event.round() != round {
            round = event.round();
            println!("  {}", format!("Round {round}").cyan());
        }
        println!("    {}", colorize_event(event));
    }

    let rounds = outcome.rounds_elapsed;
    match outcome.victor {
        Some(Side::Party) => println!("  {}", format!("Victory after {rounds} rounds.").green().bold()),
        Some(Side::Enemies) => {
            println!("  {}", format!("The party falls after {rounds} rounds.").red().bold())
        }
        None => println!(
            "  {}",
            format!("The fight stalls after {rounds} rounds. The party slips away.").yellow()
        ),
    }
    println!(
        "  Damage dealt: party {}, enemies {}",
        outcome.damage_dealt_by(Side::Party),
        outcome.damage_dealt_by(Side::Enemies)
    );
}

fn colorize_event(event: &CombatEvent) -> colored::ColoredString {
    let text = event.to_string();
    match event {
        CombatEvent::Skipped { .. } => text.dimmed(),
        CombatEvent::Attack(r) if !r.hit => text.normal(),
        CombatEvent::Attack(r) if r.attacker.side == Side::Party => {
            if event.is_knockout() { text.green().bold() } else { text.green() }
        }
        CombatEvent::Attack(_) => {
            if event.is_knockout() { text.red().bold() } else { text.red() }
        }
    }
}

fn party_status(party: &[Combatant]) -> String {
    if party.is_empty() {
        return "nobody".to_string();
    }
    party
        .iter()
        .map(|c| format!("{} {}/{} HP", c.name, c.hit_points(), c.max_hit_points()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_ending(ending: Ending, name: &str, adventure: &Adventure<'_>) {
    match ending {
        Ending::Victory => {
            println!("  {}", "*** VICTORY ***".green().bold());
            println!("  You have completed '{name}'.");
        }
        Ending::Defeat => {
            println!("  {}", "*** DEFEAT ***".red().bold());
            println!("  Your party has fallen. '{name}' ends here.");
        }
    }
    println!(
        "  Battles won: {} | Party: {}",
        adventure.battles_won(),
        party_status(adventure.party())
    );
}

/// Reads party targets and pacing decisions from a line-based input.
struct Prompt<R> {
    input: R,
}

impl<R: BufRead> Prompt<R> {
    fn new(input: R) -> Self {
        Self { input }
    }

    /// One trimmed line, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>, String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim().to_string())),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Ask whether to play the next chapter. End of input counts as yes.
    fn keep_going(&mut self) -> Result<bool, String> {
        print!("[enter] next, q)uit > ");
        io::stdout().flush().map_err(|e| e.to_string())?;
        let answer = self.read_line()?;
        Ok(!answer.is_some_and(|a| a.to_lowercase().starts_with('q')))
    }
}

impl<R: BufRead> TargetPolicy for Prompt<R> {
    fn choose_target(&mut self, attacker: &Combatant, opponents: &[Combatant]) -> Option<usize> {
        let living: Vec<usize> = (0..opponents.len())
            .filter(|&i| opponents[i].is_alive())
            .collect();
        if living.len() <= 1 {
            return living.first().copied();
        }

        println!("  {} attacks whom?", attacker.name.bold());
        for (n, &i) in living.iter().enumerate() {
            let foe = &opponents[i];
            println!("    {}) {} ({} HP)", n + 1, foe.name, foe.hit_points());
        }
        print!("  > ");
        if let Err(e) = io::stdout().flush() {
            tracing::warn!(error = %e, "cannot flush target prompt");
        }

        // Anything unusable falls back to the first living opponent.
        let choice = self.read_line().ok().flatten()?;
        choice
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| living.get(n).copied())
    }
}
