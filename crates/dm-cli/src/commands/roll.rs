use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use dm_mechanics::dice;

pub fn run(expression: &str, seed: Option<u64>, times: u32) -> Result<(), String> {
    let expr = dice::parse(expression).map_err(|e| e.to_string())?;
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);

    println!(
        "  {} (range {} to {}, seed {seed})",
        expr.to_string().bold(),
        expr.min_total(),
        expr.max_total()
    );

    let mut sum = 0_i64;
    for n in 1..=times.max(1) {
        let roll = expr.evaluate(&mut rng);
        sum += roll.total;
        let line = roll.to_string();
        let line = if roll.is_max() {
            line.green().bold()
        } else {
            line.normal()
        };
        println!("  #{n}: {line}");
    }

    if times > 1 {
        println!();
        println!("  {times} rolls, sum {sum}");
    }

    Ok(())
}
