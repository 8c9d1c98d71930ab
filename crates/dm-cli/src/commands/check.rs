use std::path::Path;

use colored::Colorize;

use dm_story::validate_library;

pub fn run(file: &Path) -> Result<(), String> {
    let library = super::load(file)?;
    let issues = validate_library(&library);

    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;
    if errors > 0 {
        return Err(format!(
            "{errors} error{}, {warnings} warning{} in '{}'",
            if errors == 1 { "" } else { "s" },
            if warnings == 1 { "" } else { "s" },
            file.display()
        ));
    }

    println!("  All checks passed for '{}'.", library.name);
    println!(
        "  {} blocks ({}), {} party members",
        library.blocks.len(),
        super::block_breakdown(&library),
        library.party.len()
    );
    if warnings > 0 {
        println!("  {warnings} warning{}", if warnings == 1 { "" } else { "s" });
    }

    Ok(())
}
