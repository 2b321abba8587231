use std::io::{self, BufRead, Write as _};
use std::path::PathBuf;
use std::process::exit;

use clap::Parser;
use svswap_core::{CoreError, Roster, XmlWriteOpts};

#[derive(Parser, Debug)]
#[command(
    name = "svswap",
    about = "Swap a Stardew Valley player and farmhand",
    version
)]
struct Cli {
    /// The Stardew Valley save directory
    save_path: PathBuf,
    /// Generate formatted (human-readable) XML
    #[arg(long)]
    pretty: bool,
}

// Exit codes: 0 success or user cancel, 1 bad save path, 2 directory fails
// the save contract, 3 XML parse/structure error, 4 backup conflict or
// write failure.
fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let save_file = svswap_core::locate_save_file(&cli.save_path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        match e {
            CoreError::BadSaveDir { .. } => exit(1),
            _ => exit(2),
        }
    });
    log::debug!("Using save file {}", save_file.display());

    let mut doc = svswap_core::load_save(&save_file).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        exit(3);
    });
    let roster = svswap_core::read_roster(&doc).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        exit(3);
    });

    println!("Found {} farmhands!", roster.farmhand_names.len());
    println!(" Player: {}", roster.player_name);
    for (display_index, name) in roster.occupied() {
        println!("Farmhand {display_index}: {name}");
    }

    let Some((slot, farmhand_name)) = prompt_slot(&roster) else {
        println!("Exiting");
        exit(0);
    };

    println!("Swapping");
    println!("    {}", roster.player_name);
    println!("and");
    println!("    {farmhand_name}");
    if prompt_confirm() != Some(true) {
        println!("Exiting");
        exit(0);
    }

    svswap_core::apply_swap(&mut doc, slot).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        exit(3);
    });

    let opts = XmlWriteOpts { pretty: cli.pretty };
    let backup = svswap_core::write_save_with_backup(&save_file, &doc, opts).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        exit(4);
    });
    log::debug!("Original save kept at {}", backup.display());
    println!("All done!");
}

/// Prompt once; `None` means the user ended input (treated as a clean abort).
fn read_line_trimmed(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok()?;
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Ask for a farmhand number until an occupied slot is chosen. Invalid input
/// only re-prompts; nothing is mutated here. Returns the 0-based slot and
/// the farmhand's name.
fn prompt_slot(roster: &Roster) -> Option<(usize, String)> {
    loop {
        let line = read_line_trimmed("Which farmhand number would you like to swap? ")?;
        let number: i64 = match line.parse() {
            Ok(n) => n,
            Err(_) => {
                println!("Please enter a number.");
                continue;
            }
        };
        if number <= 0 {
            println!("Please enter a positive number");
            continue;
        }
        let index = (number - 1) as usize;
        match roster.farmhand_names.get(index) {
            None => println!("Please enter a valid cabin number."),
            Some(None) => println!("That cabin is empty.  You must select an occupied cabin."),
            Some(Some(name)) => return Some((index, name.clone())),
        }
    }
}

/// Ask until a case-insensitive Y or N; anything else re-prompts silently.
fn prompt_confirm() -> Option<bool> {
    loop {
        let line = read_line_trimmed("Continue [Y/N]? ")?;
        match line.to_ascii_uppercase().as_str() {
            "Y" => return Some(true),
            "N" => return Some(false),
            _ => {}
        }
    }
}
