use std::process::ExitCode;

use anyhow::{Context, Result};
use scholarship_ranker::{logging, rank_scholarships_for_user, AppConfig, RankedEntry};

const EXIT_USAGE: u8 = 1;
const EXIT_FAILURE: u8 = 2;

fn main() -> ExitCode {
    logging::init();

    let email = std::env::args()
        .nth(1)
        .map(|arg| arg.trim().to_string())
        .filter(|arg| !arg.is_empty());
    let Some(email) = email else {
        println!("{}", serde_json::json!({ "error": "Email not provided" }));
        return ExitCode::from(EXIT_USAGE);
    };

    match run(&email) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn run(email: &str) -> Result<()> {
    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let config = AppConfig::load(&root).context("Failed to load configuration")?;

    let ranked = rank_scholarships_for_user(&config, email)?;
    let entries: Vec<RankedEntry> = ranked.iter().map(RankedEntry::from).collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}
