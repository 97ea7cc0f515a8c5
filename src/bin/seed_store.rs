//! Store Seeding Binary
//!
//! Loads records into the scholarship store:
//! - `seed_store users <users.json>`
//! - `seed_store scholarships <scholarships.json>`
//! - `seed_store listing <layout> <page.html>` for a saved listing page
//!   (layouts: scholarships_com, buddy4study, buddy4study_open)
//! - `seed_store list` prints every stored scholarship as JSON
//!
//! User records that break the account rules are skipped and counted.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Local;
use scholarship_ranker::accounts::{validate_user, UserUpdate};
use scholarship_ranker::listing::{parse_listing, ListingLayout};
use scholarship_ranker::storage::{load_scholarships_file, load_users_file, Store};
use scholarship_ranker::{logging, AppConfig, UserProfile};

const USAGE: &str = "usage: seed_store users <file.json> | scholarships <file.json> | listing <layout> <page.html> | list";

enum Command {
    Seed(Seed),
    List,
}

enum Seed {
    Users(PathBuf),
    Scholarships(PathBuf),
    Listing(ListingLayout, PathBuf),
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args {
        [cmd, path] if cmd == "users" => Ok(Command::Seed(Seed::Users(PathBuf::from(path)))),
        [cmd, path] if cmd == "scholarships" => Ok(Command::Seed(Seed::Scholarships(PathBuf::from(path)))),
        [cmd, layout, path] if cmd == "listing" => {
            Ok(Command::Seed(Seed::Listing(layout.parse()?, PathBuf::from(path))))
        }
        [cmd] if cmd == "list" => Ok(Command::List),
        _ => bail!(USAGE),
    }
}

#[derive(Debug, Default, PartialEq)]
struct UserSeedSummary {
    created: usize,
    updated: usize,
    skipped: usize,
}

/// Create new accounts and update existing ones. Invalid records are skipped.
fn seed_users(store: &Store, users: &[UserProfile]) -> Result<UserSeedSummary> {
    let mut summary = UserSeedSummary::default();
    for user in users {
        if let Err(e) = validate_user(user) {
            println!("  Skipped {:?}: {}", user.email.trim(), e);
            summary.skipped += 1;
            continue;
        }
        if store.update_user(&user.email, &UserUpdate::from(user))? {
            summary.updated += 1;
        } else if store.insert_user(user)? {
            summary.created += 1;
        }
    }
    Ok(summary)
}

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;

    let root = std::env::var("ROOT").unwrap_or_else(|_| ".".to_string());
    let config = AppConfig::load(&root).context("Failed to load configuration")?;

    let seed = match command {
        Command::List => {
            let store = Store::open_existing(&config.store)
                .with_context(|| format!("Failed to open store at {:?}", config.store.db_path))?;
            let records = store.all_scholarships()?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }
        Command::Seed(seed) => seed,
    };

    let mut store = Store::open(&config.store)
        .with_context(|| format!("Failed to open store at {:?}", config.store.db_path))?;

    println!("=== Store Seeding ===");

    match seed {
        Seed::Users(path) => {
            let users = load_users_file(&path)?;
            let summary = seed_users(&store, &users)?;
            println!(
                "Created {}, updated {}, skipped {} of {} users",
                summary.created,
                summary.updated,
                summary.skipped,
                users.len()
            );
        }
        Seed::Scholarships(path) => {
            let records = load_scholarships_file(&path)?;
            let inserted = store.insert_scholarships(&records)?;
            println!("Inserted {} new of {} scholarships", inserted, records.len());
        }
        Seed::Listing(layout, path) => {
            let html = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read listing page {:?}", path))?;
            let import = parse_listing(&html, layout, Local::now().date_naive())?;
            let inserted = store.insert_scholarships(&import.records)?;
            println!(
                "Found {} cards ({} skipped), inserted {} new",
                import.records.len() + import.skipped,
                import.skipped,
                inserted
            );
        }
    }

    println!("Store now holds {} scholarships", store.scholarship_count()?);
    Ok(())
}
