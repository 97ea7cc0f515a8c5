//! Integration tests for the ranking pipeline
//! Seeds a throwaway SQLite store from fixtures and ranks through the public API and binaries

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::NaiveDate;
use scholarship_ranker::config::{AppConfig, StoreConfig};
use scholarship_ranker::listing::{parse_listing, ListingLayout};
use scholarship_ranker::storage::{load_scholarships_file, load_users_file, Store};
use scholarship_ranker::{rank, rank_scholarships_for_user, Education, ScholarshipRecord, UserProfile};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

/// Create a store seeded with the fixture users and scholarships
fn seeded_config(dir: &TempDir) -> AppConfig {
    let config = AppConfig {
        store: StoreConfig {
            db_path: dir.path().join("data").join("scholarships.db"),
        },
        ..Default::default()
    };

    let mut store = Store::open(&config.store).expect("Failed to open store");
    for user in load_users_file(&fixture("users.json")).expect("Failed to load users") {
        store.insert_user(&user).expect("Failed to save user");
    }
    let records = load_scholarships_file(&fixture("scholarships.json")).expect("Failed to load scholarships");
    store.insert_scholarships(&records).expect("Failed to save scholarships");

    config
}

fn user_with(gender: &str, address: &str, cgpa: &str) -> UserProfile {
    UserProfile {
        email: "test@example.com".to_string(),
        gender: gender.to_string(),
        address: address.to_string(),
        education: Education {
            score_value: cgpa.to_string(),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn only(eligibility: &str) -> Vec<ScholarshipRecord> {
    vec![ScholarshipRecord {
        name: "Test".to_string(),
        eligibility: eligibility.to_string(),
        address: "Mumbai Maharashtra".to_string(),
        ..Default::default()
    }]
}

#[test]
fn test_end_to_end_ranking_from_store() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let ranked = rank_scholarships_for_user(&config, "asha@example.com").unwrap();

    assert_eq!(ranked.len(), 4, "Every stored scholarship should be ranked");
    assert_eq!(ranked[0].record.name, "Women in Engineering Scholarship");
    for pair in ranked.windows(2) {
        assert!(pair[0].final_score >= pair[1].final_score, "Output must be sorted descending");
    }

    let top = &ranked[0];
    assert_eq!(top.sub_scores.gender, 1.0);
    assert_eq!(top.sub_scores.cgpa, 1.0);
    assert_eq!(top.sub_scores.qualification, 1.0);
    assert_eq!(top.sub_scores.address, 0.5);
    assert_eq!(top.award_amount, 5000);
}

#[test]
fn test_unknown_user_yields_empty_result() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let ranked = rank_scholarships_for_user(&config, "nobody@example.com").unwrap();
    assert!(ranked.is_empty(), "Unknown email should give an empty ranking, not an error");
}

#[test]
fn test_empty_catalogue_yields_empty_result() {
    let dir = TempDir::new().unwrap();
    let config = AppConfig {
        store: StoreConfig {
            db_path: dir.path().join("empty.db"),
        },
        ..Default::default()
    };
    {
        let store = Store::open(&config.store).unwrap();
        store
            .insert_user(&UserProfile {
                email: "solo@example.com".to_string(),
                fullname: "Solo".to_string(),
                gender: "Other".to_string(),
                ..Default::default()
            })
            .unwrap();
    }

    let ranked = rank_scholarships_for_user(&config, "solo@example.com").unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_unreachable_store_is_an_error() {
    let dir = TempDir::new().unwrap();
    // a directory cannot be opened as a database file
    let config = AppConfig {
        store: StoreConfig {
            db_path: dir.path().to_path_buf(),
        },
        ..Default::default()
    };

    assert!(rank_scholarships_for_user(&config, "asha@example.com").is_err());
}

#[test]
fn test_missing_store_is_an_error_and_not_created() {
    let dir = TempDir::new().unwrap();
    let missing_dir = dir.path().join("typo");
    let config = AppConfig {
        store: StoreConfig {
            db_path: missing_dir.join("nothere.db"),
        },
        ..Default::default()
    };

    assert!(
        rank_scholarships_for_user(&config, "asha@example.com").is_err(),
        "A mistyped store path must fail instead of ranking an empty store"
    );
    assert!(!config.store.db_path.exists(), "Ranking must not create the database file");
    assert!(!missing_dir.exists(), "Ranking must not create the store directory");
}

#[test]
fn test_ranking_does_not_mutate_store() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let before = Store::open(&config.store).unwrap().all_scholarships().unwrap();
    let first = rank_scholarships_for_user(&config, "ravi@example.com").unwrap();
    let second = rank_scholarships_for_user(&config, "ravi@example.com").unwrap();
    let after = Store::open(&config.store).unwrap().all_scholarships().unwrap();

    assert_eq!(before, after, "Ranking must leave stored records untouched");
    let order = |ranked: &[scholarship_ranker::ScoredScholarship]| {
        ranked.iter().map(|s| (s.record.name.clone(), s.final_score)).collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second), "Ranking should be idempotent");
}

#[test]
fn test_gender_scenario() {
    let ranked = rank(&user_with("female", "", ""), &only("Open to female students"));
    assert_eq!(ranked[0].sub_scores.gender, 1.0);
}

#[test]
fn test_cgpa_above_requirement_scenario() {
    let ranked = rank(&user_with("", "", "8.0"), &only("minimum cgpa >= 7.5"));
    assert_eq!(ranked[0].sub_scores.cgpa, 1.0);
}

#[test]
fn test_cgpa_below_requirement_scenario() {
    let ranked = rank(&user_with("", "", "6.0"), &only("cgpa >= 9.0"));
    assert_eq!(ranked[0].sub_scores.cgpa, 0.6667);
}

#[test]
fn test_empty_address_scenario() {
    let ranked = rank(&user_with("", "", ""), &only("Residents of Mumbai Maharashtra"));
    assert_eq!(ranked[0].sub_scores.address, 0.0);
}

#[test]
fn test_award_amount_scenario() {
    let records = vec![ScholarshipRecord {
        name: "Range".to_string(),
        award: "$1,200 - $5,000".to_string(),
        ..Default::default()
    }];
    let ranked = rank(&user_with("", "", ""), &records);
    assert_eq!(ranked[0].award_amount, 5000);
}

#[test]
fn test_listing_import_feeds_ranking() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let html = fs::read_to_string(fixture("buddy4study_listing.html")).unwrap();
    let today = NaiveDate::from_ymd_opt(2026, 5, 28).unwrap();
    let import = parse_listing(&html, ListingLayout::Buddy4Study, today).unwrap();
    assert_eq!(import.records.len(), 1, "Closed listing should be skipped");
    assert_eq!(import.records[0].deadline, "17-06-2026");

    let mut store = Store::open(&config.store).unwrap();
    assert_eq!(store.insert_scholarships(&import.records).unwrap(), 1);
    // re-importing the same page adds nothing
    assert_eq!(store.insert_scholarships(&import.records).unwrap(), 0);
    drop(store);

    let ranked = rank_scholarships_for_user(&config, "asha@example.com").unwrap();
    assert_eq!(ranked.len(), 5);
    let girls = ranked
        .iter()
        .find(|s| s.record.name == "Girls in STEM Scholarship")
        .expect("Imported listing should be ranked");
    assert_eq!(girls.sub_scores.gender, 1.0);
    assert_eq!(girls.sub_scores.qualification, 1.0);
}

#[test]
fn test_cli_reports_missing_email() {
    let output = Command::new(env!("CARGO_BIN_EXE_rank_scholarships"))
        .env_remove("SCHOLARSHIP_DB")
        .output()
        .expect("Failed to run rank_scholarships");

    assert_eq!(output.status.code(), Some(1));
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["error"], "Email not provided");
}

#[test]
fn test_cli_prints_ranked_json() {
    let dir = TempDir::new().unwrap();
    let config = seeded_config(&dir);

    let output = Command::new(env!("CARGO_BIN_EXE_rank_scholarships"))
        .arg("asha@example.com")
        .env("ROOT", dir.path())
        .env("SCHOLARSHIP_DB", &config.store.db_path)
        .output()
        .expect("Failed to run rank_scholarships");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let entries: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 4);
    assert_eq!(entries[0]["name"], "Women in Engineering Scholarship");
    for key in ["name", "award", "eligibility", "link", "deadline", "final_score", "details"] {
        assert!(entries[0].get(key).is_some(), "missing {}", key);
    }
    assert_eq!(entries[0]["details"]["gender"], 1.0);
}
