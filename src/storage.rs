//! Record Storage Module
//!
//! SQLite-backed store for user profiles and scholarship records:
//! - users keyed by email
//! - scholarships keyed by a SHA-256 fingerprint of name and link,
//!   returned in insertion order
//! - JSON seed files for both
//!
//! A `Store` owns its connection; dropping it closes the database.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::accounts::UserUpdate;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::types::{Education, ScholarshipRecord, ScholarshipsFile, UserProfile, UsersFile};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database named in `config`.
    pub fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(&config.db_path).map_err(|source| StoreError::Open {
            path: config.db_path.clone(),
            source,
        })?;
        tracing::debug!(path = %config.db_path.display(), "opened store");

        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an existing database read-only. Never creates files or tables.
    pub fn open_existing(config: &StoreConfig) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            &config.db_path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| StoreError::Open {
            path: config.db_path.clone(),
            source,
        })?;
        tracing::debug!(path = %config.db_path.display(), "opened store read-only");
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                email TEXT PRIMARY KEY,
                fullname TEXT NOT NULL DEFAULT '',
                gender TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                qualification TEXT NOT NULL DEFAULT '',
                institution TEXT NOT NULL DEFAULT '',
                year_of_passing INTEGER,
                score_type TEXT,
                score_value TEXT NOT NULL DEFAULT ''
            );
            CREATE TABLE IF NOT EXISTS scholarships (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                fingerprint TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                award TEXT NOT NULL DEFAULT '',
                eligibility TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                link TEXT NOT NULL DEFAULT '',
                deadline TEXT NOT NULL DEFAULT '',
                added_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn find_user(&self, email: &str) -> Result<Option<UserProfile>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT email, fullname, gender, address, qualification, institution,
                    year_of_passing, score_type, score_value
             FROM users WHERE email = ?1",
        )?;

        let user = stmt
            .query_row(params![email], |row| {
                Ok(UserProfile {
                    email: row.get(0)?,
                    fullname: row.get(1)?,
                    gender: row.get(2)?,
                    address: row.get(3)?,
                    education: Education {
                        qualification: row.get(4)?,
                        institution: row.get(5)?,
                        year_of_passing: row.get(6)?,
                        score_type: row.get(7)?,
                        score_value: row.get(8)?,
                    },
                })
            })
            .optional()?;
        Ok(user)
    }

    /// Create an account. Returns false when the email is already taken.
    pub fn insert_user(&self, user: &UserProfile) -> Result<bool, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO users
             (email, fullname, gender, address, qualification, institution,
              year_of_passing, score_type, score_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                user.email.trim(),
                user.fullname,
                user.gender,
                user.address,
                user.education.qualification,
                user.education.institution,
                user.education.year_of_passing,
                user.education.score_type,
                user.education.score_value,
            ],
        )?;
        Ok(inserted > 0)
    }

    /// Change the editable fields of an account. Returns false when no such email exists.
    pub fn update_user(&self, email: &str, update: &UserUpdate) -> Result<bool, StoreError> {
        let updated = self.conn.execute(
            "UPDATE users SET fullname = ?2, gender = ?3, address = ?4, qualification = ?5,
                    institution = ?6, year_of_passing = ?7, score_type = ?8, score_value = ?9
             WHERE email = ?1",
            params![
                email.trim(),
                update.fullname,
                update.gender,
                update.address,
                update.education.qualification,
                update.education.institution,
                update.education.year_of_passing,
                update.education.score_type,
                update.education.score_value,
            ],
        )?;
        Ok(updated > 0)
    }

    /// Insert records not already stored. Returns how many were new.
    pub fn insert_scholarships(&mut self, records: &[ScholarshipRecord]) -> Result<usize, StoreError> {
        let added_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO scholarships
                 (fingerprint, name, award, eligibility, address, link, deadline, added_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for record in records {
                inserted += stmt.execute(params![
                    fingerprint(record),
                    record.name,
                    record.award,
                    record.eligibility,
                    record.address,
                    record.link,
                    record.deadline,
                    added_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    pub fn all_scholarships(&self) -> Result<Vec<ScholarshipRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT name, award, eligibility, address, link, deadline
             FROM scholarships ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ScholarshipRecord {
                name: row.get(0)?,
                award: row.get(1)?,
                eligibility: row.get(2)?,
                address: row.get(3)?,
                link: row.get(4)?,
                deadline: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    pub fn scholarship_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM scholarships", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

/// Identity of a scholarship across imports.
pub fn fingerprint(record: &ScholarshipRecord) -> String {
    let mut hasher = Sha256::new();
    hasher.update(record.name.trim().as_bytes());
    hasher.update(b"\n");
    hasher.update(record.link.trim().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Seed files may be a bare array or wrapped in an object.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile<W, T> {
    Wrapped(W),
    Bare(Vec<T>),
}

pub fn load_users_file(path: &Path) -> Result<Vec<UserProfile>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read users from {:?}", path))?;
    let parsed: SeedFile<UsersFile, UserProfile> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse users JSON in {:?}", path))?;
    Ok(match parsed {
        SeedFile::Wrapped(file) => file.users,
        SeedFile::Bare(users) => users,
    })
}

pub fn load_scholarships_file(path: &Path) -> Result<Vec<ScholarshipRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scholarships from {:?}", path))?;
    let parsed: SeedFile<ScholarshipsFile, ScholarshipRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse scholarships JSON in {:?}", path))?;
    Ok(match parsed {
        SeedFile::Wrapped(file) => file.scholarships,
        SeedFile::Bare(records) => records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, link: &str) -> ScholarshipRecord {
        ScholarshipRecord {
            name: name.to_string(),
            award: "$1,000".to_string(),
            link: link.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_user_round_trip() {
        let store = Store::open_in_memory().unwrap();
        let user = UserProfile {
            email: "ravi@example.com".to_string(),
            gender: "Male".to_string(),
            education: Education {
                qualification: "B.Sc".to_string(),
                score_value: "7.9".to_string(),
                year_of_passing: Some(2025),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(store.insert_user(&user).unwrap());
        assert!(!store.insert_user(&user).unwrap(), "email is unique");

        let found = store.find_user("ravi@example.com").unwrap().unwrap();
        assert_eq!(found.gender, "Male");
        assert_eq!(found.education.score_value, "7.9");
        assert_eq!(found.education.year_of_passing, Some(2025));
    }

    #[test]
    fn test_update_user_changes_editable_fields() {
        let store = Store::open_in_memory().unwrap();
        let mut user = UserProfile {
            email: "neha@example.com".to_string(),
            fullname: "Neha".to_string(),
            gender: "Female".to_string(),
            ..Default::default()
        };
        store.insert_user(&user).unwrap();

        user.address = "Nagpur".to_string();
        user.education.score_value = "9.1".to_string();
        assert!(store.update_user("neha@example.com", &UserUpdate::from(&user)).unwrap());

        let found = store.find_user("neha@example.com").unwrap().unwrap();
        assert_eq!(found.address, "Nagpur");
        assert_eq!(found.education.score_value, "9.1");

        assert!(!store.update_user("ghost@example.com", &UserUpdate::from(&user)).unwrap());
    }

    #[test]
    fn test_open_existing_does_not_create_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            db_path: dir.path().join("missing").join("store.db"),
        };
        assert!(matches!(Store::open_existing(&config), Err(StoreError::Open { .. })));
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_open_existing_reads_seeded_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            db_path: dir.path().join("store.db"),
        };
        Store::open(&config)
            .unwrap()
            .insert_scholarships(&[record("a", "https://x/a")])
            .unwrap();

        let store = Store::open_existing(&config).unwrap();
        assert_eq!(store.scholarship_count().unwrap(), 1);
    }

    #[test]
    fn test_unknown_user_is_none() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.find_user("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_scholarships_ignored_and_order_kept() {
        let mut store = Store::open_in_memory().unwrap();
        let first = vec![record("b", "https://x/b"), record("a", "https://x/a")];
        assert_eq!(store.insert_scholarships(&first).unwrap(), 2);

        let second = vec![record("a", "https://x/a"), record("c", "https://x/c")];
        assert_eq!(store.insert_scholarships(&second).unwrap(), 1);

        let names: Vec<_> = store
            .all_scholarships()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
        assert_eq!(store.scholarship_count().unwrap(), 3);
    }

    #[test]
    fn test_fingerprint_ignores_surrounding_whitespace() {
        assert_eq!(fingerprint(&record(" a ", "l")), fingerprint(&record("a", "l")));
        assert_ne!(fingerprint(&record("a", "l1")), fingerprint(&record("a", "l2")));
    }

    #[test]
    fn test_load_scholarships_bare_and_wrapped() {
        let dir = tempfile::tempdir().unwrap();

        let bare = dir.path().join("bare.json");
        fs::write(&bare, r#"[{"name": "A", "award": "$500"}]"#).unwrap();
        assert_eq!(load_scholarships_file(&bare).unwrap().len(), 1);

        let wrapped = dir.path().join("wrapped.json");
        fs::write(&wrapped, r#"{"scholarships": [{"name": "A"}, {"name": "B"}]}"#).unwrap();
        assert_eq!(load_scholarships_file(&wrapped).unwrap().len(), 2);
    }

    #[test]
    fn test_load_users_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        fs::write(&path, "not json").unwrap();
        assert!(load_users_file(&path).is_err());
    }
}
