//! Scholarship Ranker Library
//!
//! Stores scholarship listings and ranks them against a user profile

pub mod accounts;
pub mod config;
pub mod criteria;
pub mod error;
pub mod filter;
pub mod listing;
pub mod logging;
pub mod ranker;
pub mod sentiment;
pub mod sorter;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use ranker::{rank, rank_scholarships_for_user, Ranker};
pub use types::*;
