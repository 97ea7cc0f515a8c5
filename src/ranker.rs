//! Scholarship Ranker
//!
//! Scores every scholarship against one user and orders them by the weighted
//! sum of the criterion scores. Sub-scores are combined at full precision;
//! only the reported values are rounded.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::config::{AppConfig, ScoringConfig};
use crate::criteria::{default_criteria, ListingSignals, ProfileSignals, WeightedCriterion};
use crate::error::ConfigError;
use crate::sorter;
use crate::storage::Store;
use crate::types::{round4, ScholarshipRecord, ScoredScholarship, SubScores, UserProfile};

pub struct Ranker {
    criteria: Vec<WeightedCriterion>,
    max_cgpa: f64,
}

impl Default for Ranker {
    fn default() -> Self {
        let config = ScoringConfig::default();
        Self {
            criteria: default_criteria(&config),
            max_cgpa: config.max_cgpa,
        }
    }
}

impl Ranker {
    pub fn new(config: &ScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            criteria: default_criteria(config),
            max_cgpa: config.max_cgpa,
        })
    }

    /// Use a custom criterion list. Weights are taken as given.
    pub fn with_criteria(criteria: Vec<WeightedCriterion>, max_cgpa: f64) -> Self {
        Self { criteria, max_cgpa }
    }

    /// Rank against today's local date.
    pub fn rank(&self, user: &UserProfile, scholarships: &[ScholarshipRecord]) -> Vec<ScoredScholarship> {
        self.rank_on(user, scholarships, Local::now().date_naive())
    }

    /// Rank with an explicit "today" for deadline urgency.
    pub fn rank_on(
        &self,
        user: &UserProfile,
        scholarships: &[ScholarshipRecord],
        today: NaiveDate,
    ) -> Vec<ScoredScholarship> {
        let profile = ProfileSignals::from_user(user, self.max_cgpa);

        let mut scored: Vec<ScoredScholarship> = scholarships
            .iter()
            .map(|record| self.score_one(&profile, record, today))
            .collect();

        sorter::sort_by_final_score(&mut scored);
        tracing::debug!(count = scored.len(), "ranked scholarships");
        scored
    }

    fn score_one(&self, profile: &ProfileSignals, record: &ScholarshipRecord, today: NaiveDate) -> ScoredScholarship {
        let listing = ListingSignals::from_record(record);
        let mut sub_scores = SubScores::default();
        let mut total = 0.0;

        for weighted in &self.criteria {
            let kind = weighted.criterion.kind();
            let raw = weighted.criterion.score(profile, &listing);
            let value = if raw.is_finite() { raw.clamp(0.0, 1.0) } else { 0.0 };
            kind.set_in(&mut sub_scores, value);
            total += weighted.weight * value;
        }

        ScoredScholarship {
            record: record.clone(),
            sub_scores: sub_scores.rounded(),
            final_score: round4(total),
            award_amount: sorter::extract_numeric_amount(&record.award),
            deadline_urgency: sorter::deadline_urgency(&record.deadline, today),
        }
    }
}

/// Rank with the default weights.
pub fn rank(user: &UserProfile, scholarships: &[ScholarshipRecord]) -> Vec<ScoredScholarship> {
    Ranker::default().rank(user, scholarships)
}

/// Look the user up by email and rank every stored scholarship for them.
///
/// An unknown email or an empty catalogue yields an empty list. Store
/// failures are returned to the caller.
pub fn rank_scholarships_for_user(config: &AppConfig, email: &str) -> Result<Vec<ScoredScholarship>> {
    let ranker = Ranker::new(&config.scoring).context("Invalid scoring configuration")?;

    let (user, scholarships) = {
        let store = Store::open_existing(&config.store).context("Failed to open scholarship store")?;
        let Some(user) = store.find_user(email).context("Failed to look up user")? else {
            tracing::info!(email, "user not found");
            return Ok(vec![]);
        };
        let scholarships = store.all_scholarships().context("Failed to load scholarships")?;
        (user, scholarships)
    };

    if scholarships.is_empty() {
        tracing::info!("no scholarships stored");
        return Ok(vec![]);
    }

    tracing::info!(email, count = scholarships.len(), "ranking scholarships");
    Ok(ranker.rank(&user, &scholarships))
}
