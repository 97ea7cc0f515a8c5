//! Ranking criteria
//!
//! Each criterion scores one aspect of fit in [0, 1] from inputs that were
//! normalized once up front. The ranker combines them through a weighted
//! list built from [`Weights`], so reweighting or swapping a matcher never
//! touches aggregation.

use std::collections::HashSet;
use std::fmt;

use regex::Regex;

use crate::config::{ScoringConfig, Weights};
use crate::filter;
use crate::sentiment::SentimentBlend;
use crate::types::{ScholarshipRecord, SubScores, UserProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriterionKind {
    Sentiment,
    Address,
    Gender,
    Cgpa,
    Qualification,
    Institution,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 6] = [
        CriterionKind::Sentiment,
        CriterionKind::Address,
        CriterionKind::Gender,
        CriterionKind::Cgpa,
        CriterionKind::Qualification,
        CriterionKind::Institution,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionKind::Sentiment => "sentiment",
            CriterionKind::Address => "address",
            CriterionKind::Gender => "gender",
            CriterionKind::Cgpa => "cgpa",
            CriterionKind::Qualification => "qualification",
            CriterionKind::Institution => "institution",
        }
    }

    pub fn weight_in(&self, weights: &Weights) -> f64 {
        match self {
            CriterionKind::Sentiment => weights.sentiment,
            CriterionKind::Address => weights.address,
            CriterionKind::Gender => weights.gender,
            CriterionKind::Cgpa => weights.cgpa,
            CriterionKind::Qualification => weights.qualification,
            CriterionKind::Institution => weights.institution,
        }
    }

    pub fn set_in(&self, scores: &mut SubScores, value: f64) {
        let slot = match self {
            CriterionKind::Sentiment => &mut scores.sentiment,
            CriterionKind::Address => &mut scores.address,
            CriterionKind::Gender => &mut scores.gender,
            CriterionKind::Cgpa => &mut scores.cgpa,
            CriterionKind::Qualification => &mut scores.qualification,
            CriterionKind::Institution => &mut scores.institution,
        };
        *slot = value;
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User fields prepared once per ranking call.
#[derive(Debug, Clone)]
pub struct ProfileSignals {
    pub address_tokens: HashSet<String>,
    pub gender: Option<Regex>,
    pub qualification: String,
    pub institution: String,
    pub cgpa_norm: f64,
}

impl ProfileSignals {
    pub fn from_user(user: &UserProfile, max_cgpa: f64) -> Self {
        Self {
            address_tokens: filter::tokens(user.address.trim()),
            gender: filter::whole_word_pattern(&user.gender.trim().to_lowercase()),
            qualification: user.education.qualification.trim().to_lowercase(),
            institution: user.education.institution.trim().to_lowercase(),
            cgpa_norm: filter::normalize_cgpa(&user.education.score_value, max_cgpa),
        }
    }
}

/// Scholarship fields prepared once per record.
#[derive(Debug, Clone)]
pub struct ListingSignals {
    /// name, award and eligibility joined for sentiment
    pub text: String,
    pub eligibility: String,
    /// tokens of address + eligibility
    pub tokens: HashSet<String>,
    pub cgpa_requirement: Option<f64>,
}

impl ListingSignals {
    pub fn from_record(record: &ScholarshipRecord) -> Self {
        let eligibility = record.eligibility.trim().to_lowercase();
        let text = [record.name.trim(), record.award.trim(), record.eligibility.trim()]
            .join(" ")
            .trim()
            .to_string();
        let address = record.address.trim().to_lowercase();
        let tokens = filter::tokens(&format!("{} {}", address, eligibility));
        let cgpa_requirement = filter::extract_cgpa_requirement(&eligibility);

        Self {
            text,
            eligibility,
            tokens,
            cgpa_requirement,
        }
    }
}

pub trait Criterion: Send + Sync {
    fn kind(&self) -> CriterionKind;

    /// Score in [0, 1].
    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64;
}

pub struct SentimentCriterion {
    blend: SentimentBlend,
}

impl SentimentCriterion {
    pub fn new(blend: SentimentBlend) -> Self {
        Self { blend }
    }
}

impl Criterion for SentimentCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Sentiment
    }

    fn score(&self, _profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        self.blend.score(&listing.text)
    }
}

pub struct AddressCriterion;

impl Criterion for AddressCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Address
    }

    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        filter::token_overlap(&profile.address_tokens, &listing.tokens)
    }
}

pub struct GenderCriterion;

impl Criterion for GenderCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Gender
    }

    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        match &profile.gender {
            Some(re) if re.is_match(&listing.eligibility) => 1.0,
            _ => 0.0,
        }
    }
}

pub struct CgpaCriterion {
    max_cgpa: f64,
}

impl CgpaCriterion {
    pub fn new(max_cgpa: f64) -> Self {
        Self { max_cgpa }
    }
}

impl Criterion for CgpaCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Cgpa
    }

    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        filter::cgpa_match(profile.cgpa_norm, listing.cgpa_requirement, self.max_cgpa)
    }
}

pub struct QualificationCriterion;

impl Criterion for QualificationCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Qualification
    }

    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        presence(filter::contains_phrase(&profile.qualification, &listing.eligibility))
    }
}

pub struct InstitutionCriterion;

impl Criterion for InstitutionCriterion {
    fn kind(&self) -> CriterionKind {
        CriterionKind::Institution
    }

    fn score(&self, profile: &ProfileSignals, listing: &ListingSignals) -> f64 {
        presence(filter::contains_phrase(&profile.institution, &listing.eligibility))
    }
}

fn presence(found: bool) -> f64 {
    if found {
        1.0
    } else {
        0.0
    }
}

pub struct WeightedCriterion {
    pub criterion: Box<dyn Criterion>,
    pub weight: f64,
}

/// The six standard criteria weighted per `config`.
pub fn default_criteria(config: &ScoringConfig) -> Vec<WeightedCriterion> {
    let criteria: Vec<Box<dyn Criterion>> = vec![
        Box::new(SentimentCriterion::new(SentimentBlend::default())),
        Box::new(AddressCriterion),
        Box::new(GenderCriterion),
        Box::new(CgpaCriterion::new(config.max_cgpa)),
        Box::new(QualificationCriterion),
        Box::new(InstitutionCriterion),
    ];
    criteria
        .into_iter()
        .map(|criterion| {
            let weight = criterion.kind().weight_in(&config.weights);
            WeightedCriterion { criterion, weight }
        })
        .collect()
}
