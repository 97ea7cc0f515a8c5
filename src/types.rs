use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub education: Education,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Education {
    #[serde(default)]
    pub qualification: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default, rename = "yearOfPassing", alias = "year_of_passing")]
    pub year_of_passing: Option<i32>,
    #[serde(default, rename = "scoreType", alias = "score_type")]
    pub score_type: Option<String>,
    /// CGPA-like numeric string, e.g. "8.2"
    #[serde(default, rename = "scoreValue", alias = "score_value")]
    pub score_value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ScholarshipRecord {
    pub name: String,
    #[serde(default)]
    pub award: String,
    #[serde(default)]
    pub eligibility: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UsersFile {
    pub users: Vec<UserProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ScholarshipsFile {
    pub scholarships: Vec<ScholarshipRecord>,
}

/// Per-criterion scores, each in [0, 1].
///
/// Field order is the order the breakdown is reported in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct SubScores {
    pub sentiment: f64,
    pub address: f64,
    pub gender: f64,
    pub cgpa: f64,
    pub qualification: f64,
    pub institution: f64,
}

impl SubScores {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("sentiment", self.sentiment),
            ("address", self.address),
            ("gender", self.gender),
            ("cgpa", self.cgpa),
            ("qualification", self.qualification),
            ("institution", self.institution),
        ]
        .into_iter()
    }

    pub fn rounded(&self) -> Self {
        Self {
            sentiment: round4(self.sentiment),
            address: round4(self.address),
            gender: round4(self.gender),
            cgpa: round4(self.cgpa),
            qualification: round4(self.qualification),
            institution: round4(self.institution),
        }
    }
}

/// A scholarship with its derived ranking fields attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredScholarship {
    pub record: ScholarshipRecord,
    pub sub_scores: SubScores,
    pub final_score: f64,
    /// Largest number in the award text. Not part of `final_score`.
    pub award_amount: u64,
    /// `1 / (days_left + 1)`, 0.0 when past or unparseable. Not part of `final_score`.
    pub deadline_urgency: f64,
}

/// One element of the CLI output array.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    pub name: String,
    pub award: String,
    pub eligibility: String,
    pub link: String,
    pub deadline: String,
    pub final_score: f64,
    pub details: SubScores,
    pub award_amount: u64,
    pub deadline_urgency: f64,
}

impl From<&ScoredScholarship> for RankedEntry {
    fn from(scored: &ScoredScholarship) -> Self {
        let name = if scored.record.name.is_empty() {
            "<no name>".to_string()
        } else {
            scored.record.name.clone()
        };
        Self {
            name,
            award: scored.record.award.clone(),
            eligibility: scored.record.eligibility.clone(),
            link: scored.record.link.clone(),
            deadline: scored.record.deadline.clone(),
            final_score: scored.final_score,
            details: scored.sub_scores,
            award_amount: scored.award_amount,
            deadline_urgency: scored.deadline_urgency,
        }
    }
}

/// Round to 4 decimal places.
pub fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
