//! Account Rules Module
//!
//! Rules a user record must satisfy before it is stored:
//! - fullname, email and gender are required
//! - gender is one of Male, Female, Other (any case)
//! - score type, when given, is CGPA or Percentage
//!
//! Updates to an existing account may only change fullname, gender,
//! address and education.

use crate::error::UserError;
use crate::types::{Education, UserProfile};

pub const GENDERS: &[&str] = &["male", "female", "other"];
pub const SCORE_TYPES: &[&str] = &["CGPA", "Percentage"];

/// Check a user record against the account rules.
pub fn validate_user(user: &UserProfile) -> Result<(), UserError> {
    for (field, value) in [
        ("fullname", &user.fullname),
        ("email", &user.email),
        ("gender", &user.gender),
    ] {
        if value.trim().is_empty() {
            return Err(UserError::MissingField(field));
        }
    }

    if !GENDERS.contains(&user.gender.trim().to_lowercase().as_str()) {
        return Err(UserError::InvalidGender(user.gender.clone()));
    }

    if let Some(score_type) = &user.education.score_type {
        if !SCORE_TYPES.contains(&score_type.trim()) {
            return Err(UserError::InvalidScoreType(score_type.clone()));
        }
    }

    Ok(())
}

/// The editable part of an account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub fullname: String,
    pub gender: String,
    pub address: String,
    pub education: Education,
}

impl From<&UserProfile> for UserUpdate {
    fn from(user: &UserProfile) -> Self {
        Self {
            fullname: user.fullname.clone(),
            gender: user.gender.clone(),
            address: user.address.clone(),
            education: user.education.clone(),
        }
    }
}
