//! User entity model and DTOs.

use carelink_core::error::CoreError;
use carelink_core::policy::{PolicyUser, Role};
use carelink_core::trust::{TrustLevel, Verification};
use carelink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// KYC status values stored in `users.kyc_status`.
pub mod kyc_statuses {
    pub const NONE: &str = "none";
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const REJECTED: &str = "rejected";
}

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<i32>,
    pub role: String,
    pub phone_verified_at: Option<Timestamp>,
    pub email_verified_at: Option<Timestamp>,
    pub kyc_status: String,
    pub bank_verified_at: Option<Timestamp>,
    pub trust_score: i32,
    pub trust_level: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Verification prerequisites for trust level determination.
    pub fn verification(&self) -> Verification {
        Verification {
            phone_verified: self.phone_verified_at.is_some(),
            email_verified: self.email_verified_at.is_some(),
            kyc_approved: self.kyc_status == kyc_statuses::APPROVED,
            bank_verified: self.bank_verified_at.is_some(),
        }
    }

    /// Display name, bio, and experience years all present and non-blank.
    pub fn profile_complete(&self) -> bool {
        self.display_name.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self.bio.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self.experience_years.is_some()
    }

    /// Parse the stored trust level, failing on corrupted data.
    pub fn parsed_trust_level(&self) -> Result<TrustLevel, CoreError> {
        TrustLevel::parse(&self.trust_level).ok_or_else(|| {
            CoreError::Internal(format!(
                "User {} has unknown trust_level '{}'",
                self.id, self.trust_level
            ))
        })
    }

    /// Build the policy gate view of this user.
    pub fn policy_user(&self) -> Result<PolicyUser, CoreError> {
        let role = Role::parse(&self.role).ok_or_else(|| {
            CoreError::Internal(format!("User {} has unknown role '{}'", self.id, self.role))
        })?;
        Ok(PolicyUser {
            role,
            trust_level: self.parsed_trust_level()?,
        })
    }
}

/// DTO for inserting a user (admin tooling and test fixtures).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub role: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub experience_years: Option<i32>,
}
