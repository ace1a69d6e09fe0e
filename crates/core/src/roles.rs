//! Well-known role name constants.
//!
//! These must match the seed data in the `users` table migration.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_HIRER: &str = "hirer";
pub const ROLE_CAREGIVER: &str = "caregiver";
