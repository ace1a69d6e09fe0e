//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` create DTOs for inserts where the API accepts them
//! - Query DTOs for list endpoints

pub mod audit;
pub mod job;
pub mod ledger;
pub mod trust;
pub mod user;
pub mod wallet;
