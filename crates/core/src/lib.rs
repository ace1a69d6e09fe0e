//! Carelink domain core.
//!
//! Pure domain logic with zero internal dependencies: the job lifecycle
//! state machine, trust scoring rules, the policy gate, settlement
//! arithmetic, and shared error/type definitions. Nothing in this crate
//! performs I/O, so everything here can be called speculatively and
//! tested without a database.

pub mod audit;
pub mod error;
pub mod job_state;
pub mod money;
pub mod policy;
pub mod roles;
pub mod scheduling;
pub mod trust;
pub mod types;
