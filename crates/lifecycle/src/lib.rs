//! Transactional orchestration of the job lifecycle.
//!
//! This crate owns the only code paths that mutate jobs and wallets:
//! the transition engine ([`machine::execute_transition`]), the escrow
//! settlement steps ([`escrow`]), the named job actions ([`actions`]),
//! and the trust level worker ([`trust_worker`]). Everything runs inside
//! a single database transaction per operation, with row locks on the
//! job (and, for settlement, the escrow wallet).

pub mod actions;
pub mod error;
pub mod escrow;
pub mod machine;
pub mod trust_worker;

pub use error::LifecycleError;
