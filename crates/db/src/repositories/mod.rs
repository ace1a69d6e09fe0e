//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (standalone reads) or `&mut PgConnection` (steps
//! that must run inside a caller-owned transaction) as the first
//! argument.

pub mod audit_repo;
pub mod job_repo;
pub mod ledger_repo;
pub mod trust_history_repo;
pub mod trust_signal_repo;
pub mod user_repo;
pub mod wallet_repo;

pub use audit_repo::AuditRepo;
pub use job_repo::JobRepo;
pub use ledger_repo::LedgerRepo;
pub use trust_history_repo::TrustHistoryRepo;
pub use trust_signal_repo::TrustSignalRepo;
pub use user_repo::UserRepo;
pub use wallet_repo::WalletRepo;
