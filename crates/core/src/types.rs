/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// All money amounts are integer cents in the wallet's currency.
///
/// Signed so a single ledger entry can represent a debit or a credit.
pub type Cents = i64;
