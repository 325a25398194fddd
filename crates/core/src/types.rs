/// All database primary keys are PostgreSQL BIGINT identities.
///
/// For articles the key doubles as the printed serial number.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
