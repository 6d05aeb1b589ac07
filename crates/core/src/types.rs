/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Users are owned by an external account service; we only correlate by id.
pub type UserId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
