//! Repository for the `user_preferences` table.

use prefgate_core::channels::{Category, Channel};
use prefgate_core::preferences::PreferenceFields;
use prefgate_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::preferences::{PreferenceFilter, UserPreferencesRow};

/// Column list for `user_preferences` queries.
const COLUMNS: &str = "id, user_id, email_enabled, push_enabled, sms_enabled, \
    marketing_enabled, security_enabled, product_enabled, frequency, \
    quiet_hours_start, quiet_hours_end, timezone, created_at, updated_at";

/// Provides CRUD operations for user preference records.
pub struct PreferenceRepo;

impl PreferenceRepo {
    /// Find the record owned by `user_id`.
    pub async fn find_by_user_id(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<UserPreferencesRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE user_id = $1");
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a record by its own primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<UserPreferencesRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences WHERE id = $1");
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_by_user_id(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM user_preferences WHERE user_id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// List every record, ordered by user.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<UserPreferencesRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_preferences ORDER BY user_id");
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// List records whose flag selected by `filter` is enabled.
    pub async fn list_by_filter(
        pool: &PgPool,
        filter: PreferenceFilter,
    ) -> Result<Vec<UserPreferencesRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_preferences \
             WHERE {} = true \
             ORDER BY user_id",
            filter.column()
        );
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Insert a new record for `user_id`.
    ///
    /// Fails with a unique violation on `uq_user_preferences_user_id` if the
    /// user already has one.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<UserPreferencesRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_preferences \
                (user_id, email_enabled, push_enabled, sms_enabled, \
                 marketing_enabled, security_enabled, product_enabled, \
                 frequency, quiet_hours_start, quiet_hours_end, timezone) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .bind(user_id)
            .bind(fields.channel(Channel::Email))
            .bind(fields.channel(Channel::Push))
            .bind(fields.channel(Channel::Sms))
            .bind(fields.category(Category::Marketing))
            .bind(fields.category(Category::Security))
            .bind(fields.category(Category::Product))
            .bind(fields.frequency.as_str())
            .bind(fields.quiet_hours_start)
            .bind(fields.quiet_hours_end)
            .bind(&fields.timezone)
            .fetch_one(pool)
            .await
    }

    /// Replace every mutable field of the record owned by `user_id`.
    ///
    /// Returns `None` if the user has no record.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        fields: &PreferenceFields,
    ) -> Result<Option<UserPreferencesRow>, sqlx::Error> {
        let query = format!(
            "UPDATE user_preferences SET \
                email_enabled = $2, \
                push_enabled = $3, \
                sms_enabled = $4, \
                marketing_enabled = $5, \
                security_enabled = $6, \
                product_enabled = $7, \
                frequency = $8, \
                quiet_hours_start = $9, \
                quiet_hours_end = $10, \
                timezone = $11, \
                updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserPreferencesRow>(&query)
            .bind(user_id)
            .bind(fields.channel(Channel::Email))
            .bind(fields.channel(Channel::Push))
            .bind(fields.channel(Channel::Sms))
            .bind(fields.category(Category::Marketing))
            .bind(fields.category(Category::Security))
            .bind(fields.category(Category::Product))
            .bind(fields.frequency.as_str())
            .bind(fields.quiet_hours_start)
            .bind(fields.quiet_hours_end)
            .bind(&fields.timezone)
            .fetch_optional(pool)
            .await
    }

    /// Delete the record owned by `user_id`. Returns `true` if a row was removed.
    pub async fn delete_by_user_id(pool: &PgPool, user_id: UserId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_preferences WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
