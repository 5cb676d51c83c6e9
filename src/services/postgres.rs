use crate::config::DatabaseSettings;
use crate::core::filters::{ProfileFilter, SortOrder};
use crate::models::{NewProfile, Profile};
use crate::services::StoreError;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;

const PROFILE_COLUMNS: &str = "id, username, age, gender, location, willing_to_relocate, \
    wants_kids, age_range_min, age_range_max, marital_status, marriage_timeline, bio, created_at";

/// PostgreSQL-backed profile table
///
/// Profiles are only ever inserted and read; there is no update or delete
/// path.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect and run the embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub async fn from_settings(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {} connections)",
            settings.max_connections
        );

        Self::new(
            &settings.url,
            settings.max_connections,
            settings.min_connections,
            Duration::from_secs(settings.acquire_timeout_secs),
            Duration::from_secs(settings.idle_timeout_secs),
        )
        .await
    }

    pub async fn create_profile(&self, profile: NewProfile) -> Result<Profile, StoreError> {
        let query = format!(
            r#"
            INSERT INTO profiles (
                username, age, gender, location, willing_to_relocate, wants_kids,
                age_range_min, age_range_max, marital_status, marriage_timeline, bio
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        );

        let created = sqlx::query_as::<_, Profile>(&query)
            .bind(&profile.username)
            .bind(profile.age)
            .bind(&profile.gender)
            .bind(&profile.location)
            .bind(profile.willing_to_relocate)
            .bind(profile.wants_kids)
            .bind(profile.age_range_min)
            .bind(profile.age_range_max)
            .bind(&profile.marital_status)
            .bind(&profile.marriage_timeline)
            .bind(&profile.bio)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Inserted profile {} ({})", created.id, created.username);

        Ok(created)
    }

    /// All profiles, newest first
    pub async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        self.filtered_profiles(&ProfileFilter::default(), SortOrder::Newest)
            .await
    }

    pub async fn filtered_profiles(
        &self,
        filter: &ProfileFilter,
        sort: SortOrder,
    ) -> Result<Vec<Profile>, StoreError> {
        let mut qb = listing_query(filter, sort);

        tracing::debug!("Listing query: {}", qb.sql());

        let profiles = qb
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;

        Ok(profiles)
    }

    pub async fn get_profile(&self, id: i64) -> Result<Option<Profile>, StoreError> {
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }

    pub async fn count_profiles(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// `SELECT` with the filter pushed into `WHERE` and the sort into `ORDER BY`
pub fn listing_query(filter: &ProfileFilter, sort: SortOrder) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {} FROM profiles WHERE TRUE",
        PROFILE_COLUMNS
    ));
    filter.push_sql(&mut qb);
    qb.push(" ORDER BY ").push(sort.sql());
    qb
}
