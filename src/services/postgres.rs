use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::config::{DatabaseSettings, GymSettings};
use crate::core::clock::day_window;
use crate::core::distance::{calculate_bounding_box, distance_between_coordinates};
use crate::models::{CheckIn, Coordinate, Gym, NewCheckIn, NewGym};
use crate::services::{page_offset, CheckInStore, GymStore, StoreError, DEFAULT_PAGE_SIZE};

/// Shared PostgreSQL connection pool
///
/// Both stores are built from the same pool; migrations run once on connect.
#[derive(Clone)]
pub struct PostgresPool {
    pool: PgPool,
}

impl PostgresPool {
    /// Connect using the database settings and run migrations
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, StoreError> {
        tracing::info!(
            "Connecting to PostgreSQL (max: {}, min: {} connections)",
            settings.max_connections,
            settings.min_connections
        );

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(settings.idle_timeout_secs))
            .test_before_acquire(true)
            .connect(&settings.url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn gyms(&self, page_size: u32) -> PostgresGymStore {
        PostgresGymStore {
            pool: self.pool.clone(),
            page_size: page_size.max(1),
        }
    }

    pub fn check_ins(&self, page_size: u32) -> PostgresCheckInStore {
        PostgresCheckInStore {
            pool: self.pool.clone(),
            page_size: page_size.max(1),
        }
    }

    /// Both stores, paged by `gyms.page_size`
    pub fn stores(&self, settings: &GymSettings) -> (PostgresGymStore, PostgresCheckInStore) {
        (self.gyms(settings.page_size), self.check_ins(settings.page_size))
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

/// Gym store backed by the `gyms` table
#[derive(Clone)]
pub struct PostgresGymStore {
    pool: PgPool,
    page_size: u32,
}

impl PostgresGymStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, page_size: DEFAULT_PAGE_SIZE }
    }
}

fn gym_from_row(row: &PgRow) -> Result<Gym, StoreError> {
    Ok(Gym {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        phone: row.try_get("phone")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
    })
}

#[async_trait]
impl GymStore for PostgresGymStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Gym>, StoreError> {
        let query = r#"
            SELECT id, title, description, phone, latitude, longitude
            FROM gyms
            WHERE id = $1
        "#;

        let row = sqlx::query(query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(gym_from_row).transpose()
    }

    async fn create(&self, data: NewGym) -> Result<Gym, StoreError> {
        let query = r#"
            INSERT INTO gyms (id, title, description, phone, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, description, phone, latitude, longitude
        "#;

        let id = data.id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let result = sqlx::query(query)
            .bind(&id)
            .bind(&data.title)
            .bind(&data.description)
            .bind(&data.phone)
            .bind(data.latitude)
            .bind(data.longitude)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => {
                tracing::debug!("Inserted gym {}", id);
                gym_from_row(&row)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(StoreError::DuplicateGym(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn search_many(&self, query: &str, page: u32) -> Result<Vec<Gym>, StoreError> {
        let sql = r#"
            SELECT id, title, description, phone, latitude, longitude
            FROM gyms
            WHERE title ILIKE '%' || $1 || '%'
            ORDER BY title, id
            LIMIT $2 OFFSET $3
        "#;

        let rows = sqlx::query(sql)
            .bind(query)
            .bind(self.page_size as i64)
            .bind(page_offset(page, self.page_size) as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(gym_from_row).collect()
    }

    async fn find_many_nearby(&self, center: Coordinate, radius_km: f64) -> Result<Vec<Gym>, StoreError> {
        // The bounding box narrows the scan via the location index; the exact
        // distance check runs in Rust with the same calculator as check-ins.
        let bbox = calculate_bounding_box(center, radius_km);
        let query = r#"
            SELECT id, title, description, phone, latitude, longitude
            FROM gyms
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
        "#;

        let rows = sqlx::query(query)
            .bind(bbox.min_lat)
            .bind(bbox.max_lat)
            .bind(bbox.min_lon)
            .bind(bbox.max_lon)
            .fetch_all(&self.pool)
            .await?;

        let mut gyms = Vec::with_capacity(rows.len());
        for row in &rows {
            let gym = gym_from_row(row)?;
            if distance_between_coordinates(center, gym.coordinate()) <= radius_km {
                gyms.push(gym);
            }
        }

        tracing::debug!("{} gyms within {} km of ({}, {})", gyms.len(), radius_km, center.latitude, center.longitude);
        Ok(gyms)
    }
}

/// Check-in store backed by the `check_ins` table
///
/// The `(user_id, created_day)` unique constraint enforces the daily limit
/// even when two requests pass the read check concurrently.
#[derive(Clone)]
pub struct PostgresCheckInStore {
    pool: PgPool,
    page_size: u32,
}

impl PostgresCheckInStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, page_size: DEFAULT_PAGE_SIZE }
    }
}

fn check_in_from_row(row: &PgRow) -> Result<CheckIn, StoreError> {
    Ok(CheckIn {
        id: row.try_get("id")?,
        gym_id: row.try_get("gym_id")?,
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at")?,
        validated_at: row.try_get("validated_at")?,
    })
}

#[async_trait]
impl CheckInStore for PostgresCheckInStore {
    async fn create(&self, data: NewCheckIn) -> Result<CheckIn, StoreError> {
        let query = r#"
            INSERT INTO check_ins (id, user_id, gym_id, created_at, created_day)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, gym_id, created_at, validated_at
        "#;

        let day = data.created_at.date_naive();
        let result = sqlx::query(query)
            .bind(Uuid::new_v4().to_string())
            .bind(&data.user_id)
            .bind(&data.gym_id)
            .bind(data.created_at)
            .bind(day)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => check_in_from_row(&row),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                tracing::debug!("Unique constraint rejected check-in for {} on {}", data.user_id, day);
                Err(StoreError::DuplicateCheckIn { user_id: data.user_id, day })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_user_id_on_date(
        &self,
        user_id: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<CheckIn>, StoreError> {
        let query = r#"
            SELECT id, user_id, gym_id, created_at, validated_at
            FROM check_ins
            WHERE user_id = $1 AND created_at >= $2 AND created_at < $3
            LIMIT 1
        "#;

        let (start_of_day, next_day) = day_window(date);
        let row = sqlx::query(query)
            .bind(user_id)
            .bind(start_of_day)
            .bind(next_day)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(check_in_from_row).transpose()
    }

    async fn find_many_by_user_id(&self, user_id: &str, page: u32) -> Result<Vec<CheckIn>, StoreError> {
        let query = r#"
            SELECT id, user_id, gym_id, created_at, validated_at
            FROM check_ins
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
        "#;

        let rows = sqlx::query(query)
            .bind(user_id)
            .bind(self.page_size as i64)
            .bind(page_offset(page, self.page_size) as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(check_in_from_row).collect()
    }

    async fn count_by_user_id(&self, user_id: &str) -> Result<u64, StoreError> {
        let query = r#"
            SELECT COUNT(*) AS total
            FROM check_ins
            WHERE user_id = $1
        "#;

        let row = sqlx::query(query).bind(user_id).fetch_one(&self.pool).await?;
        let total: i64 = row.try_get("total")?;

        u64::try_from(total).map_err(|_| StoreError::Corrupt(format!("negative check-in count {total}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use chrono::TimeZone;

    async fn connect() -> PostgresPool {
        let settings = Settings::default();
        PostgresPool::connect(&settings.database)
            .await
            .expect("Failed to connect to PostgreSQL")
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_unique_constraint_rejects_same_day() {
        let pool = connect().await;
        let gyms = pool.gyms(DEFAULT_PAGE_SIZE);
        let check_ins = pool.check_ins(DEFAULT_PAGE_SIZE);

        let gym = gyms
            .create(NewGym {
                title: "Postgres Gym".to_string(),
                latitude: -22.782011,
                longitude: -47.2826153,
                ..Default::default()
            })
            .await
            .unwrap();

        let user_id = Uuid::new_v4().to_string();
        let at = Utc.with_ymd_and_hms(2022, 1, 20, 8, 0, 0).unwrap();
        let data = NewCheckIn { user_id: user_id.clone(), gym_id: gym.id.clone(), created_at: at };

        check_ins.create(data.clone()).await.unwrap();
        let err = check_ins.create(data).await.unwrap_err();

        assert!(matches!(err, StoreError::DuplicateCheckIn { .. }));
        assert_eq!(check_ins.count_by_user_id(&user_id).await.unwrap(), 1);
    }

    #[tokio::test]
    #[ignore = "Requires PostgreSQL"]
    async fn test_health_check() {
        let pool = connect().await;
        assert!(pool.health_check().await.unwrap());
    }
}
