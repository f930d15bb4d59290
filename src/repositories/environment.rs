use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryOrder, Set};
use time::OffsetDateTime;

use crate::entity::environment::{self, ActiveModel, Column, Entity as EnvironmentEntity};
use crate::error::{AppError, AppResult};
use crate::models::{
    generate_id, normalize_optional, CreateEnvironment, Environment, EnvironmentStatus,
    UpdateEnvironment,
};
use crate::repositories::Repository;

/// Environment repository for database operations
pub struct EnvironmentRepository;

#[async_trait]
impl Repository<Environment> for EnvironmentRepository {
    async fn find_by_id(db: &DatabaseConnection, id: &str) -> AppResult<Environment> {
        let model = EnvironmentEntity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Environment".to_string()))?;

        model.try_into()
    }

    async fn delete(db: &DatabaseConnection, id: &str) -> AppResult<bool> {
        let result = EnvironmentEntity::delete_by_id(id.to_string())
            .exec(db)
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn list(db: &DatabaseConnection) -> AppResult<Vec<Environment>> {
        let models = EnvironmentEntity::find()
            .order_by_desc(Column::LastUpdated)
            .all(db)
            .await?;

        models.into_iter().map(Environment::try_from).collect()
    }

    async fn count(db: &DatabaseConnection) -> AppResult<u64> {
        let count = EnvironmentEntity::find().count(db).await?;
        Ok(count)
    }
}

impl EnvironmentRepository {
    /// Create a new environment. The id and timestamp are always assigned here.
    pub async fn create(
        db: &DatabaseConnection,
        input: &CreateEnvironment,
    ) -> AppResult<Environment> {
        let model = ActiveModel {
            id: Set(generate_id()),
            name: Set(normalize_optional(input.name.clone())),
            url: Set(input.url.clone()),
            version: Set(normalize_optional(input.version.clone())),
            status: Set(input.status.as_str().to_string()),
            notes: Set(normalize_optional(input.notes.clone())),
            last_updated: Set(now_millis()),
        };

        let result = model.insert(db).await?;
        tracing::debug!(id = %result.id, "Environment created");
        result.try_into()
    }

    /// Merge `input` into an existing environment.
    /// Fields absent from the patch keep their stored value.
    pub async fn update(
        db: &DatabaseConnection,
        id: &str,
        input: &UpdateEnvironment,
    ) -> AppResult<Environment> {
        let model = EnvironmentEntity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| AppError::NotFound("Environment".to_string()))?;

        let previous = model.last_updated;
        let mut active: ActiveModel = model.into();

        if let Some(name) = &input.name {
            active.name = Set(normalize_optional(name.clone()));
        }
        if let Some(url) = &input.url {
            active.url = Set(url.clone());
        }
        if let Some(version) = &input.version {
            active.version = Set(normalize_optional(version.clone()));
        }
        if let Some(status) = input.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(notes) = &input.notes {
            active.notes = Set(normalize_optional(notes.clone()));
        }
        active.last_updated = Set(next_timestamp(previous));

        let result = active.update(db).await?;
        result.try_into()
    }

    /// Insert the demo environments when the table is empty.
    /// Returns the number of rows inserted.
    pub async fn seed_if_empty(db: &DatabaseConnection) -> AppResult<usize> {
        if Self::count(db).await? > 0 {
            return Ok(0);
        }

        let now = now_millis();
        let seeds = [
            (
                "1",
                Some("Production API"),
                "126.0.202.9",
                Some("v2.3.1"),
                EnvironmentStatus::Working,
                None,
            ),
            (
                "2",
                None,
                "148.88.88.87",
                Some("v2.4.0-rc1"),
                EnvironmentStatus::Degraded,
                Some("Database connection pool exhausted - investigating high load"),
            ),
            (
                "3",
                None,
                "192.168.1.100",
                None,
                EnvironmentStatus::Working,
                Some("Recently updated to latest build"),
            ),
            (
                "4",
                Some("QA Environment"),
                "https://qa.example.com",
                Some("v2.3.1"),
                EnvironmentStatus::Down,
                Some("Server maintenance in progress - Expected downtime: 2 hours"),
            ),
        ];

        for (id, name, url, version, status, notes) in seeds.iter() {
            let model = ActiveModel {
                id: Set(id.to_string()),
                name: Set(name.map(str::to_string)),
                url: Set(url.to_string()),
                version: Set(version.map(str::to_string)),
                status: Set(status.as_str().to_string()),
                notes: Set(notes.map(str::to_string)),
                last_updated: Set(now),
            };
            model.insert(db).await?;
        }

        tracing::info!(count = seeds.len(), "Database initialized with demo environments");
        Ok(seeds.len())
    }
}

const NANOS_PER_MILLI: i128 = 1_000_000;

/// Current time in unix milliseconds, rounded up so it is never before the call
fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    (nanos + NANOS_PER_MILLI - 1).div_euclid(NANOS_PER_MILLI) as i64
}

/// Timestamp for the next mutation of a record last touched at `previous`.
/// Always strictly later than `previous`, even if the clock has not advanced.
pub(crate) fn next_timestamp(previous: i64) -> i64 {
    now_millis().max(previous + 1)
}

pub fn to_millis(ts: OffsetDateTime) -> i64 {
    ts.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI) as i64
}

pub fn from_millis(millis: i64) -> AppResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(millis as i128 * NANOS_PER_MILLI)
        .map_err(|e| AppError::Database(format!("timestamp {}: {}", millis, e)))
}

// Conversion from SeaORM model to our domain model
impl TryFrom<environment::Model> for Environment {
    type Error = AppError;

    fn try_from(m: environment::Model) -> Result<Self, Self::Error> {
        let status = m
            .status
            .parse::<EnvironmentStatus>()
            .map_err(|e| AppError::Database(format!("environment {}: {}", m.id, e)))?;

        Ok(Self {
            id: m.id,
            name: m.name,
            url: m.url,
            version: m.version,
            status,
            notes: m.notes,
            last_updated: from_millis(m.last_updated)?,
        })
    }
}
