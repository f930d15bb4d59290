pub mod environment;

pub use environment::{from_millis, to_millis, EnvironmentRepository};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::error::AppResult;

/// Base repository trait for common CRUD operations
#[async_trait]
pub trait Repository<T>
where
    T: Send + Sync,
{
    /// Find entity by ID
    async fn find_by_id(db: &DatabaseConnection, id: &str) -> AppResult<T>;

    /// Delete entity by ID, returning whether a row was removed
    async fn delete(db: &DatabaseConnection, id: &str) -> AppResult<bool>;

    /// List all entities
    async fn list(db: &DatabaseConnection) -> AppResult<Vec<T>>;

    /// Count total entities
    async fn count(db: &DatabaseConnection) -> AppResult<u64>;
}
