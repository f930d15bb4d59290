use env_monitor::entity::environment::ActiveModel;
use env_monitor::models::{CreateEnvironment, Environment, EnvironmentStatus};
use env_monitor::repositories::{to_millis, EnvironmentRepository};
use env_monitor::state::AppState;
use sea_orm::{ActiveModelTrait, Set};
use time::OffsetDateTime;

/// Factory for creating test data
pub struct Factory<'a> {
    state: &'a AppState,
}

#[allow(dead_code)]
impl<'a> Factory<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Create a test environment with every field filled in
    pub async fn create_environment(&self) -> Environment {
        let input = CreateEnvironment {
            name: Some("Production API".to_string()),
            url: "126.0.202.9".to_string(),
            version: Some("v2.3.1".to_string()),
            status: EnvironmentStatus::Working,
            notes: Some("Deployed from main".to_string()),
        };

        EnvironmentRepository::create(&self.state.db, &input)
            .await
            .unwrap()
    }

    /// Create a bare test environment with the given url and status
    pub async fn create_environment_with(
        &self,
        url: &str,
        status: EnvironmentStatus,
    ) -> Environment {
        let input = CreateEnvironment {
            name: None,
            url: url.to_string(),
            version: None,
            status,
            notes: None,
        };

        EnvironmentRepository::create(&self.state.db, &input)
            .await
            .unwrap()
    }

    /// Insert a row directly with a fixed id and `lastUpdated`
    pub async fn insert_environment_at(&self, id: &str, last_updated: OffsetDateTime) {
        let model = ActiveModel {
            id: Set(id.to_string()),
            name: Set(None),
            url: Set(format!("{}.example.com", id)),
            version: Set(None),
            status: Set(EnvironmentStatus::Working.as_str().to_string()),
            notes: Set(None),
            last_updated: Set(to_millis(last_updated)),
        };

        model.insert(&self.state.db).await.unwrap();
    }
}
