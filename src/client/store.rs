use std::sync::Arc;

use tokio::sync::watch;

use crate::client::{ClientResult, EnvironmentApi, FormOutcome, UpdateEnvironmentBody};
use crate::models::{CreateEnvironment, Environment};

/// Client-held mirror of the server's environment list.
///
/// The list is only mutated after the API confirms a write, so its contents
/// always match what a fresh `load` would return (apart from ordering of
/// newly created entries, which are appended).
pub struct EnvironmentStore {
    api: Arc<dyn EnvironmentApi>,
    environments: watch::Sender<Vec<Environment>>,
    loading: watch::Sender<bool>,
}

impl EnvironmentStore {
    pub fn new(api: Arc<dyn EnvironmentApi>) -> Self {
        let (environments, _) = watch::channel(Vec::new());
        let (loading, _) = watch::channel(false);

        Self {
            api,
            environments,
            loading,
        }
    }

    /// Current snapshot of the cached list
    pub fn environments(&self) -> Vec<Environment> {
        self.environments.borrow().clone()
    }

    pub fn get_by_id(&self, id: &str) -> Option<Environment> {
        self.environments
            .borrow()
            .iter()
            .find(|env| env.id == id)
            .cloned()
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Receiver notified whenever the cached list changes
    pub fn subscribe(&self) -> watch::Receiver<Vec<Environment>> {
        self.environments.subscribe()
    }

    /// Receiver notified whenever the loading flag changes
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Replace the cache with the server's list.
    /// On failure the previous contents stay available.
    pub async fn load(&self) -> ClientResult<()> {
        self.loading.send_replace(true);

        let result = self.api.list().await;
        match &result {
            Ok(environments) => {
                tracing::debug!(count = environments.len(), "Environments loaded");
                self.environments.send_replace(environments.clone());
            }
            Err(e) => tracing::error!(error = %e, "Error loading environments"),
        }

        self.loading.send_replace(false);
        result.map(|_| ())
    }

    /// Create on the server, then append the returned record
    pub async fn create(&self, input: &CreateEnvironment) -> ClientResult<Environment> {
        let created = self.api.create(input).await.inspect_err(|e| {
            tracing::error!(error = %e, "Error creating environment");
        })?;

        self.environments
            .send_modify(|environments| environments.push(created.clone()));
        Ok(created)
    }

    /// Update on the server, then replace the cached entry in place.
    /// If the entry has disappeared locally the cache is left alone.
    pub async fn update(&self, id: &str, body: &UpdateEnvironmentBody) -> ClientResult<Environment> {
        let updated = self.api.update(id, body).await.inspect_err(|e| {
            tracing::error!(id = %id, error = %e, "Error updating environment");
        })?;

        self.environments.send_if_modified(|environments| {
            match environments.iter_mut().find(|env| env.id == id) {
                Some(slot) => {
                    *slot = updated.clone();
                    true
                }
                None => false,
            }
        });
        Ok(updated)
    }

    /// Delete on the server, then drop the cached entry
    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.api.delete(id).await.inspect_err(|e| {
            tracing::error!(id = %id, error = %e, "Error deleting environment");
        })?;

        self.environments.send_if_modified(|environments| {
            let before = environments.len();
            environments.retain(|env| env.id != id);
            environments.len() != before
        });
        Ok(())
    }

    /// Route a submitted form to create or update
    pub async fn save(&self, outcome: FormOutcome) -> ClientResult<Environment> {
        match outcome {
            FormOutcome::Create(env) => {
                let input = CreateEnvironment {
                    name: env.name,
                    url: env.url,
                    version: env.version,
                    status: env.status,
                    notes: env.notes,
                };
                self.create(&input).await
            }
            FormOutcome::Update(env) => {
                let body = UpdateEnvironmentBody::from(&env);
                self.update(&env.id, &body).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;
    use crate::client::{ClientError, EnvironmentForm};
    use crate::models::{generate_id, EnvironmentStatus};

    /// In-memory API double. When `fail` is set every call errors.
    #[derive(Default)]
    struct FakeApi {
        rows: Mutex<Vec<Environment>>,
        fail: Mutex<bool>,
    }

    impl FakeApi {
        fn with_rows(rows: Vec<Environment>) -> Self {
            Self {
                rows: Mutex::new(rows),
                fail: Mutex::new(false),
            }
        }

        fn set_fail(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn check(&self) -> ClientResult<()> {
            if *self.fail.lock().unwrap() {
                return Err(ClientError::Api {
                    status: 500,
                    message: "Internal server error".to_string(),
                });
            }
            Ok(())
        }

        fn not_found() -> ClientError {
            ClientError::Api {
                status: 404,
                message: "Environment not found".to_string(),
            }
        }
    }

    #[async_trait]
    impl EnvironmentApi for FakeApi {
        async fn list(&self) -> ClientResult<Vec<Environment>> {
            self.check()?;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn get(&self, id: &str) -> ClientResult<Environment> {
            self.check()?;
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|env| env.id == id)
                .cloned()
                .ok_or_else(Self::not_found)
        }

        async fn create(&self, input: &CreateEnvironment) -> ClientResult<Environment> {
            self.check()?;
            let env = Environment {
                id: generate_id(),
                name: input.name.clone(),
                url: input.url.clone(),
                version: input.version.clone(),
                status: input.status,
                notes: input.notes.clone(),
                last_updated: OffsetDateTime::now_utc(),
            };
            self.rows.lock().unwrap().insert(0, env.clone());
            Ok(env)
        }

        async fn update(
            &self,
            id: &str,
            body: &UpdateEnvironmentBody,
        ) -> ClientResult<Environment> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let env = rows
                .iter_mut()
                .find(|env| env.id == id)
                .ok_or_else(Self::not_found)?;
            env.name = body.name.clone();
            env.url = body.url.clone();
            env.version = body.version.clone();
            env.status = body.status;
            env.notes = body.notes.clone();
            env.last_updated = OffsetDateTime::now_utc();
            Ok(env.clone())
        }

        async fn delete(&self, id: &str) -> ClientResult<()> {
            self.check()?;
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|env| env.id != id);
            if rows.len() == before {
                return Err(Self::not_found());
            }
            Ok(())
        }
    }

    fn env(id: &str, url: &str, status: EnvironmentStatus) -> Environment {
        Environment {
            id: id.to_string(),
            name: None,
            url: url.to_string(),
            version: None,
            status,
            notes: None,
            last_updated: OffsetDateTime::now_utc(),
        }
    }

    fn seeded_store() -> (Arc<FakeApi>, EnvironmentStore) {
        let api = Arc::new(FakeApi::with_rows(vec![
            env("1", "10.0.0.1", EnvironmentStatus::Working),
            env("2", "10.0.0.2", EnvironmentStatus::Degraded),
        ]));
        let store = EnvironmentStore::new(api.clone());
        (api, store)
    }

    #[tokio::test]
    async fn test_load_replaces_cache() {
        let (_api, store) = seeded_store();
        assert!(store.environments().is_empty());

        store.load().await.unwrap();

        let ids: Vec<String> = store.environments().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_load_failure_keeps_stale_cache() {
        let (api, store) = seeded_store();
        store.load().await.unwrap();

        api.set_fail(true);
        assert!(store.load().await.is_err());

        assert_eq!(store.environments().len(), 2);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_loading_flag_notifies_subscribers() {
        let (_api, store) = seeded_store();
        let mut loading = store.subscribe_loading();

        store.load().await.unwrap();

        assert!(loading.has_changed().unwrap());
        assert!(!*loading.borrow_and_update());
    }

    #[tokio::test]
    async fn test_create_appends_server_record() {
        let (_api, store) = seeded_store();
        store.load().await.unwrap();
        let mut rx = store.subscribe();

        let input = CreateEnvironment {
            name: Some("Staging".to_string()),
            url: "10.0.0.3".to_string(),
            version: None,
            status: EnvironmentStatus::Working,
            notes: None,
        };
        let created = store.create(&input).await.unwrap();

        let cached = store.environments();
        assert_eq!(cached.len(), 3);
        // Appended at the end even though the server put it first
        assert_eq!(cached[2], created);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().len(), 3);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let (_api, store) = seeded_store();
        store.load().await.unwrap();

        let mut edited = store.get_by_id("1").unwrap();
        edited.status = EnvironmentStatus::Down;
        edited.notes = Some("power outage".to_string());

        let updated = store
            .update("1", &UpdateEnvironmentBody::from(&edited))
            .await
            .unwrap();

        let cached = store.environments();
        assert_eq!(cached[0], updated);
        assert_eq!(cached[0].status, EnvironmentStatus::Down);
        assert_eq!(cached[1].id, "2");
    }

    #[tokio::test]
    async fn test_update_missing_locally_is_noop() {
        let (api, store) = seeded_store();
        store.load().await.unwrap();

        // Created on the server behind the cache's back
        let stranger = env("9", "10.0.0.9", EnvironmentStatus::Working);
        api.rows.lock().unwrap().push(stranger.clone());
        let mut rx = store.subscribe();

        store
            .update("9", &UpdateEnvironmentBody::from(&stranger))
            .await
            .unwrap();

        assert_eq!(store.environments().len(), 2);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let (_api, store) = seeded_store();
        store.load().await.unwrap();

        store.delete("1").await.unwrap();

        let ids: Vec<String> = store.environments().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["2"]);
        assert!(store.get_by_id("1").is_none());
    }

    #[tokio::test]
    async fn test_failed_mutations_leave_cache_untouched() {
        let (api, store) = seeded_store();
        store.load().await.unwrap();
        let before = store.environments();

        api.set_fail(true);
        let input = CreateEnvironment {
            name: None,
            url: "10.0.0.3".to_string(),
            version: None,
            status: EnvironmentStatus::Working,
            notes: None,
        };
        assert!(store.create(&input).await.is_err());
        assert!(store
            .update("1", &UpdateEnvironmentBody::from(&before[0]))
            .await
            .is_err());
        assert!(store.delete("2").await.is_err());

        assert_eq!(store.environments(), before);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_reports_not_found() {
        let (_api, store) = seeded_store();
        store.load().await.unwrap();

        let err = store.delete("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(store.environments().len(), 2);
    }

    #[tokio::test]
    async fn test_save_routes_form_outcomes() {
        let (_api, store) = seeded_store();
        store.load().await.unwrap();

        let mut form = EnvironmentForm::new();
        form.url = " 10.0.0.7 ".to_string();
        let created = store.save(form.submit().unwrap()).await.unwrap();
        assert_eq!(created.url, "10.0.0.7");
        assert_eq!(store.environments().len(), 3);

        let mut form = EnvironmentForm::edit(&created);
        form.status = EnvironmentStatus::Degraded;
        let updated = store.save(form.submit().unwrap()).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(
            store.get_by_id(&created.id).unwrap().status,
            EnvironmentStatus::Degraded
        );
        assert_eq!(store.environments().len(), 3);
    }
}
