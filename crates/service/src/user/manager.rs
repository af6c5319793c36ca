use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use super::adapter::UserAdapter;
use super::domain::User;
use super::password::PasswordHasher;
use super::validator::{RequestValidator, UserPayload, UserRequestValidator};
use crate::errors::{ServiceError, ValidationErrors};

/// The only writer of persisted users.
///
/// Holds the active adapter behind an [`ArcSwap`]; every operation works on
/// one snapshot of it, so [`UserManager::switch_adapter`] never splits a call
/// across two backends. Email uniqueness is checked here, per backend.
pub struct UserManager {
    adapter: ArcSwap<Arc<dyn UserAdapter>>,
    hasher: Arc<dyn PasswordHasher>,
    validator: UserRequestValidator,
}

impl UserManager {
    pub fn new(adapter: Arc<dyn UserAdapter>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { adapter: ArcSwap::from_pointee(adapter), hasher, validator: UserRequestValidator }
    }

    /// Replace the active backend. In-flight calls finish on the old one.
    pub fn switch_adapter(&self, adapter: Arc<dyn UserAdapter>) {
        info!(backend = adapter.backend(), "user storage switched");
        self.adapter.store(Arc::new(adapter));
    }

    pub fn backend(&self) -> &'static str {
        self.adapter.load().backend()
    }

    fn active(&self) -> Arc<dyn UserAdapter> {
        Arc::clone(&**self.adapter.load())
    }

    #[instrument(skip(self))]
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, ServiceError> {
        Ok(self.active().find_by_id(id).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_users(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.active().find_all().await?)
    }

    /// Validate `body`, enforce email uniqueness, hash the password and persist.
    #[instrument(skip(self, body))]
    pub async fn create_user(&self, body: &Map<String, Value>) -> Result<User, ServiceError> {
        let payload = self.validator.validate(body)?;
        let adapter = self.active();

        if adapter.find_by_email(&payload.email).await?.is_some() {
            debug!(email = %payload.email, "email already taken");
            return Err(email_taken(&payload.email).into());
        }

        let mut user = User::new();
        self.apply(&mut user, &payload)?;
        adapter.create(&user).await?;

        info!(user_id = %user.id(), backend = adapter.backend(), "user_created");
        Ok(user)
    }

    /// Overwrite all four fields of `existing` and stamp `updated`.
    ///
    /// The password is re-hashed every time. `existing` is left untouched; the
    /// stored snapshot is returned.
    #[instrument(skip(self, body, existing), fields(user_id = %existing.id()))]
    pub async fn update_user(&self, body: &Map<String, Value>, existing: &User) -> Result<User, ServiceError> {
        let payload = self.validator.validate(body)?;
        let adapter = self.active();

        if let Some(holder) = adapter.find_by_email(&payload.email).await? {
            if holder.id() != existing.id() {
                debug!(email = %payload.email, "email already taken");
                return Err(email_taken(&payload.email).into());
            }
        }

        let mut user = existing.clone();
        self.apply(&mut user, &payload)?;
        user.touch();
        adapter.update(&user).await?;

        info!(user_id = %user.id(), backend = adapter.backend(), "user_updated");
        Ok(user)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id()))]
    pub async fn delete_user(&self, user: &User) -> Result<(), ServiceError> {
        let adapter = self.active();
        adapter.delete(user).await?;
        info!(user_id = %user.id(), backend = adapter.backend(), "user_deleted");
        Ok(())
    }

    fn apply(&self, user: &mut User, payload: &UserPayload) -> Result<(), ServiceError> {
        user.set_first_name(payload.first_name.as_str());
        user.set_last_name(payload.last_name.as_str());
        user.set_email(payload.email.as_str());
        user.set_password_hash(self.hasher.hash(&payload.password)?);
        Ok(())
    }
}

fn email_taken(email: &str) -> ValidationErrors {
    ValidationErrors::single(format!("A user with email address '{email}' already exists."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use crate::user::adapter::{JsonUserAdapter, SeaOrmUserAdapter};
    use serde_json::json;

    fn john() -> Map<String, Value> {
        test_support::body(json!({
            "firstName": "John",
            "lastName": "Doe",
            "email": "john.doe@example.com",
            "password": "Password123",
        }))
    }

    fn max() -> Map<String, Value> {
        test_support::body(json!({
            "firstName": "Max",
            "lastName": "Mustermann",
            "email": "max.mustermann@example.com",
            "password": "Password123",
        }))
    }

    fn with(mut body: Map<String, Value>, key: &str, value: &str) -> Map<String, Value> {
        body.insert(key.into(), json!(value));
        body
    }

    async fn managers() -> Result<Vec<UserManager>, anyhow::Error> {
        let db = test_support::sqlite_db().await?;
        Ok(vec![
            UserManager::new(Arc::new(SeaOrmUserAdapter::new(db)), test_support::fast_hasher()),
            UserManager::new(Arc::new(JsonUserAdapter::new(test_support::temp_json_path())), test_support::fast_hasher()),
        ])
    }

    fn validation_messages(err: ServiceError) -> Vec<String> {
        match err {
            ServiceError::Validation(errors) => errors.messages().into_iter().map(str::to_owned).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_returns_user_with_hashed_password() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let user = m.create_user(&john()).await?;
            assert_eq!(user.first_name(), "John");
            assert_eq!(user.last_name(), "Doe");
            assert_eq!(user.email(), "john.doe@example.com");
            assert!(!user.id().is_empty());
            assert!(user.updated().is_none());
            assert_ne!(user.password_hash(), "Password123");

            let stored = m.find_user(user.id()).await?.expect("stored");
            assert_eq!(stored, user);
            assert_eq!(m.find_user(user.id()).await?, Some(stored));
        }
        Ok(())
    }

    #[tokio::test]
    async fn invalid_body_persists_nothing() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let mut body = with(john(), "password", "short");
            body.insert("test".into(), json!("test"));
            let messages = validation_messages(m.create_user(&body).await.unwrap_err());
            assert_eq!(
                messages,
                [
                    "The 'password' field value is too short. It should have 10 characters or more.",
                    "The field 'test' was not expected.",
                ]
            );
            assert!(m.find_users().await?.is_empty(), "{} stored an invalid user", m.backend());
        }
        Ok(())
    }

    #[tokio::test]
    async fn invalid_update_persists_nothing() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let original = m.create_user(&john()).await?;

            let mut body = with(john(), "password", "short");
            body.insert("extra".into(), json!("x"));
            let messages = validation_messages(m.update_user(&body, &original).await.unwrap_err());
            assert_eq!(
                messages,
                [
                    "The 'password' field value is too short. It should have 10 characters or more.",
                    "The field 'extra' was not expected.",
                ]
            );
            assert_eq!(m.find_user(original.id()).await?, Some(original), "{} changed the stored user", m.backend());
        }
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_on_create_is_rejected()-> Result<(), anyhow::Error> {
        for m in managers().await? {
            m.create_user(&john()).await?;
            let messages = validation_messages(m.create_user(&with(john(), "firstName", "Jane")).await.unwrap_err());
            assert_eq!(messages, ["A user with email address 'john.doe@example.com' already exists."]);
            assert_eq!(m.find_users().await?.len(), 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_to_another_users_email_is_rejected() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            m.create_user(&john()).await?;
            let max_user = m.create_user(&max()).await?;

            let body = with(max(), "email", "john.doe@example.com");
            let messages = validation_messages(m.update_user(&body, &max_user).await.unwrap_err());
            assert_eq!(messages, ["A user with email address 'john.doe@example.com' already exists."]);
            assert_eq!(m.find_user(max_user.id()).await?, Some(max_user));
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_keeping_own_email_succeeds_and_rehashes() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let before = m.create_user(&john()).await?;
            let after = m.update_user(&with(john(), "lastName", "Smith"), &before).await?;

            assert_eq!(after.id(), before.id());
            assert_eq!(after.created(), before.created());
            assert_eq!(after.last_name(), "Smith");
            assert!(after.updated().is_some());
            assert_ne!(after.password_hash(), before.password_hash());
            assert!(before.updated().is_none());

            assert_eq!(m.find_user(before.id()).await?, Some(after));
        }
        Ok(())
    }

    #[tokio::test]
    async fn update_can_change_email() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let user = m.create_user(&john()).await?;
            m.update_user(&with(john(), "email", "new-john.doe@example.com"), &user).await?;

            let stored = m.find_user(user.id()).await?.expect("stored");
            assert_eq!(stored.email(), "new-john.doe@example.com");
            assert!(m.create_user(&john()).await.is_ok(), "old email is free again");
        }
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_user() -> Result<(), anyhow::Error> {
        for m in managers().await? {
            let a = m.create_user(&john()).await?;
            m.create_user(&max()).await?;

            m.delete_user(&a).await?;
            assert_eq!(m.find_users().await?.len(), 1);
            assert_eq!(m.find_user(a.id()).await?, None);

            m.delete_user(&a).await?;
            assert_eq!(m.find_users().await?.len(), 1);
        }
        Ok(())
    }

    #[tokio::test]
    async fn switching_backends_keeps_stores_separate() -> Result<(), anyhow::Error> {
        let json = Arc::new(JsonUserAdapter::new(test_support::temp_json_path()));
        let db = Arc::new(SeaOrmUserAdapter::new(test_support::sqlite_db().await?));
        let m = UserManager::new(json, test_support::fast_hasher());

        let in_json = m.create_user(&john()).await?;
        m.switch_adapter(db);
        assert_eq!(m.backend(), "database");
        assert_eq!(m.find_user(in_json.id()).await?, None);

        // uniqueness is scoped to the active backend
        m.create_user(&john()).await?;
        assert_eq!(m.find_users().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn storage_failure_is_not_a_validation_error() -> Result<(), anyhow::Error> {
        let missing_dir = std::env::temp_dir().join(format!("users_missing_{}", uuid::Uuid::new_v4()));
        let m = UserManager::new(Arc::new(JsonUserAdapter::new(missing_dir.join("users.json"))), test_support::fast_hasher());
        let err = m.create_user(&john()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Storage(_)));
        Ok(())
    }
}
