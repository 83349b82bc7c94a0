use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::{
    models::{UpdateUserRequest, User},
    services::UserStore,
    utils::error::AppError,
};

/// Mirrors `$set`: absent fields keep their stored value
fn apply_changes(user: &mut User, changes: &UpdateUserRequest) {
    if let Some(name) = &changes.name {
        user.name = name.clone();
    }
    if let Some(email) = &changes.email {
        user.email = Some(email.clone());
    }
    if let Some(age) = changes.age {
        user.age = Some(age);
    }
}

/// In-process `UserStore` used by the handler tests
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.clone())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        user.id = Some(ObjectId::new());
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: &ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        let mut users = self.users.write().await;
        Ok(users.iter_mut().find(|u| u.id.as_ref() == Some(id)).map(|user| {
            apply_changes(user, changes);
            user.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id.as_ref() != Some(id));
        Ok(users.len() < before)
    }
}

/// Store whose every call fails, as an unreachable database would
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        Err(AppError::DatabaseError("connection refused".into()))
    }

    async fn find_by_id(&self, _id: &ObjectId) -> Result<Option<User>, AppError> {
        Err(AppError::DatabaseError("connection refused".into()))
    }

    async fn insert(&self, _user: User) -> Result<User, AppError> {
        Err(AppError::DatabaseError("connection refused".into()))
    }

    async fn update(&self, _id: &ObjectId, _changes: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        Err(AppError::DatabaseError("connection refused".into()))
    }

    async fn delete(&self, _id: &ObjectId) -> Result<bool, AppError> {
        Err(AppError::DatabaseError("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_partial_update_keeps_untouched_fields() {
        let store = MemoryUserStore::default();
        let user = store
            .insert(User {
                id: None,
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
                age: Some(36),
            })
            .await
            .unwrap();
        let id = user.id.unwrap();

        let changes = UpdateUserRequest {
            name: Some("Ada Lovelace".into()),
            ..Default::default()
        };
        let updated = store.update(&id, &changes).await.unwrap().unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.email.as_deref(), Some("ada@example.com"));
        assert_eq!(updated.age, Some(36));
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let store = MemoryUserStore::default();
        let id = ObjectId::new();

        assert_eq!(store.find_by_id(&id).await.unwrap(), None);
        assert_eq!(store.update(&id, &UpdateUserRequest::default()).await.unwrap(), None);
        assert!(!store.delete(&id).await.unwrap());
    }
}
