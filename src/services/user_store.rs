// ==================== USER STORE ====================
// One method per store operation. Handlers receive the store as
// `web::Data<dyn UserStore>` so tests can swap the MongoDB backend.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use crate::{
    database::MongoDB,
    models::{UpdateUserRequest, User},
    utils::error::AppError,
};

const COLLECTION: &str = "users";

#[async_trait]
pub trait UserStore: Send + Sync {
    /// All users in store order
    async fn list(&self) -> Result<Vec<User>, AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    /// Inserts a user and returns it with the assigned id
    async fn insert(&self, user: User) -> Result<User, AppError>;

    /// Applies the update and returns the stored result, `None` when the id is unknown
    async fn update(&self, id: &ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, AppError>;

    /// Returns false when nothing matched
    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError>;
}

pub struct MongoUserStore {
    users: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            users: db.collection::<User>(COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn list(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.users.find(doc! {}).sort(doc! { "_id": 1 }).await?;
        let users: Vec<User> = cursor.try_collect().await?;
        log::debug!("📋 Loaded {} users", users.len());
        Ok(users)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        Ok(self.users.find_one(doc! { "_id": *id }).await?)
    }

    async fn insert(&self, mut user: User) -> Result<User, AppError> {
        let result = self.users.insert_one(&user).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("inserted id is not an ObjectId".to_string()))?;
        user.id = Some(id);
        Ok(user)
    }

    async fn update(&self, id: &ObjectId, changes: &UpdateUserRequest) -> Result<Option<User>, AppError> {
        // `$set` with an empty document is rejected by the server
        if changes.is_empty() {
            return self.find_by_id(id).await;
        }

        let updated = self
            .users
            .find_one_and_update(doc! { "_id": *id }, doc! { "$set": changes.to_set_document() })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn delete(&self, id: &ObjectId) -> Result<bool, AppError> {
        let result = self.users.delete_one(doc! { "_id": *id }).await?;
        Ok(result.deleted_count > 0)
    }
}
