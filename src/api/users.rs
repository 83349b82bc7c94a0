use actix_web::{web, HttpResponse};
use mongodb::bson::oid::ObjectId;

use crate::{
    models::{CreateUserRequest, UpdateUserRequest, User, UserResponse},
    services::UserStore,
    utils::error::AppError,
};

const USER_NOT_FOUND: &str = "User not found";

/// A string that is not an ObjectId cannot name a stored user
fn parse_user_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| {
        log::warn!("⚠️ Malformed user id: {}", raw);
        AppError::NotFound(USER_NOT_FOUND.to_string())
    })
}

/// GET /api/users - Lists every user
pub async fn list_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /users");

    let users: Vec<UserResponse> = store
        .list()
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    log::info!("✅ Listed {} users", users.len());
    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/{id} - Fetches one user
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔍 GET /users/{}", path);
    let id = parse_user_id(&path)?;

    match store.find_by_id(&id).await? {
        Some(user) => Ok(HttpResponse::Ok().json(UserResponse::from(user))),
        None => Err(AppError::NotFound(USER_NOT_FOUND.to_string())),
    }
}

/// POST /api/users - Creates a user
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /users - name: {}", body.name);

    let created = store.insert(User::from(body.into_inner())).await?;
    let response = UserResponse::from(created);

    log::info!("✅ User created: {}", response.id);
    Ok(HttpResponse::Created().json(response))
}

/// PUT /api/users/{id} - Updates the given fields
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /users/{}", path);
    let id = parse_user_id(&path)?;

    match store.update(&id, &body).await? {
        Some(user) => {
            log::info!("✅ User updated: {}", id);
            Ok(HttpResponse::Ok().json(UserResponse::from(user)))
        }
        None => Err(AppError::NotFound(USER_NOT_FOUND.to_string())),
    }
}

/// DELETE /api/users/{id} - Removes a user
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🗑️  DELETE /users/{}", path);
    let id = parse_user_id(&path)?;

    if !store.delete(&id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND.to_string()));
    }

    log::info!("✅ User deleted: {}", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "User deleted successfully",
        "id": id.to_hex()
    })))
}
