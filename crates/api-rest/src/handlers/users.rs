use crate::error::{ApiError, ApiJson};
use crate::AppState;
use api_shared::{CreateUserReq, MessageRes, UpdateUserReq};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use his_core::{User, UserPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct UsersRes {
    pub users: Vec<User>,
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = UsersRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// List every user.
#[axum::debug_handler]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersRes>, ApiError> {
    let during = ApiError::during("loading users");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let users = uow.users().list().await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(UsersRes { users }))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "User created", body = MessageRes),
        (status = 400, description = "Invalid input, unknown country or duplicate email", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Register a user in an existing country.
#[axum::debug_handler]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateUserReq>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let during = ApiError::during("creating the user");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.users()
        .create(User {
            email: req.email,
            name: req.name,
            surname: req.surname,
            phone: req.phone,
            cname: req.cname,
        })
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("User created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "The user", body = User),
        (status = 404, description = "User not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let during = ApiError::during("loading the user");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let user = uow.users().get(&email).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(user))
}

#[utoipa::path(
    put,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "User email")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "User updated", body = MessageRes),
        (status = 400, description = "Invalid input or unknown country", body = MessageRes),
        (status = 404, description = "User not found", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Apply a partial update; absent fields keep their stored values.
#[axum::debug_handler]
pub async fn update_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UpdateUserReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("updating the user");
    let patch = UserPatch {
        name: req.name,
        surname: req.surname,
        phone: req.phone,
        cname: req.cname,
    };

    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.users().update(&email, patch).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("User updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/users/{email}",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User deleted", body = MessageRes),
        (status = 400, description = "User still has roles", body = MessageRes),
        (status = 404, description = "User not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("deleting the user");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.users().delete(&email).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("User deleted successfully")))
}
