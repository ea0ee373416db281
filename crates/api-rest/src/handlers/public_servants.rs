use crate::error::{ApiError, ApiJson};
use crate::AppState;
use api_shared::{CreatePublicServantReq, MessageRes, UpdatePublicServantReq};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use his_core::{PublicServant, PublicServantPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicServantsRes {
    pub public_servants: Vec<PublicServant>,
}

#[utoipa::path(
    get,
    path = "/api/public-servants",
    responses(
        (status = 200, description = "All public servants", body = PublicServantsRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn list_public_servants(
    State(state): State<AppState>,
) -> Result<Json<PublicServantsRes>, ApiError> {
    let during = ApiError::during("loading public servants");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let public_servants = uow.public_servants().list().await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(PublicServantsRes { public_servants }))
}

#[utoipa::path(
    post,
    path = "/api/public-servants",
    request_body = CreatePublicServantReq,
    responses(
        (status = 201, description = "Public servant created", body = MessageRes),
        (status = 400, description = "Invalid input, unknown user or duplicate servant", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn create_public_servant(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreatePublicServantReq>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let during = ApiError::during("creating the public servant");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.public_servants()
        .create(PublicServant {
            email: req.email,
            department: req.department,
        })
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("Public servant created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/public-servants/{email}",
    params(("email" = String, Path, description = "Public servant email")),
    responses(
        (status = 200, description = "The public servant", body = PublicServant),
        (status = 404, description = "Public servant not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_public_servant(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<PublicServant>, ApiError> {
    let during = ApiError::during("loading the public servant");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let servant = uow.public_servants().get(&email).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(servant))
}

#[utoipa::path(
    put,
    path = "/api/public-servants/{email}",
    params(("email" = String, Path, description = "Public servant email")),
    request_body = UpdatePublicServantReq,
    responses(
        (status = 200, description = "Public servant updated", body = MessageRes),
        (status = 400, description = "Invalid input", body = MessageRes),
        (status = 404, description = "Public servant not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn update_public_servant(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UpdatePublicServantReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("updating the public servant");
    let patch = PublicServantPatch {
        department: req.department,
    };

    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.public_servants()
        .update(&email, patch)
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Public servant updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/public-servants/{email}",
    params(("email" = String, Path, description = "Public servant email")),
    responses(
        (status = 200, description = "Public servant deleted", body = MessageRes),
        (status = 400, description = "Public servant still has records", body = MessageRes),
        (status = 404, description = "Public servant not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_public_servant(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("deleting the public servant");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.public_servants()
        .delete(&email)
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Public servant deleted successfully")))
}
