use crate::error::{ApiError, ApiJson};
use crate::AppState;
use api_shared::{CreateDoctorReq, MessageRes, UpdateDoctorReq};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use his_core::{Doctor, DoctorPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DoctorsRes {
    pub doctors: Vec<Doctor>,
}

#[utoipa::path(
    get,
    path = "/api/doctors",
    responses(
        (status = 200, description = "All doctors", body = DoctorsRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<DoctorsRes>, ApiError> {
    let during = ApiError::during("loading doctors");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let doctors = uow.doctors().list().await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(DoctorsRes { doctors }))
}

#[utoipa::path(
    post,
    path = "/api/doctors",
    request_body = CreateDoctorReq,
    responses(
        (status = 201, description = "Doctor created", body = MessageRes),
        (status = 400, description = "Invalid input, unknown user or duplicate doctor", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// Give an existing user the doctor role.
#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateDoctorReq>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let during = ApiError::during("creating the doctor");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.doctors()
        .create(Doctor {
            email: req.email,
            degree: req.degree,
            salary: req.salary,
        })
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("Doctor created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/doctors/{email}",
    params(("email" = String, Path, description = "Doctor email")),
    responses(
        (status = 200, description = "The doctor", body = Doctor),
        (status = 404, description = "Doctor not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let during = ApiError::during("loading the doctor");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let doctor = uow.doctors().get(&email).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(doctor))
}

#[utoipa::path(
    put,
    path = "/api/doctors/{email}",
    params(("email" = String, Path, description = "Doctor email")),
    request_body = UpdateDoctorReq,
    responses(
        (status = 200, description = "Doctor updated", body = MessageRes),
        (status = 400, description = "Invalid input", body = MessageRes),
        (status = 404, description = "Doctor not found", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(email): Path<String>,
    ApiJson(req): ApiJson<UpdateDoctorReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("updating the doctor");
    let patch = DoctorPatch {
        degree: req.degree,
        salary: req.salary,
    };

    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.doctors().update(&email, patch).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Doctor updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/doctors/{email}",
    params(("email" = String, Path, description = "Doctor email")),
    responses(
        (status = 200, description = "Doctor deleted", body = MessageRes),
        (status = 400, description = "Doctor still has specializations", body = MessageRes),
        (status = 404, description = "Doctor not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("deleting the doctor");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.doctors().delete(&email).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Doctor deleted successfully")))
}
