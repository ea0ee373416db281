use crate::error::{ApiError, ApiJson};
use crate::AppState;
use api_shared::{CreateCountryReq, MessageRes, UpdateCountryReq};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use his_core::{Country, CountryPatch};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CountriesRes {
    pub countries: Vec<Country>,
}

#[utoipa::path(
    get,
    path = "/api/countries",
    responses(
        (status = 200, description = "All countries", body = CountriesRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
/// List every country; used by clients to populate country pickers.
#[axum::debug_handler]
pub async fn list_countries(
    State(state): State<AppState>,
) -> Result<Json<CountriesRes>, ApiError> {
    let during = ApiError::during("loading countries");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let countries = uow.countries().list().await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(CountriesRes { countries }))
}

#[utoipa::path(
    post,
    path = "/api/countries",
    request_body = CreateCountryReq,
    responses(
        (status = 201, description = "Country created", body = MessageRes),
        (status = 400, description = "Invalid input or duplicate country", body = MessageRes),
        (status = 500, description = "Internal server error", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn create_country(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateCountryReq>,
) -> Result<(StatusCode, Json<MessageRes>), ApiError> {
    let during = ApiError::during("creating the country");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.countries()
        .create(Country {
            cname: req.cname,
            population: req.population,
        })
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok((
        StatusCode::CREATED,
        Json(MessageRes::new("Country created successfully")),
    ))
}

#[utoipa::path(
    get,
    path = "/api/countries/{cname}",
    params(("cname" = String, Path, description = "Country name")),
    responses(
        (status = 200, description = "The country", body = Country),
        (status = 404, description = "Country not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn get_country(
    State(state): State<AppState>,
    Path(cname): Path<String>,
) -> Result<Json<Country>, ApiError> {
    let during = ApiError::during("loading the country");
    let mut uow = state.store.begin().await.map_err(&during)?;
    let country = uow.countries().get(&cname).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(country))
}

#[utoipa::path(
    put,
    path = "/api/countries/{cname}",
    params(("cname" = String, Path, description = "Country name")),
    request_body = UpdateCountryReq,
    responses(
        (status = 200, description = "Country updated", body = MessageRes),
        (status = 400, description = "Invalid input", body = MessageRes),
        (status = 404, description = "Country not found", body = MessageRes)
    )
)]
#[axum::debug_handler]
pub async fn update_country(
    State(state): State<AppState>,
    Path(cname): Path<String>,
    ApiJson(req): ApiJson<UpdateCountryReq>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("updating the country");
    let patch = CountryPatch {
        population: req.population,
    };

    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.countries()
        .update(&cname, patch)
        .await
        .map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Country updated successfully")))
}

#[utoipa::path(
    delete,
    path = "/api/countries/{cname}",
    params(("cname" = String, Path, description = "Country name")),
    responses(
        (status = 200, description = "Country deleted", body = MessageRes),
        (status = 400, description = "Country is still referenced", body = MessageRes),
        (status = 404, description = "Country not found", body = MessageRes)
    )
)]
/// Delete a country. Refused while users, discoveries or records point at it.
#[axum::debug_handler]
pub async fn delete_country(
    State(state): State<AppState>,
    Path(cname): Path<String>,
) -> Result<Json<MessageRes>, ApiError> {
    let during = ApiError::during("deleting the country");
    let mut uow = state.store.begin().await.map_err(&during)?;
    uow.countries().delete(&cname).await.map_err(&during)?;
    uow.commit().await.map_err(&during)?;
    Ok(Json(MessageRes::new("Country deleted successfully")))
}
