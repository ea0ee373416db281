//! # API REST
//!
//! REST API for the health information system.
//!
//! Handles:
//! - JSON endpoints for users, doctors, countries and public servants with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (status codes, `{message}` envelopes, CORS, request tracing)
//!
//! Every request runs inside one `his_core::UnitOfWork`, committed only on success.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use his_core::Store;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::ServerConfig;
pub use error::{ApiError, ApiJson};

use handlers::{countries, doctors, public_servants, users};

/// Application state shared across REST API handlers
///
/// `Store` wraps a connection pool, so cloning it per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        users::delete_user,
        doctors::list_doctors,
        doctors::create_doctor,
        doctors::get_doctor,
        doctors::update_doctor,
        doctors::delete_doctor,
        countries::list_countries,
        countries::create_country,
        countries::get_country,
        countries::update_country,
        countries::delete_country,
        public_servants::list_public_servants,
        public_servants::create_public_servant,
        public_servants::get_public_servant,
        public_servants::update_public_servant,
        public_servants::delete_public_servant,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::MessageRes,
        api_shared::CreateUserReq,
        api_shared::UpdateUserReq,
        api_shared::CreateDoctorReq,
        api_shared::UpdateDoctorReq,
        api_shared::CreateCountryReq,
        api_shared::UpdateCountryReq,
        api_shared::CreatePublicServantReq,
        api_shared::UpdatePublicServantReq,
        his_core::User,
        his_core::Doctor,
        his_core::Country,
        his_core::PublicServant,
        users::UsersRes,
        doctors::DoctorsRes,
        countries::CountriesRes,
        public_servants::PublicServantsRes,
    ))
)]
pub struct ApiDoc;

/// CORS policy for the `/api` routes.
pub fn cors_layer(origins: &[axum::http::HeaderValue]) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the full application router.
///
/// CORS applies to `/api/*` only; `/health` and the documentation routes are same-origin.
pub fn router(state: AppState, cfg: &ServerConfig) -> Router {
    let api = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:email",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/doctors",
            get(doctors::list_doctors).post(doctors::create_doctor),
        )
        .route(
            "/doctors/:email",
            get(doctors::get_doctor)
                .put(doctors::update_doctor)
                .delete(doctors::delete_doctor),
        )
        .route(
            "/countries",
            get(countries::list_countries).post(countries::create_country),
        )
        .route(
            "/countries/:cname",
            get(countries::get_country)
                .put(countries::update_country)
                .delete(countries::delete_country),
        )
        .route(
            "/public-servants",
            get(public_servants::list_public_servants)
                .post(public_servants::create_public_servant),
        )
        .route(
            "/public-servants/:email",
            get(public_servants::get_public_servant)
                .put(public_servants::update_public_servant)
                .delete(public_servants::delete_public_servant),
        )
        .layer(cors_layer(cfg.cors_origins()));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the HTTP server fails while running.
pub async fn serve(state: AppState, cfg: &ServerConfig) -> anyhow::Result<()> {
    let app = router(state, cfg);
    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    tracing::info!("++ Starting HIS REST on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
