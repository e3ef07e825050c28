//! # API REST
//!
//! REST surface for the MedEasy clinic system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Bearer-token authentication and error → status mapping
//!
//! All domain rules live in `medeasy-core`; this crate only routes and
//! translates.

#![warn(rust_2018_idioms)]

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use medeasy_core::{
    AppointmentService, Database, IdentityService, RecordService, SessionStore, SharedDatabase,
};

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentityService,
    pub appointments: AppointmentService,
    pub records: RecordService,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wires the services around one shared store.
    pub fn new(db: Database) -> Self {
        let store: SharedDatabase = Arc::new(Mutex::new(db));
        let sessions = Arc::new(SessionStore::new());
        AppState {
            identity: IdentityService::new(store.clone(), sessions.clone()),
            appointments: AppointmentService::new(store.clone()),
            records: RecordService::new(store),
            sessions,
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::register_patient,
        handlers::register_doctor,
        handlers::login,
        handlers::logout,
        handlers::list_doctors,
        handlers::schedule,
        handlers::list_own,
        handlers::get_appointment,
        handlers::edit_appointment,
        handlers::confirm,
        handlers::cancel,
        handlers::finalize,
        handlers::chart,
        handlers::add_record,
        handlers::history,
    ),
    components(schemas(
        dto::HealthRes,
        dto::RegisterPatientReq,
        dto::RegisterDoctorReq,
        dto::RegisteredRes,
        dto::LoginReq,
        dto::LoginRes,
        dto::DoctorRes,
        dto::ScheduleReq,
        dto::EditAppointmentReq,
        dto::AppointmentRes,
        dto::RecordActionReq,
        dto::NoteRes,
        dto::PrescriptionRes,
        dto::RecordsRes,
        dto::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router, Swagger UI included.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/register/paciente", post(handlers::register_patient))
        .route("/register/medico", post(handlers::register_doctor))
        .route("/login", post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/medicos", get(handlers::list_doctors))
        .route("/agendar", post(handlers::schedule))
        .route("/consultas", get(handlers::list_own))
        .route(
            "/consulta/:id/editar",
            get(handlers::get_appointment).post(handlers::edit_appointment),
        )
        .route("/consulta/:id/confirmar", post(handlers::confirm))
        .route("/consulta/:id/cancelar", post(handlers::cancel))
        .route("/consulta/:id/finalizar", post(handlers::finalize))
        .route(
            "/consulta/:id/evolucoes",
            get(handlers::chart).post(handlers::add_record),
        )
        .route("/consulta/:id/historico", get(handlers::history))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
