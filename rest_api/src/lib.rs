// rest_api/src/lib.rs
// HTTP surface for the clinic functions: one axum router shared by the
// Lambda entry points and the local development server.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use clinic::{
    open_storage_engine, AppointmentsService, PatientsService, ServiceError, Settings, StorageEngine,
    StoreAppointmentsRepository, StorePatientsRepository,
};
use serde_json::{json, Value};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

pub mod config;
pub mod handlers;

use crate::config::RestApiConfig;
use crate::handlers::{appointments, patients};

#[derive(Debug, Error)]
pub enum RestApiError {
    /// Rejected before reaching a service; the message goes out as is.
    #[error("{0}")]
    InvalidInput(String),
    #[error("{message}: {source}")]
    Service {
        message: &'static str,
        source: ServiceError,
    },
}

impl RestApiError {
    /// `message` is the generic text shown to callers on a server-side failure.
    pub fn service(message: &'static str, source: ServiceError) -> Self {
        RestApiError::Service { message, source }
    }
}

impl IntoResponse for RestApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            RestApiError::InvalidInput(msg) => {
                warn!(error = %msg, "Rejected request");
                (StatusCode::BAD_REQUEST, msg)
            }
            RestApiError::Service { source, .. } if source.is_client_error() => {
                warn!(error = %source, "Rejected request");
                (StatusCode::BAD_REQUEST, source.to_string())
            }
            RestApiError::Service { message, source } => {
                error!(error = %source, "{}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message.to_string())
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

// Shared state for the Axum application
#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<AppointmentsService>,
    pub patients: Arc<PatientsService>,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageEngine>, settings: &Settings) -> Self {
        let appointments =
            StoreAppointmentsRepository::new(storage.clone(), settings.appointments.clone());
        let patients = StorePatientsRepository::new(storage, settings.patients.clone());
        AppState {
            appointments: Arc::new(AppointmentsService::new(Arc::new(appointments))),
            patients: Arc::new(PatientsService::new(Arc::new(patients))),
        }
    }
}

/// Opens the configured storage engine and wires both services on top of it.
pub async fn build_state(settings: &Settings) -> Result<AppState> {
    let storage = open_storage_engine(&settings.storage)
        .await
        .context("Failed to open storage engine")?;
    Ok(AppState::new(storage, settings))
}

/// Every deployable function. Each one owns a fixed set of routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateAppointment,
    GetAppointment,
    GetAllAppointments,
    UpdateAppointment,
    DeleteAppointment,
    CreatePatient,
    GetPatient,
    GetAllPatients,
    UpdatePatient,
    DeletePatient,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::CreateAppointment,
        Operation::GetAppointment,
        Operation::GetAllAppointments,
        Operation::UpdateAppointment,
        Operation::DeleteAppointment,
        Operation::CreatePatient,
        Operation::GetPatient,
        Operation::GetAllPatients,
        Operation::UpdatePatient,
        Operation::DeletePatient,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::CreateAppointment => "create_appointment",
            Operation::GetAppointment => "get_appointment",
            Operation::GetAllAppointments => "get_all_appointments",
            Operation::UpdateAppointment => "update_appointment",
            Operation::DeleteAppointment => "delete_appointment",
            Operation::CreatePatient => "create_patient",
            Operation::GetPatient => "get_patient",
            Operation::GetAllPatients => "get_all_patients",
            Operation::UpdatePatient => "update_patient",
            Operation::DeletePatient => "delete_patient",
        }
    }

    /// Adds this operation's routes to `router`.
    pub fn register(self, router: Router<AppState>) -> Router<AppState> {
        match self {
            Operation::CreateAppointment => {
                router.route("/appointments", post(appointments::create_appointment))
            }
            Operation::GetAppointment => router
                .route("/appointments", get(appointments::get_appointment))
                .route("/appointments/:id", get(appointments::get_appointment)),
            Operation::GetAllAppointments => {
                router.route("/appointments/all", get(appointments::get_all_appointments))
            }
            Operation::UpdateAppointment => router
                .route("/appointments", put(appointments::update_appointment))
                .route("/appointments/:id", put(appointments::update_appointment)),
            Operation::DeleteAppointment => router
                .route("/appointments", delete(appointments::delete_appointment))
                .route("/appointments/:id", delete(appointments::delete_appointment)),
            Operation::CreatePatient => router.route("/patients", post(patients::create_patient)),
            Operation::GetPatient => router
                .route("/patients", get(patients::get_patient))
                .route("/patients/:id", get(patients::get_patient)),
            Operation::GetAllPatients => {
                router.route("/patients/all", get(patients::get_all_patients))
            }
            Operation::UpdatePatient => router
                .route("/patients", put(patients::update_patient))
                .route("/patients/:id", put(patients::update_patient)),
            Operation::DeletePatient => router
                .route("/patients", delete(patients::delete_patient))
                .route("/patients/:id", delete(patients::delete_patient)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Router carrying a single operation, as deployed behind one function.
pub fn function_router(operation: Operation, state: AppState) -> Router {
    operation.register(Router::new()).with_state(state)
}

/// Router carrying every operation plus `/health`.
pub fn router(state: AppState) -> Router {
    Operation::ALL
        .into_iter()
        .fold(Router::new(), |router, operation| operation.register(router))
        .route("/health", get(health_check_handler))
        .with_state(state)
}

// Handler for the /health endpoint
async fn health_check_handler() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Entry point shared by the Lambda binaries.
pub async fn run_function(operation: Operation) -> std::result::Result<(), lambda_http::Error> {
    dotenvy::dotenv().ok();
    clinic::logging::init_logging();

    let settings = clinic::load_settings()?;
    let state = build_state(&settings).await?;
    info!(%operation, backend = %settings.storage.backend, "Starting function");

    lambda_http::run(function_router(operation, state)).await
}

/// Serves every route on `config.host:config.port` until `shutdown` resolves.
pub async fn start_server<F>(config: &RestApiConfig, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
        .allow_origin(Any);

    let app = router(state).layer(cors);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to address: {}", addr))?;
    info!(%addr, "REST API server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
        .context("REST API server error")?;

    info!("REST API server stopped");
    Ok(())
}
