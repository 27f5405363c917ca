//! # Server Configuration
//!
//! This module contains the server setup and configuration for the Bookings
//! API: shared state, routing, middleware, and the OpenAPI document.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::auth_middleware;
use crate::config::AppConfig;
use crate::handlers;
use crate::mail::{Mailer, default::LogMailer};
use crate::repositories::{
    AppointmentRepository, ServiceRepository, StaffRepository, TimeOffRepository,
    WorkingHoursRepository,
};
use crate::scheduling::BookingEngine;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: Arc<DatabaseConnection>,
    pub engine: Arc<BookingEngine>,
    pub appointments: AppointmentRepository,
    pub staff: StaffRepository,
    pub services: ServiceRepository,
    pub working_hours: WorkingHoursRepository,
    pub time_off: TimeOffRepository,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, db: DatabaseConnection, mailer: Arc<dyn Mailer>) -> Self {
        let db = Arc::new(db);
        let lock_timeout = Duration::from_millis(config.booking_lock_timeout_ms);

        Self {
            engine: Arc::new(BookingEngine::new(Arc::clone(&db), lock_timeout)),
            appointments: AppointmentRepository::new(Arc::clone(&db)),
            staff: StaffRepository::new(Arc::clone(&db)),
            services: ServiceRepository::new(Arc::clone(&db)),
            working_hours: WorkingHoursRepository::new(Arc::clone(&db)),
            time_off: TimeOffRepository::new(Arc::clone(&db)),
            config,
            db,
            mailer,
        }
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/availability",
            get(handlers::availability::get_availability),
        )
        .route(
            "/appointments",
            post(handlers::appointments::book_appointment)
                .get(handlers::appointments::list_my_appointments),
        )
        .route(
            "/appointments/{id}/cancel",
            post(handlers::appointments::cancel_appointment),
        )
        .route(
            "/staff/appointments",
            get(handlers::staff_appointments::list_calendar),
        )
        .route(
            "/staff/appointments/{id}",
            put(handlers::staff_appointments::reschedule_appointment),
        )
        .route(
            "/staff/appointments/{id}/status",
            post(handlers::staff_appointments::update_status),
        )
        .route(
            "/staff/appointments/{id}/cancel",
            post(handlers::staff_appointments::cancel_appointment),
        )
        .route(
            "/staff/working-hours",
            get(handlers::working_hours::list_working_hours)
                .post(handlers::working_hours::create_working_hours),
        )
        .route(
            "/staff/working-hours/{id}",
            put(handlers::working_hours::update_working_hours)
                .delete(handlers::working_hours::delete_working_hours),
        )
        .route(
            "/staff/time-off",
            get(handlers::time_off::list_time_off).post(handlers::time_off::create_time_off),
        )
        .route(
            "/staff/time-off/{id}",
            delete(handlers::time_off::delete_time_off),
        )
        .layer(axum::middleware::from_fn(auth_middleware));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);
    let state = AppState::new(Arc::clone(&config), db, Arc::new(LogMailer::new()));
    let app = create_app(state);

    // Resolve the configured bind address
    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    println!("Server listening on: {}", addr);
    println!("Running in profile: {}", config.profile);

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::availability::get_availability,
        crate::handlers::appointments::book_appointment,
        crate::handlers::appointments::list_my_appointments,
        crate::handlers::appointments::cancel_appointment,
        crate::handlers::staff_appointments::list_calendar,
        crate::handlers::staff_appointments::reschedule_appointment,
        crate::handlers::staff_appointments::update_status,
        crate::handlers::staff_appointments::cancel_appointment,
        crate::handlers::working_hours::list_working_hours,
        crate::handlers::working_hours::create_working_hours,
        crate::handlers::working_hours::update_working_hours,
        crate::handlers::working_hours::delete_working_hours,
        crate::handlers::time_off::list_time_off,
        crate::handlers::time_off::create_time_off,
        crate::handlers::time_off::delete_time_off,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::error::ApiError,
            crate::handlers::availability::AvailabilityResponse,
            crate::handlers::appointments::BookAppointmentRequest,
            crate::handlers::appointments::CancelAppointmentRequest,
            crate::handlers::appointments::AppointmentView,
            crate::handlers::appointments::AppointmentsResponse,
            crate::handlers::appointments::PersonInfo,
            crate::handlers::appointments::BookedServiceInfo,
            crate::handlers::staff_appointments::RescheduleRequest,
            crate::handlers::staff_appointments::UpdateStatusRequest,
            crate::handlers::staff_appointments::StaffCancelRequest,
            crate::handlers::working_hours::WorkingHourRequest,
            crate::handlers::working_hours::WorkingHourInfo,
            crate::handlers::working_hours::WorkingHoursResponse,
            crate::handlers::time_off::TimeOffRequest,
            crate::handlers::time_off::TimeOffInfo,
            crate::handlers::time_off::TimeOffResponse,
        )
    ),
    info(
        title = "Bookings API",
        description = "API for multi-tenant appointment booking",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
