// File: crates/services/navbat_backend/src/main.rs
use navbat_common::ReservationStore;
use navbat_config::load_config;
use navbat_scheduling::routes as scheduling_routes;
use navbat_store::{DbClient, InMemoryReservationStore, SqlReservationStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use axum::Router;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    navbat_common::logging::init();

    // Persistent store when a database is configured, in-memory otherwise.
    let store: Arc<dyn ReservationStore> = match &config.database {
        Some(_) => {
            let client = DbClient::new(&config)
                .await
                .expect("Failed to connect to database");
            let sql_store = SqlReservationStore::new(client);
            sql_store
                .init_schema()
                .await
                .expect("Failed to initialize reservation schema");
            Arc::new(sql_store)
        }
        None => {
            warn!("No database configured, reservations will not survive a restart");
            Arc::new(InMemoryReservationStore::new())
        }
    };

    let scheduling_router = scheduling_routes::routes(config.clone(), store)
        .expect("Invalid calendar configuration");

    #[allow(unused_mut)]
    let mut app = Router::new().nest("/api", scheduling_router);

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use navbat_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Navbat API",
                version = "0.1.0",
                description = "Appointment availability and reservation API"
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("Starting server at http://{addr}");
    info!("API endpoints available at http://{addr}/api");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
