// File: services/bookify_backend/src/main.rs
use axum::{routing::get, Router};
use bookify_config::load_config;
#[cfg(feature = "gcal")]
use bookify_gcal::routes as gcal_routes;
use bookify_scheduling::routes as scheduling_routes;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

mod app_state;
mod service_factory;

use app_state::AppState;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config().expect("Failed to load config"));
    let _log_guard = bookify_common::init_from_config(config.logging.as_ref());

    let app_state = AppState::new(config.clone());

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to Bookify API!" }))
        .with_state(config.clone());

    let scheduling_router = scheduling_routes::routes(config.clone(), app_state.engine.clone());

    #[cfg(feature = "gcal")]
    let gcal_router = app_state
        .service_factory
        .gcal_service()
        .map(|sync| gcal_routes::routes(config.clone(), sync));

    let api_router = Router::new().nest("/api", {
        #[allow(unused_mut)] // for the features it needs to be mutable
        let mut router = api_router.merge(scheduling_router);
        #[cfg(feature = "gcal")]
        {
            if let Some(gcal_router) = gcal_router {
                router = router.merge(gcal_router);
            }
        }
        router
    });

    let mut app = api_router;

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use bookify_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        // Define the Merged OpenAPI Documentation struct
        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Bookify Scheduling Service API Docs",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Bookify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        // Create the merged OpenAPI document
        #[allow(unused_mut)]
        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        #[cfg(feature = "gcal")]
        {
            use bookify_gcal::doc::GcalApiDoc;
            openapi_doc.merge(GcalApiDoc::openapi());
        }
        println!("📖 Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    // Serve static files in dev mode
    if cfg!(debug_assertions) {
        println!("Running in development mode, serving static files from ../../dist");
        let static_router = Router::new().nest_service("/static", ServeDir::new("../../dist"));
        app = app.merge(static_router);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    println!("Starting server at http://{}", addr);
    println!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
