use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware,
    routing::get,
    Router,
};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::db::init_store;
use crate::handlers::{
    event_handlers::{create_event, delete_event, get_event, list_events, update_event},
    health_handlers::liveness,
    volunteer_handlers::{
        create_volunteer, delete_volunteer, get_volunteer, list_volunteers, update_volunteer,
    },
};
use crate::upload::ImageUploader;
use volunteer_network_shared::identity::identity_middleware;
use volunteer_network_shared::store::{EventStore, VolunteerStore};

/// Shared by every request: the store connection and the upload writer
pub struct AppState<S> {
    pub store: Arc<S>,
    pub uploader: Arc<ImageUploader>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            uploader: self.uploader.clone(),
        }
    }
}

/// Creates a router backed by MongoDB
pub async fn create_router(config: &Config) -> Router {
    info!("Creating router with MongoDB store");

    let store = Arc::new(init_store(config).await);
    let uploader = ImageUploader::new(config.upload_dir.clone());
    info!("Uploads are written under {}", config.upload_dir.display());

    create_router_with_store(store, uploader, config.max_upload_bytes)
}

/// Creates a router with a given store implementation
pub fn create_router_with_store<S>(
    store: Arc<S>,
    uploader: ImageUploader,
    max_upload_bytes: usize,
) -> Router
where
    S: VolunteerStore + EventStore + 'static,
{
    info!("Setting up API routes");

    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Logging middleware to trace all requests
    async fn logging_middleware(
        req: Request,
        next: axum::middleware::Next,
    ) -> impl axum::response::IntoResponse {
        info!(
            "Router received request: method={}, uri={}",
            req.method(),
            req.uri()
        );
        next.run(req).await
    }

    let state = AppState {
        store,
        uploader: Arc::new(uploader),
    };

    let router = Router::new()
        .route("/", get(liveness))
        .route(
            "/volunteers",
            get(list_volunteers::<S>).post(create_volunteer::<S>),
        )
        .route(
            "/volunteers/:id",
            get(get_volunteer::<S>)
                .patch(update_volunteer::<S>)
                .delete(delete_volunteer::<S>),
        )
        .route(
            "/events",
            get(list_events::<S>)
                .post(create_event::<S>)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(
            "/events/:id",
            get(get_event::<S>)
                .patch(update_event::<S>)
                .delete(delete_event::<S>),
        )
        .layer(middleware::from_fn(identity_middleware))
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(logging_middleware));

    info!(
        "Router configured, event uploads limited to {} bytes",
        max_upload_bytes
    );

    // Add a fallback handler for 404s
    router.fallback(|req: Request| async move {
        warn!("No route matched for: {} {}", req.method(), req.uri());
        (
            axum::http::StatusCode::NOT_FOUND,
            "The requested resource was not found".to_string(),
        )
    })
}
