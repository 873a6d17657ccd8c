//! services/web/src/web/routes.rs
//!
//! Builds the complete web router: the HTML page, the JSON API and the Swagger UI.

use crate::web::{
    handlers::{ask_form_handler, index_handler, plan_form_handler},
    middleware::with_session,
    rest::{chat_api_handler, chat_history_handler, plan_api_handler, ApiDoc},
    state::AppState,
};
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub fn build_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    // HTML page routes
    let page_routes = Router::new()
        .route("/", get(index_handler))
        .route("/plan", post(plan_form_handler))
        .route("/ask", post(ask_form_handler));

    // JSON API routes
    let api_routes = Router::new()
        .route("/api/plan", post(plan_api_handler))
        .route("/api/chat", get(chat_history_handler).post(chat_api_handler))
        .layer(cors);

    // Every page and API route runs inside a session.
    let app_router = Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            with_session,
        ))
        .with_state(app_state);

    Router::new()
        .merge(app_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
}
