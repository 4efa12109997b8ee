//! Clinic API router.
//!
//! Returns a composable `Router` with all endpoints nested under
//! `/api/`. Registration, login, and health are open; everything else
//! requires a bearer token (auth middleware).

use std::sync::Arc;

use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the clinic API router.
pub fn clinic_api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);
    build_router(ctx)
}

/// Build router from a pre-constructed `ApiContext`.
///
/// Used by integration tests that need the shared context (e.g. to
/// subscribe on the change hub directly).
#[cfg(test)]
pub(crate) fn clinic_api_router_with_ctx(ctx: ApiContext) -> Router {
    build_router(ctx)
}

fn build_router(ctx: ApiContext) -> Router {
    // Protected routes — bearer-token auth required.
    //
    // Layers are applied bottom (innermost) to top (outermost):
    //   Extension (outermost) → Auth → Handler
    // Extension must be outermost so the middleware can access ApiContext.
    let protected = Router::new()
        .route("/auth/logout", post(endpoints::auth::logout))
        .route("/profiles/me", get(endpoints::profiles::me))
        .route("/profiles/me", patch(endpoints::profiles::update_me))
        .route("/profiles", get(endpoints::profiles::list))
        .route("/profiles/:uid/role", patch(endpoints::profiles::set_role))
        .route("/profiles/:uid", delete(endpoints::profiles::delete))
        .route("/appointments", post(endpoints::appointments::create))
        .route("/appointments", get(endpoints::appointments::list))
        .route(
            "/appointments/:id/status",
            patch(endpoints::appointments::set_status),
        )
        .route("/reports", post(endpoints::reports::create))
        .route("/reports", get(endpoints::reports::list))
        .route("/reports/:id", get(endpoints::reports::get))
        .route("/reports/:id/submit", post(endpoints::reports::submit))
        .route("/reports/:id/review", post(endpoints::reports::review))
        .route("/reports/:id/sign", post(endpoints::reports::sign))
        .route("/ai/draft", post(endpoints::ai::draft))
        .route("/ai/summarize", post(endpoints::ai::summarize))
        .route("/ai/illustration", post(endpoints::ai::illustration))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::require_auth))
        .layer(axum::Extension(ctx.clone()));

    // Open routes — no session yet.
    let open = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/auth/register", post(endpoints::auth::register))
        .route("/auth/login", post(endpoints::auth::login))
        .with_state(ctx);

    // The browser client is served from a different origin.
    Router::new()
        .nest("/api", protected)
        .nest("/api", open)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
