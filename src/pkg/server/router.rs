use axum::middleware::from_fn_with_state;
use axum::routing::post;
use axum::{Router, routing::get};

use super::handlers::auth::{logout, page, signin, signup};
use super::handlers::probes::{healthz, livez};
use super::handlers::{dashboard, ui};
use super::middlewares::authn;
use super::state::AppState;

pub fn build_routes(state: AppState) -> Router {
    Router::new()
        .route("/dashboard", get(dashboard::index))
        .route("/dashboard/new", get(dashboard::new_form))
        .route("/dashboard/{id}/edit", get(dashboard::edit_form))
        .route("/dashboard/jobs", post(dashboard::create))
        .route("/dashboard/jobs/{id}", post(dashboard::update))
        .route("/dashboard/jobs/{id}/delete", post(dashboard::remove))
        .route("/logout", post(logout))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/", get(ui::home))
        .route("/jobs/{id}", get(ui::detail))
        .route("/auth", get(page))
        .route("/auth/signin", post(signin))
        .route("/auth/signup", post(signup))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state)
}
