use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    pkg::{internal::auth::Session, server::state::AppState},
    prelude::Result,
};

/// Guard for the owner views: resolve the session before any data
/// loads, or send the visitor to the sign-in entry point. Absence and
/// lookup failure are deliberately indistinguishable here.
pub async fn authenticate(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let jar = CookieJar::from_headers(&headers);
    if let Some(session) = Session::current(&state, &jar).await {
        request.extensions_mut().insert(Arc::new(session));
        return Ok(next.run(request).await);
    }
    tracing::warn!("no valid session, redirecting to sign-in");
    Ok(Redirect::to("/auth").into_response())
}
