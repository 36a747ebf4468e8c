use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::{CookieJar, cookie::Cookie};
use serde::Deserialize;
use validator::Validate;

use crate::{
    pkg::{
        internal::auth::{SESSION_COOKIE, Session},
        server::{state::AppState, uispec::AuthPage},
    },
    prelude::{Error, Result},
};

#[derive(Deserialize)]
pub struct AuthQuery {
    pub tab: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct SignInInput {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Deserialize, Validate)]
pub struct SignUpInput {
    #[validate(email(message = "Enter a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

pub async fn page(Query(query): Query<AuthQuery>) -> Result<Html<String>> {
    let signup_tab = query.tab.as_deref() == Some("signup");
    Ok(Html(AuthPage::blank(signup_tab).render()?))
}

pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(input): Form<SignInInput>,
) -> Result<Response> {
    if let Err(errors) = input.validate() {
        let page = AuthPage::failed(false, input.email, errors.to_string());
        return Ok(Html(page.render()?).into_response());
    }
    match Session::establish(&state, &input.email, &input.password).await {
        Ok(session) => {
            let cookie = Cookie::build((SESSION_COOKIE, session.access_token))
                .path("/")
                .http_only(true);
            Ok((jar.add(cookie), Redirect::to("/dashboard")).into_response())
        }
        Err(e) => {
            tracing::warn!("sign-in failed ({}): {}", e.kind(), &e);
            let page = AuthPage::failed(false, input.email, failure_message(&e));
            Ok(Html(page.render()?).into_response())
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Form(input): Form<SignUpInput>,
) -> Result<Html<String>> {
    if let Err(errors) = input.validate() {
        let page = AuthPage::failed(true, input.email, errors.to_string());
        return Ok(Html(page.render()?));
    }
    match Session::register(&state, &input.email, &input.password).await {
        Ok(()) => {
            let page = AuthPage::succeeded(
                true,
                input.email,
                "Check your email for the confirmation link!".to_string(),
            );
            Ok(Html(page.render()?))
        }
        Err(e) => {
            tracing::warn!("sign-up failed ({}): {}", e.kind(), &e);
            let page = AuthPage::failed(true, input.email, failure_message(&e));
            Ok(Html(page.render()?))
        }
    }
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    jar: CookieJar,
) -> Result<impl IntoResponse> {
    session.revoke(&state).await?;
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Redirect::to("/")))
}

/// User-visible message per failure kind; the backend's own wording is
/// surfaced where it is meaningful to the visitor.
fn failure_message(e: &Error) -> String {
    match e {
        Error::Network(_) => "Could not reach the sign-in service. Please try again.".to_string(),
        Error::Authorization(m) | Error::Validation(m) => m.clone(),
        Error::NotFound | Error::Unknown(_) => "An unknown error occurred.".to_string(),
    }
}
