use axum_extra::extract::CookieJar;
use serde::Deserialize;
use uuid::Uuid;

use crate::{pkg::server::state::AppState, prelude::Result};

/// Session cookie holding the backend-issued access token.
pub const SESSION_COOKIE: &str = "_Host_token";

/// The authenticated identity as the backend reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

/// A live authenticated session: the bearer token plus the identity it
/// was validated against. Owner-scoped reads and all mutations flow
/// through this.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub user: User,
}

impl Session {
    pub async fn establish(state: &AppState, email: &str, password: &str) -> Result<Session> {
        let grant = state.supabase.sign_in(email, password).await?;
        tracing::info!("session established for {}", &grant.user.email);
        Ok(Session {
            access_token: grant.access_token,
            user: grant.user,
        })
    }

    /// Confirmation of the address is the backend's flow; nothing to
    /// track here.
    pub async fn register(state: &AppState, email: &str, password: &str) -> Result<()> {
        state.supabase.sign_up(email, password).await
    }

    /// Resolve the current session from the request's cookies by asking
    /// the backend who the token belongs to. Absence and every failure
    /// collapse to `None`: callers only ever learn "not authenticated".
    pub async fn current(state: &AppState, jar: &CookieJar) -> Option<Session> {
        let cookie = jar.get(SESSION_COOKIE).filter(|c| !c.value().is_empty())?;
        match state.supabase.current_user(cookie.value()).await {
            Ok(user) => Some(Session {
                access_token: cookie.value().to_string(),
                user,
            }),
            Err(e) => {
                tracing::warn!("session lookup failed, treating as unauthenticated: {}", e);
                None
            }
        }
    }

    /// Invalidates the token on the backend. The caller clears the
    /// cookie and navigates back to the public landing view.
    pub async fn revoke(&self, state: &AppState) -> Result<()> {
        state.supabase.sign_out(&self.access_token).await?;
        tracing::info!("user {} signed out", &self.user.email);
        Ok(())
    }
}
