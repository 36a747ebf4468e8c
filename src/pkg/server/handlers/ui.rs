use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{selectors::JobSelector, spec::Job},
            auth::Session,
            filters::FilterSelection,
        },
        server::{
            state::AppState,
            uispec::{DetailPage, HomePage, NotFoundPage},
        },
    },
    prelude::{Error, Result},
};

#[derive(Deserialize, Default)]
pub struct ListingQuery {
    pub location: Option<String>,
    pub job_type: Option<String>,
}

// Public listing. The session lookup only toggles the header links,
// it never redirects.
pub async fn home(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<ListingQuery>,
) -> Result<Html<String>> {
    let session = Session::current(&state, &jar).await;
    let jobs = JobSelector::new(&state.supabase).list_all().await?;
    let selection = FilterSelection::new(query.location, query.job_type);
    tracing::debug!(
        "listing {} jobs, filters active: {}",
        jobs.len(),
        selection.is_active()
    );
    let template = HomePage::new(session.is_some(), &jobs, &selection);
    Ok(Html(template.render()?))
}

/// Lifecycle of one detail view: starts loading, settles exactly once,
/// and stays settled. A new identifier means a new machine.
#[derive(Debug)]
pub enum DetailState {
    Loading,
    Found(Job),
    NotFound,
}

impl DetailState {
    pub fn new() -> Self {
        DetailState::Loading
    }

    /// Settle from a fetch outcome. The backend's "no matching row"
    /// signal and every other fetch failure collapse into the same
    /// visible NotFound state. Settled states are terminal.
    pub fn settle(self, fetch: Result<Job>) -> Self {
        match self {
            DetailState::Loading => match fetch {
                Ok(job) => DetailState::Found(job),
                Err(Error::NotFound) => DetailState::NotFound,
                Err(e) => {
                    tracing::error!("job fetch failed ({}), rendering not found: {}", e.kind(), e);
                    DetailState::NotFound
                }
            },
            settled => settled,
        }
    }
}

impl Default for DetailState {
    fn default() -> Self {
        DetailState::new()
    }
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    let view = match id.parse::<i64>() {
        Ok(id) => {
            let fetch = JobSelector::new(&state.supabase).get_by_id(id).await;
            DetailState::new().settle(fetch)
        }
        // an unparseable identifier cannot name a row
        Err(_) => DetailState::new().settle(Err(Error::NotFound)),
    };
    match view {
        DetailState::Found(job) => Ok(Html(DetailPage { job }.render()?).into_response()),
        _ => Ok((StatusCode::NOT_FOUND, Html(NotFoundPage.render()?)).into_response()),
    }
}
