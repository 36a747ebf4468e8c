use std::sync::Arc;

use askama::Template;
use axum::{
    Extension, Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::{mutators::JobMutator, selectors::JobSelector, spec::JobType},
            auth::Session,
        },
        server::{
            state::AppState,
            uispec::{DashboardPage, JobFormPage},
        },
    },
    prelude::{Error, Result},
};

/// In-progress copy of a posting's editable fields. The identifier and
/// owner are injected at submit time, never staged in the draft.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JobForm {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub company: String,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub location: String,
    pub job_type: JobType,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub description: String,
}

pub async fn index(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
) -> Result<Html<String>> {
    let jobs = JobSelector::new(&state.supabase)
        .list_by_owner(&session.user.id)
        .await?;
    tracing::debug!("{} owns {} postings", &session.user.email, jobs.len());
    let template = DashboardPage {
        email: session.user.email.clone(),
        jobs,
    };
    Ok(Html(template.render()?))
}

pub async fn new_form() -> Result<Html<String>> {
    Ok(Html(JobFormPage::create().render()?))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>> {
    let job = JobSelector::new(&state.supabase).get_by_id(id).await?;
    Ok(Html(JobFormPage::edit(id).with_job(&job).render()?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Form(input): Form<JobForm>,
) -> Result<Response> {
    if let Err(errors) = input.validate() {
        let page = JobFormPage::create()
            .with_draft(&input)
            .with_message(errors.to_string());
        return Ok(Html(page.render()?).into_response());
    }
    let mutator = JobMutator::new(&state.supabase, &session.access_token);
    match mutator.create(&input, &session.user.id).await {
        Ok(job) => {
            tracing::info!("job {} created by {}", job.id, &session.user.email);
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            // keep the dialog open with the unsaved draft
            let page = JobFormPage::create()
                .with_draft(&input)
                .with_message(mutation_message(&e));
            Ok(Html(page.render()?).into_response())
        }
    }
}

pub async fn update(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<i64>,
    Form(input): Form<JobForm>,
) -> Result<Response> {
    if let Err(errors) = input.validate() {
        let page = JobFormPage::edit(id)
            .with_draft(&input)
            .with_message(errors.to_string());
        return Ok(Html(page.render()?).into_response());
    }
    let mutator = JobMutator::new(&state.supabase, &session.access_token);
    match mutator.update(id, &input).await {
        Ok(()) => {
            tracing::info!("job {} updated by {}", id, &session.user.email);
            Ok(Redirect::to("/dashboard").into_response())
        }
        Err(e) => {
            let page = JobFormPage::edit(id)
                .with_draft(&input)
                .with_message(mutation_message(&e));
            Ok(Html(page.render()?).into_response())
        }
    }
}

/// Deleting has no dialog to keep open; the confirmation happened on
/// the client, so a failure here surfaces as an error page.
pub async fn remove(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<i64>,
) -> Result<Redirect> {
    JobMutator::new(&state.supabase, &session.access_token)
        .delete(id)
        .await?;
    tracing::info!("job {} deleted by {}", id, &session.user.email);
    Ok(Redirect::to("/dashboard"))
}

fn mutation_message(e: &Error) -> String {
    match e {
        Error::Network(_) => {
            "Could not reach the job service. Your changes were not saved; please try again."
                .to_string()
        }
        Error::Validation(m) => m.clone(),
        Error::Authorization(_) => "You are not allowed to modify this posting.".to_string(),
        Error::NotFound => "This posting no longer exists.".to_string(),
        Error::Unknown(_) => "Something went wrong. Your changes were not saved.".to_string(),
    }
}
