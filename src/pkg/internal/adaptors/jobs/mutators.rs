use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    pkg::{
        internal::{
            adaptors::jobs::spec::{Job, JobType, JOBS_TABLE},
            supabase::Supabase,
        },
        server::handlers::dashboard::JobForm,
    },
    prelude::Result,
};

/// Write side of the jobs collection. Carries the caller's bearer token
/// so the backend's row-ownership rules decide what may be touched.
/// Field presence and the job-type enumeration are enforced at the input
/// boundary, not re-validated here.
pub struct JobMutator<'a> {
    backend: &'a Supabase,
    access_token: &'a str,
}

#[derive(Serialize)]
struct NewJobRow<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    job_type: JobType,
    description: &'a str,
    created_at: DateTime<Utc>,
    user_id: &'a Uuid,
}

/// Only the five editable fields. `id`, `user_id` and `created_at`
/// never appear in a patch.
#[derive(Serialize)]
struct JobPatch<'a> {
    title: &'a str,
    company: &'a str,
    location: &'a str,
    job_type: JobType,
    description: &'a str,
}

impl<'a> JobMutator<'a> {
    pub fn new(backend: &'a Supabase, access_token: &'a str) -> Self {
        JobMutator {
            backend,
            access_token,
        }
    }

    /// Insert a posting for the given owner. The id comes back from the
    /// backend; the creation timestamp is stamped here at insert time.
    pub async fn create(&self, form: &JobForm, owner: &Uuid) -> Result<Job> {
        let row = NewJobRow {
            title: &form.title,
            company: &form.company,
            location: &form.location,
            job_type: form.job_type,
            description: &form.description,
            created_at: Utc::now(),
            user_id: owner,
        };
        self.backend
            .insert_row(JOBS_TABLE, &row, self.access_token)
            .await
    }

    pub async fn update(&self, id: i64, form: &JobForm) -> Result<()> {
        let patch = JobPatch {
            title: &form.title,
            company: &form.company,
            location: &form.location,
            job_type: form.job_type,
            description: &form.description,
        };
        self.backend
            .update_rows(
                JOBS_TABLE,
                &[("id", format!("eq.{id}"))],
                &patch,
                self.access_token,
            )
            .await
    }

    /// Remove a posting. Whatever confirmation the destructive action
    /// deserves happens before this is called.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.backend
            .delete_rows(JOBS_TABLE, &[("id", format!("eq.{id}"))], self.access_token)
            .await
    }
}
