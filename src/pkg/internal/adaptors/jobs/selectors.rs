use uuid::Uuid;

use crate::{
    pkg::internal::{
        adaptors::jobs::spec::{Job, JOBS_TABLE},
        supabase::Supabase,
    },
    prelude::Result,
};

/// Read side of the jobs collection. All reads go out with the anon
/// key; the backend's read policy makes postings public.
pub struct JobSelector<'a> {
    backend: &'a Supabase,
}

impl<'a> JobSelector<'a> {
    pub fn new(backend: &'a Supabase) -> Self {
        JobSelector { backend }
    }

    /// Every posting, newest first. No filter parameters here: the
    /// listing view filters client-side over the full set.
    pub async fn list_all(&self) -> Result<Vec<Job>> {
        self.backend
            .select_rows(
                JOBS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    /// Postings owned by the given identity, newest first.
    pub async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<Job>> {
        self.backend
            .select_rows(
                JOBS_TABLE,
                &[
                    ("select", "*".to_string()),
                    ("user_id", format!("eq.{owner}")),
                    ("order", "created_at.desc".to_string()),
                ],
            )
            .await
    }

    /// Exactly one posting, or `Error::NotFound` when the backend
    /// reports no matching row. Callers can tell that apart from
    /// transport and server failures by kind.
    pub async fn get_by_id(&self, id: i64) -> Result<Job> {
        self.backend
            .select_row(
                JOBS_TABLE,
                &[("select", "*".to_string()), ("id", format!("eq.{id}"))],
            )
            .await
    }
}
