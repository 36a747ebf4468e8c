use crate::pkg::internal::adaptors::jobs::spec::Job;

/// The listing view's two independent, optional equality criteria.
/// Unset matches everything; an empty string from the query string
/// normalizes to unset. Transient view state only.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub location: Option<String>,
    pub job_type: Option<String>,
}

impl FilterSelection {
    pub fn new(location: Option<String>, job_type: Option<String>) -> Self {
        FilterSelection {
            location: location.filter(|v| !v.is_empty()),
            job_type: job_type.filter(|v| !v.is_empty()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.location.is_some() || self.job_type.is_some()
    }

    pub fn matches(&self, job: &Job) -> bool {
        self.location.as_deref().map_or(true, |l| job.location == l)
            && self
                .job_type
                .as_deref()
                .map_or(true, |t| job.job_type.as_str() == t)
    }

    /// Derive the filtered subset, preserving source order. Pure and
    /// synchronous; re-run whenever the source set or a criterion
    /// changes.
    pub fn apply(&self, jobs: &[Job]) -> Vec<Job> {
        jobs.iter().filter(|j| self.matches(j)).cloned().collect()
    }
}

/// The values the filter widgets can offer: the distinct locations and
/// types present in the unfiltered list, in first-occurrence order.
/// That ordering is an implementation choice, not a user contract.
#[derive(Debug, Default, PartialEq)]
pub struct FilterOptions {
    pub locations: Vec<String>,
    pub job_types: Vec<String>,
}

impl FilterOptions {
    pub fn derive(jobs: &[Job]) -> Self {
        FilterOptions {
            locations: distinct(jobs.iter().map(|j| j.location.clone())),
            job_types: distinct(jobs.iter().map(|j| j.job_type.as_str().to_string())),
        }
    }
}

fn distinct(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = Vec::new();
    for v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}
