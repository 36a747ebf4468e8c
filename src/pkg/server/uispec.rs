use askama::Template;

use crate::pkg::{
    internal::{
        adaptors::jobs::spec::{Job, JobType},
        filters::{FilterOptions, FilterSelection},
    },
    server::handlers::dashboard::JobForm,
};

pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

fn select_options(values: &[String], selected: Option<&str>) -> Vec<SelectOption> {
    values
        .iter()
        .map(|v| SelectOption {
            value: v.clone(),
            selected: selected == Some(v.as_str()),
        })
        .collect()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub signed_in: bool,
    pub jobs: Vec<Job>,
    pub locations: Vec<SelectOption>,
    pub job_types: Vec<SelectOption>,
    pub filters_active: bool,
}

impl HomePage {
    /// Derive everything the listing renders from the full job set and
    /// the active selection: the filtered subset, and option sets drawn
    /// from the distinct values present in the unfiltered list.
    pub fn new(signed_in: bool, all_jobs: &[Job], selection: &FilterSelection) -> Self {
        let options = FilterOptions::derive(all_jobs);
        HomePage {
            signed_in,
            jobs: selection.apply(all_jobs),
            locations: select_options(&options.locations, selection.location.as_deref()),
            job_types: select_options(&options.job_types, selection.job_type.as_deref()),
            filters_active: selection.is_active(),
        }
    }
}

#[derive(Template)]
#[template(path = "detail.html")]
pub struct DetailPage {
    pub job: Job,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage;

#[derive(Template)]
#[template(path = "auth.html")]
pub struct AuthPage {
    pub signup_tab: bool,
    pub email: String,
    pub message: Option<String>,
    pub success: bool,
}

impl AuthPage {
    pub fn blank(signup_tab: bool) -> Self {
        AuthPage {
            signup_tab,
            email: String::new(),
            message: None,
            success: false,
        }
    }

    pub fn failed(signup_tab: bool, email: String, message: String) -> Self {
        AuthPage {
            signup_tab,
            email,
            message: Some(message),
            success: false,
        }
    }

    pub fn succeeded(signup_tab: bool, email: String, message: String) -> Self {
        AuthPage {
            signup_tab,
            email,
            message: Some(message),
            success: true,
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub email: String,
    pub jobs: Vec<Job>,
}

#[derive(Template)]
#[template(path = "job_form.html")]
pub struct JobFormPage {
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_types: Vec<SelectOption>,
    pub type_chosen: bool,
    pub message: Option<String>,
}

impl JobFormPage {
    pub fn create() -> Self {
        Self::empty("Post a New Job", "/dashboard/jobs".to_string(), "Post")
    }

    pub fn edit(id: i64) -> Self {
        Self::empty("Edit Job", format!("/dashboard/jobs/{id}"), "Update")
    }

    fn empty(heading: &'static str, action: String, submit_label: &'static str) -> Self {
        let all: Vec<String> = JobType::ALL.iter().map(|t| t.as_str().to_string()).collect();
        JobFormPage {
            heading,
            action,
            submit_label,
            title: String::new(),
            company: String::new(),
            location: String::new(),
            description: String::new(),
            job_types: select_options(&all, None),
            type_chosen: false,
            message: None,
        }
    }

    fn with_fields(mut self, title: &str, company: &str, location: &str, description: &str, job_type: JobType) -> Self {
        let all: Vec<String> = JobType::ALL.iter().map(|t| t.as_str().to_string()).collect();
        self.title = title.to_string();
        self.company = company.to_string();
        self.location = location.to_string();
        self.description = description.to_string();
        self.job_types = select_options(&all, Some(job_type.as_str()));
        self.type_chosen = true;
        self
    }

    /// Pre-fill from a stored posting (edit entry).
    pub fn with_job(self, job: &Job) -> Self {
        self.with_fields(
            &job.title,
            &job.company,
            &job.location,
            &job.description,
            job.job_type,
        )
    }

    /// Re-fill from an in-progress draft, keeping unsaved state on a
    /// failed submit.
    pub fn with_draft(self, form: &JobForm) -> Self {
        self.with_fields(
            &form.title,
            &form.company,
            &form.location,
            &form.description,
            form.job_type,
        )
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }
}
