// each test binary uses its own subset of these helpers
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use jobdev::pkg::{
    internal::supabase::Supabase,
    server::{router::build_routes, state::AppState},
};

pub const ANON_KEY: &str = "test-anon-key";

const OBJECT_JSON: &str = "application/vnd.pgrst.object+json";
const EDITABLE_COLUMNS: [&str; 5] = ["title", "company", "location", "job_type", "description"];

#[derive(Default)]
struct Store {
    users: HashMap<String, (Uuid, String)>,
    tokens: HashMap<String, (Uuid, String)>,
    jobs: Vec<Value>,
    next_id: i64,
}

/// In-process stand-in for the external backend: the GoTrue and
/// PostgREST subset the application actually speaks, including the
/// PGRST116 no-row signal and owner-scoped mutations.
#[derive(Clone, Default)]
pub struct FakeBackend {
    store: Arc<Mutex<Store>>,
}

impl FakeBackend {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/v1/signup", post(signup))
            .route("/auth/v1/token", post(token))
            .route("/auth/v1/user", get(user_info))
            .route("/auth/v1/logout", post(logout))
            .route("/auth/v1/health", get(health))
            .route(
                "/rest/v1/jobs",
                get(jobs_select)
                    .post(jobs_insert)
                    .patch(jobs_update)
                    .delete(jobs_delete),
            )
            .with_state(self.clone())
    }

    pub fn seed_user(&self, email: &str, password: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut store = self.store.lock().unwrap();
        store.users.insert(email.to_string(), (id, password.to_string()));
        id
    }

    pub fn seed_job(
        &self,
        owner: Uuid,
        title: &str,
        company: &str,
        location: &str,
        job_type: &str,
        description: &str,
    ) -> i64 {
        let mut store = self.store.lock().unwrap();
        store.next_id += 1;
        let id = store.next_id;
        // spread creation times so descending order is unambiguous
        let created_at = (Utc::now() + Duration::seconds(id)).to_rfc3339();
        store.jobs.push(json!({
            "id": id,
            "title": title,
            "company": company,
            "location": location,
            "job_type": job_type,
            "description": description,
            "created_at": created_at,
            "user_id": owner.to_string(),
        }));
        id
    }

    pub fn jobs(&self) -> Vec<Value> {
        self.store.lock().unwrap().jobs.clone()
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

fn authenticated_user(store: &Store, headers: &HeaderMap) -> Option<(Uuid, String)> {
    let token = bearer(headers)?;
    store.tokens.get(&token).cloned()
}

async fn signup(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();
    let mut store = backend.store.lock().unwrap();
    if store.users.contains_key(&email) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "msg": "User already registered" })),
        )
            .into_response();
    }
    let id = Uuid::new_v4();
    store.users.insert(email.clone(), (id, password));
    Json(json!({ "id": id.to_string(), "email": email })).into_response()
}

async fn token(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    let mut store = backend.store.lock().unwrap();
    let granted = match store.users.get(email) {
        Some((id, stored)) if stored == password => Some(*id),
        _ => None,
    };
    match granted {
        Some(id) => {
            let access_token = format!("tok-{}", Uuid::new_v4());
            store
                .tokens
                .insert(access_token.clone(), (id, email.to_string()));
            Json(json!({
                "access_token": access_token,
                "token_type": "bearer",
                "user": { "id": id.to_string(), "email": email },
            }))
            .into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error_description": "Invalid login credentials" })),
        )
            .into_response(),
    }
}

async fn user_info(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    let store = backend.store.lock().unwrap();
    match authenticated_user(&store, &headers) {
        Some((id, email)) => {
            Json(json!({ "id": id.to_string(), "email": email })).into_response()
        }
        None => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "msg": "invalid JWT" })),
        )
            .into_response(),
    }
}

async fn logout(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    if let Some(token) = bearer(&headers) {
        backend.store.lock().unwrap().tokens.remove(&token);
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn health() -> Json<Value> {
    Json(json!({}))
}

fn row_matches(row: &Value, params: &HashMap<String, String>) -> bool {
    for (column, predicate) in params {
        if column == "select" || column == "order" {
            continue;
        }
        let Some(wanted) = predicate.strip_prefix("eq.") else {
            continue;
        };
        let actual = match &row[column.as_str()] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if actual != wanted {
            return false;
        }
    }
    true
}

async fn jobs_select(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let store = backend.store.lock().unwrap();
    let mut rows: Vec<Value> = store
        .jobs
        .iter()
        .filter(|r| row_matches(r, &params))
        .cloned()
        .collect();
    rows.sort_by(|a, b| b["created_at"].as_str().cmp(&a["created_at"].as_str()));

    let wants_object = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains(OBJECT_JSON))
        .unwrap_or(false);
    if wants_object {
        if rows.len() == 1 {
            Json(rows.remove(0)).into_response()
        } else {
            (
                StatusCode::NOT_ACCEPTABLE,
                Json(json!({
                    "code": "PGRST116",
                    "message": "JSON object requested, multiple (or no) rows returned",
                })),
            )
                .into_response()
        }
    } else {
        Json(rows).into_response()
    }
}

async fn jobs_insert(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut store = backend.store.lock().unwrap();
    let Some((user_id, _)) = authenticated_user(&store, &headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "permission denied for table jobs" })),
        )
            .into_response();
    };
    if body["user_id"].as_str() != Some(user_id.to_string().as_str()) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({ "message": "new row violates row-level security policy" })),
        )
            .into_response();
    }
    store.next_id += 1;
    let mut row = body;
    row["id"] = json!(store.next_id);
    store.jobs.push(row.clone());
    (StatusCode::CREATED, Json(row)).into_response()
}

async fn jobs_update(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Response {
    let mut store = backend.store.lock().unwrap();
    let Some((user_id, _)) = authenticated_user(&store, &headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "permission denied for table jobs" })),
        )
            .into_response();
    };
    let owner = user_id.to_string();
    for row in store
        .jobs
        .iter_mut()
        .filter(|r| row_matches(&**r, &params) && r["user_id"].as_str() == Some(owner.as_str()))
    {
        for column in EDITABLE_COLUMNS {
            if let Some(v) = patch.get(column) {
                row[column] = v.clone();
            }
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn jobs_delete(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut store = backend.store.lock().unwrap();
    let Some((user_id, _)) = authenticated_user(&store, &headers) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "permission denied for table jobs" })),
        )
            .into_response();
    };
    let owner = user_id.to_string();
    store
        .jobs
        .retain(|r| !(row_matches(r, &params) && r["user_id"].as_str() == Some(owner.as_str())));
    StatusCode::NO_CONTENT.into_response()
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

pub async fn spawn_backend() -> (String, FakeBackend) {
    let backend = FakeBackend::default();
    let url = serve(backend.router()).await;
    (url, backend)
}

/// The application under test wired to a fresh fake backend. Returns
/// the app's base url, the backend handle for seeding/inspection, and
/// the backend's base url for repository-level tests.
pub async fn spawn_app() -> (String, FakeBackend, String) {
    let (backend_url, backend) = spawn_backend().await;
    let state = AppState::with_backend(Supabase::with_base(&backend_url, ANON_KEY));
    let app_url = serve(build_routes(state)).await;
    (app_url, backend, backend_url)
}

/// Plain client that does not follow redirects, so tests can assert on
/// them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Pull the session cookie pair out of a sign-in response.
pub fn session_cookie(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("sign-in response carries a session cookie")
        .to_string()
}

/// Sign the seeded user in through the app and hand back the cookie to
/// send on protected requests.
pub async fn sign_in(app_url: &str, email: &str, password: &str) -> String {
    let resp = client()
        .post(format!("{app_url}/auth/signin"))
        .form(&[("email", email), ("password", password)])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::SEE_OTHER);
    session_cookie(&resp)
}
