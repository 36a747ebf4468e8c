use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    conf::settings,
    pkg::internal::auth::User,
    prelude::{Error, Result},
};

/// PostgREST error code for "zero rows where exactly one was requested".
pub const NO_ROW_CODE: &str = "PGRST116";

const OBJECT_JSON: &str = "application/vnd.pgrst.object+json";

/// Handle to the external auth/data backend. Auth operations go to the
/// GoTrue surface under `/auth/v1`, row operations to the PostgREST
/// surface under `/rest/v1`. This is the only module that sees the wire
/// error envelope; everything above it works with typed kinds.
#[derive(Debug, Clone)]
pub struct Supabase {
    http: Client,
    base_url: String,
    anon_key: String,
}

/// Successful password grant: the token the session cookie will carry,
/// plus the identity it belongs to.
#[derive(Debug, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    pub user: User,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    // data plane
    code: Option<String>,
    message: Option<String>,
    // auth plane
    error_description: Option<String>,
    msg: Option<String>,
}

impl Supabase {
    pub fn new() -> Self {
        Self::with_base(&settings.supabase_url, &settings.supabase_anon_key)
    }

    pub fn with_base(base_url: &str, anon_key: &str) -> Self {
        Supabase {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Every call carries the anon key; the bearer slot is the user's
    /// token when one is in play, so the backend can apply its row
    /// ownership rules, and the anon key otherwise.
    fn authorize(&self, req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .bearer_auth(token.unwrap_or(&self.anon_key))
    }

    async fn deliver<T: DeserializeOwned>(req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(resp.json::<T>().await?)
        } else {
            let envelope = resp.json::<ErrorEnvelope>().await.unwrap_or_default();
            Err(classify(status, envelope))
        }
    }

    async fn deliver_empty(req: RequestBuilder) -> Result<()> {
        let resp = req.send().await?;
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            let envelope = resp.json::<ErrorEnvelope>().await.unwrap_or_default();
            Err(classify(status, envelope))
        }
    }

    // --- auth surface ---

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<()> {
        tracing::debug!("signing up {}", email);
        let req = self
            .authorize(self.http.post(self.auth_url("signup")), None)
            .json(&serde_json::json!({ "email": email, "password": password }));
        Self::deliver_empty(req).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenGrant> {
        let req = self
            .authorize(self.http.post(self.auth_url("token")), None)
            .query(&[("grant_type", "password")])
            .json(&serde_json::json!({ "email": email, "password": password }));
        Self::deliver(req).await
    }

    pub async fn current_user(&self, access_token: &str) -> Result<User> {
        let req = self.authorize(self.http.get(self.auth_url("user")), Some(access_token));
        Self::deliver(req).await
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let req = self.authorize(self.http.post(self.auth_url("logout")), Some(access_token));
        Self::deliver_empty(req).await
    }

    pub async fn health(&self) -> Result<()> {
        let req = self.authorize(self.http.get(self.auth_url("health")), None);
        Self::deliver_empty(req).await
    }

    // --- data surface ---

    pub async fn select_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let req = self
            .authorize(self.http.get(self.rest_url(table)), None)
            .query(query);
        Self::deliver(req).await
    }

    /// Single-object read. The backend answers with `PGRST116` when no
    /// row matches, which [`classify`] turns into [`Error::NotFound`].
    pub async fn select_row<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let req = self
            .authorize(self.http.get(self.rest_url(table)), None)
            .header(header::ACCEPT, OBJECT_JSON)
            .query(query);
        Self::deliver(req).await
    }

    pub async fn insert_row<T: DeserializeOwned, B: Serialize>(
        &self,
        table: &str,
        row: &B,
        access_token: &str,
    ) -> Result<T> {
        let req = self
            .authorize(self.http.post(self.rest_url(table)), Some(access_token))
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, OBJECT_JSON)
            .json(row);
        Self::deliver(req).await
    }

    pub async fn update_rows<B: Serialize>(
        &self,
        table: &str,
        query: &[(&str, String)],
        patch: &B,
        access_token: &str,
    ) -> Result<()> {
        let req = self
            .authorize(self.http.patch(self.rest_url(table)), Some(access_token))
            .query(query)
            .json(patch);
        Self::deliver_empty(req).await
    }

    pub async fn delete_rows(
        &self,
        table: &str,
        query: &[(&str, String)],
        access_token: &str,
    ) -> Result<()> {
        let req = self
            .authorize(self.http.delete(self.rest_url(table)), Some(access_token))
            .query(query);
        Self::deliver_empty(req).await
    }
}

/// Map a non-2xx wire answer to a typed failure kind. The no-row code
/// wins over the status line so "not found" stays distinguishable from
/// every other failure on single-record lookups.
fn classify(status: StatusCode, envelope: ErrorEnvelope) -> Error {
    let message = envelope
        .message
        .or(envelope.error_description)
        .or(envelope.msg)
        .unwrap_or_else(|| status.to_string());
    if envelope.code.as_deref() == Some(NO_ROW_CODE) {
        return Error::NotFound;
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authorization(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::Validation(message),
        StatusCode::NOT_FOUND => Error::NotFound,
        _ => Error::Unknown(message),
    }
}
