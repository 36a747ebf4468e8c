use std::sync::Arc;

use crate::pkg::internal::supabase::Supabase;

/// Shared handles only. Each request owns the rows it fetched; nothing
/// is cached between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    pub supabase: Arc<Supabase>,
}

impl AppState {
    pub fn new() -> AppState {
        AppState::with_backend(Supabase::new())
    }

    pub fn with_backend(supabase: Supabase) -> AppState {
        AppState {
            supabase: Arc::new(supabase),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new()
    }
}
