use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::errors::ApiError;
use crate::retry::RetryPolicy;
use crate::visitors::VisitorTracker;
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub retry: RetryPolicy,
    pub visitors: VisitorTracker,
    pub cookie_key: Key,
    pub secure_cookies: bool,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(config.api_base_url.clone(), config.request_timeout)?,
            retry: config.retry,
            visitors: VisitorTracker::new(),
            cookie_key: config.session_key.clone(),
            secure_cookies: config.secure_cookies,
        })
    }
}

// SignedCookieJar pulls its signing key out of the state.
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
