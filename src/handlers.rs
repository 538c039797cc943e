use crate::api::is_sendable_token;
use crate::errors::{AppError, RetryError};
use crate::models::{StatsResponse, TierCounts, TokenForm, UserProfile, VisitorsResponse};
use crate::session::{bearer_token, clear_token, store_token};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::ui::{render_home, render_stats, HomeView, StatsView};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::SignedCookieJar;
use chrono::Local;
use tracing::{info, warn};

pub async fn home(State(state): State<AppState>) -> Html<String> {
    let visitors = state.visitors.count().await;
    Html(render_home(&HomeView {
        error: None,
        log: &[],
        visitors,
    }))
}

pub async fn submit_token(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<TokenForm>,
) -> Response {
    let token = form.bearer.trim();
    if token.is_empty() {
        return home_with_error(&state, jar, StatusCode::BAD_REQUEST, "Please enter a bearer token.", &[]).await;
    }
    if !is_sendable_token(token) {
        return home_with_error(
            &state,
            jar,
            StatusCode::BAD_REQUEST,
            "The token contains characters that cannot be sent.",
            &[],
        )
        .await;
    }

    let report = state.retry.run(|| state.api.fetch_user(token)).await;
    let (status, message) = match report.outcome {
        Ok(_) => {
            info!("token accepted");
            let jar = store_token(jar, token, state.secure_cookies);
            return (jar, Redirect::to("/stats")).into_response();
        }
        Err(RetryError::Unauthorized) => {
            info!("token rejected by remote API");
            (StatusCode::UNAUTHORIZED, "Invalid token.")
        }
        Err(RetryError::Exhausted { .. }) => (StatusCode::BAD_GATEWAY, "Server error after multiple retries."),
        Err(RetryError::Malformed(_)) => (
            StatusCode::BAD_GATEWAY,
            "Server error: the API returned an unexpected response.",
        ),
    };
    home_with_error(&state, jar, status, message, &report.log).await
}

pub async fn stats(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let Some(token) = bearer_token(&jar) else {
        return Redirect::to("/").into_response();
    };

    let Dashboard::Loaded(fetched) = fetch_dashboard(&state, &token).await else {
        warn!("stored token no longer valid, clearing session");
        return (clear_token(jar), Redirect::to("/")).into_response();
    };

    let mut notices = Vec::new();
    let user = match fetched.user {
        Ok(user) => Some(user),
        Err(err) => {
            notices.push(format!("Profile unavailable: {err}."));
            None
        }
    };
    let stats = match fetched.stats {
        Ok(stats) => Some(stats),
        Err(err) => {
            notices.push(format!("Coupon data unavailable: {err}."));
            None
        }
    };
    if user.is_none() && stats.is_none() {
        warn!("both remote fetches failed, sending client back to token entry");
        return Redirect::to("/").into_response();
    }

    let visitors = state.visitors.count().await;
    Html(render_stats(&StatsView {
        user: user.as_ref(),
        stats: stats.as_ref(),
        notices: &notices,
        visitors,
        rendered_at: now_string(),
    }))
    .into_response()
}

pub async fn api_stats(State(state): State<AppState>, jar: SignedCookieJar) -> Response {
    let Some(token) = bearer_token(&jar) else {
        return AppError::unauthorized("no session token").into_response();
    };

    let Dashboard::Loaded(fetched) = fetch_dashboard(&state, &token).await else {
        return (clear_token(jar), AppError::unauthorized("invalid token")).into_response();
    };

    let (user, stats) = match (fetched.user, fetched.stats) {
        (Ok(user), Ok(stats)) => (user, stats),
        (Err(err), _) | (_, Err(err)) => return AppError::bad_gateway(err).into_response(),
    };

    Json(StatsResponse {
        user,
        total: stats.total(),
        stats,
        visitors: state.visitors.count().await,
    })
    .into_response()
}

pub async fn api_visitors(State(state): State<AppState>) -> Json<VisitorsResponse> {
    Json(VisitorsResponse {
        visitors: state.visitors.count().await,
    })
}

struct Fetched {
    user: Result<UserProfile, RetryError>,
    stats: Result<TierCounts, RetryError>,
}

enum Dashboard {
    Revoked,
    Loaded(Fetched),
}

struct SessionRevoked;

// A 401 on either fetch settles the outcome, so the other one is dropped
// instead of running out its retry budget.
async fn fetch_dashboard(state: &AppState, token: &str) -> Dashboard {
    let user = async {
        match state.retry.run(|| state.api.fetch_user(token)).await.outcome {
            Err(RetryError::Unauthorized) => Err(SessionRevoked),
            outcome => Ok(outcome),
        }
    };
    let stats = async {
        match state.retry.run(|| state.api.fetch_garapon(token)).await.outcome {
            Err(RetryError::Unauthorized) => Err(SessionRevoked),
            outcome => Ok(outcome.map(|garapon| build_stats(&garapon.coupons))),
        }
    };

    match tokio::try_join!(user, stats) {
        Ok((user, stats)) => Dashboard::Loaded(Fetched { user, stats }),
        Err(SessionRevoked) => Dashboard::Revoked,
    }
}

/// Re-renders the token form. Any previously stored token is dropped with it.
async fn home_with_error(
    state: &AppState,
    jar: SignedCookieJar,
    status: StatusCode,
    message: &str,
    log: &[String],
) -> Response {
    let visitors = state.visitors.count().await;
    let page = render_home(&HomeView {
        error: Some(message),
        log,
        visitors,
    });
    (status, clear_token(jar), Html(page)).into_response()
}

fn now_string() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
