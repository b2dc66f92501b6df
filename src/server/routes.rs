//! Request handlers.
//!
//! Protected handlers take the caller's `Identity` from the request
//! extensions set by the session middleware, never from the request itself.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Extension, Form, Json,
};
use chrono::Local;
use fueltrack_core::{Dashboard, Identity, Journal, MealEntry};
use serde::{Deserialize, Serialize};

use super::auth::{expired_session_cookie, session_cookie, session_token};
use super::{AppError, AppState};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint (no auth required)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Describes the fields a form posts back.
#[derive(Serialize)]
pub struct FormDescriptor {
    form: &'static str,
    action: &'static str,
    fields: [&'static str; 2],
}

pub async fn login_form() -> Json<FormDescriptor> {
    Json(FormDescriptor {
        form: "login",
        action: "/login",
        fields: ["username", "password"],
    })
}

pub async fn register_form() -> Json<FormDescriptor> {
    Json(FormDescriptor {
        form: "register",
        action: "/register",
        fields: ["username", "password"],
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let token = state.gate.login(&form.username, &form.password)?;
    Ok(start_session(&state, &token))
}

/// Creates the account and logs it in.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, AppError> {
    let token = state.gate.register(&form.username, &form.password)?;
    Ok(start_session(&state, &token))
}

fn start_session(state: &AppState, token: &str) -> Response {
    let cookie = session_cookie(token, state.gate.sessions().ttl());
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.gate.logout(&token);
    }

    (
        [(header::SET_COOKIE, expired_session_cookie())],
        Redirect::to("/login"),
    )
        .into_response()
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Json<Dashboard> {
    let journal = Journal::new(&state.meals, &identity);
    Json(journal.dashboard(Local::now().naive_local()))
}

/// Raw meal form; amounts arrive as text and are coerced, never rejected.
#[derive(Debug, Default, Deserialize)]
pub struct AddMealForm {
    meal_name: Option<String>,
    calories: Option<String>,
    protein: Option<String>,
}

pub async fn add_meal(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<AddMealForm>,
) -> Result<Redirect, AppError> {
    let entry = MealEntry::from_form(
        form.meal_name.as_deref(),
        form.calories.as_deref(),
        form.protein.as_deref(),
    );

    Journal::new(&state.meals, &identity).log_meal(entry, Local::now().naive_local())?;
    Ok(Redirect::to("/"))
}

pub async fn reset(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Redirect, AppError> {
    Journal::new(&state.meals, &identity).reset()?;
    Ok(Redirect::to("/"))
}
