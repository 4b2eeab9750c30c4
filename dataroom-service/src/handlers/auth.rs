use crate::dtos::{AuthStatusResponse, LoginResponse, OAuthCallbackParams, SuccessResponse};
use crate::startup::AppState;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect},
    Json,
};
use service_core::error::AppError;

pub async fn auth_status(
    State(state): State<AppState>,
) -> Result<Json<AuthStatusResponse>, AppError> {
    let authenticated = state.tokens.is_authenticated().await?;
    Ok(Json(AuthStatusResponse { authenticated }))
}

pub async fn auth_login(State(state): State<AppState>) -> Json<LoginResponse> {
    if !state.oauth.is_configured() {
        tracing::warn!("Google OAuth credentials are not configured; login will fail at Google");
    }

    let request = state.oauth_states.begin();
    let auth_url = state
        .oauth
        .authorization_url(&request.state, &request.code_challenge);

    Json(LoginResponse { auth_url })
}

/// Google redirects the browser here; every outcome redirects back to the frontend.
pub async fn auth_callback(
    State(state): State<AppState>,
    Query(params): Query<OAuthCallbackParams>,
) -> impl IntoResponse {
    let frontend = state.config.frontend_url.trim_end_matches('/');
    let fail = |reason: &str| {
        Redirect::to(&format!(
            "{}?error={}",
            frontend,
            urlencoding::encode(reason)
        ))
    };

    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error, "Google returned an OAuth error");
        return fail(error);
    }

    let Some(code) = params.code.as_deref().filter(|c| !c.is_empty()) else {
        return fail("no_code");
    };

    let Some(code_verifier) = params
        .state
        .as_deref()
        .and_then(|s| state.oauth_states.complete(s))
    else {
        tracing::warn!("OAuth callback with unknown or expired state");
        return fail("invalid_state");
    };

    let grant = match state.oauth.exchange_code(code, &code_verifier).await {
        Ok(grant) => grant,
        Err(e) => {
            tracing::error!(error = %e, "OAuth code exchange failed");
            return fail(&e.to_string());
        }
    };

    if let Err(e) = state.tokens.store_grant(&grant).await {
        tracing::error!(error = %e, "Failed to store OAuth tokens");
        return fail(&e.to_string());
    }

    tracing::info!("Google Drive connected");
    Redirect::to(&format!("{}?success=true", frontend))
}

pub async fn auth_logout(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.tokens.clear().await?;
    Ok(Json(SuccessResponse::ok()))
}
