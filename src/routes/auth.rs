//! Identity: per-session acting-user resolution and the Google
//! authorization-code flow (PKCE + CSRF state kept in the session).

use axum::{
    extract::{Query, State},
    response::Redirect,
    Json,
};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet, EndpointSet,
    PkceCodeChallenge, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::config::{AuthMode, GoogleConfig};
use crate::db::users;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::AppState;

/// Session key holding the acting user's id
const SESSION_USER_ID_KEY: &str = "user_id";
/// Session keys holding in-flight OAuth handshake state
const OAUTH_STATE_KEY: &str = "oauth_state";
const PKCE_VERIFIER_KEY: &str = "pkce_verifier";

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Resolve the acting user's id for this request
///
/// Local variant: the session's active user, defaulting to the configured
/// initial id. Google variant: the logged-in user, or a redirect to /login.
pub async fn current_user_id(session: &Session, state: &AppState) -> Result<i32> {
    match session.get::<i32>(SESSION_USER_ID_KEY).await? {
        Some(id) => Ok(id),
        None => match state.config.auth_mode {
            AuthMode::Local => Ok(state.config.initial_user_id),
            AuthMode::Google => Err(AppError::Unauthenticated),
        },
    }
}

/// Rehydrate the full user row for this request's session
pub async fn current_user(session: &Session, state: &AppState) -> Result<User> {
    let id = current_user_id(session, state).await?;
    users::find(&state.pool, id)
        .await?
        .ok_or(AppError::Unauthenticated)
}

/// Store the acting user's id in the session
pub async fn set_active_user(session: &Session, id: i32) -> Result<()> {
    session.insert(SESSION_USER_ID_KEY, id).await?;
    Ok(())
}

/// OAuth client type with auth URL and token URL set
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

fn oauth_client(google: &GoogleConfig) -> Result<ConfiguredClient> {
    let auth_url =
        AuthUrl::new(GOOGLE_AUTH_URL.to_string()).map_err(|e| AppError::OAuth(e.to_string()))?;
    let token_url =
        TokenUrl::new(GOOGLE_TOKEN_URL.to_string()).map_err(|e| AppError::OAuth(e.to_string()))?;
    let redirect_url = RedirectUrl::new(google.redirect_url.clone())
        .map_err(|e| AppError::OAuth(e.to_string()))?;

    Ok(BasicClient::new(ClientId::new(google.client_id.clone()))
        .set_client_secret(ClientSecret::new(google.client_secret.clone()))
        .set_auth_uri(auth_url)
        .set_token_uri(token_url)
        .set_redirect_uri(redirect_url))
}

fn google_config(state: &AppState) -> Result<&GoogleConfig> {
    state
        .config
        .google
        .as_ref()
        .ok_or_else(|| AppError::OAuth("Google OAuth is not configured".to_string()))
}

/// Google user info from the userinfo API
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    email: String,
    name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    #[serde(rename = "authUrl")]
    pub auth_url: String,
}

/// Login page view-model
pub async fn login_page() -> Json<LoginResponse> {
    Json(LoginResponse {
        message: "Sign in with Google to track your books".to_string(),
        auth_url: "/auth/google".to_string(),
    })
}

/// Start the authorization-code flow: build the Google authorization URL with
/// PKCE, stash state and verifier in the session, redirect
pub async fn google_login(State(state): State<AppState>, session: Session) -> Result<Redirect> {
    let client = oauth_client(google_config(&state)?)?;

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    session
        .insert(OAUTH_STATE_KEY, csrf_state.secret())
        .await?;
    session
        .insert(PKCE_VERIFIER_KEY, pkce_verifier.secret())
        .await?;

    Ok(Redirect::to(auth_url.as_str()))
}

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

/// Handle the provider callback: validate CSRF state, exchange the code,
/// fetch the profile, auto-provision on first login, log the session in
pub async fn google_callback(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CallbackParams>,
) -> Result<Redirect> {
    let client = oauth_client(google_config(&state)?)?;

    let expected_state: Option<String> = session.remove(OAUTH_STATE_KEY).await?;
    let verifier: Option<String> = session.remove(PKCE_VERIFIER_KEY).await?;

    if expected_state.as_deref() != Some(params.state.as_str()) {
        tracing::warn!("OAuth callback with mismatched state");
        return Err(AppError::OAuth("OAuth state mismatch".to_string()));
    }
    let verifier =
        verifier.ok_or_else(|| AppError::OAuth("Missing PKCE verifier".to_string()))?;

    let http_client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .map_err(|e| AppError::OAuth(e.to_string()))?;

    let token = client
        .exchange_code(AuthorizationCode::new(params.code))
        .set_pkce_verifier(PkceCodeVerifier::new(verifier))
        .request_async(&http_client)
        .await
        .map_err(|e| AppError::OAuth(format!("Token exchange failed: {e}")))?;

    let profile: GoogleProfile = http_client
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(token.access_token().secret())
        .send()
        .await
        .map_err(|e| AppError::OAuth(format!("Userinfo request failed: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::OAuth(format!("Userinfo response invalid: {e}")))?;

    // Lookup by provider id only; a second identity with the same email
    // creates a second, distinct user
    let user = match users::find_by_google_id(&state.pool, &profile.id).await? {
        Some(user) => user,
        None => {
            let name = profile.name.as_deref().unwrap_or(&profile.email);
            users::create_from_google(&state.pool, name, &profile.email, &profile.id).await?
        }
    };

    set_active_user(&session, user.id).await?;
    tracing::info!("User {} logged in via Google", user.id);

    Ok(Redirect::to("/"))
}

/// Clear the session and return to the login page
pub async fn logout(session: Session) -> Result<Redirect> {
    session.flush().await?;
    Ok(Redirect::to("/login"))
}
