//! Google ID-token verification for external sign-in.
//!
//! The token is checked against Google's `tokeninfo` endpoint, which
//! validates the signature and expiry server-side; we additionally require
//! the audience to match our configured OAuth client id.

use serde::Deserialize;

const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Identity extracted from a verified Google ID token.
#[derive(Debug, Clone)]
pub struct GoogleIdentity {
    /// Google's stable subject identifier for the account.
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
}

/// Why verification failed.
#[derive(Debug, thiserror::Error)]
pub enum GoogleAuthError {
    /// The token was rejected or is not for this application.
    #[error("Invalid Google ID token: {0}")]
    Invalid(String),

    /// The tokeninfo endpoint could not be reached.
    #[error("Google token verification request failed: {0}")]
    Network(#[from] reqwest::Error),
}

/// Response shape of the tokeninfo endpoint (fields we care about).
#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: String,
    email_verified: Option<String>,
    name: Option<String>,
}

/// Verify `id_token` and return the identity it asserts.
pub async fn verify_id_token(
    http: &reqwest::Client,
    id_token: &str,
    client_id: &str,
) -> Result<GoogleIdentity, GoogleAuthError> {
    let response = http
        .get(TOKENINFO_URL)
        .query(&[("id_token", id_token)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(GoogleAuthError::Invalid(
            "token rejected by Google".to_string(),
        ));
    }

    let info: TokenInfo = response.json().await?;

    if info.aud != client_id {
        return Err(GoogleAuthError::Invalid(
            "token audience does not match this application".to_string(),
        ));
    }
    if info.email_verified.as_deref() != Some("true") {
        return Err(GoogleAuthError::Invalid(
            "Google account email is not verified".to_string(),
        ));
    }

    Ok(GoogleIdentity {
        sub: info.sub,
        email: info.email,
        name: info.name,
    })
}
