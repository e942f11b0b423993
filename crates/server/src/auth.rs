// crates/server/src/auth.rs
//! Per-account authentication

use crate::client::ServerClient;
use crate::error::{ServerError, ServerResult};
use log::info;
use serde::{Deserialize, Serialize};
use watchsync_core::AccountId;

/// Credentials exchanged for an access token and user id
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Server-side user id for the account
    pub user_id: AccountId,
    /// Bearer token for subsequent requests
    pub access_token: String,
    /// Username the session was created for
    pub username: String,
}

#[derive(Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "Username")]
    username: &'a str,
    #[serde(rename = "Pw")]
    pw: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(rename = "AccessToken")]
    access_token: Option<String>,
    #[serde(rename = "User")]
    user: Option<AuthUser>,
}

#[derive(Deserialize)]
struct AuthUser {
    #[serde(rename = "Id")]
    id: String,
}

/// Authenticates one account by name and password
pub async fn authenticate(
    client: &ServerClient,
    username: &str,
    password: &str,
) -> ServerResult<AuthSession> {
    let body = AuthRequest {
        username,
        pw: password,
    };

    let response: AuthResponse = client
        .post_unauthenticated("/Users/AuthenticateByName", &body)
        .await
        .map_err(|err| match err {
            // A rejected login surfaces as 401 rather than a transport error.
            ServerError::Status { status: 401, .. } => ServerError::Auth {
                username: username.to_string(),
            },
            other => other,
        })?;

    let (token, user) = match (response.access_token, response.user) {
        (Some(token), Some(user)) => (token, user),
        _ => {
            return Err(ServerError::Auth {
                username: username.to_string(),
            })
        }
    };

    info!("authenticated '{}' as user {}", username, user.id);

    Ok(AuthSession {
        user_id: AccountId::new(user.id),
        access_token: token,
        username: username.to_string(),
    })
}
