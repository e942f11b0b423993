// crates/server/src/client.rs
//! Thin HTTP client for Emby-compatible endpoints
//!
//! Every request carries the `X-Emby-Authorization` identity header;
//! authenticated requests add the session's access token.

use crate::auth::AuthSession;
use crate::error::{ServerError, ServerResult};
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

const CLIENT_NAME: &str = "WatchSync";
const DEVICE_ID: &str = "watchsync";

/// HTTP client bound to one server base URL
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: HttpClient,
    base_url: String,
}

impl ServerClient {
    /// Creates a client for the given server URL
    pub fn new(base_url: impl Into<String>) -> ServerResult<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("{}/{}", CLIENT_NAME, env!("CARGO_PKG_VERSION")))
            .build()?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self { http, base_url })
    }

    /// The server base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn identity_header(session: Option<&AuthSession>) -> String {
        let mut value = format!(
            "MediaBrowser Client=\"{}\", Device=\"{}\", DeviceId=\"{}\", Version=\"{}\"",
            CLIENT_NAME,
            CLIENT_NAME,
            DEVICE_ID,
            env!("CARGO_PKG_VERSION")
        );
        if let Some(session) = session {
            value.push_str(&format!(", UserId=\"{}\"", session.user_id));
        }
        value
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        session: Option<&AuthSession>,
    ) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("X-Emby-Authorization", Self::identity_header(session));
        if let Some(session) = session {
            builder = builder.header("X-MediaBrowser-Token", &session.access_token);
        }
        builder
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> ServerResult<reqwest::Response> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }
        Ok(response)
    }

    /// GET a JSON document
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        session: &AuthSession,
    ) -> ServerResult<T> {
        let response = self
            .send(path, self.request(Method::GET, path, Some(session)))
            .await?;
        response
            .json()
            .await
            .map_err(|e| ServerError::UnexpectedResponse {
                details: format!("{}: {}", path, e),
            })
    }

    /// POST a JSON body, discarding the response body
    pub(crate) async fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        session: &AuthSession,
    ) -> ServerResult<()> {
        self.send(path, self.request(Method::POST, path, Some(session)).json(body))
            .await?;
        Ok(())
    }

    /// POST without a body, discarding the response body
    pub(crate) async fn post_empty(&self, path: &str, session: &AuthSession) -> ServerResult<()> {
        self.send(path, self.request(Method::POST, path, Some(session)))
            .await?;
        Ok(())
    }

    /// DELETE, discarding the response body
    pub(crate) async fn delete(&self, path: &str, session: &AuthSession) -> ServerResult<()> {
        self.send(path, self.request(Method::DELETE, path, Some(session)))
            .await?;
        Ok(())
    }

    /// POST a JSON body without a session and decode the JSON response
    pub(crate) async fn post_unauthenticated<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ServerResult<T> {
        let response = self
            .send(path, self.request(Method::POST, path, None).json(body))
            .await?;
        response
            .json()
            .await
            .map_err(|e| ServerError::UnexpectedResponse {
                details: format!("{}: {}", path, e),
            })
    }
}
