// Management API HTTP client
//
// Wraps `reqwest::Client` with session-header injection, URL construction
// from path segments, and error-envelope decoding. Endpoint groups
// (session, hosts, networking, vms) are implemented as inherent methods in
// separate files to keep this module focused on transport mechanics.

use std::sync::RwLock;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorBody;
use crate::transport::TransportConfig;

/// Header carrying the session token on every authenticated request.
pub const SESSION_HEADER: &str = "vmware-api-session-id";

/// HTTP client for one management endpoint (a vCenter server or a
/// standalone host).
///
/// The session token obtained by [`login`](Self::login) is kept in the
/// client and attached to every subsequent request.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `https://vcenter.lab.local`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            session: RwLock::new(None),
        }
    }

    /// The endpoint base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Whether a session token is currently held.
    pub fn has_session(&self) -> bool {
        self.session.read().expect("session lock poisoned").is_some()
    }

    // ── Session token ────────────────────────────────────────────────

    pub(crate) fn set_session(&self, token: SecretString) {
        debug!("storing session token");
        *self.session.write().expect("session lock poisoned") = Some(token);
    }

    pub(crate) fn clear_session(&self) {
        *self.session.write().expect("session lock poisoned") = None;
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder, Error> {
        let guard = self.session.read().expect("session lock poisoned");
        match guard.as_ref() {
            Some(token) => Ok(builder.header(SESSION_HEADER, token.expose_secret())),
            None => Err(Error::NotLoggedIn),
        }
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Build `{base}/api/{segments...}`, percent-encoding each segment.
    ///
    /// Portgroup names routinely contain spaces ("VM Network"), so paths
    /// are assembled segment by segment rather than by string formatting.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.authorize(self.http.get(url))?.send().await?;
        let resp = Self::check(resp).await?;
        Self::decode(resp).await
    }

    /// Like [`get`](Self::get), but a 404 yields `Ok(None)`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, Error> {
        match self.get(url).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Send an authenticated POST with an optional JSON body, discarding
    /// the response body.
    pub(crate) async fn post(
        &self,
        url: Url,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<(), Error> {
        debug!("POST {}", url);
        let mut builder = self.http.post(url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let resp = self.authorize(builder)?.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Send an authenticated PATCH with a JSON body, discarding the
    /// response body.
    pub(crate) async fn patch(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("PATCH {}", url);
        let resp = self.authorize(self.http.patch(url).json(body))?.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Send an authenticated PATCH with a JSON body and decode the answer.
    pub(crate) async fn patch_json<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("PATCH {}", url);
        let resp = self.authorize(self.http.patch(url).json(body))?.send().await?;
        let resp = Self::check(resp).await?;
        Self::decode(resp).await
    }

    /// Send an authenticated DELETE.
    pub(crate) async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let resp = self.authorize(self.http.delete(url))?.send().await?;
        Self::check(resp).await?;
        Ok(())
    }

    // ── Response handling ────────────────────────────────────────────

    /// Turn non-2xx responses into `Error`, parsing the error envelope
    /// when one is present.
    pub(crate) async fn check(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();
        trace!(%status, "response received");

        if status.is_success() {
            return Ok(resp);
        }

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorBody>(&body).ok();

        let error_type = parsed
            .as_ref()
            .and_then(|b| b.error_type.clone())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("ERROR").to_uppercase());
        let message = parsed
            .as_ref()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| body.chars().take(200).collect());

        Err(Error::Api {
            status: status.as_u16(),
            error_type,
            message,
        })
    }

    pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })
    }
}
