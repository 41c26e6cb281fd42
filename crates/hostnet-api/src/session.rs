// Session login/logout
//
// `POST /api/session` with HTTP Basic credentials answers with a JSON
// string token; the token is attached to every later request through the
// session header. `DELETE /api/session` invalidates it.

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;

impl ApiClient {
    /// Authenticate and keep the session token for subsequent calls.
    ///
    /// A 404 on the session endpoint means the server is reachable but
    /// does not expose the management API, reported as
    /// [`Error::ApiUnavailable`].
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint(&["session"])?;
        debug!(username, "logging in at {}", url);

        let resp = self
            .http()
            .post(url.clone())
            .basic_auth(username, Some(password.expose_secret()))
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::ApiUnavailable {
                url: self.base_url().to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let token: String = Self::decode(resp).await?;
        self.set_session(SecretString::from(token));

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    ///
    /// The local token is dropped even if the server call fails.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(&["session"])?;
        debug!("logging out at {}", url);

        let result = self.delete(url).await;
        self.clear_session();

        debug!("logout complete");
        result
    }
}
