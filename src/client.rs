//! Queue manager API client: job submission and connectivity probes.

use crate::category;
use crate::config::SabConfig;
use crate::error::Result;
use crate::response::{ApiOutcome, NO_DATA};
use crate::types::{DownloadJob, JobPayload};
use crate::wake;
use reqwest::multipart;
use serde_json::Value;
use url::Url;

/// Priority values understood by the API: forced jumps the queue, normal
/// does not.
const PRIORITY_FORCED: &str = "2";
const PRIORITY_NORMAL: &str = "1";

/// Client for a SABnzbd-compatible download manager.
///
/// Holds one HTTP session that is reused across calls; the session is safe
/// for concurrent use, so a client can be shared freely. Certificate
/// verification is disabled so self-signed local endpoints work out of the
/// box. That is a deliberate trade-off inherited from the deployments this
/// client targets: do not point it at hosts you do not control.
#[derive(Clone, Debug)]
pub struct SabClient {
    config: SabConfig,
    http: reqwest::Client,
}

impl SabClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be built.
    pub fn new(config: SabConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { config, http })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &SabConfig {
        &self.config
    }

    /// Submit a download job to the queue manager.
    ///
    /// Resolves the queue category, makes a best-effort attempt to wake a
    /// sleeping host, and issues the API call for the job's payload mode:
    /// `addurl` as a GET with the reference URL, `addfile` as a multipart
    /// POST carrying the raw NZB. A transport failure is reported as an
    /// [`ApiOutcome::Failure`] rather than an error; submission performs no
    /// retries of its own.
    ///
    /// # Errors
    ///
    /// Returns an error only when the configured base URL is unusable.
    pub async fn submit(&self, job: &DownloadJob) -> Result<ApiOutcome> {
        let category = category::resolve(job, &self.config.categories);

        wake::ensure_awake(&self.config.endpoint, &self.config.wake).await;

        let credentials = &self.config.credentials;
        let mut params = base_params(
            credentials.username.as_deref(),
            credentials.password.as_deref(),
            credentials.api_key.as_deref(),
        );

        if let Some(category) = &category {
            params.push(("cat", category.clone()));
        }

        if job.high_priority {
            let priority = if self.config.forced_priority {
                PRIORITY_FORCED
            } else {
                PRIORITY_NORMAL
            };
            params.push(("priority", priority.to_string()));
        }

        tracing::info!(name = %job.name, category = ?category, "sending NZB to the queue manager");
        let url = api_url(&self.config.endpoint.host)?;

        let request = match &job.payload {
            JobPayload::UrlReference(nzb_url) => {
                params.push(("mode", "addurl".to_string()));
                params.push(("name", nzb_url.clone()));
                self.http.get(url).query(&params)
            }
            JobPayload::InlineData(data) => {
                params.push(("mode", "addfile".to_string()));
                let part = multipart::Part::bytes(data.clone())
                    .file_name(format!("{}.nzb", job.name));
                let form = multipart::Form::new().part("nzbfile", part);
                self.http.post(url).query(&params).multipart(form)
            }
        };

        Ok(dispatch(request).await)
    }

    /// Check whether explicit connection details are accepted by the API.
    ///
    /// Issues a `queue` status request with the given credentials, ignoring
    /// whatever the client was configured with. Returns `(true, "Success")`
    /// when the API accepts the call, and `(false, message)` with the
    /// server's message (or the generic no-data message) otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error only when `host` is not a usable base URL.
    pub async fn test_authentication(
        &self,
        host: &str,
        username: Option<&str>,
        password: Option<&str>,
        api_key: Option<&str>,
    ) -> Result<(bool, String)> {
        let mut params = base_params(username, password, api_key);
        params.push(("mode", "queue".to_string()));

        let url = api_url(host)?;
        match dispatch(self.http.get(url).query(&params)).await {
            ApiOutcome::Success(_) => Ok((true, "Success".to_string())),
            ApiOutcome::Failure(message) => Ok((false, message)),
        }
    }

    /// Ask the API which authentication method it expects.
    ///
    /// Returns the raw validated reply; no method value is parsed out of
    /// it, since the reply schema is not part of the API contract this
    /// client relies on.
    ///
    /// # Errors
    ///
    /// Returns an error only when `host` is not a usable base URL.
    pub async fn discover_auth_method(&self, host: &str) -> Result<ApiOutcome> {
        let params = [("mode", "auth"), ("output", "json")];
        let url = api_url(host)?;
        Ok(dispatch(self.http.get(url).query(&params)).await)
    }
}

/// Query parameters common to every API call: the JSON output selector and
/// whichever credential parts are present and non-empty.
fn base_params(
    username: Option<&str>,
    password: Option<&str>,
    api_key: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![("output", "json".to_string())];
    if let Some(username) = username.filter(|s| !s.is_empty()) {
        params.push(("ma_username", username.to_string()));
    }
    if let Some(password) = password.filter(|s| !s.is_empty()) {
        params.push(("ma_password", password.to_string()));
    }
    if let Some(api_key) = api_key.filter(|s| !s.is_empty()) {
        params.push(("apikey", api_key.to_string()));
    }
    params
}

/// The API entry point under the given base URL.
fn api_url(host: &str) -> Result<Url> {
    Ok(Url::parse(host)?.join("api")?)
}

/// Send a prepared request and fold the reply into an outcome.
///
/// Any transport-level failure (connection error, HTTP error status,
/// undecodable body) collapses into the generic no-data failure.
async fn dispatch(request: reqwest::RequestBuilder) -> ApiOutcome {
    let payload = match request.send().await.and_then(|r| r.error_for_status()) {
        Ok(response) => response.json::<Value>().await,
        Err(err) => Err(err),
    };

    match payload {
        Ok(payload) => {
            tracing::debug!(payload = %payload, "queue manager reply");
            ApiOutcome::from_payload(payload)
        }
        Err(err) => {
            tracing::warn!(error = %err, "error connecting to the queue manager");
            ApiOutcome::Failure(NO_DATA.to_string())
        }
    }
}
