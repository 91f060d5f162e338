//! HTTP classifier client.
//!
//! Speaks the Classifier Service's JSON protocol: POST the encoded
//! still to `<base>/recycle/classify` with an optional bearer token,
//! read back a [`ClassifierResponse`]. Transport and service errors
//! surface as `FailureKind::Classification` with the response body (or
//! `HTTP <status>` when the body is empty) as the message.

use std::time::Duration;

use serde::Serialize;
use url::Url;

use crate::classify::{ClassifierResponse, ClassifierService, EncodedCapture};
use crate::ScanFailure;

const CLASSIFY_PATH: &str = "recycle/classify";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Clone, Debug)]
pub struct HttpClassifierConfig {
    /// Service base URL, e.g. "http://127.0.0.1:8000".
    pub base_url: String,
    /// Optional bearer token.
    pub token: Option<String>,
    /// Overall per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    image_data: &'a str,
}

pub struct HttpClassifier {
    endpoint: Url,
    token: Option<String>,
    agent: ureq::Agent,
}

impl HttpClassifier {
    pub fn new(config: HttpClassifierConfig) -> Result<Self, ScanFailure> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            ScanFailure::classification(format!("invalid service url '{}': {e}", config.base_url))
        })?;
        let endpoint = base.join(CLASSIFY_PATH).map_err(|e| {
            ScanFailure::classification(format!("invalid service url '{}': {e}", config.base_url))
        })?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Ok(Self {
            endpoint,
            token: config.token,
            agent,
        })
    }
}

impl ClassifierService for HttpClassifier {
    fn name(&self) -> &'static str {
        "http"
    }

    fn classify(&mut self, capture: &EncodedCapture) -> Result<ClassifierResponse, ScanFailure> {
        let mut request = self
            .agent
            .post(self.endpoint.as_str())
            .set("Content-Type", "application/json");
        if let Some(token) = &self.token {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let body = ClassifyRequest {
            image_data: &capture.image_data,
        };

        let response = match request.send_json(&body) {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let detail = response
                    .into_string()
                    .ok()
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| format!("HTTP {status}"));
                return Err(ScanFailure::classification(detail));
            }
            Err(e) => return Err(ScanFailure::classification(e.to_string())),
        };

        response
            .into_json::<ClassifierResponse>()
            .map_err(|e| ScanFailure::classification(format!("malformed service response: {e}")))
    }
}
