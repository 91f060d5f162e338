//! Classifier Service seam.
//!
//! The remote classifier is a collaborator, not part of the kernel: it
//! consumes a base64-encoded still image and returns one
//! [`ClassifierResponse`]. Everything numeric in that response is
//! untrusted input (see `guard`); `item_type` and `recyclable` are
//! treated as authoritative.
//!
//! Implementations:
//! - `HttpClassifier` (feature `classifier-http`): the production
//!   HTTP/JSON client.
//! - `StubClassifier`: scriptable in-process stand-in for tests and
//!   the demo binary.

#[cfg(feature = "classifier-http")]
pub mod http;
pub mod stub;

#[cfg(feature = "classifier-http")]
pub use http::{HttpClassifier, HttpClassifierConfig};
pub use stub::StubClassifier;

use serde::{Deserialize, Serialize};

use crate::ScanFailure;

/// Raw response shape of the Classifier Service.
///
/// Produced once per capture and never mutated. `confidence` and
/// `co2_impact` are untrusted and must pass through the numeric
/// guards before display.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct ClassifierResponse {
    pub item_type: String,
    pub confidence: f64,
    pub recyclable: bool,
    pub co2_impact: f64,
    /// Normalized [x1, y1, x2, y2]; usable only with >= 4 elements.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    /// True when the service fell back to a degraded model (typically
    /// without localization).
    #[serde(default)]
    pub fallback_model: bool,
    /// Server-side storage path for the uploaded still, when the
    /// service retained it for training. Informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,
}

/// A capture encoded for transport (base64 JPEG).
#[derive(Clone, Debug)]
pub struct EncodedCapture {
    pub image_data: String,
}

/// Remote classification seam.
///
/// `classify` blocks until the service responds; the scan lifecycle
/// stays in `Classifying` for the duration and the host feeds the
/// outcome back with the generation token it was handed at dispatch.
pub trait ClassifierService {
    /// Human-readable identifier for logs.
    fn name(&self) -> &'static str;

    /// Classify one encoded still.
    fn classify(&mut self, capture: &EncodedCapture) -> Result<ClassifierResponse, ScanFailure>;
}
