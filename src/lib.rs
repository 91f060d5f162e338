//! EcoSort Scan Kernel
//!
//! This crate implements the scan result processing pipeline behind the
//! EcoSort recycling assistant: everything between "the camera produced
//! a still" and "the surface has render-ready guidance".
//!
//! # Architecture
//!
//! A capture event yields an encoded still; the lifecycle dispatches it
//! to the remote Classifier Service; the raw response is composed into
//! an immutable `ScanInsight`; overlay geometry projects its bounding
//! box onto the current viewport. A rescan cancels in-flight work and
//! returns to idle.
//!
//! # Module Structure
//!
//! - `guard`: numeric sanitization for untrusted service fields
//! - `material`: ordered material rule engine + guidance copy
//! - `insight`: insight composition (pure, deterministic)
//! - `lifecycle`: the scan state machine with generation-token
//!   cancellation
//! - `motion`: per-session animation timelines
//! - `overlay`: bounding-box-to-screen geometry
//! - `classify`: Classifier Service seam (HTTP client + stub)
//! - `capture`: still-capture seam (camera trait + stub)
//! - `config`: runtime configuration for the binaries
//! - `history`: local scan history journal
//!
//! The kernel never draws and never blocks except inside a
//! `ClassifierService::classify` call made by the host between capture
//! and completion delivery.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod capture;
pub mod classify;
pub mod config;
pub mod guard;
pub mod history;
pub mod insight;
pub mod lifecycle;
pub mod material;
pub mod overlay;

mod motion;

pub use capture::{CaptureSource, CapturedImage, StubCamera};
#[cfg(feature = "classifier-http")]
pub use classify::{HttpClassifier, HttpClassifierConfig};
pub use classify::{ClassifierResponse, ClassifierService, EncodedCapture, StubClassifier};
pub use config::ScanConfig;
pub use history::{ScanHistory, ScanRecord};
pub use insight::{compose, ScanInsight};
pub use lifecycle::{
    CaptureGate, ClassificationTicket, Completion, ScanLifecycle, ScanState, ALIGN_PROMPT,
};
pub use material::{classify as classify_material, format_item_name, MaterialProfile};
pub use motion::{MotionState, SheetPose};
pub use overlay::{
    compute_overlay, place_panel, CornerAnchors, OverlayRect, PanelPlacement, Point, Viewport,
};

pub(crate) fn now_s() -> Result<u64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs())
}

// -------------------- Failure taxonomy --------------------

/// Where a scan failed.
///
/// Malformed-but-parseable responses are deliberately absent: numeric
/// and classification anomalies inside a successful response reflect
/// detector uncertainty, not failure, and are recovered silently by
/// the guards.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Device/camera could not produce a still.
    Capture,
    /// The Classifier Service errored or timed out.
    Classification,
}

/// A user-visible scan failure.
///
/// Surfaced once as a single alert ([`ScanFailure::alert_text`]), then
/// the lifecycle resets to idle. Never retried automatically.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ScanFailure {
    pub fn capture(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Capture,
            message: message.into(),
        }
    }

    pub fn classification(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Classification,
            message: message.into(),
        }
    }

    /// The one alert shown to the user for this failure.
    pub fn alert_text(&self) -> String {
        match self.kind {
            FailureKind::Capture => self.message.clone(),
            FailureKind::Classification => format!(
                "Unable to analyze the item: {}. Please ensure the item is clearly visible, \
                 well-lit, and try again.",
                self.message
            ),
        }
    }
}

impl std::fmt::Display for ScanFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            FailureKind::Capture => write!(f, "capture failure: {}", self.message),
            FailureKind::Classification => write!(f, "classification failure: {}", self.message),
        }
    }
}

impl std::error::Error for ScanFailure {}
