//! Stub classifier for tests and the demo binary.

use std::collections::VecDeque;

use crate::classify::{ClassifierResponse, ClassifierService, EncodedCapture};
use crate::ScanFailure;

/// Scriptable in-process classifier.
///
/// With no script it cycles a small canned set of responses; with a
/// script it replays the queued outcomes in order and fails once the
/// script runs dry.
pub struct StubClassifier {
    script: Option<VecDeque<Result<ClassifierResponse, ScanFailure>>>,
    calls: u64,
}

impl StubClassifier {
    pub fn new() -> Self {
        Self {
            script: None,
            calls: 0,
        }
    }

    /// Replay exactly the given outcomes, in order.
    pub fn with_script(outcomes: Vec<Result<ClassifierResponse, ScanFailure>>) -> Self {
        Self {
            script: Some(outcomes.into()),
            calls: 0,
        }
    }

    /// Canned "plastic bottle" response with a centered bounding box.
    pub fn plastic_bottle() -> ClassifierResponse {
        ClassifierResponse {
            item_type: "plastic_bottle".to_string(),
            confidence: 0.91,
            recyclable: true,
            co2_impact: 0.30,
            bbox: Some(vec![0.22, 0.18, 0.78, 0.84]),
            fallback_model: false,
            image_path: None,
        }
    }

    /// Canned fallback-model response: no bounding box, rough numbers.
    pub fn styrofoam_tray_fallback() -> ClassifierResponse {
        ClassifierResponse {
            item_type: "styrofoam tray".to_string(),
            confidence: 0.48,
            recyclable: false,
            co2_impact: 0.0,
            bbox: None,
            fallback_model: true,
            image_path: None,
        }
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl Default for StubClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierService for StubClassifier {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn classify(&mut self, _capture: &EncodedCapture) -> Result<ClassifierResponse, ScanFailure> {
        self.calls += 1;
        match &mut self.script {
            Some(script) => script.pop_front().unwrap_or_else(|| {
                Err(ScanFailure::classification("stub script exhausted"))
            }),
            None => {
                if self.calls % 2 == 1 {
                    Ok(Self::plastic_bottle())
                } else {
                    Ok(Self::styrofoam_tray_fallback())
                }
            }
        }
    }
}
