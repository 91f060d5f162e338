//! Scan lifecycle state machine.
//!
//! One `ScanLifecycle` instance per scan session (screen mount). It
//! owns the session's `ScanState`, its animation state, and the
//! generation counter used to cancel in-flight classification.
//!
//! Execution is single-threaded and event-driven: every method runs
//! synchronously in response to a discrete event (a tap, a service
//! callback, a resize). The only suspending operation, the remote
//! classification call, happens outside this type, between
//! [`ScanLifecycle::capture_succeeded`] handing out a
//! [`ClassificationTicket`] and the host feeding the outcome back
//! through [`ScanLifecycle::finish_classification`]. The ticket's
//! generation is compared on completion; a late response from a
//! cancelled or superseded request can never overwrite newer state.
//!
//! Exclusivity (at most one outstanding classification) is enforced by
//! the state guards, not by locks: a capture request while already
//! `Capturing` or `Classifying` is a no-op, never queued.

use std::time::Instant;

use crate::classify::ClassifierResponse;
use crate::insight::{self, ScanInsight};
use crate::motion::MotionState;
use crate::overlay::{self, OverlayRect, Viewport};
use crate::{FailureKind, ScanFailure};

/// Idle callout shown before anything is scanned.
pub const ALIGN_PROMPT: &str = "Align the item within the frame to analyze recyclability";

/// Scan session state. Owned exclusively by [`ScanLifecycle`].
#[derive(Clone, Debug, PartialEq)]
pub enum ScanState {
    Idle,
    Capturing,
    Classifying,
    Result(ScanInsight),
    Failed(ScanFailure),
}

impl ScanState {
    fn label(&self) -> &'static str {
        match self {
            ScanState::Idle => "idle",
            ScanState::Capturing => "capturing",
            ScanState::Classifying => "classifying",
            ScanState::Result(_) => "result",
            ScanState::Failed(_) => "failed",
        }
    }
}

/// Outcome of a capture request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureGate {
    /// The session entered `Capturing`; the host should take a still.
    Accepted,
    /// A capture or classification is already underway (or a result is
    /// on screen). The request is dropped, not queued.
    Ignored,
}

/// Proof that a classification was dispatched by this lifecycle.
///
/// Carries the generation the request belongs to; the host passes it
/// back on completion. Tickets from a cancelled generation compare
/// stale and their results are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassificationTicket {
    generation: u64,
}

impl ClassificationTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Outcome of delivering a classification result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Completion {
    /// The result (success or failure) was applied to the session.
    Applied,
    /// The session moved on (rescan, newer capture, unmount-and-remount);
    /// the late result was discarded without touching state.
    Stale,
}

pub struct ScanLifecycle {
    state: ScanState,
    generation: u64,
    motion: MotionState,
}

impl ScanLifecycle {
    /// Start a fresh scan session in `Idle`.
    pub fn new(now: Instant) -> Self {
        Self {
            state: ScanState::Idle,
            generation: 0,
            motion: MotionState::new(now),
        }
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn insight(&self) -> Option<&ScanInsight> {
        match &self.state {
            ScanState::Result(insight) => Some(insight),
            _ => None,
        }
    }

    /// Current request generation (advances on dispatch and cancel).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    /// Request a capture. Accepted from `Idle` and `Failed` (both are
    /// entry points); ignored everywhere else.
    pub fn begin_capture(&mut self) -> CaptureGate {
        match self.state {
            ScanState::Idle | ScanState::Failed(_) => {
                self.transition(ScanState::Capturing);
                CaptureGate::Accepted
            }
            ScanState::Capturing | ScanState::Classifying | ScanState::Result(_) => {
                log::debug!(
                    "capture request ignored while {}",
                    self.state.label()
                );
                CaptureGate::Ignored
            }
        }
    }

    /// The camera produced a still. Enters `Classifying` and hands the
    /// host a ticket for the classification it should now dispatch.
    ///
    /// Returns `None` when the session is no longer `Capturing` (e.g.
    /// the capture completed after a reset); the still is discarded.
    pub fn capture_succeeded(&mut self) -> Option<ClassificationTicket> {
        if self.state != ScanState::Capturing {
            log::warn!(
                "capture completion discarded while {}",
                self.state.label()
            );
            return None;
        }
        self.generation += 1;
        self.transition(ScanState::Classifying);
        Some(ClassificationTicket {
            generation: self.generation,
        })
    }

    /// The camera failed to produce a still.
    pub fn capture_failed(&mut self, failure: ScanFailure) {
        if self.state != ScanState::Capturing {
            log::warn!("capture failure discarded while {}", self.state.label());
            return;
        }
        debug_assert_eq!(failure.kind, FailureKind::Capture);
        self.transition(ScanState::Failed(failure));
    }

    /// Deliver the classification outcome for `ticket`.
    ///
    /// Applied only when the session is still `Classifying` the same
    /// generation; any other combination is stale and leaves state
    /// untouched: a cancelled request's late response must never
    /// overwrite a session that has returned to `Idle` or started a
    /// newer capture.
    pub fn finish_classification(
        &mut self,
        ticket: ClassificationTicket,
        outcome: Result<ClassifierResponse, ScanFailure>,
        now: Instant,
    ) -> Completion {
        if self.state != ScanState::Classifying || ticket.generation != self.generation {
            log::warn!(
                "stale classification result discarded (ticket generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(response) => {
                let insight = insight::compose(&response);
                log::info!(
                    "classified {:?} as {} ({}%)",
                    insight.display_item_name,
                    insight.material_label,
                    insight.confidence_percent
                );
                self.motion.show_result_sheet(now);
                self.transition(ScanState::Result(insight));
            }
            Err(failure) => {
                log::warn!("classification failed: {failure}");
                self.transition(ScanState::Failed(failure));
            }
        }
        Completion::Applied
    }

    /// Return to `Idle` for another scan.
    ///
    /// From `Result`, overlay and animation state reset synchronously
    /// before the method returns, so a stale bounding box can never
    /// render over the next frame. From `Classifying`, the outstanding
    /// request is cancelled by advancing the generation.
    pub fn rescan(&mut self, now: Instant) {
        match self.state {
            ScanState::Idle => return,
            ScanState::Classifying | ScanState::Capturing => {
                // Invalidate the in-flight work before re-entering Idle.
                self.generation += 1;
            }
            ScanState::Result(_) | ScanState::Failed(_) => {}
        }
        self.motion.reset(now);
        self.transition(ScanState::Idle);
    }

    /// Dismiss a surfaced failure alert.
    pub fn acknowledge_failure(&mut self) {
        if matches!(self.state, ScanState::Failed(_)) {
            self.transition(ScanState::Idle);
        }
    }

    /// Overlay geometry for the current state and viewport.
    ///
    /// `Some` only in `Result` with a bounding box present; the caller
    /// renders a centered insight panel otherwise. Recompute on every
    /// viewport change.
    pub fn overlay_for(&self, viewport: Viewport) -> Option<OverlayRect> {
        overlay::compute_overlay(self.insight()?.bounding_box, viewport)
    }

    /// Status line for the live-analysis chip.
    pub fn status_line(&self) -> String {
        match &self.state {
            ScanState::Idle => "Tap capture to start scanning".to_string(),
            ScanState::Capturing => "Capturing still".to_string(),
            ScanState::Classifying => "Running YOLO11 inference".to_string(),
            ScanState::Result(insight) => {
                format!("Confidence {}%", insight.confidence_percent)
            }
            ScanState::Failed(failure) => failure.alert_text(),
        }
    }

    /// Callout text over the reticle.
    pub fn callout(&self) -> &str {
        match &self.state {
            ScanState::Result(insight) => &insight.callout_text,
            _ => ALIGN_PROMPT,
        }
    }

    fn transition(&mut self, next: ScanState) {
        log::debug!("scan state {} -> {}", self.state.label(), next.label());
        self.state = next;
    }
}
