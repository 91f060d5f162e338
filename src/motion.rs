//! Animation timelines for the scan surface.
//!
//! Every timeline is plain owned state inside [`MotionState`]: one
//! instance per scan session, reset synchronously on rescan, dropped
//! on unmount. Nothing here is shared across sessions. All progress
//! functions take an explicit `Instant` so tests control the clock.

use std::time::{Duration, Instant};

/// One leg of the reticle pulse (scale 1.0 -> 1.08 and back).
pub const PULSE_LEG: Duration = Duration::from_millis(1200);

/// One leg of the scan-line sweep (top -> bottom and back).
pub const SWEEP_LEG: Duration = Duration::from_millis(2000);

/// Result sheet entry animation.
pub const RESULT_SHEET: Duration = Duration::from_millis(360);

/// Peak reticle pulse scale.
pub const PULSE_MAX_SCALE: f64 = 1.08;

/// Result sheet slide-in distance in pixels.
pub const SHEET_TRAVEL: f64 = 400.0;

/// Symmetric ease-in-out (the pulse and sweep easing).
pub fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Decelerating ease-out (the result sheet easing).
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// One-shot timeline. Idle until started; progress saturates at 1.
#[derive(Clone, Copy, Debug)]
pub struct Timeline {
    started: Option<Instant>,
    duration: Duration,
}

impl Timeline {
    pub fn new(duration: Duration) -> Self {
        Self {
            started: None,
            duration,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.started = Some(now);
    }

    /// Stop and rewind. Progress reads 0 afterwards.
    pub fn cancel(&mut self) {
        self.started = None;
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    /// Linear progress in [0, 1]; 0 when not started.
    pub fn progress_at(&self, now: Instant) -> f64 {
        let Some(started) = self.started else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }
}

/// Ping-pong loop timeline: phase runs 0 -> 1 -> 0 forever.
#[derive(Clone, Copy, Debug)]
pub struct LoopTimeline {
    started: Instant,
    leg: Duration,
}

impl LoopTimeline {
    pub fn new(leg: Duration, now: Instant) -> Self {
        Self { started: now, leg }
    }

    /// Triangle-wave phase in [0, 1].
    pub fn phase_at(&self, now: Instant) -> f64 {
        if self.leg.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f64();
        let leg = self.leg.as_secs_f64();
        let cycle = (elapsed / leg) % 2.0;
        if cycle <= 1.0 {
            cycle
        } else {
            2.0 - cycle
        }
    }

    pub fn restart(&mut self, now: Instant) {
        self.started = now;
    }
}

/// Pose of the result sheet at an instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetPose {
    /// Vertical offset from the rest position; `SHEET_TRAVEL` when
    /// fully hidden, 0 when settled.
    pub translate_y: f64,
    pub opacity: f64,
}

/// All animation state owned by one scan session.
pub struct MotionState {
    pulse: LoopTimeline,
    sweep: LoopTimeline,
    result_sheet: Timeline,
}

impl MotionState {
    pub fn new(now: Instant) -> Self {
        Self {
            pulse: LoopTimeline::new(PULSE_LEG, now),
            sweep: LoopTimeline::new(SWEEP_LEG, now),
            result_sheet: Timeline::new(RESULT_SHEET),
        }
    }

    /// Reticle pulse scale in [1.0, `PULSE_MAX_SCALE`].
    pub fn pulse_scale_at(&self, now: Instant) -> f64 {
        1.0 + ease_in_out(self.pulse.phase_at(now)) * (PULSE_MAX_SCALE - 1.0)
    }

    /// Scan-line offset in [0, travel] pixels.
    pub fn sweep_offset_at(&self, now: Instant, travel: f64) -> f64 {
        ease_in_out(self.sweep.phase_at(now)) * travel
    }

    /// Begin the result sheet entry.
    pub fn show_result_sheet(&mut self, now: Instant) {
        self.result_sheet.start(now);
    }

    /// Sheet pose for rendering; fully hidden while idle.
    pub fn sheet_pose_at(&self, now: Instant) -> SheetPose {
        let progress = ease_out(self.result_sheet.progress_at(now));
        SheetPose {
            translate_y: SHEET_TRAVEL * (1.0 - progress),
            opacity: progress,
        }
    }

    pub fn result_sheet_visible(&self) -> bool {
        self.result_sheet.is_running()
    }

    /// Synchronous reset on rescan: the sheet rewinds and the ambient
    /// loops restart so the next capture starts from a clean frame.
    pub fn reset(&mut self, now: Instant) {
        self.result_sheet.cancel();
        self.pulse.restart(now);
        self.sweep.restart(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_shot_progress_saturates() {
        let t0 = Instant::now();
        let mut sheet = Timeline::new(RESULT_SHEET);
        assert_eq!(sheet.progress_at(t0), 0.0);

        sheet.start(t0);
        assert_eq!(sheet.progress_at(t0), 0.0);
        let halfway = sheet.progress_at(t0 + Duration::from_millis(180));
        assert!((halfway - 0.5).abs() < 1e-9);
        assert_eq!(sheet.progress_at(t0 + Duration::from_secs(5)), 1.0);
    }

    #[test]
    fn cancel_rewinds_to_zero() {
        let t0 = Instant::now();
        let mut sheet = Timeline::new(RESULT_SHEET);
        sheet.start(t0);
        sheet.cancel();
        assert!(!sheet.is_running());
        assert_eq!(sheet.progress_at(t0 + Duration::from_secs(1)), 0.0);
    }

    #[test]
    fn loop_phase_ping_pongs() {
        let t0 = Instant::now();
        let pulse = LoopTimeline::new(PULSE_LEG, t0);
        assert_eq!(pulse.phase_at(t0), 0.0);
        assert!((pulse.phase_at(t0 + Duration::from_millis(1200)) - 1.0).abs() < 1e-9);
        assert!((pulse.phase_at(t0 + Duration::from_millis(2400))).abs() < 1e-9);
        let phase = pulse.phase_at(t0 + Duration::from_millis(600));
        assert!((phase - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pulse_scale_stays_in_range() {
        let t0 = Instant::now();
        let motion = MotionState::new(t0);
        for ms in (0..5000).step_by(100) {
            let scale = motion.pulse_scale_at(t0 + Duration::from_millis(ms));
            assert!((1.0..=PULSE_MAX_SCALE).contains(&scale), "scale {scale}");
        }
    }

    #[test]
    fn sheet_pose_travels_in_and_reset_hides_it() {
        let t0 = Instant::now();
        let mut motion = MotionState::new(t0);

        let hidden = motion.sheet_pose_at(t0);
        assert_eq!(hidden.translate_y, SHEET_TRAVEL);
        assert_eq!(hidden.opacity, 0.0);

        motion.show_result_sheet(t0);
        let settled = motion.sheet_pose_at(t0 + Duration::from_secs(1));
        assert_eq!(settled.translate_y, 0.0);
        assert_eq!(settled.opacity, 1.0);

        motion.reset(t0 + Duration::from_secs(2));
        let after = motion.sheet_pose_at(t0 + Duration::from_secs(3));
        assert_eq!(after.translate_y, SHEET_TRAVEL);
        assert_eq!(after.opacity, 0.0);
        assert!(!motion.result_sheet_visible());
    }
}
