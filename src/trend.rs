//! Elbow trend detection
//!
//! Stateful checks that judge a directional change in the smoothed elbow
//! trajectory rather than an instantaneous threshold. A detector owns its
//! angle history, its smoothing filter and its hysteresis latch; nothing is
//! shared between instances, so concurrent monitors for repeated reps never
//! observe each other's state.
//!
//! A detector reports true when either
//! - the smoothed trajectory has moved by more than the threshold in the
//!   required direction on every required side (last minus first for
//!   extension, first minus last for bend), or
//! - the latch is set. The latch sets on the first true result, and also
//!   when the arm is observed already at the target: strictly more than
//!   [`SETTLED_SAMPLE_COUNT`] smoothed samples past the absolute angle for
//!   the direction (below 95° for bend, above 130° for extension).
//!
//! Once set, the latch holds for the detector's lifetime, so a rep that
//! overshoots and swings back still counts.

use crate::smoothing::MovingAverage;
use crate::types::{Arm, Side, TelemetryFrame};

/// Smoothing window applied to the elbow trajectory.
pub const TREND_SMOOTHING_WINDOW: usize = 5;
/// Default trajectory delta, in degrees, that counts as a trend.
pub const DEFAULT_TREND_THRESHOLD_DEG: f64 = 10.0;
/// Absolute elbow angle below which the arm reads as already flexed.
pub const FLEXED_ELBOW_ANGLE_DEG: f64 = 95.0;
/// Absolute elbow angle above which the arm reads as already extended.
pub const EXTENDED_ELBOW_ANGLE_DEG: f64 = 130.0;
/// More smoothed samples than this must sit past the absolute angle before
/// the already-at-target shortcut latches.
pub const SETTLED_SAMPLE_COUNT: usize = 10;

/// Direction of the elbow trend being watched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    /// Elbow angle decreasing (flexion).
    Bend,
    /// Elbow angle increasing.
    Extension,
}

/// Stateful detector for a sustained elbow bend or extension.
#[derive(Debug, Clone)]
pub struct ElbowTrendDetector {
    direction: TrendDirection,
    threshold_deg: f64,
    filter: MovingAverage,
    history: Vec<(f64, f64)>,
    latched: bool,
}

impl ElbowTrendDetector {
    pub fn new(direction: TrendDirection, threshold_deg: f64) -> Self {
        Self {
            direction,
            threshold_deg,
            filter: MovingAverage::new(TREND_SMOOTHING_WINDOW),
            history: Vec::new(),
            latched: false,
        }
    }

    /// Detector for a decreasing elbow angle.
    pub fn bend(threshold_deg: f64) -> Self {
        Self::new(TrendDirection::Bend, threshold_deg)
    }

    /// Detector for an increasing elbow angle.
    pub fn extension(threshold_deg: f64) -> Self {
        Self::new(TrendDirection::Extension, threshold_deg)
    }

    pub fn direction(&self) -> TrendDirection {
        self.direction
    }

    /// Whether the latch has been set.
    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Feed the latest frame and report whether the trend is satisfied.
    ///
    /// With no frame the call is a no-op reporting false; the history is
    /// untouched. Until the history reaches the smoothing window the
    /// detector reports not-yet-determined (false).
    pub fn observe(&mut self, frame: Option<&TelemetryFrame>, arm: Arm) -> bool {
        let Some(frame) = frame else { return false };

        self.history.push(frame.elbow_angles());
        if self.history.len() < self.filter.window() {
            return false;
        }

        let smoothed = self.filter.smooth(&self.history);
        let delta_ok = arm
            .sides()
            .iter()
            .all(|side| self.side_delta(&smoothed, *side) > self.threshold_deg);

        if delta_ok || self.already_at_target(arm, &smoothed) {
            self.latched = true;
        }
        delta_ok || self.latched
    }

    fn side_delta(&self, smoothed: &[(f64, f64)], side: Side) -> f64 {
        let first = side_value(smoothed[0], side);
        let last = side_value(smoothed[smoothed.len() - 1], side);
        match self.direction {
            TrendDirection::Bend => first - last,
            TrendDirection::Extension => last - first,
        }
    }

    /// Already-at-target shortcut: the required side(s) have spent more
    /// than [`SETTLED_SAMPLE_COUNT`] smoothed samples past the absolute
    /// angle for this direction.
    fn already_at_target(&self, arm: Arm, smoothed: &[(f64, f64)]) -> bool {
        arm.sides().iter().all(|side| {
            let settled = smoothed
                .iter()
                .filter(|pair| {
                    let angle = side_value(**pair, *side);
                    match self.direction {
                        TrendDirection::Bend => angle < FLEXED_ELBOW_ANGLE_DEG,
                        TrendDirection::Extension => angle > EXTENDED_ELBOW_ANGLE_DEG,
                    }
                })
                .count();
            settled > SETTLED_SAMPLE_COUNT
        })
    }
}

fn side_value(pair: (f64, f64), side: Side) -> f64 {
    match side {
        Side::Left => pair.0,
        Side::Right => pair.1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_with_elbows(left: f64, right: f64) -> TelemetryFrame {
        let mut frame = TelemetryFrame::default();
        frame.left.elbow_angle = left;
        frame.right.elbow_angle = right;
        frame
    }

    fn feed(detector: &mut ElbowTrendDetector, arm: Arm, angles: &[(f64, f64)]) -> bool {
        let mut result = false;
        for (left, right) in angles {
            result = detector.observe(Some(&frame_with_elbows(*left, *right)), arm);
        }
        result
    }

    #[test]
    fn test_insufficient_history_reports_false() {
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        for _ in 0..TREND_SMOOTHING_WINDOW - 1 {
            assert!(!detector.observe(Some(&frame_with_elbows(60.0, 60.0)), Arm::Both));
        }
    }

    #[test]
    fn test_missing_frame_does_not_grow_history() {
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        assert!(!detector.observe(None, Arm::Left));
        // The four real frames below stay under the smoothing window, so a
        // phantom append above would have been visible here
        for _ in 0..TREND_SMOOTHING_WINDOW - 1 {
            assert!(!detector.observe(Some(&frame_with_elbows(160.0, 160.0)), Arm::Left));
        }
    }

    #[test]
    fn test_bend_detected_on_decreasing_trajectory() {
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let ramp: Vec<(f64, f64)> = (0..5).map(|i| {
            let angle = 160.0 - 10.0 * i as f64;
            (angle, angle)
        }).collect();
        assert!(feed(&mut detector, Arm::Both, &ramp));
    }

    #[test]
    fn test_extension_detected_on_increasing_trajectory() {
        let mut detector = ElbowTrendDetector::extension(DEFAULT_TREND_THRESHOLD_DEG);
        let ramp: Vec<(f64, f64)> = (0..5).map(|i| {
            let angle = 100.0 + 10.0 * i as f64;
            (angle, angle)
        }).collect();
        assert!(feed(&mut detector, Arm::Both, &ramp));
        // The opposite direction on the same data stays false
        let mut bend = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let again: Vec<(f64, f64)> = (0..5).map(|i| {
            let angle = 100.0 + 10.0 * i as f64;
            (angle, angle)
        }).collect();
        assert!(!feed(&mut bend, Arm::Both, &again));
    }

    #[test]
    fn test_hysteresis_stickiness() {
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let down: Vec<(f64, f64)> = (0..5).map(|i| {
            let angle = 160.0 - 10.0 * i as f64;
            (angle, angle)
        }).collect();
        assert!(feed(&mut detector, Arm::Both, &down));
        assert!(detector.is_latched());

        // Swing all the way back up: the delta no longer qualifies, but the
        // latch keeps the verdict true for this instance
        let up = vec![(160.0, 160.0); 8];
        assert!(feed(&mut detector, Arm::Both, &up));
    }

    #[test]
    fn test_latch_is_per_instance() {
        let mut first = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let down: Vec<(f64, f64)> = (0..5).map(|i| {
            let angle = 160.0 - 10.0 * i as f64;
            (angle, angle)
        }).collect();
        assert!(feed(&mut first, Arm::Both, &down));

        // A fresh detector starts unlatched regardless of what an earlier
        // instance observed
        let mut second = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        assert!(!second.is_latched());
        assert!(!feed(&mut second, Arm::Both, &vec![(160.0, 160.0); 8]));
    }

    #[test]
    fn test_already_at_target_shortcut() {
        // Constant 90° trajectory: no delta, but already flexed. The latch
        // needs strictly more than SETTLED_SAMPLE_COUNT smoothed samples
        // below the absolute angle.
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        for tick in 1..=SETTLED_SAMPLE_COUNT + 1 {
            let result = detector.observe(Some(&frame_with_elbows(90.0, 90.0)), Arm::Both);
            if tick <= SETTLED_SAMPLE_COUNT {
                assert!(!result, "tick {tick} should not have latched yet");
            } else {
                assert!(result, "tick {tick} should latch via the shortcut");
            }
        }
    }

    #[test]
    fn test_both_requires_both_sides() {
        // Only the left arm bends; the right stays put
        let mut detector = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let ramp: Vec<(f64, f64)> = (0..5).map(|i| (160.0 - 10.0 * i as f64, 160.0)).collect();
        assert!(!feed(&mut detector, Arm::Both, &ramp));

        let mut left_only = ElbowTrendDetector::bend(DEFAULT_TREND_THRESHOLD_DEG);
        let ramp: Vec<(f64, f64)> = (0..5).map(|i| (160.0 - 10.0 * i as f64, 160.0)).collect();
        assert!(feed(&mut left_only, Arm::Left, &ramp));
    }
}
