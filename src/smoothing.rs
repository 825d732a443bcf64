//! Trajectory smoothing
//!
//! A centered moving-average filter over `(left, right)` angle pairs.
//! The window is clipped at both ends of the trajectory (no padding, no
//! wraparound), so the first and last samples are averaged over a smaller
//! neighborhood. Trend detection feeds the smoothed endpoints straight
//! into its latch logic, so the boundary behavior is part of the contract,
//! not an implementation detail.

/// Centered moving average over paired angle trajectories.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Smooth a trajectory of `(left, right)` pairs.
    ///
    /// Output element `i` averages inputs over
    /// `[max(0, i - w/2), min(len, i + w/2 + 1))` (integer division), so
    /// the output has the same length as the input and edge samples shrink
    /// their window rather than read outside the trajectory.
    pub fn smooth(&self, traj: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let half = self.window / 2;
        let mut smoothed = Vec::with_capacity(traj.len());
        for i in 0..traj.len() {
            let start = i.saturating_sub(half);
            let end = (i + half + 1).min(traj.len());
            let span = &traj[start..end];
            let n = span.len() as f64;
            let left = span.iter().map(|pair| pair.0).sum::<f64>() / n;
            let right = span.iter().map(|pair| pair.1).sum::<f64>() / n;
            smoothed.push((left, right));
        }
        smoothed
    }
}
