//! Duration debounce
//!
//! Wraps any condition and requires it to hold for a number of consecutive
//! polls before reporting completion. The monitor performs no wall-clock
//! timing of its own: it counts calls, and the external sequencer is
//! expected to poll once per tick. The tick rate is explicit configuration
//! with a 10 Hz default, so a required duration in seconds converts to
//! `duration_secs * tick_rate_hz` consecutive true evaluations.

use crate::condition::{Condition, ConditionArgs};
use crate::error::MonitorError;
use crate::types::TelemetryFrame;

/// Assumed polling cadence when none is configured.
pub const DEFAULT_TICK_RATE_HZ: u32 = 10;

/// Consecutive-tick debounce around a [`Condition`].
#[derive(Debug, Clone)]
pub struct DurationMonitor {
    condition: Condition,
    required_ticks: u32,
    count: u32,
}

impl DurationMonitor {
    /// Require `condition` to hold for `duration_secs` at the default
    /// 10 Hz polling cadence.
    pub fn new(condition: Condition, duration_secs: u32) -> Self {
        Self::with_tick_rate(condition, duration_secs, DEFAULT_TICK_RATE_HZ)
    }

    /// Require `condition` to hold for `duration_secs` at an explicit
    /// polling cadence.
    pub fn with_tick_rate(condition: Condition, duration_secs: u32, tick_rate_hz: u32) -> Self {
        Self {
            condition,
            required_ticks: duration_secs * tick_rate_hz,
            count: 0,
        }
    }

    /// No debounce: complete on the first tick the condition holds.
    pub fn immediate(condition: Condition) -> Self {
        Self {
            condition,
            required_ticks: 1,
            count: 0,
        }
    }

    /// Resolve `name` against the condition vocabulary and wrap it.
    /// Unknown names and missing arguments fail here, at construction.
    pub fn named(
        name: &str,
        args: ConditionArgs,
        duration_secs: u32,
    ) -> Result<DurationMonitor, MonitorError> {
        Ok(Self::new(Condition::named(name, args)?, duration_secs))
    }

    /// Evaluate the wrapped condition once.
    ///
    /// A true evaluation extends the streak and reports completion once the
    /// streak reaches the target; a false evaluation resets the streak to
    /// zero. The comparison is `>=`, so after the target is reached further
    /// true evaluations keep reporting completed.
    pub fn check_completed(&mut self, frame: Option<&TelemetryFrame>) -> bool {
        if self.condition.evaluate(frame) {
            self.count += 1;
            self.count >= self.required_ticks
        } else {
            self.count = 0;
            false
        }
    }

    /// Current streak of consecutive true evaluations.
    pub fn consecutive_ticks(&self) -> u32 {
        self.count
    }

    /// Ticks the streak must reach for completion.
    pub fn required_ticks(&self) -> u32 {
        self.required_ticks
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }
}
