//! Per-step monitoring and session logging
//!
//! The external sequencer owns the tick loop and the instruction program;
//! this module gives it a per-step façade over the debounce machinery and
//! the three values it must hand to the log store for every step: which
//! action was dispatched, how long the step took, and whether it
//! completed. The log's persistence format beyond those values belongs to
//! the store, not to this engine.

use crate::duration::{DurationMonitor, DEFAULT_TICK_RATE_HZ};
use crate::runtime::FrameSource;
use crate::types::TelemetryFrame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// The values logged for one instruction step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Identifier of the dispatched action.
    pub action_api: String,
    /// Elapsed monitoring time in seconds (ticks over the tick rate).
    pub time_taken_secs: f64,
    /// Whether the step completed.
    pub completed: bool,
    /// When this outcome was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Monitors a single instruction step.
///
/// Owns the step's debounced condition, counts polled ticks for the
/// elapsed-time report, and latches the verdict once reached. Discard the
/// instance when the sequencer moves on; it holds no external resources.
#[derive(Debug, Clone)]
pub struct StepMonitor {
    action_api: String,
    monitor: DurationMonitor,
    tick_rate_hz: u32,
    ticks: u64,
    completed: bool,
}

impl StepMonitor {
    /// Monitor `monitor` for the step identified by `action_api`, assuming
    /// the default 10 Hz poll cadence for elapsed-time conversion.
    pub fn new(action_api: impl Into<String>, monitor: DurationMonitor) -> Self {
        Self::with_tick_rate(action_api, monitor, DEFAULT_TICK_RATE_HZ)
    }

    pub fn with_tick_rate(
        action_api: impl Into<String>,
        monitor: DurationMonitor,
        tick_rate_hz: u32,
    ) -> Self {
        Self {
            action_api: action_api.into(),
            monitor,
            tick_rate_hz,
            ticks: 0,
            completed: false,
        }
    }

    /// Feed the latest frame. Reports true from the completing poll
    /// onwards; the elapsed-time counter stops advancing once completed.
    pub fn poll(&mut self, frame: Option<&TelemetryFrame>) -> bool {
        if self.completed {
            return true;
        }
        self.ticks += 1;
        if self.monitor.check_completed(frame) {
            self.completed = true;
        }
        self.completed
    }

    /// Poll against whatever frame the source currently exposes.
    pub fn poll_source(&mut self, source: &dyn FrameSource) -> bool {
        self.poll(source.latest_frame())
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Elapsed monitoring time in seconds at the configured tick rate.
    pub fn elapsed_secs(&self) -> f64 {
        self.ticks as f64 / self.tick_rate_hz as f64
    }

    pub fn action_api(&self) -> &str {
        &self.action_api
    }

    /// Snapshot the loggable outcome of this step.
    pub fn outcome(&self) -> StepOutcome {
        StepOutcome {
            action_api: self.action_api.clone(),
            time_taken_secs: self.elapsed_secs(),
            completed: self.completed,
            recorded_at: Utc::now(),
        }
    }
}

/// Index-keyed outcomes for one monitoring session.
///
/// Holds only what the engine must supply per log index; the external
/// store decides how (and whether) to persist it. JSON round-trips the way
/// other stateful stores in this crate's lineage do, for callers that
/// checkpoint between steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionLog {
    producer: String,
    engine_version: String,
    session_id: Uuid,
    started_at: DateTime<Utc>,
    entries: BTreeMap<u32, StepOutcome>,
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionLog {
    pub fn new() -> Self {
        Self {
            producer: crate::PRODUCER_NAME.to_string(),
            engine_version: crate::ENGINE_VERSION.to_string(),
            session_id: Uuid::new_v4(),
            started_at: Utc::now(),
            entries: BTreeMap::new(),
        }
    }

    pub fn producer(&self) -> &str {
        &self.producer
    }

    pub fn engine_version(&self) -> &str {
        &self.engine_version
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record the outcome for a step index. Recording the same index again
    /// replaces the earlier outcome.
    pub fn record(&mut self, step_index: u32, outcome: StepOutcome) {
        self.entries.insert(step_index, outcome);
    }

    pub fn get(&self, step_index: u32) -> Option<&StepOutcome> {
        self.entries.get(&step_index)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u32, &StepOutcome)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a session log from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize the session log to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
