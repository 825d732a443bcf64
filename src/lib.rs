//! Motioncheck - completion-monitoring engine for instruction-guided exercise telemetry
//!
//! Motioncheck turns two noisy, asynchronous completion signals into one
//! reliable boolean verdict per instruction step: structured body-joint
//! telemetry polled at a fixed tick rate, and free-text confirmations from
//! an external vision-language query runtime. The external sequencer owns
//! the tick loop; this engine only answers "is the step done yet" when
//! asked.
//!
//! ## Modules
//!
//! - **predicates**: stateless threshold checks over the current frame
//! - **trend**: stateful elbow bend/extension detectors with hysteresis
//! - **duration**: consecutive-tick debounce around any condition
//! - **confirm**: streak debounce over vision-language confirmations
//! - **session**: per-step monitoring façade and the session log values

pub mod condition;
pub mod confirm;
pub mod duration;
pub mod error;
pub mod predicates;
pub mod runtime;
pub mod session;
pub mod smoothing;
pub mod trend;
pub mod types;

pub use condition::{Condition, ConditionArgs};
pub use confirm::{ConfirmationMonitor, REQUIRED_CONFIRMATION_STREAK};
pub use duration::{DurationMonitor, DEFAULT_TICK_RATE_HZ};
pub use error::MonitorError;
pub use runtime::{FrameSource, QueryKind, QueryRuntime};
pub use session::{SessionLog, StepMonitor, StepOutcome};
pub use trend::{ElbowTrendDetector, TrendDirection};
pub use types::{Arm, Finger, FingerPair, Position, Side, SpreadCase, TelemetryFrame};

/// Engine version embedded in serialized session logs and CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for session provenance
pub const PRODUCER_NAME: &str = "motioncheck";
