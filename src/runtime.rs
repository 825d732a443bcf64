//! External runtime interfaces
//!
//! The engine never polls, blocks or issues network calls itself. These
//! traits are the seams to the two external collaborators it reads from:
//! the telemetry provider and the vision-language query runtime. The
//! sequencer that owns the tick loop implements (or wraps) both.

use crate::types::TelemetryFrame;

/// Provider of the latest body-joint telemetry snapshot.
///
/// `None` means telemetry is not yet initialized; every consumer in this
/// crate treats that as "nothing satisfied" rather than an error.
pub trait FrameSource {
    fn latest_frame(&self) -> Option<&TelemetryFrame>;
}

/// Kind of confirmation query sent to the vision-language runtime.
///
/// A snapshot query suits conditions a single image can settle ("hand on
/// the table"); dynamic conditions ("move your hand in a circle") need a
/// video span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Snapshot,
    Video,
}

/// The external vision-language query runtime.
///
/// `dispatch` is fire-and-forget from the engine's point of view; any
/// waiting happens inside the runtime, which only ever exposes the latest
/// feedback text. The sequencer must call `dispose` before moving to the
/// next instruction step so outstanding queries cannot leak into it.
pub trait QueryRuntime {
    /// Start monitoring `instruction` with a snapshot or video query.
    fn dispatch(&mut self, kind: QueryKind, instruction: &str);

    /// Latest feedback text, if any response has arrived.
    fn latest_feedback(&self) -> Option<&str>;

    /// Cancel all outstanding queries.
    fn dispose(&mut self);
}
