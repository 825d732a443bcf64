//! Confirmation debounce
//!
//! Streak counter over free-text confirmations from the vision-language
//! runtime. The vision service occasionally affirms a single frame it
//! should not, so one "yes" is never enough: the verdict needs a sustained
//! run of affirmative responses (two seconds' worth at the assumed poll
//! cadence). Its tick domain is the confirmation poll, independent of the
//! telemetry tick domain.

use crate::runtime::{QueryKind, QueryRuntime};

/// Consecutive affirmative polls required before a confirmation counts.
pub const REQUIRED_CONFIRMATION_STREAK: u32 = 20;

/// Streak debounce over vision-language feedback.
#[derive(Debug, Clone)]
pub struct ConfirmationMonitor {
    streak: u32,
    required: u32,
    last_feedback: String,
}

impl Default for ConfirmationMonitor {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmationMonitor {
    pub fn new() -> Self {
        Self::with_required_streak(REQUIRED_CONFIRMATION_STREAK)
    }

    pub fn with_required_streak(required: u32) -> Self {
        Self {
            streak: 0,
            required,
            last_feedback: String::new(),
        }
    }

    /// Dispatch a new confirmation query and restart the streak.
    ///
    /// Every new query voids whatever run of affirmations the previous one
    /// had accumulated.
    pub fn dispatch(&mut self, runtime: &mut dyn QueryRuntime, kind: QueryKind, instruction: &str) {
        self.streak = 0;
        runtime.dispatch(kind, instruction);
    }

    /// Feed the latest feedback text and report completion.
    ///
    /// Absent or empty feedback reports not-completed and leaves the
    /// streak untouched. Feedback containing "yes" or "true"
    /// (case-insensitive) extends the streak; anything else resets it.
    pub fn poll(&mut self, feedback: Option<&str>) -> bool {
        let Some(feedback) = feedback else { return false };
        if feedback.is_empty() {
            return false;
        }

        self.last_feedback = feedback.to_string();
        if is_affirmative(feedback) {
            self.streak += 1;
        } else {
            self.streak = 0;
        }
        self.streak >= self.required
    }

    /// Poll through the runtime's feedback field.
    pub fn poll_runtime(&mut self, runtime: &dyn QueryRuntime) -> bool {
        self.poll(runtime.latest_feedback())
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// The most recent non-empty feedback observed.
    pub fn last_feedback(&self) -> &str {
        &self.last_feedback
    }
}

fn is_affirmative(feedback: &str) -> bool {
    let lower = feedback.to_lowercase();
    lower.contains("yes") || lower.contains("true")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeRuntime {
        feedback: Option<String>,
        dispatched: Vec<(QueryKind, String)>,
        disposed: bool,
    }

    impl QueryRuntime for FakeRuntime {
        fn dispatch(&mut self, kind: QueryKind, instruction: &str) {
            self.dispatched.push((kind, instruction.to_string()));
        }

        fn latest_feedback(&self) -> Option<&str> {
            self.feedback.as_deref()
        }

        fn dispose(&mut self) {
            self.disposed = true;
        }
    }

    #[test]
    fn test_twenty_affirmations_complete_on_the_twentieth() {
        let mut monitor = ConfirmationMonitor::new();
        for poll in 1..20 {
            assert!(!monitor.poll(Some("yes")), "poll {poll}");
        }
        assert!(monitor.poll(Some("yes")));
    }

    #[test]
    fn test_negative_response_resets_streak() {
        let mut monitor = ConfirmationMonitor::new();
        for _ in 0..19 {
            monitor.poll(Some("yes"));
        }
        assert!(!monitor.poll(Some("no")));
        assert_eq!(monitor.streak(), 0);
        // One more affirmation is nowhere near enough after the reset
        assert!(!monitor.poll(Some("yes")));
    }

    #[test]
    fn test_matching_is_substring_and_case_insensitive() {
        let mut monitor = ConfirmationMonitor::with_required_streak(1);
        assert!(monitor.poll(Some("Yes, the hand is on the table.")));

        let mut monitor = ConfirmationMonitor::with_required_streak(1);
        assert!(monitor.poll(Some("TRUE")));

        let mut monitor = ConfirmationMonitor::with_required_streak(1);
        assert!(!monitor.poll(Some("the hand is not visible")));
    }

    #[test]
    fn test_absent_or_empty_feedback_leaves_streak_untouched() {
        let mut monitor = ConfirmationMonitor::new();
        for _ in 0..5 {
            monitor.poll(Some("yes"));
        }
        assert!(!monitor.poll(None));
        assert!(!monitor.poll(Some("")));
        assert_eq!(monitor.streak(), 5);
    }

    #[test]
    fn test_dispatch_resets_mid_stream() {
        let mut runtime = FakeRuntime::default();
        let mut monitor = ConfirmationMonitor::new();

        for _ in 0..19 {
            monitor.poll(Some("yes"));
        }
        monitor.dispatch(&mut runtime, QueryKind::Video, "raise both arms");
        assert_eq!(monitor.streak(), 0);
        assert_eq!(runtime.dispatched.len(), 1);
        assert_eq!(runtime.dispatched[0].0, QueryKind::Video);

        // The twentieth affirmation after the reset is poll number 20 again
        for poll in 1..20 {
            assert!(!monitor.poll(Some("yes")), "poll {poll}");
        }
        assert!(monitor.poll(Some("yes")));
    }

    #[test]
    fn test_dispose_reaches_the_runtime() {
        // The sequencer must dispose outstanding queries before the next
        // step; the monitor itself holds nothing to tear down
        let mut runtime = FakeRuntime::default();
        let mut monitor = ConfirmationMonitor::new();
        monitor.dispatch(&mut runtime, QueryKind::Snapshot, "place your hand on the table");
        runtime.dispose();
        assert!(runtime.disposed);
    }

    #[test]
    fn test_poll_through_runtime_feedback_field() {
        let mut runtime = FakeRuntime::default();
        let mut monitor = ConfirmationMonitor::with_required_streak(2);

        assert!(!monitor.poll_runtime(&runtime));
        runtime.feedback = Some("yes".to_string());
        assert!(!monitor.poll_runtime(&runtime));
        assert!(monitor.poll_runtime(&runtime));
        assert_eq!(monitor.last_feedback(), "yes");
    }
}
