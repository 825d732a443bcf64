//! Condition dispatch
//!
//! A closed set of monitorable conditions over the telemetry stream: every
//! stateless predicate in the library plus the two stateful elbow trend
//! detectors, behind one uniform `evaluate` capability. Dispatch is a
//! `match` on the variant; names are only consulted once, at construction,
//! where an unrecognized name or a missing argument is a fatal caller
//! error.

use crate::error::MonitorError;
use crate::predicates;
use crate::trend::{ElbowTrendDetector, DEFAULT_TREND_THRESHOLD_DEG};
use crate::types::{Arm, Finger, FingerPair, Position, Side, SpreadCase, TelemetryFrame};

/// Arguments forwarded to a condition selected by name.
///
/// Upstream instruction programs hand conditions loosely typed argument
/// bundles; unset fields fall back to the library defaults, and fields a
/// condition requires but cannot default are construction errors.
#[derive(Debug, Clone, Default)]
pub struct ConditionArgs {
    pub arm: Option<Arm>,
    pub finger: Option<Finger>,
    pub second_finger: Option<Finger>,
    pub case: Option<SpreadCase>,
    pub threshold_deg: Option<f64>,
    pub distance_m: Option<f64>,
    pub object: Option<Position>,
}

/// One monitorable condition with its bound arguments.
#[derive(Debug, Clone)]
pub enum Condition {
    Seated,
    Standing,
    LeanForward {
        threshold_deg: f64,
    },
    SitUpStraight,
    FingerFlexion {
        arm: Arm,
        finger: Finger,
        threshold_deg: f64,
    },
    FingerExtension {
        arm: Arm,
        finger: Finger,
        threshold_deg: f64,
    },
    OpenPalm {
        arm: Arm,
        threshold_deg: f64,
    },
    ClosedPalm {
        arm: Arm,
        threshold_deg: f64,
    },
    BetweenFingerAngle {
        side: Side,
        case: SpreadCase,
        pair: FingerPair,
        threshold_deg: f64,
    },
    FingerSpread {
        arm: Arm,
        threshold_deg: f64,
    },
    FingerAdduction {
        arm: Arm,
        threshold_deg: f64,
    },
    WristSupination {
        arm: Arm,
        threshold_deg: f64,
    },
    WristPronation {
        arm: Arm,
        threshold_deg: f64,
    },
    FaceTouch {
        side: Side,
    },
    ObjectTouch {
        side: Side,
        object: Position,
        threshold_m: f64,
    },
    FingerTouch {
        side: Side,
        first: Finger,
        second: Finger,
        threshold_m: f64,
    },
    ElbowBend {
        arm: Arm,
        detector: ElbowTrendDetector,
    },
    ElbowExtension {
        arm: Arm,
        detector: ElbowTrendDetector,
    },
}

impl Condition {
    /// Build a condition from its textual name and an argument bundle.
    ///
    /// Names are matched case-insensitively, ignoring separators and an
    /// optional `check` prefix, so `"CheckOpenPalm"`, `"open_palm"` and
    /// `"openpalm"` all resolve to the same condition. Unknown names and
    /// missing required arguments fail here, never at evaluation time.
    pub fn named(name: &str, args: ConditionArgs) -> Result<Condition, MonitorError> {
        let normalized: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        let key = normalized.strip_prefix("check").unwrap_or(&normalized);

        let require_arm = |args: &ConditionArgs| {
            args.arm
                .ok_or_else(|| MonitorError::MissingArgument(name.to_string(), "arm"))
        };
        let require_finger = |slot: Option<Finger>, which: &'static str| {
            slot.ok_or_else(|| MonitorError::MissingArgument(name.to_string(), which))
        };

        let condition = match key {
            "seated" => Condition::Seated,
            "standing" => Condition::Standing,
            "leanforward" => Condition::LeanForward {
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_LEAN_THRESHOLD_DEG),
            },
            "situpstraight" => Condition::SitUpStraight,
            "fingerflexion" => Condition::FingerFlexion {
                arm: require_arm(&args)?,
                finger: require_finger(args.finger, "finger")?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_FLEXION_THRESHOLD_DEG),
            },
            "fingerextension" => Condition::FingerExtension {
                arm: require_arm(&args)?,
                finger: require_finger(args.finger, "finger")?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_EXTENSION_THRESHOLD_DEG),
            },
            "openpalm" => Condition::OpenPalm {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_EXTENSION_THRESHOLD_DEG),
            },
            "closedpalm" => Condition::ClosedPalm {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_FLEXION_THRESHOLD_DEG),
            },
            "betweenfingerangle" => Condition::BetweenFingerAngle {
                side: require_arm(&args)?.single_side()?,
                case: args
                    .case
                    .ok_or_else(|| MonitorError::MissingArgument(name.to_string(), "case"))?,
                pair: FingerPair::new(
                    require_finger(args.finger, "finger")?,
                    require_finger(args.second_finger, "second finger")?,
                )?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_PAIR_ANGLE_THRESHOLD_DEG),
            },
            "fingerspread" => Condition::FingerSpread {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_SPREAD_THRESHOLD_DEG),
            },
            "fingeradduction" => Condition::FingerAdduction {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_ADDUCTION_THRESHOLD_DEG),
            },
            "wristsupination" => Condition::WristSupination {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_SUPINATION_THRESHOLD_DEG),
            },
            "wristpronation" => Condition::WristPronation {
                arm: require_arm(&args)?,
                threshold_deg: args
                    .threshold_deg
                    .unwrap_or(predicates::DEFAULT_PRONATION_THRESHOLD_DEG),
            },
            "facetouch" => Condition::FaceTouch {
                side: require_arm(&args)?.single_side()?,
            },
            "objecttouch" => Condition::ObjectTouch {
                side: require_arm(&args)?.single_side()?,
                object: args
                    .object
                    .ok_or_else(|| MonitorError::MissingArgument(name.to_string(), "object"))?,
                threshold_m: args
                    .distance_m
                    .unwrap_or(predicates::DEFAULT_OBJECT_TOUCH_DISTANCE_M),
            },
            "fingertouch" => Condition::FingerTouch {
                side: require_arm(&args)?.single_side()?,
                first: require_finger(args.finger, "finger")?,
                second: require_finger(args.second_finger, "second finger")?,
                threshold_m: args
                    .distance_m
                    .unwrap_or(predicates::DEFAULT_FINGER_TOUCH_DISTANCE_M),
            },
            "elbowbend" => Condition::ElbowBend {
                arm: require_arm(&args)?,
                detector: ElbowTrendDetector::bend(
                    args.threshold_deg.unwrap_or(DEFAULT_TREND_THRESHOLD_DEG),
                ),
            },
            "elbowextension" => Condition::ElbowExtension {
                arm: require_arm(&args)?,
                detector: ElbowTrendDetector::extension(
                    args.threshold_deg.unwrap_or(DEFAULT_TREND_THRESHOLD_DEG),
                ),
            },
            _ => return Err(MonitorError::UnknownCondition(name.to_string())),
        };
        Ok(condition)
    }

    /// Evaluate against the latest frame. Stateless variants inspect only
    /// the given snapshot; trend variants also advance their private
    /// history. No frame means false for every variant.
    pub fn evaluate(&mut self, frame: Option<&TelemetryFrame>) -> bool {
        match self {
            Condition::Seated => predicates::is_seated(frame),
            Condition::Standing => predicates::is_standing(frame),
            Condition::LeanForward { threshold_deg } => {
                predicates::leans_forward(frame, *threshold_deg)
            }
            Condition::SitUpStraight => predicates::sits_up_straight(frame),
            Condition::FingerFlexion {
                arm,
                finger,
                threshold_deg,
            } => predicates::finger_flexed(frame, *arm, *finger, *threshold_deg),
            Condition::FingerExtension {
                arm,
                finger,
                threshold_deg,
            } => predicates::finger_extended(frame, *arm, *finger, *threshold_deg),
            Condition::OpenPalm { arm, threshold_deg } => {
                predicates::palm_open(frame, *arm, *threshold_deg)
            }
            Condition::ClosedPalm { arm, threshold_deg } => {
                predicates::palm_closed(frame, *arm, *threshold_deg)
            }
            Condition::BetweenFingerAngle {
                side,
                case,
                pair,
                threshold_deg,
            } => predicates::between_finger_angle(frame, *side, *case, *pair, *threshold_deg),
            Condition::FingerSpread { arm, threshold_deg } => {
                predicates::fingers_spread(frame, *arm, *threshold_deg)
            }
            Condition::FingerAdduction { arm, threshold_deg } => {
                predicates::fingers_adducted(frame, *arm, *threshold_deg)
            }
            Condition::WristSupination { arm, threshold_deg } => {
                predicates::wrist_supinated(frame, *arm, *threshold_deg)
            }
            Condition::WristPronation { arm, threshold_deg } => {
                predicates::wrist_pronated(frame, *arm, *threshold_deg)
            }
            Condition::FaceTouch { side } => predicates::face_touched(frame, *side),
            Condition::ObjectTouch {
                side,
                object,
                threshold_m,
            } => predicates::object_touched(frame, *side, *object, *threshold_m),
            Condition::FingerTouch {
                side,
                first,
                second,
                threshold_m,
            } => predicates::fingers_touching(frame, *side, *first, *second, *threshold_m),
            Condition::ElbowBend { arm, detector } => detector.observe(frame, *arm),
            Condition::ElbowExtension { arm, detector } => detector.observe(frame, *arm),
        }
    }

    /// Stable name of the condition kind, for display and logging.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Condition::Seated => "seated",
            Condition::Standing => "standing",
            Condition::LeanForward { .. } => "lean_forward",
            Condition::SitUpStraight => "sit_up_straight",
            Condition::FingerFlexion { .. } => "finger_flexion",
            Condition::FingerExtension { .. } => "finger_extension",
            Condition::OpenPalm { .. } => "open_palm",
            Condition::ClosedPalm { .. } => "closed_palm",
            Condition::BetweenFingerAngle { .. } => "between_finger_angle",
            Condition::FingerSpread { .. } => "finger_spread",
            Condition::FingerAdduction { .. } => "finger_adduction",
            Condition::WristSupination { .. } => "wrist_supination",
            Condition::WristPronation { .. } => "wrist_pronation",
            Condition::FaceTouch { .. } => "face_touch",
            Condition::ObjectTouch { .. } => "object_touch",
            Condition::FingerTouch { .. } => "finger_touch",
            Condition::ElbowBend { .. } => "elbow_bend",
            Condition::ElbowExtension { .. } => "elbow_extension",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated_frame() -> TelemetryFrame {
        TelemetryFrame {
            hip_flexion: 30.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_named_is_tolerant_of_spelling() {
        for name in ["CheckSeated", "seated", "check_seated", "SEATED"] {
            let condition = Condition::named(name, ConditionArgs::default()).unwrap();
            assert!(matches!(condition, Condition::Seated));
        }
    }

    #[test]
    fn test_named_unknown_condition_is_fatal() {
        let err = Condition::named("CheckTelekinesis", ConditionArgs::default()).unwrap_err();
        assert!(matches!(err, MonitorError::UnknownCondition(_)));
    }

    #[test]
    fn test_named_missing_argument_is_fatal() {
        let err = Condition::named("CheckOpenPalm", ConditionArgs::default()).unwrap_err();
        assert!(matches!(err, MonitorError::MissingArgument(_, "arm")));

        let err = Condition::named(
            "CheckFingerFlexion",
            ConditionArgs {
                arm: Some(Arm::Left),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::MissingArgument(_, "finger")));
    }

    #[test]
    fn test_named_applies_defaults() {
        let condition = Condition::named(
            "CheckOpenPalm",
            ConditionArgs {
                arm: Some(Arm::Both),
                ..Default::default()
            },
        )
        .unwrap();
        match condition {
            Condition::OpenPalm { arm, threshold_deg } => {
                assert_eq!(arm, Arm::Both);
                assert_eq!(threshold_deg, predicates::DEFAULT_EXTENSION_THRESHOLD_DEG);
            }
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn test_named_rejects_both_for_single_hand_checks() {
        let err = Condition::named(
            "CheckFaceTouch",
            ConditionArgs {
                arm: Some(Arm::Both),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::InvalidSide(_)));
    }

    #[test]
    fn test_named_rejects_non_adjacent_pair() {
        let err = Condition::named(
            "CheckBetweenFingerAngle",
            ConditionArgs {
                arm: Some(Arm::Left),
                case: Some(SpreadCase::Spread),
                finger: Some(Finger::Thumb),
                second_finger: Some(Finger::Pinky),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, MonitorError::NonAdjacentFingers(_, _)));
    }

    #[test]
    fn test_pair_accepts_reversed_order() {
        let condition = Condition::named(
            "CheckBetweenFingerAngle",
            ConditionArgs {
                arm: Some(Arm::Right),
                case: Some(SpreadCase::Adducted),
                finger: Some(Finger::Middle),
                second_finger: Some(Finger::Index),
                ..Default::default()
            },
        )
        .unwrap();
        match condition {
            Condition::BetweenFingerAngle { pair, .. } => {
                assert_eq!(pair, FingerPair::IndexMiddle);
            }
            other => panic!("unexpected condition: {other:?}"),
        }
    }

    #[test]
    fn test_evaluate_dispatches_to_predicates() {
        let mut condition = Condition::named("CheckSeated", ConditionArgs::default()).unwrap();
        assert!(condition.evaluate(Some(&seated_frame())));
        assert!(!condition.evaluate(Some(&TelemetryFrame::default())));
        assert!(!condition.evaluate(None));
    }

    #[test]
    fn test_elbow_variant_carries_state_between_calls() {
        let mut condition = Condition::named(
            "CheckElbowExtension",
            ConditionArgs {
                arm: Some(Arm::Right),
                ..Default::default()
            },
        )
        .unwrap();

        for i in 0..5 {
            let mut frame = TelemetryFrame::default();
            frame.right.elbow_angle = 100.0 + 10.0 * i as f64;
            let result = condition.evaluate(Some(&frame));
            assert_eq!(result, i == 4, "tick {i}");
        }
    }
}
