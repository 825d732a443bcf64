//! Threshold predicate library
//!
//! Stateless checks over the current telemetry snapshot, parameterized by
//! limb side and, for hand checks, by digit. Every predicate takes
//! `Option<&TelemetryFrame>` and fails closed: no frame means false, never
//! an error.
//!
//! Side-selector semantics are not uniform, and deliberately so:
//! - single-digit flexion/extension with `Arm::Both` passes if *either*
//!   hand qualifies;
//! - whole-palm open/closed, spread/adduction and wrist checks with
//!   `Arm::Both` require *both* hands independently.

use crate::types::{Arm, Finger, FingerPair, Position, Side, SpreadCase, TelemetryFrame};

/// Hip flexion at or above this reads as seated.
pub const SEATED_HIP_FLEXION_DEG: f64 = 10.0;
/// Trunk tilt below this reads as sitting up straight.
pub const NEUTRAL_TRUNK_TILT_DEG: f64 = 10.0;
/// Default trunk tilt for a lean-forward check.
pub const DEFAULT_LEAN_THRESHOLD_DEG: f64 = 20.0;
/// Default per-joint flexion threshold: a digit is flexed when all of its
/// joints are below this.
pub const DEFAULT_FLEXION_THRESHOLD_DEG: f64 = 110.0;
/// Default per-joint extension threshold: a digit is extended when all of
/// its joints are above this.
pub const DEFAULT_EXTENSION_THRESHOLD_DEG: f64 = 140.0;
/// Default abduction threshold for a single adjacent-pair check.
pub const DEFAULT_PAIR_ANGLE_THRESHOLD_DEG: f64 = 10.0;
/// Default abduction threshold for a whole-hand spread check.
pub const DEFAULT_SPREAD_THRESHOLD_DEG: f64 = 7.0;
/// Default abduction threshold for a whole-hand adduction check.
pub const DEFAULT_ADDUCTION_THRESHOLD_DEG: f64 = 8.0;
/// Thumb–index adduction threshold used by the whole-hand adduction check.
/// Thumb opposition keeps this pair wider than the inter-finger pairs.
pub const THUMB_INDEX_ADDUCTION_THRESHOLD_DEG: f64 = 20.0;
/// Default wrist supination threshold.
pub const DEFAULT_SUPINATION_THRESHOLD_DEG: f64 = 60.0;
/// Default wrist pronation threshold (applied with a negated sign).
pub const DEFAULT_PRONATION_THRESHOLD_DEG: f64 = 30.0;
/// Palm-to-mouth distance for a face-touch check, in meters.
pub const FACE_TOUCH_DISTANCE_M: f64 = 0.2;
/// Default palm-to-object distance for an object-touch check, in meters.
pub const DEFAULT_OBJECT_TOUCH_DISTANCE_M: f64 = 0.05;
/// Default fingertip-to-fingertip touch distance, in meters. Sensible
/// values sit in `[0.02, 0.03)`.
pub const DEFAULT_FINGER_TOUCH_DISTANCE_M: f64 = 0.02;

/// True when two positions are within `threshold_m` of each other.
pub fn within_distance(a: Position, b: Position, threshold_m: f64) -> bool {
    a.distance_to(&b) < threshold_m
}

/// Seated: hip flexion at or above [`SEATED_HIP_FLEXION_DEG`].
pub fn is_seated(frame: Option<&TelemetryFrame>) -> bool {
    match frame {
        Some(frame) => frame.hip_flexion >= SEATED_HIP_FLEXION_DEG,
        None => false,
    }
}

/// Standing: hip flexion below [`SEATED_HIP_FLEXION_DEG`].
pub fn is_standing(frame: Option<&TelemetryFrame>) -> bool {
    match frame {
        Some(frame) => frame.hip_flexion < SEATED_HIP_FLEXION_DEG,
        None => false,
    }
}

/// Leaning or tilting forward beyond `threshold_deg`.
pub fn leans_forward(frame: Option<&TelemetryFrame>, threshold_deg: f64) -> bool {
    match frame {
        Some(frame) => frame.trunk_tilt >= threshold_deg,
        None => false,
    }
}

/// Trunk neutral: tilt below [`NEUTRAL_TRUNK_TILT_DEG`].
pub fn sits_up_straight(frame: Option<&TelemetryFrame>) -> bool {
    match frame {
        Some(frame) => frame.trunk_tilt < NEUTRAL_TRUNK_TILT_DEG,
        None => false,
    }
}

fn digit_flexed(frame: &TelemetryFrame, side: Side, finger: Finger, threshold_deg: f64) -> bool {
    frame
        .arm(side)
        .hand
        .flexion_angles(finger)
        .all(|angle| angle < threshold_deg)
}

fn digit_extended(frame: &TelemetryFrame, side: Side, finger: Finger, threshold_deg: f64) -> bool {
    frame
        .arm(side)
        .hand
        .flexion_angles(finger)
        .all(|angle| angle > threshold_deg)
}

/// A digit is flexed when *all* of its joints are below `threshold_deg`.
/// With `Arm::Both`, either hand qualifying is enough.
pub fn finger_flexed(
    frame: Option<&TelemetryFrame>,
    arm: Arm,
    finger: Finger,
    threshold_deg: f64,
) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides()
        .iter()
        .any(|side| digit_flexed(frame, *side, finger, threshold_deg))
}

/// A digit is extended when *all* of its joints are above `threshold_deg`.
/// With `Arm::Both`, either hand qualifying is enough.
pub fn finger_extended(
    frame: Option<&TelemetryFrame>,
    arm: Arm,
    finger: Finger,
    threshold_deg: f64,
) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides()
        .iter()
        .any(|side| digit_extended(frame, *side, finger, threshold_deg))
}

/// Fist: every joint of every digit below `threshold_deg`. With
/// `Arm::Both`, both hands must qualify independently.
pub fn palm_closed(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides().iter().all(|side| {
        Finger::ALL
            .iter()
            .all(|finger| digit_flexed(frame, *side, *finger, threshold_deg))
    })
}

/// Fully open palm: every joint of every digit above `threshold_deg`.
/// With `Arm::Both`, both hands must qualify independently.
pub fn palm_open(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides().iter().all(|side| {
        Finger::ALL
            .iter()
            .all(|finger| digit_extended(frame, *side, *finger, threshold_deg))
    })
}

/// Abduction check on one adjacent pair of one hand.
///
/// `Spread` holds when the pair angle exceeds `threshold_deg`, `Adducted`
/// when it is below. Anatomically sensible thresholds are 20–70° for
/// thumb–index and 10–15° for the other pairs; values outside those
/// domains are evaluated as given, the domain is the caller's to respect.
pub fn between_finger_angle(
    frame: Option<&TelemetryFrame>,
    side: Side,
    case: SpreadCase,
    pair: FingerPair,
    threshold_deg: f64,
) -> bool {
    let Some(frame) = frame else { return false };
    let angle = frame.arm(side).hand.pair_angle(pair);
    match case {
        SpreadCase::Spread => angle > threshold_deg,
        SpreadCase::Adducted => angle < threshold_deg,
    }
}

/// All four adjacent pairs spread past `threshold_deg` on every selected
/// hand.
pub fn fingers_spread(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides().iter().all(|side| {
        FingerPair::ALL.iter().all(|pair| {
            between_finger_angle(Some(frame), *side, SpreadCase::Spread, *pair, threshold_deg)
        })
    })
}

/// All four adjacent pairs adducted on every selected hand. The
/// thumb–index pair is judged against
/// [`THUMB_INDEX_ADDUCTION_THRESHOLD_DEG`] rather than `threshold_deg`.
pub fn fingers_adducted(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides().iter().all(|side| {
        FingerPair::ALL.iter().all(|pair| {
            let pair_threshold = if *pair == FingerPair::ThumbIndex {
                THUMB_INDEX_ADDUCTION_THRESHOLD_DEG
            } else {
                threshold_deg
            };
            between_finger_angle(Some(frame), *side, SpreadCase::Adducted, *pair, pair_threshold)
        })
    })
}

/// Wrist supinated (palm up): supination angle above `threshold_deg` on
/// every selected wrist.
pub fn wrist_supinated(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides()
        .iter()
        .all(|side| frame.arm(*side).wrist_supination > threshold_deg)
}

/// Wrist pronated (palm down): supination angle below `-threshold_deg` on
/// every selected wrist.
pub fn wrist_pronated(frame: Option<&TelemetryFrame>, arm: Arm, threshold_deg: f64) -> bool {
    let Some(frame) = frame else { return false };
    arm.sides()
        .iter()
        .all(|side| frame.arm(*side).wrist_supination < -threshold_deg)
}

/// Palm within [`FACE_TOUCH_DISTANCE_M`] of the facial reference landmark.
pub fn face_touched(frame: Option<&TelemetryFrame>, side: Side) -> bool {
    let Some(frame) = frame else { return false };
    within_distance(frame.arm(side).palm, frame.mouth, FACE_TOUCH_DISTANCE_M)
}

/// Palm within `threshold_m` of an externally supplied object position.
pub fn object_touched(
    frame: Option<&TelemetryFrame>,
    side: Side,
    object: Position,
    threshold_m: f64,
) -> bool {
    let Some(frame) = frame else { return false };
    within_distance(frame.arm(side).palm, object, threshold_m)
}

/// Two fingertips of the same hand within `threshold_m` of each other.
///
/// A digit never touches itself; passing the same digit twice reports
/// false. Sensible thresholds sit in `[0.02, 0.03)` meters.
pub fn fingers_touching(
    frame: Option<&TelemetryFrame>,
    side: Side,
    first: Finger,
    second: Finger,
    threshold_m: f64,
) -> bool {
    let Some(frame) = frame else { return false };
    if first == second {
        return false;
    }
    let hand = &frame.arm(side).hand;
    within_distance(hand.tip(first), hand.tip(second), threshold_m)
}
