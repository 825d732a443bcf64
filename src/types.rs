//! Core types for the motioncheck engine
//!
//! This module defines the telemetry snapshot consumed by every check and
//! the typed selectors used to address parts of the body:
//! - `TelemetryFrame` and its nested arm/hand structures
//! - `Side`, `Arm`, `Finger`, `FingerJoint`, `FingerPair`, `SpreadCase`
//! - `Position` with Euclidean distance
//!
//! Selector parsing is tolerant (case-insensitive substring) because the
//! upstream instruction programs address limbs by free text; anything
//! outside the recognized vocabulary is a fatal caller error.

use crate::error::MonitorError;
use serde::{Deserialize, Serialize};

/// A concrete body side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    /// Parse a side from free text. "Both" is not a concrete side and is
    /// rejected here; use [`Arm::parse`] for selectors that accept it.
    pub fn parse(text: &str) -> Result<Side, MonitorError> {
        let lower = text.to_lowercase();
        if lower.contains("left") {
            Ok(Side::Left)
        } else if lower.contains("right") {
            Ok(Side::Right)
        } else {
            Err(MonitorError::InvalidSide(text.to_string()))
        }
    }
}

/// Limb-side selector for checks that may span both arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arm {
    Left,
    Right,
    Both,
}

impl Arm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Arm::Left => "left",
            Arm::Right => "right",
            Arm::Both => "both",
        }
    }

    /// The concrete sides this selector covers.
    pub fn sides(&self) -> &'static [Side] {
        match self {
            Arm::Left => &[Side::Left],
            Arm::Right => &[Side::Right],
            Arm::Both => &[Side::Left, Side::Right],
        }
    }

    /// Parse an arm selector from free text ("both" wins over "left"/"right").
    pub fn parse(text: &str) -> Result<Arm, MonitorError> {
        let lower = text.to_lowercase();
        if lower.contains("both") {
            Ok(Arm::Both)
        } else if lower.contains("left") {
            Ok(Arm::Left)
        } else if lower.contains("right") {
            Ok(Arm::Right)
        } else {
            Err(MonitorError::InvalidSide(text.to_string()))
        }
    }

    /// Narrow to a single side; `Both` is rejected for checks that only
    /// make sense on one hand (pair angles, touch checks).
    pub fn single_side(&self) -> Result<Side, MonitorError> {
        match self {
            Arm::Left => Ok(Side::Left),
            Arm::Right => Ok(Side::Right),
            Arm::Both => Err(MonitorError::InvalidSide("both".to_string())),
        }
    }
}

/// A digit of the hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Finger::Thumb => "thumb",
            Finger::Index => "index",
            Finger::Middle => "middle",
            Finger::Ring => "ring",
            Finger::Pinky => "pinky",
        }
    }

    /// The joints tracked for this digit. The thumb carries IP and CMC
    /// flexion; the other four digits carry MCP, PIP and DIP flexion.
    pub fn joints(&self) -> &'static [FingerJoint] {
        match self {
            Finger::Thumb => &[FingerJoint::Ip, FingerJoint::Cmc],
            _ => &[FingerJoint::Mcp, FingerJoint::Pip, FingerJoint::Dip],
        }
    }

    pub fn parse(text: &str) -> Result<Finger, MonitorError> {
        let lower = text.to_lowercase();
        if lower.contains("thumb") {
            Ok(Finger::Thumb)
        } else if lower.contains("index") {
            Ok(Finger::Index)
        } else if lower.contains("middle") {
            Ok(Finger::Middle)
        } else if lower.contains("ring") {
            Ok(Finger::Ring)
        } else if lower.contains("pinky") || lower.contains("little") {
            Ok(Finger::Pinky)
        } else {
            Err(MonitorError::InvalidFinger(text.to_string()))
        }
    }
}

/// A finger joint whose flexion angle is reported in the telemetry stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerJoint {
    /// Carpometacarpal (thumb only)
    Cmc,
    /// Metacarpophalangeal
    Mcp,
    /// Interphalangeal (thumb only)
    Ip,
    /// Proximal interphalangeal
    Pip,
    /// Distal interphalangeal
    Dip,
}

/// An adjacent finger pair with a named abduction angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FingerPair {
    ThumbIndex,
    IndexMiddle,
    MiddleRing,
    RingPinky,
}

impl FingerPair {
    pub const ALL: [FingerPair; 4] = [
        FingerPair::ThumbIndex,
        FingerPair::IndexMiddle,
        FingerPair::MiddleRing,
        FingerPair::RingPinky,
    ];

    /// Build a pair from two digits in either order. Non-adjacent digits
    /// are a caller error.
    pub fn new(a: Finger, b: Finger) -> Result<FingerPair, MonitorError> {
        use Finger::*;
        match (a, b) {
            (Thumb, Index) | (Index, Thumb) => Ok(FingerPair::ThumbIndex),
            (Index, Middle) | (Middle, Index) => Ok(FingerPair::IndexMiddle),
            (Middle, Ring) | (Ring, Middle) => Ok(FingerPair::MiddleRing),
            (Ring, Pinky) | (Pinky, Ring) => Ok(FingerPair::RingPinky),
            _ => Err(MonitorError::NonAdjacentFingers(
                a.as_str().to_string(),
                b.as_str().to_string(),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FingerPair::ThumbIndex => "thumb_index",
            FingerPair::IndexMiddle => "index_middle",
            FingerPair::MiddleRing => "middle_ring",
            FingerPair::RingPinky => "ring_pinky",
        }
    }
}

/// Whether a between-finger check expects the pair apart or together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpreadCase {
    Spread,
    Adducted,
}

impl SpreadCase {
    pub fn parse(text: &str) -> Result<SpreadCase, MonitorError> {
        let lower = text.to_lowercase();
        if lower.contains("spread") {
            Ok(SpreadCase::Spread)
        } else if lower.contains("adduct") {
            Ok(SpreadCase::Adducted)
        } else {
            Err(MonitorError::InvalidCase(text.to_string()))
        }
    }
}

/// A 3-D position in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Thumb joint flexion angles (degrees).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThumbAngles {
    pub ip_flexion: f64,
    pub cmc_flexion: f64,
}

/// Joint flexion angles for a non-thumb digit (degrees).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FingerAngles {
    pub mcp_flexion: f64,
    pub pip_flexion: f64,
    pub dip_flexion: f64,
}

/// Abduction angles between adjacent digits (degrees).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AbductionAngles {
    pub thumb_index: f64,
    pub index_middle: f64,
    pub middle_ring: f64,
    pub ring_pinky: f64,
}

/// Per-hand telemetry: joint flexion, abduction and fingertip positions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandFrame {
    pub thumb: ThumbAngles,
    pub index: FingerAngles,
    pub middle: FingerAngles,
    pub ring: FingerAngles,
    pub pinky: FingerAngles,
    pub abduction: AbductionAngles,
    pub thumb_tip: Position,
    pub index_tip: Position,
    pub middle_tip: Position,
    pub ring_tip: Position,
    pub pinky_tip: Position,
}

impl HandFrame {
    /// Flexion angle of one joint of one digit.
    ///
    /// Returns `None` for anatomically absent combinations (e.g. a thumb
    /// PIP); iterating [`Finger::joints`] never produces one.
    pub fn joint_flexion(&self, finger: Finger, joint: FingerJoint) -> Option<f64> {
        use FingerJoint::*;
        match (finger, joint) {
            (Finger::Thumb, Ip) => Some(self.thumb.ip_flexion),
            (Finger::Thumb, Cmc) => Some(self.thumb.cmc_flexion),
            (Finger::Index, Mcp) => Some(self.index.mcp_flexion),
            (Finger::Index, Pip) => Some(self.index.pip_flexion),
            (Finger::Index, Dip) => Some(self.index.dip_flexion),
            (Finger::Middle, Mcp) => Some(self.middle.mcp_flexion),
            (Finger::Middle, Pip) => Some(self.middle.pip_flexion),
            (Finger::Middle, Dip) => Some(self.middle.dip_flexion),
            (Finger::Ring, Mcp) => Some(self.ring.mcp_flexion),
            (Finger::Ring, Pip) => Some(self.ring.pip_flexion),
            (Finger::Ring, Dip) => Some(self.ring.dip_flexion),
            (Finger::Pinky, Mcp) => Some(self.pinky.mcp_flexion),
            (Finger::Pinky, Pip) => Some(self.pinky.pip_flexion),
            (Finger::Pinky, Dip) => Some(self.pinky.dip_flexion),
            _ => None,
        }
    }

    /// All tracked flexion angles of one digit, in joint order.
    pub fn flexion_angles(&self, finger: Finger) -> impl Iterator<Item = f64> + '_ {
        finger
            .joints()
            .iter()
            .filter_map(move |joint| self.joint_flexion(finger, *joint))
    }

    /// Fingertip position of one digit.
    pub fn tip(&self, finger: Finger) -> Position {
        match finger {
            Finger::Thumb => self.thumb_tip,
            Finger::Index => self.index_tip,
            Finger::Middle => self.middle_tip,
            Finger::Ring => self.ring_tip,
            Finger::Pinky => self.pinky_tip,
        }
    }

    /// Abduction angle of an adjacent pair.
    pub fn pair_angle(&self, pair: FingerPair) -> f64 {
        match pair {
            FingerPair::ThumbIndex => self.abduction.thumb_index,
            FingerPair::IndexMiddle => self.abduction.index_middle,
            FingerPair::MiddleRing => self.abduction.middle_ring,
            FingerPair::RingPinky => self.abduction.ring_pinky,
        }
    }
}

/// Per-arm telemetry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArmFrame {
    /// Elbow angle (degrees; larger = more extended).
    pub elbow_angle: f64,
    /// Wrist supination angle (degrees; positive = supinated, negative =
    /// pronated, zero = thumb up).
    pub wrist_supination: f64,
    /// Palm center position.
    pub palm: Position,
    pub hand: HandFrame,
}

/// One immutable snapshot of body-joint telemetry.
///
/// Produced externally once per tick. Checks only ever read the latest
/// frame; trend detectors keep their own private angle history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryFrame {
    /// Hip flexion angle (degrees). Seated posture reads ≥ 10.
    pub hip_flexion: f64,
    /// Trunk tilt angle (degrees; 0 = upright).
    pub trunk_tilt: f64,
    /// Facial reference landmark used for face-touch checks.
    pub mouth: Position,
    pub left: ArmFrame,
    pub right: ArmFrame,
}

impl TelemetryFrame {
    pub fn arm(&self, side: Side) -> &ArmFrame {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Elbow angles as a `(left, right)` pair, the shape consumed by the
    /// trend detectors.
    pub fn elbow_angles(&self) -> (f64, f64) {
        (self.left.elbow_angle, self.right.elbow_angle)
    }
}
