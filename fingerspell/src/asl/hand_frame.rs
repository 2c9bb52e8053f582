//! Hand frame data structures consumed by the classifier.
//!
//! A `HandFrame` is one read-only snapshot of a tracked hand: palm pose,
//! handedness, and per-finger bone geometry (four bones per finger, thumb
//! included, with a zero-length metacarpal where the sensor has none).
//! Also provides the sensor-adaptation step that turns a frame into the
//! per-finger extension distances the quantizer expects.

use super::geometry::Vec3;

// ── Finger definitions ─────────────────────────────────────

/// The five fingers, in the order used for every 5-tuple in this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FingerId {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// Number of fingers per hand.
pub const FINGER_COUNT: usize = 5;

impl FingerId {
    /// All fingers in tuple order.
    pub const ALL: [FingerId; FINGER_COUNT] = [
        FingerId::Thumb,
        FingerId::Index,
        FingerId::Middle,
        FingerId::Ring,
        FingerId::Pinky,
    ];

    /// Convert finger enum to array index (0-4).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// String representation for IPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

/// Bones of a finger, from the palm outwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoneKind {
    Metacarpal,
    Proximal,
    Intermediate,
    Distal,
}

/// Number of bones per finger.
pub const BONE_COUNT: usize = 4;

impl BoneKind {
    pub fn index(&self) -> usize {
        *self as usize
    }
}

// ── Hand enum ──────────────────────────────────────────────

/// Which hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// +1 for the right hand, -1 for the left.  Mirrors signed side tests.
    pub fn sign(&self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// Reference axis the palm's side vector is compared against when
    /// testing for a sideways-tilted hand.
    pub fn tilt_reference(&self) -> Vec3 {
        match self {
            Self::Left => Vec3::UP,
            Self::Right => Vec3::DOWN,
        }
    }
}

// ── Bone / finger pose ─────────────────────────────────────

/// A single bone, spanning two joints.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bone {
    /// Joint closer to the wrist.
    pub prev_joint: Vec3,
    /// Joint closer to the fingertip.
    pub next_joint: Vec3,
}

impl Bone {
    pub fn new(prev_joint: Vec3, next_joint: Vec3) -> Self {
        Self {
            prev_joint,
            next_joint,
        }
    }

    /// Midpoint of the bone.
    pub fn center(&self) -> Vec3 {
        (self.prev_joint + self.next_joint) * 0.5
    }
}

/// Pose data for a single finger.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FingerPose {
    /// Fingertip position.
    pub tip: Vec3,
    /// Fingertip position after the sensor's own temporal stabilization.
    pub stabilized_tip: Vec3,
    /// Pointing direction (unit vector).
    pub direction: Vec3,
    /// Bones indexed by `BoneKind`.
    pub bones: [Bone; BONE_COUNT],
}

impl FingerPose {
    /// Build a finger from its five joints, base of the metacarpal first.
    pub fn from_joints(
        joints: [Vec3; BONE_COUNT + 1],
        tip: Vec3,
        stabilized_tip: Vec3,
        direction: Vec3,
    ) -> Self {
        let bones = [
            Bone::new(joints[0], joints[1]),
            Bone::new(joints[1], joints[2]),
            Bone::new(joints[2], joints[3]),
            Bone::new(joints[3], joints[4]),
        ];
        Self {
            tip,
            stabilized_tip,
            direction,
            bones,
        }
    }

    pub fn bone(&self, kind: BoneKind) -> &Bone {
        &self.bones[kind.index()]
    }
}

// ── Hand frame ─────────────────────────────────────────────

/// One tracked hand at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    /// Handedness reported by the sensor.
    pub hand: Hand,
    /// Palm centre.
    pub palm_position: Vec3,
    /// Unit normal pointing out of the palm.
    pub palm_normal: Vec3,
    /// Unit vector from the palm towards the fingers.
    pub direction: Vec3,
    /// Fingers indexed by `FingerId`.
    pub fingers: [FingerPose; FINGER_COUNT],
}

impl HandFrame {
    pub fn finger(&self, finger: FingerId) -> &FingerPose {
        &self.fingers[finger.index()]
    }

    /// Position of a fingertip.
    pub fn tip(&self, finger: FingerId) -> Vec3 {
        self.fingers[finger.index()].tip
    }

    /// Distance between two fingertips.
    pub fn tip_distance(&self, a: FingerId, b: FingerId) -> f32 {
        self.tip(a).distance(self.tip(b))
    }

    /// Axis perpendicular to the palm direction within the palm plane
    /// (`palm_normal × direction`).
    pub fn palm_side(&self) -> Vec3 {
        self.palm_normal.cross(self.direction)
    }

    /// How far a finger is extended.  Larger means more extended.
    ///
    /// The thumb is measured as a signed offset of its tip across the palm
    /// (along `direction × palm_normal`, mirrored for the left hand); the
    /// other fingers by the distance of their distal bone from the palm.
    pub fn extension_distance(&self, finger: FingerId) -> f32 {
        match finger {
            FingerId::Thumb => {
                let axis = self.direction.cross(self.palm_normal);
                let offset = self.tip(FingerId::Thumb) - self.palm_position;
                offset.signed_projection(axis) * self.hand.sign()
            }
            _ => {
                let distal = self.finger(finger).bone(BoneKind::Distal).center();
                self.palm_position.distance(distal)
            }
        }
    }
}

// ── Frame sample ───────────────────────────────────────────

/// Everything the sensor delivered for one frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSample {
    /// All hands seen in the frame.
    pub hands: Vec<HandFrame>,
    /// Capture time in milliseconds on a monotonic timeline.
    pub timestamp_ms: f64,
}

impl FrameSample {
    pub fn new(hands: Vec<HandFrame>, timestamp_ms: f64) -> Self {
        Self {
            hands,
            timestamp_ms,
        }
    }

    /// A sample with no hand in view.
    pub fn empty(timestamp_ms: f64) -> Self {
        Self::new(Vec::new(), timestamp_ms)
    }

    /// The hand to classify: present only when exactly one hand is tracked.
    /// Zero or several hands both count as tracking loss.
    pub fn single_hand(&self) -> Option<&HandFrame> {
        match self.hands.as_slice() {
            [hand] => Some(hand),
            _ => None,
        }
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Lateral offset (mm) of each finger's base from the palm centre.
#[cfg(test)]
const TEST_FINGER_OFFSETS: [f32; FINGER_COUNT] = [-40.0, -24.0, -6.0, 12.0, 28.0];

/// A straight finger lying along `dir`, whose distal bone is centred
/// `reach` millimetres from `origin`.
#[cfg(test)]
pub(crate) fn test_finger(origin: Vec3, dir: Vec3, reach: f32) -> FingerPose {
    let at = |d: f32| origin + dir * d;
    let joints = [
        at(reach - 60.0),
        at(reach - 40.0),
        at(reach - 24.0),
        at(reach - 8.0),
        at(reach + 8.0),
    ];
    FingerPose::from_joints(joints, at(reach + 8.0), at(reach + 8.0), dir)
}

/// A hand held flat, palm down, fingers pointing away from the sensor
/// (-z), every finger moderately extended.
#[cfg(test)]
pub(crate) fn test_hand(hand: Hand) -> HandFrame {
    let mut frame = HandFrame {
        hand,
        palm_position: Vec3::ZERO,
        palm_normal: Vec3::DOWN,
        direction: Vec3::new(0.0, 0.0, -1.0),
        fingers: Default::default(),
    };
    for finger in FingerId::ALL {
        set_test_extension(&mut frame, finger, 70.0);
    }
    frame
}

/// A hand whose fingers have the given extensions, in `FingerId` order.
#[cfg(test)]
pub(crate) fn test_pose(hand: Hand, extensions: [f32; FINGER_COUNT]) -> HandFrame {
    let mut frame = test_hand(hand);
    for finger in FingerId::ALL {
        set_test_extension(&mut frame, finger, extensions[finger.index()]);
    }
    frame
}

/// Re-pose a finger so that `extension_distance(finger)` equals `distance`.
#[cfg(test)]
pub(crate) fn set_test_extension(frame: &mut HandFrame, finger: FingerId, distance: f32) {
    let palm = frame.palm_position;
    match finger {
        FingerId::Thumb => {
            let axis = frame.direction.cross(frame.palm_normal);
            let axis = axis * (1.0 / axis.length());
            let dir = axis * frame.hand.sign();
            frame.fingers[finger.index()] = test_finger(palm, dir, distance - 8.0);
        }
        _ => {
            let lateral = TEST_FINGER_OFFSETS[finger.index()] * frame.hand.sign();
            let raw = Vec3::new(lateral, 0.0, -60.0);
            let dir = raw * (1.0 / raw.length());
            frame.fingers[finger.index()] = test_finger(palm, dir, distance);
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
