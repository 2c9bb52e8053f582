//! Finger quantizer: continuous extension distance to a 3-level lift state.

use std::fmt;

use crate::error::{ClassifyError, ConfigError};

use super::hand_frame::{FingerId, HandFrame, FINGER_COUNT};

// ── Lift state ─────────────────────────────────────────────

/// Quantized extension level of one finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiftState {
    /// Measurement unusable (non-finite).  Never valid as a table index.
    Invalid,
    /// Curled into the palm.
    Down,
    /// Partially extended.
    Middle,
    /// Fully extended.
    Up,
}

/// Number of valid lift levels.
pub const LIFT_LEVELS: usize = 3;

impl LiftState {
    /// Table ordinal (Down=0, Middle=1, Up=2).  `None` for `Invalid`.
    pub fn ordinal(&self) -> Option<usize> {
        match self {
            Self::Invalid => None,
            Self::Down => Some(0),
            Self::Middle => Some(1),
            Self::Up => Some(2),
        }
    }

    /// Inverse of `ordinal`.
    pub fn from_ordinal(ordinal: usize) -> Self {
        match ordinal {
            0 => Self::Down,
            1 => Self::Middle,
            2 => Self::Up,
            _ => Self::Invalid,
        }
    }

    /// Single-character label used in diagnostics ("D", "M", "U", "?").
    pub fn as_char(&self) -> char {
        match self {
            Self::Invalid => '?',
            Self::Down => 'D',
            Self::Middle => 'M',
            Self::Up => 'U',
        }
    }
}

// ── Lift vector ────────────────────────────────────────────

/// One lift state per finger, in `FingerId` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiftVector(pub [LiftState; FINGER_COUNT]);

impl LiftVector {
    pub fn new(states: [LiftState; FINGER_COUNT]) -> Self {
        Self(states)
    }

    pub fn get(&self, finger: FingerId) -> LiftState {
        self.0[finger.index()]
    }

    /// Quantize every finger of a frame.
    pub fn from_frame(frame: &HandFrame, thresholds: &FingerThresholds) -> Self {
        let mut states = [LiftState::Invalid; FINGER_COUNT];
        for finger in FingerId::ALL {
            states[finger.index()] = thresholds.quantize(finger, frame.extension_distance(finger));
        }
        Self(states)
    }

    /// Base-3 table code, thumb most significant.
    pub fn code(&self) -> Result<usize, ClassifyError> {
        let mut code = 0;
        for (finger, state) in FingerId::ALL.iter().zip(self.0.iter()) {
            let ordinal = state.ordinal().ok_or_else(|| {
                ClassifyError::InvalidInput(format!(
                    "{} lift state is invalid in {}",
                    finger.as_str(),
                    self
                ))
            })?;
            code = code * LIFT_LEVELS + ordinal;
        }
        Ok(code)
    }

    /// Inverse of `code`.  Out-of-range codes yield `None`.
    pub fn from_code(code: usize) -> Option<Self> {
        if code >= LIFT_LEVELS.pow(FINGER_COUNT as u32) {
            return None;
        }
        let mut states = [LiftState::Invalid; FINGER_COUNT];
        let mut rest = code;
        for slot in states.iter_mut().rev() {
            *slot = LiftState::from_ordinal(rest % LIFT_LEVELS);
            rest /= LIFT_LEVELS;
        }
        Some(Self(states))
    }
}

impl fmt::Display for LiftVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in &self.0 {
            write!(f, "{}", state.as_char())?;
        }
        Ok(())
    }
}

// ── Thresholds ─────────────────────────────────────────────

/// Per-finger quantization boundaries, in sensor distance units.
#[derive(Debug, Clone, PartialEq)]
pub struct FingerThresholds {
    /// Below this a finger is `Down`.
    pub down: [f32; FINGER_COUNT],
    /// Below this (and not down) a finger is `Middle`; otherwise `Up`.
    pub middle: [f32; FINGER_COUNT],
}

impl Default for FingerThresholds {
    fn default() -> Self {
        Self {
            down: [10.0, 65.0, 65.0, 65.0, 60.0],
            middle: [50.0, 80.0, 80.0, 80.0, 70.0],
        }
    }
}

impl FingerThresholds {
    /// Check that every boundary is finite and `down < middle` per finger.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for finger in FingerId::ALL {
            let down = self.down[finger.index()];
            let middle = self.middle[finger.index()];
            if !down.is_finite() || !middle.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{} thresholds must be finite",
                    finger.as_str()
                )));
            }
            if down >= middle {
                return Err(ConfigError::ThresholdOrder {
                    finger: finger.as_str(),
                    down,
                    middle,
                });
            }
        }
        Ok(())
    }

    /// Quantize one finger's extension distance.
    pub fn quantize(&self, finger: FingerId, distance: f32) -> LiftState {
        if !distance.is_finite() {
            return LiftState::Invalid;
        }
        if distance < self.down[finger.index()] {
            LiftState::Down
        } else if distance < self.middle[finger.index()] {
            LiftState::Middle
        } else {
            LiftState::Up
        }
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asl::hand_frame::{set_test_extension, test_hand, Hand};

    use super::LiftState::{Down, Middle, Up};

    #[test]
    fn test_default_thresholds_valid() {
        assert!(FingerThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_threshold_order_rejected() {
        let mut t = FingerThresholds::default();
        t.down[FingerId::Ring.index()] = 90.0;
        match t.validate() {
            Err(ConfigError::ThresholdOrder { finger, .. }) => assert_eq!(finger, "ring"),
            other => panic!("Expected ThresholdOrder, got {:?}", other),
        }
    }

    #[test]
    fn test_equal_thresholds_rejected() {
        let mut t = FingerThresholds::default();
        t.middle[0] = t.down[0];
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_quantize_monotonic() {
        let t = FingerThresholds::default();
        for finger in FingerId::ALL {
            let down = t.down[finger.index()];
            let middle = t.middle[finger.index()];
            assert_eq!(t.quantize(finger, down - 1.0), Down);
            assert_eq!(t.quantize(finger, (down + middle) / 2.0), Middle);
            assert_eq!(t.quantize(finger, middle + 1.0), Up);
        }
    }

    #[test]
    fn test_quantize_boundaries() {
        let t = FingerThresholds::default();
        // Boundaries are exclusive on the lower level.
        assert_eq!(t.quantize(FingerId::Index, 65.0), Middle);
        assert_eq!(t.quantize(FingerId::Index, 80.0), Up);
        // Thumb distances are signed.
        assert_eq!(t.quantize(FingerId::Thumb, -20.0), Down);
    }

    #[test]
    fn test_quantize_non_finite_is_invalid() {
        let t = FingerThresholds::default();
        assert_eq!(t.quantize(FingerId::Middle, f32::NAN), LiftState::Invalid);
        assert_eq!(t.quantize(FingerId::Middle, f32::INFINITY), LiftState::Invalid);
    }

    #[test]
    fn test_code_roundtrip_extremes() {
        let all_down = LiftVector::new([Down; 5]);
        let all_up = LiftVector::new([Up; 5]);
        assert_eq!(all_down.code(), Ok(0));
        assert_eq!(all_up.code(), Ok(242));
        assert_eq!(LiftVector::from_code(242), Some(all_up));
        assert_eq!(LiftVector::from_code(243), None);
    }

    #[test]
    fn test_code_thumb_most_significant() {
        let v = LiftVector::new([Middle, Down, Down, Down, Down]);
        assert_eq!(v.code(), Ok(81));
        let v = LiftVector::new([Down, Down, Down, Down, Middle]);
        assert_eq!(v.code(), Ok(1));
    }

    #[test]
    fn test_code_rejects_invalid() {
        let v = LiftVector::new([Down, LiftState::Invalid, Down, Down, Down]);
        assert!(matches!(v.code(), Err(ClassifyError::InvalidInput(_))));
    }

    #[test]
    fn test_from_frame() {
        let mut frame = test_hand(Hand::Right);
        set_test_extension(&mut frame, FingerId::Thumb, 0.0);
        set_test_extension(&mut frame, FingerId::Index, 90.0);
        set_test_extension(&mut frame, FingerId::Middle, 72.0);
        set_test_extension(&mut frame, FingerId::Ring, 40.0);
        set_test_extension(&mut frame, FingerId::Pinky, 30.0);

        let v = LiftVector::from_frame(&frame, &FingerThresholds::default());
        assert_eq!(v, LiftVector::new([Down, Up, Middle, Down, Down]));
        assert_eq!(v.to_string(), "DUMDD");
    }
}
