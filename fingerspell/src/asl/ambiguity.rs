//! First pass: lift vector to ambiguity class via a 243-entry lookup table.
//!
//! Neighbouring lift codes are deliberately routed to the same class so that
//! jitter around a quantization boundary does not change the family.

use tracing::debug;

use crate::error::{ClassifyError, ConfigError};

use super::hand_frame::FINGER_COUNT;
use super::lift::{LiftState, LiftVector};

// ── Ambiguity classes ──────────────────────────────────────

/// Coarse pose family awaiting geometric resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmbiguityClass {
    /// No known letter has this finger configuration.
    Invalid,
    Aemnst,
    B,
    Co,
    Dgpqz,
    F,
    Hkruv,
    Ij,
    L,
    W,
    X,
    Y,
}

/// Number of resolvable (non-invalid) families.
pub const FAMILY_COUNT: usize = 11;

/// Number of lookup table entries (3 levels ^ 5 fingers).
pub const TABLE_SIZE: usize = 243;

impl AmbiguityClass {
    /// Every resolvable family, in declaration order.
    pub const FAMILIES: [AmbiguityClass; FAMILY_COUNT] = [
        AmbiguityClass::Aemnst,
        AmbiguityClass::B,
        AmbiguityClass::Co,
        AmbiguityClass::Dgpqz,
        AmbiguityClass::F,
        AmbiguityClass::Hkruv,
        AmbiguityClass::Ij,
        AmbiguityClass::L,
        AmbiguityClass::W,
        AmbiguityClass::X,
        AmbiguityClass::Y,
    ];

    /// Position within `FAMILIES`, `None` for `Invalid`.
    pub fn family_index(&self) -> Option<usize> {
        match self {
            Self::Invalid => None,
            Self::Aemnst => Some(0),
            Self::B => Some(1),
            Self::Co => Some(2),
            Self::Dgpqz => Some(3),
            Self::F => Some(4),
            Self::Hkruv => Some(5),
            Self::Ij => Some(6),
            Self::L => Some(7),
            Self::W => Some(8),
            Self::X => Some(9),
            Self::Y => Some(10),
        }
    }

    /// String representation for IPC.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Aemnst => "aemnst",
            Self::B => "b",
            Self::Co => "co",
            Self::Dgpqz => "dgpqz",
            Self::F => "f",
            Self::Hkruv => "hkruv",
            Self::Ij => "ij",
            Self::L => "l",
            Self::W => "w",
            Self::X => "x",
            Self::Y => "y",
        }
    }

    /// Letters that share this family's finger configuration.
    pub fn candidates(&self) -> &'static str {
        match self {
            Self::Invalid => "",
            Self::Aemnst => "AEMNST",
            Self::B => "B",
            Self::Co => "CO",
            Self::Dgpqz => "DGPQZ",
            Self::F => "F",
            Self::Hkruv => "HKRUV",
            Self::Ij => "IJ",
            Self::L => "L",
            Self::W => "W",
            Self::X => "X",
            Self::Y => "Y",
        }
    }

    pub fn is_valid(&self) -> bool {
        *self != Self::Invalid
    }
}

// ── Table contents ─────────────────────────────────────────

const D: LiftState = LiftState::Down;
const M: LiftState = LiftState::Middle;
const U: LiftState = LiftState::Up;

/// Hand-authored entries, `[thumb, index, middle, ring, pinky]`.
/// Every code not listed here is `Invalid`.
pub const STANDARD_ENTRIES: [([LiftState; FINGER_COUNT], AmbiguityClass); 29] = [
    // A E M N S T
    ([D, D, D, D, D], AmbiguityClass::Aemnst),
    ([M, D, D, D, D], AmbiguityClass::Aemnst),
    // H K R U V
    ([D, U, U, D, D], AmbiguityClass::Hkruv),
    ([M, U, U, D, D], AmbiguityClass::Hkruv),
    // D G P Q Z
    ([D, U, D, D, D], AmbiguityClass::Dgpqz),
    ([M, U, D, D, D], AmbiguityClass::Dgpqz),
    ([M, U, D, D, M], AmbiguityClass::Dgpqz),
    ([M, U, D, M, D], AmbiguityClass::Dgpqz),
    ([M, U, D, M, M], AmbiguityClass::Dgpqz),
    ([M, U, M, D, D], AmbiguityClass::Dgpqz),
    ([M, U, M, D, M], AmbiguityClass::Dgpqz),
    ([M, U, M, M, D], AmbiguityClass::Dgpqz),
    ([M, U, M, M, M], AmbiguityClass::Dgpqz),
    ([D, U, M, M, M], AmbiguityClass::Dgpqz),
    // L
    ([U, U, D, D, D], AmbiguityClass::L),
    // I J
    ([D, D, D, D, U], AmbiguityClass::Ij),
    ([M, D, D, D, U], AmbiguityClass::Ij),
    // C O
    ([M, U, U, U, U], AmbiguityClass::Co),
    ([M, M, M, M, M], AmbiguityClass::Co),
    ([D, M, M, M, M], AmbiguityClass::Co),
    // B
    ([D, U, U, U, U], AmbiguityClass::B),
    // F
    ([M, D, U, U, U], AmbiguityClass::F),
    ([M, M, U, U, U], AmbiguityClass::F),
    // W
    ([D, U, U, U, D], AmbiguityClass::W),
    ([D, U, U, U, M], AmbiguityClass::W),
    // X
    ([D, M, D, D, D], AmbiguityClass::X),
    ([M, M, D, D, D], AmbiguityClass::X),
    // Y
    ([U, D, D, D, U], AmbiguityClass::Y),
    ([U, D, D, D, M], AmbiguityClass::Y),
];

// ── Table ──────────────────────────────────────────────────

/// Immutable lookup from lift vector to ambiguity class.
#[derive(Debug, Clone)]
pub struct AmbiguityTable {
    entries: [AmbiguityClass; TABLE_SIZE],
}

impl AmbiguityTable {
    /// Build a table from explicit entries; all other codes are `Invalid`.
    ///
    /// Repeating an entry with the same class is allowed, assigning one
    /// code to two different classes is not.
    pub fn from_entries(
        entries: &[([LiftState; FINGER_COUNT], AmbiguityClass)],
    ) -> Result<Self, ConfigError> {
        let mut table = [AmbiguityClass::Invalid; TABLE_SIZE];
        for (states, class) in entries {
            let code = LiftVector::new(*states)
                .code()
                .map_err(|e| ConfigError::Invalid(format!("lookup entry: {e}")))?;
            let existing = table[code];
            if existing.is_valid() && existing != *class {
                return Err(ConfigError::ConflictingEntry {
                    code,
                    existing: existing.as_str(),
                    requested: class.as_str(),
                });
            }
            table[code] = *class;
        }
        debug!(
            "Ambiguity table built: {} of {} codes mapped",
            table.iter().filter(|c| c.is_valid()).count(),
            TABLE_SIZE,
        );
        Ok(Self { entries: table })
    }

    /// The hand-authored fingerspelling table.
    pub fn standard() -> Result<Self, ConfigError> {
        Self::from_entries(&STANDARD_ENTRIES)
    }

    /// Classify a lift vector.  Any `Invalid` lift state is rejected.
    pub fn classify(&self, lift: &LiftVector) -> Result<AmbiguityClass, ClassifyError> {
        let code = lift.code()?;
        Ok(self.entries[code])
    }

    /// Class stored at a raw base-3 code.
    pub fn entry(&self, code: usize) -> Option<AmbiguityClass> {
        self.entries.get(code).copied()
    }

    /// Number of codes mapped to a resolvable family.
    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|c| c.is_valid()).count()
    }
}

// ── Tests ──────────────────────────────────────────────────
