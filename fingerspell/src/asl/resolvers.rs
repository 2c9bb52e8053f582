//! Second pass: resolve an ambiguity class to a concrete letter.
//!
//! Each family has one resolver, a pure geometric test over the hand frame.
//! Thresholds live in `ResolverConfig`; the defaults are empirically tuned
//! and their relative ordering matters.  Motion letters (J, Z, true Q) are
//! not distinguished from their static look-alikes.

use std::fmt;

use tracing::debug;

use crate::error::{ClassifyError, ConfigError};

use super::ambiguity::{AmbiguityClass, FAMILY_COUNT};
use super::geometry::Vec3;
use super::hand_frame::{BoneKind, FingerId, HandFrame};

// ── Letters ────────────────────────────────────────────────

/// A detected alphabet letter.  Stored upper case; compared case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Letter(char);

impl Letter {
    /// Accepts ASCII letters of either case.
    pub fn new(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            Some(Self(c.to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Upper-case form.
    pub fn as_char(&self) -> char {
        self.0
    }

    /// Lower-case form, the canonical identity reported to hosts.
    pub fn to_lower(&self) -> char {
        self.0.to_ascii_lowercase()
    }

    /// Case-insensitive comparison against a caller-supplied character.
    pub fn matches(&self, c: char) -> bool {
        self.0.eq_ignore_ascii_case(&c)
    }

    const fn fixed(c: char) -> Self {
        Self(c)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const A: Letter = Letter::fixed('A');
const B: Letter = Letter::fixed('B');
const C: Letter = Letter::fixed('C');
const D: Letter = Letter::fixed('D');
const F: Letter = Letter::fixed('F');
const G: Letter = Letter::fixed('G');
const H: Letter = Letter::fixed('H');
const I: Letter = Letter::fixed('I');
const K: Letter = Letter::fixed('K');
const L: Letter = Letter::fixed('L');
const O: Letter = Letter::fixed('O');
const P: Letter = Letter::fixed('P');
const Q: Letter = Letter::fixed('Q');
const R: Letter = Letter::fixed('R');
const U: Letter = Letter::fixed('U');
const V: Letter = Letter::fixed('V');
const W: Letter = Letter::fixed('W');
const X: Letter = Letter::fixed('X');
const Y: Letter = Letter::fixed('Y');

// ── Config ─────────────────────────────────────────────────

/// Geometric thresholds used by the resolvers.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverConfig {
    /// Thumb-tip to middle-tip distance below which the hand forms an 'O'.
    pub o_contact: f32,
    /// Maximum squared distance between neighbouring knuckles for 'B'.
    pub b_knuckle_spread_sq: f32,
    /// Maximum index-tip to thumb-tip distance for 'F'.
    pub f_contact: f32,
    /// Base angle (degrees) for the G / P / D / Q orientation tests.
    pub orientation_deg: f32,
    /// Multiplier applied to `orientation_deg` for the D and Q tests.
    pub relaxed_factor: f32,
    /// Palm direction must point further than this from up (degrees) for 'Q'.
    pub q_min_direction_deg: f32,
    /// Maximum index-tip to middle-tip distance for fingers held together.
    pub fingers_together: f32,
    /// Tilt angle (degrees) below which two joined fingers read as 'H'.
    pub h_tilt_deg: f32,
    /// Divergence (degrees) between index and middle above which they read as 'R'.
    pub r_cross_deg: f32,
    /// Maximum thumb distance imbalance between index and middle for 'K'.
    pub k_equidistant: f32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            o_contact: 40.0,
            b_knuckle_spread_sq: 1400.0,
            f_contact: 30.0,
            orientation_deg: 30.0,
            relaxed_factor: 1.5,
            q_min_direction_deg: 90.0,
            fingers_together: 25.0,
            h_tilt_deg: 45.0,
            r_cross_deg: 12.0,
            k_equidistant: 7.0,
        }
    }
}

impl ResolverConfig {
    /// Every threshold must be a finite, positive number.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("o-contact", self.o_contact),
            ("b-knuckle-spread-sq", self.b_knuckle_spread_sq),
            ("f-contact", self.f_contact),
            ("orientation-deg", self.orientation_deg),
            ("relaxed-factor", self.relaxed_factor),
            ("q-min-direction-deg", self.q_min_direction_deg),
            ("fingers-together", self.fingers_together),
            ("h-tilt-deg", self.h_tilt_deg),
            ("r-cross-deg", self.r_cross_deg),
            ("k-equidistant", self.k_equidistant),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

// ── Resolvers ──────────────────────────────────────────────

/// Signature shared by every family resolver.
pub type ResolveFn = fn(&HandFrame, &ResolverConfig) -> Option<Letter>;

/// A, or O when the thumb closes onto the middle finger.
///
/// 'A' puts the thumb tip on the outer side of the plane spanned by the
/// index finger's joints.  E/M/N/S/T are not separable at sensor precision.
pub fn resolve_aemnst(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    let index = frame.finger(FingerId::Index);
    let tip = index.tip;
    let knuckle = index.bone(BoneKind::Intermediate).prev_joint;
    let base = index.bone(BoneKind::Metacarpal).prev_joint;
    let normal = (tip - knuckle).cross(base - knuckle);

    let thumb_offset = frame.tip(FingerId::Thumb) - knuckle;
    let side = thumb_offset.signed_projection(normal) * frame.hand.sign();
    if side > 0.0 {
        return Some(A);
    }

    if frame.tip_distance(FingerId::Thumb, FingerId::Middle) < config.o_contact {
        return Some(O);
    }
    None
}

/// B: the four fingers held flat and together.
pub fn resolve_b(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    let knuckle = |f: FingerId| frame.finger(f).bone(BoneKind::Intermediate).next_joint;
    let pinky = knuckle(FingerId::Pinky);
    let ring = knuckle(FingerId::Ring);
    let middle = knuckle(FingerId::Middle);
    let index = knuckle(FingerId::Index);

    let limit = config.b_knuckle_spread_sq;
    if pinky.distance_squared(ring) < limit
        && ring.distance_squared(middle) < limit
        && middle.distance_squared(index) < limit
    {
        Some(B)
    } else {
        None
    }
}

/// C versus O, decided by whether the thumb meets the middle finger.
pub fn resolve_co(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    if frame.tip_distance(FingerId::Thumb, FingerId::Middle) < config.o_contact {
        Some(O)
    } else {
        Some(C)
    }
}

/// G, P, D, Q by hand orientation, tried in that order.
pub fn resolve_dgpqz(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    let base = config.orientation_deg;
    let relaxed = base * config.relaxed_factor;

    let tilt = frame.hand.tilt_reference().angle_deg(frame.palm_side());
    if tilt < base {
        return Some(G);
    }

    let palm_down = Vec3::DOWN.angle_deg(frame.palm_normal);
    if palm_down < base {
        return Some(P);
    }

    let pointing_up = Vec3::UP.angle_deg(frame.direction);
    if pointing_up < relaxed {
        return Some(D);
    }

    if pointing_up > config.q_min_direction_deg && palm_down < relaxed {
        return Some(Q);
    }
    None
}

/// F: index and thumb tips touching.
pub fn resolve_f(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    if frame.tip_distance(FingerId::Index, FingerId::Thumb) <= config.f_contact {
        Some(F)
    } else {
        None
    }
}

/// H, R, U when index and middle are joined; K or V when they are spread.
pub fn resolve_hkruv(frame: &HandFrame, config: &ResolverConfig) -> Option<Letter> {
    let index = frame.finger(FingerId::Index);
    let middle = frame.finger(FingerId::Middle);

    if frame.tip_distance(FingerId::Index, FingerId::Middle) <= config.fingers_together {
        let tilt = frame.hand.tilt_reference().angle_deg(frame.palm_side());
        if tilt < config.h_tilt_deg {
            return Some(H);
        }
        if middle.direction.angle_deg(index.direction) > config.r_cross_deg {
            return Some(R);
        }
        return Some(U);
    }

    let thumb = frame.finger(FingerId::Thumb).stabilized_tip;
    let to_index = thumb.distance(index.bone(BoneKind::Proximal).center());
    let to_middle = thumb.distance(middle.bone(BoneKind::Proximal).center());
    if (to_index - to_middle).abs() < config.k_equidistant {
        return Some(K);
    }
    Some(V)
}

/// I (J needs motion and is not detected).
pub fn resolve_ij(_frame: &HandFrame, _config: &ResolverConfig) -> Option<Letter> {
    Some(I)
}

pub fn resolve_l(_frame: &HandFrame, _config: &ResolverConfig) -> Option<Letter> {
    Some(L)
}

pub fn resolve_w(_frame: &HandFrame, _config: &ResolverConfig) -> Option<Letter> {
    Some(W)
}

pub fn resolve_x(_frame: &HandFrame, _config: &ResolverConfig) -> Option<Letter> {
    Some(X)
}

pub fn resolve_y(_frame: &HandFrame, _config: &ResolverConfig) -> Option<Letter> {
    Some(Y)
}

/// The built-in resolver for a family.  `None` only for `Invalid`.
pub fn standard_resolver(class: AmbiguityClass) -> Option<ResolveFn> {
    let f: ResolveFn = match class {
        AmbiguityClass::Invalid => return None,
        AmbiguityClass::Aemnst => resolve_aemnst,
        AmbiguityClass::B => resolve_b,
        AmbiguityClass::Co => resolve_co,
        AmbiguityClass::Dgpqz => resolve_dgpqz,
        AmbiguityClass::F => resolve_f,
        AmbiguityClass::Hkruv => resolve_hkruv,
        AmbiguityClass::Ij => resolve_ij,
        AmbiguityClass::L => resolve_l,
        AmbiguityClass::W => resolve_w,
        AmbiguityClass::X => resolve_x,
        AmbiguityClass::Y => resolve_y,
    };
    Some(f)
}

// ── Dispatch table ─────────────────────────────────────────

/// Class-to-resolver dispatch.  Must be complete before any frame is seen.
#[derive(Clone)]
pub struct ResolverTable {
    resolvers: [Option<ResolveFn>; FAMILY_COUNT],
}

impl ResolverTable {
    /// A table with no resolvers, for hosts that register their own.
    pub fn empty() -> Self {
        Self {
            resolvers: [None; FAMILY_COUNT],
        }
    }

    /// Every family mapped to its built-in resolver.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        for family in AmbiguityClass::FAMILIES {
            if let Some(f) = standard_resolver(family) {
                table.register(family, f);
            }
        }
        table
    }

    /// Install or replace a family's resolver.  `Invalid` is ignored.
    pub fn register(&mut self, class: AmbiguityClass, resolver: ResolveFn) {
        if let Some(i) = class.family_index() {
            self.resolvers[i] = Some(resolver);
        }
    }

    /// Fails on the first family without a resolver.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for family in AmbiguityClass::FAMILIES {
            let missing = family
                .family_index()
                .map(|i| self.resolvers[i].is_none())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::MissingResolver(family.as_str()));
            }
        }
        Ok(())
    }

    /// Run the resolver for `class` against a frame.
    pub fn resolve(
        &self,
        class: AmbiguityClass,
        frame: &HandFrame,
        config: &ResolverConfig,
    ) -> Result<Option<Letter>, ClassifyError> {
        let resolver = class
            .family_index()
            .and_then(|i| self.resolvers[i])
            .ok_or_else(|| {
                ClassifyError::InvalidInput(format!(
                    "no resolver for ambiguity class {}",
                    class.as_str()
                ))
            })?;
        let letter = resolver(frame, config);
        debug!("Resolved {} -> {:?}", class.as_str(), letter);
        Ok(letter)
    }
}

impl Default for ResolverTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ResolverTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<&str> = AmbiguityClass::FAMILIES
            .iter()
            .filter(|c| c.family_index().map(|i| self.resolvers[i].is_some()).unwrap_or(false))
            .map(|c| c.as_str())
            .collect();
        f.debug_struct("ResolverTable")
            .field("registered", &registered)
            .finish()
    }
}

// ── Tests ──────────────────────────────────────────────────
