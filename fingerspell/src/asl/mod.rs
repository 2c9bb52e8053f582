//! Fingerspelling recognition: hand frame to debounced alphabet letter.
//!
//! Provides:
//! - `hand_frame`: sensor-agnostic hand snapshot and extension distances
//! - `lift`: per-finger 3-level quantizer
//! - `ambiguity`: 243-entry lookup from lift vector to pose family
//! - `resolvers`: per-family geometric discriminators
//! - `dwell`: dwell-time debounce
//! - `classifier`: the per-frame facade with change notifications
//! - `session`: mutex-guarded handle and frame worker thread

pub mod geometry;
pub mod hand_frame;
pub mod lift;
pub mod ambiguity;
pub mod resolvers;
pub mod dwell;
pub mod classifier;
pub mod session;

pub use ambiguity::{AmbiguityClass, AmbiguityTable};
pub use classifier::{ClassificationResult, ClassifierConfig, ClassifierEvent, LetterClassifier};
pub use geometry::Vec3;
pub use hand_frame::{BoneKind, FingerId, FingerPose, FrameSample, Hand, HandFrame};
pub use lift::{FingerThresholds, LiftState, LiftVector};
pub use resolvers::{Letter, ResolverConfig, ResolverTable};
pub use session::{drain_events, spawn_frame_worker, ClassifierHandle};
