//! Classification facade: quantize, look up, resolve, debounce.
//!
//! `LetterClassifier` owns every stage of the pipeline plus the only
//! cross-frame state (the dwell tracker).  One instance per tracked hand
//! session.  Observers receive a `ClassifierEvent` once per change of the
//! ambiguity class or the committed letter, never once per frame.

use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info, warn};

use crate::error::ConfigError;

use super::ambiguity::{AmbiguityClass, AmbiguityTable};
use super::dwell::DwellTracker;
use super::hand_frame::HandFrame;
use super::lift::{FingerThresholds, LiftVector};
use super::resolvers::{Letter, ResolverConfig, ResolverTable};

// ── Config ─────────────────────────────────────────────────

/// Everything the classifier needs at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// How long (ms) a raw letter must hold before it is committed.
    pub dwell_ms: f64,
    /// Per-finger quantization boundaries.
    pub thresholds: FingerThresholds,
    /// Resolver geometry thresholds.
    pub resolvers: ResolverConfig,
    /// Log every frame's lift vector and class.  Diagnostic only.
    pub debug_trace: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            dwell_ms: 300.0,
            thresholds: FingerThresholds::default(),
            resolvers: ResolverConfig::default(),
            debug_trace: false,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dwell(self.dwell_ms)?;
        self.thresholds.validate()?;
        self.resolvers.validate()
    }

    /// S-expression form, with the same keys `config::parse_config` reads.
    pub fn to_sexp(&self) -> String {
        let list = |v: &[f32]| {
            v.iter()
                .map(|x| format!("{:.1}", x))
                .collect::<Vec<_>>()
                .join(" ")
        };
        let r = &self.resolvers;
        format!(
            "(:dwell-ms {:.0} :debug-trace {} :down-thresholds ({}) :middle-thresholds ({}) :o-contact {:.1} :b-knuckle-spread-sq {:.1} :f-contact {:.1} :orientation-deg {:.1} :relaxed-factor {:.2} :q-min-direction-deg {:.1} :fingers-together {:.1} :h-tilt-deg {:.1} :r-cross-deg {:.1} :k-equidistant {:.1})",
            self.dwell_ms,
            if self.debug_trace { "t" } else { "nil" },
            list(&self.thresholds.down),
            list(&self.thresholds.middle),
            r.o_contact,
            r.b_knuckle_spread_sq,
            r.f_contact,
            r.orientation_deg,
            r.relaxed_factor,
            r.q_min_direction_deg,
            r.fingers_together,
            r.h_tilt_deg,
            r.r_cross_deg,
            r.k_equidistant,
        )
    }
}

fn validate_dwell(ms: f64) -> Result<(), ConfigError> {
    if ms.is_finite() && ms >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "dwell duration must be a non-negative number of milliseconds, got {ms}"
        )))
    }
}

// ── Results and events ─────────────────────────────────────

/// Outcome of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub ambiguity: AmbiguityClass,
    /// Literal resolver output.
    pub raw_letter: Option<Letter>,
    /// `raw_letter` gated by dwell time.
    pub committed_letter: Option<Letter>,
}

impl ClassificationResult {
    /// Invalid class, no letter.
    pub const NONE: ClassificationResult = ClassificationResult {
        ambiguity: AmbiguityClass::Invalid,
        raw_letter: None,
        committed_letter: None,
    };
}

impl Default for ClassificationResult {
    fn default() -> Self {
        Self::NONE
    }
}

/// Change notification pushed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassifierEvent {
    AmbiguityChanged(AmbiguityClass),
    LetterChanged(Option<Letter>),
}

impl ClassifierEvent {
    /// Serialize to an IPC event s-expression.
    pub fn to_sexp(&self) -> String {
        match self {
            Self::AmbiguityChanged(class) => format!(
                "(:type :event :event :ambiguity-changed :class :{})",
                class.as_str()
            ),
            Self::LetterChanged(letter) => format!(
                "(:type :event :event :letter-changed :letter {})",
                letter_sexp(*letter)
            ),
        }
    }
}

fn letter_sexp(letter: Option<Letter>) -> String {
    letter
        .map(|l| format!("\"{}\"", l.to_lower()))
        .unwrap_or_else(|| "nil".to_string())
}

// ── Classifier ─────────────────────────────────────────────

/// Single-hand letter classifier.
pub struct LetterClassifier {
    config: ClassifierConfig,
    table: AmbiguityTable,
    resolvers: ResolverTable,
    dwell: DwellTracker,
    last: ClassificationResult,
    subscribers: Vec<Sender<ClassifierEvent>>,
    frames_processed: u64,
}

impl LetterClassifier {
    /// Build with the standard lookup table and resolvers.
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        Self::with_parts(config, AmbiguityTable::standard()?, ResolverTable::standard())
    }

    /// Build from explicit parts.  Fails if the config is invalid or any
    /// family lacks a resolver.
    pub fn with_parts(
        config: ClassifierConfig,
        table: AmbiguityTable,
        resolvers: ResolverTable,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        resolvers.validate()?;
        info!(
            "Letter classifier initialized: dwell {:.0}ms, {} table entries",
            config.dwell_ms,
            table.mapped_count()
        );
        Ok(Self {
            config,
            table,
            resolvers,
            dwell: DwellTracker::new(),
            last: ClassificationResult::NONE,
            subscribers: Vec::new(),
            frames_processed: 0,
        })
    }

    /// Classify one frame.  `None` means no usable single hand.
    ///
    /// Tracking loss resets the dwell tracker and reports `Invalid` with no
    /// letter at once.  A tracked frame that classifies as `Invalid` also
    /// reports no letter, but the dwell timer keeps running.
    pub fn process_frame(&mut self, frame: Option<&HandFrame>, now_ms: f64) -> ClassificationResult {
        self.frames_processed += 1;

        let result = match frame {
            None => {
                if self.last.ambiguity.is_valid() || self.dwell.pending().is_some() {
                    debug!("Tracking lost, resetting dwell");
                }
                self.dwell.reset();
                ClassificationResult::NONE
            }
            Some(frame) => self.classify(frame, now_ms),
        };

        self.publish(result);
        result
    }

    fn classify(&mut self, frame: &HandFrame, now_ms: f64) -> ClassificationResult {
        let lift = LiftVector::from_frame(frame, &self.config.thresholds);
        let ambiguity = match self.table.classify(&lift) {
            Ok(class) => class,
            Err(e) => {
                warn!("Frame rejected: {}", e);
                AmbiguityClass::Invalid
            }
        };

        // An Invalid frame reports no letter but leaves the dwell timer alone.
        let (raw_letter, committed_letter) = if ambiguity.is_valid() {
            let raw = match self.resolvers.resolve(ambiguity, frame, &self.config.resolvers) {
                Ok(letter) => letter,
                Err(e) => {
                    warn!("Resolver failed: {}", e);
                    None
                }
            };
            (raw, self.dwell.update(raw, now_ms, self.config.dwell_ms))
        } else {
            (None, None)
        };

        if self.config.debug_trace {
            info!(
                "{} {} -> {} raw={:?} committed={:?}",
                frame.hand.as_str(),
                lift,
                ambiguity.as_str(),
                raw_letter,
                committed_letter,
            );
        }

        ClassificationResult {
            ambiguity,
            raw_letter,
            committed_letter,
        }
    }

    /// Store the result and notify on changes, class first.
    fn publish(&mut self, result: ClassificationResult) {
        let previous = std::mem::replace(&mut self.last, result);
        if previous.ambiguity != result.ambiguity {
            debug!(
                "Ambiguity class: {} -> {}",
                previous.ambiguity.as_str(),
                result.ambiguity.as_str()
            );
            self.notify(ClassifierEvent::AmbiguityChanged(result.ambiguity));
        }
        if previous.committed_letter != result.committed_letter {
            info!(
                "Letter: {} -> {}",
                letter_sexp(previous.committed_letter),
                letter_sexp(result.committed_letter)
            );
            self.notify(ClassifierEvent::LetterChanged(result.committed_letter));
        }
    }

    fn notify(&mut self, event: ClassifierEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event).is_ok());
        if self.subscribers.len() < before {
            debug!(
                "Pruned {} disconnected subscriber(s)",
                before - self.subscribers.len()
            );
        }
    }

    /// Register an observer.  Dropping the receiver unsubscribes.
    pub fn subscribe(&mut self) -> Receiver<ClassifierEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// The committed letter, lower case.
    pub fn letter(&self) -> Option<char> {
        self.last.committed_letter.map(|l| l.to_lower())
    }

    /// Case-insensitive check of the committed letter.
    pub fn compare_letter(&self, c: char) -> bool {
        self.last
            .committed_letter
            .map(|l| l.matches(c))
            .unwrap_or(false)
    }

    pub fn ambiguity(&self) -> AmbiguityClass {
        self.last.ambiguity
    }

    pub fn last_result(&self) -> ClassificationResult {
        self.last
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn dwell_ms(&self) -> f64 {
        self.config.dwell_ms
    }

    /// Change the dwell duration.  Tracked timestamps are kept.
    pub fn set_dwell_ms(&mut self, ms: f64) -> Result<(), ConfigError> {
        if let Err(e) = validate_dwell(ms) {
            warn!("Ignoring dwell change: {}", e);
            return Err(e);
        }
        info!("Dwell duration set to {:.0}ms", ms);
        self.config.dwell_ms = ms;
        Ok(())
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Generate s-expression for IPC status.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:letter {} :raw {} :class :{} :candidates \"{}\" :held-ms {:.0} :dwell-ms {:.0} :frames {} :subscribers {})",
            letter_sexp(self.last.committed_letter),
            letter_sexp(self.last.raw_letter),
            self.last.ambiguity.as_str(),
            self.last.ambiguity.candidates(),
            self.dwell.elapsed_ms(),
            self.config.dwell_ms,
            self.frames_processed,
            self.subscribers.len(),
        )
    }

    /// Generate s-expression for IPC config.
    pub fn config_sexp(&self) -> String {
        self.config.to_sexp()
    }
}

impl std::fmt::Debug for LetterClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LetterClassifier")
            .field("config", &self.config)
            .field("last", &self.last)
            .field("frames_processed", &self.frames_processed)
            .finish()
    }
}

// ── Test helpers ───────────────────────────────────────────

/// Extensions posing the 'L' handshape (UUDDD).
#[cfg(test)]
pub(crate) const TEST_L: [f32; 5] = [60.0, 90.0, 30.0, 30.0, 30.0];

/// Extensions posing the 'Y' handshape (UDDDU).
#[cfg(test)]
pub(crate) const TEST_Y: [f32; 5] = [60.0, 30.0, 30.0, 30.0, 80.0];

/// Extensions with no table entry (UUUUU).
#[cfg(test)]
pub(crate) const TEST_UNMAPPED: [f32; 5] = [60.0, 90.0, 90.0, 90.0, 90.0];

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asl::geometry::Vec3;
    use crate::asl::hand_frame::{test_pose, FingerId, FingerPose, Hand};

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn classifier(dwell_ms: f64) -> LetterClassifier {
        LetterClassifier::new(ClassifierConfig {
            dwell_ms,
            ..Default::default()
        })
        .unwrap()
    }

    fn drain(rx: &Receiver<ClassifierEvent>) -> Vec<ClassifierEvent> {
        rx.try_iter().collect()
    }

    fn letter(c: char) -> Option<Letter> {
        Letter::new(c)
    }

    /// Fist with the thumb tucked on the outside of the index finger.
    fn fist_a(hand: Hand) -> HandFrame {
        let mut frame = test_pose(hand, [0.0, 30.0, 30.0, 30.0, 30.0]);
        let s = hand.sign();
        let joints = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -40.0),
            Vec3::new(0.0, 0.0, -60.0),
            Vec3::new(10.0 * s, 0.0, -65.0),
            Vec3::new(15.0 * s, 0.0, -60.0),
        ];
        frame.fingers[FingerId::Index.index()] =
            FingerPose::from_joints(joints, joints[4], joints[4], Vec3::new(s, 0.0, 0.0));
        let thumb = &mut frame.fingers[FingerId::Thumb.index()];
        thumb.tip = Vec3::new(5.0 * s, -20.0, -30.0);
        thumb.stabilized_tip = thumb.tip;
        frame
    }

    #[test]
    fn test_default_config_builds() {
        let c = LetterClassifier::new(ClassifierConfig::default()).unwrap();
        assert_eq!(c.dwell_ms(), 300.0);
        assert_eq!(c.ambiguity(), AmbiguityClass::Invalid);
        assert_eq!(c.letter(), None);
    }

    #[test]
    fn test_missing_resolver_is_fatal() {
        let result = LetterClassifier::with_parts(
            ClassifierConfig::default(),
            AmbiguityTable::standard().unwrap(),
            ResolverTable::empty(),
        );
        assert!(matches!(result, Err(ConfigError::MissingResolver(_))));
    }

    #[test]
    fn test_bad_thresholds_are_fatal() {
        let mut config = ClassifierConfig::default();
        config.thresholds.down[FingerId::Pinky.index()] = 75.0;
        assert!(matches!(
            LetterClassifier::new(config),
            Err(ConfigError::ThresholdOrder { finger: "pinky", .. })
        ));
    }

    #[test]
    fn test_negative_dwell_rejected() {
        let config = ClassifierConfig {
            dwell_ms: -1.0,
            ..Default::default()
        };
        assert!(LetterClassifier::new(config).is_err());

        let mut c = classifier(300.0);
        assert!(c.set_dwell_ms(f64::NAN).is_err());
        assert_eq!(c.dwell_ms(), 300.0);
        assert!(c.set_dwell_ms(120.0).is_ok());
        assert_eq!(c.dwell_ms(), 120.0);
    }

    #[test]
    fn test_fist_resolves_to_a_after_dwell() {
        let mut c = classifier(300.0);
        let frame = fist_a(Hand::Right);
        let start = 1000.0;
        let mut committed_at = None;
        for i in 0..30 {
            let now = start + i as f64 * FRAME_MS;
            let result = c.process_frame(Some(&frame), now);
            assert_eq!(result.ambiguity, AmbiguityClass::Aemnst);
            assert_eq!(result.raw_letter, letter('a'));
            if now - start < 300.0 {
                assert_eq!(result.committed_letter, None, "frame {}", i);
            } else {
                assert_eq!(result.committed_letter, letter('a'), "frame {}", i);
                committed_at.get_or_insert(i);
            }
        }
        // Around the 18th frame at 60 fps.
        let i = committed_at.unwrap();
        assert!((18..=19).contains(&i), "committed at frame {}", i);
        assert_eq!(c.letter(), Some('a'));
    }

    #[test]
    fn test_left_hand_fist_is_a() {
        let mut c = classifier(0.0);
        let frame = fist_a(Hand::Left);
        c.process_frame(Some(&frame), 0.0);
        let result = c.process_frame(Some(&frame), 1.0);
        assert_eq!(result.raw_letter, letter('a'));
    }

    #[test]
    fn test_flat_hand_is_b() {
        let mut c = classifier(0.0);
        let frame = test_pose(Hand::Right, [0.0, 90.0, 90.0, 90.0, 90.0]);
        let result = c.process_frame(Some(&frame), 0.0);
        assert_eq!(result.ambiguity, AmbiguityClass::B);
        assert_eq!(result.raw_letter, letter('b'));
    }

    #[test]
    fn test_idempotent_repeat() {
        let mut c = classifier(300.0);
        let rx = c.subscribe();
        let frame = test_pose(Hand::Right, TEST_L);

        let first = c.process_frame(Some(&frame), 50.0);
        let events_first = drain(&rx);
        let second = c.process_frame(Some(&frame), 50.0);
        assert_eq!(first, second);
        assert_eq!(events_first, vec![ClassifierEvent::AmbiguityChanged(AmbiguityClass::L)]);
        assert!(drain(&rx).is_empty());

        // Also once committed.
        c.process_frame(Some(&frame), 400.0);
        let a = c.process_frame(Some(&frame), 500.0);
        let b = c.process_frame(Some(&frame), 500.0);
        assert_eq!(a, b);
        assert_eq!(drain(&rx), vec![ClassifierEvent::LetterChanged(letter('l'))]);
    }

    #[test]
    fn test_one_notification_per_change() {
        let mut c = classifier(100.0);
        let rx = c.subscribe();
        let frame = test_pose(Hand::Right, TEST_Y);
        for i in 0..40 {
            c.process_frame(Some(&frame), i as f64 * FRAME_MS);
        }
        assert_eq!(
            drain(&rx),
            vec![
                ClassifierEvent::AmbiguityChanged(AmbiguityClass::Y),
                ClassifierEvent::LetterChanged(letter('y')),
            ]
        );
    }

    #[test]
    fn test_tracking_loss_is_immediate() {
        let mut c = classifier(100.0);
        let frame = test_pose(Hand::Right, TEST_L);
        c.process_frame(Some(&frame), 0.0);
        c.process_frame(Some(&frame), 200.0);
        assert_eq!(c.letter(), Some('l'));

        let rx = c.subscribe();
        let result = c.process_frame(None, 216.0);
        assert_eq!(result, ClassificationResult::NONE);
        assert_eq!(c.letter(), None);
        assert_eq!(
            drain(&rx),
            vec![
                ClassifierEvent::AmbiguityChanged(AmbiguityClass::Invalid),
                ClassifierEvent::LetterChanged(None),
            ]
        );

        // Prior dwell progress is gone: the hand must dwell again.
        assert_eq!(c.process_frame(Some(&frame), 232.0).committed_letter, None);
        assert_eq!(c.process_frame(Some(&frame), 300.0).committed_letter, None);
        assert_eq!(c.process_frame(Some(&frame), 332.0).committed_letter, letter('l'));
    }

    #[test]
    fn test_interruption_restarts_dwell() {
        let mut c = classifier(300.0);
        let l = test_pose(Hand::Right, TEST_L);
        let y = test_pose(Hand::Right, TEST_Y);
        c.process_frame(Some(&l), 0.0);
        c.process_frame(Some(&l), 280.0);
        c.process_frame(Some(&y), 290.0);
        c.process_frame(Some(&l), 300.0);
        assert_eq!(c.process_frame(Some(&l), 590.0).committed_letter, None);
        assert_eq!(c.process_frame(Some(&l), 600.0).committed_letter, letter('l'));
    }

    #[test]
    fn test_unmapped_pose_is_invalid() {
        let mut c = classifier(0.0);
        let frame = test_pose(Hand::Right, TEST_UNMAPPED);
        let result = c.process_frame(Some(&frame), 0.0);
        assert_eq!(result.ambiguity, AmbiguityClass::Invalid);
        assert_eq!(result.raw_letter, None);
    }

    #[test]
    fn test_non_finite_frame_absorbed() {
        let mut c = classifier(0.0);
        let mut frame = test_pose(Hand::Right, TEST_L);
        frame.palm_position = Vec3::new(f32::NAN, 0.0, 0.0);
        let result = c.process_frame(Some(&frame), 0.0);
        assert_eq!(result, ClassificationResult::NONE);
        // The next good frame classifies normally.
        let frame = test_pose(Hand::Right, TEST_L);
        assert_eq!(c.process_frame(Some(&frame), 10.0).ambiguity, AmbiguityClass::L);
    }

    #[test]
    fn test_single_bad_frame_keeps_dwell_progress() {
        let mut c = classifier(300.0);
        let good = test_pose(Hand::Right, TEST_L);
        let mut bad = test_pose(Hand::Right, TEST_L);
        bad.palm_position = Vec3::new(f32::NAN, 0.0, 0.0);

        c.process_frame(Some(&good), 0.0);
        assert_eq!(c.process_frame(Some(&good), 400.0).committed_letter, letter('l'));

        let rx = c.subscribe();
        let result = c.process_frame(Some(&bad), 416.0);
        assert_eq!(result.ambiguity, AmbiguityClass::Invalid);
        assert_eq!(result.committed_letter, None);

        // The held letter comes straight back on the next good frame.
        assert_eq!(c.process_frame(Some(&good), 433.0).committed_letter, letter('l'));
        assert_eq!(c.process_frame(Some(&good), 700.0).committed_letter, letter('l'));
        assert_eq!(
            drain(&rx),
            vec![
                ClassifierEvent::AmbiguityChanged(AmbiguityClass::Invalid),
                ClassifierEvent::LetterChanged(None),
                ClassifierEvent::AmbiguityChanged(AmbiguityClass::L),
                ClassifierEvent::LetterChanged(letter('l')),
            ]
        );
    }

    #[test]
    fn test_unmapped_frame_keeps_dwell_progress() {
        let mut c = classifier(300.0);
        let good = test_pose(Hand::Right, TEST_L);
        let unmapped = test_pose(Hand::Right, TEST_UNMAPPED);
        c.process_frame(Some(&good), 0.0);
        c.process_frame(Some(&good), 200.0);
        c.process_frame(Some(&unmapped), 216.0);
        // Timer still runs from t=0.
        assert_eq!(c.process_frame(Some(&good), 300.0).committed_letter, letter('l'));
    }

    #[test]
    fn test_compare_letter_case_insensitive() {
        let mut c = classifier(0.0);
        let frame = test_pose(Hand::Right, TEST_Y);
        assert!(!c.compare_letter('y'));
        c.process_frame(Some(&frame), 0.0);
        c.process_frame(Some(&frame), 1.0);
        assert!(c.compare_letter('y'));
        assert!(c.compare_letter('Y'));
        assert!(!c.compare_letter('l'));
        assert_eq!(c.letter(), Some('y'));
    }

    #[test]
    fn test_dropped_subscriber_pruned() {
        let mut c = classifier(0.0);
        let keep = c.subscribe();
        let dropped = c.subscribe();
        drop(dropped);
        assert_eq!(c.subscriber_count(), 2);
        let frame = test_pose(Hand::Right, TEST_L);
        c.process_frame(Some(&frame), 0.0);
        assert_eq!(c.subscriber_count(), 1);
        assert_eq!(drain(&keep).len(), 1);
    }

    #[test]
    fn test_event_sexp() {
        assert_eq!(
            ClassifierEvent::LetterChanged(letter('Q')).to_sexp(),
            "(:type :event :event :letter-changed :letter \"q\")"
        );
        assert_eq!(
            ClassifierEvent::LetterChanged(None).to_sexp(),
            "(:type :event :event :letter-changed :letter nil)"
        );
        assert_eq!(
            ClassifierEvent::AmbiguityChanged(AmbiguityClass::Hkruv).to_sexp(),
            "(:type :event :event :ambiguity-changed :class :hkruv)"
        );
    }

    #[test]
    fn test_status_sexp() {
        let mut c = classifier(0.0);
        let frame = test_pose(Hand::Right, TEST_L);
        c.process_frame(Some(&frame), 0.0);
        c.process_frame(Some(&frame), 1.0);
        let status = c.status_sexp();
        assert!(status.starts_with("(:letter \"l\" :raw \"l\" :class :l"), "{}", status);
        assert!(status.contains(":frames 2"));
    }

    #[test]
    fn test_config_sexp_lists_thresholds() {
        let c = classifier(300.0);
        let sexp = c.config_sexp();
        assert!(sexp.contains(":dwell-ms 300"));
        assert!(sexp.contains(":down-thresholds (10.0 65.0 65.0 65.0 60.0)"));
        assert!(sexp.contains(":debug-trace nil"));
    }
}
