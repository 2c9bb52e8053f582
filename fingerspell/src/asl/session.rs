//! Thread-safe access to one classifier.
//!
//! Frames arrive from a producer thread while hosts poll accessors from
//! another.  `ClassifierHandle` serializes both behind one mutex, and
//! `spawn_frame_worker` drains a frame channel on a dedicated thread so
//! frames are classified strictly in arrival order.

use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::ConfigError;

use super::ambiguity::AmbiguityClass;
use super::classifier::{ClassificationResult, ClassifierConfig, ClassifierEvent, LetterClassifier};
use super::hand_frame::FrameSample;

/// Cloneable, shareable handle to a classifier.
#[derive(Clone)]
pub struct ClassifierHandle {
    inner: Arc<Mutex<LetterClassifier>>,
    epoch: Instant,
}

impl ClassifierHandle {
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        Ok(Self::from_classifier(LetterClassifier::new(config)?))
    }

    pub fn from_classifier(classifier: LetterClassifier) -> Self {
        Self {
            inner: Arc::new(Mutex::new(classifier)),
            epoch: Instant::now(),
        }
    }

    /// A panicked holder leaves the classifier in a consistent state
    /// between frames, so the poison flag is ignored.
    fn lock(&self) -> MutexGuard<'_, LetterClassifier> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Milliseconds since this handle was created, monotonic.
    pub fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    /// Classify a sample.  Anything other than exactly one hand is
    /// tracking loss.
    pub fn process(&self, sample: &FrameSample) -> ClassificationResult {
        self.lock()
            .process_frame(sample.single_hand(), sample.timestamp_ms)
    }

    pub fn letter(&self) -> Option<char> {
        self.lock().letter()
    }

    pub fn compare_letter(&self, c: char) -> bool {
        self.lock().compare_letter(c)
    }

    pub fn ambiguity(&self) -> AmbiguityClass {
        self.lock().ambiguity()
    }

    pub fn last_result(&self) -> ClassificationResult {
        self.lock().last_result()
    }

    pub fn dwell_ms(&self) -> f64 {
        self.lock().dwell_ms()
    }

    pub fn set_dwell_ms(&self, ms: f64) -> Result<(), ConfigError> {
        self.lock().set_dwell_ms(ms)
    }

    pub fn subscribe(&self) -> Receiver<ClassifierEvent> {
        self.lock().subscribe()
    }

    pub fn frames_processed(&self) -> u64 {
        self.lock().frames_processed()
    }

    pub fn status_sexp(&self) -> String {
        self.lock().status_sexp()
    }

    pub fn config_sexp(&self) -> String {
        self.lock().config_sexp()
    }
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("classifier", &*self.lock())
            .finish()
    }
}

/// Classify every sample from `frames` in order on a dedicated thread.
///
/// The thread exits when all senders are dropped and returns how many
/// samples it processed.
pub fn spawn_frame_worker(handle: ClassifierHandle, frames: Receiver<FrameSample>) -> JoinHandle<u64> {
    thread::spawn(move || {
        info!("Frame worker started");
        let mut processed = 0u64;
        while let Ok(sample) = frames.recv() {
            handle.process(&sample);
            processed += 1;
        }
        info!("Frame worker stopped after {} frames", processed);
        processed
    })
}

/// Pull every pending event without blocking.  Returns `None` once the
/// classifier side has gone away.
pub fn drain_events(events: &Receiver<ClassifierEvent>) -> Option<Vec<ClassifierEvent>> {
    let mut out = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => out.push(event),
            Err(TryRecvError::Empty) => return Some(out),
            Err(TryRecvError::Disconnected) => {
                if out.is_empty() {
                    debug!("Event channel disconnected");
                    return None;
                }
                return Some(out);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────
