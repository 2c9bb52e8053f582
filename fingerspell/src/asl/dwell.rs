//! Dwell-time debounce for resolved letters.
//!
//! A raw letter is surfaced only after it has been the resolver output
//! continuously for the configured duration.  Any change restarts the timer
//! and clears the commitment on the same frame.

use tracing::debug;

use super::resolvers::Letter;

/// Observable state of the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DwellPhase {
    /// Nothing has persisted long enough.
    Unstable,
    /// A letter has been held for at least the dwell duration.
    Committed(Letter),
}

/// Cross-frame debounce state.
#[derive(Debug, Clone)]
pub struct DwellTracker {
    /// Resolver output seen on the previous frame.
    last_raw: Option<Letter>,
    /// Timestamp (ms) of the last change in `last_raw`.
    last_change_ms: f64,
    /// Timestamp of the most recent update.
    last_update_ms: f64,
    committed: Option<Letter>,
}

impl Default for DwellTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DwellTracker {
    pub fn new() -> Self {
        Self {
            last_raw: None,
            last_change_ms: 0.0,
            last_update_ms: 0.0,
            committed: None,
        }
    }

    /// Feed one frame's raw letter and return the committed output.
    ///
    /// `dwell_ms` is read on every call, so changing it between frames only
    /// changes the comparison, never the tracked timestamps.
    pub fn update(&mut self, raw: Option<Letter>, now_ms: f64, dwell_ms: f64) -> Option<Letter> {
        self.last_update_ms = now_ms;

        if raw != self.last_raw {
            debug!("Raw letter changed: {:?} -> {:?}", self.last_raw, raw);
            self.last_raw = raw;
            self.last_change_ms = now_ms;
            self.committed = None;
            return None;
        }

        let letter = raw?;
        if now_ms - self.last_change_ms >= dwell_ms {
            if self.committed != Some(letter) {
                debug!(
                    "Letter {} committed after {:.0}ms",
                    letter,
                    now_ms - self.last_change_ms
                );
            }
            self.committed = Some(letter);
        } else {
            self.committed = None;
        }
        self.committed
    }

    /// Forget everything.  Used on tracking loss.
    pub fn reset(&mut self) {
        self.last_raw = None;
        self.committed = None;
    }

    pub fn phase(&self) -> DwellPhase {
        match self.committed {
            Some(letter) => DwellPhase::Committed(letter),
            None => DwellPhase::Unstable,
        }
    }

    /// Raw letter currently being timed.
    pub fn pending(&self) -> Option<Letter> {
        self.last_raw
    }

    /// How long the current raw letter has been held, as of the last update.
    pub fn elapsed_ms(&self) -> f64 {
        if self.last_raw.is_none() {
            return 0.0;
        }
        (self.last_update_ms - self.last_change_ms).max(0.0)
    }
}

// ── Tests ──────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    fn letter(c: char) -> Option<Letter> {
        Letter::new(c)
    }

    #[test]
    fn test_first_sighting_is_not_committed() {
        let mut t = DwellTracker::new();
        assert_eq!(t.update(letter('a'), 0.0, 0.0), None);
        // Zero dwell commits on the second identical frame.
        assert_eq!(t.update(letter('a'), 0.0, 0.0), letter('a'));
    }

    #[test]
    fn test_commits_once_dwell_elapsed() {
        let mut t = DwellTracker::new();
        let dwell = 300.0;
        let mut now = 0.0;
        t.update(letter('a'), now, dwell);
        while now + FRAME_MS < dwell {
            now += FRAME_MS;
            assert_eq!(t.update(letter('a'), now, dwell), None, "at {}ms", now);
            assert_eq!(t.phase(), DwellPhase::Unstable);
        }
        now += FRAME_MS;
        assert!(now >= dwell);
        assert_eq!(t.update(letter('a'), now, dwell), letter('a'));
        // Stays committed while the raw letter holds.
        for _ in 0..10 {
            now += FRAME_MS;
            assert_eq!(t.update(letter('a'), now, dwell), letter('a'));
        }
        assert_eq!(t.phase(), DwellPhase::Committed(Letter::new('A').unwrap()));
    }

    #[test]
    fn test_exact_boundary_commits() {
        let mut t = DwellTracker::new();
        t.update(letter('b'), 100.0, 250.0);
        assert_eq!(t.update(letter('b'), 349.0, 250.0), None);
        assert_eq!(t.update(letter('b'), 350.0, 250.0), letter('b'));
    }

    #[test]
    fn test_change_clears_commitment_immediately() {
        let mut t = DwellTracker::new();
        t.update(letter('a'), 0.0, 100.0);
        assert_eq!(t.update(letter('a'), 200.0, 100.0), letter('a'));
        assert_eq!(t.update(letter('b'), 216.0, 100.0), None);
        assert_eq!(t.phase(), DwellPhase::Unstable);
    }

    #[test]
    fn test_interruption_restarts_timer() {
        let mut t = DwellTracker::new();
        let dwell = 300.0;
        t.update(letter('l'), 0.0, dwell);
        t.update(letter('l'), 250.0, dwell);
        // One-frame blip.
        t.update(letter('y'), 266.0, dwell);
        // Back to L: timer restarts here.
        assert_eq!(t.update(letter('l'), 283.0, dwell), None);
        assert_eq!(t.update(letter('l'), 500.0, dwell), None);
        assert_eq!(t.update(letter('l'), 583.0, dwell), letter('l'));
    }

    #[test]
    fn test_no_letter_never_commits() {
        let mut t = DwellTracker::new();
        t.update(None, 0.0, 10.0);
        assert_eq!(t.update(None, 1000.0, 10.0), None);
        assert_eq!(t.elapsed_ms(), 0.0);
    }

    #[test]
    fn test_runtime_dwell_change_keeps_timestamps() {
        let mut t = DwellTracker::new();
        t.update(letter('w'), 0.0, 1000.0);
        assert_eq!(t.update(letter('w'), 400.0, 1000.0), None);
        // Lowering the duration applies to the time already accumulated.
        assert_eq!(t.update(letter('w'), 416.0, 300.0), letter('w'));
        assert!((t.elapsed_ms() - 416.0).abs() < 1e-9);
    }

    #[test]
    fn test_reset_forgets_pending_letter() {
        let mut t = DwellTracker::new();
        t.update(letter('x'), 0.0, 100.0);
        t.update(letter('x'), 150.0, 100.0);
        t.reset();
        assert_eq!(t.phase(), DwellPhase::Unstable);
        assert_eq!(t.pending(), None);
        // The next sighting starts a fresh dwell.
        assert_eq!(t.update(letter('x'), 160.0, 100.0), None);
        assert_eq!(t.update(letter('x'), 200.0, 100.0), None);
        assert_eq!(t.update(letter('x'), 260.0, 100.0), letter('x'));
    }
}
