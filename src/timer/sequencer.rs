//! Phase sequencing for the 4-interval Pomodoro cycle.
//!
//! The sequencer decides what follows a completed phase:
//! - Work increments the interval counter, then picks a short break, or a
//!   long break when the counter reaches [`INTERVALS_PER_CYCLE`] (the counter
//!   resets to 0)
//! - Any break goes back to work with the counter unchanged

use tracing::debug;

use crate::types::{CycleState, PhaseConfig, PhaseKind, INTERVALS_PER_CYCLE};

/// The phase chosen by [`PhaseSequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextPhase {
    pub kind: PhaseKind,
    /// Configured length of the phase in seconds
    pub duration_seconds: u32,
}

/// Owns the phase durations and the position within the cycle.
#[derive(Debug, Clone, Default)]
pub struct PhaseSequencer {
    config: PhaseConfig,
    cycle: CycleState,
}

impl PhaseSequencer {
    /// Creates a sequencer positioned at the first work interval.
    pub fn new(config: PhaseConfig) -> Self {
        Self {
            config,
            cycle: CycleState::default(),
        }
    }

    /// Moves past the current phase and returns the next one.
    ///
    /// Call exactly once per phase completion.
    pub fn advance(&mut self) -> NextPhase {
        let next = match self.cycle.phase {
            PhaseKind::Work => {
                self.cycle.interval_index += 1;
                if self.cycle.interval_index >= INTERVALS_PER_CYCLE {
                    self.cycle.interval_index = 0;
                    PhaseKind::LongBreak
                } else {
                    PhaseKind::ShortBreak
                }
            }
            PhaseKind::ShortBreak | PhaseKind::LongBreak => PhaseKind::Work,
        };

        debug!(
            "Phase advance: {} -> {} (interval {})",
            self.cycle.phase, next, self.cycle.interval_index
        );
        self.cycle.phase = next;

        NextPhase {
            kind: next,
            duration_seconds: self.config.duration_of(next),
        }
    }

    /// Returns to the first work interval.
    pub fn reset(&mut self) {
        self.cycle = CycleState::default();
    }

    pub fn current_phase(&self) -> PhaseKind {
        self.cycle.phase
    }

    pub fn interval_index(&self) -> u8 {
        self.cycle.interval_index
    }

    pub fn cycle(&self) -> CycleState {
        self.cycle
    }

    /// Configured length of the current phase in seconds.
    pub fn current_duration(&self) -> u32 {
        self.config.duration_of(self.cycle.phase)
    }

    pub fn config(&self) -> &PhaseConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut PhaseConfig {
        &mut self.config
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sequencer() -> PhaseSequencer {
        PhaseSequencer::new(PhaseConfig::from_minutes(25, 5, 20))
    }

    #[test]
    fn test_starts_at_first_work_interval() {
        let seq = sequencer();
        assert_eq!(seq.current_phase(), PhaseKind::Work);
        assert_eq!(seq.interval_index(), 0);
        assert_eq!(seq.current_duration(), 25 * 60);
    }

    #[test]
    fn test_work_to_short_break_increments_interval() {
        let mut seq = sequencer();
        let next = seq.advance();

        assert_eq!(next.kind, PhaseKind::ShortBreak);
        assert_eq!(next.duration_seconds, 5 * 60);
        assert_eq!(seq.interval_index(), 1);
    }

    #[test]
    fn test_break_returns_to_work_without_increment() {
        let mut seq = sequencer();
        seq.advance();
        let next = seq.advance();

        assert_eq!(next.kind, PhaseKind::Work);
        assert_eq!(next.duration_seconds, 25 * 60);
        assert_eq!(seq.interval_index(), 1);
    }

    #[test]
    fn test_fourth_work_completion_gives_long_break() {
        let mut seq = sequencer();
        for _ in 0..3 {
            assert_eq!(seq.advance().kind, PhaseKind::ShortBreak);
            assert_eq!(seq.advance().kind, PhaseKind::Work);
        }

        let next = seq.advance();
        assert_eq!(next.kind, PhaseKind::LongBreak);
        assert_eq!(next.duration_seconds, 20 * 60);
        assert_eq!(seq.interval_index(), 0);

        // Long break goes back to work with the counter still at 0
        assert_eq!(seq.advance().kind, PhaseKind::Work);
        assert_eq!(seq.interval_index(), 0);
    }

    #[test]
    fn test_four_work_phases_between_long_breaks() {
        let mut seq = sequencer();
        let mut work_completions_since_long = 0;
        let mut long_breaks = 0;

        for _ in 0..40 {
            let was_work = seq.current_phase() == PhaseKind::Work;
            let next = seq.advance();
            if was_work {
                work_completions_since_long += 1;
                if work_completions_since_long < 4 {
                    assert_eq!(next.kind, PhaseKind::ShortBreak);
                }
            }
            if next.kind == PhaseKind::LongBreak {
                assert_eq!(work_completions_since_long, 4);
                work_completions_since_long = 0;
                long_breaks += 1;
            }
        }

        assert_eq!(long_breaks, 5);
    }

    #[test]
    fn test_interval_index_stays_below_cycle_length() {
        let mut seq = sequencer();
        for _ in 0..100 {
            seq.advance();
            assert!(seq.interval_index() < INTERVALS_PER_CYCLE);
        }
    }

    #[test]
    fn test_reset_restores_initial_cycle() {
        let mut seq = sequencer();
        seq.advance();
        seq.advance();
        seq.advance();

        seq.reset();
        assert_eq!(seq.cycle(), CycleState::default());
    }

    #[test]
    fn test_advance_uses_updated_config() {
        let mut seq = sequencer();
        seq.config_mut().set_short_break_minutes(10);

        assert_eq!(seq.advance().duration_seconds, 600);
    }
}
