use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ErrorSeverity, RulesError};

/// Fixed-segment fill counter.
///
/// Invariant: `1 <= segments` and `filled <= segments`. Clocks only fill;
/// they are reset by building a new one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Clock {
    segments: u32,
    filled: u32,
    active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    #[error("a clock needs at least one segment")]
    NoSegments,

    #[error("filled ({filled}) exceeds segments ({segments})")]
    Overfilled { filled: u32, segments: u32 },
}

impl RulesError for ClockError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoSegments => "CLOCK_NO_SEGMENTS",
            Self::Overfilled { .. } => "CLOCK_OVERFILLED",
        }
    }
}

impl Clock {
    pub fn new(segments: u32, filled: u32, active: bool) -> Result<Self, ClockError> {
        if segments == 0 {
            return Err(ClockError::NoSegments);
        }
        if filled > segments {
            return Err(ClockError::Overfilled { filled, segments });
        }
        Ok(Self {
            segments,
            filled,
            active,
        })
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn filled(&self) -> u32 {
        self.filled
    }

    pub fn active(&self) -> bool {
        self.active
    }

    /// Fills `n` more segments, stopping at a full clock. Leaves `active` alone.
    pub fn tick(&self, n: u32) -> Self {
        Self {
            filled: self.filled.saturating_add(n).min(self.segments),
            ..*self
        }
    }

    pub fn with_active(&self, active: bool) -> Self {
        Self { active, ..*self }
    }

    pub fn is_filled(&self) -> bool {
        self.filled == self.segments
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.segments.saturating_sub(self.filled)
    }
}

impl<'de> Deserialize<'de> for Clock {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            segments: u32,
            filled: u32,
            active: bool,
        }

        let Fields {
            segments,
            filled,
            active,
        } = Fields::deserialize(deserializer)?;
        Self::new(segments, filled, active).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_fills_up_to_the_segment_count() {
        let clock = Clock::new(6, 4, true).unwrap();
        for n in 0..10 {
            assert_eq!(clock.tick(n).filled(), (4 + n).min(6));
        }
        let full = clock.tick(5);
        assert_eq!(full.filled(), 6);
        assert!(full.is_filled());
        assert_eq!(full.ticks_remaining(), 0);
        assert!(full.active());
        assert_eq!(clock.ticks_remaining(), 2);
        assert_eq!(clock.tick(u32::MAX).filled(), 6);
    }

    #[test]
    fn construction_checks_the_invariant() {
        assert_eq!(Clock::new(0, 0, true), Err(ClockError::NoSegments));
        assert_eq!(
            Clock::new(4, 5, false),
            Err(ClockError::Overfilled {
                filled: 5,
                segments: 4
            })
        );
        assert!(Clock::new(4, 4, false).unwrap().is_filled());
    }

    #[test]
    fn deserializing_checks_the_invariant() {
        let clock: Clock =
            serde_json::from_str(r#"{"segments":4,"filled":3,"active":false}"#).unwrap();
        assert_eq!(clock, Clock::new(4, 3, false).unwrap());
        assert_eq!(
            serde_json::to_string(&clock).unwrap(),
            r#"{"segments":4,"filled":3,"active":false}"#
        );

        let err = serde_json::from_str::<Clock>(r#"{"segments":2,"filled":5,"active":true}"#)
            .unwrap_err();
        assert!(err.to_string().contains("filled (5) exceeds segments (2)"));
        assert!(serde_json::from_str::<Clock>(r#"{"segments":0,"filled":0,"active":true}"#).is_err());
    }

    #[test]
    fn activation_is_orthogonal_to_filling() {
        let clock = Clock::new(4, 1, true).unwrap().with_active(false);
        assert!(!clock.active());
        assert_eq!(clock.filled(), 1);
        assert!(!clock.tick(1).active());
    }
}
