use serde::{Deserialize, Deserializer, Serialize};

/// Ticks that fill one progress box.
pub const TICKS_PER_BOX: u32 = 4;
/// Boxes on a bounded track.
pub const BOXES: u32 = 10;
/// Ticks on a full bounded track.
pub const MAX_TICKS: u32 = TICKS_PER_BOX * BOXES;

/// Challenge rank of a progress track. Determines how far one step of
/// progress moves the track.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ChallengeRank {
    Troublesome,
    Dangerous,
    Formidable,
    Extreme,
    Epic,
}

impl ChallengeRank {
    /// Ticks added by one step of progress.
    pub const fn ticks_per_step(self) -> u32 {
        match self {
            Self::Troublesome => 12,
            Self::Dangerous => 8,
            Self::Formidable => 4,
            Self::Extreme => 2,
            Self::Epic => 1,
        }
    }
}

/// Rank-scaled tick accumulator.
///
/// Bounded tracks hold `0..=MAX_TICKS` ticks; unbounded tracks only have the
/// lower bound. Every transition clamps instead of failing, and so does
/// deserialization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProgressTrack {
    progress: u32,
    rank: ChallengeRank,
    unbounded: bool,
}

impl ProgressTrack {
    /// Creates a track, clamping `progress` into its valid range.
    pub fn new(rank: ChallengeRank, progress: i64, unbounded: bool) -> Self {
        Self {
            progress: 0,
            rank,
            unbounded,
        }
        .with_ticks(progress)
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    pub fn rank(&self) -> ChallengeRank {
        self.rank
    }

    pub fn unbounded(&self) -> bool {
        self.unbounded
    }

    /// Upper bound on progress, `None` for unbounded tracks.
    pub fn max_ticks(&self) -> Option<u32> {
        (!self.unbounded).then_some(MAX_TICKS)
    }

    /// Moves the track by `steps` (negative steps move it back).
    pub fn advanced(&self, steps: i64) -> Self {
        let delta = steps.saturating_mul(i64::from(self.rank.ticks_per_step()));
        self.with_ticks(i64::from(self.progress).saturating_add(delta))
    }

    /// Sets progress to `ticks`, clamped to the track's range.
    pub fn with_ticks(&self, ticks: i64) -> Self {
        let upper = i64::from(self.max_ticks().unwrap_or(u32::MAX));
        let progress = u32::try_from(ticks.clamp(0, upper)).unwrap_or(u32::MAX);
        Self { progress, ..*self }
    }

    /// Fully ticked boxes. Unbounded tracks may report more than [`BOXES`].
    pub fn boxes_filled(&self) -> u32 {
        self.progress / TICKS_PER_BOX
    }

    pub fn is_complete(&self) -> bool {
        self.max_ticks().is_some_and(|max| self.progress >= max)
    }

    pub fn ticks_remaining(&self) -> Option<u32> {
        self.max_ticks()
            .map(|max| max.saturating_sub(self.progress))
    }

    /// Steps needed to complete the track, rounding a partial step up.
    pub fn steps_remaining(&self) -> Option<u32> {
        self.ticks_remaining()
            .map(|ticks| ticks.div_ceil(self.rank.ticks_per_step()))
    }

    /// Step counts a UI should offer: `1..=steps_remaining` for bounded
    /// tracks, one full track's worth of steps for unbounded ones.
    pub fn valid_step_choices(&self) -> Vec<u32> {
        let most = self
            .steps_remaining()
            .unwrap_or(MAX_TICKS / self.rank.ticks_per_step());
        (1..=most).collect()
    }
}

impl<'de> Deserialize<'de> for ProgressTrack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Fields {
            progress: i64,
            rank: ChallengeRank,
            #[serde(default)]
            unbounded: bool,
        }

        let Fields {
            progress,
            rank,
            unbounded,
        } = Fields::deserialize(deserializer)?;
        Ok(Self::new(rank, progress, unbounded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn rank_names_parse_case_insensitively() {
        assert_eq!("Formidable".parse::<ChallengeRank>(), Ok(ChallengeRank::Formidable));
        assert_eq!("epic".parse::<ChallengeRank>(), Ok(ChallengeRank::Epic));
        assert_eq!(ChallengeRank::Dangerous.to_string(), "dangerous");
        assert!("legendary".parse::<ChallengeRank>().is_err());
    }

    #[test]
    fn every_rank_completes_within_ten_boxes() {
        for rank in ChallengeRank::iter() {
            let track = ProgressTrack::new(rank, 0, false);
            let steps = track.steps_remaining().unwrap();
            assert!(track.advanced(i64::from(steps)).is_complete(), "{rank}");
            assert!(!track.advanced(i64::from(steps) - 1).is_complete(), "{rank}");
        }
    }

    #[test]
    fn advancing_scales_by_rank_and_clamps() {
        let track = ProgressTrack::new(ChallengeRank::Formidable, 0, false);
        for steps in 0..=12 {
            let advanced = track.advanced(steps);
            assert_eq!(
                i64::from(advanced.progress()),
                (steps * 4).min(i64::from(MAX_TICKS))
            );
        }

        let dangerous = ProgressTrack::new(ChallengeRank::Dangerous, 36, false);
        assert_eq!(dangerous.advanced(1).progress(), 40);
        assert_eq!(dangerous.advanced(-10).progress(), 0);
    }

    #[test]
    fn with_ticks_round_trips_in_range_and_clamps_outside() {
        let track = ProgressTrack::new(ChallengeRank::Extreme, 0, false);
        for ticks in 0..=40 {
            assert_eq!(i64::from(track.with_ticks(ticks).progress()), ticks);
        }
        assert_eq!(track.with_ticks(41).progress(), 40);
        assert_eq!(track.with_ticks(-3).progress(), 0);
    }

    #[test]
    fn unbounded_tracks_never_complete() {
        let track = ProgressTrack::new(ChallengeRank::Epic, 38, true);
        let advanced = track.advanced(10);
        assert_eq!(advanced.progress(), 48);
        assert_eq!(advanced.boxes_filled(), 12);
        assert!(!advanced.is_complete());
        assert_eq!(advanced.ticks_remaining(), None);
        assert_eq!(advanced.steps_remaining(), None);
        assert_eq!(advanced.valid_step_choices().len(), 40);
    }

    #[test]
    fn deserializing_clamps_progress() {
        let track: ProgressTrack =
            serde_json::from_str(r#"{"progress":100,"rank":"epic","unbounded":false}"#).unwrap();
        assert_eq!(track.progress(), MAX_TICKS);
        assert!(track.is_complete());

        let track: ProgressTrack =
            serde_json::from_str(r#"{"progress":-4,"rank":"dangerous"}"#).unwrap();
        assert_eq!(track.progress(), 0);

        let unbounded = ProgressTrack::new(ChallengeRank::Epic, 100, true);
        let json = serde_json::to_string(&unbounded).unwrap();
        assert_eq!(serde_json::from_str::<ProgressTrack>(&json).unwrap(), unbounded);
    }

    #[test]
    fn derived_values() {
        let track = ProgressTrack::new(ChallengeRank::Troublesome, 30, false);
        assert_eq!(track.boxes_filled(), 7);
        assert_eq!(track.ticks_remaining(), Some(10));
        assert_eq!(track.steps_remaining(), Some(1));
        assert_eq!(track.valid_step_choices(), vec![1]);

        let full = track.with_ticks(40);
        assert!(full.is_complete());
        assert!(full.valid_step_choices().is_empty());
    }
}
