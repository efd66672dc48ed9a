//! Progress-track and clock documents.
//!
//! Both adapters parse the handful of keys they own and keep the rest of the
//! record untouched, so writing back only changes what the transition changed.

use serde_json::Value;

use super::clock::Clock;
use super::progress::{ChallengeRank, MAX_TICKS, ProgressTrack};
use crate::record::{RawRecord, RecordBacked};
use crate::schema::{
    SchemaError, SchemaReason, check_range, optional_bool, optional_string, require_bool,
    require_integer, require_string,
};

const NAME: &str = "Name";
const PROGRESS: &str = "Progress";
const RANK: &str = "Rank";
const TRACK_TYPE: &str = "TrackType";
const UNBOUNDED: &str = "Unbounded";

const SEGMENTS: &str = "Segments";
const FILLED: &str = "Filled";
const ACTIVE: &str = "Active";

/// A validated progress-track document.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressTrackDocument {
    raw: RawRecord,
    name: String,
    track_type: Option<String>,
    track: ProgressTrack,
}

impl ProgressTrackDocument {
    pub fn parse(raw: RawRecord) -> Result<Self, SchemaError> {
        let name = require_string(&raw, NAME)?.to_owned();
        let rank_name = require_string(&raw, RANK)?;
        let rank = rank_name.parse::<ChallengeRank>().map_err(|_| {
            SchemaError::new(
                RANK,
                SchemaReason::Invalid(format!("unknown challenge rank `{rank_name}`")),
            )
        })?;
        let unbounded = optional_bool(&raw, UNBOUNDED)?.unwrap_or(false);
        let upper = if unbounded {
            i64::from(u32::MAX)
        } else {
            i64::from(MAX_TICKS)
        };
        let progress = check_range(PROGRESS, require_integer(&raw, PROGRESS)?, 0, upper)?;
        let track_type = optional_string(&raw, TRACK_TYPE)?.map(str::to_owned);

        Ok(Self {
            track: ProgressTrack::new(rank, progress, unbounded),
            raw,
            name,
            track_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn track_type(&self) -> Option<&str> {
        self.track_type.as_deref()
    }

    pub fn track(&self) -> &ProgressTrack {
        &self.track
    }

    /// Applies a transition and writes the new `Progress` back.
    ///
    /// Only progress is persisted; the rank of a track never changes here.
    pub fn updating_track(&self, f: impl FnOnce(&ProgressTrack) -> ProgressTrack) -> Self {
        let progress = f(&self.track).progress();
        let track = self.track.with_ticks(i64::from(progress));
        let mut raw = self.raw.clone();
        raw.insert(PROGRESS.into(), Value::from(track.progress()));
        Self {
            raw,
            name: self.name.clone(),
            track_type: self.track_type.clone(),
            track,
        }
    }

    pub fn into_raw(self) -> RawRecord {
        self.raw
    }
}

impl RecordBacked for ProgressTrackDocument {
    fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

/// A validated clock document.
#[derive(Clone, Debug, PartialEq)]
pub struct ClockDocument {
    raw: RawRecord,
    name: Option<String>,
    clock: Clock,
}

impl ClockDocument {
    pub fn parse(raw: RawRecord) -> Result<Self, SchemaError> {
        let name = optional_string(&raw, NAME)?.map(str::to_owned);
        let segments = check_range(
            SEGMENTS,
            require_integer(&raw, SEGMENTS)?,
            1,
            i64::from(u32::MAX),
        )?;
        let filled = check_range(FILLED, require_integer(&raw, FILLED)?, 0, segments)?;
        let active = require_bool(&raw, ACTIVE)?;
        let clock = Clock::new(to_u32(SEGMENTS, segments)?, to_u32(FILLED, filled)?, active)
            .map_err(|e| SchemaError::new(FILLED, SchemaReason::Invalid(e.to_string())))?;
        Ok(Self { raw, name, clock })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Applies a transition and writes `Filled` and `Active` back.
    pub fn updating_clock(&self, f: impl FnOnce(&Clock) -> Clock) -> Self {
        let clock = f(&self.clock);
        let mut raw = self.raw.clone();
        raw.insert(FILLED.into(), Value::from(clock.filled()));
        raw.insert(ACTIVE.into(), Value::Bool(clock.active()));
        Self {
            raw,
            clock,
            name: self.name.clone(),
        }
    }

    pub fn into_raw(self) -> RawRecord {
        self.raw
    }
}

impl RecordBacked for ClockDocument {
    fn raw(&self) -> &RawRecord {
        &self.raw
    }
}

fn to_u32(key: &str, value: i64) -> Result<u32, SchemaError> {
    u32::try_from(value).map_err(|_| {
        SchemaError::new(
            key,
            SchemaReason::TooBig {
                value,
                max: i64::from(u32::MAX),
            },
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::as_record;
    use serde_json::json;

    fn record(value: Value) -> RawRecord {
        as_record(value).unwrap()
    }

    #[test]
    fn parses_a_progress_track() {
        let doc = ProgressTrackDocument::parse(record(json!({
            "Name": "Find the relic",
            "Progress": 12,
            "Rank": "Dangerous",
            "TrackType": "Vow",
            "tags": ["progress"],
        })))
        .unwrap();
        assert_eq!(doc.name(), "Find the relic");
        assert_eq!(doc.track_type(), Some("Vow"));
        assert_eq!(doc.track().rank(), ChallengeRank::Dangerous);
        assert_eq!(doc.track().progress(), 12);
        assert!(!doc.track().unbounded());
    }

    #[test]
    fn rejects_bad_progress_tracks() {
        let err = ProgressTrackDocument::parse(record(json!({
            "Name": "x", "Progress": 3, "Rank": "legendary"
        })))
        .unwrap_err();
        assert_eq!(err.path, "Rank");

        let err = ProgressTrackDocument::parse(record(json!({
            "Name": "x", "Progress": 41, "Rank": "epic"
        })))
        .unwrap_err();
        assert_eq!(err.path, "Progress");

        assert!(
            ProgressTrackDocument::parse(record(json!({
                "Name": "x", "Progress": 41, "Rank": "epic", "Unbounded": true
            })))
            .is_ok()
        );
    }

    #[test]
    fn updating_a_track_only_writes_progress() {
        let doc = ProgressTrackDocument::parse(record(json!({
            "Name": "x", "Progress": 4, "Rank": "formidable", "Notes": "keep me"
        })))
        .unwrap();
        let next = doc.updating_track(|t| t.advanced(2));
        assert_eq!(next.track().progress(), 12);
        assert_eq!(next.raw()["Progress"], json!(12));
        assert_eq!(next.raw()["Notes"], json!("keep me"));
        assert_eq!(next.raw()["Rank"], json!("formidable"));
        assert_eq!(doc.raw()["Progress"], json!(4));

        let same = doc.updating_track(|t| *t);
        assert_eq!(same, doc);
    }

    #[test]
    fn parses_and_ticks_a_clock() {
        let doc = ClockDocument::parse(record(json!({
            "Name": "Storm arrives", "Segments": 6, "Filled": 4, "Active": true
        })))
        .unwrap();
        assert_eq!(doc.name(), Some("Storm arrives"));

        let next = doc.updating_clock(|c| c.tick(5));
        assert!(next.clock().is_filled());
        assert_eq!(next.raw()["Filled"], json!(6));
        assert_eq!(next.raw()["Active"], json!(true));

        let paused = next.updating_clock(|c| c.with_active(false));
        assert_eq!(paused.raw()["Active"], json!(false));
    }

    #[test]
    fn rejects_bad_clocks() {
        let err = ClockDocument::parse(record(json!({
            "Segments": 4, "Filled": 5, "Active": true
        })))
        .unwrap_err();
        assert_eq!(err.path, "Filled");

        let err = ClockDocument::parse(record(json!({
            "Segments": 0, "Filled": 0, "Active": true
        })))
        .unwrap_err();
        assert_eq!(err.path, "Segments");

        let err = ClockDocument::parse(record(json!({ "Segments": 4, "Filled": 1 })))
            .unwrap_err();
        assert_eq!(err.path, "Active");
    }
}
