//! Chart data model
//!
//! A chart is authored externally and loaded once before a level starts;
//! the simulation only ever reads it. The serde field names follow the
//! authoring tool's JSON layout (`audioFile`, `beatsPerMinute`,
//! `eventTracks`, per-event `track`).

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LANES;

/// Chart event kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Judged once, at `start`
    Tap,
    /// Judged at press (`start`) and release (`start + duration`)
    Hold,
}

/// A single authored note.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Input lane index, `0..chart.lanes`
    #[serde(rename = "track")]
    pub lane: usize,
    /// Seconds from track start
    pub start: f32,
    /// Hold length in seconds; 0 for taps
    #[serde(default)]
    pub duration: f32,
}

impl Event {
    /// Instant the event stops being relevant.
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// An authored track: metadata plus an ordered event list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub author: String,
    #[serde(rename = "audioFile")]
    pub audio_file: String,
    #[serde(rename = "beatsPerMinute")]
    pub beats_per_minute: f32,
    #[serde(rename = "eventTracks")]
    pub lanes: usize,
    pub events: Vec<Event>,
}

/// Chart validation and parse failures.
#[derive(Debug)]
pub enum ChartError {
    /// Chart JSON could not be parsed
    Parse(serde_json::Error),
    /// Lane count outside `1..=MAX_LANES`
    BadLaneCount(usize),
    /// An event references a lane `>= chart.lanes`
    LaneOutOfRange { lane: usize, lanes: usize },
    /// Events are not ordered by start time
    UnsortedEvents,
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartError::Parse(err) => write!(f, "failed to parse chart: {err}"),
            ChartError::BadLaneCount(lanes) => {
                write!(f, "chart has {lanes} lanes, expected 1..={MAX_LANES}")
            }
            ChartError::LaneOutOfRange { lane, lanes } => {
                write!(f, "event lane {lane} out of range for {lanes}-lane chart")
            }
            ChartError::UnsortedEvents => write!(f, "events are not sorted by start time"),
        }
    }
}

impl std::error::Error for ChartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ChartError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        ChartError::Parse(err)
    }
}

impl Chart {
    /// Parse and validate a chart from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        let chart: Chart = serde_json::from_str(json)?;
        chart.validate()?;
        Ok(chart)
    }

    /// Check the invariants the simulation relies on: a supported lane
    /// count, in-range event lanes, and a start-ordered event list.
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.lanes == 0 || self.lanes > MAX_LANES {
            return Err(ChartError::BadLaneCount(self.lanes));
        }
        for event in &self.events {
            if event.lane >= self.lanes {
                return Err(ChartError::LaneOutOfRange {
                    lane: event.lane,
                    lanes: self.lanes,
                });
            }
        }
        if self
            .events
            .windows(2)
            .any(|pair| pair[0].start > pair[1].start)
        {
            return Err(ChartError::UnsortedEvents);
        }
        Ok(())
    }

    /// Seconds until the last event has fully played out.
    pub fn duration(&self) -> f32 {
        self.events.iter().map(Event::end).fold(0.0, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart_with_events(lanes: usize, events: Vec<Event>) -> Chart {
        Chart {
            title: "test".into(),
            author: "test".into(),
            audio_file: "test.ogg".into(),
            beats_per_minute: 120.0,
            lanes,
            events,
        }
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "title": "Galaxies",
            "author": "nobody",
            "audioFile": "galaxies.ogg",
            "beatsPerMinute": 130.0,
            "eventTracks": 4,
            "events": [
                { "type": "Tap", "track": 0, "start": 1.0 },
                { "type": "Hold", "track": 2, "start": 2.0, "duration": 1.5 }
            ]
        }"#;
        let chart = Chart::from_json(json).unwrap();
        assert_eq!(chart.lanes, 4);
        assert_eq!(chart.events.len(), 2);
        assert_eq!(chart.events[0].kind, EventKind::Tap);
        assert_eq!(chart.events[0].duration, 0.0);
        assert_eq!(chart.events[1].lane, 2);
        assert!((chart.duration() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_bad_lane_count() {
        let chart = chart_with_events(0, vec![]);
        assert!(matches!(
            chart.validate(),
            Err(ChartError::BadLaneCount(0))
        ));
    }

    #[test]
    fn test_rejects_out_of_range_lane() {
        let chart = chart_with_events(
            2,
            vec![Event {
                kind: EventKind::Tap,
                lane: 2,
                start: 1.0,
                duration: 0.0,
            }],
        );
        assert!(matches!(
            chart.validate(),
            Err(ChartError::LaneOutOfRange { lane: 2, lanes: 2 })
        ));
    }

    #[test]
    fn test_rejects_unsorted_events() {
        let chart = chart_with_events(
            4,
            vec![
                Event {
                    kind: EventKind::Tap,
                    lane: 0,
                    start: 2.0,
                    duration: 0.0,
                },
                Event {
                    kind: EventKind::Tap,
                    lane: 1,
                    start: 1.0,
                    duration: 0.0,
                },
            ],
        );
        assert!(matches!(chart.validate(), Err(ChartError::UnsortedEvents)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Chart::from_json("{ not json"),
            Err(ChartError::Parse(_))
        ));
    }
}
