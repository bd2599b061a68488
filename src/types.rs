//! Decoded TKL data model.
//!
//! These types are created once per input file by the decoder and are
//! read-only afterwards. Nothing here is shared across files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single decoded track point.
///
/// All unit conversions happen at decode time, so the fields here are ready
/// for emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackPoint {
    /// Latitude in degrees (positive north)
    pub latitude: f64,
    /// Longitude in degrees (positive east)
    pub longitude: f64,
    /// Altitude in meters, storage bias already removed unless decoding
    /// opted out
    pub altitude_m: f64,
    /// Absolute recording time
    pub time: DateTime<Utc>,
    /// Number of satellites in the fix
    pub satellites: u8,
    /// Heart rate in bpm, 0 if unrecorded
    pub heart_rate: u8,
    /// Cumulative distance in meters (non-decreasing in well-formed files)
    pub distance_m: f64,
    /// Instantaneous speed in km/h
    pub speed_kmh: f64,
}

/// Aggregate statistics for one recorded workout, decoded from the file's
/// summary block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub laps: u16,
    /// Total workout duration in seconds
    pub workout_time_s: u32,
    /// Total distance in meters
    pub distance_m: f64,
    /// Average pace in seconds per kilometer
    pub avg_pace_s_per_km: u16,
    /// Average speed in km/h
    pub avg_speed_kmh: f64,
    /// Maximum speed in km/h
    pub max_speed_kmh: f64,
    /// Burned calories in kcal
    pub calories_kcal: f64,
    /// Minimum heart rate in bpm, 0 without a sensor
    pub min_hr: u8,
    /// Average heart rate in bpm, 0 without a sensor
    pub avg_hr: u8,
    /// Maximum heart rate in bpm, 0 without a sensor
    pub max_hr: u8,
}

impl SessionSummary {
    /// `HH:MM:SS` rendering of the workout duration.
    pub fn workout_time_string(&self) -> String {
        let hours = self.workout_time_s / 3600;
        let minutes = (self.workout_time_s % 3600) / 60;
        let seconds = self.workout_time_s % 60;
        format!("{hours:02}:{minutes:02}:{seconds:02}")
    }

    /// `M:SS` rendering of the average pace.
    pub fn pace_string(&self) -> String {
        format!(
            "{}:{:02}",
            self.avg_pace_s_per_km / 60,
            self.avg_pace_s_per_km % 60
        )
    }
}

/// Everything decoded from one `.tkl` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackLog {
    pub summary: SessionSummary,
    /// Track points in recording order
    pub points: Vec<TrackPoint>,
    /// Whether the session carries heart-rate data (`summary.max_hr != 0`).
    /// When `false`, per-point heart rates are ignored downstream.
    pub has_hr: bool,
}
