//! Pause segmentation: splitting a point sequence into contiguous segments.
//!
//! GPS watches keep recording across breaks, so a long gap between two
//! consecutive points marks a pause, not a straight line to be drawn. The
//! threshold is configurable because the storing interval varies by device
//! configuration.

use crate::types::TrackPoint;

/// Default recording gap, in milliseconds, above which a new segment starts.
/// Matches a device storing one position every 4 seconds.
pub const DEFAULT_PAUSE_THRESHOLD_MS: i64 = 4000;

/// Split `points` into segments at recording gaps strictly greater than
/// `threshold_ms`.
///
/// The point after a qualifying gap starts the new segment. No point is
/// ever dropped, and consecutive qualifying gaps each open a segment of
/// their own (k gaps yield k + 1 segments, some possibly single-point).
/// An empty input yields no segments.
pub fn split_on_pauses(points: &[TrackPoint], threshold_ms: i64) -> Vec<&[TrackPoint]> {
    let mut segments = Vec::new();
    if points.is_empty() {
        return segments;
    }

    let mut start = 0;
    for i in 1..points.len() {
        let gap_ms = points[i]
            .time
            .signed_duration_since(points[i - 1].time)
            .num_milliseconds();
        if gap_ms > threshold_ms {
            segments.push(&points[start..i]);
            start = i;
        }
    }
    segments.push(&points[start..]);

    segments
}
