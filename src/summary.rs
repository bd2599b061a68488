//! Session summary rendering for the GPX metadata description.

use crate::rounding::format_half_up;
use crate::types::SessionSummary;

/// Render the fixed-order, multi-line summary block used as the GPX
/// `<metadata><desc>` text.
///
/// Labels and layout reproduce the watch vendor's desktop software output,
/// including the German field names and column alignment. Heart-rate lines
/// appear only when `has_hr`; otherwise a single placeholder line is
/// emitted. Every line is `\n`-terminated.
pub fn format_summary(summary: &SessionSummary, has_hr: bool) -> String {
    let mut out = String::new();

    out.push_str(&format!("Anzahl Runden              : {}\n", summary.laps));
    out.push_str(&format!(
        "Trainingszeit (Std)        : {}\n",
        summary.workout_time_string()
    ));
    out.push_str(&format!(
        "Gesamtdistanz (km)         : {}\n",
        format_half_up(summary.distance_m / 1000.0, 2)
    ));
    out.push_str(&format!(
        "Pace AVG (min/km)          : {}\n",
        summary.pace_string()
    ));
    out.push_str(&format!(
        "Geschwindigkeit AVG (km/h) : {}\n",
        format_half_up(summary.avg_speed_kmh, 1)
    ));
    out.push_str(&format!(
        "Geschwindigkeit MAX (km/h) : {}\n",
        format_half_up(summary.max_speed_kmh, 1)
    ));
    out.push_str(&format!(
        "Kalorien (kcal)            : {}\n",
        format_half_up(summary.calories_kcal, 1)
    ));

    if has_hr {
        out.push_str(&format!("Herzfrequenz MIN           : {}\n", summary.min_hr));
        out.push_str(&format!("Herzfrequenz AVG           : {}\n", summary.avg_hr));
        out.push_str(&format!("Herzfrequenz MAX           : {}\n", summary.max_hr));
    } else {
        // Trailing space preserved from the original product output.
        out.push_str("Herzfrequenz               : nicht aufgezeichnet \n");
    }

    out
}
