//! GPX 1.1 document rendering.
//!
//! Consumes a decoded [`TrackLog`] and produces an indented, UTF-8 GPX
//! document with Garmin TrackPointExtension heart rates. Rendering is pure:
//! bytes in memory out, no file I/O, so identical input always yields
//! byte-identical output.

use std::io::Write;

use log::{debug, warn};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::Result;
use crate::rounding::format_half_up;
use crate::segment::{split_on_pauses, DEFAULT_PAUSE_THRESHOLD_MS};
use crate::summary::format_summary;
use crate::types::{TrackLog, TrackPoint};

/// `creator` attribute on the `<gpx>` root element.
pub const CREATOR: &str = "Mapjack GPS Watch";

const NS_GPX: &str = "http://www.topografix.com/GPX/1/1";
const NS_GPXTPX: &str = "http://www.garmin.com/xmlschemas/TrackPointExtension/v1";

/// Rendering configuration.
#[derive(Debug, Clone, Copy)]
pub struct GpxConfig {
    /// Recording gap above which a new `<trkseg>` starts, in milliseconds.
    pub pause_threshold_ms: i64,
}

impl Default for GpxConfig {
    fn default() -> Self {
        Self {
            pause_threshold_ms: DEFAULT_PAUSE_THRESHOLD_MS,
        }
    }
}

/// Render a decoded track log as an indented GPX 1.1 document.
///
/// `file_name` becomes the `<metadata><name>` text and should be the output
/// file's name. A zero-point log renders an empty `<trk/>` and logs a
/// warning instead of failing.
pub fn render_gpx(log: &TrackLog, file_name: &str, config: &GpxConfig) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gpx = BytesStart::new("gpx");
    gpx.push_attribute(("xmlns", NS_GPX));
    gpx.push_attribute(("xmlns:gpxtpx", NS_GPXTPX));
    gpx.push_attribute(("creator", CREATOR));
    writer.write_event(Event::Start(gpx))?;

    write_metadata(&mut writer, log, file_name)?;
    write_track(&mut writer, log, config)?;

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    Ok(writer.into_inner())
}

fn write_metadata<W: Write>(writer: &mut Writer<W>, log: &TrackLog, file_name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("metadata")))?;

    text_element(writer, "name", file_name)?;
    match log.points.first() {
        Some(first) => text_element(writer, "time", &iso_time(first))?,
        // The metadata time is the first point's timestamp; without points
        // the element is omitted.
        None => warn!("track log is empty, omitting metadata time"),
    }
    text_element(writer, "desc", &format_summary(&log.summary, log.has_hr))?;

    writer.write_event(Event::End(BytesEnd::new("metadata")))?;
    Ok(())
}

fn write_track<W: Write>(writer: &mut Writer<W>, log: &TrackLog, config: &GpxConfig) -> Result<()> {
    if log.points.is_empty() {
        warn!("track log is empty, writing a track with no segments");
        writer.write_event(Event::Empty(BytesStart::new("trk")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("trk")))?;

    let segments = split_on_pauses(&log.points, config.pause_threshold_ms);
    debug!("found {} pauses", segments.len() - 1);

    let mut index = 1usize;
    for segment in &segments {
        writer.write_event(Event::Start(BytesStart::new("trkseg")))?;
        for point in *segment {
            write_point(writer, point, index, log.has_hr)?;
            index += 1;
        }
        writer.write_event(Event::End(BytesEnd::new("trkseg")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("trk")))?;
    Ok(())
}

fn write_point<W: Write>(
    writer: &mut Writer<W>,
    point: &TrackPoint,
    index: usize,
    has_hr: bool,
) -> Result<()> {
    let mut trkpt = BytesStart::new("trkpt");
    trkpt.push_attribute(("lat", point.latitude.to_string().as_str()));
    trkpt.push_attribute(("lon", point.longitude.to_string().as_str()));
    writer.write_event(Event::Start(trkpt))?;

    text_element(writer, "desc", &index.to_string())?;
    text_element(writer, "ele", &point.altitude_m.to_string())?;
    text_element(writer, "time", &iso_time(point))?;
    text_element(writer, "sat", &point.satellites.to_string())?;

    writer.write_event(Event::Start(BytesStart::new("extensions")))?;
    if has_hr {
        writer.write_event(Event::Start(BytesStart::new("gpxtpx:TrackPointExtension")))?;
        text_element(writer, "gpxtpx:hr", &point.heart_rate.to_string())?;
        writer.write_event(Event::End(BytesEnd::new("gpxtpx:TrackPointExtension")))?;
    }
    text_element(writer, "distance", &format_half_up(point.distance_m / 1000.0, 2))?;
    text_element(writer, "speed", &format_half_up(point.speed_kmh, 1))?;
    writer.write_event(Event::End(BytesEnd::new("extensions")))?;

    writer.write_event(Event::End(BytesEnd::new("trkpt")))?;
    Ok(())
}

fn text_element<W: Write>(writer: &mut Writer<W>, name: &str, value: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn iso_time(point: &TrackPoint) -> String {
    point.time.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
