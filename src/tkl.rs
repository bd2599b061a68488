//! Binary decoder for the proprietary TKL track-log format.
//!
//! A `.tkl` file is fixed-layout binary, little-endian throughout:
//! - an 8-byte header (magic, format version, reserved bytes),
//! - a 32-byte session summary block protected by an additive checksum,
//! - zero or more 24-byte track-point records running to the end of file.
//!
//! Decoding is a pure transform from a byte buffer to a [`TrackLog`]; all
//! unit conversions (coordinate scaling, altitude bias, device-epoch
//! timestamps, speed steps) happen here, never in the emitter.

use chrono::DateTime;
use log::debug;

use crate::error::{Result, TklError};
use crate::types::{SessionSummary, TrackLog, TrackPoint};

/// File magic at offset 0.
pub const MAGIC: &[u8; 4] = b"TKL1";
/// The only supported format version.
pub const FORMAT_VERSION: u8 = 1;
/// Header length in bytes.
pub const HEADER_LEN: usize = 8;
/// Summary block length in bytes.
pub const SUMMARY_LEN: usize = 32;
/// Track-point record length in bytes.
pub const RECORD_LEN: usize = 24;

/// Seconds between the Unix epoch and the device epoch (2000-01-01T00:00:00Z).
const DEVICE_EPOCH_UNIX: i64 = 946_684_800;
/// The device stores altitude in 0.1 m steps with a +500 m bias so that
/// tracks below sea level stay unsigned.
const ALTITUDE_BIAS_M: f64 = 500.0;

/// Decoding switches.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Remove the +500 m storage bias from altitudes. Disable to keep the
    /// scaled raw values as the device wrote them.
    pub correct_altitude: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            correct_altitude: true,
        }
    }
}

/// Decode one `.tkl` file from a byte buffer with default options.
pub fn decode(bytes: &[u8]) -> Result<TrackLog> {
    decode_with_options(bytes, &DecodeOptions::default())
}

/// Decode one `.tkl` file from a byte buffer.
///
/// Fails with [`TklError::MalformedInput`] when the buffer is shorter than
/// header + summary or a structural marker does not match, and with
/// [`TklError::TruncatedRecord`] when the trailing bytes do not form a whole
/// number of records. A zero-record file is valid.
pub fn decode_with_options(bytes: &[u8], options: &DecodeOptions) -> Result<TrackLog> {
    if bytes.len() < HEADER_LEN + SUMMARY_LEN {
        return Err(TklError::MalformedInput {
            reason: format!(
                "file is {} bytes, minimum is {}",
                bytes.len(),
                HEADER_LEN + SUMMARY_LEN
            ),
        });
    }

    if &bytes[..4] != MAGIC {
        return Err(TklError::MalformedInput {
            reason: format!("bad magic {:02x?}", &bytes[..4]),
        });
    }

    let version = bytes[4];
    if version != FORMAT_VERSION {
        return Err(TklError::MalformedInput {
            reason: format!("unsupported format version {version}"),
        });
    }

    let summary_bytes = &bytes[HEADER_LEN..HEADER_LEN + SUMMARY_LEN];
    let stored = read_u16(summary_bytes, SUMMARY_LEN - 2);
    let computed = checksum(&summary_bytes[..SUMMARY_LEN - 2]);
    if stored != computed {
        return Err(TklError::MalformedInput {
            reason: format!("summary checksum mismatch: stored {stored:#06x}, computed {computed:#06x}"),
        });
    }
    let summary = decode_summary(summary_bytes);

    let body = &bytes[HEADER_LEN + SUMMARY_LEN..];
    let trailing = body.len() % RECORD_LEN;
    if trailing != 0 {
        return Err(TklError::TruncatedRecord {
            trailing,
            record_size: RECORD_LEN,
        });
    }

    let mut points = Vec::with_capacity(body.len() / RECORD_LEN);
    for record in body.chunks_exact(RECORD_LEN) {
        points.push(decode_point(record, options)?);
    }
    debug!("decoded {} track points", points.len());

    let has_hr = summary.max_hr != 0;
    Ok(TrackLog {
        summary,
        points,
        has_hr,
    })
}

/// Additive 16-bit checksum used by the summary block.
fn checksum(bytes: &[u8]) -> u16 {
    bytes
        .iter()
        .fold(0u16, |sum, &b| sum.wrapping_add(u16::from(b)))
}

fn decode_summary(b: &[u8]) -> SessionSummary {
    SessionSummary {
        laps: read_u16(b, 0),
        workout_time_s: read_u32(b, 2),
        distance_m: f64::from(read_u32(b, 6)),
        avg_pace_s_per_km: read_u16(b, 10),
        avg_speed_kmh: f64::from(read_u16(b, 12)) / 10.0,
        max_speed_kmh: f64::from(read_u16(b, 14)) / 10.0,
        calories_kcal: f64::from(read_u16(b, 16)) / 10.0,
        min_hr: b[18],
        avg_hr: b[19],
        max_hr: b[20],
    }
}

fn decode_point(b: &[u8], options: &DecodeOptions) -> Result<TrackPoint> {
    let raw_altitude = f64::from(read_u16(b, 8)) / 10.0;
    let altitude_m = if options.correct_altitude {
        raw_altitude - ALTITUDE_BIAS_M
    } else {
        raw_altitude
    };

    let raw_time = read_u32(b, 10);
    let time = DateTime::from_timestamp(DEVICE_EPOCH_UNIX + i64::from(raw_time), 0).ok_or_else(
        || TklError::MalformedInput {
            reason: format!("timestamp {raw_time} out of range"),
        },
    )?;

    Ok(TrackPoint {
        latitude: f64::from(read_i32(b, 0)) / 1_000_000.0,
        longitude: f64::from(read_i32(b, 4)) / 1_000_000.0,
        altitude_m,
        time,
        satellites: b[14],
        heart_rate: b[15],
        distance_m: f64::from(read_u32(b, 16)),
        speed_kmh: f64::from(read_u16(b, 20)) / 10.0,
    })
}

fn read_u16(b: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([b[at], b[at + 1]])
}

fn read_u32(b: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

fn read_i32(b: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([b[at], b[at + 1], b[at + 2], b[at + 3]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    /// Minimal summary block with the checksum filled in.
    fn summary_block(max_hr: u8) -> [u8; SUMMARY_LEN] {
        let mut b = [0u8; SUMMARY_LEN];
        b[0..2].copy_from_slice(&2u16.to_le_bytes()); // laps
        b[2..6].copy_from_slice(&3600u32.to_le_bytes()); // workout time
        b[6..10].copy_from_slice(&12345u32.to_le_bytes()); // distance m
        b[10..12].copy_from_slice(&330u16.to_le_bytes()); // pace s/km
        b[12..14].copy_from_slice(&105u16.to_le_bytes()); // avg speed, 10.5 km/h
        b[14..16].copy_from_slice(&152u16.to_le_bytes()); // max speed, 15.2 km/h
        b[16..18].copy_from_slice(&4815u16.to_le_bytes()); // calories, 481.5 kcal
        b[18] = 95;
        b[19] = 140;
        b[20] = max_hr;
        let sum = checksum(&b[..SUMMARY_LEN - 2]);
        b[SUMMARY_LEN - 2..].copy_from_slice(&sum.to_le_bytes());
        b
    }

    fn point_record(device_time: u32) -> [u8; RECORD_LEN] {
        let mut b = [0u8; RECORD_LEN];
        b[0..4].copy_from_slice(&51_507_400i32.to_le_bytes()); // 51.5074°
        b[4..8].copy_from_slice(&(-127_800i32).to_le_bytes()); // -0.1278°
        b[8..10].copy_from_slice(&5_123u16.to_le_bytes()); // 12.3 m after bias
        b[10..14].copy_from_slice(&device_time.to_le_bytes());
        b[14] = 7; // satellites
        b[15] = 142; // heart rate
        b[16..20].copy_from_slice(&520u32.to_le_bytes()); // 520 m
        b[20..22].copy_from_slice(&101u16.to_le_bytes()); // 10.1 km/h
        b
    }

    fn tkl_file(max_hr: u8, records: &[[u8; RECORD_LEN]]) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.push(FORMAT_VERSION);
        bytes.extend_from_slice(&[0, 0, 0]); // flags + reserved
        bytes.extend_from_slice(&summary_block(max_hr));
        for record in records {
            bytes.extend_from_slice(record);
        }
        bytes
    }

    #[test]
    fn test_decode_valid_file() {
        let log = decode(&tkl_file(178, &[point_record(0), point_record(4)])).unwrap();

        assert_eq!(log.points.len(), 2);
        assert!(log.has_hr);
        assert_eq!(log.summary.laps, 2);
        assert_eq!(log.summary.workout_time_s, 3600);
        assert_eq!(log.summary.distance_m, 12345.0);
        assert_eq!(log.summary.avg_speed_kmh, 10.5);
        assert_eq!(log.summary.max_speed_kmh, 15.2);
        assert_eq!(log.summary.calories_kcal, 481.5);
        assert_eq!(log.summary.max_hr, 178);
    }

    #[test]
    fn test_point_unit_conversions() {
        let log = decode(&tkl_file(178, &[point_record(4)])).unwrap();
        let point = &log.points[0];

        assert!((point.latitude - 51.5074).abs() < 1e-9);
        assert!((point.longitude - -0.1278).abs() < 1e-9);
        assert!((point.altitude_m - 12.3).abs() < 1e-9);
        assert_eq!(
            point.time,
            Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 4).unwrap()
        );
        assert_eq!(point.satellites, 7);
        assert_eq!(point.heart_rate, 142);
        assert_eq!(point.distance_m, 520.0);
        assert_eq!(point.speed_kmh, 10.1);
    }

    #[test]
    fn test_uncorrected_altitude() {
        let options = DecodeOptions {
            correct_altitude: false,
        };
        let log = decode_with_options(&tkl_file(0, &[point_record(0)]), &options).unwrap();
        assert!((log.points[0].altitude_m - 512.3).abs() < 1e-9);
    }

    #[test]
    fn test_zero_points_is_valid() {
        let log = decode(&tkl_file(0, &[])).unwrap();
        assert!(log.points.is_empty());
        assert!(!log.has_hr);
    }

    #[test]
    fn test_no_hr_flag() {
        let log = decode(&tkl_file(0, &[point_record(0)])).unwrap();
        assert!(!log.has_hr);
    }

    #[test]
    fn test_short_buffer() {
        let result = decode(&[0u8; 10]);
        assert!(matches!(result, Err(TklError::MalformedInput { .. })));
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = tkl_file(0, &[]);
        bytes[0] = b'X';
        assert!(matches!(
            decode(&bytes),
            Err(TklError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_bad_version() {
        let mut bytes = tkl_file(0, &[]);
        bytes[4] = 9;
        assert!(matches!(
            decode(&bytes),
            Err(TklError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_bad_checksum() {
        let mut bytes = tkl_file(0, &[]);
        bytes[HEADER_LEN] ^= 0xff; // corrupt the lap count
        assert!(matches!(
            decode(&bytes),
            Err(TklError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_truncated_record() {
        let mut bytes = tkl_file(0, &[point_record(0)]);
        bytes.truncate(bytes.len() - 5);
        match decode(&bytes) {
            Err(TklError::TruncatedRecord {
                trailing,
                record_size,
            }) => {
                assert_eq!(trailing, RECORD_LEN - 5);
                assert_eq!(record_size, RECORD_LEN);
            }
            other => panic!("expected TruncatedRecord, got {other:?}"),
        }
    }
}
