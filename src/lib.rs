//! # tkl2gpx
//!
//! Converter from the proprietary TKL binary track-log format, produced by
//! certain wrist GPS sport watches, to GPX 1.1.
//!
//! This library provides:
//! - a pure binary decoder for `.tkl` files (header, checksummed session
//!   summary, fixed-size track-point records)
//! - pause-aware GPX rendering with Garmin TrackPointExtension heart rates
//! - batch conversion that mirrors the input directory structure
//!
//! ## Quick Start
//!
//! ```rust
//! use tkl2gpx::{render_gpx, GpxConfig, SessionSummary, TrackLog};
//!
//! let log = TrackLog {
//!     summary: SessionSummary::default(),
//!     points: Vec::new(),
//!     has_hr: false,
//! };
//!
//! let xml = render_gpx(&log, "workout.tkl.gpx", &GpxConfig::default()).unwrap();
//! assert!(String::from_utf8(xml).unwrap().contains("<trk/>"));
//! ```
//!
//! Decoding real files goes through [`tkl::decode`] for in-memory buffers or
//! [`convert::run`] for whole files and directories.

// Unified error handling
pub mod error;
pub use error::{Result, TklError};

// Decoded data model
pub mod types;
pub use types::{SessionSummary, TrackLog, TrackPoint};

// Binary TKL decoding
pub mod tkl;
pub use tkl::{decode, decode_with_options, DecodeOptions};

// Decimal half-up rounding (hard output contract)
pub mod rounding;
pub use rounding::format_half_up;

// Session summary description text
pub mod summary;
pub use summary::format_summary;

// Pause segmentation
pub mod segment;
pub use segment::{split_on_pauses, DEFAULT_PAUSE_THRESHOLD_MS};

// GPX 1.1 rendering
pub mod gpx;
pub use gpx::{render_gpx, GpxConfig, CREATOR};

// Batch conversion and path mirroring
pub mod convert;
pub use convert::{
    convert_file, output_path_for, run, ConvertConfig, ConvertedFile, ErrorPolicy, FileReport,
    RunReport,
};
