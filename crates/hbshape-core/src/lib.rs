//! hbshape core: the types every shaping backend speaks
//!
//! Text goes in as a UTF-8 string, glyph positions come out. Everything in
//! between (font parsing, OpenType layout, bidi, ligatures) belongs to the
//! native engines a backend wraps. This crate only holds what the backends
//! and their callers share:
//!
//! - [`types`] - glyph position records and the unit modes they come in
//! - [`config`] - how a shaper is configured
//! - [`error`] - what can go wrong
//! - [`traits::Shaper`] - the backend contract
//!
//! ## Units
//!
//! Engines report positions in 26.6 fixed point (64 units per pixel). A
//! shaper either divides by 64 ([`types::Units::Pixels`]) or hands the raw
//! values through ([`types::Units::FixedPoint`]):
//!
//! ```
//! use hbshape_core::types::{GlyphPos, Units};
//!
//! let px = GlyphPos::from_fixed(640, 0, 32, -64, Units::Pixels);
//! assert_eq!(px.x_advance, 10.0);
//! assert_eq!(px.x_offset, 0.5);
//!
//! let raw = GlyphPos::from_fixed(640, 0, 32, -64, Units::FixedPoint);
//! assert_eq!(raw.x_advance, 640.0);
//! ```

use std::path::PathBuf;

pub mod config;
pub mod error;
pub mod traits;

pub use config::ShaperConfig;
pub use error::{HbShapeError, Result};
pub use traits::Shaper;

/// The data structures shared by every backend
pub mod types {
    use std::fmt;
    use std::str::FromStr;

    #[cfg(feature = "serde")]
    use serde::{Deserialize, Serialize};

    /// Unique identifier for a glyph within a font
    pub type GlyphId = u32;

    /// Engine units per pixel in 26.6 fixed point
    pub const FIXED_POINT_SCALE: f64 = 64.0;

    /// How sizes are handed to the engine and how positions come back
    ///
    /// `Pixels` multiplies the requested size by 64 before setting it on the
    /// face and divides every reported position by 64. `FixedPoint` passes the
    /// size through as a 26.6 value and reports positions untouched.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
    pub enum Units {
        #[default]
        Pixels,
        #[cfg_attr(feature = "serde", serde(rename = "fixed"))]
        FixedPoint,
    }

    impl Units {
        /// Convert one engine value into this unit mode
        pub fn convert(self, raw: impl Into<i64>) -> f64 {
            let raw = raw.into() as f64;
            match self {
                Units::Pixels => raw / FIXED_POINT_SCALE,
                Units::FixedPoint => raw,
            }
        }

        /// Nominal char size in engine units for a requested `size`
        ///
        /// Returns `None` on overflow.
        pub fn char_size(self, size: u32) -> Option<isize> {
            let size = isize::try_from(size).ok()?;
            match self {
                Units::Pixels => size.checked_mul(64),
                Units::FixedPoint => Some(size),
            }
        }
    }

    impl fmt::Display for Units {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(match self {
                Units::Pixels => "pixels",
                Units::FixedPoint => "fixed",
            })
        }
    }

    impl FromStr for Units {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "pixels" | "px" | "pixel" => Ok(Units::Pixels),
                "fixed" | "fixed-point" | "26.6" | "raw" => Ok(Units::FixedPoint),
                other => Err(format!("unknown unit mode '{other}' (expected pixels or fixed)")),
            }
        }
    }

    /// Advance and offset of one shaped glyph
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct GlyphPos {
        pub x_advance: f64,
        pub y_advance: f64,
        pub x_offset: f64,
        pub y_offset: f64,
    }

    impl GlyphPos {
        /// Build a record from raw 26.6 engine values
        pub fn from_fixed(
            x_advance: i32,
            y_advance: i32,
            x_offset: i32,
            y_offset: i32,
            units: Units,
        ) -> Self {
            Self {
                x_advance: units.convert(x_advance),
                y_advance: units.convert(y_advance),
                x_offset: units.convert(x_offset),
                y_offset: units.convert(y_offset),
            }
        }
    }

    /// A glyph that knows which glyph it is, where it came from, and where it goes
    #[derive(Debug, Clone, Copy, PartialEq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct ShapedGlyph {
        pub id: GlyphId,
        /// Byte offset of the source cluster in the input text
        pub cluster: u32,
        pub pos: GlyphPos,
    }

    /// Face-wide numbers at the configured size
    #[derive(Debug, Clone, PartialEq)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct FaceMetrics {
        pub family_name: Option<String>,
        pub style_name: Option<String>,
        pub units_per_em: u16,
        pub glyph_count: u32,
        pub x_ppem: u16,
        pub y_ppem: u16,
        pub ascender: f64,
        pub descender: f64,
        pub height: f64,
        pub max_advance: f64,
    }

    /// Total horizontal and vertical advance of a run of positions
    pub fn total_advance(positions: &[GlyphPos]) -> (f64, f64) {
        positions.iter().fold((0.0, 0.0), |(x, y), pos| {
            (x + pos.x_advance, y + pos.y_advance)
        })
    }
}

/// Where a font program comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// Font program bytes held in memory
    Bytes(Vec<u8>),
    /// Font file on disk, opened by the engine
    Path(PathBuf),
}

impl FontSource {
    /// Short description for logs
    pub fn describe(&self) -> String {
        match self {
            FontSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
            FontSource::Path(path) => path.display().to_string(),
        }
    }
}

impl From<Vec<u8>> for FontSource {
    fn from(bytes: Vec<u8>) -> Self {
        FontSource::Bytes(bytes)
    }
}

impl From<&[u8]> for FontSource {
    fn from(bytes: &[u8]) -> Self {
        FontSource::Bytes(bytes.to_vec())
    }
}

impl From<PathBuf> for FontSource {
    fn from(path: PathBuf) -> Self {
        FontSource::Path(path)
    }
}

impl From<&std::path::Path> for FontSource {
    fn from(path: &std::path::Path) -> Self {
        FontSource::Path(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;

    #[test]
    fn test_unit_conversion_of_fixed_advance() {
        let scaled = GlyphPos::from_fixed(640, 0, 0, 0, Units::Pixels);
        assert_eq!(scaled.x_advance, 10.0);

        let raw = GlyphPos::from_fixed(640, 0, 0, 0, Units::FixedPoint);
        assert_eq!(raw.x_advance, 640.0);
    }

    #[test]
    fn test_negative_offsets_convert() {
        let pos = GlyphPos::from_fixed(0, -128, -32, 96, Units::Pixels);
        assert_eq!(pos.y_advance, -2.0);
        assert_eq!(pos.x_offset, -0.5);
        assert_eq!(pos.y_offset, 1.5);
    }

    #[test]
    fn test_char_size_by_units() {
        assert_eq!(Units::Pixels.char_size(12), Some(768));
        assert_eq!(Units::FixedPoint.char_size(12), Some(12));
    }

    #[test]
    fn test_units_parse_and_display() {
        assert_eq!("pixels".parse::<Units>(), Ok(Units::Pixels));
        assert_eq!("FIXED".parse::<Units>(), Ok(Units::FixedPoint));
        assert!("points".parse::<Units>().is_err());
        assert_eq!(Units::FixedPoint.to_string(), "fixed");
        assert_eq!(Units::Pixels.to_string().parse::<Units>(), Ok(Units::Pixels));
    }

    #[test]
    fn test_total_advance() {
        let run = [
            GlyphPos::from_fixed(640, 0, 0, 0, Units::Pixels),
            GlyphPos::from_fixed(320, 64, 0, 0, Units::Pixels),
        ];
        assert_eq!(total_advance(&run), (15.0, 1.0));
        assert_eq!(total_advance(&[]), (0.0, 0.0));
    }

    #[test]
    fn test_font_source_describe() {
        let bytes = FontSource::from(vec![0u8; 12]);
        assert_eq!(bytes.describe(), "<12 bytes>");

        let path = FontSource::from(PathBuf::from("/tmp/font.ttf"));
        assert_eq!(path.describe(), "/tmp/font.ttf");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_units_serde_names_match_display() {
        for units in [Units::Pixels, Units::FixedPoint] {
            let json = serde_json::to_string(&units).unwrap();
            assert_eq!(json, format!("\"{units}\""));
            assert_eq!(json.trim_matches('"').parse::<Units>(), Ok(units));
            assert_eq!(serde_json::from_str::<Units>(&json).unwrap(), units);
        }
    }
}
