//! Shaper configuration
//!
//! A [`ShaperConfig`] picks the unit mode and the face index. The default unit
//! mode is [`Units::Pixels`] and can be switched process-wide with the
//! `HBSHAPE_UNITS` environment variable or at runtime via
//! [`set_default_units`].
//!
//! # Example
//!
//! ```
//! use hbshape_core::config::{self, ShaperConfig};
//! use hbshape_core::types::Units;
//!
//! config::set_default_units(Units::FixedPoint);
//! assert_eq!(ShaperConfig::default().units, Units::FixedPoint);
//!
//! config::set_default_units(Units::Pixels);
//! ```
//!
//! # Environment Variable
//!
//! ```bash
//! HBSHAPE_UNITS=fixed ./my_app
//! ```

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use crate::types::Units;

/// Name of the environment variable consulted on first use
pub const UNITS_ENV: &str = "HBSHAPE_UNITS";

const PIXELS: u8 = 0;
const FIXED_POINT: u8 = 1;

/// Process-wide default unit mode
static DEFAULT_UNITS: AtomicU8 = AtomicU8::new(PIXELS);

/// Whether the env var has been checked
static ENV_CHECKED: OnceLock<()> = OnceLock::new();

fn check_env() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var(UNITS_ENV) {
            match val.parse::<Units>() {
                Ok(units) => {
                    DEFAULT_UNITS.store(encode(units), Ordering::SeqCst);
                    log::info!("hbshape default units set to {units} via {UNITS_ENV}");
                },
                Err(err) => log::warn!("Ignoring {UNITS_ENV}: {err}"),
            }
        }
    });
}

fn encode(units: Units) -> u8 {
    match units {
        Units::Pixels => PIXELS,
        Units::FixedPoint => FIXED_POINT,
    }
}

/// Unit mode used by [`ShaperConfig::default`]
pub fn default_units() -> Units {
    check_env();
    match DEFAULT_UNITS.load(Ordering::SeqCst) {
        FIXED_POINT => Units::FixedPoint,
        _ => Units::Pixels,
    }
}

/// Override the default unit mode at runtime
///
/// Takes precedence over `HBSHAPE_UNITS`.
pub fn set_default_units(units: Units) {
    check_env();
    DEFAULT_UNITS.store(encode(units), Ordering::SeqCst);
    log::debug!("hbshape default units set to {units} via runtime call");
}

/// How a shaper is built and how it reports positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaperConfig {
    /// Size interpretation and output conversion
    pub units: Units,
    /// Face to open inside a collection (0 for single fonts)
    pub face_index: u32,
}

impl ShaperConfig {
    pub fn with_units(units: Units) -> Self {
        Self {
            units,
            ..Self::default()
        }
    }
}

impl Default for ShaperConfig {
    fn default() -> Self {
        Self {
            units: default_units(),
            face_index: 0,
        }
    }
}
