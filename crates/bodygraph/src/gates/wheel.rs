//! The 64-gate wheel.
//!
//! Each gate spans 5°37'30" (360/64) of ecliptic longitude and is divided
//! into 6 lines of 56'15". The gates run in the Rave I Ching order, not
//! numerically.

use crate::util::normalize_degrees;
use serde::{Deserialize, Serialize};

pub const GATE_ARC: f64 = 360.0 / 64.0;
pub const LINE_ARC: f64 = GATE_ARC / 6.0;

/// Longitude at which gate 41 opens on the traditional mandala.
pub const MANDALA_START: f64 = 302.0;

/// Gate wheel indexed from 0° Aries in `GATE_ARC` steps.
pub const GATE_WHEEL: [u8; 64] = [
    25, 17, 21, 51, 42, 3, 27, 24, 2, 23, 8, 20, 16, 35, 45, 12, //
    15, 52, 39, 53, 62, 56, 31, 33, 7, 4, 29, 59, 40, 64, 47, 6, //
    46, 18, 48, 57, 32, 50, 28, 44, 1, 43, 14, 34, 9, 5, 26, 11, //
    10, 58, 38, 54, 61, 60, 41, 19, 13, 49, 30, 55, 37, 63, 22, 36,
];

/// Wheel slot holding gate 41.
const MANDALA_START_INDEX: usize = 54;

/// Where the wheel is anchored on the ecliptic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelAlignment {
    /// Slot 0 starts exactly at 0° Aries.
    #[default]
    AriesZero,
    /// Gate 41 starts at 2° Aquarius (302°).
    Mandala,
}

/// Gate and line for a single longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateLine {
    pub gate: u8,
    pub line: u8,
}

impl std::fmt::Display for GateLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.gate, self.line)
    }
}

/// Map a longitude (any real number) to its gate and line.
pub fn gate_line(longitude: f64, alignment: WheelAlignment) -> GateLine {
    let lon = normalize_degrees(longitude);
    let (offset, start_index) = match alignment {
        WheelAlignment::AriesZero => (lon, 0),
        WheelAlignment::Mandala => (normalize_degrees(lon - MANDALA_START), MANDALA_START_INDEX),
    };

    let slot = ((offset / GATE_ARC).floor() as usize).min(GATE_WHEEL.len() - 1);
    let within = (offset - slot as f64 * GATE_ARC).max(0.0);
    let line = ((within / LINE_ARC).floor() as i64 + 1).clamp(1, 6) as u8;

    GateLine {
        gate: GATE_WHEEL[(slot + start_index) % GATE_WHEEL.len()],
        line,
    }
}

/// Gate containing `longitude` on the default wheel.
pub fn gate_for_longitude(longitude: f64) -> u8 {
    gate_line(longitude, WheelAlignment::AriesZero).gate
}

/// Line (1-6) of `longitude` on the default wheel.
pub fn line_for_longitude(longitude: f64) -> u8 {
    gate_line(longitude, WheelAlignment::AriesZero).line
}

/// Start longitude of a gate on the given wheel.
pub fn gate_start(gate: u8, alignment: WheelAlignment) -> Option<f64> {
    let slot = GATE_WHEEL.iter().position(|g| *g == gate)?;
    let start = slot as f64 * GATE_ARC;
    Some(match alignment {
        WheelAlignment::AriesZero => start,
        WheelAlignment::Mandala => {
            let rotated = (slot + GATE_WHEEL.len() - MANDALA_START_INDEX) % GATE_WHEEL.len();
            normalize_degrees(MANDALA_START + rotated as f64 * GATE_ARC)
        }
    })
}
