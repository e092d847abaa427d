//! Design ("unconscious") chart timing.
//!
//! The design chart is cast for the moment the Sun stood ~88° behind its
//! birth position, which on average is 88.736 days before birth.

use crate::ephemeris::types::{GeoLocation, Planet, PlanetSet, PlanetaryPosition};
use crate::error::ChartError;
use crate::util::normalize_degrees;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mean solar-arc offset between birth and design time, in days.
pub const DESIGN_OFFSET_DAYS: f64 = 88.736;

/// Largest accepted design offset, one year.
pub const MAX_DESIGN_OFFSET_DAYS: f64 = 366.0;

/// Errors that can occur while fetching positions from an ephemeris.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("No positions available for {datetime}")]
    NoData { datetime: DateTime<Utc> },
    #[error("Ephemeris service unavailable: {message}")]
    Unavailable { message: String },
    #[error("Failed to calculate position for {planet} at {datetime}: {message}")]
    CalculationFailed {
        planet: Planet,
        datetime: DateTime<Utc>,
        message: String,
    },
}

/// Anything that can produce planetary positions for a UTC instant.
pub trait EphemerisSource {
    fn positions_at(
        &self,
        datetime: DateTime<Utc>,
        location: Option<GeoLocation>,
    ) -> Result<PlanetSet, EphemerisError>;
}

/// Ephemeris backed by positions supplied up front, keyed by instant.
#[derive(Debug, Clone, Default)]
pub struct StaticEphemeris {
    tables: BTreeMap<DateTime<Utc>, PlanetSet>,
}

impl StaticEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, datetime: DateTime<Utc>, positions: PlanetSet) {
        self.tables.insert(datetime, positions);
    }

    pub fn with(mut self, datetime: DateTime<Utc>, positions: PlanetSet) -> Self {
        self.insert(datetime, positions);
        self
    }
}

impl EphemerisSource for StaticEphemeris {
    fn positions_at(
        &self,
        datetime: DateTime<Utc>,
        _location: Option<GeoLocation>,
    ) -> Result<PlanetSet, EphemerisError> {
        // Design instants come from fractional-day arithmetic, so match to the minute.
        self.tables
            .iter()
            .find(|(at, _)| (**at - datetime).num_seconds().abs() < 60)
            .map(|(_, set)| set.clone())
            .ok_or(EphemerisError::NoData { datetime })
    }
}

/// Design positions plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPositions {
    pub datetime: DateTime<Utc>,
    pub positions: PlanetSet,
    /// True when the positions were synthesized from mean daily motion.
    pub approximated: bool,
}

/// Birth instant minus `offset_days`.
///
/// Fails when the offset is not in `(0, MAX_DESIGN_OFFSET_DAYS]` or the
/// result falls outside the representable calendar.
pub fn design_datetime(birth_utc: DateTime<Utc>, offset_days: f64) -> Result<DateTime<Utc>, ChartError> {
    if !(offset_days.is_finite() && offset_days > 0.0 && offset_days <= MAX_DESIGN_OFFSET_DAYS) {
        return Err(ChartError::invalid(
            "design_offset_days",
            format!("must be in (0, {}], got {}", MAX_DESIGN_OFFSET_DAYS, offset_days),
        ));
    }
    let offset_ms = (offset_days * 86_400_000.0).round() as i64;
    birth_utc
        .checked_sub_signed(Duration::milliseconds(offset_ms))
        .ok_or_else(|| ChartError::invalid("birth_date", "design time is out of range"))
}

/// Walk every personality position back by its mean daily motion.
///
/// Retrograde flags are dropped: mean motion carries no station information.
pub fn approximate_design(personality: &PlanetSet, offset_days: f64) -> PlanetSet {
    let mut design = PlanetSet::new();
    for position in personality.iter() {
        let shift = position.planet.mean_daily_motion() * offset_days;
        design.insert(PlanetaryPosition {
            planet: position.planet,
            longitude: normalize_degrees(position.longitude - shift),
            latitude: position.latitude,
            distance: position.distance,
            retrograde: false,
        });
    }
    design
}

/// Fetch design positions from `source`, falling back to the mean-motion
/// approximation when the source is missing, fails, or lacks the Sun or Moon.
pub fn resolve_design(
    source: Option<&dyn EphemerisSource>,
    birth_utc: DateTime<Utc>,
    location: Option<GeoLocation>,
    personality: &PlanetSet,
    offset_days: f64,
) -> Result<DesignPositions, ChartError> {
    let datetime = design_datetime(birth_utc, offset_days)?;

    if let Some(source) = source {
        match source.positions_at(datetime, location) {
            Ok(positions)
                if positions.get(Planet::Sun).is_some() && positions.get(Planet::Moon).is_some() =>
            {
                return Ok(DesignPositions {
                    datetime,
                    positions,
                    approximated: false,
                });
            }
            Ok(_) => log::warn!(
                "Ephemeris returned no Sun or Moon for design time {}; approximating",
                datetime
            ),
            Err(e) => log::warn!("Ephemeris lookup failed for design time: {}; approximating", e),
        }
    }

    Ok(DesignPositions {
        datetime,
        positions: approximate_design(personality, offset_days),
        approximated: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_design_datetime_offset() {
        let birth = Utc.with_ymd_and_hms(1990, 6, 15, 12, 0, 0).unwrap();
        let design = design_datetime(birth, DESIGN_OFFSET_DAYS).unwrap();
        let days = (birth - design).num_seconds() as f64 / 86_400.0;
        assert!((days - DESIGN_OFFSET_DAYS).abs() < 1e-6);
    }

    #[test]
    fn test_approximate_design_moves_sun_about_88_degrees() {
        let personality = PlanetSet::new().with(Planet::Sun, 10.0).with(Planet::NorthNode, 100.0);
        let design = approximate_design(&personality, DESIGN_OFFSET_DAYS);
        let sun = design.longitude(Planet::Sun).unwrap();
        assert!((normalize_degrees(10.0 - sun) - 87.46).abs() < 0.1);
        // Nodes move backwards, so the design node sits ahead of the birth node.
        assert!(design.longitude(Planet::NorthNode).unwrap() > 100.0);
    }

    #[test]
    fn test_resolve_design_prefers_source() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let fetched = PlanetSet::new().with(Planet::Sun, 192.0).with(Planet::Moon, 5.0);
        let at = design_datetime(birth, DESIGN_OFFSET_DAYS).unwrap();
        let source = StaticEphemeris::new().with(at, fetched.clone());
        let personality = PlanetSet::new().with(Planet::Sun, 280.0);

        let design = resolve_design(Some(&source), birth, None, &personality, DESIGN_OFFSET_DAYS).unwrap();
        assert!(!design.approximated);
        assert_eq!(design.positions, fetched);
    }

    #[test]
    fn test_resolve_design_falls_back() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let source = StaticEphemeris::new();
        let personality = PlanetSet::new().with(Planet::Sun, 280.0);

        let design = resolve_design(Some(&source), birth, None, &personality, DESIGN_OFFSET_DAYS).unwrap();
        assert!(design.approximated);
        assert!(design.positions.get(Planet::Sun).is_some());
    }

    #[test]
    fn test_resolve_design_needs_sun_and_moon() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        let at = design_datetime(birth, DESIGN_OFFSET_DAYS).unwrap();
        let source = StaticEphemeris::new().with(at, PlanetSet::new().with(Planet::Sun, 192.0));
        let personality = PlanetSet::new().with(Planet::Sun, 280.0).with(Planet::Moon, 40.0);

        let design = resolve_design(Some(&source), birth, None, &personality, DESIGN_OFFSET_DAYS).unwrap();
        assert!(design.approximated);
        assert!(design.positions.get(Planet::Moon).is_some());
    }

    #[test]
    fn test_design_datetime_rejects_bad_offsets() {
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
        for offset in [0.0, -1.0, f64::NAN, f64::INFINITY, 1e12] {
            assert!(matches!(
                design_datetime(birth, offset),
                Err(ChartError::InvalidFieldValue { ref field, .. }) if field == "design_offset_days"
            ));
        }
    }

    #[test]
    fn test_design_datetime_at_calendar_start() {
        let earliest = DateTime::<Utc>::MIN_UTC;
        assert!(matches!(
            design_datetime(earliest, DESIGN_OFFSET_DAYS),
            Err(ChartError::InvalidFieldValue { ref field, .. }) if field == "birth_date"
        ));
    }
}
