//! Sun / Moon / Rising summary used by the blueprint report.

use crate::ephemeris::{Planet, PlanetSet};
use crate::error::ChartError;
use crate::western::zodiac::{sign_position, Element, Modality, ZodiacSign};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub sign: ZodiacSign,
    pub glyph: char,
    pub element: Element,
    pub modality: Modality,
    /// Traditional ruling planet, lowercase
    pub ruler: String,
    /// Degrees into the sign, rounded to 2 decimals
    pub degree: f64,
    pub longitude: f64,
}

impl Placement {
    pub fn from_longitude(longitude: f64) -> Self {
        let pos = sign_position(longitude);
        Self {
            sign: pos.sign,
            glyph: pos.sign.glyph(),
            element: pos.sign.element(),
            modality: pos.sign.modality(),
            ruler: pos.sign.ruler().to_string(),
            degree: (pos.degree_in_sign * 100.0).round() / 100.0,
            longitude: pos.longitude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WesternSummary {
    pub sun: Placement,
    pub moon: Placement,
    /// Present only when an ascendant longitude was supplied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rising: Option<Placement>,
}

pub fn summarize(positions: &PlanetSet, ascendant: Option<f64>) -> Result<WesternSummary, ChartError> {
    let sun = positions
        .longitude(Planet::Sun)
        .ok_or_else(|| ChartError::MissingField("sun.longitude".to_string()))?;
    let moon = positions
        .longitude(Planet::Moon)
        .ok_or_else(|| ChartError::MissingField("moon.longitude".to_string()))?;

    Ok(WesternSummary {
        sun: Placement::from_longitude(sun),
        moon: Placement::from_longitude(moon),
        rising: ascendant.filter(|a| a.is_finite()).map(Placement::from_longitude),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_without_ascendant() {
        let set = PlanetSet::new().with(Planet::Sun, 310.123).with(Planet::Moon, 345.0);
        let summary = summarize(&set, None).unwrap();
        assert_eq!(summary.sun.sign, ZodiacSign::Aquarius);
        assert_eq!(summary.sun.degree, 10.12);
        assert_eq!(summary.sun.ruler, "saturn");
        assert_eq!(summary.moon.sign, ZodiacSign::Pisces);
        assert_eq!(summary.moon.ruler, "jupiter");
        assert!(summary.rising.is_none());
    }

    #[test]
    fn test_summarize_requires_moon() {
        let set = PlanetSet::new().with(Planet::Sun, 10.0);
        assert_eq!(
            summarize(&set, Some(160.0)).unwrap_err(),
            ChartError::MissingField("moon.longitude".to_string())
        );
    }
}
