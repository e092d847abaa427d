use crate::aspects::types::{Aspect, AspectKind, AspectSettings, ALL_ASPECTS};
use crate::ephemeris::{Planet, PlanetSet, PlanetaryPosition, MAIN_PLANETS};
use crate::util::{angular_separation, signed_delta};

/// Orbs per planet, columns in `ALL_ASPECTS` order:
/// conjunction, semisextile, sextile, square, trine, quincunx, opposition.
static ORB_TABLE: [(Planet, [f64; 7]); 10] = [
    (Planet::Sun, [10.0, 3.0, 6.0, 8.0, 8.0, 3.0, 10.0]),
    (Planet::Moon, [10.0, 3.0, 6.0, 8.0, 8.0, 3.0, 10.0]),
    (Planet::Mercury, [7.0, 2.0, 5.0, 6.0, 6.0, 2.0, 7.0]),
    (Planet::Venus, [7.0, 2.0, 5.0, 6.0, 6.0, 2.0, 7.0]),
    (Planet::Mars, [7.0, 2.0, 5.0, 6.0, 6.0, 2.0, 7.0]),
    (Planet::Jupiter, [6.0, 2.0, 4.0, 5.0, 5.0, 2.0, 6.0]),
    (Planet::Saturn, [6.0, 2.0, 4.0, 5.0, 5.0, 2.0, 6.0]),
    (Planet::Uranus, [5.0, 1.5, 3.0, 4.0, 4.0, 1.5, 5.0]),
    (Planet::Neptune, [5.0, 1.5, 3.0, 4.0, 4.0, 1.5, 5.0]),
    (Planet::Pluto, [5.0, 1.5, 3.0, 4.0, 4.0, 1.5, 5.0]),
];

/// Fallback for bodies outside the table (nodes, Earth).
static DEFAULT_ORBS: [f64; 7] = [5.0, 1.5, 3.0, 4.0, 4.0, 1.5, 5.0];

/// Aspect calculator
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    settings: AspectSettings,
}

impl AspectCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AspectSettings) -> Self {
        Self { settings }
    }

    /// Orb allowed for `kind` between two planets: the mean of their table orbs.
    pub fn orb_for(&self, a: Planet, b: Planet, kind: AspectKind) -> f64 {
        let column = kind.column();
        (planet_orbs(a)[column] + planet_orbs(b)[column]) / 2.0 * self.settings.orb_scale
    }

    /// All aspects among the main planets, tightest first.
    pub fn compute(&self, positions: &PlanetSet) -> Vec<Aspect> {
        let bodies: Vec<&PlanetaryPosition> = MAIN_PLANETS
            .iter()
            .filter_map(|p| positions.get(*p))
            .filter(|p| p.longitude.is_finite())
            .collect();

        let mut aspects = Vec::new();
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if let Some(aspect) = self.calculate_aspect(bodies[i], bodies[j]) {
                    aspects.push(aspect);
                }
            }
        }

        aspects.sort_by(|a, b| a.orb.total_cmp(&b.orb));
        aspects
    }

    /// Tightest aspect between two positions, if any falls within orb.
    pub fn calculate_aspect(&self, a: &PlanetaryPosition, b: &PlanetaryPosition) -> Option<Aspect> {
        if !a.longitude.is_finite() || !b.longitude.is_finite() {
            return None;
        }
        let separation = angular_separation(a.longitude, b.longitude);

        let (kind, orb, allowed_orb) = ALL_ASPECTS
            .iter()
            .filter(|k| self.settings.include_minor || k.is_major())
            .filter_map(|kind| {
                let allowed = self.orb_for(a.planet, b.planet, *kind);
                let orb = (separation - kind.angle()).abs();
                (orb <= allowed).then_some((*kind, orb, allowed))
            })
            .min_by(|x, y| x.1.total_cmp(&y.1))?;

        let strength = if allowed_orb > 0.0 {
            (100.0 * (1.0 - orb / allowed_orb)).round().clamp(0.0, 100.0) as u8
        } else {
            100
        };

        Some(Aspect {
            from: a.planet,
            to: b.planet,
            kind,
            exact_angle: kind.angle(),
            separation,
            orb,
            allowed_orb,
            strength,
            is_applying: is_applying(a, b, kind.angle()),
        })
    }
}

fn planet_orbs(planet: Planet) -> &'static [f64; 7] {
    ORB_TABLE
        .iter()
        .find(|(p, _)| *p == planet)
        .map(|(_, orbs)| orbs)
        .unwrap_or(&DEFAULT_ORBS)
}

/// Applying when the faster body is closing on the exact angle.
///
/// The faster body (by mean daily motion) moves forward through the zodiac,
/// shrinking its signed lead on the slower body; a retrograde faster body
/// reverses that.
fn is_applying(a: &PlanetaryPosition, b: &PlanetaryPosition, aspect_angle: f64) -> bool {
    let (fast, slow) = if a.planet.mean_daily_motion().abs() >= b.planet.mean_daily_motion().abs() {
        (a, b)
    } else {
        (b, a)
    };

    // Positive when the slow body is ahead of the fast one.
    let delta = signed_delta(fast.longitude, slow.longitude);
    let separation = delta.abs();

    let closing = if delta > 0.0 {
        separation > aspect_angle
    } else {
        separation < aspect_angle
    };
    closing != fast.retrograde
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(planet: Planet, lon: f64) -> PlanetaryPosition {
        PlanetaryPosition::at(planet, lon)
    }

    #[test]
    fn test_calculate_aspect_conjunction() {
        let calc = AspectCalculator::new();
        let aspect = calc.calculate_aspect(&pos(Planet::Sun, 100.0), &pos(Planet::Moon, 102.0)).unwrap();
        assert_eq!(aspect.kind, AspectKind::Conjunction);
        assert_eq!(aspect.orb, 2.0);
        assert_eq!(aspect.strength, 80);
    }

    #[test]
    fn test_calculate_aspect_wraparound_opposition() {
        let calc = AspectCalculator::new();
        let aspect = calc.calculate_aspect(&pos(Planet::Mars, 355.0), &pos(Planet::Saturn, 177.0)).unwrap();
        assert_eq!(aspect.kind, AspectKind::Opposition);
        assert!((aspect.separation - 178.0).abs() < 1e-9);
    }

    #[test]
    fn test_minor_aspects_can_be_disabled() {
        let a = pos(Planet::Sun, 0.0);
        let b = pos(Planet::Moon, 150.5);
        assert_eq!(
            AspectCalculator::new().calculate_aspect(&a, &b).map(|x| x.kind),
            Some(AspectKind::Quincunx)
        );
        let majors = AspectCalculator::with_settings(AspectSettings { include_minor: false, ..Default::default() });
        assert!(majors.calculate_aspect(&a, &b).is_none());
    }

    #[test]
    fn test_applying_and_separating() {
        // Moon behind the Sun, closing into conjunction.
        assert!(is_applying(&pos(Planet::Sun, 100.0), &pos(Planet::Moon, 97.0), 0.0));
        // Moon past the Sun.
        assert!(!is_applying(&pos(Planet::Sun, 100.0), &pos(Planet::Moon, 103.0), 0.0));
        // Moon 95° behind Saturn closes toward the square; 85° behind it has passed.
        assert!(is_applying(&pos(Planet::Moon, 5.0), &pos(Planet::Saturn, 100.0), 90.0));
        assert!(!is_applying(&pos(Planet::Moon, 15.0), &pos(Planet::Saturn, 100.0), 90.0));
        let mut retro = pos(Planet::Mercury, 97.0);
        retro.retrograde = true;
        assert!(!is_applying(&retro, &pos(Planet::Jupiter, 100.0), 0.0));
    }
}
