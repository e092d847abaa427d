use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Geographic location coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub lat: f64,
    pub lon: f64,
}

/// Bodies tracked by the chart, in activation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Planet {
    Sun,
    Earth,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    NorthNode,
    SouthNode,
}

/// Activation order used when extracting gates.
pub const ACTIVATION_ORDER: [Planet; 13] = [
    Planet::Sun,
    Planet::Earth,
    Planet::Moon,
    Planet::Mercury,
    Planet::Venus,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Uranus,
    Planet::Neptune,
    Planet::Pluto,
    Planet::NorthNode,
    Planet::SouthNode,
];

/// The ten classical bodies used for Western aspects.
pub const MAIN_PLANETS: [Planet; 10] = [
    Planet::Sun,
    Planet::Moon,
    Planet::Mercury,
    Planet::Venus,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Uranus,
    Planet::Neptune,
    Planet::Pluto,
];

impl Planet {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "Sun",
            Self::Earth => "Earth",
            Self::Moon => "Moon",
            Self::Mercury => "Mercury",
            Self::Venus => "Venus",
            Self::Mars => "Mars",
            Self::Jupiter => "Jupiter",
            Self::Saturn => "Saturn",
            Self::Uranus => "Uranus",
            Self::Neptune => "Neptune",
            Self::Pluto => "Pluto",
            Self::NorthNode => "North Node",
            Self::SouthNode => "South Node",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Earth => "earth",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
            Self::NorthNode => "north_node",
            Self::SouthNode => "south_node",
        }
    }

    /// Parse the loose planet keys ephemeris providers hand back
    /// ("Sun", "north_node", "NorthNode", "true_node", "rahu", ...).
    pub fn from_key(key: &str) -> Option<Self> {
        let folded: String = key
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "sun" => Some(Self::Sun),
            "earth" => Some(Self::Earth),
            "moon" => Some(Self::Moon),
            "mercury" => Some(Self::Mercury),
            "venus" => Some(Self::Venus),
            "mars" => Some(Self::Mars),
            "jupiter" => Some(Self::Jupiter),
            "saturn" => Some(Self::Saturn),
            "uranus" => Some(Self::Uranus),
            "neptune" => Some(Self::Neptune),
            "pluto" => Some(Self::Pluto),
            "northnode" | "truenode" | "meannode" | "node" | "rahu" => Some(Self::NorthNode),
            "southnode" | "ketu" => Some(Self::SouthNode),
            _ => None,
        }
    }

    /// Mean geocentric motion in degrees per day.
    pub const fn mean_daily_motion(self) -> f64 {
        match self {
            Self::Sun | Self::Earth => 0.985_647,
            Self::Moon => 13.176_358,
            Self::Mercury => 1.383,
            Self::Venus => 1.2,
            Self::Mars => 0.524,
            Self::Jupiter => 0.083_1,
            Self::Saturn => 0.033_5,
            Self::Uranus => 0.011_7,
            Self::Neptune => 0.006,
            Self::Pluto => 0.004,
            Self::NorthNode | Self::SouthNode => -0.052_95,
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Planetary position as returned by an ephemeris lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanetaryPosition {
    pub planet: Planet,
    /// Longitude in degrees (0-360)
    pub longitude: f64,
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: f64,
    /// Distance in AU
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub retrograde: bool,
}

impl PlanetaryPosition {
    pub fn at(planet: Planet, longitude: f64) -> Self {
        Self {
            planet,
            longitude,
            latitude: 0.0,
            distance: 0.0,
            retrograde: false,
        }
    }
}

/// One chart's worth of positions, keyed by planet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetSet {
    pub positions: BTreeMap<Planet, PlanetaryPosition>,
}

impl PlanetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, position: PlanetaryPosition) {
        self.positions.insert(position.planet, position);
    }

    pub fn with(mut self, planet: Planet, longitude: f64) -> Self {
        self.insert(PlanetaryPosition::at(planet, longitude));
        self
    }

    pub fn get(&self, planet: Planet) -> Option<&PlanetaryPosition> {
        self.positions.get(&planet)
    }

    pub fn longitude(&self, planet: Planet) -> Option<f64> {
        self.get(planet).map(|p| p.longitude)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlanetaryPosition> {
        self.positions.values()
    }

    /// Build a set from a JSON object of `planet -> {longitude, latitude, distance}`.
    ///
    /// Each entry may also be a bare number (longitude only). Entries with an
    /// unknown planet key or a non-numeric longitude are skipped; the caller
    /// decides which bodies are mandatory.
    pub fn from_json(value: &Value) -> Result<Self, ChartError> {
        let obj = value.as_object().ok_or_else(|| {
            ChartError::Validation("Planetary positions must be an object".to_string())
        })?;

        let mut set = PlanetSet::new();
        for (key, entry) in obj {
            let Some(planet) = Planet::from_key(key) else {
                log::debug!("Ignoring unknown body '{}' in positions", key);
                continue;
            };
            match parse_position(planet, entry) {
                Some(position) => set.insert(position),
                None => log::warn!("Skipping {}: longitude missing or not numeric", planet),
            }
        }
        Ok(set)
    }
}

fn parse_position(planet: Planet, entry: &Value) -> Option<PlanetaryPosition> {
    if let Some(lon) = entry.as_f64() {
        return finite(lon).map(|lon| PlanetaryPosition::at(planet, lon));
    }

    let obj = entry.as_object()?;
    let longitude = obj
        .get("longitude")
        .or_else(|| obj.get("lon"))
        .and_then(Value::as_f64)
        .and_then(finite)?;
    let number = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| obj.get(*k).and_then(Value::as_f64))
            .unwrap_or(0.0)
    };
    let speed = obj
        .get("speed")
        .or_else(|| obj.get("speed_lon"))
        .and_then(Value::as_f64);
    let retrograde = obj
        .get("retrograde")
        .and_then(Value::as_bool)
        .unwrap_or_else(|| speed.map(|s| s < 0.0).unwrap_or(false));

    Some(PlanetaryPosition {
        planet,
        longitude,
        latitude: number(&["latitude", "lat"]),
        distance: number(&["distance", "dist"]),
        retrograde,
    })
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
