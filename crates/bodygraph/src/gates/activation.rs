use crate::ephemeris::{Planet, PlanetSet, ACTIVATION_ORDER};
use crate::error::ChartError;
use crate::gates::wheel::{gate_line, WheelAlignment};
use crate::util::normalize_degrees;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A planet's gate and line in one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateActivation {
    pub planet: Planet,
    pub gate: u8,
    pub line: u8,
    pub longitude: f64,
}

impl GateActivation {
    pub fn from_longitude(planet: Planet, longitude: f64, alignment: WheelAlignment) -> Self {
        let gl = gate_line(longitude, alignment);
        Self {
            planet,
            gate: gl.gate,
            line: gl.line,
            longitude: normalize_degrees(longitude),
        }
    }

    /// "gate.line" notation, e.g. "34.3".
    pub fn label(&self) -> String {
        format!("{}.{}", self.gate, self.line)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub alignment: WheelAlignment,
    pub include_nodes: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            alignment: WheelAlignment::AriesZero,
            include_nodes: true,
        }
    }
}

/// Extract activations from a raw JSON `planet -> {longitude}` mapping.
pub fn extract_activations(
    value: &Value,
    options: ExtractOptions,
) -> Result<Vec<GateActivation>, ChartError> {
    let positions = PlanetSet::from_json(value)?;
    activations_from_set(&positions, options)
}

/// Compute one activation per available planet, in activation order.
///
/// Sun and Moon are mandatory. Earth is always the point opposite the Sun
/// and the South Node the point opposite the North Node when not supplied.
pub fn activations_from_set(
    positions: &PlanetSet,
    options: ExtractOptions,
) -> Result<Vec<GateActivation>, ChartError> {
    let sun = positions.longitude(Planet::Sun).ok_or_else(|| {
        ChartError::MissingField("Sun longitude is missing or not numeric".to_string())
    })?;
    if positions.longitude(Planet::Moon).is_none() {
        return Err(ChartError::MissingField(
            "Moon longitude is missing or not numeric".to_string(),
        ));
    }

    let mut activations = Vec::with_capacity(ACTIVATION_ORDER.len());
    for planet in ACTIVATION_ORDER {
        let longitude = match planet {
            Planet::Earth => Some(sun + 180.0),
            Planet::NorthNode | Planet::SouthNode if !options.include_nodes => continue,
            Planet::SouthNode => positions
                .longitude(Planet::SouthNode)
                .or_else(|| positions.longitude(Planet::NorthNode).map(|n| n + 180.0)),
            _ => positions.longitude(planet),
        };

        match longitude {
            Some(lon) => {
                activations.push(GateActivation::from_longitude(planet, lon, options.alignment))
            }
            None => log::warn!("No longitude for {}; skipping activation", planet),
        }
    }

    Ok(activations)
}

/// The activation for `planet`, if present.
pub fn find_activation(activations: &[GateActivation], planet: Planet) -> Option<&GateActivation> {
    activations.iter().find(|a| a.planet == planet)
}
