//! Human Design bodygraph and natal chart computation.
//!
//! Planetary longitudes go in; gates, centers, channels, type, authority,
//! profile, western placements, aspects, numerology and the Chinese zodiac
//! come out. The same inputs always produce the same chart.

pub mod api;
pub mod aspects;
pub mod blueprint;
pub mod centers;
pub mod chinese;
pub mod ephemeris;
pub mod error;
pub mod gates;
pub mod jobs;
pub mod numerology;
pub mod util;
pub mod western;

pub use api::{handle_request, process_request, respond, ApiResponse, RequestError};
pub use blueprint::{
    build_blueprint, human_design, Blueprint, BlueprintRequest, BlueprintSettings,
    CelestialData, HumanDesignChart,
};
pub use error::ChartError;
