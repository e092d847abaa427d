pub mod design;
pub mod types;

pub use design::{
    approximate_design, design_datetime, resolve_design, DesignPositions, EphemerisError,
    EphemerisSource, StaticEphemeris, DESIGN_OFFSET_DAYS, MAX_DESIGN_OFFSET_DAYS,
};
pub use types::{
    GeoLocation, Planet, PlanetSet, PlanetaryPosition, ACTIVATION_ORDER, MAIN_PLANETS,
};
