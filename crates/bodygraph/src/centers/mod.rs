pub mod aggregate;
pub mod analysis;
pub mod center;
pub mod channels;

pub use aggregate::{aggregate_centers, aggregate_gates, CenterMap, CenterState};
pub use analysis::{
    connected_groups, derive_authority, derive_cross, derive_definition, derive_profile,
    derive_type, Authority, CrossAngle, Definition, DefinitionMode, HdType, IncarnationCross,
    Profile,
};
pub use center::{Center, ALL_CENTERS};
pub use channels::{find_channel, Channel, CHANNELS};
