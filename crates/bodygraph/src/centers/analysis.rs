//! Type, authority, profile, definition and cross derived from a center map.

use crate::centers::aggregate::CenterMap;
use crate::centers::center::{Center, ALL_CENTERS};
use crate::ephemeris::Planet;
use crate::gates::{find_activation, GateActivation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

/// How center connectivity is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefinitionMode {
    /// Definition from the count of defined centers; type from direct channels.
    #[default]
    Banded,
    /// Definition from connected components; type from motor reachability.
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HdType {
    #[serde(rename = "Manifesting Generator")]
    ManifestingGenerator,
    Generator,
    Manifestor,
    Projector,
    Reflector,
}

impl HdType {
    pub const fn name(self) -> &'static str {
        match self {
            Self::ManifestingGenerator => "Manifesting Generator",
            Self::Generator => "Generator",
            Self::Manifestor => "Manifestor",
            Self::Projector => "Projector",
            Self::Reflector => "Reflector",
        }
    }

    pub const fn strategy(self) -> &'static str {
        match self {
            Self::ManifestingGenerator => "Wait to respond, then inform",
            Self::Generator => "Wait to respond",
            Self::Manifestor => "Inform",
            Self::Projector => "Wait for the invitation",
            Self::Reflector => "Wait a lunar cycle",
        }
    }

    pub const fn not_self_theme(self) -> &'static str {
        match self {
            Self::ManifestingGenerator => "Frustration and anger",
            Self::Generator => "Frustration",
            Self::Manifestor => "Anger",
            Self::Projector => "Bitterness",
            Self::Reflector => "Disappointment",
        }
    }

    pub const fn signature(self) -> &'static str {
        match self {
            Self::ManifestingGenerator | Self::Generator => "Satisfaction",
            Self::Manifestor => "Peace",
            Self::Projector => "Success",
            Self::Reflector => "Surprise",
        }
    }
}

impl fmt::Display for HdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Authority {
    Emotional,
    Sacral,
    Splenic,
    Ego,
    #[serde(rename = "Self-Projected")]
    SelfProjected,
    Mental,
    #[serde(rename = "Lunar (Reflector)")]
    Lunar,
    #[serde(rename = "None (Outer Authority)")]
    Outer,
}

impl Authority {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Emotional => "Emotional",
            Self::Sacral => "Sacral",
            Self::Splenic => "Splenic",
            Self::Ego => "Ego",
            Self::SelfProjected => "Self-Projected",
            Self::Mental => "Mental",
            Self::Lunar => "Lunar (Reflector)",
            Self::Outer => "None (Outer Authority)",
        }
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Definition {
    #[serde(rename = "No Definition")]
    None,
    Single,
    Split,
    #[serde(rename = "Triple Split")]
    TripleSplit,
    #[serde(rename = "Quadruple Split")]
    QuadrupleSplit,
}

impl Definition {
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "No Definition",
            Self::Single => "Single",
            Self::Split => "Split",
            Self::TripleSplit => "Triple Split",
            Self::QuadrupleSplit => "Quadruple Split",
        }
    }
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Motors that can make a Manifestor; the Sacral makes a Generator instead.
fn non_sacral_motor(center: &Center) -> bool {
    center.is_motor() && *center != Center::Sacral
}

/// Derive the type. Checks run from most to least specific.
pub fn derive_type(map: &CenterMap, mode: DefinitionMode) -> HdType {
    if map.defined_count() == 0 {
        return HdType::Reflector;
    }

    let sacral = map.is_defined(Center::Sacral);
    let throat = map.is_defined(Center::Throat);

    let (sacral_to_throat, motor_to_throat) = match mode {
        DefinitionMode::Banded => (
            map.has_channel(34, 20),
            ALL_CENTERS
                .iter()
                .filter(|c| non_sacral_motor(c))
                .any(|c| map.has_channel_between(*c, Center::Throat)),
        ),
        DefinitionMode::Connected => {
            let reach = reachable_from(map, Center::Throat);
            (
                reach.contains(&Center::Sacral),
                reach.iter().any(non_sacral_motor),
            )
        }
    };

    if sacral && throat && sacral_to_throat {
        HdType::ManifestingGenerator
    } else if throat && !sacral && motor_to_throat {
        HdType::Manifestor
    } else if sacral {
        HdType::Generator
    } else {
        HdType::Projector
    }
}

/// First defined center in the authority hierarchy wins.
pub fn derive_authority(map: &CenterMap) -> Authority {
    const HIERARCHY: [(Center, Authority); 6] = [
        (Center::SolarPlexus, Authority::Emotional),
        (Center::Sacral, Authority::Sacral),
        (Center::Spleen, Authority::Splenic),
        (Center::Heart, Authority::Ego),
        (Center::G, Authority::SelfProjected),
        (Center::Throat, Authority::Mental),
    ];

    if let Some((_, authority)) = HIERARCHY.iter().find(|(c, _)| map.is_defined(*c)) {
        return *authority;
    }
    if map.defined_count() == 0 {
        Authority::Lunar
    } else {
        Authority::Outer
    }
}

pub fn derive_definition(map: &CenterMap, mode: DefinitionMode) -> Definition {
    match mode {
        DefinitionMode::Banded => match map.defined_count() {
            0 => Definition::None,
            1..=3 => Definition::Single,
            4..=6 => Definition::Split,
            _ => Definition::TripleSplit,
        },
        DefinitionMode::Connected => match connected_groups(map).len() {
            0 => Definition::None,
            1 => Definition::Single,
            2 => Definition::Split,
            3 => Definition::TripleSplit,
            _ => Definition::QuadrupleSplit,
        },
    }
}

/// Groups of defined centers linked by complete channels.
pub fn connected_groups(map: &CenterMap) -> Vec<BTreeSet<Center>> {
    let mut seen = BTreeSet::new();
    let mut groups = Vec::new();
    for center in ALL_CENTERS {
        if !map.is_defined(center) || seen.contains(&center) {
            continue;
        }
        let group = reachable_from(map, center);
        seen.extend(group.iter().copied());
        groups.push(group);
    }
    groups
}

/// Centers reachable from `start` over complete channels (including `start`).
fn reachable_from(map: &CenterMap, start: Center) -> BTreeSet<Center> {
    let mut adjacency: BTreeMap<Center, Vec<Center>> = BTreeMap::new();
    for channel in &map.channels {
        let (a, b) = channel.centers;
        adjacency.entry(a).or_default().push(b);
        adjacency.entry(b).or_default().push(a);
    }

    let mut visited = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(center) = queue.pop_front() {
        for next in adjacency.get(&center).into_iter().flatten() {
            if visited.insert(*next) {
                queue.push_back(*next);
            }
        }
    }
    visited
}

const LINE_KEYWORDS: [&str; 6] = [
    "Investigator",
    "Hermit",
    "Martyr",
    "Opportunist",
    "Heretic",
    "Role Model",
];

/// Conscious (personality Sun) line over unconscious (design Sun) line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub conscious: u8,
    pub unconscious: u8,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            conscious: 1,
            unconscious: 3,
        }
    }
}

impl Profile {
    /// e.g. "3/5 (Martyr/Heretic)"
    pub fn label(&self) -> String {
        let keyword = |line: u8| {
            LINE_KEYWORDS
                .get(usize::from(line).saturating_sub(1))
                .copied()
                .unwrap_or("Unknown")
        };
        format!(
            "{} ({}/{})",
            self,
            keyword(self.conscious),
            keyword(self.unconscious)
        )
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.conscious, self.unconscious)
    }
}

/// Profile from the Sun line of each chart; "1/3" when either is missing.
pub fn derive_profile(personality: &[GateActivation], design: &[GateActivation]) -> Profile {
    let line = |acts: &[GateActivation]| {
        find_activation(acts, Planet::Sun)
            .map(|a| a.line)
            .filter(|l| (1..=6).contains(l))
    };
    match (line(personality), line(design)) {
        (Some(conscious), Some(unconscious)) => Profile {
            conscious,
            unconscious,
        },
        _ => Profile::default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossAngle {
    RightAngle,
    Juxtaposition,
    LeftAngle,
}

impl CrossAngle {
    pub fn for_profile(profile: Profile) -> Self {
        match (profile.conscious, profile.unconscious) {
            (4, 1) => Self::Juxtaposition,
            (5, _) | (6, _) => Self::LeftAngle,
            _ => Self::RightAngle,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::RightAngle => "Right Angle",
            Self::Juxtaposition => "Juxtaposition",
            Self::LeftAngle => "Left Angle",
        }
    }
}

/// Sun/Earth gates of both charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncarnationCross {
    pub angle: CrossAngle,
    pub personality_sun: u8,
    pub personality_earth: u8,
    pub design_sun: u8,
    pub design_earth: u8,
}

impl fmt::Display for IncarnationCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Cross ({}/{} | {}/{})",
            self.angle.name(),
            self.personality_sun,
            self.personality_earth,
            self.design_sun,
            self.design_earth
        )
    }
}

pub fn derive_cross(
    personality: &[GateActivation],
    design: &[GateActivation],
    profile: Profile,
) -> Option<IncarnationCross> {
    let gate = |acts: &[GateActivation], planet| find_activation(acts, planet).map(|a| a.gate);
    Some(IncarnationCross {
        angle: CrossAngle::for_profile(profile),
        personality_sun: gate(personality, Planet::Sun)?,
        personality_earth: gate(personality, Planet::Earth)?,
        design_sun: gate(design, Planet::Sun)?,
        design_earth: gate(design, Planet::Earth)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centers::aggregate::aggregate_gates;

    fn map(list: &[u8]) -> CenterMap {
        aggregate_gates(&list.iter().copied().collect())
    }

    #[test]
    fn test_reflector_and_lunar() {
        let m = map(&[1, 3, 5]);
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Reflector);
        assert_eq!(derive_authority(&m), Authority::Lunar);
        assert_eq!(derive_definition(&m, DefinitionMode::Banded), Definition::None);
    }

    #[test]
    fn test_manifesting_generator_via_charisma() {
        let m = map(&[34, 20]);
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::ManifestingGenerator);
        assert_eq!(derive_authority(&m), Authority::Sacral);
    }

    #[test]
    fn test_generator_without_throat_link() {
        let m = map(&[3, 60]);
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Generator);
    }

    #[test]
    fn test_manifestor_via_money_line() {
        let m = map(&[21, 45]);
        assert!(m.has_channel_between(Center::Throat, Center::Heart));
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Manifestor);
        assert_eq!(derive_authority(&m), Authority::Ego);
    }

    #[test]
    fn test_projector_and_outer_authority() {
        let m = map(&[47, 64]);
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Projector);
        assert_eq!(derive_authority(&m), Authority::Outer);
    }

    #[test]
    fn test_connected_mode_follows_paths() {
        // Sacral -> G (2-14) -> Throat (1-8): no direct 34-20.
        let m = map(&[2, 14, 1, 8]);
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Generator);
        assert_eq!(derive_type(&m, DefinitionMode::Connected), HdType::ManifestingGenerator);
        assert_eq!(derive_definition(&m, DefinitionMode::Connected), Definition::Single);
    }

    #[test]
    fn test_root_motor_reaches_throat_through_spleen() {
        // Root -> Spleen (32-54) -> Throat (16-48): no motor sits next to the Throat.
        let m = map(&[32, 54, 16, 48]);
        assert!(!m.has_channel_between(Center::Root, Center::Throat));
        assert_eq!(derive_type(&m, DefinitionMode::Banded), HdType::Projector);
        assert_eq!(derive_type(&m, DefinitionMode::Connected), HdType::Manifestor);
        assert!(Center::Root.is_motor());
        assert!(!Center::Spleen.is_motor());
    }

    #[test]
    fn test_connected_split() {
        // Head-Ajna and Spleen-Root are disjoint.
        let m = map(&[47, 64, 18, 58]);
        assert_eq!(connected_groups(&m).len(), 2);
        assert_eq!(derive_definition(&m, DefinitionMode::Connected), Definition::Split);
        assert_eq!(derive_definition(&m, DefinitionMode::Banded), Definition::Split);
    }

    #[test]
    fn test_profile_label() {
        let p = Profile { conscious: 3, unconscious: 5 };
        assert_eq!(p.to_string(), "3/5");
        assert_eq!(p.label(), "3/5 (Martyr/Heretic)");
        assert_eq!(CrossAngle::for_profile(p), CrossAngle::RightAngle);
        assert_eq!(CrossAngle::for_profile(Profile { conscious: 4, unconscious: 1 }), CrossAngle::Juxtaposition);
        assert_eq!(CrossAngle::for_profile(Profile { conscious: 6, unconscious: 2 }), CrossAngle::LeftAngle);
    }
}
