use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The nine bodygraph centers, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Center {
    Head,
    Ajna,
    Throat,
    G,
    Heart,
    SolarPlexus,
    Sacral,
    Spleen,
    Root,
}

pub const ALL_CENTERS: [Center; 9] = [
    Center::Head,
    Center::Ajna,
    Center::Throat,
    Center::G,
    Center::Heart,
    Center::SolarPlexus,
    Center::Sacral,
    Center::Spleen,
    Center::Root,
];

/// Gate membership per center. Every gate 1..=64 appears exactly once.
const CENTER_GATES: [(Center, &[u8]); 9] = [
    (Center::Head, &[64, 61, 63]),
    (Center::Ajna, &[47, 24, 4, 17, 43, 11]),
    (Center::Throat, &[62, 23, 56, 35, 12, 45, 33, 8, 31, 20, 16]),
    (Center::G, &[7, 1, 13, 10, 25, 15, 46, 2]),
    (Center::Heart, &[21, 51, 26, 40]),
    (Center::SolarPlexus, &[6, 37, 22, 36, 30, 55, 49]),
    (Center::Sacral, &[5, 14, 29, 59, 9, 3, 42, 27, 34]),
    (Center::Spleen, &[48, 57, 44, 50, 32, 28, 18]),
    (Center::Root, &[53, 60, 52, 19, 39, 41, 58, 38, 54]),
];

// Reverse index, gate -> owning center
lazy_static::lazy_static! {
    static ref GATE_CENTERS: HashMap<u8, Center> = {
        let mut index = HashMap::with_capacity(64);
        for (center, gates) in CENTER_GATES.iter() {
            for gate in gates.iter() {
                index.insert(*gate, *center);
            }
        }
        index
    };
}

impl Center {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Head => "Head",
            Self::Ajna => "Ajna",
            Self::Throat => "Throat",
            Self::G => "G",
            Self::Heart => "Heart",
            Self::SolarPlexus => "Solar Plexus",
            Self::Sacral => "Sacral",
            Self::Spleen => "Spleen",
            Self::Root => "Root",
        }
    }

    /// Energy sources: Sacral, Solar Plexus, Heart and Root.
    pub const fn is_motor(self) -> bool {
        matches!(self, Self::Sacral | Self::SolarPlexus | Self::Heart | Self::Root)
    }

    pub fn gates(self) -> &'static [u8] {
        CENTER_GATES
            .iter()
            .find(|(center, _)| *center == self)
            .map(|(_, gates)| *gates)
            .unwrap_or(&[])
    }

    /// Center owning `gate`, or `None` outside 1..=64.
    pub fn of_gate(gate: u8) -> Option<Self> {
        GATE_CENTERS.get(&gate).copied()
    }
}

impl fmt::Display for Center {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
